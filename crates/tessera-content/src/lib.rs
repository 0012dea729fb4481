//! Build-time content collection for Tessera.
//!
//! Turns a tree of per-page markdown files into a single [`SiteContent`]
//! artifact:
//!
//! - [`parse_section`]: one content file to one [`Section`]
//! - [`collect_page`]: one page directory to an ordered [`Page`]
//! - [`SiteCollector`]: the content root to [`SiteContent`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tessera_content::SiteCollector;
//!
//! let report = SiteCollector::new("content/pages").collect()?;
//! report.content.write_to("dist/content.json".as_ref())?;
//! # Ok(())
//! # }
//! ```

mod ast;
mod error;
mod frontmatter;
mod page;
mod parser;
mod section;
mod site;

pub use ast::{Align, Node, markdown_options};
pub use error::{CollectionError, ParseError};
pub use page::{Page, PageReport, collect_page};
pub use parser::{parse_section, section_id_from_file_name};
pub use section::{Props, Section, SectionContent, SectionId};
pub use site::{SiteCollector, SiteContent, SiteReport};
