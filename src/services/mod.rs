//! Service layer: the proposition source adapters.
//!
//! - `PageSource` scrapes the full-text proposition page
//! - `OpenDataSource` queries the open-data JSON API
//!
//! Both implement [`ProposalSource`] and are selected by configuration.

mod opendata;
mod page;
mod source;

pub use opendata::OpenDataSource;
pub use page::PageSource;
pub use source::{ProposalSource, build_source, placeholders};
