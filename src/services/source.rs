// src/services/source.rs

//! The "fetch proposition" capability and source selection.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, PropositionId, ProposalSnapshot, RunLog};
use crate::utils::http;

use super::{OpenDataSource, PageSource};

/// Fixed substitution text for fields absent from the source.
///
/// A missing field is legitimately absent data, not an error: the fetch
/// still succeeds with the placeholder in place and a warning trace line.
pub mod placeholders {
    pub const TITULO: &str = "Título não encontrado";
    pub const EMENTA: &str = "Ementa não encontrada";
    pub const HISTORICO: &str = "Histórico não encontrado";
    pub const INFO_COMPLEMENTAR: &str = "Informações Complementares não encontradas";
}

/// Capability to fetch one proposition snapshot.
#[async_trait]
pub trait ProposalSource: Send + Sync {
    /// The URL this source fetches from.
    fn url(&self) -> &str;

    /// Fetch a fresh snapshot, tracing every meaningful step into `log`.
    async fn fetch(&self, log: &mut RunLog) -> Result<ProposalSnapshot>;
}

/// Build the configured source adapter.
pub fn build_source(config: &Config) -> Result<Box<dyn ProposalSource>> {
    let id = config.proposition_id()?;
    let url = id.url(&config.site);
    let client = http::create_client(&config.fetch)?;

    // proposition_id() already ties the identifier shape to the mode
    let source: Box<dyn ProposalSource> = match id {
        PropositionId::Document { .. } => {
            Box::new(PageSource::new(client, url, config.fetch.clone()))
        }
        PropositionId::OpenData { .. } => {
            Box::new(OpenDataSource::new(client, url, config.fetch.clone()))
        }
    };
    Ok(source)
}
