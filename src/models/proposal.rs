//! Proposition identifier and snapshot data structures.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::SiteConfig;

/// Identifier for a tracked proposition.
///
/// The two shapes are never mixed in a single run: the legacy full-text
/// page is addressed by `docid`/`tipoprop`, the open-data API by a
/// category/number/year triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropositionId {
    /// Page/document mode: `?docid=<docid>&tipoprop=<tipoprop>`
    Document { docid: String, tipoprop: String },

    /// API mode: `/proposicoes/<categoria>/?numero=<n>&ano=<a>`
    OpenData {
        categoria: String,
        numero: String,
        ano: String,
    },
}

impl PropositionId {
    /// Build the fetch URL for this identifier.
    pub fn url(&self, site: &SiteConfig) -> String {
        match self {
            Self::Document { docid, tipoprop } => format!(
                "{}/proposicao-texto-completo/?docid={}&tipoprop={}",
                site.page_base_url.trim_end_matches('/'),
                docid,
                tipoprop
            ),
            Self::OpenData {
                categoria,
                numero,
                ano,
            } => format!(
                "{}/api/v1/proposicoes/{}/?numero={}&ano={}",
                site.opendata_base_url.trim_end_matches('/'),
                categoria,
                numero,
                ano
            ),
        }
    }

    /// Short human-readable label for subject lines and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Document { docid, tipoprop } => format!("docid {docid}/{tipoprop}"),
            Self::OpenData {
                categoria,
                numero,
                ano,
            } => format!("{categoria} {numero}/{ano}"),
        }
    }
}

/// Content captured from the proposition record on a single run.
///
/// Produced fresh on every run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    /// Proposition title
    pub titulo: String,

    /// Summary ("ementa")
    pub ementa: String,

    /// Chronological log of procedural actions
    pub historico: String,

    /// Free-text supplementary notes
    pub info_complementar: String,

    /// URL the snapshot was fetched from
    pub url: String,

    /// Local timestamp of the fetch
    pub fetched_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    #[test]
    fn test_document_url() {
        let id = PropositionId::Document {
            docid: "15016".into(),
            tipoprop: "p".into(),
        };
        assert_eq!(
            id.url(&site()),
            "https://www.alepe.pe.gov.br/proposicao-texto-completo/?docid=15016&tipoprop=p"
        );
    }

    #[test]
    fn test_opendata_url() {
        let id = PropositionId::OpenData {
            categoria: "projetos".into(),
            numero: "3005".into(),
            ano: "2025".into(),
        };
        assert_eq!(
            id.url(&site()),
            "https://dadosabertos.alepe.pe.gov.br/api/v1/proposicoes/projetos/?numero=3005&ano=2025"
        );
    }

    #[test]
    fn test_label() {
        let id = PropositionId::OpenData {
            categoria: "projetos".into(),
            numero: "3005".into(),
            ano: "2025".into(),
        };
        assert_eq!(id.label(), "projetos 3005/2025");
    }
}
