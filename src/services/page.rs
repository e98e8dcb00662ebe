// src/services/page.rs

//! Page-scraping source adapter.
//!
//! Fetches the proposition full-text page and extracts the tracked fields
//! by structural CSS selector. A field whose selector matches nothing gets
//! the fixed placeholder instead of failing the whole fetch.

use async_trait::async_trait;
use chrono::Local;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{FetchConfig, ProposalSnapshot, RunLog, Stage};
use crate::utils::http;

use super::source::{ProposalSource, placeholders};

const TITULO_SELECTOR: &str = "h1.titulo";
const EMENTA_SELECTOR: &str = "div.ementa";
const HISTORICO_SELECTOR: &str = "#historico";
const INFO_SELECTOR: &str = "#informacoesComplementares";

/// Source adapter scraping the full-text proposition page.
pub struct PageSource {
    client: reqwest::Client,
    url: String,
    fetch: FetchConfig,
}

impl PageSource {
    pub fn new(client: reqwest::Client, url: String, fetch: FetchConfig) -> Self {
        Self { client, url, fetch }
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }

    /// Extract one field's inner text, or substitute its placeholder.
    fn extract_field(
        document: &Html,
        selector: &Selector,
        placeholder: &str,
        log: &mut RunLog,
    ) -> String {
        match document.select(selector).next() {
            Some(element) => inner_text(&element),
            None => {
                log.push(Stage::Fetch, format!("⚠️ {placeholder}."));
                placeholder.to_string()
            }
        }
    }

    /// Parse the page HTML into a snapshot.
    fn parse_document(&self, html: &str, log: &mut RunLog) -> Result<ProposalSnapshot> {
        let document = Html::parse_document(html);

        let titulo_sel = Self::parse_selector(TITULO_SELECTOR)?;
        let ementa_sel = Self::parse_selector(EMENTA_SELECTOR)?;
        let historico_sel = Self::parse_selector(HISTORICO_SELECTOR)?;
        let info_sel = Self::parse_selector(INFO_SELECTOR)?;

        Ok(ProposalSnapshot {
            titulo: Self::extract_field(&document, &titulo_sel, placeholders::TITULO, log),
            ementa: Self::extract_field(&document, &ementa_sel, placeholders::EMENTA, log),
            historico: Self::extract_field(&document, &historico_sel, placeholders::HISTORICO, log),
            info_complementar: Self::extract_field(
                &document,
                &info_sel,
                placeholders::INFO_COMPLEMENTAR,
                log,
            ),
            url: self.url.clone(),
            fetched_at: Local::now(),
        })
    }
}

#[async_trait]
impl ProposalSource for PageSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self, log: &mut RunLog) -> Result<ProposalSnapshot> {
        log.push(Stage::Fetch, "🚀 Iniciando captura da proposição");

        let html = http::get_with_retry(&self.client, &self.url, false, &self.fetch, log).await?;
        let snapshot = self.parse_document(&html, log)?;

        log.push(Stage::Fetch, "✅ Dados capturados com sucesso");
        Ok(snapshot)
    }
}

/// Collect an element's text nodes as trimmed lines.
///
/// Approximates rendered inner text: block structure collapses into one
/// line per non-empty text node, which keeps the histórico entries apart.
fn inner_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
