// src/services/opendata.rs

//! Open-data API source adapter.
//!
//! Queries the JSON endpoint directly instead of scraping markup. Missing
//! keys get the same fixed placeholders the page adapter uses.

use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{FetchConfig, ProposalSnapshot, RunLog, Stage};
use crate::utils::http;

use super::source::{ProposalSource, placeholders};

/// Source adapter for the open-data proposition API.
pub struct OpenDataSource {
    client: reqwest::Client,
    url: String,
    fetch: FetchConfig,
}

impl OpenDataSource {
    pub fn new(client: reqwest::Client, url: String, fetch: FetchConfig) -> Self {
        Self { client, url, fetch }
    }

    /// Parse the API payload into a snapshot.
    ///
    /// The endpoint answers either a single object or an array filtered by
    /// number/year; in the array case the first record is the proposition.
    fn parse_payload(&self, body: &str, log: &mut RunLog) -> Result<ProposalSnapshot> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| AppError::parse(format!("resposta JSON inválida: {e}")))?;

        let record = Self::first_record(&value)
            .ok_or_else(|| AppError::parse("resposta sem registros de proposição"))?;

        Ok(ProposalSnapshot {
            titulo: Self::field(record, &["titulo", "title"], placeholders::TITULO, log),
            ementa: Self::field(record, &["ementa"], placeholders::EMENTA, log),
            historico: Self::field(
                record,
                &["historico", "tramitacao"],
                placeholders::HISTORICO,
                log,
            ),
            info_complementar: Self::field(
                record,
                &["info_complementar", "informacoes_complementares"],
                placeholders::INFO_COMPLEMENTAR,
                log,
            ),
            url: self.url.clone(),
            fetched_at: Local::now(),
        })
    }

    fn first_record(value: &Value) -> Option<&Value> {
        match value {
            Value::Array(items) => items.first(),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => items.first(),
                _ => Some(value),
            },
            _ => None,
        }
    }

    /// Read the first present key as a string, or substitute the placeholder.
    fn field(record: &Value, keys: &[&str], placeholder: &str, log: &mut RunLog) -> String {
        for key in keys {
            if let Some(text) = record.get(key).and_then(Value::as_str) {
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
        log.push(Stage::Fetch, format!("⚠️ {placeholder}."));
        placeholder.to_string()
    }
}

#[async_trait]
impl ProposalSource for OpenDataSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self, log: &mut RunLog) -> Result<ProposalSnapshot> {
        log.push(Stage::Fetch, "🚀 Iniciando consulta à API de dados abertos");

        let body = http::get_with_retry(&self.client, &self.url, true, &self.fetch, log).await?;
        let snapshot = self.parse_payload(&body, log)?;

        log.push(Stage::Fetch, "✅ Dados capturados com sucesso");
        Ok(snapshot)
    }
}
