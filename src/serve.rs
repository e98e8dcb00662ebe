// src/serve.rs

//! Minimal HTTP trigger surface.
//!
//! Two routes: a fixed health payload at `/`, and `/run` which overrides
//! the configured identifiers with query parameters and synchronously
//! executes the pipeline, answering with the RunResult.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::{Config, RunLog, RunResult};
use crate::pipeline::run_once;

/// Shared state: the loaded configuration, cloned per run.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/run", get(run))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "alepe-watch API funcionando" }))
}

/// Identifier overrides accepted by `/run`.
///
/// Anything absent falls back to the configured default.
#[derive(Debug, Default, Deserialize)]
pub struct RunParams {
    pub docid: Option<String>,
    pub tipoprop: Option<String>,
    pub proposicao: Option<String>,
    pub numero: Option<String>,
    pub ano: Option<String>,
}

/// Merge query overrides into a run configuration.
fn apply_params(config: &mut Config, params: &RunParams) {
    if params.docid.is_some() {
        config.watch.docid = params.docid.clone();
    }
    if params.tipoprop.is_some() {
        config.watch.tipoprop = params.tipoprop.clone();
    }
    if params.proposicao.is_some() {
        config.watch.proposicao = params.proposicao.clone();
    }
    if params.numero.is_some() {
        config.watch.numero = params.numero.clone();
    }
    if params.ano.is_some() {
        config.watch.ano = params.ano.clone();
    }
}

async fn run(State(state): State<AppState>, Query(params): Query<RunParams>) -> Json<RunResult> {
    let mut config = state.config.clone();
    apply_params(&mut config, &params);

    match run_once(&config).await {
        Ok(result) => Json(result),
        // Config/build failures still answer with a structured erro result
        Err(error) => Json(RunResult::error(error.to_string(), &RunLog::new())),
    }
}
