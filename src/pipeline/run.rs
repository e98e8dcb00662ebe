//! The run orchestrator: fetch → compare → notify → save.
//!
//! One synchronous pass per invocation; recurrence is external (cron or
//! container restart). A fetch failure short-circuits into an error
//! notification and never touches the persisted state.

use chrono::Local;

use crate::error::Result;
use crate::models::{Config, RunLog, RunResult, RunStatus, Stage};
use crate::notify::{self, Notifier, SmtpNotifier, template};
use crate::services::{ProposalSource, build_source};
use crate::storage::{LocalStateStore, PreviousState, StateStore};

use super::diff;

/// Orchestrates a single watch run over pluggable collaborators.
pub struct Watcher {
    label: String,
    source: Box<dyn ProposalSource>,
    store: Box<dyn StateStore>,
    notifier: Box<dyn Notifier>,
}

impl Watcher {
    /// Build a watcher entirely from configuration.
    ///
    /// Validates first, so a bad config fails here rather than mid-run.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let source = build_source(config)?;
        let store = Box::new(LocalStateStore::new(&config.watch.state_path));
        let notifier = Box::new(SmtpNotifier::new(config.email.clone()));
        Self::with_parts(config, source, store, notifier)
    }

    /// Build a watcher with explicit collaborators.
    pub fn with_parts(
        config: &Config,
        source: Box<dyn ProposalSource>,
        store: Box<dyn StateStore>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        let label = config.proposition_id()?.label();
        Ok(Self {
            label,
            source,
            store,
            notifier,
        })
    }

    /// Execute one full run and return the structured result.
    ///
    /// Fetch-stage errors are absorbed into an error result here; nothing
    /// propagates to the caller as a fault.
    pub async fn run(&self) -> RunResult {
        let mut log = RunLog::new();

        let snapshot = match self.source.fetch(&mut log).await {
            Ok(snapshot) => snapshot,
            Err(error) => return self.fetch_failed(error.to_string(), log).await,
        };

        // Comparing
        let previous = match self.store.load().await {
            Ok(previous) => previous,
            Err(error) => {
                log::error!("Failed to read previous state: {error}");
                log.push(
                    Stage::Compare,
                    format!("❌ Erro ao ler estado anterior: {error}"),
                );
                return self.fetch_failed(error.to_string(), log).await;
            }
        };
        let current = PreviousState::from(&snapshot);
        let report = diff::compare(&current, &previous);
        let changed = report.has_changes();
        if changed {
            log.push(
                Stage::Compare,
                format!(
                    "🔄 Conteúdo alterado desde a última consulta: {}",
                    report.changed_fields.join(", ")
                ),
            );
        } else {
            log.push(Stage::Compare, "✅ Sem alterações desde a última consulta");
        }

        // Notifying
        let subject = notify::success_subject(&self.label, changed, Local::now());
        let body = template::render(&snapshot);
        self.deliver(&subject, &body, &mut log).await;

        // Saving; only a successful fetch reaches this point
        if let Err(error) = self.store.save(&current).await {
            log::error!("Failed to persist state: {error}");
            log.push(Stage::Save, format!("❌ Erro ao gravar estado: {error}"));
            return RunResult {
                status: RunStatus::Error,
                changed,
                logs: log.lines(),
                error: Some(error.to_string()),
                snapshot: Some(snapshot),
            };
        }
        log.push(Stage::Save, "💾 Estado atualizado");

        RunResult::success(snapshot, changed, &log)
    }

    /// Error path: notify with the `[ERRO]` subject, leave the state alone.
    async fn fetch_failed(&self, message: String, mut log: RunLog) -> RunResult {
        log::error!("Erro na captura: {message}");
        log.push(Stage::Fetch, format!("❌ Erro na captura: {message}"));

        let subject = notify::error_subject(&self.label, Local::now());
        let body = template::render_error(&message);
        self.deliver(&subject, &body, &mut log).await;

        RunResult::error(message, &log)
    }

    /// Best-effort delivery. A transport failure is traced and logged but
    /// never changes the run status.
    async fn deliver(&self, subject: &str, body: &str, log: &mut RunLog) {
        match self.notifier.send(subject, body, &log.lines()).await {
            Ok(()) => log.push(Stage::Notify, "✅ E-mail enviado com sucesso"),
            Err(error) => {
                log::error!("Erro ao enviar e-mail: {error}");
                log.push(Stage::Notify, format!("❌ Erro ao enviar e-mail: {error}"));
            }
        }
    }
}

/// Convenience entry point: build from config and run once.
pub async fn run_once(config: &Config) -> Result<RunResult> {
    let watcher = Watcher::from_config(config)?;
    Ok(watcher.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ProposalSnapshot, SourceMode};
    use async_trait::async_trait;
    use chrono::Local;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    enum FetchBehavior {
        Snapshot(ProposalSnapshot),
        Timeout,
        EmptyBody,
    }

    struct MockSource {
        url: String,
        behavior: FetchBehavior,
    }

    #[async_trait]
    impl ProposalSource for MockSource {
        fn url(&self) -> &str {
            &self.url
        }

        async fn fetch(&self, log: &mut RunLog) -> Result<ProposalSnapshot> {
            log.push(Stage::Fetch, "🚀 Iniciando captura da proposição");
            match &self.behavior {
                FetchBehavior::Snapshot(snapshot) => {
                    log.push(Stage::Fetch, "✅ Dados capturados com sucesso");
                    Ok(snapshot.clone())
                }
                FetchBehavior::Timeout => Err(AppError::Timeout("connect timed out".into())),
                FetchBehavior::EmptyBody => Err(AppError::EmptyResponse(self.url.clone())),
            }
        }
    }

    #[derive(Debug)]
    struct SentMail {
        subject: String,
        log_lines: Vec<String>,
    }

    struct RecordingNotifier {
        sent: Mutex<Vec<SentMail>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn subjects(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|m| m.subject.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Notifier for Arc<RecordingNotifier> {
        async fn send(&self, subject: &str, _html_body: &str, log_lines: &[String]) -> Result<()> {
            if self.fail {
                return Err(AppError::notification("relay rejected the message"));
            }
            self.sent.lock().unwrap().push(SentMail {
                subject: subject.to_string(),
                log_lines: log_lines.to_vec(),
            });
            Ok(())
        }
    }

    fn test_config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.watch.source = SourceMode::Page;
        config.watch.docid = Some("15016".into());
        config.watch.tipoprop = Some("p".into());
        config.watch.state_path = tmp
            .path()
            .join("state.json")
            .to_string_lossy()
            .into_owned();
        config.email.recipient = "dest@example.com".into();
        config
    }

    fn snapshot(historico: &str, info: &str) -> ProposalSnapshot {
        ProposalSnapshot {
            titulo: "PL 3005/2025".into(),
            ementa: "Ementa.".into(),
            historico: historico.into(),
            info_complementar: info.into(),
            url: "https://www.alepe.pe.gov.br/x".into(),
            fetched_at: Local::now(),
        }
    }

    fn watcher(
        config: &Config,
        behavior: FetchBehavior,
        notifier: Arc<RecordingNotifier>,
    ) -> Watcher {
        let source = Box::new(MockSource {
            url: "https://www.alepe.pe.gov.br/x".into(),
            behavior,
        });
        let store = Box::new(LocalStateStore::new(&config.watch.state_path));
        Watcher::with_parts(config, source, store, Box::new(notifier)).unwrap()
    }

    #[tokio::test]
    async fn test_first_run_reports_change_and_saves_state() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let w = watcher(
            &config,
            FetchBehavior::Snapshot(snapshot("X", "Y")),
            RecordingNotifier::new(),
        );

        let result = w.run().await;
        assert_eq!(result.status, RunStatus::Success);
        assert!(result.changed);

        let store = LocalStateStore::new(&config.watch.state_path);
        let saved = store.load().await.unwrap();
        assert_eq!(saved.historico, "X");
        assert_eq!(saved.info_complementar, "Y");
    }

    #[tokio::test]
    async fn test_identical_second_run_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = LocalStateStore::new(&config.watch.state_path);
        store
            .save(&PreviousState {
                historico: "X".into(),
                info_complementar: "Y".into(),
            })
            .await
            .unwrap();

        let notifier = RecordingNotifier::new();
        let w = watcher(
            &config,
            FetchBehavior::Snapshot(snapshot("X", "Y")),
            notifier.clone(),
        );
        let result = w.run().await;

        assert_eq!(result.status, RunStatus::Success);
        assert!(!result.changed);
        assert!(
            result
                .logs
                .iter()
                .any(|l| l.contains("Sem alterações desde a última consulta"))
        );

        // Subject carries the unchanged marker
        let subjects = notifier.subjects();
        assert_eq!(subjects.len(), 1);
        assert!(subjects[0].contains("✅ Sem alterações"));
    }

    #[tokio::test]
    async fn test_timeout_sends_error_email_and_keeps_state() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = LocalStateStore::new(&config.watch.state_path);
        let original = PreviousState {
            historico: "antes".into(),
            info_complementar: "antes".into(),
        };
        store.save(&original).await.unwrap();

        let notifier = RecordingNotifier::new();
        let w = watcher(&config, FetchBehavior::Timeout, notifier.clone());

        let result = w.run().await;
        assert_eq!(result.status, RunStatus::Error);
        assert!(result.error.is_some());
        assert!(result.logs.iter().any(|l| l.contains("Erro na captura")));

        // The error email went out with the [ERRO] subject and the trace trailer
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.starts_with("[ERRO] Acompanhamento ALEPE"));
        assert!(!sent[0].log_lines.is_empty());
        drop(sent);

        // State file was not touched
        assert_eq!(store.load().await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_empty_response_keeps_state_untouched() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = LocalStateStore::new(&config.watch.state_path);
        let original = PreviousState {
            historico: "intacto".into(),
            info_complementar: String::new(),
        };
        store.save(&original).await.unwrap();

        let w = watcher(&config, FetchBehavior::EmptyBody, RecordingNotifier::new());
        let result = w.run().await;

        assert_eq!(result.status, RunStatus::Error);
        assert_eq!(store.load().await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_change_status() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let w = watcher(
            &config,
            FetchBehavior::Snapshot(snapshot("X", "Y")),
            RecordingNotifier::failing(),
        );

        let result = w.run().await;
        assert_eq!(result.status, RunStatus::Success);
        assert!(
            result
                .logs
                .iter()
                .any(|l| l.contains("Erro ao enviar e-mail"))
        );

        // The state write still happened despite the failed send
        let store = LocalStateStore::new(&config.watch.state_path);
        assert_eq!(store.load().await.unwrap().historico, "X");
    }

    #[tokio::test]
    async fn test_changed_content_flags_change() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = LocalStateStore::new(&config.watch.state_path);
        store
            .save(&PreviousState {
                historico: "X".into(),
                info_complementar: "Y".into(),
            })
            .await
            .unwrap();

        let w = watcher(
            &config,
            FetchBehavior::Snapshot(snapshot("X atualizado", "Y")),
            RecordingNotifier::new(),
        );
        let result = w.run().await;

        assert!(result.changed);
        assert!(result.logs.iter().any(|l| l.contains("historico")));
        assert_eq!(store.load().await.unwrap().historico, "X atualizado");
    }
}
