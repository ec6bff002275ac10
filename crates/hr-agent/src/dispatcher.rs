//! Dispatcher: one line of user text in, one reply out.
//!
//! Binds the classifier, query router, action extractor and capability set.
//! All collaborators are passed in at construction, so a turn depends on
//! nothing but its text and the caller's `now`.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::Instrument;
use uuid::Uuid;

use hr_capabilities::{CapabilityError, CapabilitySet};
use hr_protocol::IntentType;
use hr_records::RecordStore;

use crate::classifier::IntentClassifier;
use crate::extractor::{ActionExtractor, ExtractError};
use crate::gateway::LanguageModel;
use crate::messages;
use crate::router::QueryRouter;

pub struct Dispatcher {
    classifier: IntentClassifier,
    router: QueryRouter,
    extractor: ActionExtractor,
    capabilities: Arc<dyn CapabilitySet>,
}

impl Dispatcher {
    /// Wire a dispatcher with a default extractor (no re-prompt).
    pub fn new(
        records: Arc<dyn RecordStore>,
        model: Arc<dyn LanguageModel>,
        capabilities: Arc<dyn CapabilitySet>,
    ) -> Self {
        let extractor = ActionExtractor::new(model, records.clone());
        Self::from_parts(QueryRouter::new(records), extractor, capabilities)
    }

    pub fn from_parts(
        router: QueryRouter,
        extractor: ActionExtractor,
        capabilities: Arc<dyn CapabilitySet>,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            router,
            extractor,
            capabilities,
        }
    }

    /// Handle one line of input.
    ///
    /// Returns `None` for empty or whitespace-only input. Every other line
    /// gets exactly one reply; no failure escapes as an error.
    pub async fn handle(&self, text: &str, now: NaiveDateTime) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let span = tracing::info_span!("turn", turn_id = %Uuid::now_v7());
        Some(self.dispatch(text, now).instrument(span).await)
    }

    async fn dispatch(&self, text: &str, now: NaiveDateTime) -> String {
        let cues = self.classifier.explain(text);
        let intent = cues.intent();
        tracing::debug!(
            text,
            question_cues = ?cues.question,
            command_cues = ?cues.command,
            "classified input"
        );
        tracing::info!(intent = intent.label(), "dispatching turn");

        match intent {
            IntentType::Question => self.answer_question(text).await,
            IntentType::Command => self.execute_command(text, now).await,
            IntentType::Undetermined => messages::UNDETERMINED.to_string(),
        }
    }

    async fn answer_question(&self, text: &str) -> String {
        let template = match self.router.route(text) {
            Ok(template) => template,
            Err(failure) => {
                tracing::info!(reason = %failure, "query not routed");
                return messages::routing_failure(failure);
            }
        };
        tracing::info!(template = ?template.kind(), "query routed");

        match self.router.answer(&template).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::info!(error = %e, "query lookup failed");
                messages::query_failure(&e)
            }
        }
    }

    async fn execute_command(&self, text: &str, now: NaiveDateTime) -> String {
        let action = match self.extractor.extract(text, now.date()).await {
            Ok(action) => action,
            Err(ExtractError::Rejected(failure)) => {
                tracing::info!(
                    reason = ?failure.reason_code(),
                    detail = %failure,
                    "extraction rejected"
                );
                return messages::extraction_failure(&failure);
            }
            Err(ExtractError::Model(e)) => {
                tracing::warn!(error = %e, "language model failed, turn abandoned");
                return messages::backend_failure(&e);
            }
            Err(ExtractError::Records(e)) => {
                tracing::warn!(error = %e, "record store failed during extraction");
                return messages::records_failure();
            }
        };

        let kind = action.kind();
        tracing::info!(action = %kind, subject = action.subject(), "performing action");

        match self.capabilities.perform(action).await {
            Ok(confirmation) => {
                tracing::info!(
                    action = %kind,
                    reference = confirmation.reference.as_deref().unwrap_or("-"),
                    "action committed"
                );
                confirmation.message
            }
            Err(CapabilityError::Record(e)) => {
                tracing::warn!(error = %e, action = %kind, "record store failed during action");
                messages::records_failure()
            }
            Err(e) => {
                tracing::info!(action = %kind, error = %e, "action refused");
                e.to_string()
            }
        }
    }
}
