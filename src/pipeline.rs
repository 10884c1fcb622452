use crate::errors::AppError;
use crate::models::{Lead, LeadForm, LeadSubmission, Qualification, DEFAULT_SOURCE};
use crate::notifier::NotificationDispatcher;
use crate::qualifier::QualifierClient;
use crate::store::Store;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Sequences qualification, persistence and notification for one
/// submission.
///
/// The pipeline favors always answering the submitter over strict
/// consistency: the scorer, the store and the webhook are each optional
/// from the caller's perspective. Only validation failures reach the
/// caller as errors; every other degraded branch logs at warn and
/// substitutes a usable result.
pub struct IngestionPipeline {
    store: Arc<dyn Store>,
    qualifier: QualifierClient,
    notifier: NotificationDispatcher,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        qualifier: QualifierClient,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            qualifier,
            notifier,
        }
    }

    /// Runs a submission through the full pipeline:
    /// validate, qualify (fallback on failure), persist (synthesize on
    /// failure), then hand the persisted lead to the webhook dispatcher
    /// without awaiting it.
    pub async fn ingest(&self, submission: LeadSubmission) -> Result<Lead, AppError> {
        let form = validate(submission)?;

        let qualification = match self.qualifier.qualify(&form).await {
            Ok(q) => {
                tracing::info!(
                    "Lead qualified: score={} category={}",
                    q.score,
                    q.category
                );
                q
            }
            Err(e) => {
                tracing::warn!("Qualification unavailable, using fallback annotation: {}", e);
                Qualification::fallback()
            }
        };

        let lead = match self.store.insert_lead(&form, &qualification).await {
            Ok(lead) => {
                self.spawn_notification(lead.clone());
                lead
            }
            Err(e) => {
                // The submitter still gets a success response; only the
                // logs record that this lead was not durably stored. No
                // webhook either: notification follows persistence.
                tracing::warn!("Lead persistence failed, returning non-durable record: {}", e);
                Lead::from_parts(&form, &qualification, Uuid::new_v4(), Utc::now())
            }
        };

        Ok(lead)
    }

    /// Fire-and-forget webhook delivery. The response to the submitter is
    /// already decided; failures here are logged and swallowed.
    fn spawn_notification(&self, lead: Lead) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&lead).await {
                tracing::warn!("Follow-up webhook delivery failed for lead {}: {}", lead.id, e);
            }
        });
    }
}

/// Trims all fields and rejects any missing/empty required one. Runs
/// before any external call is made.
pub fn validate(submission: LeadSubmission) -> Result<LeadForm, AppError> {
    Ok(LeadForm {
        name: required("name", &submission.name)?,
        email: required("email", &submission.email)?,
        phone: required("phone", &submission.phone)?,
        company: required("company", &submission.company)?,
        message: required("message", &submission.message)?,
        source: submission
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
    })
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required field: {}",
            field
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> LeadSubmission {
        LeadSubmission {
            name: "  John Smith  ".to_string(),
            email: " john@enterprise.com ".to_string(),
            phone: "555-0123".to_string(),
            company: "Enterprise Co".to_string(),
            message: "Interested in AI solutions".to_string(),
            source: None,
        }
    }

    #[test]
    fn validation_trims_and_defaults_source() {
        let form = validate(submission()).unwrap();
        assert_eq!(form.name, "John Smith");
        assert_eq!(form.email, "john@enterprise.com");
        assert_eq!(form.source, "Web Form");
    }

    #[test]
    fn empty_email_is_rejected() {
        let mut s = submission();
        s.email = "   ".to_string();
        let err = validate(s).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn empty_message_is_rejected() {
        let mut s = submission();
        s.message = String::new();
        assert!(matches!(validate(s), Err(AppError::Validation(_))));
    }

    #[test]
    fn explicit_source_survives_validation() {
        let mut s = submission();
        s.source = Some(" Referral ".to_string());
        let form = validate(s).unwrap();
        assert_eq!(form.source, "Referral");
    }

    #[test]
    fn blank_source_falls_back_to_default() {
        let mut s = submission();
        s.source = Some("   ".to_string());
        let form = validate(s).unwrap();
        assert_eq!(form.source, "Web Form");
    }
}
