use crate::errors::AppError;
use crate::models::Lead;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::time::Duration;

/// Forwards finalized leads to the external follow-up automation webhook.
///
/// Strictly fire-and-forget: the orchestrator spawns `notify` after the
/// response to the submitter is already decided, and any failure here is
/// logged by the caller and swallowed.
#[derive(Clone)]
pub struct NotificationDispatcher {
    client: reqwest::Client,
    webhook_url: String,
    assignee: String,
}

impl NotificationDispatcher {
    pub fn new(webhook_url: String, assignee: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| {
                AppError::ExternalApi(format!("Failed to create webhook client: {}", e))
            })?;

        Ok(Self {
            client,
            webhook_url,
            assignee,
        })
    }

    /// Builds the automation envelope for a finalized lead.
    ///
    /// HOT leads are flagged for immediate follow-up; everything else gets
    /// a next-action date 24 hours out.
    pub fn envelope(&self, lead: &Lead) -> Value {
        json!({
            "lead": lead,
            "followup": {
                "needsImmediate": lead.category == "HOT",
                "nextActionDate": (Utc::now() + ChronoDuration::hours(24)).to_rfc3339(),
                "assignedTo": self.assignee,
            },
            "system": {
                "source": "website_form",
                "qualifiedBy": "internal_ai",
                "version": "1.0",
            },
        })
    }

    /// Delivers the envelope to the configured webhook.
    pub async fn notify(&self, lead: &Lead) -> Result<(), AppError> {
        tracing::debug!("Forwarding lead {} to follow-up webhook", lead.id);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.envelope(lead))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Webhook delivery failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApi(format!(
                "Webhook returned {}: {}",
                status, error_text
            )));
        }

        tracing::info!("Forwarded lead {} to follow-up webhook", lead.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeadForm, Qualification, DEFAULT_SOURCE};
    use uuid::Uuid;

    fn dispatcher() -> NotificationDispatcher {
        NotificationDispatcher::new(
            "https://hooks.example.com/leads".to_string(),
            "sales@example.com".to_string(),
        )
        .unwrap()
    }

    fn lead_with_category(category: crate::models::LeadCategory, score: i32) -> Lead {
        let form = LeadForm {
            name: "Sarah Wilson".to_string(),
            email: "sarah@startup.io".to_string(),
            phone: "555-0456".to_string(),
            company: "Startup Inc".to_string(),
            message: "Looking for automation".to_string(),
            source: DEFAULT_SOURCE.to_string(),
        };
        let qualification = Qualification {
            score,
            category,
            reason: "test".to_string(),
            action: "test".to_string(),
        };
        Lead::from_parts(&form, &qualification, Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn hot_lead_needs_immediate_followup() {
        let lead = lead_with_category(crate::models::LeadCategory::Hot, 9);
        let envelope = dispatcher().envelope(&lead);
        assert_eq!(envelope["followup"]["needsImmediate"], json!(true));
    }

    #[test]
    fn warm_lead_does_not_need_immediate_followup() {
        let lead = lead_with_category(crate::models::LeadCategory::Warm, 6);
        let envelope = dispatcher().envelope(&lead);
        assert_eq!(envelope["followup"]["needsImmediate"], json!(false));
    }

    #[test]
    fn envelope_carries_system_block_and_lead_fields() {
        let lead = lead_with_category(crate::models::LeadCategory::Cold, 2);
        let envelope = dispatcher().envelope(&lead);
        assert_eq!(envelope["system"]["source"], "website_form");
        assert_eq!(envelope["system"]["qualifiedBy"], "internal_ai");
        assert_eq!(envelope["system"]["version"], "1.0");
        assert_eq!(envelope["lead"]["email"], "sarah@startup.io");
        assert_eq!(envelope["lead"]["score"], json!(2));
        assert_eq!(envelope["followup"]["assignedTo"], "sales@example.com");
        assert!(envelope["lead"]["createdAt"].is_string());
    }
}
