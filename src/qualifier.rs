use crate::errors::AppError;
use crate::models::{LeadCategory, LeadForm, Qualification, DEFAULT_ACTION, DEFAULT_REASON};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Client for the external lead scoring service.
///
/// One bounded-wait attempt per submission; no retries here or anywhere
/// upstream. Every failure mode (connect error, timeout, non-2xx status,
/// unparseable body, schema mismatch) collapses into a single `Err` — the
/// orchestrator only needs to know that no qualification was obtained.
#[derive(Clone)]
pub struct QualifierClient {
    client: reqwest::Client,
    endpoint: String,
}

/// Wire shape of a scorer response. Everything optional so the strict
/// checks happen in `finalize`, not inside serde.
#[derive(Debug, Deserialize)]
struct RawQualification {
    score: Option<i64>,
    category: Option<String>,
    reason: Option<String>,
    action: Option<String>,
}

impl QualifierClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApi(format!("Failed to create qualifier client: {}", e))
            })?;

        Ok(Self { client, endpoint })
    }

    /// Requests a qualification for the given submission.
    pub async fn qualify(&self, form: &LeadForm) -> Result<Qualification, AppError> {
        tracing::debug!("Requesting qualification from {}", self.endpoint);

        let body = json!({
            "name": form.name,
            "email": form.email,
            "phone": form.phone,
            "company": form.company,
            "message": form.message,
            "source": form.source,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Qualifier request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApi(format!(
                "Qualifier returned {}: {}",
                status, error_text
            )));
        }

        let raw: RawQualification = response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse qualifier response: {}", e))
        })?;

        finalize(raw)
    }
}

/// Strict validation of the parsed response, then default merging.
///
/// `score` and `category` are mandatory and fail closed on absence or an
/// unknown category value. Only `reason` and `action` may be absent; they
/// are filled with the canonical defaults here, deliberately separate from
/// the parse above.
fn finalize(raw: RawQualification) -> Result<Qualification, AppError> {
    let score = raw
        .score
        .ok_or_else(|| AppError::ExternalApi("Qualifier response missing 'score'".to_string()))?;
    let score = i32::try_from(score)
        .map_err(|_| AppError::ExternalApi(format!("Qualifier score out of range: {}", score)))?;

    let category = raw
        .category
        .as_deref()
        .and_then(LeadCategory::parse)
        .ok_or_else(|| {
            AppError::ExternalApi(format!(
                "Qualifier response has missing or unknown category: {:?}",
                raw.category
            ))
        })?;

    Ok(Qualification {
        score,
        category,
        reason: raw.reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
        action: raw.action.unwrap_or_else(|| DEFAULT_ACTION.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = QualifierClient::new(
            "http://127.0.0.1:8000/qualify-lead".to_string(),
            Duration::from_secs(10),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn complete_response_passes_through() {
        let raw = RawQualification {
            score: Some(8),
            category: Some("HOT".to_string()),
            reason: Some("Decision maker with clear budget".to_string()),
            action: Some("Follow up within 24 hours".to_string()),
        };
        let q = finalize(raw).unwrap();
        assert_eq!(q.score, 8);
        assert_eq!(q.category, LeadCategory::Hot);
        assert_eq!(q.reason, "Decision maker with clear budget");
    }

    #[test]
    fn missing_reason_and_action_get_defaults() {
        let raw = RawQualification {
            score: Some(6),
            category: Some("warm".to_string()),
            reason: None,
            action: None,
        };
        let q = finalize(raw).unwrap();
        assert_eq!(q.score, 6);
        assert_eq!(q.category, LeadCategory::Warm);
        assert_eq!(q.reason, DEFAULT_REASON);
        assert_eq!(q.action, DEFAULT_ACTION);
    }

    #[test]
    fn missing_score_fails_closed() {
        let raw = RawQualification {
            score: None,
            category: Some("HOT".to_string()),
            reason: None,
            action: None,
        };
        assert!(finalize(raw).is_err());
    }

    #[test]
    fn unknown_category_fails_closed() {
        let raw = RawQualification {
            score: Some(7),
            category: Some("LUKEWARM".to_string()),
            reason: None,
            action: None,
        };
        assert!(finalize(raw).is_err());
    }

    #[test]
    fn missing_category_fails_closed() {
        let raw = RawQualification {
            score: Some(7),
            category: None,
            reason: Some("looks fine".to_string()),
            action: None,
        };
        assert!(finalize(raw).is_err());
    }
}
