use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Source tag applied when a submission does not carry one.
pub const DEFAULT_SOURCE: &str = "Web Form";

/// Reason text used when the scorer omits one, and in the fallback annotation.
pub const DEFAULT_REASON: &str = "Manual review needed";

/// Action text used when the scorer omits one, and in the fallback annotation.
pub const DEFAULT_ACTION: &str = "Follow up required";

// ============ Database Models ============

/// A persisted lead with its qualification annotation.
///
/// Every stored lead carries exactly one qualification (real or fallback);
/// there is no unqualified state. The record is immutable once written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Contact name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Company the contact belongs to.
    pub company: String,
    /// Free-text message from the submission form.
    pub message: String,
    /// Provenance tag (e.g. "Web Form").
    pub source: String,
    /// Qualification score, conventionally 1-10.
    pub score: i32,
    /// Qualification category: "HOT", "WARM" or "COLD".
    pub category: String,
    /// Explanation of the score.
    pub reason: String,
    /// Recommended follow-up action.
    pub action: String,
    /// Timestamp assigned at persistence time.
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Assembles a lead record from a validated form and its qualification.
    ///
    /// Used by the in-memory store and by the pipeline when persistence
    /// fails and a non-durable record must be returned instead.
    pub fn from_parts(
        form: &LeadForm,
        qualification: &Qualification,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            company: form.company.clone(),
            message: form.message.clone(),
            source: form.source.clone(),
            score: qualification.score,
            category: qualification.category.as_str().to_string(),
            reason: qualification.reason.clone(),
            action: qualification.action.clone(),
            created_at,
        }
    }
}

/// A competitor tracked for the market panel. Append-only display data,
/// unrelated to the qualification pipeline.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: Uuid,
    pub name: String,
    pub website: String,
    pub strengths: String,
    pub weaknesses: String,
    pub market_share: f64,
    pub last_updated: DateTime<Utc>,
}

/// A market trend entry for the market panel.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrend {
    pub id: Uuid,
    pub trend: String,
    pub impact: String,
    pub description: String,
    pub source: String,
    pub date: DateTime<Utc>,
}

// ============ API Request Models ============

/// Incoming body for `POST /leads`.
///
/// All fields except `source` are required; emptiness is checked after
/// trimming by the ingestion pipeline, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// A submission that passed validation: whitespace trimmed, required
/// fields verified non-empty, source defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
    pub source: String,
}

/// Incoming body for `POST /market/competitors`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetitor {
    pub name: String,
    pub website: String,
    pub strengths: String,
    pub weaknesses: String,
    pub market_share: f64,
}

/// Incoming body for `POST /market/trends`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrend {
    pub trend: String,
    pub impact: String,
    pub description: String,
    pub source: String,
}

// ============ Qualification ============

/// Lead temperature as returned by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadCategory {
    Hot,
    Warm,
    Cold,
}

impl LeadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadCategory::Hot => "HOT",
            LeadCategory::Warm => "WARM",
            LeadCategory::Cold => "COLD",
        }
    }

    /// Parses a category string, case-insensitively. Anything outside
    /// HOT/WARM/COLD is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HOT" => Some(LeadCategory::Hot),
            "WARM" => Some(LeadCategory::Warm),
            "COLD" => Some(LeadCategory::Cold),
            _ => None,
        }
    }
}

impl fmt::Display for LeadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The score/category/reason/action annotation attached to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    pub score: i32,
    pub category: LeadCategory,
    pub reason: String,
    pub action: String,
}

impl Qualification {
    /// Canonical annotation substituted when the scoring service is
    /// unreachable or returns something unusable. A valid, storable
    /// qualification in its own right.
    pub fn fallback() -> Self {
        Self {
            score: 5,
            category: LeadCategory::Warm,
            reason: DEFAULT_REASON.to_string(),
            action: DEFAULT_ACTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!(LeadCategory::parse("HOT"), Some(LeadCategory::Hot));
        assert_eq!(LeadCategory::parse("warm"), Some(LeadCategory::Warm));
        assert_eq!(LeadCategory::parse(" Cold "), Some(LeadCategory::Cold));
        assert_eq!(LeadCategory::parse("TEPID"), None);
        assert_eq!(LeadCategory::parse(""), None);
    }

    #[test]
    fn fallback_matches_canonical_values() {
        let fallback = Qualification::fallback();
        assert_eq!(fallback.score, 5);
        assert_eq!(fallback.category, LeadCategory::Warm);
        assert_eq!(fallback.reason, "Manual review needed");
        assert_eq!(fallback.action, "Follow up required");
    }

    #[test]
    fn lead_serializes_created_at_as_camel_case() {
        let form = LeadForm {
            name: "John Smith".to_string(),
            email: "john@enterprise.com".to_string(),
            phone: "555-0123".to_string(),
            company: "Enterprise Co".to_string(),
            message: "Interested in AI solutions".to_string(),
            source: DEFAULT_SOURCE.to_string(),
        };
        let lead = Lead::from_parts(
            &form,
            &Qualification::fallback(),
            Uuid::new_v4(),
            chrono::Utc::now(),
        );
        let json = serde_json::to_value(&lead).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["category"], "WARM");
    }
}
