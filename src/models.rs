//! Wire types for the VeritasTrial backend API.
//!
//! All shapes follow the backend's JSON conventions (camelCase field names
//! on trial metadata, snake_case query parameters).

use serde::{Deserialize, Serialize};

/// Identifier of a chat model selectable per trial-chat thread.
///
/// The fine-tuned endpoint is the default; the Gemini base model is kept
/// as a fallback for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelId {
    /// Gemini 1.5 Flash base model.
    GeminiFlash,
    /// Fine-tuned VeritasTrial endpoint.
    #[default]
    Finetuned,
}

impl ModelId {
    /// Path segment used in `/chat/{model}/{id}` requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::GeminiFlash => "gemini-1.5-flash-001",
            ModelId::Finetuned => "6894888983713546240",
        }
    }

    /// Human-readable name for the model selector.
    pub fn label(&self) -> &'static str {
        match self {
            ModelId::GeminiFlash => "Gemini 1.5 Flash",
            ModelId::Finetuned => "VeritasTrial fine-tuned",
        }
    }

    /// Next model in the selector cycle.
    pub fn next(&self) -> Self {
        match self {
            ModelId::GeminiFlash => ModelId::Finetuned,
            ModelId::Finetuned => ModelId::GeminiFlash,
        }
    }
}

/// Filter criteria carried with every retrieve call.
///
/// All fields are optional; unset fields are omitted from the serialized
/// JSON so the backend skips the corresponding filter entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_phases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligible_sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_date: Option<String>,
}

impl TrialFilters {
    /// Number of filters currently set, for the status hint line.
    pub fn active_count(&self) -> usize {
        [
            self.study_type.is_some(),
            self.study_phases.is_some(),
            self.min_age.is_some(),
            self.max_age.is_some(),
            self.eligible_sex.is_some(),
            self.last_update_date.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// A primary/secondary/other measure outcome of a clinical trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureOutcome {
    #[serde(default)]
    pub measure: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time_frame: String,
}

/// An intervention of a clinical trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(rename = "type", default)]
    pub intervention_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A PubMed reference of a clinical trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub pmid: String,
    #[serde(default)]
    pub citation: String,
}

/// A related document of a clinical trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialDocument {
    #[serde(default)]
    pub url: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Full metadata of a clinical trial as returned by `/meta/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialMetadata {
    #[serde(default)]
    pub short_title: String,
    #[serde(default)]
    pub long_title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub submit_date: String,
    #[serde(default)]
    pub submit_date_qc: String,
    #[serde(default)]
    pub submit_date_posted: String,
    #[serde(default)]
    pub results_date: String,
    #[serde(default)]
    pub results_date_qc: String,
    #[serde(default)]
    pub results_date_posted: String,
    #[serde(default)]
    pub last_update_date: String,
    #[serde(default)]
    pub last_update_date_posted: String,
    #[serde(default)]
    pub verify_date: String,
    #[serde(default)]
    pub sponsor: String,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub study_phases: String,
    #[serde(default)]
    pub study_type: String,
    #[serde(default)]
    pub enrollment_count: u64,
    #[serde(default)]
    pub allocation: String,
    #[serde(default)]
    pub intervention_model: String,
    #[serde(default)]
    pub observational_model: String,
    #[serde(default)]
    pub primary_purpose: String,
    #[serde(default)]
    pub who_masked: String,
    #[serde(default)]
    pub interventions: Vec<Intervention>,
    #[serde(default)]
    pub primary_measure_outcomes: Vec<MeasureOutcome>,
    #[serde(default)]
    pub secondary_measure_outcomes: Vec<MeasureOutcome>,
    #[serde(default)]
    pub other_measure_outcomes: Vec<MeasureOutcome>,
    #[serde(default)]
    pub min_age: f64,
    #[serde(default)]
    pub max_age: f64,
    #[serde(default)]
    pub eligible_sex: String,
    #[serde(default)]
    pub accepts_healthy: bool,
    #[serde(default)]
    pub inclusion_criteria: String,
    #[serde(default)]
    pub exclusion_criteria: String,
    #[serde(default)]
    pub officials: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub documents: Vec<TrialDocument>,
}

/// Response from `GET /retrieve`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrieveResponse {
    pub ids: Vec<String>,
    /// Trial titles, parallel to `ids`.
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Response from `GET /meta/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaResponse {
    pub metadata: TrialMetadata,
}

/// Request body for `POST /chat/{model}/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub query: String,
}

/// Response from `POST /chat/{model}/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Response from `GET /heartbeat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    /// Server timestamp in nanoseconds.
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_serialize_omits_unset_fields() {
        let filters = TrialFilters {
            study_type: Some("INTERVENTIONAL".to_string()),
            min_age: Some(18),
            ..Default::default()
        };
        let serialized = serde_json::to_string(&filters).unwrap();
        assert_eq!(serialized, r#"{"studyType":"INTERVENTIONAL","minAge":18}"#);
    }

    #[test]
    fn empty_filters_serialize_to_empty_object() {
        let serialized = serde_json::to_string(&TrialFilters::default()).unwrap();
        assert_eq!(serialized, "{}");
    }

    #[test]
    fn filters_active_count() {
        let mut filters = TrialFilters::default();
        assert_eq!(filters.active_count(), 0);
        filters.eligible_sex = Some("FEMALE".to_string());
        filters.max_age = Some(65);
        assert_eq!(filters.active_count(), 2);
    }

    #[test]
    fn metadata_deserializes_camel_case() {
        let raw = serde_json::json!({
            "shortTitle": "Short",
            "longTitle": "Long",
            "enrollmentCount": 120,
            "acceptsHealthy": true,
            "references": [{"pmid": "123", "citation": "Some citation"}],
            "documents": [{"url": "https://x/prot.pdf", "size": 2048}],
        });
        let meta: TrialMetadata = serde_json::from_value(raw).unwrap();
        assert_eq!(meta.short_title, "Short");
        assert_eq!(meta.enrollment_count, 120);
        assert!(meta.accepts_healthy);
        assert_eq!(meta.references[0].pmid, "123");
        assert_eq!(meta.documents[0].size, 2048);
        // Fields absent from the payload fall back to defaults
        assert_eq!(meta.sponsor, "");
        assert!(meta.conditions.is_empty());
    }

    #[test]
    fn model_id_cycle_and_paths() {
        assert_eq!(ModelId::default(), ModelId::Finetuned);
        assert_eq!(ModelId::Finetuned.as_str(), "6894888983713546240");
        assert_eq!(ModelId::GeminiFlash.as_str(), "gemini-1.5-flash-001");
        assert_eq!(ModelId::Finetuned.next(), ModelId::GeminiFlash);
        assert_eq!(ModelId::GeminiFlash.next(), ModelId::Finetuned);
    }
}
