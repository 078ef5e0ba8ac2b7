//! Canonical college record and the sanitizer that produces it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ranked institution.
///
/// Every optional field is either absent or a non-empty string with internal
/// whitespace collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub institution_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance_exam_required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance_exam_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagship_course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl CollegeRecord {
    /// Record with only a name; the name is not sanitized here.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            institution_type: None,
            annual_fee: None,
            entrance_exam_required: None,
            entrance_exam_date: None,
            flagship_course: None,
            website: None,
            eligibility: None,
            approved_by: None,
            source_url: None,
        }
    }

    /// Lowercased alphanumerics of the name, used to spot the same
    /// institution returned twice.
    pub fn identity_key(&self) -> String {
        self.name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Raw JSON object equivalent, accepted by [`sanitize`].
    pub fn to_raw(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Shape the upstream is asked to produce.
///
/// Only used to derive the structured output schema; responses are read
/// field by field through [`sanitize`] so one malformed entry cannot sink
/// the whole batch.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamCollege {
    /// Official institution name
    pub name: String,
    /// City and state
    pub location: String,
    /// Government, Private, Deemed, Autonomous, ...
    #[serde(rename = "type")]
    pub institution_type: String,
    /// Annual tuition fee for the flagship course, with currency
    pub annual_fee: Option<String>,
    /// Entrance exam(s) accepted for admission
    pub entrance_exam_required: String,
    /// Date(s) of the entrance exam(s)
    pub entrance_exam_date: Option<String>,
    /// Flagship undergraduate course
    pub flagship_course: Option<String>,
    /// Official website URL
    pub website: Option<String>,
    /// Eligibility criteria for the flagship course
    pub eligibility: Option<String>,
    /// Approving or accrediting bodies
    pub approved_by: Option<String>,
    /// URL the information was taken from
    pub source_url: Option<String>,
}

/// Collapse runs of whitespace to single spaces and trim. Empty becomes `None`.
pub fn clean_text(text: &str) -> Option<String> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Render a scalar (or list of scalars) as text.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|v| !v.is_array())
                .filter_map(value_text)
                .collect();
            clean_text(&parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// First usable value among a field's accepted keys.
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(value_text))
}

/// Map a raw upstream object to a [`CollegeRecord`].
///
/// Returns `None` for non-objects and for objects without a usable name.
pub fn sanitize(raw: &Value) -> Option<CollegeRecord> {
    let obj = raw.as_object()?;
    let name = field(obj, &["name", "collegeName", "college_name"])?;

    Some(CollegeRecord {
        name,
        location: field(obj, &["location"]),
        institution_type: field(obj, &["type", "institutionType", "institution_type"]),
        annual_fee: field(obj, &["annualFee", "annual_fee", "fee"]),
        entrance_exam_required: field(
            obj,
            &["entranceExamRequired", "entrance_exam_required", "entranceExam"],
        ),
        entrance_exam_date: field(
            obj,
            &["entranceExamDate", "entrance_exam_date", "examDate"],
        ),
        flagship_course: field(obj, &["flagshipCourse", "flagship_course", "course"]),
        website: field(obj, &["website", "url"]),
        eligibility: field(obj, &["eligibility"]),
        approved_by: field(obj, &["approvedBy", "approved_by", "approvals"]),
        source_url: field(obj, &["sourceUrl", "source_url", "source"]),
    })
}

/// Sanitize every element of a batch, dropping entries without a name.
pub fn sanitize_all(items: &[Value]) -> Vec<CollegeRecord> {
    let records: Vec<CollegeRecord> = items.iter().filter_map(sanitize).collect();
    let dropped = items.len() - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "Dropped entries without a usable name");
    }
    records
}
