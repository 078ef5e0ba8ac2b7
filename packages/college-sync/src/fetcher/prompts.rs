//! Prompts for ranked college retrieval.
//!
//! Templates use `{placeholder}` markers filled from the domain config and the
//! requested rank window.

use crate::domain::DomainConfig;
use crate::window::RankWindow;

pub const SYSTEM_PROMPT: &str = r#"You are a precise research assistant compiling official college ranking data.
Use the most recent published ranking and official institution sources.
Return only data you can attribute to a source. Never invent institutions.
If a field is unknown, leave it empty instead of guessing."#;

/// User prompt for the structured-output variant. The response shape is
/// enforced by the attached schema.
pub const STRUCTURED_USER_PROMPT: &str = r#"List the {count} {plural} ranked {start} to {end} in the latest {category} ranking, in rank order.

For each {singular}, provide:
{checklist}"#;

/// User prompt for the legacy variant, which has no schema and must describe
/// the output format itself.
pub const LEGACY_USER_PROMPT: &str = r#"List the {count} {plural} ranked {start} to {end} in the latest {category} ranking, in rank order.

For each {singular}, provide:
{checklist}

Respond with a JSON array of objects only, using exactly these keys:
name, location, type, annualFee, entranceExamRequired, entranceExamDate, flagshipCourse, website, eligibility, approvedBy, sourceUrl.
Do not add commentary before or after the array."#;

/// Numbered field checklist embedded in both user prompts.
pub fn field_checklist(domain: &DomainConfig) -> String {
    let course = domain.flagship_course;
    [
        "name: official institution name".to_string(),
        "location: city and state".to_string(),
        "type: Government, Private, Deemed or Autonomous".to_string(),
        format!("annualFee: annual tuition fee for {course}, with currency"),
        format!("entranceExamRequired: entrance exam(s) accepted for {course} admission"),
        "entranceExamDate: upcoming date(s) of those exams, in the same order".to_string(),
        format!("flagshipCourse: {course}"),
        "website: official website URL".to_string(),
        format!("eligibility: eligibility criteria for {course}"),
        "approvedBy: approving or accrediting bodies".to_string(),
        "sourceUrl: URL the information was taken from".to_string(),
    ]
    .iter()
    .enumerate()
    .map(|(i, item)| format!("{}. {}", i + 1, item))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Fill a user prompt template for one window.
pub fn user_prompt(template: &str, domain: &DomainConfig, window: RankWindow) -> String {
    template
        .replace("{count}", &window.width().to_string())
        .replace("{plural}", domain.plural)
        .replace("{singular}", domain.singular)
        .replace("{category}", domain.ranking_category)
        .replace("{start}", &window.start().to_string())
        .replace("{end}", &window.end().to_string())
        .replace("{checklist}", &field_checklist(domain))
}
