//! Answer synthesis from partial search results.
//!
//! # Scoring
//! ```text
//! each dependency with a non-empty successful result    +0.4
//! total > 0.5 → append advisory                          +0.2 (max 0.9)
//! nothing rendered → fallback by health                  0.1 / 0.2 / 0.2 / 0.3
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::health::HealthSnapshot;
use crate::orchestrator::intent::QueryIntent;
use crate::upstream::DependencyName;

const SOURCE_WEIGHT: f64 = 0.4;
const ADVISORY_THRESHOLD: f64 = 0.5;
const ADVISORY_BONUS: f64 = 0.2;
const MAX_CONFIDENCE: f64 = 0.9;
const MAX_ITEMS: usize = 3;

const ADVISORY: &str =
    "\nFor the most accurate and up-to-date information, please contact the providers directly.";

const ALL_DOWN: &str =
    "I'm sorry, but our healthcare services are temporarily unavailable. Please try again later.";
const HOSPITAL_DOWN: &str =
    "Hospital information is currently unavailable, but other services are working. Please try again later.";
const INSURANCE_DOWN: &str =
    "Insurance information is currently unavailable, but other services are working. Please try again later.";
const NO_MATCH: &str = "I couldn't find specific information for your query, but our services are available. Could you please rephrase your question?";

/// A search record could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("{dependency} record is missing field `{field}`")]
    MissingField {
        dependency: DependencyName,
        field: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub answer: String,
    pub confidence: f64,
}

/// Items of a `{status: "success", data: [...]}` body, if it is one.
pub(crate) fn successful_items(result: Option<&Value>) -> Option<&Vec<Value>> {
    let result = result?;
    if result.get("status").and_then(Value::as_str) != Some("success") {
        return None;
    }
    result.get("data").and_then(Value::as_array)
}

/// Render a record field the way it would read in prose.
pub(crate) fn field_text(
    item: &Value,
    dependency: DependencyName,
    field: &'static str,
) -> Result<String, SynthesisError> {
    match item.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(SynthesisError::MissingField { dependency, field }),
        Some(other) => Ok(other.to_string()),
    }
}

fn hospital_line(item: &Value) -> Result<String, SynthesisError> {
    let dep = DependencyName::Hospital;
    Ok(format!(
        "• {} - {}, Rating: {}/5",
        field_text(item, dep, "name")?,
        field_text(item, dep, "location")?,
        field_text(item, dep, "rating")?
    ))
}

fn plan_line(item: &Value) -> Result<String, SynthesisError> {
    let dep = DependencyName::Insurance;
    Ok(format!(
        "• {} by {} - ${}/month",
        field_text(item, dep, "plan_name")?,
        field_text(item, dep, "provider")?,
        field_text(item, dep, "monthly_premium")?
    ))
}

pub fn synthesize(
    query: &str,
    hospital: Option<&Value>,
    insurance: Option<&Value>,
    health: &HealthSnapshot,
) -> Result<Synthesis, SynthesisError> {
    let intent = QueryIntent::classify(query);
    let mut parts: Vec<String> = Vec::new();
    let mut confidence = 0.0;

    if let Some(hospitals) = successful_items(hospital).filter(|items| !items.is_empty()) {
        confidence += SOURCE_WEIGHT;
        if intent.includes(DependencyName::Hospital) {
            parts.push(format!("I found {} relevant hospitals for you:", hospitals.len()));
            for item in hospitals.iter().take(MAX_ITEMS) {
                parts.push(hospital_line(item)?);
            }
        }
    }

    if let Some(plans) = successful_items(insurance).filter(|items| !items.is_empty()) {
        confidence += SOURCE_WEIGHT;
        if intent.includes(DependencyName::Insurance) {
            parts.push(format!("I found {} relevant insurance plans:", plans.len()));
            for item in plans.iter().take(MAX_ITEMS) {
                parts.push(plan_line(item)?);
            }
        }
    }

    if parts.is_empty() {
        return Ok(fallback(health));
    }

    if confidence > ADVISORY_THRESHOLD {
        parts.push(ADVISORY.to_string());
        confidence = f64::min(confidence + ADVISORY_BONUS, MAX_CONFIDENCE);
    }

    Ok(Synthesis {
        answer: parts.join("\n"),
        confidence,
    })
}

fn fallback(health: &HealthSnapshot) -> Synthesis {
    let hospital_up = health.is_healthy(DependencyName::Hospital);
    let insurance_up = health.is_healthy(DependencyName::Insurance);

    let (answer, confidence) = match (hospital_up, insurance_up) {
        (false, false) => (ALL_DOWN, 0.1),
        (false, true) => (HOSPITAL_DOWN, 0.2),
        (true, false) => (INSURANCE_DOWN, 0.2),
        (true, true) => (NO_MATCH, 0.3),
    };

    Synthesis {
        answer: answer.to_string(),
        confidence,
    }
}
