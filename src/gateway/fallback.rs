//! Direct-call summary used when the orchestrator is unreachable.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::orchestrator::synthesis::{field_text, successful_items, SynthesisError};
use crate::upstream::DependencyName;

const HEADER: &str = "I found the following information:\n";
const UNAVAILABLE: &str = "Services are temporarily unavailable. Please try again later.";
const MAX_ITEMS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSummary {
    pub answer: String,
    pub confidence: f64,
    /// Raw bodies of the services that answered successfully.
    pub sources: BTreeMap<DependencyName, Value>,
}

pub fn summarize(
    hospital: Option<Value>,
    insurance: Option<Value>,
) -> Result<FallbackSummary, SynthesisError> {
    let mut answer = String::from(HEADER);
    let mut sources = BTreeMap::new();

    let sections: [(DependencyName, Option<Value>, &str, LineRenderer); 2] = [
        (DependencyName::Hospital, hospital, "Hospitals", hospital_line),
        (DependencyName::Insurance, insurance, "Insurance Plans", plan_line),
    ];

    for (dep, body, heading, render) in sections {
        let Some(body) = body.filter(is_success) else {
            continue;
        };
        if let Some(items) = successful_items(Some(&body)).filter(|items| !items.is_empty()) {
            answer.push_str(&format!("\n{} ({} found):\n", heading, items.len()));
            for item in items.iter().take(MAX_ITEMS) {
                answer.push_str(&render(item)?);
                answer.push('\n');
            }
        }
        sources.insert(dep, body);
    }

    if sources.is_empty() {
        return Ok(FallbackSummary {
            answer: UNAVAILABLE.to_string(),
            confidence: 0.1,
            sources,
        });
    }

    Ok(FallbackSummary {
        answer,
        confidence: 0.7,
        sources,
    })
}

type LineRenderer = fn(&Value) -> Result<String, SynthesisError>;

fn is_success(body: &Value) -> bool {
    body.get("status").and_then(Value::as_str) == Some("success")
}

fn hospital_line(item: &Value) -> Result<String, SynthesisError> {
    let dep = DependencyName::Hospital;
    Ok(format!(
        "• {} - {}",
        field_text(item, dep, "name")?,
        field_text(item, dep, "location")?
    ))
}

fn plan_line(item: &Value) -> Result<String, SynthesisError> {
    let dep = DependencyName::Insurance;
    Ok(format!(
        "• {} - ${}/month",
        field_text(item, dep, "plan_name")?,
        field_text(item, dep, "monthly_premium")?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hospital_only() {
        let hospital = json!({"status": "success", "data": [
            {"name": "City General Hospital", "location": "Downtown"},
            {"name": "St. Mary's Medical Center", "location": "North Side"},
            {"name": "Regional Specialty Clinic", "location": "Suburbs"},
        ]});

        let summary = summarize(Some(hospital), None).unwrap();

        assert_eq!(summary.confidence, 0.7);
        assert_eq!(
            summary.answer,
            "I found the following information:\n\nHospitals (3 found):\n\
             • City General Hospital - Downtown\n• St. Mary's Medical Center - North Side\n"
        );
        assert!(summary.sources.contains_key(&DependencyName::Hospital));
        assert!(!summary.sources.contains_key(&DependencyName::Insurance));
    }

    #[test]
    fn test_nothing_answered() {
        let failed = json!({"status": "error"});
        let summary = summarize(Some(failed), None).unwrap();
        assert_eq!(summary.answer, UNAVAILABLE);
        assert_eq!(summary.confidence, 0.1);
        assert!(summary.sources.is_empty());
    }

    #[test]
    fn test_empty_success_still_counts_as_source() {
        let empty = json!({"status": "success", "data": []});
        let summary = summarize(None, Some(empty)).unwrap();
        assert_eq!(summary.answer, HEADER);
        assert_eq!(summary.confidence, 0.7);
    }

    #[test]
    fn test_plan_lines() {
        let insurance = json!({"status": "success", "data": [
            {"plan_name": "Essential Coverage", "monthly_premium": 250}
        ]});
        let summary = summarize(None, Some(insurance)).unwrap();
        assert!(summary.answer.contains("\nInsurance Plans (1 found):\n• Essential Coverage - $250/month\n"));
    }

    #[test]
    fn test_malformed_record() {
        let insurance = json!({"status": "success", "data": [{"plan_name": "x"}]});
        assert!(summarize(None, Some(insurance)).is_err());
    }
}
