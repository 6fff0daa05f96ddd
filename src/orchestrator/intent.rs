//! Keyword-based query intent.
//!
//! A query may lean hospital, insurance, both, or neither. A dependency's
//! text is dropped only when the query names the other domain and not its own.

use crate::upstream::DependencyName;

const HOSPITAL_TERMS: &[&str] = &["hospital", "doctor", "medical", "treatment", "emergency"];
const INSURANCE_TERMS: &[&str] = &["insurance", "plan", "coverage", "premium", "deductible"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryIntent {
    pub hospital: bool,
    pub insurance: bool,
}

impl QueryIntent {
    pub fn classify(query: &str) -> Self {
        let query = query.to_lowercase();
        let mentions = |terms: &[&str]| terms.iter().any(|term| query.contains(term));

        Self {
            hospital: mentions(HOSPITAL_TERMS),
            insurance: mentions(INSURANCE_TERMS),
        }
    }

    /// Whether text from `dep` belongs in the answer.
    pub fn includes(&self, dep: DependencyName) -> bool {
        match dep {
            DependencyName::Hospital => self.hospital || !self.insurance,
            DependencyName::Insurance => self.insurance || !self.hospital,
            DependencyName::Rag => false,
        }
    }
}
