//! Insurance plan directory.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsurancePlan {
    pub id: &'static str,
    pub provider: &'static str,
    pub plan_name: &'static str,
    #[serde(rename = "type")]
    pub plan_type: &'static str,
    pub monthly_premium: u32,
    pub deductible: u32,
    pub coverage: &'static [&'static str],
    pub network_hospitals: &'static [&'static str],
    pub rating: f64,
}

pub static PLANS: &[InsurancePlan] = &[
    InsurancePlan {
        id: "INS001",
        provider: "HealthFirst Insurance",
        plan_name: "Premium Care Plus",
        plan_type: "HMO",
        monthly_premium: 450,
        deductible: 1000,
        coverage: &["Emergency", "Surgery", "Prescription", "Dental"],
        network_hospitals: &["H001", "H002"],
        rating: 4.3,
    },
    InsurancePlan {
        id: "INS002",
        provider: "MediCare Solutions",
        plan_name: "Family Health Plan",
        plan_type: "PPO",
        monthly_premium: 650,
        deductible: 500,
        coverage: &["Emergency", "Surgery", "Prescription", "Mental Health", "Vision"],
        network_hospitals: &["H001", "H003"],
        rating: 4.1,
    },
    InsurancePlan {
        id: "INS003",
        provider: "Basic Health Co",
        plan_name: "Essential Coverage",
        plan_type: "Bronze",
        monthly_premium: 250,
        deductible: 2500,
        coverage: &["Emergency", "Basic Surgery"],
        network_hospitals: &["H002"],
        rating: 3.8,
    },
    InsurancePlan {
        id: "INS004",
        provider: "Elite Medical Insurance",
        plan_name: "Platinum Select",
        plan_type: "Platinum",
        monthly_premium: 850,
        deductible: 200,
        coverage: &[
            "Emergency",
            "Surgery",
            "Prescription",
            "Dental",
            "Vision",
            "Mental Health",
            "Alternative Medicine",
        ],
        network_hospitals: &["H001", "H002", "H003"],
        rating: 4.7,
    },
];

const BUDGET_WORDS: &[&str] = &["cheap", "affordable", "budget"];
const QUALITY_WORDS: &[&str] = &["premium", "best", "high"];
const SHORTLIST: usize = 2;

pub fn find(id: &str) -> Option<&'static InsurancePlan> {
    PLANS.iter().find(|p| p.id == id)
}

/// Plans accepted at the given hospital.
pub fn compatible_with(hospital_id: &str) -> Vec<&'static InsurancePlan> {
    PLANS
        .iter()
        .filter(|p| p.network_hospitals.contains(&hospital_id))
        .collect()
}

/// Text match on provider, plan name, type, or mentioned coverage.
/// Budget words return the cheapest plans and quality words the
/// best-rated ones, overriding the text match.
pub fn search(query: &str) -> Vec<&'static InsurancePlan> {
    let query = query.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| query.contains(w));

    if mentions(BUDGET_WORDS) {
        let mut plans: Vec<_> = PLANS.iter().collect();
        plans.sort_by_key(|p| p.monthly_premium);
        plans.truncate(SHORTLIST);
        return plans;
    }
    if mentions(QUALITY_WORDS) {
        let mut plans: Vec<_> = PLANS.iter().collect();
        plans.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        plans.truncate(SHORTLIST);
        return plans;
    }

    let matches: Vec<_> = PLANS
        .iter()
        .filter(|p| {
            p.provider.to_lowercase().contains(&query)
                || p.plan_name.to_lowercase().contains(&query)
                || p.plan_type.to_lowercase().contains(&query)
                || p.coverage.iter().any(|c| query.contains(&c.to_lowercase()))
        })
        .collect();

    if matches.is_empty() {
        PLANS.iter().collect()
    } else {
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(plans: &[&InsurancePlan]) -> Vec<&'static str> {
        plans.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_budget_words() {
        assert_eq!(ids(&search("something affordable")), vec!["INS003", "INS001"]);
    }

    #[test]
    fn test_quality_words() {
        assert_eq!(ids(&search("best plan")), vec!["INS004", "INS001"]);
    }

    #[test]
    fn test_coverage_match() {
        assert_eq!(ids(&search("need vision care")), vec!["INS002", "INS004"]);
    }

    #[test]
    fn test_compatible_with() {
        assert_eq!(ids(&compatible_with("H003")), vec!["INS002", "INS004"]);
        assert!(compatible_with("H404").is_empty());
    }

    #[test]
    fn test_type_serialized_as_type() {
        let value = serde_json::to_value(find("INS003").unwrap()).unwrap();
        assert_eq!(value["type"], "Bronze");
        assert_eq!(value["monthly_premium"], 250);
    }
}
