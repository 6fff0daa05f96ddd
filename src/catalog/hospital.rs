//! Hospital directory.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hospital {
    pub id: &'static str,
    pub name: &'static str,
    pub specialties: &'static [&'static str],
    pub location: &'static str,
    pub rating: f64,
    pub doctors: u32,
    pub emergency_services: bool,
}

pub static HOSPITALS: &[Hospital] = &[
    Hospital {
        id: "H001",
        name: "City General Hospital",
        specialties: &["Cardiology", "Neurology", "Emergency"],
        location: "Downtown",
        rating: 4.5,
        doctors: 150,
        emergency_services: true,
    },
    Hospital {
        id: "H002",
        name: "St. Mary's Medical Center",
        specialties: &["Oncology", "Pediatrics", "Surgery"],
        location: "North Side",
        rating: 4.2,
        doctors: 120,
        emergency_services: true,
    },
    Hospital {
        id: "H003",
        name: "Regional Specialty Clinic",
        specialties: &["Dermatology", "Orthopedics"],
        location: "Suburbs",
        rating: 4.0,
        doctors: 80,
        emergency_services: false,
    },
];

pub fn find(id: &str) -> Option<&'static Hospital> {
    HOSPITALS.iter().find(|h| h.id == id)
}

/// Hospitals whose name or location contains the query, or whose
/// specialty the query mentions. Falls back to every hospital.
pub fn search(query: &str) -> Vec<&'static Hospital> {
    let query = query.to_lowercase();
    let matches: Vec<_> = HOSPITALS
        .iter()
        .filter(|h| {
            h.name.to_lowercase().contains(&query)
                || h.location.to_lowercase().contains(&query)
                || h.specialties.iter().any(|s| query.contains(&s.to_lowercase()))
        })
        .collect();

    if matches.is_empty() {
        HOSPITALS.iter().collect()
    } else {
        matches
    }
}
