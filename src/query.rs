use crate::report::IncidentType;
use serde_derive::{Deserialize, Serialize};

/// How many results to keep per search query.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl Sensitivity {
    #[inline]
    pub fn top_k(self) -> usize {
        match self {
            Sensitivity::Low => 3,
            Sensitivity::Medium => 5,
            Sensitivity::High => 10,
        }
    }
}

impl IncidentType {
    /// Canned natural-language searches for this category. `Custom` and
    /// `Other` rely entirely on the caller's own query.
    pub fn queries(&self) -> &'static [&'static str] {
        match self {
            IncidentType::UnauthorizedAccess => &[
                "person entering restricted area without authorization",
                "unauthorized entry through door",
                "person bypassing security checkpoint",
                "intruder in secure zone",
                "person without badge entering building",
            ],
            IncidentType::Tailgating => &[
                "person follows another person through a door without swiping",
                "two people enter at once through a secure door",
                "unauthorized entry behind someone",
                "person slipping through door behind employee",
                "tailgating at entrance",
            ],
            IncidentType::Loitering => &[
                "person standing idle near entrance",
                "person lingering in hallway",
                "suspicious person waiting outside",
                "person loitering near door",
                "person standing around doing nothing",
            ],
            IncidentType::SuspiciousObject => &[
                "person leaves a bag",
                "unattended backpack",
                "abandoned package",
                "person drops object and walks away",
                "suspicious package left behind",
            ],
            IncidentType::FightAssault => &[
                "people fighting",
                "physical altercation",
                "violent confrontation",
                "person attacking another",
                "aggressive behavior between people",
            ],
            IncidentType::AfterHours => &[
                "person walking in building at night",
                "intruder after closing hours",
                "movement in empty building",
                "person in office after hours",
                "late night unauthorized presence",
            ],
            IncidentType::Shoplifting => &[
                "person concealing merchandise",
                "shoplifting in store",
                "person hiding product in bag",
                "theft in progress",
                "person stealing item",
            ],
            IncidentType::Custom | IncidentType::Other(_) => &[],
        }
    }
}

/// Category queries followed by the trimmed custom query, if any.
pub fn expand_queries(incident: &IncidentType, custom: Option<&str>) -> Vec<String> {
    let mut queries: Vec<String> = incident.queries().iter().map(|q| q.to_string()).collect();

    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        queries.push(custom.to_string());
    }

    queries
}
