//! Intake payload types.
//!
//! These arrive already parsed from the ingestion layer: a user profile
//! (rank, experience inventory) and a position-requirements record (Key
//! Accountabilities grouped by LC4Q area, location factors). The core
//! treats their textual content as opaque; only the Key Accountability
//! structure drives orchestration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::capability::CompetencyArea;

/// One entry in the officer's experience inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceItem {
    /// "2023 - Senior Constable - Brisbane" style header.
    pub year_rank_location: String,
    /// Free-text summary of the experience.
    pub summary: String,
    /// Skills the officer associates with the experience.
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Career data for the officer seeking promotion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub current_rank: String,
    #[serde(default)]
    pub years_of_service: u32,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
}

/// A position-specific responsibility area an example must demonstrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyAccountability {
    /// Stable identifier used to tie examples to this accountability.
    pub id: String,
    /// LC4Q area this accountability is grouped under.
    pub area: CompetencyArea,
    /// The accountability statement from the position description.
    pub statement: String,
    /// LC4Q sub-items an example for this accountability must cover.
    #[serde(default)]
    pub competency_items: Vec<String>,
}

/// Parsed requirements for the target position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRequirements {
    pub position_title: String,
    pub rank_level: String,
    pub key_accountabilities: Vec<KeyAccountability>,
    #[serde(default)]
    pub location_factors: BTreeMap<String, String>,
    #[serde(default)]
    pub operational_priorities: Vec<String>,
}

impl PositionRequirements {
    /// Accountabilities grouped under a given LC4Q area, in declaration order.
    pub fn accountabilities_in(&self, area: CompetencyArea) -> Vec<&KeyAccountability> {
        self.key_accountabilities
            .iter()
            .filter(|ka| ka.area == area)
            .collect()
    }

    /// LC4Q areas that have at least one accountability, in fixed area order.
    pub fn areas_present(&self) -> Vec<CompetencyArea> {
        CompetencyArea::ALL
            .into_iter()
            .filter(|area| self.key_accountabilities.iter().any(|ka| ka.area == *area))
            .collect()
    }

    /// Look up an accountability by id.
    pub fn accountability(&self, id: &str) -> Option<&KeyAccountability> {
        self.key_accountabilities.iter().find(|ka| ka.id == id)
    }
}

/// The two intake payloads handed to `SessionController::start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInput {
    pub profile: UserProfile,
    pub position: PositionRequirements,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_with_areas() -> PositionRequirements {
        PositionRequirements {
            position_title: "Sergeant".into(),
            rank_level: "SGT".into(),
            key_accountabilities: vec![
                KeyAccountability {
                    id: "ka-1".into(),
                    area: CompetencyArea::Results,
                    statement: "Lead frontline teams".into(),
                    competency_items: vec!["Inspires others".into()],
                },
                KeyAccountability {
                    id: "ka-2".into(),
                    area: CompetencyArea::Results,
                    statement: "Drive outcomes".into(),
                    competency_items: vec![],
                },
            ],
            location_factors: BTreeMap::new(),
            operational_priorities: vec![],
        }
    }

    #[test]
    fn test_areas_present_skips_empty_areas() {
        let position = position_with_areas();
        assert_eq!(position.areas_present(), vec![CompetencyArea::Results]);
    }

    #[test]
    fn test_accountability_lookup() {
        let position = position_with_areas();
        assert!(position.accountability("ka-2").is_some());
        assert!(position.accountability("ka-9").is_none());
        assert_eq!(
            position.accountabilities_in(CompetencyArea::Results).len(),
            2
        );
    }
}
