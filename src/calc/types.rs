use serde::{Deserialize, Serialize};

use super::error::CalcError;

pub const UNCATEGORIZED_ID: &str = "uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFlags {
    pub late: bool,
    pub excused: bool,
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedItem {
    pub id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    /// `None` means not graded yet.
    #[serde(default)]
    pub points_earned: Option<f64>,
    pub points_possible: f64,
    #[serde(default)]
    pub flags: ItemFlags,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreState {
    Excused,
    Ungraded,
    Scored(f64),
}

impl GradedItem {
    pub fn validate(&self) -> Result<(), CalcError> {
        if !self.points_possible.is_finite() || self.points_possible <= 0.0 {
            return Err(CalcError::invalid_item(
                &self.id,
                format!("pointsPossible must be > 0 (got {})", self.points_possible),
            ));
        }
        if let Some(earned) = self.points_earned {
            if !earned.is_finite() || earned < 0.0 {
                return Err(CalcError::invalid_item(
                    &self.id,
                    format!("pointsEarned must be >= 0 (got {})", earned),
                ));
            }
        }
        Ok(())
    }

    // Excused wins over missing. Late has no effect.
    pub fn score_state(&self) -> ScoreState {
        if self.flags.excused {
            ScoreState::Excused
        } else if self.flags.missing {
            ScoreState::Scored(0.0)
        } else {
            match self.points_earned {
                Some(v) => ScoreState::Scored(v),
                None => ScoreState::Ungraded,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub drop_lowest: u32,
}

impl Category {
    pub fn uncategorized(weight: f64) -> Self {
        Self {
            id: UNCATEGORIZED_ID.to_string(),
            name: "Uncategorized".to_string(),
            weight,
            drop_lowest: 0,
        }
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if !self.weight.is_finite() || !(0.0..=100.0).contains(&self.weight) {
            return Err(CalcError::invalid_category(
                &self.id,
                format!("weight must be in 0..=100 (got {})", self.weight),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub category_id: String,
    #[serde(default)]
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub points_earned: f64,
    #[serde(default)]
    pub points_possible: f64,
    /// `None` when nothing in the category has been scored.
    pub percentage: Option<f64>,
    pub letter: Option<String>,
    #[serde(default)]
    pub scored_count: usize,
    #[serde(default)]
    pub dropped_item_ids: Vec<String>,
    #[serde(default)]
    pub excused_count: usize,
    #[serde(default)]
    pub missing_count: usize,
    #[serde(default)]
    pub ungraded_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    pub percentage: f64,
    pub letter: String,
    pub gpa: Option<f64>,
    pub active_weight: f64,
    pub category_results: Vec<CategoryResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Graded,
    NoGrades,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub student_id: Option<String>,
    pub status: ReportStatus,
    pub percentage: Option<f64>,
    pub letter: Option<String>,
    pub gpa: Option<f64>,
    pub active_weight: f64,
    pub categories: Vec<CategoryResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    pub uncategorized_weight: f64,
    /// Extra credit above 100 in any category fails the lookup when set.
    pub category_letters: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            uncategorized_weight: 0.0,
            category_letters: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(earned: Option<f64>, possible: f64, flags: ItemFlags) -> GradedItem {
        GradedItem {
            id: "i1".into(),
            category_id: None,
            points_earned: earned,
            points_possible: possible,
            flags,
        }
    }

    #[test]
    fn missing_counts_as_zero_and_excused_wins() {
        let missing = ItemFlags {
            missing: true,
            ..Default::default()
        };
        assert_eq!(
            item(Some(7.0), 10.0, missing).score_state(),
            ScoreState::Scored(0.0)
        );

        let both = ItemFlags {
            missing: true,
            excused: true,
            late: false,
        };
        assert_eq!(item(None, 10.0, both).score_state(), ScoreState::Excused);

        let late = ItemFlags {
            late: true,
            ..Default::default()
        };
        assert_eq!(
            item(Some(6.0), 10.0, late).score_state(),
            ScoreState::Scored(6.0)
        );
        assert_eq!(
            item(None, 10.0, ItemFlags::default()).score_state(),
            ScoreState::Ungraded
        );
    }

    #[test]
    fn validate_rejects_bad_points() {
        assert!(item(Some(-1.0), 10.0, ItemFlags::default())
            .validate()
            .is_err());
        assert!(item(Some(1.0), 0.0, ItemFlags::default()).validate().is_err());
        assert!(item(None, f64::NAN, ItemFlags::default()).validate().is_err());
        // Extra credit is allowed.
        assert!(item(Some(12.0), 10.0, ItemFlags::default())
            .validate()
            .is_ok());
    }

    #[test]
    fn item_deserializes_with_defaults() {
        let raw = serde_json::json!({ "id": "a", "pointsPossible": 5 });
        let parsed: GradedItem = serde_json::from_value(raw).expect("parse item");
        assert_eq!(parsed.category_id, None);
        assert_eq!(parsed.points_earned, None);
        assert_eq!(parsed.flags, ItemFlags::default());
    }
}
