use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calc::{AggregateOptions, GradingScale};

pub const GRADING_SETTINGS_KEY: &str = "setup.grading";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingSettings {
    pub uncategorized_weight: f64,
    pub category_letters: bool,
    pub default_scale: GradingScale,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            uncategorized_weight: 0.0,
            category_letters: false,
            default_scale: GradingScale::default(),
        }
    }
}

impl GradingSettings {
    pub fn options(&self) -> AggregateOptions {
        AggregateOptions {
            uncategorized_weight: self.uncategorized_weight,
            category_letters: self.category_letters,
        }
    }

    // All or nothing.
    pub fn merge_patch(&mut self, patch: &Map<String, Value>) -> Result<(), String> {
        let mut next = self.clone();
        for (k, v) in patch {
            match k.as_str() {
                "uncategorizedWeight" => {
                    next.uncategorized_weight = parse_f64_range(v, k, 0.0, 100.0)?;
                }
                "categoryLetters" => {
                    next.category_letters = parse_bool(v, k)?;
                }
                "defaultScale" => {
                    next.default_scale = serde_json::from_value(v.clone())
                        .map_err(|e| format!("{} is invalid: {}", k, e))?;
                }
                _ => return Err(format!("unknown grading field: {}", k)),
            }
        }
        *self = next;
        Ok(())
    }

    pub fn from_saved(saved: Option<&Value>) -> Self {
        let mut current = Self::default();
        if let Some(obj) = saved.and_then(|v| v.as_object()) {
            for (k, v) in obj {
                let mut single = Map::new();
                single.insert(k.clone(), v.clone());
                // Best-effort: malformed historical values fall back to defaults.
                let _ = current.merge_patch(&single);
            }
        }
        current
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn parse_bool(v: &Value, key: &str) -> Result<bool, String> {
    v.as_bool().ok_or_else(|| format!("{} must be boolean", key))
}

fn parse_f64_range(v: &Value, key: &str, min: f64, max: f64) -> Result<f64, String> {
    let n = v.as_f64().ok_or_else(|| format!("{} must be a number", key))?;
    if !(min..=max).contains(&n) {
        return Err(format!("{} must be in {}..={}", key, min, max));
    }
    Ok(n)
}
