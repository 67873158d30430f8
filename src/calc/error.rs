use serde_json::json;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("invalid graded item {item_id}: {reason}")]
    InvalidItem { item_id: String, reason: String },

    #[error("invalid category {category_id}: {reason}")]
    InvalidCategory { category_id: String, reason: String },

    #[error("invalid grading scale: {reason}")]
    InvalidScale { reason: String },

    #[error("no grading scale band matches {percentage}")]
    ScaleLookup { percentage: f64 },
}

impl CalcError {
    pub fn invalid_item(item_id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            item_id: item_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_category(category_id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidCategory {
            category_id: category_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_scale(reason: impl Into<String>) -> Self {
        Self::InvalidScale {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidItem { .. } | Self::InvalidCategory { .. } => "validation_error",
            Self::InvalidScale { .. } => "invalid_scale",
            Self::ScaleLookup { .. } => "scale_lookup_failed",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InvalidItem { item_id, .. } => Some(json!({ "itemId": item_id })),
            Self::InvalidCategory { category_id, .. } => {
                Some(json!({ "categoryId": category_id }))
            }
            Self::InvalidScale { .. } => None,
            // NaN does not survive JSON encoding.
            Self::ScaleLookup { percentage } if percentage.is_finite() => {
                Some(json!({ "percentage": percentage }))
            }
            Self::ScaleLookup { .. } => None,
        }
    }
}
