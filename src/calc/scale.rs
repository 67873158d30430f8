use serde::{Deserialize, Serialize};

use super::error::CalcError;

pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Bands written as `80..89.99` / `90..100` leave a seam below the next
/// band's `min`; seams up to this width belong to the lower band.
pub const SEAM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBand {
    pub letter: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub gpa: Option<f64>,
}

impl ScaleBand {
    pub fn new(letter: &str, min: f64, max: f64, gpa: Option<f64>) -> Self {
        Self {
            letter: letter.to_string(),
            min,
            max,
            gpa,
        }
    }
}

// Bands are kept sorted by `min` descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScaleBand>", into = "Vec<ScaleBand>")]
pub struct GradingScale {
    bands: Vec<ScaleBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeLookup {
    pub letter: String,
    pub gpa: Option<f64>,
}

impl GradingScale {
    pub fn new(mut bands: Vec<ScaleBand>) -> Result<Self, CalcError> {
        if bands.is_empty() {
            return Err(CalcError::invalid_scale("scale has no bands"));
        }
        for b in &bands {
            if b.letter.trim().is_empty() {
                return Err(CalcError::invalid_scale("band letter must not be empty"));
            }
            if !b.min.is_finite() || !b.max.is_finite() {
                return Err(CalcError::invalid_scale(format!(
                    "band {} bounds must be finite",
                    b.letter
                )));
            }
            if b.min < 0.0 || b.max > 100.0 || b.min > b.max {
                return Err(CalcError::invalid_scale(format!(
                    "band {} must satisfy 0 <= min <= max <= 100 (got {}..{})",
                    b.letter, b.min, b.max
                )));
            }
            if let Some(gpa) = b.gpa {
                if !gpa.is_finite() {
                    return Err(CalcError::invalid_scale(format!(
                        "band {} gpa must be finite",
                        b.letter
                    )));
                }
            }
        }

        // Bounds are finite here, so total_cmp agrees with numeric order.
        bands.sort_by(|a, b| b.min.total_cmp(&a.min).then(b.max.total_cmp(&a.max)));

        for pair in bands.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            // Touching bands (lower.max == upper.min) are fine: the shared
            // point resolves to the upper band.
            if lower.min == upper.min || lower.max > upper.min {
                return Err(CalcError::invalid_scale(format!(
                    "bands {} ({}..{}) and {} ({}..{}) overlap",
                    upper.letter, upper.min, upper.max, lower.letter, lower.min, lower.max
                )));
            }
        }

        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[ScaleBand] {
        &self.bands
    }

    fn ceiling(&self, idx: usize) -> f64 {
        let band = &self.bands[idx];
        if idx == 0 {
            return band.max;
        }
        let upper_min = self.bands[idx - 1].min;
        if upper_min - band.max <= SEAM_TOLERANCE + BOUNDARY_EPSILON {
            upper_min
        } else {
            band.max
        }
    }

    pub fn lookup(&self, percentage: f64) -> Result<&ScaleBand, CalcError> {
        if percentage.is_finite() {
            for (idx, band) in self.bands.iter().enumerate() {
                if percentage + BOUNDARY_EPSILON >= band.min
                    && percentage <= self.ceiling(idx) + BOUNDARY_EPSILON
                {
                    return Ok(band);
                }
            }
        }
        Err(CalcError::ScaleLookup { percentage })
    }

    pub fn gaps(&self) -> Vec<(f64, f64)> {
        let mut gaps = Vec::new();
        let top = &self.bands[0];
        if top.max < 100.0 - BOUNDARY_EPSILON {
            gaps.push((top.max, 100.0));
        }
        for idx in 1..self.bands.len() {
            let upper_min = self.bands[idx - 1].min;
            if self.ceiling(idx) < upper_min - BOUNDARY_EPSILON {
                gaps.push((self.bands[idx].max, upper_min));
            }
        }
        if let Some(bottom) = self.bands.last() {
            if bottom.min > BOUNDARY_EPSILON {
                gaps.push((0.0, bottom.min));
            }
        }
        gaps
    }

    pub fn is_complete(&self) -> bool {
        self.gaps().is_empty()
    }
}

impl Default for GradingScale {
    fn default() -> Self {
        Self {
            bands: vec![
                ScaleBand::new("A", 90.0, 100.0, Some(4.0)),
                ScaleBand::new("B", 80.0, 89.99, Some(3.0)),
                ScaleBand::new("C", 70.0, 79.99, Some(2.0)),
                ScaleBand::new("D", 60.0, 69.99, Some(1.0)),
                ScaleBand::new("F", 0.0, 59.99, Some(0.0)),
            ],
        }
    }
}

impl TryFrom<Vec<ScaleBand>> for GradingScale {
    type Error = CalcError;

    fn try_from(bands: Vec<ScaleBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<GradingScale> for Vec<ScaleBand> {
    fn from(scale: GradingScale) -> Self {
        scale.bands
    }
}

pub fn lookup_grade(percentage: f64, scale: &GradingScale) -> Result<GradeLookup, CalcError> {
    let band = scale.lookup(percentage)?;
    Ok(GradeLookup {
        letter: band.letter.clone(),
        gpa: band.gpa,
    })
}
