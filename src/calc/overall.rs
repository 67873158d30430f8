use super::error::CalcError;
use super::scale::{lookup_grade, GradingScale};
use super::types::{CategoryResult, OverallResult};

pub fn active_categories(results: &[CategoryResult]) -> Vec<(&CategoryResult, f64)> {
    results
        .iter()
        .filter_map(|r| r.percentage.map(|p| (r, p)))
        .collect()
}

/// Categories with no scored work leave both the sum and the weight total.
/// `Ok(None)` means no grade yet.
pub fn aggregate_overall(
    results: &[CategoryResult],
    scale: &GradingScale,
) -> Result<Option<OverallResult>, CalcError> {
    for r in results {
        if !r.weight.is_finite() || r.weight < 0.0 {
            return Err(CalcError::invalid_category(
                &r.category_id,
                format!("weight must be >= 0 (got {})", r.weight),
            ));
        }
        if r.percentage.is_some_and(|p| !p.is_finite()) {
            return Err(CalcError::invalid_category(
                &r.category_id,
                "percentage must be finite",
            ));
        }
    }

    let active = active_categories(results);
    let active_weight: f64 = active.iter().map(|(r, _)| r.weight).sum();
    if active_weight <= 0.0 {
        return Ok(None);
    }

    let weighted: f64 = active.iter().map(|(r, p)| p * r.weight).sum();
    let percentage = weighted / active_weight;
    let grade = lookup_grade(percentage, scale)?;

    Ok(Some(OverallResult {
        percentage,
        letter: grade.letter,
        gpa: grade.gpa,
        active_weight,
        category_results: results.to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::scale::ScaleBand;

    fn scale() -> GradingScale {
        GradingScale::new(vec![
            ScaleBand::new("A", 90.0, 100.0, Some(4.0)),
            ScaleBand::new("B", 80.0, 89.99, Some(3.0)),
            ScaleBand::new("C", 70.0, 79.99, Some(2.0)),
            ScaleBand::new("F", 0.0, 69.99, Some(0.0)),
        ])
        .unwrap()
    }

    fn result(id: &str, weight: f64, percentage: Option<f64>) -> CategoryResult {
        CategoryResult {
            category_id: id.to_string(),
            name: id.to_string(),
            weight,
            points_earned: 0.0,
            points_possible: 0.0,
            percentage,
            letter: None,
            scored_count: 0,
            dropped_item_ids: Vec::new(),
            excused_count: 0,
            missing_count: 0,
            ungraded_count: 0,
        }
    }

    #[test]
    fn empty_category_renormalizes_instead_of_zeroing() {
        let results = vec![result("hw", 20.0, Some(85.0)), result("exams", 80.0, None)];
        let overall = aggregate_overall(&results, &scale()).unwrap().unwrap();
        assert!((overall.percentage - 85.0).abs() < 1e-9);
        assert_eq!(overall.active_weight, 20.0);
        assert_eq!(overall.letter, "B");
        assert_eq!(overall.gpa, Some(3.0));
        assert_eq!(overall.category_results.len(), 2);
    }

    #[test]
    fn weighted_average_of_active_categories() {
        let results = vec![result("hw", 20.0, Some(85.0)), result("exams", 80.0, Some(95.0))];
        let overall = aggregate_overall(&results, &scale()).unwrap().unwrap();
        assert!((overall.percentage - 93.0).abs() < 1e-9);
        assert_eq!(overall.letter, "A");
    }

    #[test]
    fn invariant_under_uniform_weight_rescaling() {
        let base = vec![
            result("a", 15.0, Some(72.5)),
            result("b", 35.0, Some(88.0)),
            result("c", 50.0, Some(64.0)),
            result("d", 10.0, None),
        ];
        let reference = aggregate_overall(&base, &scale()).unwrap().unwrap().percentage;
        for factor in [0.01, 0.5, 3.0, 1000.0] {
            let scaled: Vec<CategoryResult> = base
                .iter()
                .map(|r| result(&r.category_id, r.weight * factor, r.percentage))
                .collect();
            let p = aggregate_overall(&scaled, &scale()).unwrap().unwrap().percentage;
            assert!((p - reference).abs() < 1e-9, "factor {}: {} vs {}", factor, p, reference);
        }
    }

    #[test]
    fn weights_need_not_sum_to_hundred() {
        let results = vec![result("hw", 1.0, Some(70.0)), result("labs", 3.0, Some(90.0))];
        let overall = aggregate_overall(&results, &scale()).unwrap().unwrap();
        assert!((overall.percentage - 85.0).abs() < 1e-9);
    }

    #[test]
    fn no_scored_work_is_no_grade() {
        let results = vec![result("hw", 20.0, None), result("exams", 80.0, None)];
        assert_eq!(aggregate_overall(&results, &scale()).unwrap(), None);
        assert_eq!(aggregate_overall(&[], &scale()).unwrap(), None);
    }

    #[test]
    fn zero_weight_categories_do_not_count() {
        let results = vec![result("bonus", 0.0, Some(10.0))];
        assert_eq!(aggregate_overall(&results, &scale()).unwrap(), None);

        let results = vec![result("bonus", 0.0, Some(10.0)), result("hw", 50.0, Some(80.0))];
        let overall = aggregate_overall(&results, &scale()).unwrap().unwrap();
        assert!((overall.percentage - 80.0).abs() < 1e-9);
    }

    #[test]
    fn zero_percent_is_a_grade() {
        let results = vec![result("hw", 20.0, Some(0.0))];
        let overall = aggregate_overall(&results, &scale()).unwrap().unwrap();
        assert_eq!(overall.percentage, 0.0);
        assert_eq!(overall.letter, "F");
    }

    #[test]
    fn scale_gap_surfaces_lookup_error() {
        let gappy = GradingScale::new(vec![ScaleBand::new("A", 90.0, 100.0, None)]).unwrap();
        let results = vec![result("hw", 20.0, Some(50.0))];
        assert!(matches!(
            aggregate_overall(&results, &gappy),
            Err(CalcError::ScaleLookup { .. })
        ));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let results = vec![result("hw", -5.0, Some(50.0))];
        assert!(matches!(
            aggregate_overall(&results, &scale()),
            Err(CalcError::InvalidCategory { .. })
        ));
    }
}
