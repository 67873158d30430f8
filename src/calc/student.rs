use std::collections::HashMap;

use super::category::aggregate_category;
use super::error::CalcError;
use super::overall::aggregate_overall;
use super::scale::GradingScale;
use super::types::{
    AggregateOptions, Category, CategoryResult, GradedItem, ReportStatus, StudentReport,
    UNCATEGORIZED_ID,
};

pub fn compute_student(
    items: &[GradedItem],
    categories: &[Category],
    scale: &GradingScale,
    options: &AggregateOptions,
) -> Result<StudentReport, CalcError> {
    let mut by_category: HashMap<&str, Vec<GradedItem>> = HashMap::new();
    for c in categories {
        if c.id == UNCATEGORIZED_ID {
            return Err(CalcError::invalid_category(
                &c.id,
                "category id is reserved for uncategorized items",
            ));
        }
        if by_category.insert(c.id.as_str(), Vec::new()).is_some() {
            return Err(CalcError::invalid_category(&c.id, "duplicate category id"));
        }
    }

    let mut uncategorized: Vec<GradedItem> = Vec::new();
    for item in items {
        match item.category_id.as_deref() {
            None => uncategorized.push(item.clone()),
            Some(cat) => match by_category.get_mut(cat) {
                Some(bucket) => bucket.push(item.clone()),
                None => {
                    return Err(CalcError::invalid_item(
                        &item.id,
                        format!("unknown category {}", cat),
                    ))
                }
            },
        }
    }

    let letter_scale = options.category_letters.then_some(scale);
    let mut results: Vec<CategoryResult> = Vec::with_capacity(categories.len() + 1);
    for c in categories {
        let bucket = by_category
            .get(c.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        results.push(aggregate_category(bucket, c, letter_scale)?);
    }
    if !uncategorized.is_empty() {
        let bucket = Category::uncategorized(options.uncategorized_weight);
        results.push(aggregate_category(&uncategorized, &bucket, letter_scale)?);
    }

    let report = match aggregate_overall(&results, scale)? {
        Some(overall) => StudentReport {
            student_id: None,
            status: ReportStatus::Graded,
            percentage: Some(overall.percentage),
            letter: Some(overall.letter),
            gpa: overall.gpa,
            active_weight: overall.active_weight,
            categories: overall.category_results,
        },
        None => StudentReport {
            student_id: None,
            status: ReportStatus::NoGrades,
            percentage: None,
            letter: None,
            gpa: None,
            active_weight: 0.0,
            categories: results,
        },
    };
    Ok(report)
}
