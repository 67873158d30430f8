use super::drop::drop_lowest_by;
use super::error::CalcError;
use super::scale::{lookup_grade, GradingScale};
use super::types::{Category, CategoryResult, GradedItem, ScoreState};

struct ScoredItem<'a> {
    id: &'a str,
    earned: f64,
    possible: f64,
}

pub fn aggregate_category(
    items: &[GradedItem],
    category: &Category,
    scale: Option<&GradingScale>,
) -> Result<CategoryResult, CalcError> {
    category.validate()?;

    let mut scored: Vec<ScoredItem<'_>> = Vec::new();
    let mut excused_count = 0_usize;
    let mut missing_count = 0_usize;
    let mut ungraded_count = 0_usize;

    for item in items {
        item.validate()?;
        match item.score_state() {
            ScoreState::Excused => excused_count += 1,
            ScoreState::Ungraded => ungraded_count += 1,
            ScoreState::Scored(earned) => {
                if item.flags.missing {
                    missing_count += 1;
                }
                scored.push(ScoredItem {
                    id: &item.id,
                    earned,
                    possible: item.points_possible,
                });
            }
        }
    }

    let outcome = drop_lowest_by(scored, category.drop_lowest as usize, |s| {
        (s.earned / s.possible, s.id)
    });

    let points_earned: f64 = outcome.kept.iter().map(|s| s.earned).sum();
    let points_possible: f64 = outcome.kept.iter().map(|s| s.possible).sum();
    let percentage = if points_possible > 0.0 {
        Some(100.0 * points_earned / points_possible)
    } else {
        None
    };

    let letter = match (percentage, scale) {
        (Some(p), Some(scale)) => Some(lookup_grade(p, scale)?.letter),
        _ => None,
    };

    Ok(CategoryResult {
        category_id: category.id.clone(),
        name: category.name.clone(),
        weight: category.weight,
        points_earned,
        points_possible,
        percentage,
        letter,
        scored_count: outcome.kept.len(),
        dropped_item_ids: outcome.dropped.iter().map(|s| s.id.to_string()).collect(),
        excused_count,
        missing_count,
        ungraded_count,
    })
}
