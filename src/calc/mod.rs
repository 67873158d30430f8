//! Grade aggregation: per-item score states, per-category averages with
//! drop-lowest, the renormalized weighted overall grade, and letter/GPA
//! lookup. Everything here is pure; callers supply all inputs.

mod category;
mod drop;
mod error;
mod overall;
mod scale;
mod student;
mod types;

pub use category::aggregate_category;
pub use error::CalcError;
pub use overall::aggregate_overall;
pub use scale::{lookup_grade, GradingScale, ScaleBand};
pub use student::compute_student;
pub use types::{AggregateOptions, Category, CategoryResult, GradedItem};
