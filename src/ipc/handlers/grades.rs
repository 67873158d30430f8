use crate::calc::{
    aggregate_category, aggregate_overall, compute_student, lookup_grade, AggregateOptions,
    Category, CategoryResult, GradedItem, GradingScale, ScaleBand,
};
use crate::ipc::error::{calc_error_body, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const CLASS_MAX_STUDENTS: usize = 5000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupParams {
    percentage: f64,
    #[serde(default)]
    scale: Option<Vec<ScaleBand>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateCategoryParams {
    #[serde(default)]
    items: Vec<GradedItem>,
    category: Category,
    #[serde(default)]
    scale: Option<Vec<ScaleBand>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateOverallParams {
    #[serde(default)]
    category_results: Vec<CategoryResult>,
    #[serde(default)]
    scale: Option<Vec<ScaleBand>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeStudentParams {
    #[serde(default)]
    student_id: Option<String>,
    #[serde(default)]
    items: Vec<GradedItem>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    scale: Option<Vec<ScaleBand>>,
    #[serde(default)]
    uncategorized_weight: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassStudent {
    student_id: String,
    #[serde(default)]
    items: Vec<GradedItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeClassParams {
    students: Vec<ClassStudent>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    scale: Option<Vec<ScaleBand>>,
    #[serde(default)]
    uncategorized_weight: Option<f64>,
}

fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, HandlerErr> {
    serde_json::from_value(req.params.clone()).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

// Invalid explicit scales are `invalid_scale`, not `bad_params`.
fn resolve_scale(state: &AppState, raw: Option<Vec<ScaleBand>>) -> Result<GradingScale, HandlerErr> {
    match raw {
        Some(bands) => Ok(GradingScale::new(bands)?),
        None => Ok(state.settings.default_scale.clone()),
    }
}

fn resolve_options(
    state: &AppState,
    uncategorized_weight: Option<f64>,
) -> Result<AggregateOptions, HandlerErr> {
    let mut options = state.settings.options();
    if let Some(w) = uncategorized_weight {
        if !(0.0..=100.0).contains(&w) {
            return Err(HandlerErr::bad_params(format!(
                "uncategorizedWeight must be in 0..=100 (got {})",
                w
            )));
        }
        options.uncategorized_weight = w;
    }
    Ok(options)
}

fn handle_lookup(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let params: LookupParams = parse_params(req)?;
    let scale = resolve_scale(state, params.scale)?;
    let grade = lookup_grade(params.percentage, &scale)?;
    Ok(json!({ "letter": grade.letter, "gpa": grade.gpa }))
}

fn handle_aggregate_category(
    _state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let params: AggregateCategoryParams = parse_params(req)?;
    // Per-category letters only when the caller passes a scale.
    let scale = params.scale.map(GradingScale::new).transpose()?;
    let result = aggregate_category(&params.items, &params.category, scale.as_ref())?;
    Ok(json!(result))
}

fn handle_aggregate_overall(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let params: AggregateOverallParams = parse_params(req)?;
    let scale = resolve_scale(state, params.scale)?;
    let overall = aggregate_overall(&params.category_results, &scale)?;
    Ok(json!(overall))
}

fn handle_compute_student(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let params: ComputeStudentParams = parse_params(req)?;
    let scale = resolve_scale(state, params.scale)?;
    let options = resolve_options(state, params.uncategorized_weight)?;
    let mut report = compute_student(&params.items, &params.categories, &scale, &options)?;
    report.student_id = params.student_id;
    Ok(json!(report))
}

fn handle_compute_class(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    // Cap on the raw array, before any student is deserialized.
    let count = req
        .params
        .get("students")
        .and_then(|v| v.as_array())
        .map_or(0, Vec::len);
    if count > CLASS_MAX_STUDENTS {
        return Err(HandlerErr {
            code: "bad_params",
            message: format!("at most {} students per request", CLASS_MAX_STUDENTS),
            details: Some(json!({ "students": count })),
        });
    }
    let params: ComputeClassParams = parse_params(req)?;
    let scale = resolve_scale(state, params.scale)?;
    let options = resolve_options(state, params.uncategorized_weight)?;

    let mut failed = 0_usize;
    let rows: Vec<serde_json::Value> = params
        .students
        .into_iter()
        .map(|s| {
            match compute_student(&s.items, &params.categories, &scale, &options) {
                Ok(mut report) => {
                    report.student_id = Some(s.student_id.clone());
                    json!({ "studentId": s.student_id, "ok": true, "report": report })
                }
                Err(e) => {
                    failed += 1;
                    json!({ "studentId": s.student_id, "ok": false, "error": calc_error_body(&e) })
                }
            }
        })
        .collect();
    debug!(students = rows.len(), failed, "class computed");

    Ok(json!({ "rows": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "grades.lookup" => handle_lookup(state, req),
        "grades.aggregateCategory" => handle_aggregate_category(state, req),
        "grades.aggregateOverall" => handle_aggregate_overall(state, req),
        "grades.computeStudent" => handle_compute_student(state, req),
        "grades.computeClass" => handle_compute_class(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
