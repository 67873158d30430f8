use crate::calc::{GradingScale, ScaleBand};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_validate(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(raw) = req.params.get("scale") else {
        return Err(HandlerErr::bad_params("missing params.scale"));
    };
    let bands: Vec<ScaleBand> = serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::bad_params(format!("scale: {}", e)))?;
    let scale = GradingScale::new(bands)?;
    let gaps: Vec<serde_json::Value> = scale
        .gaps()
        .into_iter()
        .map(|(from, to)| json!({ "from": from, "to": to }))
        .collect();

    Ok(json!({
        "bands": scale.bands(),
        "complete": scale.is_complete(),
        "gaps": gaps,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "scales.validate" => handle_validate(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
