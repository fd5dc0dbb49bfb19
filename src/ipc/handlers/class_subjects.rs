//! Class-subject assignments are managed by wholesale replacement: the
//! caller sends the full next collection (filtering out a row to delete,
//! mapping a row to edit) instead of id-addressed mutations.

use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::handlers::store_or_err;
use crate::ipc::types::{AppState, Request};
use crate::model::ClassSubject;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match serde_json::to_value(store.class_subjects()) {
        Ok(items) => ok(&req.id, json!({ "classSubjects": items })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_replace(state: &mut AppState, req: &Request) -> serde_json::Value {
    let items: Vec<ClassSubject> = match req
        .params
        .get("items")
        .map(|v| serde_json::from_value(v.clone()))
    {
        Some(Ok(items)) => items,
        Some(Err(e)) => return err(&req.id, "bad_params", e.to_string(), None),
        None => return err(&req.id, "bad_params", "missing items", None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let count = items.len();
    store.set_class_subjects(items);
    ok(&req.id, json!({ "count": count }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classSubjects.list" => Some(handle_list(state, req)),
        "classSubjects.replace" => Some(handle_replace(state, req)),
        _ => None,
    }
}
