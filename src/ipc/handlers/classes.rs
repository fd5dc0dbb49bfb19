use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{required_u32, store_or_err};
use crate::ipc::types::{AppState, Request};
use crate::model::{ClassId, ClassPatch, NewClass};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match serde_json::to_value(store.classes()) {
        Ok(classes) => ok(&req.id, json!({ "classes": classes })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewClass = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let id = store.add_class(new);
    ok(&req.id, json!({ "classId": id }))
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "classId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let patch: ClassPatch = match serde_json::from_value(
        req.params.get("patch").cloned().unwrap_or(json!({})),
    ) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.update_class(ClassId(id), &patch);
    ok(&req.id, json!({ "ok": true }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "classId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    // No cascade: members, results and timetable rows keep their class ids
    // and read as dangling from here on.
    store.delete_class(ClassId(id));
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_list(state, req)),
        "classes.create" => Some(handle_create(state, req)),
        "classes.update" => Some(handle_update(state, req)),
        "classes.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
