//! Academic calendar: the academic-year singleton, terms, important days.

use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{required_u32, store_or_err};
use crate::ipc::types::{AppState, Request};
use crate::model::{
    AcademicYearInput, ImportantDayId, ImportantDayPatch, NewImportantDay, NewTerm, TermId,
    TermPatch,
};

fn handle_year_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match serde_json::to_value(store.academic_year()) {
        Ok(year) => ok(&req.id, json!({ "academicYear": year })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_year_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let input: Option<AcademicYearInput> = match req.params.get("year") {
        None => None,
        Some(v) if v.is_null() => None,
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(y) => Some(y),
            Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
        },
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.set_academic_year(input);
    match serde_json::to_value(store.academic_year()) {
        Ok(year) => ok(&req.id, json!({ "academicYear": year })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_terms_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match serde_json::to_value(store.terms()) {
        Ok(terms) => ok(&req.id, json!({ "terms": terms })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_terms_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewTerm = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let id = store.add_term(new);
    ok(&req.id, json!({ "termId": id }))
}

fn handle_terms_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "termId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let patch: TermPatch = match serde_json::from_value(
        req.params.get("patch").cloned().unwrap_or(json!({})),
    ) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.update_term(TermId(id), &patch);
    ok(&req.id, json!({ "ok": true }))
}

fn handle_terms_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "termId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.delete_term(TermId(id));
    ok(&req.id, json!({ "ok": true }))
}

fn handle_days_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match serde_json::to_value(store.important_days()) {
        Ok(days) => ok(&req.id, json!({ "importantDays": days })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_days_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewImportantDay = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let id = store.add_important_day(new);
    ok(&req.id, json!({ "importantDayId": id }))
}

fn handle_days_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "importantDayId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let patch: ImportantDayPatch = match serde_json::from_value(
        req.params.get("patch").cloned().unwrap_or(json!({})),
    ) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.update_important_day(ImportantDayId(id), &patch);
    ok(&req.id, json!({ "ok": true }))
}

fn handle_days_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "importantDayId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.delete_important_day(ImportantDayId(id));
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "academicYear.get" => Some(handle_year_get(state, req)),
        "academicYear.set" => Some(handle_year_set(state, req)),
        "terms.list" => Some(handle_terms_list(state, req)),
        "terms.create" => Some(handle_terms_create(state, req)),
        "terms.update" => Some(handle_terms_update(state, req)),
        "terms.delete" => Some(handle_terms_delete(state, req)),
        "importantDays.list" => Some(handle_days_list(state, req)),
        "importantDays.create" => Some(handle_days_create(state, req)),
        "importantDays.update" => Some(handle_days_update(state, req)),
        "importantDays.delete" => Some(handle_days_delete(state, req)),
        _ => None,
    }
}
