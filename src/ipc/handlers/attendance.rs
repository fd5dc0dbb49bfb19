use chrono::NaiveDate;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{required_u32, store_or_err};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceId, AttendancePatch, NewAttendance, StudentId};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match serde_json::to_value(store.attendance()) {
        Ok(attendance) => ok(&req.id, json!({ "attendance": attendance })),
        Err(e) => err(&req.id, "encode_failed", e.to_string(), None),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewAttendance = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    // Nothing de-duplicates (student, date); a second record for the same
    // day is stored as-is.
    let id = store.add_attendance(new);
    ok(&req.id, json!({ "attendanceId": id }))
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "attendanceId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let patch: AttendancePatch = match serde_json::from_value(
        req.params.get("patch").cloned().unwrap_or(json!({})),
    ) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.update_attendance(AttendanceId(id), &patch);
    ok(&req.id, json!({ "ok": true }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_u32(&req.params, "attendanceId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    store.delete_attendance(AttendanceId(id));
    ok(&req.id, json!({ "ok": true }))
}

/// The class-teacher marking flow: flip the first record matching
/// (student, date), or create one if the day is unmarked. Duplicate-day
/// records beyond the first are left alone.
fn handle_mark(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_u32(&req.params, "studentId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let date: NaiveDate = match req
        .params
        .get("date")
        .map(|v| serde_json::from_value(v.clone()))
    {
        Some(Ok(d)) => d,
        _ => return err(&req.id, "bad_params", "missing or invalid date", None),
    };
    let Some(present) = req.params.get("present").and_then(|v| v.as_bool()) else {
        return err(&req.id, "bad_params", "missing present", None);
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let existing = store
        .attendance()
        .iter()
        .find(|a| a.student_id == StudentId(student_id) && a.date == date)
        .map(|a| a.id);
    match existing {
        Some(id) => {
            store.update_attendance(
                id,
                &AttendancePatch {
                    present: Some(present),
                    ..Default::default()
                },
            );
            ok(&req.id, json!({ "attendanceId": id, "created": false }))
        }
        None => {
            let id = store.add_attendance(NewAttendance {
                student_id: StudentId(student_id),
                date,
                present,
            });
            ok(&req.id, json!({ "attendanceId": id, "created": true }))
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.list" => Some(handle_list(state, req)),
        "attendance.create" => Some(handle_create(state, req)),
        "attendance.update" => Some(handle_update(state, req)),
        "attendance.delete" => Some(handle_delete(state, req)),
        "attendance.mark" => Some(handle_mark(state, req)),
        _ => None,
    }
}
