pub mod attendance;
pub mod calendar;
pub mod class_subjects;
pub mod classes;
pub mod core;
pub mod dashboards;
pub mod fees;
pub mod results;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod timetable;

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

/// Every method except `health` and `session.open` needs a seeded store.
pub fn store_or_err<'a>(
    state: &'a mut AppState,
    req: &Request,
) -> Result<&'a mut Store, serde_json::Value> {
    state
        .store
        .as_mut()
        .ok_or_else(|| err(&req.id, "no_session", "open a session first", None))
}

pub fn required_u32(params: &serde_json::Value, key: &str) -> Result<u32, String> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| format!("missing {}", key))
}
