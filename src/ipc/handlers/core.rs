use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use crate::seed;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "sessionOpen": state.store.is_some()
        }),
    )
}

/// Constructs the store from the seed dataset. Reopening replaces the whole
/// session; nothing survives from the previous one.
fn handle_session_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.store = Some(seed::seeded_store());
    ok(&req.id, json!({ "sessionOpen": true }))
}

fn handle_auth_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_session", "open a session first", None);
    };
    let Some(username) = req.params.get("username").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing username", None);
    };
    let Some(password) = req.params.get("password").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing password", None);
    };
    let role: Role = match req
        .params
        .get("role")
        .map(|v| serde_json::from_value(v.clone()))
    {
        Some(Ok(r)) => r,
        _ => return err(&req.id, "bad_params", "missing or unknown role", None),
    };

    match store.find_user(username, password, role) {
        Some(user) => ok(
            &req.id,
            json!({
                "userId": user.id,
                "name": user.name,
                "role": user.role,
                "entityId": user.entity_id
            }),
        ),
        None => err(
            &req.id,
            "invalid_credentials",
            "no user matches that username, password and role",
            None,
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "session.open" => Some(handle_session_open(state, req)),
        "auth.login" => Some(handle_auth_login(state, req)),
        _ => None,
    }
}
