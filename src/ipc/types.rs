use serde::Deserialize;

use crate::store::Store;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Per-process state. The store is `None` until `session.open` seeds it;
/// touching it earlier is a usage error, not a data error.
pub struct AppState {
    pub store: Option<Store>,
}
