use crate::api::ServerConfig;
use axum::{extract::Extension, response::Json};
use serde::{Deserialize, Serialize};

use super::health::now_rfc3339;

#[derive(Serialize, Deserialize, Debug)]
pub struct Status {
    status: String,
    timestamp: String,
    environment: String,
    port: u16,
}

// axum handler for `/`, not part of the documented API
pub async fn root(server: Extension<ServerConfig>) -> Json<Status> {
    Json(Status {
        status: "ok".to_string(),
        timestamp: now_rfc3339(),
        environment: server.environment().to_string(),
        port: server.port(),
    })
}
