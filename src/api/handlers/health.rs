use crate::{GIT_COMMIT_HASH, store::DynCredentialStore};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    status: String,
    database: String,
    timestamp: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Credential store is reachable", body = Health),
        (status = 503, description = "Credential store is unreachable", body = Health)
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, store: Extension<DynCredentialStore>) -> impl IntoResponse {
    let result = store.ping().await.map_err(|err| {
        error!("Failed to ping credential store: {err}");
    });

    let health = if result.is_ok() {
        debug!("Credential store is healthy");
        Health {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            timestamp: now_rfc3339(),
        }
    } else {
        debug!("Credential store is unhealthy");
        Health {
            status: "unhealthy".to_string(),
            database: "disconnected".to_string(),
            timestamp: now_rfc3339(),
        }
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let status = if result.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, x_app_headers(), body)
}

fn x_app_headers() -> HeaderMap {
    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    match format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
    .parse::<HeaderValue>()
    {
        Ok(value) => {
            debug!("X-App header: {:?}", value);
            headers.insert("X-App", value);
        }
        Err(err) => error!("Failed to parse X-App header: {}", err),
    }
    headers
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
