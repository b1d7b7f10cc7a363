use crate::{
    api::handlers::{
        auth::{AuthState, Environment},
        health, root,
    },
    store::DynCredentialStore,
};
use anyhow::{Context, Result, anyhow};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{ACCEPT, CONTENT_TYPE},
    },
    routing::{get, options},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span};
use ulid::Ulid;
use url::Url;
use utoipa_axum::router::OpenApiRouter;

pub mod handlers;
// OpenAPI router wiring and route registration live in openapi.rs.
mod openapi;

pub use openapi::openapi;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Listener and browser-facing settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    port: u16,
    environment: Environment,
    client_url: String,
    client_urls: Vec<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            port,
            environment: Environment::default(),
            client_url: DEFAULT_CLIENT_URL.to_string(),
            client_urls: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_client_url(mut self, client_url: impl Into<String>) -> Self {
        self.client_url = client_url.into();
        self
    }

    #[must_use]
    pub fn with_client_urls(mut self, client_urls: Vec<String>) -> Self {
        self.client_urls = client_urls;
        self
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Origins allowed to make credentialed requests, primary first, without
    /// duplicates or blanks.
    #[must_use]
    pub fn client_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::new();
        for url in std::iter::once(&self.client_url).chain(self.client_urls.iter()) {
            let url = url.trim();
            if !url.is_empty() && !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }
}

/// Build the complete application: documented routes, `/`, preflight for
/// `/health`, and the request-id, tracing and CORS layers.
///
/// # Errors
/// Returns an error if a configured client URL is not a valid origin.
pub fn app(
    server: ServerConfig,
    auth_state: Arc<AuthState>,
    store: DynCredentialStore,
) -> Result<Router> {
    let origins = server
        .client_urls()
        .into_iter()
        .map(client_origin)
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true);

    // The OpenAPI document is built in openapi.rs for the `openapi` binary.
    let (router, _openapi) = router().split_for_parts();
    let app = router
        .route("/", get(root::root))
        .route("/health", options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(auth_state))
                .layer(Extension(store))
                .layer(Extension(server)),
        );

    Ok(app)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    server: ServerConfig,
    auth_state: Arc<AuthState>,
    store: DynCredentialStore,
) -> Result<()> {
    let port = server.port();
    let app = app(server, auth_state, store)?;

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn client_origin(client_url: &str) -> Result<HeaderValue> {
    let parsed =
        Url::parse(client_url).with_context(|| format!("Invalid client URL: {client_url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Client URL must include a valid host: {client_url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build client origin header")
}
