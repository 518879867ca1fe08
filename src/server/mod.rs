//! HTTP server: newsletter relay, read-only post API and the built front-end

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::query::collect_tags;
use crate::content::{ContentLoader, PostQuery};
use crate::newsletter::{validate_email, SubscribeOutcome, SubscriptionGateway};
use crate::Site;

pub const SUBSCRIBE_PATH: &str = "/api/newsletter-subscribe";

const EMAIL_REQUIRED: &str = "Email is required";
const INVALID_BODY: &str = "Invalid request body";
const SERVER_CONFIGURATION_ERROR: &str = "Server configuration error";
const POST_NOT_FOUND: &str = "Post not found";

/// Sent with every relay response, preflight included
const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Server state
pub struct ServerState {
    pub loader: ContentLoader,
    /// `None` when the provider credentials are missing
    pub gateway: Option<SubscriptionGateway>,
    pub public_dir: PathBuf,
}

impl ServerState {
    /// Build state for `site`. The relay talks to Beehiiv directly, so it only
    /// works when the secrets are in this process's environment.
    pub fn from_site(site: &Site) -> Result<Self> {
        let gateway = match site.beehiiv_client() {
            Ok(client) => Some(SubscriptionGateway::new(
                Arc::new(client),
                &site.config.newsletter,
            )),
            Err(e) => {
                tracing::warn!("Newsletter relay disabled: {}", e);
                None
            }
        };

        Ok(Self {
            loader: site.content_loader()?,
            gateway,
            public_dir: site.public_dir.clone(),
        })
    }
}

/// Build the application router
pub fn router(state: ServerState) -> Router {
    let static_files = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route(SUBSCRIBE_PATH, post(subscribe_handler).options(preflight_handler))
        .route("/api/posts", get(list_posts_handler))
        .route("/api/posts/:id", get(post_handler))
        .route("/api/tags", get(tags_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = ServerState::from_site(site)?;
    let relay_enabled = state.gateway.is_some();
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if !relay_enabled {
        println!("Newsletter relay answers 503 until BEEHIIV_API_KEY and BEEHIIV_PUBLICATION_ID are set.");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Deserialize)]
struct SubscribeBody {
    #[serde(default)]
    email: Option<String>,
}

fn relay_response(status: StatusCode, body: Value) -> Response {
    (status, CORS_HEADERS, Json(body)).into_response()
}

fn relay_error(status: StatusCode, error: &str) -> Response {
    relay_response(status, json!({ "success": false, "error": error }))
}

async fn preflight_handler() -> Response {
    (StatusCode::NO_CONTENT, CORS_HEADERS).into_response()
}

/// Relay a signup to the provider.
///
/// The body is parsed by hand so malformed JSON gets the same JSON error
/// shape (and CORS headers) as every other relay reply.
async fn subscribe_handler(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let email = match serde_json::from_slice::<SubscribeBody>(&body) {
        Ok(body) => body.email.unwrap_or_default(),
        Err(e) => {
            tracing::debug!("Rejecting relay request: {}", e);
            return relay_error(StatusCode::BAD_REQUEST, INVALID_BODY);
        }
    };

    if email.trim().is_empty() {
        return relay_error(StatusCode::BAD_REQUEST, EMAIL_REQUIRED);
    }
    if let Err(outcome) = validate_email(&email) {
        return relay_error(StatusCode::BAD_REQUEST, outcome.message());
    }

    let Some(gateway) = &state.gateway else {
        tracing::error!("Newsletter signup received but provider credentials are missing");
        return relay_error(StatusCode::SERVICE_UNAVAILABLE, SERVER_CONFIGURATION_ERROR);
    };

    let outcome = gateway.subscribe(&email).await;
    let status = outcome_status(&outcome);
    match outcome {
        SubscribeOutcome::Subscribed { message } => {
            relay_response(status, json!({ "success": true, "message": message }))
        }
        SubscribeOutcome::ConfigurationError { .. } => relay_error(status, SERVER_CONFIGURATION_ERROR),
        other => relay_error(status, other.message()),
    }
}

/// HTTP status the relay answers with for an outcome
fn outcome_status(outcome: &SubscribeOutcome) -> StatusCode {
    match outcome {
        SubscribeOutcome::Subscribed { .. } => StatusCode::OK,
        SubscribeOutcome::AlreadySubscribed { .. } => StatusCode::CONFLICT,
        SubscribeOutcome::InvalidEmail { .. } => StatusCode::BAD_REQUEST,
        SubscribeOutcome::ConfigurationError { .. } => StatusCode::SERVICE_UNAVAILABLE,
        SubscribeOutcome::Failed { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(StatusCode::is_client_error)
            .unwrap_or(StatusCode::BAD_GATEWAY),
        SubscribeOutcome::NetworkError { .. } => StatusCode::BAD_GATEWAY,
    }
}

async fn list_posts_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostQuery>,
) -> impl IntoResponse {
    let posts: Vec<_> = state
        .loader
        .load_posts()
        .await
        .into_iter()
        .filter(|post| query.matches(post))
        .collect();
    Json(posts)
}

async fn post_handler(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> Response {
    match state.loader.load_post(&id).await {
        Some(post) => Json(post).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": POST_NOT_FOUND }))).into_response(),
    }
}

async fn tags_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let posts = state.loader.load_posts().await;
    Json(collect_tags(&posts))
}
