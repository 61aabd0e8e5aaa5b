//! Axum routes and the serve entrypoint for the chat page.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::connector::Container;
use crate::domain::{DomainError, Transcript};

use super::render_page;

/// Cookie carrying the caller's session id.
pub const SESSION_COOKIE: &str = "safetychat_session";

#[derive(Clone)]
pub struct AppState {
    container: Arc<Container>,
}

#[derive(Debug, Deserialize)]
pub struct PromptInput {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub transcript: Transcript,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// JSON error response wrapping a [`DomainError`].
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

/// HTTP status for a failed turn.
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        DomainError::NetworkError(_)
        | DomainError::AuthenticationError(_)
        | DomainError::ProviderError(_) => StatusCode::BAD_GATEWAY,
        DomainError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the axum router for the chat page and its JSON endpoints.
pub fn router(container: Arc<Container>) -> axum::Router {
    axum::Router::new()
        .route("/", get(index))
        .route("/chat", post(submit_form))
        .route("/api/transcript", get(get_transcript))
        .route("/api/chat", post(post_chat))
        .route("/health", get(health))
        .with_state(AppState { container })
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let session = state
        .container
        .open_session_use_case()
        .execute(session_id(&headers).as_deref())
        .await?;
    let session = session.lock().await;

    let page = Html(render_page(session.transcript(), None)).into_response();
    Ok(with_session_cookie(page, &state, session.id()))
}

async fn submit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<PromptInput>,
) -> Result<Response, ApiError> {
    let session = state
        .container
        .open_session_use_case()
        .execute(session_id(&headers).as_deref())
        .await?;
    let mut session = session.lock().await;

    // An empty submission just redraws the page.
    if input.prompt.is_empty() {
        return Ok(with_session_cookie(
            Redirect::to("/").into_response(),
            &state,
            session.id(),
        ));
    }

    let use_case = state.container.send_message_use_case();
    let response = match use_case.execute(&mut session, &input.prompt).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            let page = render_page(session.transcript(), Some(&e.to_string()));
            (status_for(&e), Html(page)).into_response()
        }
    };

    Ok(with_session_cookie(response, &state, session.id()))
}

async fn get_transcript(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = state
        .container
        .open_session_use_case()
        .execute(session_id(&headers).as_deref())
        .await?;
    let session = session.lock().await;

    let body = Json(session.transcript().clone()).into_response();
    Ok(with_session_cookie(body, &state, session.id()))
}

async fn post_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PromptInput>,
) -> Result<Response, ApiError> {
    let session = state
        .container
        .open_session_use_case()
        .execute(session_id(&headers).as_deref())
        .await?;
    let mut session = session.lock().await;

    let use_case = state.container.send_message_use_case();
    let response = match use_case.execute(&mut session, &input.prompt).await {
        Ok(reply) => Json(ChatResponse {
            reply: reply.content().to_string(),
            transcript: session.transcript().clone(),
        })
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    };

    Ok(with_session_cookie(response, &state, session.id()))
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let sessions = state
        .container
        .open_session_use_case()
        .active_sessions()
        .await?;
    Ok(Json(HealthResponse {
        status: "ok",
        sessions,
    }))
}

/// Session id from the request's `Cookie` headers, if present.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn with_session_cookie(response: Response, state: &AppState, id: &str) -> Response {
    set_session_cookie(response, id, state.container.session_idle_timeout())
}

/// Attach the session cookie; it lapses together with the idle session.
fn set_session_cookie(mut response: Response, id: &str, max_age: Duration) -> Response {
    let cookie = format!(
        "{SESSION_COOKIE}={id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        max_age.as_secs()
    );
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => warn!("Could not encode session cookie: {e}"),
    }
    response
}

/// Handle returned by [`serve`]: the bound port and a shutdown trigger.
pub struct ServeHandle {
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Bind `bind` and serve the chat page in a spawned task.
pub async fn serve(container: Arc<Container>, bind: &str) -> Result<ServeHandle> {
    let app = router(container);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    info!("Chat page listening on {bind} (port {port})");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
