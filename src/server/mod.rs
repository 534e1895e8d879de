pub mod page;

use crate::convert::{ConversionRequest, ConversionResult, Converter};
use crate::llm::provider::CompletionProvider;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use page::{DEFAULT_JSON_EXAMPLE, render_page};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::debug;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct AppState<P> {
    converter: Arc<Converter<P>>,
}

impl<P> AppState<P> {
    pub fn new(converter: Converter<P>) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
        }
    }
}

#[derive(Serialize)]
struct Health {
    ok: bool,
    service: &'static str,
}

pub fn router<P>(state: AppState<P>) -> Router
where
    P: CompletionProvider + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/convert", post(convert::<P>))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

pub async fn serve<P>(
    listener: TcpListener,
    state: AppState<P>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()>
where
    P: CompletionProvider + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn index() -> Html<String> {
    Html(render_page(DEFAULT_JSON_EXAMPLE))
}

async fn healthz() -> Json<Health> {
    Json(Health {
        ok: true,
        service: "json2toon",
    })
}

// Unreadable or malformed bodies fall through as empty input, so the
// caller still gets a 200 carrying the invalid-input sentinel.
async fn convert<P>(
    State(state): State<AppState<P>>,
    body: Result<Bytes, BytesRejection>,
) -> Json<ConversionResult>
where
    P: CompletionProvider + 'static,
{
    let request = match body {
        Ok(bytes) => serde_json::from_slice::<ConversionRequest>(&bytes).unwrap_or_else(|err| {
            debug!(error = %err, "convert body is not a conversion request");
            ConversionRequest::default()
        }),
        Err(rejection) => {
            debug!(error = %rejection, "convert body rejected");
            ConversionRequest::default()
        }
    };

    Json(state.converter.convert(&request.json_input).await)
}
