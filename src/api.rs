use crate::client::{ClanApi, LookupError};
use crate::config::Listener as ListenerConfig;
use crate::metrics_defs;
use crate::types::ClanRecord;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub fn router(api: ClanApi) -> Router {
    Router::new()
        .route("/clan/tag/{clan_tag}", get(clan_by_tag))
        .route("/clan/id/{clan_id}", get(clan_by_id))
        .route("/health", get(health))
        .with_state(api)
}

pub async fn serve(listener: ListenerConfig, api: ClanApi) -> Result<(), ServeError> {
    let app = router(api);

    let addr = format!("{}:{}", listener.host, listener.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn clan_by_tag(
    State(api): State<ClanApi>,
    Path(clan_tag): Path<String>,
) -> Result<Json<ClanRecord>, LookupError> {
    record_outcome("tag", api.lookup_by_tag(&clan_tag).await).map(Json)
}

async fn clan_by_id(
    State(api): State<ClanApi>,
    Path(clan_id): Path<u64>,
) -> Result<Json<ClanRecord>, LookupError> {
    record_outcome("id", api.lookup_by_id(clan_id).await).map(Json)
}

async fn health() -> &'static str {
    "ok\n"
}

fn record_outcome(
    endpoint: &'static str,
    result: Result<ClanRecord, LookupError>,
) -> Result<ClanRecord, LookupError> {
    let outcome = match &result {
        Ok(_) => "found",
        Err(LookupError::NotFound(_)) => "not_found",
        Err(LookupError::UpstreamRejected(_)) => "upstream_rejected",
        Err(LookupError::Transport(_)) => "transport",
        Err(LookupError::MalformedPayload(_)) => "malformed_payload",
    };
    metrics::counter!(
        metrics_defs::LOOKUP_REQUESTS.name,
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);

    if let Err(err) = &result {
        tracing::warn!(endpoint, error = %err, "clan lookup failed");
    }
    result
}

#[derive(Serialize)]
struct ApiErrorResponse {
    detail: String,
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match self {
            LookupError::NotFound(_) => StatusCode::NOT_FOUND,
            LookupError::UpstreamRejected(_)
            | LookupError::Transport(_)
            | LookupError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ApiErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
