use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ledger_core::{Block, ChainSnapshot, ChainTransport, Ledger, Node, Transaction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub struct AppState<T> {
    pub ledger: Arc<Ledger>,
    pub transport: Arc<T>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            transport: self.transport.clone(),
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Mined {
    message: &'static str,
    #[serde(flatten)]
    block: Block,
}

#[derive(Serialize)]
struct Validity {
    valid: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct Replaced {
    message: &'static str,
    replaced: bool,
    chain: Vec<Block>,
}

#[derive(Serialize)]
struct Submitted {
    message: String,
    index: u64,
}

#[derive(Deserialize)]
struct ConnectIn {
    #[serde(default)]
    nodes: Vec<String>,
}

#[derive(Serialize)]
struct Rejected {
    address: String,
    error: String,
}

#[derive(Serialize)]
struct Connected {
    message: &'static str,
    all_nodes: Vec<Node>,
    rejected: Vec<Rejected>,
}

pub fn router<T>(state: AppState<T>) -> Router
where
    T: ChainTransport + 'static,
{
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/mine_block", get(mine_block::<T>))
        .route("/get_chain", get(get_chain::<T>))
        .route("/is_valid", get(is_valid::<T>))
        .route("/replace_chain", get(replace_chain::<T>))
        .route("/add_transaction", post(add_transaction::<T>))
        .route("/connect_node", post(connect_node::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn mine_block<T>(State(state): State<AppState<T>>) -> Result<Json<Mined>, ApiError> {
    let ledger = state.ledger.clone();
    let block = tokio::task::spawn_blocking(move || ledger.mine())
        .await
        .map_err(|err| ApiError::Internal(format!("mining task failed: {err}")))??;
    Ok(Json(Mined {
        message: "Congratulations, you just mined a block!",
        block,
    }))
}

async fn get_chain<T>(State(state): State<AppState<T>>) -> Json<ChainSnapshot> {
    Json(state.ledger.chain())
}

async fn is_valid<T>(State(state): State<AppState<T>>) -> Json<Validity> {
    let valid = state.ledger.is_valid();
    let message = if valid {
        "All good. The Blockchain is valid."
    } else {
        "Houston, we have a problem. The Blockchain is not valid."
    };
    Json(Validity { valid, message })
}

async fn replace_chain<T>(State(state): State<AppState<T>>) -> Json<Replaced>
where
    T: ChainTransport,
{
    let resolution = state
        .ledger
        .resolve_consensus(state.transport.as_ref())
        .await;
    let message = if resolution.replaced {
        "The chain was replaced by the longest valid chain"
    } else {
        "No chain was replaced"
    };
    Json(Replaced {
        message,
        replaced: resolution.replaced,
        chain: resolution.chain,
    })
}

async fn add_transaction<T>(
    State(state): State<AppState<T>>,
    payload: Result<Json<Transaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Submitted>), ApiError> {
    let Json(tx) = payload.map_err(|rejection| {
        ApiError::BadRequest(format!(
            "transaction needs sender, receiver and amount: {}",
            rejection.body_text()
        ))
    })?;
    let index = state
        .ledger
        .submit_transaction(tx.sender, tx.receiver, tx.amount)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    Ok((
        StatusCode::CREATED,
        Json(Submitted {
            message: format!("Transaction will be added to Block {index}"),
            index,
        }),
    ))
}

async fn connect_node<T>(
    State(state): State<AppState<T>>,
    payload: Result<Json<ConnectIn>, JsonRejection>,
) -> Result<(StatusCode, Json<Connected>), ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if body.nodes.is_empty() {
        return Err(ApiError::BadRequest("No nodes specified".into()));
    }
    let rejected = state
        .ledger
        .connect_nodes(body.nodes.iter().map(String::as_str))
        .into_iter()
        .filter_map(|(address, result)| {
            result.err().map(|err| {
                warn!(%address, error = %err, "rejected node address");
                Rejected {
                    address,
                    error: err.to_string(),
                }
            })
        })
        .collect::<Vec<_>>();
    let message = if rejected.is_empty() {
        "All nodes are connected"
    } else {
        "Some nodes could not be connected"
    };
    Ok((
        StatusCode::CREATED,
        Json(Connected {
            message,
            all_nodes: state.ledger.nodes(),
            rejected,
        }),
    ))
}
