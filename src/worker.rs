// =============================================================================
// Engine Worker — message-passing deployment of the indicator engine
// =============================================================================
//
// The engine runs inside a dedicated tokio task reachable only through
// channels: requests arrive on a bounded mpsc queue, responses leave on a
// second channel tagged with the request's correlation id. The task computes
// one request at a time (at most one in flight), holds no state between
// requests, and has no cancellation path; a caller that stops caring simply
// discards the response.
//
// `EngineHandle` layers an awaitable call on top for in-process callers: it
// generates a UUID correlation id, parks a oneshot sender in a pending map,
// and a small dispatch task routes each response to its waiter.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine;
use crate::types::{
    ComputePayload, EngineRequest, EngineResponse, IndicatorRequest, PriceSeries,
    ResultPayload,
};

/// Spawn the engine worker task.
///
/// Requests sent on the returned sender are computed in arrival order;
/// every request produces exactly one response on `response_tx`, carrying
/// the same correlation id. The task exits when the request sender is
/// dropped or when the response side is closed.
pub fn spawn(
    queue_depth: usize,
    response_tx: mpsc::Sender<EngineResponse>,
) -> mpsc::Sender<EngineRequest> {
    let (request_tx, mut request_rx) = mpsc::channel::<EngineRequest>(queue_depth);

    tokio::spawn(async move {
        info!(queue_depth, "engine worker started");
        while let Some(request) = request_rx.recv().await {
            let response = handle_request(request);
            if response_tx.send(response).await.is_err() {
                break;
            }
        }
        info!("engine worker stopped");
    });

    request_tx
}

/// Compute one request synchronously within the worker task.
fn handle_request(request: EngineRequest) -> EngineResponse {
    match request {
        EngineRequest::Compute { id, payload } => {
            let started = Instant::now();
            let output = engine::compute(&payload.indicators, &payload.series);
            let ms = started.elapsed().as_secs_f64() * 1000.0;
            debug!(id = %id, ms, indicators = payload.indicators.len(), "computed batch");
            EngineResponse::Result {
                id,
                payload: ResultPayload { output, ms },
            }
        }
    }
}

// =============================================================================
// EngineHandle
// =============================================================================

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<EngineResponse>>>>;

/// Awaitable front-end over the worker channels.
///
/// Clone-cheap; every clone shares the same worker and pending map.
#[derive(Clone)]
pub struct EngineHandle {
    request_tx: mpsc::Sender<EngineRequest>,
    pending: PendingMap,
}

impl EngineHandle {
    /// Spawn a worker plus the response-dispatch task and return the handle.
    pub fn spawn(queue_depth: usize) -> Self {
        let (response_tx, response_rx) = mpsc::channel::<EngineResponse>(queue_depth);
        let request_tx = spawn(queue_depth, response_tx);
        Self::new(request_tx, response_rx)
    }

    /// Wire a handle onto an existing pair of worker channels.
    pub fn new(
        request_tx: mpsc::Sender<EngineRequest>,
        mut response_rx: mpsc::Receiver<EngineResponse>,
    ) -> Self {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let routes = pending.clone();
        tokio::spawn(async move {
            while let Some(response) = response_rx.recv().await {
                let waiter = routes.lock().remove(response.id());
                match waiter {
                    // The waiter may have been dropped; that is the only
                    // "cancellation" the contract allows.
                    Some(tx) => {
                        let _ = tx.send(response);
                    }
                    None => debug!(id = %response.id(), "response without waiter, discarded"),
                }
            }
            // The worker is gone. Dropping the parked senders fails every
            // remaining waiter instead of leaving them awaiting forever.
            routes.lock().clear();
        });

        Self {
            request_tx,
            pending,
        }
    }

    /// Compute one batch and await its response.
    ///
    /// Generates a fresh UUID correlation id per call. Returns an error when
    /// the worker has shut down or when the response is error-typed.
    pub async fn compute(
        &self,
        indicators: Vec<IndicatorRequest>,
        series: PriceSeries,
    ) -> Result<ResultPayload> {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id.clone(), tx);

        let request = EngineRequest::Compute {
            id: id.clone(),
            payload: ComputePayload { indicators, series },
        };
        if self.request_tx.send(request).await.is_err() {
            self.pending.lock().remove(&id);
            bail!("engine worker is not running");
        }

        match rx.await {
            Ok(EngineResponse::Result { payload, .. }) => Ok(payload),
            Ok(EngineResponse::Error { error, .. }) => Err(anyhow!(error)),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(anyhow!("engine worker dropped the response"))
            }
        }
    }
}
