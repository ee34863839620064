// =============================================================================
// Screener Indicator Engine — Main Entry Point
// =============================================================================
//
// Runs the indicator engine behind its message contract, bridged to stdio:
// one JSON request envelope per input line, one JSON response envelope per
// output line. Lines that fail to parse produce an error-typed envelope with
// the id echoed back when it can be recovered from the raw frame.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod config;
mod engine;
mod indicators;
mod types;
mod worker;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::types::{EngineRequest, EngineResponse};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    // Logs go to stderr; stdout carries the response frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::load("engine_config.json")
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            EngineConfig::default()
        })
        .apply_env_overrides();

    info!(queue_depth = config.queue_depth, "Screener indicator engine starting");

    // ── 2. Spawn the worker and the response writer ──────────────────────
    let (response_tx, mut response_rx) = mpsc::channel::<EngineResponse>(config.queue_depth);
    let request_tx = worker::spawn(config.queue_depth, response_tx.clone());

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = response_rx.recv().await {
            let line = match serde_json::to_string(&response) {
                Ok(line) => line,
                Err(e) => {
                    error!(error = %e, "failed to serialize response");
                    continue;
                }
            };
            if stdout.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if stdout.write_all(b"\n").await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    // ── 3. Read request frames from stdin until EOF ──────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_frame(&line) {
            Ok(request) => {
                if request_tx.send(request).await.is_err() {
                    error!("engine worker is gone, shutting down");
                    break;
                }
            }
            Err(response) => {
                if response_tx.send(response).await.is_err() {
                    break;
                }
            }
        }
    }

    // ── 4. Drain and exit ────────────────────────────────────────────────
    info!("stdin closed, draining responses");
    drop(request_tx);
    drop(response_tx);
    let _ = writer.await;
    info!("engine stopped");

    Ok(())
}

/// Parse one stdin frame into a request envelope, or build the error
/// envelope that must be written back when the frame is malformed.
fn parse_frame(line: &str) -> Result<EngineRequest, EngineResponse> {
    serde_json::from_str::<EngineRequest>(line).map_err(|e| {
        warn!(error = %e, "malformed request frame");
        EngineResponse::Error {
            id: recover_frame_id(line),
            error: format!("malformed request: {e}"),
        }
    })
}

/// Best-effort extraction of the correlation id from a frame that failed to
/// parse as a request envelope. Empty when the frame is not even JSON.
fn recover_frame_id(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("id").and_then(|id| id.as_str().map(str::to_string)))
        .unwrap_or_default()
}
