// =============================================================================
// Shared types used across the screener indicator engine
// =============================================================================
//
// Everything here is either part of the wire contract (the request/response
// envelopes and their payloads) or the in-memory shape the engine computes
// with. Output series use `Option<f64>`; `None` serializes as JSON `null`
// and marks "not yet computable", which is distinct from zero.
// =============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One price/volume series, index-aligned across all four vectors.
///
/// `highs`, `lows` and `volumes` are optional on the wire; absent (or short)
/// series contribute zeros where an algorithm needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    pub closes: Vec<f64>,
    #[serde(default)]
    pub highs: Vec<f64>,
    #[serde(default)]
    pub lows: Vec<f64>,
    #[serde(default)]
    pub volumes: Vec<f64>,
}

/// A single declarative indicator request.
///
/// `name` selects the algorithm (matched case-insensitively); the numeric
/// fields are algorithm-specific and fall back to per-indicator defaults
/// when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mult: Option<f64>,
}

impl IndicatorRequest {
    /// Convenience constructor for callers that only need a name + period.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            period: None,
            fast: None,
            slow: None,
            signal: None,
            mult: None,
        }
    }

    pub fn with_period(name: &str, period: usize) -> Self {
        Self {
            period: Some(period),
            ..Self::named(name)
        }
    }
}

/// The computed value stored under one result key.
///
/// Serialized untagged: a plain series becomes a JSON array, the bundles
/// become objects, and a failed computation becomes `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Bands {
        mid: Vec<Option<f64>>,
        upper: Vec<Option<f64>>,
        lower: Vec<Option<f64>>,
    },
    Macd {
        macd: Vec<Option<f64>>,
        signal: Vec<Option<f64>>,
        hist: Vec<Option<f64>>,
    },
    Series(Vec<Option<f64>>),
    /// The per-indicator failure marker (JSON `null`).
    Unavailable,
}

/// Mapping from derived key (`sma20`, `bb20`, `macd`, ...) to computed value.
///
/// BTreeMap keeps response key order stable across runs.
pub type ResultSet = BTreeMap<String, IndicatorValue>;

// =============================================================================
// Message envelopes
// =============================================================================

/// Payload of a compute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputePayload {
    pub indicators: Vec<IndicatorRequest>,
    pub series: PriceSeries,
}

/// Payload of a successful response: the result set plus the elapsed
/// computation time in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPayload {
    pub output: ResultSet,
    pub ms: f64,
}

/// An inbound message to the engine worker, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineRequest {
    Compute { id: String, payload: ComputePayload },
}

impl EngineRequest {
    pub fn id(&self) -> &str {
        match self {
            Self::Compute { id, .. } => id,
        }
    }
}

/// An outbound message from the engine worker, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineResponse {
    Result { id: String, payload: ResultPayload },
    Error { id: String, error: String },
}

impl EngineResponse {
    pub fn id(&self) -> &str {
        match self {
            Self::Result { id, .. } => id,
            Self::Error { id, .. } => id,
        }
    }
}
