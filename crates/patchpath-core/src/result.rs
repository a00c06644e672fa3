//! Resolution outcome and its wire representation

use crate::model::PatchId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Why no patch path could be produced. The messages are stable and may be
/// matched literally by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PathError {
    #[error("Source version not found")]
    SourceVersionNotFound,
    #[error("Target version not found")]
    TargetVersionNotFound,
    /// The title has no patches at all.
    #[error("No patches available")]
    NoPatchesAvailable,
    /// Patches exist but none chain from the source to the target.
    #[error("No patch path exists")]
    NoPathExists,
}

impl PathError {
    pub const ALL: [PathError; 4] = [
        PathError::SourceVersionNotFound,
        PathError::TargetVersionNotFound,
        PathError::NoPatchesAvailable,
        PathError::NoPathExists,
    ];
}

#[derive(Debug, Error)]
#[error("unknown path error: {0}")]
pub struct UnknownPathError(String);

impl FromStr for PathError {
    type Err = UnknownPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathError::ALL
            .into_iter()
            .find(|e| e.to_string() == s)
            .ok_or_else(|| UnknownPathError(s.to_string()))
    }
}

/// One patch to download and apply, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatchStep {
    pub patch_id: PatchId,
    pub from_label: String,
    pub to_label: String,
    pub file_name: String,
    pub size_bytes: u64,
}

/// A cheapest path: ordered steps plus their summed size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchPath {
    pub steps: Vec<PatchStep>,
    pub total_size_bytes: u64,
}

impl PatchPath {
    /// The path from a version to itself.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<PatchStep>) -> Self {
        let total_size_bytes = steps
            .iter()
            .fold(0u64, |acc, step| acc.saturating_add(step.size_bytes));
        PatchPath { steps, total_size_bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Result of one resolution. Serialized as
/// `{ found, error, steps, totalSizeBytes }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PathResultWire", try_from = "PathResultWire")]
pub enum PathResult {
    Found(PatchPath),
    NotFound(PathError),
}

impl PathResult {
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }

    pub fn error(&self) -> Option<PathError> {
        match self {
            PathResult::Found(_) => None,
            PathResult::NotFound(err) => Some(*err),
        }
    }

    pub fn path(&self) -> Option<&PatchPath> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NotFound(_) => None,
        }
    }
}

impl From<PatchPath> for PathResult {
    fn from(path: PatchPath) -> Self {
        PathResult::Found(path)
    }
}

impl From<PathError> for PathResult {
    fn from(err: PathError) -> Self {
        PathResult::NotFound(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathResultWire {
    found: bool,
    error: Option<String>,
    #[serde(default)]
    steps: Vec<PatchStep>,
    #[serde(default)]
    total_size_bytes: u64,
}

impl From<PathResult> for PathResultWire {
    fn from(result: PathResult) -> Self {
        match result {
            PathResult::Found(path) => PathResultWire {
                found: true,
                error: None,
                steps: path.steps,
                total_size_bytes: path.total_size_bytes,
            },
            PathResult::NotFound(err) => PathResultWire {
                found: false,
                error: Some(err.to_string()),
                steps: Vec::new(),
                total_size_bytes: 0,
            },
        }
    }
}

impl TryFrom<PathResultWire> for PathResult {
    type Error = String;

    fn try_from(wire: PathResultWire) -> Result<Self, Self::Error> {
        match (wire.found, wire.error) {
            (true, None) => Ok(PathResult::Found(PatchPath {
                steps: wire.steps,
                total_size_bytes: wire.total_size_bytes,
            })),
            (true, Some(err)) => Err(format!("found result carries an error: {err}")),
            (false, Some(err)) => err
                .parse::<PathError>()
                .map(PathResult::NotFound)
                .map_err(|e| e.to_string()),
            (false, None) => Err("not-found result without an error".to_string()),
        }
    }
}
