//! Run planning: which items to process and whether to force them

use std::str::FromStr;
use std::time::Duration;

use shared::ItemId;

use crate::error::{OrchestratorError, OrchestratorResult};

/// Ordered ids to process in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub ids: Vec<ItemId>,
    /// Regenerate even when an artifact already exists
    pub force: bool,
}

impl RunPlan {
    /// Ids `start..=end`, not forced
    pub fn range(start: u32, end: u32) -> OrchestratorResult<Self> {
        if start == 0 {
            return Err(OrchestratorError::invalid("--start must be at least 1"));
        }
        if start > end {
            return Err(OrchestratorError::invalid(format!(
                "--start {start} is after --end {end}"
            )));
        }
        Ok(Self {
            ids: (start..=end).map(ItemId::new).collect(),
            force: false,
        })
    }

    /// Comma-separated id list such as `3,17,42`, forced
    pub fn redo(list: &str) -> OrchestratorResult<Self> {
        let ids = list
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                ItemId::from_str(part).map_err(|_| OrchestratorError::invalid(format!("'{part}' is not a token ID")))
            })
            .collect::<OrchestratorResult<Vec<_>>>()?;

        if ids.is_empty() {
            return Err(OrchestratorError::invalid("--redo needs at least one token ID"));
        }
        Ok(Self { ids, force: true })
    }

    /// Redo mode when `redo` is given, range mode otherwise
    pub fn from_args(start: u32, end: u32, redo: Option<&str>) -> OrchestratorResult<Self> {
        match redo {
            Some(list) if !list.trim().is_empty() => Self::redo(list),
            _ => Self::range(start, end),
        }
    }
}

/// Pause between items from a `--delay` value in seconds
///
/// Negative, non-finite and out-of-range values are invalid arguments.
pub fn pacing_delay(secs: f64) -> OrchestratorResult<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| OrchestratorError::invalid(format!("--delay must be a non-negative number of seconds, got {secs}: {e}")))
}
