use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::{Effect, Event};
use crate::shelf::Shelf;
use crate::toolkit::{KeyValueStorage, ToolkitError};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read event script: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event script: {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("event #{index} failed: {source}")]
    Dispatch {
        index: usize,
        #[source]
        source: ToolkitError,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub event: Event,
    pub effect: Effect,
}

/// Reads a list of events: JSON for `.json` files, YAML otherwise.
pub fn load_script(path: &Path) -> Result<Vec<Event>, ReplayError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ReplayError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str::<Vec<Event>>(&contents).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<Vec<Event>>(&contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ReplayError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Dispatches `events` in order and stops at the first failure.
pub fn replay<S: KeyValueStorage>(
    shelf: &mut Shelf<S>,
    events: Vec<Event>,
) -> Result<Vec<ReplayStep>, ReplayError> {
    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        let effect = shelf
            .dispatch(&event)
            .map_err(|source| ReplayError::Dispatch { index, source })?;
        steps.push(ReplayStep {
            index,
            event,
            effect,
        });
    }
    Ok(steps)
}
