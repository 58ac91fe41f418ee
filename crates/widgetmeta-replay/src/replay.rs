//! Action log parsing and replay.
//!
//! A log is either a JSON array of action envelopes or one envelope per
//! line. Blank lines are ignored.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};
use thiserror::Error;
use widgetmeta_core::{ActionError, MetaAction, MetaState, MetaStore, StoreConfig};

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid action log: {0}")]
    Log(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Output(#[source] serde_json::Error),
    #[error("Action {entry}: {source}")]
    Action {
        entry: usize,
        #[source]
        source: ActionError,
    },
}

/// How to treat the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Fail on the first malformed action.
    pub strict: bool,
    /// Write the state after every applied action.
    pub trace: bool,
    /// Single-line JSON output.
    pub compact: bool,
}

/// Counts of what happened to each log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    /// Entries with an action type the store does not handle.
    pub ignored: usize,
    /// Malformed entries (non-strict mode only).
    pub skipped: usize,
}

/// Store configuration for a replay run.
///
/// Per-transition logging is on with `--trace` or when `trace` level
/// logging is enabled for the store.
pub fn store_config(trace: bool) -> StoreConfig {
    StoreConfig {
        log_transitions: trace || log::log_enabled!(target: "widgetmeta_core::store", log::Level::Trace),
    }
}

/// Read the log from a file, or stdin when `path` is `None`.
pub fn load_input(path: Option<&Path>) -> Result<String, ReplayError> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// A log entry number (from 1) and its parse result.
type Entry = (usize, Result<Option<MetaAction>, ActionError>);

/// Parse every entry of a log.
fn parse_entries(text: &str) -> Result<Vec<Entry>, ReplayError> {
    if text.trim_start().starts_with('[') {
        let entries: Vec<Value> = serde_json::from_str(text)?;
        return Ok(entries
            .iter()
            .enumerate()
            .map(|(i, envelope)| (i + 1, MetaAction::from_envelope(envelope)))
            .collect());
    }

    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, MetaAction::from_json(line)))
        .collect())
}

/// Dispatch every action of the log into `store`.
pub fn replay<W: Write>(
    text: &str,
    store: &mut MetaStore,
    options: &ReplayOptions,
    out: &mut W,
) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();

    for (entry, parsed) in parse_entries(text)? {
        match parsed {
            Ok(Some(action)) => {
                let envelope = options.trace.then(|| action.to_envelope());
                store.dispatch(action);
                summary.applied += 1;
                if let Some(envelope) = envelope {
                    let step = json!({
                        "entry": entry,
                        "action": envelope,
                        "state": store.state(),
                    });
                    write_json(&step, true, out)?;
                }
            }
            Ok(None) => {
                log::debug!("Entry {}: action type not handled, ignored", entry);
                summary.ignored += 1;
            }
            Err(source) if options.strict => return Err(ReplayError::Action { entry, source }),
            Err(e) => {
                log::warn!("Entry {}: skipping malformed action: {}", entry, e);
                summary.skipped += 1;
            }
        }
    }
    Ok(summary)
}

/// Write a state snapshot as JSON followed by a newline.
pub fn write_state<W: Write>(state: &MetaState, compact: bool, out: &mut W) -> Result<(), ReplayError> {
    write_json(&state.to_value(), compact, out)
}

fn write_json<W: Write>(value: &Value, compact: bool, out: &mut W) -> Result<(), ReplayError> {
    if compact {
        serde_json::to_writer(&mut *out, value).map_err(ReplayError::Output)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value).map_err(ReplayError::Output)?;
    }
    writeln!(out)?;
    Ok(())
}
