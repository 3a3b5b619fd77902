//! JSON (de)serialization helpers for ledger snapshots and swap data.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default file name for a ledger snapshot.
pub const SNAPSHOT_PATH: &str = "./swaplock.json";

/// Reads a JSON-encoded file from the given `path` and deserializes into type `T`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be opened, read, or parsed.
///
/// # Examples
///
/// ```ignore
/// # use swaplock_core::interface::load_swap_data;
/// # use swaplock_core::{Coin, Ledger};
///
/// let ledger: Ledger<Coin> = load_swap_data("./swaplock.json").unwrap();
/// ```
pub fn load_swap_data<P, T>(path: P) -> anyhow::Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("loading swap data: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON from {:?}", path))
}

/// Writes `data` (serializable) as pretty-printed JSON to the given `path`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be created or data cannot be serialized.
///
/// # Examples
///
/// ```ignore
/// # use swaplock_core::interface::save_swap_data;
/// # use swaplock_core::{Coin, Ledger};
///
/// let ledger: Ledger<Coin> = Ledger::new();
/// save_swap_data("./swaplock.json", &ledger).unwrap();
/// ```
pub fn save_swap_data<P, T>(path: P, data: &T) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating file {:?}", path))?;
    serde_json::to_writer_pretty(file, data)
        .with_context(|| format!("serializing to JSON to {:?}", path))
}
