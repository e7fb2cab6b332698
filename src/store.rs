//! JSON persistence for group registries and rate snapshots.
//!
//! Thin file-backed save/load: the registry and the current rate
//! snapshot each serialize to a single JSON document. A missing file is
//! not an error — loading falls back to the empty registry or the
//! built-in rate table, so first launch works without setup.

use crate::core::group::GroupRegistry;
use crate::rates::RateSnapshot;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors arising from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Save the group registry to `path` as pretty-printed JSON.
pub fn save_registry(path: &Path, registry: &GroupRegistry) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(registry)?;
    fs::write(path, json)?;
    log::debug!("saved {} group(s) to {}", registry.len(), path.display());
    Ok(())
}

/// Load the group registry from `path`.
///
/// A missing file yields an empty registry.
pub fn load_registry(path: &Path) -> Result<GroupRegistry, StoreError> {
    if !path.exists() {
        log::info!("no registry at {}, starting empty", path.display());
        return Ok(GroupRegistry::new());
    }
    let json = fs::read_to_string(path)?;
    let registry = serde_json::from_str(&json)?;
    Ok(registry)
}

/// Save a rate snapshot to `path` as pretty-printed JSON.
pub fn save_rates(path: &Path, snapshot: &RateSnapshot) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    log::debug!("saved rate snapshot to {}", path.display());
    Ok(())
}

/// Load a rate snapshot from `path`.
///
/// A missing file yields the built-in fallback table.
pub fn load_rates(path: &Path) -> Result<RateSnapshot, StoreError> {
    if !path.exists() {
        log::info!("no cached rates at {}, using built-in table", path.display());
        return Ok(RateSnapshot::builtin());
    }
    let json = fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&json)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use crate::core::group::ExpenseGroup;

    #[test]
    fn test_missing_registry_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_registry(&dir.path().join("missing.json")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");

        let registry = GroupRegistry::new()
            .with_group(ExpenseGroup::new("Trip", CurrencyCode::new("SEK")))
            .unwrap();
        save_registry(&path, &registry).unwrap();

        let loaded = load_registry(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.by_name("Trip").is_some());
    }

    #[test]
    fn test_missing_rates_load_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = load_rates(&dir.path().join("missing.json")).unwrap();
        assert!(snapshot.table().contains(&CurrencyCode::new("SEK")));
        assert!(snapshot.fetched_at().is_none());
    }

    #[test]
    fn test_rates_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");

        let snapshot = RateSnapshot::builtin();
        save_rates(&path, &snapshot).unwrap();
        let loaded = load_rates(&path).unwrap();
        assert_eq!(loaded.table(), snapshot.table());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_registry(&path), Err(StoreError::Json(_))));
    }
}
