//! ## deathcounter-core::store
//! **In-memory death tally with whole-file JSON persistence**
//!
//! The on-disk format is a single flat JSON object mapping hyphenated player
//! UUIDs to non-negative integers. Every save rewrites the whole file.
//!
//! `load`/`save` never fail from the caller's point of view: problems are
//! logged and the in-memory state is left consistent. The `try_*` variants
//! return the underlying [`StoreError`] for callers that want to report it.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::player::{DeathCount, PlayerId};

/// Result of a [`CounterStore::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No file at the path; the store was left as is.
    Missing,
    /// The file was parsed and `players` entries were merged.
    Loaded { players: usize },
    /// The file existed but could not be read or parsed; nothing was merged.
    Failed,
}

/// Player -> death count mapping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CounterStore {
    counts: HashMap<PlayerId, DeathCount>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more death and returns the new tally.
    pub fn increment(&mut self, player: PlayerId) -> DeathCount {
        let count = self.counts.entry(player).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// `None` when the player has never died.
    #[inline]
    pub fn get(&self, player: &PlayerId) -> Option<DeathCount> {
        self.counts.get(player).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &DeathCount)> {
        self.counts.iter()
    }

    /// Merges the persisted snapshot at `path` into the store.
    ///
    /// A missing file is not an error. A malformed file is logged and leaves
    /// the store untouched.
    pub fn load(&mut self, path: &Path) -> LoadOutcome {
        match self.try_load(path) {
            Ok(None) => {
                debug!(path = %path.display(), "No death count file, starting empty");
                LoadOutcome::Missing
            }
            Ok(Some(players)) => {
                info!(path = %path.display(), players, "Loaded death counts");
                LoadOutcome::Loaded { players }
            }
            Err(e) => {
                error!(error = %e, "Failed to load death counts!");
                LoadOutcome::Failed
            }
        }
    }

    /// Like [`load`](Self::load) but returns the failure.
    ///
    /// `Ok(None)` means the file does not exist. The whole file is validated
    /// before any entry is merged.
    pub fn try_load(&mut self, path: &Path) -> Result<Option<usize>, StoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let snapshot: BTreeMap<String, DeathCount> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        // Several spellings parse to the same id; any such pair is rejected.
        let mut parsed = HashMap::with_capacity(snapshot.len());
        for (key, count) in snapshot {
            let Ok(id) = key.parse::<PlayerId>() else {
                return Err(StoreError::InvalidPlayerId {
                    path: path.to_path_buf(),
                    key,
                });
            };
            if parsed.insert(id, count).is_some() {
                return Err(StoreError::DuplicatePlayerId {
                    path: path.to_path_buf(),
                    key,
                });
            }
        }

        let players = parsed.len();
        self.counts.extend(parsed);
        Ok(Some(players))
    }

    /// Overwrites `path` with the full mapping.
    ///
    /// Returns `false` if the snapshot did not reach disk; the failure has
    /// already been logged and the in-memory state is unaffected.
    pub fn save(&self, path: &Path) -> bool {
        match self.try_save(path) {
            Ok(()) => {
                info!("Successfully saved death counts to file.");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to save death counts!");
                false
            }
        }
    }

    /// Like [`save`](Self::save) but returns the failure.
    ///
    /// The snapshot goes to `<path>.tmp` first and is renamed over `path`,
    /// so `path` always holds either the previous or the new snapshot.
    pub fn try_save(&self, path: &Path) -> Result<(), StoreError> {
        // Sorted keys keep the file stable between saves.
        let snapshot: BTreeMap<String, DeathCount> = self
            .counts
            .iter()
            .map(|(id, count)| (id.to_string(), *count))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot).map_err(StoreError::Serialize)?;

        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp_path = tmp_path_for(path);
        fs::write(&tmp_path, json).map_err(write_err)?;
        fs::rename(&tmp_path, path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            write_err(source)
        })
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    /// Throwaway directory under the system temp dir, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("deathcounter-{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn path(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn player(n: u128) -> PlayerId {
        PlayerId::from_uuid(uuid::Uuid::from_u128(0x5a2e2b1a_0000_4000_8000_000000000000 | n))
    }

    #[test]
    fn first_death_counts_as_one() {
        let mut store = CounterStore::new();
        let a = player(1);
        let b = player(2);

        assert_eq!(store.get(&a), None);
        assert_eq!(store.increment(a), 1);
        assert_eq!(store.get(&a), Some(1));
        assert_eq!(store.get(&b), None);
    }

    #[test]
    fn get_does_not_create_entries() {
        let store = CounterStore::new();
        assert_eq!(store.get(&player(7)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn increment_saturates_at_max() {
        let mut store = CounterStore::new();
        let a = player(1);
        store.counts.insert(a, DeathCount::MAX);
        assert_eq!(store.increment(a), DeathCount::MAX);
    }

    proptest! {
        #[test]
        fn n_increments_yield_n(n in 1usize..200) {
            let mut store = CounterStore::new();
            let a = player(1);
            let mut last = 0;
            for _ in 0..n {
                last = store.increment(a);
            }
            prop_assert_eq!(last, n as DeathCount);
            prop_assert_eq!(store.get(&a), Some(n as DeathCount));
        }

        #[test]
        fn counts_are_per_player(deaths in proptest::collection::vec(0u128..8, 0..64)) {
            let mut store = CounterStore::new();
            for &p in &deaths {
                store.increment(player(p));
            }
            for p in 0u128..8 {
                let expected = deaths.iter().filter(|&&d| d == p).count() as DeathCount;
                let got = store.get(&player(p)).unwrap_or(0);
                prop_assert_eq!(got, expected);
            }
        }
    }

    #[traced_test]
    #[test]
    fn save_then_load_into_fresh_store_is_identical() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");

        let mut store = CounterStore::new();
        store.increment(player(1));
        store.increment(player(1));
        store.increment(player(1));
        store.increment(player(2));
        assert!(store.save(&path));
        assert!(logs_contain("Successfully saved death counts to file."));

        let mut restored = CounterStore::new();
        assert_eq!(restored.load(&path), LoadOutcome::Loaded { players: 2 });
        assert_eq!(restored, store);
    }

    #[test]
    fn saved_file_is_a_flat_object_of_uuid_strings() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");

        let mut store = CounterStore::new();
        store.increment(player(1));
        store.save(&path);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "5a2e2b1a-0000-4000-8000-000000000001": 1 })
        );
    }

    #[test]
    fn loads_documented_example_including_zero_counts() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        fs::write(
            &path,
            r#"{
  "5a2e2b1a-0000-4000-8000-000000000001": 3,
  "5a2e2b1a-0000-4000-8000-000000000002": 0
}"#,
        )
        .unwrap();

        let mut store = CounterStore::new();
        assert_eq!(store.load(&path), LoadOutcome::Loaded { players: 2 });
        assert_eq!(store.get(&player(1)), Some(3));
        assert_eq!(store.get(&player(2)), Some(0));
    }

    #[test]
    fn missing_file_leaves_store_empty() {
        let dir = ScratchDir::new();
        let mut store = CounterStore::new();
        assert_eq!(store.load(&dir.path("absent.json")), LoadOutcome::Missing);
        assert!(store.is_empty());
    }

    #[traced_test]
    #[test]
    fn malformed_file_is_logged_and_ignored() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = CounterStore::new();
        assert_eq!(store.load(&path), LoadOutcome::Failed);
        assert!(store.is_empty());
        assert!(logs_contain("Failed to load death counts!"));
    }

    #[test]
    fn bad_key_or_value_rejects_whole_file() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        let mut store = CounterStore::new();

        fs::write(
            &path,
            r#"{ "5a2e2b1a-0000-4000-8000-000000000001": 3, "steve": 1 }"#,
        )
        .unwrap();
        assert!(matches!(
            store.try_load(&path),
            Err(StoreError::InvalidPlayerId { ref key, .. }) if key == "steve"
        ));
        assert!(store.is_empty());

        fs::write(&path, r#"{ "5a2e2b1a-0000-4000-8000-000000000001": -1 }"#).unwrap();
        assert!(matches!(store.try_load(&path), Err(StoreError::Parse { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_load_keeps_existing_entries() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let mut store = CounterStore::new();
        store.increment(player(1));
        assert_eq!(store.load(&path), LoadOutcome::Failed);
        assert_eq!(store.get(&player(1)), Some(1));
    }

    #[test]
    fn loaded_entries_replace_same_key() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        fs::write(&path, r#"{ "5a2e2b1a-0000-4000-8000-000000000001": 9 }"#).unwrap();

        let mut store = CounterStore::new();
        store.increment(player(1));
        store.increment(player(2));
        store.load(&path);
        assert_eq!(store.get(&player(1)), Some(9));
        assert_eq!(store.get(&player(2)), Some(1));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = ScratchDir::new();
        let path = dir.path("nested/plugin/deaths.json");

        let mut store = CounterStore::new();
        store.increment(player(1));
        assert!(store.save(&path));
        assert!(path.exists());
    }

    #[traced_test]
    #[test]
    fn write_failure_is_swallowed() {
        let dir = ScratchDir::new();
        // A directory cannot be overwritten as a file.
        let path = dir.path("occupied");
        fs::create_dir_all(&path).unwrap();

        let mut store = CounterStore::new();
        store.increment(player(1));
        assert!(!store.save(&path));
        assert_eq!(store.get(&player(1)), Some(1));
        assert!(logs_contain("Failed to save death counts!"));
        assert!(!dir.path("occupied.tmp").exists());
    }

    #[test]
    fn successful_save_leaves_no_temp_file() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");

        let mut store = CounterStore::new();
        store.increment(player(1));
        assert!(store.save(&path));
        store.increment(player(1));
        assert!(store.save(&path));

        assert!(!dir.path("deaths.json.tmp").exists());
        let mut restored = CounterStore::new();
        restored.load(&path);
        assert_eq!(restored.get(&player(1)), Some(2));
    }

    #[test]
    fn failed_save_keeps_previous_snapshot_intact() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");

        let mut first = CounterStore::new();
        for n in 0..50 {
            first.increment(player(n));
        }
        assert!(first.save(&path));
        let before = fs::read_to_string(&path).unwrap();

        // Nothing can be written at the temp path.
        fs::create_dir_all(dir.path("deaths.json.tmp")).unwrap();
        let mut second = CounterStore::new();
        second.increment(player(99));
        assert!(matches!(second.try_save(&path), Err(StoreError::Write { .. })));

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        let mut restored = CounterStore::new();
        assert_eq!(restored.load(&path), LoadOutcome::Loaded { players: 50 });
    }

    #[test]
    fn differently_spelled_duplicate_keys_reject_file() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        fs::write(
            &path,
            r#"{
  "5A2E2B1A-0000-4000-8000-000000000001": 7,
  "5a2e2b1a-0000-4000-8000-000000000001": 3
}"#,
        )
        .unwrap();

        let mut store = CounterStore::new();
        assert!(matches!(
            store.try_load(&path),
            Err(StoreError::DuplicatePlayerId { .. })
        ));
        assert!(store.is_empty());
        assert_eq!(store.load(&path), LoadOutcome::Failed);
    }

    #[test]
    fn non_canonical_spelling_alone_is_accepted() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        fs::write(&path, r#"{ "5A2E2B1A000040008000000000000001": 4 }"#).unwrap();

        let mut store = CounterStore::new();
        assert_eq!(store.load(&path), LoadOutcome::Loaded { players: 1 });
        assert_eq!(store.get(&player(1)), Some(4));
    }
}
