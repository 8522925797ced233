// Recent-search bookkeeping: capped, deduplicated, persisted as JSON.
use std::{fs, path::PathBuf};

use anyhow::Result;
use directories::ProjectDirs;

const CAP: usize = 5;

// Single-slot string storage so tests can swap the file for memory.
pub trait SearchStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, raw: &str) -> Result<()>;
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open() -> Result<Self> {
        let proj = ProjectDirs::from("com", "aqtop", "aqtop")
            .ok_or_else(|| anyhow::anyhow!("no home directory for config storage"))?;
        fs::create_dir_all(proj.config_dir())?;
        Ok(Self {
            path: proj.config_dir().join("recent_searches.json"),
        })
    }
}

impl SearchStore for FileStore {
    fn get(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn set(&mut self, raw: &str) -> Result<()> {
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

pub struct RecentSearches<S> {
    store: S,
}

impl<S: SearchStore> RecentSearches<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // Persisted list, empty when missing or unreadable.
    pub fn load(&self) -> Vec<String> {
        self.store
            .get()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    // Append `city` unless already present (exact match; a repeat search
    // keeps insertion order and does not move the entry). Over capacity
    // the oldest entry is dropped from the front. The persisted copy is
    // the source of truth and is reloaded before every mutation.
    pub fn record(&mut self, city: &str) -> Result<Vec<String>> {
        let mut items = self.load();
        if !items.iter().any(|c| c == city) {
            items.push(city.to_string());
            if items.len() > CAP {
                items.remove(0);
            }
            let raw = serde_json::to_string(&items)?;
            self.store.set(&raw)?;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemStore {
        slot: Option<String>,
    }

    impl SearchStore for MemStore {
        fn get(&self) -> Option<String> {
            self.slot.clone()
        }

        fn set(&mut self, raw: &str) -> Result<()> {
            self.slot = Some(raw.to_string());
            Ok(())
        }
    }

    fn fresh() -> RecentSearches<MemStore> {
        RecentSearches::new(MemStore::default())
    }

    #[test]
    fn first_search_is_recorded_and_persisted() {
        let mut recent = fresh();
        let list = recent.record("Pune").unwrap();
        assert_eq!(list, vec!["Pune"]);
        assert_eq!(recent.load(), vec!["Pune"]);
    }

    #[test]
    fn repeat_search_is_a_no_op() {
        let mut recent = fresh();
        recent.record("Pune").unwrap();
        let list = recent.record("Pune").unwrap();
        assert_eq!(list, vec!["Pune"]);
    }

    #[test]
    fn repeat_search_keeps_insertion_order() {
        let mut recent = fresh();
        for city in ["Pune", "Mumbai", "Pune"] {
            recent.record(city).unwrap();
        }
        assert_eq!(recent.load(), vec!["Pune", "Mumbai"]);
    }

    #[test]
    fn sixth_distinct_city_evicts_the_oldest() {
        let mut recent = fresh();
        for city in ["Pune", "Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata"] {
            recent.record(city).unwrap();
        }
        assert_eq!(
            recent.load(),
            vec!["Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata"]
        );
    }

    #[test]
    fn list_never_exceeds_capacity() {
        let mut recent = fresh();
        for i in 0..20 {
            recent.record(&format!("City{}", i)).unwrap();
        }
        assert_eq!(recent.load().len(), 5);
        assert_eq!(recent.load()[4], "City19");
    }

    #[test]
    fn city_names_match_case_sensitively() {
        let mut recent = fresh();
        recent.record("pune").unwrap();
        recent.record("Pune").unwrap();
        assert_eq!(recent.load(), vec!["pune", "Pune"]);
    }

    #[test]
    fn corrupt_storage_degrades_to_empty() {
        let store = MemStore {
            slot: Some("not json at all {".to_string()),
        };
        let mut recent = RecentSearches::new(store);
        assert!(recent.load().is_empty());
        assert_eq!(recent.record("Delhi").unwrap(), vec!["Delhi"]);
    }

    #[test]
    fn empty_storage_loads_as_empty() {
        assert!(fresh().load().is_empty());
    }
}
