use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::RecipeResult;
use crate::recipe::{Recipe, RecipeId};

/// Fixed key the favorites list is stored under.
pub const FAVORITES_STORAGE_KEY: &str = "leftovers_favorites";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub added_at: DateTime<Utc>,
}

/// Durable get/set storage for the whole favorites list.
pub trait FavoritesStore {
    fn load(&self) -> RecipeResult<Vec<FavoriteRecord>>;
    fn save(&self, favorites: &[FavoriteRecord]) -> RecipeResult<()>;
}

/// Favorites kept as one JSON array in `<dir>/leftovers_favorites.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", FAVORITES_STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> RecipeResult<Vec<FavoriteRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes a sibling temp file and renames it over the old list, so a
    /// crash never leaves a half-written file behind.
    fn save(&self, favorites: &[FavoriteRecord]) -> RecipeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(favorites)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = ?self.path, count = favorites.len(), "Favorites written");
        Ok(())
    }
}

/// In-process store, for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<FavoriteRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for MemoryStore {
    fn load(&self) -> RecipeResult<Vec<FavoriteRecord>> {
        let records = self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.clone())
    }

    fn save(&self, favorites: &[FavoriteRecord]) -> RecipeResult<()> {
        let mut records = self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *records = favorites.to_vec();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// The user's saved recipes. Ids are unique within the list.
pub struct Favorites<S> {
    store: S,
}

impl<S: FavoritesStore> Favorites<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the list, dropping any repeated id a hand edit may have added.
    fn load_unique(&self) -> RecipeResult<Vec<FavoriteRecord>> {
        let mut favorites = self.store.load()?;
        let before = favorites.len();
        let mut seen: Vec<RecipeId> = Vec::with_capacity(before);
        favorites.retain(|f| {
            if seen.contains(&f.recipe.id) {
                false
            } else {
                seen.push(f.recipe.id.clone());
                true
            }
        });
        if favorites.len() != before {
            tracing::warn!(dropped = before - favorites.len(), "Duplicate favorites ignored");
        }
        Ok(favorites)
    }

    pub fn add(&self, recipe: Recipe) -> RecipeResult<AddOutcome> {
        self.add_at(recipe, Utc::now())
    }

    pub fn add_at(&self, recipe: Recipe, added_at: DateTime<Utc>) -> RecipeResult<AddOutcome> {
        let mut favorites = self.load_unique()?;
        if favorites.iter().any(|f| f.recipe.id == recipe.id) {
            return Ok(AddOutcome::AlreadyExists);
        }
        tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "Adding favorite");
        favorites.push(FavoriteRecord { recipe, added_at });
        self.store.save(&favorites)?;
        Ok(AddOutcome::Added)
    }

    /// Returns whether anything was removed.
    pub fn remove(&self, id: &RecipeId) -> RecipeResult<bool> {
        let mut favorites = self.load_unique()?;
        let before = favorites.len();
        favorites.retain(|f| &f.recipe.id != id);
        if favorites.len() == before {
            return Ok(false);
        }
        self.store.save(&favorites)?;
        tracing::info!(recipe_id = %id, "Removed favorite");
        Ok(true)
    }

    pub fn get(&self, id: &RecipeId) -> RecipeResult<Option<FavoriteRecord>> {
        Ok(self
            .load_unique()?
            .into_iter()
            .find(|f| &f.recipe.id == id))
    }

    /// Newest first.
    pub fn list(&self) -> RecipeResult<Vec<FavoriteRecord>> {
        let mut favorites = self.load_unique()?;
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(favorites)
    }

    pub fn count(&self) -> RecipeResult<usize> {
        Ok(self.load_unique()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::error::RecipeError;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_duplicate_add_is_a_no_op() {
        let favorites = Favorites::new(MemoryStore::new());
        let recipe = builtin_catalog().remove(0);

        assert_eq!(favorites.add(recipe.clone()).unwrap(), AddOutcome::Added);
        assert_eq!(favorites.add(recipe).unwrap(), AddOutcome::AlreadyExists);
        assert_eq!(favorites.count().unwrap(), 1);
    }

    #[test]
    fn test_list_is_newest_first() {
        let favorites = Favorites::new(MemoryStore::new());
        let catalog = builtin_catalog();
        favorites.add_at(catalog[0].clone(), at(8)).unwrap();
        favorites.add_at(catalog[1].clone(), at(12)).unwrap();
        favorites.add_at(catalog[2].clone(), at(10)).unwrap();

        let names: Vec<String> = favorites
            .list()
            .unwrap()
            .into_iter()
            .map(|f| f.recipe.name)
            .collect();
        assert_eq!(names, vec![catalog[1].name.clone(), catalog[2].name.clone(), catalog[0].name.clone()]);
    }

    #[test]
    fn test_remove() {
        let favorites = Favorites::new(MemoryStore::new());
        let recipe = builtin_catalog().remove(3);
        favorites.add(recipe.clone()).unwrap();

        assert!(favorites.remove(&recipe.id).unwrap());
        assert!(!favorites.remove(&recipe.id).unwrap());
        assert_eq!(favorites.count().unwrap(), 0);
    }

    #[test]
    fn test_file_store_round_trips_and_keeps_order() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_empty());

        let favorites = Favorites::new(store.clone());
        let catalog = builtin_catalog();
        favorites.add_at(catalog[4].clone(), at(9)).unwrap();
        favorites.add_at(catalog[5].clone(), at(7)).unwrap();

        let reopened = JsonFileStore::in_dir(dir.path()).load().unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened[0].recipe, catalog[4]);
        assert_eq!(reopened[1].added_at, at(7));
        assert!(store
            .path()
            .ends_with(format!("{}.json", FAVORITES_STORAGE_KEY)));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(RecipeError::StorageFormat(_))));
    }

    #[test]
    fn test_duplicates_in_store_are_collapsed() {
        let store = MemoryStore::new();
        let recipe = builtin_catalog().remove(0);
        let record = FavoriteRecord {
            recipe,
            added_at: at(1),
        };
        store.save(&[record.clone(), record]).unwrap();

        let favorites = Favorites::new(store);
        assert_eq!(favorites.count().unwrap(), 1);
    }
}
