use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Family, Participant, Roster};

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

const PARTICIPANTS_KEY: &str = "participants";
const FAMILIES_KEY: &str = "families";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn validate_key(name: &str) -> Result<()> {
        if name.is_empty() {
            bail!("Cache key must not be empty");
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid cache key: {:?}", name);
        }
        Ok(())
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        debug!(cache = name, "Saved cache entry");
        Ok(())
    }

    // ===== Generic blobs =====

    pub fn load_blob<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CachedData<T>>> {
        Self::validate_key(key)?;
        self.load(key)
    }

    pub fn save_blob<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        Self::validate_key(key)?;
        self.save(key, data)
    }

    pub fn remove_blob(&self, key: &str) -> Result<bool> {
        Self::validate_key(key)?;
        let path = self.cache_path(key);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove cache file: {}", key))?;
        Ok(true)
    }

    // ===== Participants =====

    pub fn load_participants(&self) -> Result<Option<CachedData<Vec<Participant>>>> {
        self.load(PARTICIPANTS_KEY)
    }

    pub fn save_participants(&self, participants: &[Participant]) -> Result<()> {
        self.save(PARTICIPANTS_KEY, &participants)
    }

    // ===== Families =====

    pub fn load_families(&self) -> Result<Option<CachedData<Vec<Family>>>> {
        self.load(FAMILIES_KEY)
    }

    pub fn save_families(&self, families: &[Family]) -> Result<()> {
        self.save(FAMILIES_KEY, &families)
    }

    // ===== Roster =====

    pub fn save_roster(&self, roster: &Roster) -> Result<()> {
        self.save_participants(&roster.participants)?;
        self.save_families(&roster.families)
    }

    /// Load both lists; a missing entry reads as empty
    pub fn load_roster(&self) -> Result<Roster> {
        let participants = self.load_participants()?.map(|c| c.data).unwrap_or_default();
        let families = self.load_families()?.map(|c| c.data).unwrap_or_default();
        Ok(Roster {
            participants,
            families,
        })
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(&self, name: &str, loader: impl FnOnce() -> Result<Option<CachedData<T>>>) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn cache_ages(&self) -> CacheAges {
        CacheAges {
            participants: self.load_age(PARTICIPANTS_KEY, || self.load_participants()),
            families: self.load_age(FAMILIES_KEY, || self.load_families()),
        }
    }

    /// Check if the roster needs a fresh import
    pub fn any_stale(&self) -> bool {
        let is_stale = |name: &str, stale: Result<Option<bool>>| match stale {
            Ok(Some(stale)) => stale,
            Ok(None) => true,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true
            }
        };
        is_stale(PARTICIPANTS_KEY, self.load_participants().map(|c| c.map(|c| c.is_stale())))
            || is_stale(FAMILIES_KEY, self.load_families().map(|c| c.map(|c| c.is_stale())))
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub participants: Option<String>,
    pub families: Option<String>,
}

impl CacheAges {
    pub fn last_updated(&self) -> String {
        self.participants
            .clone()
            .or_else(|| self.families.clone())
            .unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeSet;

    use crate::models::AgeGroup;

    fn manager() -> (tempfile::TempDir, CacheManager) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache")).unwrap();
        (dir, cache)
    }

    fn roster() -> Roster {
        Roster {
            participants: vec![Participant {
                id: "p1_1".to_string(),
                name: "Jane Doe".to_string(),
                age_group: AgeGroup::Adult,
                family_id: 1,
                roles: BTreeSet::new(),
                checked_in: false,
                phone: None,
                email: Some("jane@x.com".to_string()),
                is_primary_contact: true,
                needs_transportation: false,
            }],
            families: vec![Family {
                id: 1,
                name: "Jane Doe".to_string(),
                primary_contact_id: "p1_1".to_string(),
                phone: None,
                email: Some("jane@x.com".to_string()),
            }],
        }
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_rounding() {
        let mut cached = CachedData::new(());
        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");
        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");
        cached.cached_at = Utc::now() - Duration::hours(26);
        assert_eq!(cached.age_display(), "1d ago");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_roster_save_and_load() {
        let (_dir, cache) = manager();
        assert!(cache.load_participants().unwrap().is_none());
        assert!(cache.any_stale());

        let saved = roster();
        cache.save_roster(&saved).unwrap();
        assert_eq!(cache.load_roster().unwrap(), saved);
        assert!(!cache.any_stale());
        assert_eq!(cache.cache_ages().last_updated(), "just now");
    }

    #[test]
    fn test_load_roster_when_empty() {
        let (_dir, cache) = manager();
        assert_eq!(cache.load_roster().unwrap(), Roster::default());
        assert_eq!(cache.cache_ages().last_updated(), "never");
    }

    #[test]
    fn test_blob_keys() {
        let (_dir, cache) = manager();
        cache.save_blob("room-assignments_v1", &vec!["A", "B"]).unwrap();
        let loaded: CachedData<Vec<String>> = cache.load_blob("room-assignments_v1").unwrap().unwrap();
        assert_eq!(loaded.data, vec!["A".to_string(), "B".to_string()]);

        assert!(cache.remove_blob("room-assignments_v1").unwrap());
        assert!(!cache.remove_blob("room-assignments_v1").unwrap());

        assert!(cache.save_blob("", &1).is_err());
        assert!(cache.save_blob("../escape", &1).is_err());
        assert!(cache.load_blob::<i32>("a/b").is_err());
    }

    #[test]
    fn test_corrupt_cache_file_is_error() {
        let (_dir, cache) = manager();
        std::fs::write(cache.cache_dir().join("families.json"), "not json").unwrap();
        assert!(cache.load_families().is_err());
        assert!(cache.any_stale());
    }
}
