//! Slug/Uniqueness Guard
//!
//! Derives the canonical `city_slug` from a display name and checks that a
//! new (or renamed) City would not collide with an existing one.
//!
//! The check is optimistic: it reads the current Cities and compares, with no
//! lock held between the check and the insert. Two racing creates can both
//! pass; the store's unique index on `city_slug` is the only backstop.

use super::error::SyncError;
use crate::db::RecordStore;
use crate::models::City;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, OnceLock};

/// Runs of anything that is not a letter or digit collapse to one hyphen
const SLUG_SEPARATOR_PATTERN: &str = r"[^\p{L}\p{N}]+";

/// Derive the canonical slug for a display name
///
/// Lowercases, collapses punctuation and whitespace runs into single hyphens,
/// and trims leading/trailing hyphens.
///
/// ```
/// use cityline_core::services::slug::slugify;
///
/// assert_eq!(slugify("  New York City "), "new-york-city");
/// assert_eq!(slugify("St. Louis"), "st-louis");
/// assert_eq!(slugify("Zürich"), "zürich");
/// ```
pub fn slugify(name: &str) -> String {
    static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let separator = SEPARATOR_REGEX.get_or_init(|| Regex::new(SLUG_SEPARATOR_PATTERN).unwrap());

    let lowered = name.trim().to_lowercase();
    separator
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Case-insensitive comparison key for display names
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardVerdict {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Slug the name would receive
    pub slug: String,
}

impl GuardVerdict {
    fn allowed(slug: String) -> Self {
        Self {
            ok: true,
            reason: None,
            slug,
        }
    }

    fn conflict(slug: String, reason: String) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
            slug,
        }
    }

    /// Convert a conflict into `SyncError::DuplicateCity`
    pub fn into_result(self, name: &str) -> Result<String, SyncError> {
        match self.reason {
            Some(reason) if !self.ok => Err(SyncError::duplicate_city(name.trim(), reason)),
            _ => Ok(self.slug),
        }
    }
}

/// Read-only uniqueness checks against the City collection
pub struct SlugGuard {
    store: Arc<dyn RecordStore>,
}

impl SlugGuard {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Check whether a City called `name` may be created
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the name is blank or has no sluggable characters
    /// - `PersistenceError` if Cities cannot be listed
    pub async fn can_create_city(&self, name: &str) -> Result<GuardVerdict, SyncError> {
        self.check(name, None).await
    }

    /// Check whether City `city_id` may be renamed to `name`
    ///
    /// The City's own record is ignored, so re-submitting the current name (in
    /// any case) passes. Only names are compared: a rename never changes
    /// `city_slug`, so a slug shared with another City is not a conflict. The
    /// slug in the verdict is informational only.
    pub async fn can_rename_city(
        &self,
        city_id: &str,
        name: &str,
    ) -> Result<GuardVerdict, SyncError> {
        self.check(name, Some(city_id)).await
    }

    async fn check(&self, name: &str, exclude_id: Option<&str>) -> Result<GuardVerdict, SyncError> {
        let key = name_key(name);
        if key.is_empty() {
            return Err(SyncError::invalid_input("city name cannot be empty"));
        }
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(SyncError::invalid_input(format!(
                "city name '{}' produces an empty slug",
                name.trim()
            )));
        }

        let cities = self
            .store
            .list_cities()
            .await
            .map_err(|e| SyncError::persistence("list cities for uniqueness check", e))?;

        let conflict = match exclude_id {
            Some(id) => find_name_conflict(cities.iter().filter(|c| c.id != id), &key),
            None => find_conflict(cities.iter(), &key, &slug),
        };

        Ok(match conflict {
            Some(reason) => {
                tracing::debug!("Uniqueness guard rejected '{}': {}", name.trim(), reason);
                GuardVerdict::conflict(slug, reason)
            }
            None => GuardVerdict::allowed(slug),
        })
    }
}

fn name_conflict_reason(city: &City) -> String {
    format!("name matches existing city '{}'", city.name)
}

fn find_name_conflict<'a>(
    mut cities: impl Iterator<Item = &'a City>,
    key: &str,
) -> Option<String> {
    cities
        .find(|city| name_key(&city.name) == key)
        .map(name_conflict_reason)
}

/// Name or slug collision, for a City that does not exist yet
fn find_conflict<'a>(
    cities: impl Iterator<Item = &'a City>,
    key: &str,
    slug: &str,
) -> Option<String> {
    for city in cities {
        if name_key(&city.name) == key {
            return Some(name_conflict_reason(city));
        }
        if city.city_slug == slug {
            return Some(format!(
                "slug '{}' is already used by city '{}'",
                slug, city.name
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::NewCity;

    async fn guard_with(names: &[&str]) -> SlugGuard {
        let store = Arc::new(MemoryStore::new());
        for name in names {
            store
                .insert_city(City::from_new(NewCity::new(*name, ""), slugify(name)))
                .await
                .unwrap();
        }
        SlugGuard::new(store)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Lyon"), "lyon");
        assert_eq!(slugify("Rio de Janeiro"), "rio-de-janeiro");
        assert_eq!(slugify("--Frankfurt (Main)--"), "frankfurt-main");
        assert_eq!(slugify("São Paulo"), "são-paulo");
        assert_eq!(slugify("!!!"), "");
    }

    #[tokio::test]
    async fn test_case_insensitive_name_conflict() {
        let guard = guard_with(&["Lyon"]).await;

        let verdict = guard.can_create_city("  lYoN ").await.unwrap();
        assert!(!verdict.ok);
        assert!(verdict.reason.unwrap().contains("Lyon"));

        assert!(guard.can_create_city("Marseille").await.unwrap().ok);
    }

    #[tokio::test]
    async fn test_slug_collision_is_a_conflict() {
        let guard = guard_with(&["St. Louis"]).await;
        let verdict = guard.can_create_city("St Louis").await.unwrap();
        assert!(!verdict.ok);
        assert_eq!(verdict.slug, "st-louis");
    }

    #[tokio::test]
    async fn test_blank_name_is_invalid() {
        let guard = guard_with(&[]).await;
        assert!(matches!(
            guard.can_create_city("   ").await,
            Err(SyncError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_ignores_own_record() {
        let store = Arc::new(MemoryStore::new());
        let lyon = store
            .insert_city(City::from_new(NewCity::new("Lyon", ""), "lyon".into()))
            .await
            .unwrap();
        store
            .insert_city(City::from_new(NewCity::new("Nice", ""), "nice".into()))
            .await
            .unwrap();
        let guard = SlugGuard::new(store);

        assert!(guard.can_rename_city(&lyon.id, "LYON").await.unwrap().ok);
        assert!(!guard.can_rename_city(&lyon.id, "nice").await.unwrap().ok);
    }

    #[tokio::test]
    async fn test_rename_onto_shared_slug_is_allowed() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_city(City::from_new(NewCity::new("St. Louis", ""), "st-louis".into()))
            .await
            .unwrap();
        let lyon = store
            .insert_city(City::from_new(NewCity::new("Lyon", ""), "lyon".into()))
            .await
            .unwrap();
        let guard = SlugGuard::new(store);

        let verdict = guard.can_rename_city(&lyon.id, "St Louis").await.unwrap();
        assert!(verdict.ok);
        assert!(!guard.can_rename_city(&lyon.id, "st. louis").await.unwrap().ok);
        // A new City with that name would still collide on the slug
        assert!(!guard.can_create_city("St Louis").await.unwrap().ok);
    }

    #[test]
    fn test_verdict_into_result() {
        let verdict = GuardVerdict::conflict("lyon".into(), "taken".into());
        assert!(matches!(
            verdict.into_result("Lyon"),
            Err(SyncError::DuplicateCity { .. })
        ));
        assert_eq!(
            GuardVerdict::allowed("lyon".into()).into_result("Lyon").unwrap(),
            "lyon"
        );
    }
}
