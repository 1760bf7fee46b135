//! City Model
//!
//! A City page owns a stable `city_slug` (derived from its display name at
//! creation) and a mutable `country_slug` pointing at its owning Country.
//! Everything else on the page is free-form content the core never inspects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A persisted City record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Display name, unique case-insensitively among Cities
    pub name: String,

    /// Canonical slug derived from `name`, stable once created
    pub city_slug: String,

    /// Slug of the owning Country (empty when unassigned)
    #[serde(default)]
    pub country_slug: String,

    /// Whether the public page is live
    #[serde(default)]
    pub is_active: bool,

    /// Free-form page content (hero image, copy blocks, SEO fields, ...)
    #[serde(default = "empty_content")]
    pub content: Value,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl City {
    /// Build a City record from a creation request and its derived slug
    pub fn from_new(new_city: NewCity, city_slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: new_city.name.trim().to_string(),
            city_slug,
            country_slug: new_city.country_slug.trim().to_string(),
            is_active: new_city.is_active,
            content: new_city.content,
            created_at: now,
            modified_at: now,
        }
    }

    /// Public site path for this City, used for cache revalidation
    pub fn public_path(&self) -> String {
        city_path(&self.city_slug)
    }

    /// Apply a sparse update, leaving `city_slug` untouched
    pub fn apply(&mut self, update: &CityUpdate) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(country_slug) = &update.country_slug {
            self.country_slug = country_slug.trim().to_string();
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        self.modified_at = Utc::now();
    }
}

/// Public site path for a City slug
pub fn city_path(city_slug: &str) -> String {
    format!("/cities/{}", city_slug)
}

/// Request payload for creating a City
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCity {
    pub name: String,

    #[serde(default)]
    pub country_slug: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default = "empty_content")]
    pub content: Value,
}

impl NewCity {
    pub fn new(name: impl Into<String>, country_slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country_slug: country_slug.into(),
            is_active: false,
            content: empty_content(),
        }
    }
}

/// Sparse update for an existing City
///
/// `None` fields are left unchanged. There is no `city_slug`
/// field: slugs are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Submitted owning Country. An explicit empty string detaches the City.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_country_slug"
    )]
    pub country_slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl CityUpdate {
    /// Update that only moves the City to another Country
    pub fn reparent(country_slug: impl Into<String>) -> Self {
        Self {
            country_slug: Some(country_slug.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.country_slug.is_none()
            && self.is_active.is_none()
            && self.content.is_none()
    }
}

/// `null` is read as "detach" (empty slug) rather than "unchanged"
fn deserialize_country_slug<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(Some(value.unwrap_or_default()))
}

fn empty_content() -> Value {
    Value::Object(serde_json::Map::new())
}
