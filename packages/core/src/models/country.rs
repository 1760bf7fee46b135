//! Country Model
//!
//! `selected_cities` is a denormalized, curated list of City slugs shown on the
//! Country page. It is kept in step with `City::country_slug` by the city
//! coordinator on a best-effort basis; readers must tolerate slugs that no
//! longer resolve to a City.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted Country record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,

    /// Stable slug, referenced by `City::country_slug`
    pub slug: String,

    pub name: String,

    /// City slugs chosen for display on this Country's page (ordered)
    #[serde(default)]
    pub selected_cities: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Country {
    pub fn from_new(new_country: NewCountry) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: new_country.slug.trim().to_string(),
            name: new_country.name.trim().to_string(),
            selected_cities: new_country.selected_cities,
            created_at: now,
            modified_at: now,
        }
    }

    /// Whether the given City slug is currently selected
    pub fn selects(&self, city_slug: &str) -> bool {
        self.selected_cities.iter().any(|s| s == city_slug)
    }

    pub fn public_path(&self) -> String {
        format!("/countries/{}", self.slug)
    }
}

/// Request payload for creating a Country
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCountry {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub selected_cities: Vec<String>,
}

impl NewCountry {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            selected_cities: Vec::new(),
        }
    }

    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_cities = cities.into_iter().map(Into::into).collect();
        self
    }
}
