//! Catalogue Singletons
//!
//! Two legacy-shaped singleton documents hold bare display names for selection
//! UIs elsewhere on the site. They are caches of names, not of City/Country
//! records: a name may exist with no City page behind it, and deleting a City
//! leaves its name in place. The two documents are never reconciled with each
//! other.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The global city/country catalogue (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLocations {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// The trade-shows landing page (singleton)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeShowsPage {
    #[serde(default)]
    pub cities: Vec<String>,

    /// Remaining page content, opaque to the core
    #[serde(default)]
    pub content: Value,
}

impl Default for TradeShowsPage {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            content: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Identifier of one name list inside the catalogue singletons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogueList {
    /// `GlobalLocations.cities`
    GlobalCities,
    /// `GlobalLocations.countries`
    GlobalCountries,
    /// `TradeShowsPage.cities`
    TradeShowCities,
}

impl CatalogueList {
    /// Lists a newly created City's name is added to
    pub const CITY_LISTS: [CatalogueList; 2] =
        [CatalogueList::GlobalCities, CatalogueList::TradeShowCities];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogueList::GlobalCities => "global-cities",
            CatalogueList::GlobalCountries => "global-countries",
            CatalogueList::TradeShowCities => "trade-show-cities",
        }
    }

    /// Public page rendered from the singleton that owns this list
    pub fn public_path(&self) -> &'static str {
        match self {
            CatalogueList::GlobalCities | CatalogueList::GlobalCountries => "/locations",
            CatalogueList::TradeShowCities => "/trade-shows",
        }
    }
}

impl fmt::Display for CatalogueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogueList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global-cities" => Ok(CatalogueList::GlobalCities),
            "global-countries" => Ok(CatalogueList::GlobalCountries),
            "trade-show-cities" => Ok(CatalogueList::TradeShowCities),
            other => Err(format!("unknown catalogue list '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_list_round_trips_through_str() {
        for list in [
            CatalogueList::GlobalCities,
            CatalogueList::GlobalCountries,
            CatalogueList::TradeShowCities,
        ] {
            assert_eq!(list.as_str().parse::<CatalogueList>().unwrap(), list);
        }
        assert!("cities".parse::<CatalogueList>().is_err());
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&CatalogueList::TradeShowCities).unwrap();
        assert_eq!(json, "\"trade-show-cities\"");
    }
}
