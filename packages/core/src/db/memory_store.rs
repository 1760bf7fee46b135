//! MemoryStore - In-process RecordStore
//!
//! Backs the console when no database path is configured and serves as the
//! store for tests. State lives behind a single `tokio::sync::RwLock`, so each
//! call is atomic on its own while sequences of calls are not, matching the
//! guarantees of the persistent backend.

use super::{DatabaseError, RecordStore};
use crate::models::{City, Country, GlobalLocations, TradeShowsPage};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    cities: HashMap<String, City>,
    countries: HashMap<String, Country>,
    global_locations: GlobalLocations,
    trade_shows_page: TradeShowsPage,
}

/// RecordStore backed by in-process hash maps
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name<T, F>(mut records: Vec<T>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    records.sort_by_key(|r| name(r).to_lowercase());
    records
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_city(&self, id: &str) -> Result<Option<City>> {
        Ok(self.state.read().await.cities.get(id).cloned())
    }

    async fn get_city_by_slug(&self, slug: &str) -> Result<Option<City>> {
        let state = self.state.read().await;
        Ok(state
            .cities
            .values()
            .find(|c| c.city_slug == slug)
            .cloned())
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        let cities = self.state.read().await.cities.values().cloned().collect();
        Ok(sorted_by_name(cities, |c: &City| c.name.as_str()))
    }

    async fn insert_city(&self, city: City) -> Result<City> {
        let mut state = self.state.write().await;
        if state.cities.contains_key(&city.id) {
            return Err(DatabaseError::unique_violation("city", "id", city.id).into());
        }
        if state.cities.values().any(|c| c.city_slug == city.city_slug) {
            return Err(
                DatabaseError::unique_violation("city", "city_slug", city.city_slug).into(),
            );
        }
        state.cities.insert(city.id.clone(), city.clone());
        Ok(city)
    }

    async fn update_city(&self, city: City) -> Result<City> {
        let mut state = self.state.write().await;
        match state.cities.get_mut(&city.id) {
            Some(existing) => {
                *existing = city.clone();
                Ok(city)
            }
            None => Err(DatabaseError::record_not_found("city", city.id).into()),
        }
    }

    async fn delete_city(&self, id: &str) -> Result<bool> {
        Ok(self.state.write().await.cities.remove(id).is_some())
    }

    async fn get_country(&self, id: &str) -> Result<Option<Country>> {
        Ok(self.state.read().await.countries.get(id).cloned())
    }

    async fn get_country_by_slug(&self, slug: &str) -> Result<Option<Country>> {
        let state = self.state.read().await;
        Ok(state.countries.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        let countries = self.state.read().await.countries.values().cloned().collect();
        Ok(sorted_by_name(countries, |c: &Country| c.name.as_str()))
    }

    async fn insert_country(&self, country: Country) -> Result<Country> {
        let mut state = self.state.write().await;
        if state.countries.contains_key(&country.id) {
            return Err(DatabaseError::unique_violation("country", "id", country.id).into());
        }
        if state.countries.values().any(|c| c.slug == country.slug) {
            return Err(DatabaseError::unique_violation("country", "slug", country.slug).into());
        }
        state.countries.insert(country.id.clone(), country.clone());
        Ok(country)
    }

    async fn update_country(&self, country: Country) -> Result<Country> {
        let mut state = self.state.write().await;
        match state.countries.get_mut(&country.id) {
            Some(existing) => {
                *existing = country.clone();
                Ok(country)
            }
            None => Err(DatabaseError::record_not_found("country", country.id).into()),
        }
    }

    async fn delete_country(&self, id: &str) -> Result<bool> {
        Ok(self.state.write().await.countries.remove(id).is_some())
    }

    async fn get_global_locations(&self) -> Result<GlobalLocations> {
        Ok(self.state.read().await.global_locations.clone())
    }

    async fn save_global_locations(&self, doc: GlobalLocations) -> Result<GlobalLocations> {
        self.state.write().await.global_locations = doc.clone();
        Ok(doc)
    }

    async fn get_trade_shows_page(&self) -> Result<TradeShowsPage> {
        Ok(self.state.read().await.trade_shows_page.clone())
    }

    async fn save_trade_shows_page(&self, page: TradeShowsPage) -> Result<TradeShowsPage> {
        self.state.write().await.trade_shows_page = page.clone();
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCity, NewCountry};

    #[tokio::test]
    async fn test_insert_rejects_duplicate_city_slug() -> Result<()> {
        let store = MemoryStore::new();
        store
            .insert_city(City::from_new(NewCity::new("Lyon", ""), "lyon".into()))
            .await?;

        let err = store
            .insert_city(City::from_new(NewCity::new("LYON", ""), "lyon".into()))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::UniqueViolation { field: "city_slug", .. })
        ));
        assert_eq!(store.list_cities().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_country_fails() {
        let store = MemoryStore::new();
        let ghost = Country::from_new(NewCountry::new("atlantis", "Atlantis"));
        assert!(store.update_country(ghost).await.is_err());
    }

    #[tokio::test]
    async fn test_lists_are_sorted_by_name() -> Result<()> {
        let store = MemoryStore::new();
        for (slug, name) in [("spain", "Spain"), ("austria", "austria"), ("france", "France")] {
            store
                .insert_country(Country::from_new(NewCountry::new(slug, name)))
                .await?;
        }

        let names: Vec<String> = store
            .list_countries()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["austria", "France", "Spain"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_singletons_default_to_empty() -> Result<()> {
        let store = MemoryStore::new();
        assert!(store.get_global_locations().await?.cities.is_empty());
        assert!(store.get_trade_shows_page().await?.cities.is_empty());
        Ok(())
    }
}
