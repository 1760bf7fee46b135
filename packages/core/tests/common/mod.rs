//! Shared test helpers: a fault-injecting record store and revalidation sinks

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use cityline_core::db::{MemoryStore, RecordStore};
use cityline_core::models::{City, Country, GlobalLocations, NewCountry, TradeShowsPage};
use cityline_core::services::RevalidationSink;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Which operations should fail
#[derive(Debug, Default)]
pub struct Faults {
    pub country_fetch: HashSet<String>,
    pub country_update: HashSet<String>,
    pub list_countries: bool,
    pub city_insert: bool,
    pub city_update: bool,
    pub city_delete: bool,
    pub global_locations_save: bool,
    pub trade_shows_save: bool,
}

/// MemoryStore wrapper that fails selected operations on demand
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    faults: Mutex<Faults>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inject<F: FnOnce(&mut Faults)>(&self, f: F) {
        f(&mut self.faults.lock().unwrap());
    }

    pub fn heal(&self) {
        *self.faults.lock().unwrap() = Faults::default();
    }

    fn check<F: FnOnce(&Faults) -> bool>(&self, f: F, what: &str) -> Result<()> {
        if f(&self.faults.lock().unwrap()) {
            bail!("injected failure: {}", what);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn get_city(&self, id: &str) -> Result<Option<City>> {
        self.inner.get_city(id).await
    }

    async fn get_city_by_slug(&self, slug: &str) -> Result<Option<City>> {
        self.inner.get_city_by_slug(slug).await
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        self.inner.list_cities().await
    }

    async fn insert_city(&self, city: City) -> Result<City> {
        self.check(|f| f.city_insert, "insert city")?;
        self.inner.insert_city(city).await
    }

    async fn update_city(&self, city: City) -> Result<City> {
        self.check(|f| f.city_update, "update city")?;
        self.inner.update_city(city).await
    }

    async fn delete_city(&self, id: &str) -> Result<bool> {
        self.check(|f| f.city_delete, "delete city")?;
        self.inner.delete_city(id).await
    }

    async fn get_country(&self, id: &str) -> Result<Option<Country>> {
        self.inner.get_country(id).await
    }

    async fn get_country_by_slug(&self, slug: &str) -> Result<Option<Country>> {
        self.check(|f| f.country_fetch.contains(slug), "fetch country")?;
        self.inner.get_country_by_slug(slug).await
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        self.check(|f| f.list_countries, "list countries")?;
        self.inner.list_countries().await
    }

    async fn insert_country(&self, country: Country) -> Result<Country> {
        self.inner.insert_country(country).await
    }

    async fn update_country(&self, country: Country) -> Result<Country> {
        self.check(
            |f| f.country_update.contains(&country.slug),
            "update country",
        )?;
        self.inner.update_country(country).await
    }

    async fn delete_country(&self, id: &str) -> Result<bool> {
        self.inner.delete_country(id).await
    }

    async fn get_global_locations(&self) -> Result<GlobalLocations> {
        self.inner.get_global_locations().await
    }

    async fn save_global_locations(&self, doc: GlobalLocations) -> Result<GlobalLocations> {
        self.check(|f| f.global_locations_save, "save global locations")?;
        self.inner.save_global_locations(doc).await
    }

    async fn get_trade_shows_page(&self) -> Result<TradeShowsPage> {
        self.inner.get_trade_shows_page().await
    }

    async fn save_trade_shows_page(&self, page: TradeShowsPage) -> Result<TradeShowsPage> {
        self.check(|f| f.trade_shows_save, "save trade shows page")?;
        self.inner.save_trade_shows_page(page).await
    }
}

/// Insert a Country directly, bypassing the services
pub async fn seed_country(store: &FlakyStore, slug: &str, name: &str, cities: &[&str]) -> Country {
    store
        .insert_country(Country::from_new(
            NewCountry::new(slug, name).with_cities(cities.iter().copied()),
        ))
        .await
        .unwrap()
}

pub async fn selected_cities(store: &FlakyStore, slug: &str) -> Vec<String> {
    store
        .get_country_by_slug(slug)
        .await
        .unwrap()
        .unwrap()
        .selected_cities
}

/// Sink that records every path it is asked to revalidate
#[derive(Default)]
pub struct RecordingSink {
    paths: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl RevalidationSink for RecordingSink {
    async fn send(&self, path: &str) -> Result<()> {
        self.paths.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

/// Sink whose every request fails like a dead network
pub struct FailingSink;

#[async_trait]
impl RevalidationSink for FailingSink {
    async fn send(&self, path: &str) -> Result<()> {
        bail!("network unreachable while revalidating {}", path)
    }
}

/// Wait (up to one second) until the sink has seen `count` paths
pub async fn wait_for_paths(sink: &RecordingSink, count: usize) -> Vec<String> {
    for _ in 0..100 {
        let paths = sink.paths();
        if paths.len() >= count {
            return paths;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    sink.paths()
}
