//! SurrealStore - RecordStore Implementation for SurrealDB Backend
//!
//! Embedded RocksDB-backed storage for the console collections.
//!
//! # Layout
//!
//! - `city` table, record id = City uuid, unique index on `city_slug`
//! - `country` table, record id = Country uuid, unique index on `slug`
//! - `catalogue` table holding the two singletons under fixed record ids
//!   (`catalogue:global_locations`, `catalogue:trade_shows_page`)
//!
//! Tables are SCHEMALESS so the free-form City content survives unchanged.
//! Timestamps are stored as RFC 3339 strings.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cityline_core::db::{RecordStore, SurrealStore};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SurrealStore::new(PathBuf::from("./data/cityline.db")).await?;
//!     let cities = store.list_cities().await?;
//!     println!("{} cities", cities.len());
//!     Ok(())
//! }
//! ```

use super::{DatabaseError, RecordStore};
use crate::models::{City, Country, GlobalLocations, TradeShowsPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::Surreal;

const GLOBAL_LOCATIONS_KEY: &str = "global_locations";
const TRADE_SHOWS_PAGE_KEY: &str = "trade_shows_page";

/// Internal struct matching the stored `city` document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealCity {
    uuid: String,
    name: String,
    city_slug: String,
    #[serde(default)]
    country_slug: String,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    content: Value,
    created_at: String,
    modified_at: String,
}

/// Internal struct matching the stored `country` document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealCountry {
    uuid: String,
    slug: String,
    name: String,
    #[serde(default)]
    selected_cities: Vec<String>,
    created_at: String,
    modified_at: String,
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl From<SurrealCity> for City {
    fn from(sc: SurrealCity) -> Self {
        City {
            id: sc.uuid,
            name: sc.name,
            city_slug: sc.city_slug,
            country_slug: sc.country_slug,
            is_active: sc.is_active,
            content: sc.content,
            created_at: parse_timestamp(&sc.created_at),
            modified_at: parse_timestamp(&sc.modified_at),
        }
    }
}

impl From<&City> for SurrealCity {
    fn from(city: &City) -> Self {
        SurrealCity {
            uuid: city.id.clone(),
            name: city.name.clone(),
            city_slug: city.city_slug.clone(),
            country_slug: city.country_slug.clone(),
            is_active: city.is_active,
            content: city.content.clone(),
            created_at: city.created_at.to_rfc3339(),
            modified_at: city.modified_at.to_rfc3339(),
        }
    }
}

impl From<SurrealCountry> for Country {
    fn from(sc: SurrealCountry) -> Self {
        Country {
            id: sc.uuid,
            slug: sc.slug,
            name: sc.name,
            selected_cities: sc.selected_cities,
            created_at: parse_timestamp(&sc.created_at),
            modified_at: parse_timestamp(&sc.modified_at),
        }
    }
}

impl From<&Country> for SurrealCountry {
    fn from(country: &Country) -> Self {
        SurrealCountry {
            uuid: country.id.clone(),
            slug: country.slug.clone(),
            name: country.name.clone(),
            selected_cities: country.selected_cities.clone(),
            created_at: country.created_at.to_rfc3339(),
            modified_at: country.modified_at.to_rfc3339(),
        }
    }
}

/// SurrealStore implements RecordStore for the SurrealDB embedded backend
pub struct SurrealStore {
    db: Arc<Surreal<Db>>,
}

impl SurrealStore {
    /// Open (or create) the RocksDB database at `db_path` and define the schema
    ///
    /// # Errors
    ///
    /// Returns error if RocksDB cannot be opened or the schema statements fail.
    pub async fn new(db_path: PathBuf) -> Result<Self> {
        if db_path.as_os_str().is_empty() {
            return Err(DatabaseError::InvalidPath { path: db_path }.into());
        }

        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .context("Failed to initialize SurrealDB with RocksDB backend")?;

        db.use_ns("cityline")
            .use_db("console")
            .await
            .context("Failed to set namespace/database")?;

        let db = Arc::new(db);
        Self::initialize_schema(&db).await?;

        Ok(Self { db })
    }

    async fn initialize_schema(db: &Surreal<Db>) -> Result<()> {
        db.query(
            "
            DEFINE TABLE IF NOT EXISTS city SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS city_slug_unique ON TABLE city COLUMNS city_slug UNIQUE;
            DEFINE TABLE IF NOT EXISTS country SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS country_slug_unique ON TABLE country COLUMNS slug UNIQUE;
            DEFINE TABLE IF NOT EXISTS catalogue SCHEMALESS;
            ",
        )
        .await
        .and_then(|response| response.check())
        .map_err(|e| DatabaseError::initialization_failed(e.to_string()))?;

        Ok(())
    }

    async fn select_cities(&self, query: &'static str, key: &str) -> Result<Vec<City>> {
        let mut response = self
            .db
            .query(query)
            .bind(("key", key.to_string()))
            .await
            .context("Failed to query cities")?;

        let rows: Vec<SurrealCity> = response
            .take(0)
            .context("Failed to extract city rows")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn select_countries(&self, query: &'static str, key: &str) -> Result<Vec<Country>> {
        let mut response = self
            .db
            .query(query)
            .bind(("key", key.to_string()))
            .await
            .context("Failed to query countries")?;

        let rows: Vec<SurrealCountry> = response
            .take(0)
            .context("Failed to extract country rows")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn write_record(&self, statement: &'static str, id: &str, doc: Value) -> Result<()> {
        self.db
            .query(statement)
            .bind(("id", id.to_string()))
            .bind(("doc", doc))
            .await
            .context("Failed to send write")?
            .check()
            .context("Write rejected by database")?;
        Ok(())
    }

    async fn delete_record(&self, table: &'static str, id: &str) -> Result<()> {
        self.db
            .query("DELETE type::thing($table, $id);")
            .bind(("table", table))
            .bind(("id", id.to_string()))
            .await
            .context("Failed to send delete")?
            .check()
            .with_context(|| format!("Failed to delete {} record {}", table, id))?;
        Ok(())
    }

    async fn get_singleton<T>(&self, key: &'static str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut response = self
            .db
            .query("SELECT * FROM type::thing('catalogue', $key);")
            .bind(("key", key))
            .await
            .with_context(|| format!("Failed to read singleton {}", key))?;

        let rows: Vec<T> = response
            .take(0)
            .with_context(|| format!("Failed to extract singleton {}", key))?;
        Ok(rows.into_iter().next())
    }

    async fn save_singleton(&self, key: &'static str, doc: Value) -> Result<()> {
        self.db
            .query("UPSERT type::thing('catalogue', $key) CONTENT $doc;")
            .bind(("key", key))
            .bind(("doc", doc))
            .await
            .with_context(|| format!("Failed to send singleton {}", key))?
            .check()
            .with_context(|| format!("Failed to save singleton {}", key))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SurrealStore {
    async fn get_city(&self, id: &str) -> Result<Option<City>> {
        let rows = self
            .select_cities("SELECT * FROM city WHERE uuid = $key LIMIT 1;", id)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_city_by_slug(&self, slug: &str) -> Result<Option<City>> {
        let rows = self
            .select_cities("SELECT * FROM city WHERE city_slug = $key LIMIT 1;", slug)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        let mut cities = self.select_cities("SELECT * FROM city;", "").await?;
        cities.sort_by_key(|c| c.name.to_lowercase());
        Ok(cities)
    }

    async fn insert_city(&self, city: City) -> Result<City> {
        if self.get_city(&city.id).await?.is_some() {
            return Err(DatabaseError::unique_violation("city", "id", city.id).into());
        }
        if self.get_city_by_slug(&city.city_slug).await?.is_some() {
            return Err(
                DatabaseError::unique_violation("city", "city_slug", city.city_slug).into(),
            );
        }

        let doc = serde_json::to_value(SurrealCity::from(&city))?;
        self.write_record("CREATE type::thing('city', $id) CONTENT $doc;", &city.id, doc)
            .await
            .context("Failed to create city")?;
        Ok(city)
    }

    async fn update_city(&self, city: City) -> Result<City> {
        if self.get_city(&city.id).await?.is_none() {
            return Err(DatabaseError::record_not_found("city", city.id).into());
        }

        let doc = serde_json::to_value(SurrealCity::from(&city))?;
        self.write_record("UPDATE type::thing('city', $id) CONTENT $doc;", &city.id, doc)
            .await
            .context("Failed to update city")?;
        Ok(city)
    }

    async fn delete_city(&self, id: &str) -> Result<bool> {
        if self.get_city(id).await?.is_none() {
            return Ok(false);
        }
        self.delete_record("city", id).await?;
        Ok(true)
    }

    async fn get_country(&self, id: &str) -> Result<Option<Country>> {
        let rows = self
            .select_countries("SELECT * FROM country WHERE uuid = $key LIMIT 1;", id)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_country_by_slug(&self, slug: &str) -> Result<Option<Country>> {
        let rows = self
            .select_countries("SELECT * FROM country WHERE slug = $key LIMIT 1;", slug)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        let mut countries = self.select_countries("SELECT * FROM country;", "").await?;
        countries.sort_by_key(|c| c.name.to_lowercase());
        Ok(countries)
    }

    async fn insert_country(&self, country: Country) -> Result<Country> {
        if self.get_country(&country.id).await?.is_some() {
            return Err(DatabaseError::unique_violation("country", "id", country.id).into());
        }
        if self.get_country_by_slug(&country.slug).await?.is_some() {
            return Err(DatabaseError::unique_violation("country", "slug", country.slug).into());
        }

        let doc = serde_json::to_value(SurrealCountry::from(&country))?;
        self.write_record(
            "CREATE type::thing('country', $id) CONTENT $doc;",
            &country.id,
            doc,
        )
        .await
        .context("Failed to create country")?;
        Ok(country)
    }

    async fn update_country(&self, country: Country) -> Result<Country> {
        if self.get_country(&country.id).await?.is_none() {
            return Err(DatabaseError::record_not_found("country", country.id).into());
        }

        let doc = serde_json::to_value(SurrealCountry::from(&country))?;
        self.write_record(
            "UPDATE type::thing('country', $id) CONTENT $doc;",
            &country.id,
            doc,
        )
        .await
        .context("Failed to update country")?;
        Ok(country)
    }

    async fn delete_country(&self, id: &str) -> Result<bool> {
        if self.get_country(id).await?.is_none() {
            return Ok(false);
        }
        self.delete_record("country", id).await?;
        Ok(true)
    }

    async fn get_global_locations(&self) -> Result<GlobalLocations> {
        Ok(self
            .get_singleton(GLOBAL_LOCATIONS_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn save_global_locations(&self, doc: GlobalLocations) -> Result<GlobalLocations> {
        self.save_singleton(GLOBAL_LOCATIONS_KEY, serde_json::to_value(&doc)?)
            .await?;
        Ok(doc)
    }

    async fn get_trade_shows_page(&self) -> Result<TradeShowsPage> {
        Ok(self
            .get_singleton(TRADE_SHOWS_PAGE_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn save_trade_shows_page(&self, page: TradeShowsPage) -> Result<TradeShowsPage> {
        self.save_singleton(TRADE_SHOWS_PAGE_KEY, serde_json::to_value(&page)?)
            .await?;
        Ok(page)
    }
}
