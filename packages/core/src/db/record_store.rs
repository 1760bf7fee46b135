//! RecordStore Trait - Record Store Abstraction
//!
//! The console keeps four independent collections: City, Country, and the two
//! catalogue singletons (GlobalLocations, TradeShowsPage). The store offers
//! single-record reads and writes only; there is no multi-record transaction,
//! so cross-record consistency is orchestrated by the services layer.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: every method is async so embedded and network backends
//!    share one interface
//! 2. **Ownership Semantics**: writes take records by value and return the
//!    stored record
//! 3. **Error Handling**: `anyhow::Result` with [`DatabaseError`](super::DatabaseError)
//!    as the typed cause where one applies
//! 4. **Last Write Wins**: updates are full-record replaces with no version
//!    token; concurrent read-modify-write cycles can lose updates

use crate::models::{City, Country, GlobalLocations, TradeShowsPage};
use anyhow::Result;
use async_trait::async_trait;

/// Keyed storage for the console's collections
///
/// Implementations must be `Send + Sync` so a single store can be shared across
/// request handlers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    //
    // CITIES
    //

    /// Get a City by id (`Ok(None)` if absent)
    async fn get_city(&self, id: &str) -> Result<Option<City>>;

    /// Get a City by its `city_slug`
    async fn get_city_by_slug(&self, slug: &str) -> Result<Option<City>>;

    /// List every City, ordered by name
    async fn list_cities(&self) -> Result<Vec<City>>;

    /// Insert a new City
    ///
    /// # Errors
    ///
    /// Fails with [`DatabaseError::UniqueViolation`](super::DatabaseError::UniqueViolation)
    /// if the id or `city_slug` is already taken.
    async fn insert_city(&self, city: City) -> Result<City>;

    /// Replace an existing City (matched by id)
    async fn update_city(&self, city: City) -> Result<City>;

    /// Delete a City; returns whether a record was removed
    async fn delete_city(&self, id: &str) -> Result<bool>;

    //
    // COUNTRIES
    //

    async fn get_country(&self, id: &str) -> Result<Option<Country>>;

    async fn get_country_by_slug(&self, slug: &str) -> Result<Option<Country>>;

    /// List every Country, ordered by name
    async fn list_countries(&self) -> Result<Vec<Country>>;

    async fn insert_country(&self, country: Country) -> Result<Country>;

    /// Replace an existing Country (matched by id)
    async fn update_country(&self, country: Country) -> Result<Country>;

    async fn delete_country(&self, id: &str) -> Result<bool>;

    //
    // SINGLETONS
    //

    /// Read the GlobalLocations singleton (empty document if never written)
    async fn get_global_locations(&self) -> Result<GlobalLocations>;

    async fn save_global_locations(&self, doc: GlobalLocations) -> Result<GlobalLocations>;

    /// Read the TradeShowsPage singleton (empty document if never written)
    async fn get_trade_shows_page(&self) -> Result<TradeShowsPage>;

    async fn save_trade_shows_page(&self, page: TradeShowsPage) -> Result<TradeShowsPage>;
}
