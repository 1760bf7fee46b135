//! Business Services
//!
//! - `CityCoordinator` - create / update / delete flows for Cities
//! - `CountryLinks` - the only writer of `Country::selected_cities`
//! - `NameCatalogue` - add/remove names in the catalogue singletons
//! - `SlugGuard` - slug derivation and name uniqueness checks
//! - `RevalidationNotifier` - detached cache invalidation for the public site
//!
//! Services talk to persistence exclusively through [`RecordStore`](crate::db::RecordStore).

pub mod catalogue;
pub mod city_coordinator;
pub mod country_links;
pub mod error;
pub mod revalidation;
pub mod slug;

pub use catalogue::{add_if_absent, remove_if_present, CatalogueChange, NameCatalogue};
pub use city_coordinator::{
    CityCoordinator, FlowError, FlowOutcome, FlowResult, StepOutcome, SyncState,
};
pub use country_links::{CleanupReport, CountryLinks, LinkOutcome};
pub use error::SyncError;
pub use revalidation::{
    Dispatched, HttpRevalidationSink, RevalidationNotifier, RevalidationOutcome,
    RevalidationSink,
};
pub use slug::{slugify, GuardVerdict, SlugGuard};
