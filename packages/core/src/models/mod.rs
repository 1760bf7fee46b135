//! Data Models
//!
//! Record shapes for the four collections the console manages:
//!
//! - [`City`] - city pages, owned by a Country via `country_slug`
//! - [`Country`] - country pages with a curated `selected_cities` list
//! - [`GlobalLocations`] / [`TradeShowsPage`] - singleton name catalogues

mod catalogue;
mod city;
mod country;

pub use catalogue::{CatalogueList, GlobalLocations, TradeShowsPage};
pub use city::{city_path, City, CityUpdate, NewCity};
pub use country::{Country, NewCountry};
