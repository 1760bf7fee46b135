//! Country Reference Cleaner
//!
//! `Country::selected_cities` is the denormalized mirror of
//! `City::country_slug`. This module is the only place that edits it:
//!
//! - [`CountryLinks::link`] / [`CountryLinks::unlink`] move one City slug in or
//!   out of one Country (used by re-parenting)
//! - [`CountryLinks::remove_city_everywhere`] strips a deleted City's slug from
//!   every Country (used by delete)
//!
//! Each Country write is independent. There is no rollback across Countries;
//! readers already tolerate slugs that do not resolve to a City.

use super::error::SyncError;
use super::revalidation::RevalidationNotifier;
use super::slug::slugify;
use crate::db::RecordStore;
use crate::models::{Country, NewCountry};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Result of a single link/unlink attempt that reached the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Slug added to `selected_cities`
    Linked,
    /// Slug was already selected; nothing written
    AlreadyLinked,
    /// Slug removed from `selected_cities`
    Unlinked,
    /// Slug was not selected; nothing written
    AlreadyUnlinked,
    /// No Country with the given slug exists
    CountryMissing,
}

/// Per-Country result of a delete cleanup broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Countries inspected
    pub scanned: usize,
    /// Slugs of Countries whose `selected_cities` were rewritten
    pub cleaned: Vec<String>,
    /// `(country slug, error)` for every write that failed
    pub failed: Vec<(String, String)>,
    /// Set when the Countries could not be listed at all
    pub list_error: Option<String>,
}

impl CleanupReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.list_error.is_none()
    }

    /// Human-readable lines for each failure
    pub fn failure_messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .failed
            .iter()
            .map(|(slug, err)| format!("country '{}' still references the city: {}", slug, err))
            .collect();
        if let Some(err) = &self.list_error {
            messages.push(format!("could not list countries for cleanup: {}", err));
        }
        messages
    }
}

/// Narrow interface over Country `selected_cities` edits
#[derive(Clone)]
pub struct CountryLinks {
    store: Arc<dyn RecordStore>,
    notifier: RevalidationNotifier,
}

impl CountryLinks {
    pub fn new(store: Arc<dyn RecordStore>, notifier: RevalidationNotifier) -> Self {
        Self { store, notifier }
    }

    /// Append `city_slug` to the Country's `selected_cities` if absent
    pub async fn link(&self, country_slug: &str, city_slug: &str) -> Result<LinkOutcome> {
        let Some(mut country) = self.store.get_country_by_slug(country_slug).await? else {
            return Ok(LinkOutcome::CountryMissing);
        };
        if country.selects(city_slug) {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        country.selected_cities.push(city_slug.to_string());
        self.save(country).await?;
        Ok(LinkOutcome::Linked)
    }

    /// Remove `city_slug` from the Country's `selected_cities` if present
    pub async fn unlink(&self, country_slug: &str, city_slug: &str) -> Result<LinkOutcome> {
        let Some(mut country) = self.store.get_country_by_slug(country_slug).await? else {
            return Ok(LinkOutcome::CountryMissing);
        };
        if !country.selects(city_slug) {
            return Ok(LinkOutcome::AlreadyUnlinked);
        }

        country.selected_cities.retain(|s| s != city_slug);
        self.save(country).await?;
        Ok(LinkOutcome::Unlinked)
    }

    /// Strip `city_slug` from every Country that selects it
    ///
    /// Never fails: each Country is written independently, failures are logged
    /// and collected, and the loop always runs to the end.
    pub async fn remove_city_everywhere(&self, city_slug: &str) -> CleanupReport {
        let mut report = CleanupReport::default();

        let countries = match self.store.list_countries().await {
            Ok(countries) => countries,
            Err(e) => {
                tracing::warn!("Cleanup for city '{}' could not list countries: {:#}", city_slug, e);
                report.list_error = Some(format!("{:#}", e));
                return report;
            }
        };

        report.scanned = countries.len();
        for mut country in countries {
            if !country.selects(city_slug) {
                continue;
            }
            country.selected_cities.retain(|s| s != city_slug);
            let slug = country.slug.clone();
            match self.save(country).await {
                Ok(_) => report.cleaned.push(slug),
                Err(e) => {
                    tracing::warn!(
                        "Failed to remove city '{}' from country '{}': {:#}",
                        city_slug,
                        slug,
                        e
                    );
                    report.failed.push((slug, format!("{:#}", e)));
                }
            }
        }

        tracing::debug!(
            "Cleanup for city '{}': scanned {}, cleaned {}, failed {}",
            city_slug,
            report.scanned,
            report.cleaned.len(),
            report.failed.len()
        );
        report
    }

    /// All Countries, ordered by name
    pub async fn list_countries(&self) -> Result<Vec<Country>, SyncError> {
        self.store
            .list_countries()
            .await
            .map_err(|e| SyncError::persistence("list countries", e))
    }

    /// Insert a Country record; the slug is derived from the name when blank
    pub async fn create_country(&self, mut new_country: NewCountry) -> Result<Country, SyncError> {
        if new_country.name.trim().is_empty() {
            return Err(SyncError::invalid_input("country name cannot be empty"));
        }
        if new_country.slug.trim().is_empty() {
            new_country.slug = slugify(&new_country.name);
        }

        let country = self
            .store
            .insert_country(Country::from_new(new_country))
            .await
            .map_err(|e| SyncError::persistence("insert country", e))?;
        self.notifier.notify(country.public_path()).detach();
        Ok(country)
    }

    async fn save(&self, mut country: Country) -> Result<Country> {
        country.modified_at = Utc::now();
        let saved = self.store.update_country(country).await?;
        self.notifier.notify(saved.public_path()).detach();
        Ok(saved)
    }
}
