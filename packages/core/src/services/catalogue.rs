//! Global Catalogue Maintainer
//!
//! Name lists in the catalogue singletons are edited through one service
//! addressed by [`CatalogueList`], instead of each caller reading and writing
//! GlobalLocations / TradeShowsPage itself.
//!
//! Comparison is case-insensitive on trimmed names; the stored spelling is the
//! one first added. Every write is read-modify-write on the whole singleton
//! with no concurrency token, so concurrent edits can lose updates.

use super::error::SyncError;
use super::revalidation::RevalidationNotifier;
use super::slug::name_key;
use crate::db::RecordStore;
use crate::models::CatalogueList;
use serde::Serialize;
use std::sync::Arc;

/// Return `list` with `name` appended unless an equal name (any case) exists
pub fn add_if_absent(list: &[String], name: &str) -> Vec<String> {
    let key = name_key(name);
    let mut names = list.to_vec();
    if !names.iter().any(|existing| name_key(existing) == key) {
        names.push(name.trim().to_string());
    }
    names
}

/// Return `list` without any entry equal to `name` (any case)
pub fn remove_if_present(list: &[String], name: &str) -> Vec<String> {
    let key = name_key(name);
    list.iter()
        .filter(|existing| name_key(existing) != key)
        .cloned()
        .collect()
}

/// Result of a catalogue edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueChange {
    pub list: CatalogueList,
    /// Contents of the list after the edit
    pub names: Vec<String>,
    /// False when the edit was a no-op and nothing was written
    pub changed: bool,
}

/// Scoped access to the catalogue name lists
#[derive(Clone)]
pub struct NameCatalogue {
    store: Arc<dyn RecordStore>,
    notifier: RevalidationNotifier,
}

impl NameCatalogue {
    pub fn new(store: Arc<dyn RecordStore>, notifier: RevalidationNotifier) -> Self {
        Self { store, notifier }
    }

    /// Current contents of a list
    pub async fn names(&self, list: CatalogueList) -> Result<Vec<String>, SyncError> {
        let read = async {
            Ok::<_, anyhow::Error>(match list {
                CatalogueList::GlobalCities => self.store.get_global_locations().await?.cities,
                CatalogueList::GlobalCountries => {
                    self.store.get_global_locations().await?.countries
                }
                CatalogueList::TradeShowCities => self.store.get_trade_shows_page().await?.cities,
            })
        };
        read.await
            .map_err(|e| SyncError::persistence(&format!("read catalogue {}", list), e))
    }

    /// Add `name` to `list` if no case-insensitive match is present
    pub async fn add_name(
        &self,
        list: CatalogueList,
        name: &str,
    ) -> Result<CatalogueChange, SyncError> {
        self.edit(list, name, add_if_absent).await
    }

    /// Remove every case-insensitive match of `name` from `list`
    pub async fn remove_name(
        &self,
        list: CatalogueList,
        name: &str,
    ) -> Result<CatalogueChange, SyncError> {
        self.edit(list, name, remove_if_present).await
    }

    async fn edit(
        &self,
        list: CatalogueList,
        name: &str,
        op: fn(&[String], &str) -> Vec<String>,
    ) -> Result<CatalogueChange, SyncError> {
        if name.trim().is_empty() {
            return Err(SyncError::invalid_input("catalogue name cannot be empty"));
        }

        let change = self
            .write(list, name, op)
            .await
            .map_err(|e| SyncError::persistence(&format!("update catalogue {}", list), e))?;

        if change.changed {
            tracing::info!("Catalogue {} updated with '{}'", list, name.trim());
            self.notifier.notify(list.public_path()).detach();
        }
        Ok(change)
    }

    async fn write(
        &self,
        list: CatalogueList,
        name: &str,
        op: fn(&[String], &str) -> Vec<String>,
    ) -> anyhow::Result<CatalogueChange> {
        let (names, changed) = match list {
            CatalogueList::GlobalCities | CatalogueList::GlobalCountries => {
                let mut doc = self.store.get_global_locations().await?;
                let target = if list == CatalogueList::GlobalCities {
                    &mut doc.cities
                } else {
                    &mut doc.countries
                };
                let updated = op(target.as_slice(), name);
                let changed = updated != *target;
                *target = updated.clone();
                if changed {
                    self.store.save_global_locations(doc).await?;
                }
                (updated, changed)
            }
            CatalogueList::TradeShowCities => {
                let mut page = self.store.get_trade_shows_page().await?;
                let updated = op(&page.cities, name);
                let changed = updated != page.cities;
                if changed {
                    page.cities = updated.clone();
                    self.store.save_trade_shows_page(page).await?;
                }
                (updated, changed)
            }
        };

        Ok(CatalogueChange {
            list,
            names,
            changed,
        })
    }
}
