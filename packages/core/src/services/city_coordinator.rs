//! City Lifecycle Coordinator
//!
//! Creates, edits (including re-parenting) and deletes Cities while keeping
//! four independent records consistent: the City, its old and new Country,
//! and the catalogue singletons. The store has no multi-record transaction, so
//! each flow is an explicit sequence of steps:
//!
//! ```text
//! create:   Idle -> GuardChecked -> Persisted -> CatalogueSynced -> NotifiedRevalidation -> Done
//! update:   Idle [-> GuardChecked] [-> ReparentSynced] -> Persisted -> NotifiedRevalidation -> Done
//! delete:   Idle -> Persisted -> ReferencesCleaned -> NotifiedRevalidation -> Done
//! ```
//!
//! Any step may end the flow in `Failed(reason)`.
//!
//! # Failure policy
//!
//! - Failures on the primary record (the City being created, edited or
//!   deleted) abort the flow.
//! - Failures on fan-out targets (catalogue names, Countries swept on delete)
//!   are [`StepOutcome::SoftFail`]: logged, collected as warnings, never
//!   returned as errors.
//! - Re-parenting is the one exception. Both Country sides are attempted, and
//!   if either fails the re-parent step ends in [`StepOutcome::HardFail`] with
//!   `PartialSyncFailure`, abandoning the City write. A City's `country_slug`
//!   is only committed after its reference has been reconciled on both
//!   Countries.
//! - Revalidation is dispatched on a detached task and cannot fail a flow.

use super::catalogue::NameCatalogue;
use super::country_links::{CountryLinks, LinkOutcome};
use super::error::SyncError;
use super::revalidation::RevalidationNotifier;
use super::slug::{GuardVerdict, SlugGuard};
use crate::db::RecordStore;
use crate::models::{CatalogueList, City, CityUpdate, NewCity};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Position of a flow in the coordinator state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "reason")]
pub enum SyncState {
    Idle,
    GuardChecked,
    Persisted,
    CatalogueSynced,
    ReparentSynced,
    ReferencesCleaned,
    NotifiedRevalidation,
    Done,
    Failed(String),
}

/// Tagged result of one step, consumed by the next step's gate
#[derive(Debug)]
pub enum StepOutcome<T> {
    Ok(T),
    /// Secondary target failed; the flow continues with a warning
    SoftFail(String),
    /// The flow must stop before its next write
    HardFail(SyncError),
}

/// Successful flow result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowOutcome<T> {
    pub data: T,
    /// Absorbed secondary failures the UI may surface as a soft warning
    pub warnings: Vec<String>,
    pub trail: Vec<SyncState>,
}

/// Failed flow result, with the trail up to the failing step
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct FlowError {
    #[source]
    pub error: SyncError,
    pub warnings: Vec<String>,
    pub trail: Vec<SyncState>,
}

pub type FlowResult<T> = Result<FlowOutcome<T>, FlowError>;

#[derive(Debug, Clone, Copy)]
enum FlowKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowKind::Create => "create",
            FlowKind::Update => "update",
            FlowKind::Delete => "delete",
        })
    }
}

/// Bookkeeping for one running flow
struct Flow {
    kind: FlowKind,
    subject: String,
    trail: Vec<SyncState>,
    warnings: Vec<String>,
}

impl Flow {
    fn start(kind: FlowKind, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        tracing::debug!("city {} '{}': started", kind, subject);
        Self {
            kind,
            subject,
            trail: vec![SyncState::Idle],
            warnings: Vec::new(),
        }
    }

    fn advance(&mut self, state: SyncState) {
        tracing::debug!("city {} '{}': {:?}", self.kind, self.subject, state);
        self.trail.push(state);
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("city {} '{}': {}", self.kind, self.subject, message);
        self.warnings.push(message);
    }

    fn fail(mut self, error: SyncError) -> FlowError {
        tracing::error!("city {} '{}' failed: {}", self.kind, self.subject, error);
        self.trail.push(SyncState::Failed(error.to_string()));
        FlowError {
            error,
            warnings: self.warnings,
            trail: self.trail,
        }
    }

    fn finish<T>(mut self, data: T) -> FlowOutcome<T> {
        self.trail.push(SyncState::Done);
        if self.warnings.is_empty() {
            tracing::info!("city {} '{}' completed", self.kind, self.subject);
        } else {
            tracing::info!(
                "city {} '{}' completed with {} warning(s)",
                self.kind,
                self.subject,
                self.warnings.len()
            );
        }
        FlowOutcome {
            data,
            warnings: self.warnings,
            trail: self.trail,
        }
    }
}

/// Orchestrates City create / update / delete across the related records
#[derive(Clone)]
pub struct CityCoordinator {
    store: Arc<dyn RecordStore>,
    guard: Arc<SlugGuard>,
    links: CountryLinks,
    catalogue: NameCatalogue,
    notifier: RevalidationNotifier,
}

impl CityCoordinator {
    pub fn new(store: Arc<dyn RecordStore>, notifier: RevalidationNotifier) -> Self {
        Self {
            guard: Arc::new(SlugGuard::new(store.clone())),
            links: CountryLinks::new(store.clone(), notifier.clone()),
            catalogue: NameCatalogue::new(store.clone(), notifier.clone()),
            store,
            notifier,
        }
    }

    pub fn links(&self) -> &CountryLinks {
        &self.links
    }

    pub fn catalogue(&self) -> &NameCatalogue {
        &self.catalogue
    }

    //
    // READS
    //

    /// Pre-check a name for the create form
    pub async fn can_create_city(&self, name: &str) -> Result<GuardVerdict, SyncError> {
        self.guard.can_create_city(name).await
    }

    pub async fn get_city(&self, id: &str) -> Result<City, SyncError> {
        self.store
            .get_city(id)
            .await
            .map_err(|e| SyncError::persistence("fetch city", e))?
            .ok_or_else(|| SyncError::not_found(id))
    }

    pub async fn list_cities(&self) -> Result<Vec<City>, SyncError> {
        self.store
            .list_cities()
            .await
            .map_err(|e| SyncError::persistence("list cities", e))
    }

    //
    // CREATE
    //

    /// Create a City, then add its name to the city catalogue lists
    ///
    /// Catalogue failures are warnings; the City stays created.
    pub async fn create_city(&self, new_city: NewCity) -> FlowResult<City> {
        let mut flow = Flow::start(FlowKind::Create, new_city.name.trim());

        let slug = match self.check_name(&new_city.name, None).await {
            Ok(slug) => slug,
            Err(e) => return Err(flow.fail(e)),
        };
        flow.advance(SyncState::GuardChecked);

        let city = match self
            .store
            .insert_city(City::from_new(new_city, slug))
            .await
        {
            Ok(city) => city,
            Err(e) => return Err(flow.fail(SyncError::persistence("insert city", e))),
        };
        flow.advance(SyncState::Persisted);

        for list in CatalogueList::CITY_LISTS {
            if let StepOutcome::SoftFail(message) = self.add_to_catalogue(list, &city.name).await
            {
                flow.warn(message);
            }
        }
        flow.advance(SyncState::CatalogueSynced);

        self.notifier.notify(city.public_path()).detach();
        flow.advance(SyncState::NotifiedRevalidation);

        Ok(flow.finish(city))
    }

    async fn add_to_catalogue(&self, list: CatalogueList, name: &str) -> StepOutcome<()> {
        match self.catalogue.add_name(list, name).await {
            Ok(_) => StepOutcome::Ok(()),
            Err(e) => StepOutcome::SoftFail(format!("catalogue {} not updated: {}", list, e)),
        }
    }

    //
    // UPDATE / RE-PARENT
    //

    /// Apply field edits to a City, moving it between Countries if
    /// `country_slug` changed
    ///
    /// # Re-parenting
    ///
    /// With `old` = current and `new` = submitted country slug:
    ///
    /// 1. `old` non-empty: remove the City slug from the old Country
    /// 2. `new` non-empty: add the City slug to the new Country (idempotent)
    /// 3. Only if both succeeded is the City itself written
    ///
    /// Step 2 runs even when step 1 failed. A missing old Country counts as
    /// reconciled; a missing new Country does not, since the City would then
    /// point at nothing.
    pub async fn update_city(&self, id: &str, update: CityUpdate) -> FlowResult<City> {
        let mut flow = Flow::start(FlowKind::Update, id);

        let mut city = match self.get_city(id).await {
            Ok(city) => city,
            Err(e) => return Err(flow.fail(e)),
        };
        flow.subject = city.city_slug.clone();

        if update.is_empty() {
            return Ok(flow.finish(city));
        }

        if let Some(name) = &update.name {
            if name.trim() != city.name {
                if let Err(e) = self.check_name(name, Some(&city.id)).await {
                    return Err(flow.fail(e));
                }
                flow.advance(SyncState::GuardChecked);
            }
        }

        let old_country = city.country_slug.clone();
        let new_country = update
            .country_slug
            .as_deref()
            .map(str::trim)
            .unwrap_or(old_country.as_str())
            .to_string();

        if old_country != new_country {
            if let StepOutcome::HardFail(e) = self
                .reparent_step(&city.city_slug, &old_country, &new_country)
                .await
            {
                return Err(flow.fail(e));
            }
            flow.advance(SyncState::ReparentSynced);
        }

        city.apply(&update);
        let city = match self.store.update_city(city).await {
            Ok(city) => city,
            Err(e) => return Err(flow.fail(SyncError::persistence("update city", e))),
        };
        flow.advance(SyncState::Persisted);

        self.notifier.notify(city.public_path()).detach();
        flow.advance(SyncState::NotifiedRevalidation);

        Ok(flow.finish(city))
    }

    /// Attempt both Country sides sequentially
    ///
    /// The new side is attempted even when the old side failed. Any failure
    /// hard-fails the step so the City write is skipped.
    async fn reparent_step(
        &self,
        city_slug: &str,
        old_country: &str,
        new_country: &str,
    ) -> StepOutcome<()> {
        let mut failures = Vec::new();
        if !old_country.is_empty() {
            if let Err(message) = self.unlink_side(old_country, city_slug).await {
                failures.push(message);
            }
        }
        if !new_country.is_empty() {
            if let Err(message) = self.link_side(new_country, city_slug).await {
                failures.push(message);
            }
        }

        if failures.is_empty() {
            StepOutcome::Ok(())
        } else {
            StepOutcome::HardFail(SyncError::partial_sync(city_slug, failures))
        }
    }

    async fn unlink_side(
        &self,
        country_slug: &str,
        city_slug: &str,
    ) -> Result<LinkOutcome, String> {
        match self.links.unlink(country_slug, city_slug).await {
            Ok(LinkOutcome::CountryMissing) => {
                tracing::debug!(
                    "old country '{}' no longer exists, nothing to unlink",
                    country_slug
                );
                Ok(LinkOutcome::CountryMissing)
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => Err(format!(
                "could not remove city from country '{}': {:#}",
                country_slug, e
            )),
        }
    }

    async fn link_side(
        &self,
        country_slug: &str,
        city_slug: &str,
    ) -> Result<LinkOutcome, String> {
        match self.links.link(country_slug, city_slug).await {
            Ok(LinkOutcome::CountryMissing) => {
                Err(format!("country '{}' does not exist", country_slug))
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => Err(format!(
                "could not add city to country '{}': {:#}",
                country_slug, e
            )),
        }
    }

    //
    // DELETE
    //

    /// Delete a City and strip its slug from every Country
    ///
    /// Success means the City record is gone. Countries that could not be
    /// cleaned are reported as warnings, not errors. Catalogue names are left
    /// alone.
    pub async fn delete_city(&self, id: &str) -> FlowResult<bool> {
        let mut flow = Flow::start(FlowKind::Delete, id);

        let city = match self.get_city(id).await {
            Ok(city) => city,
            Err(e) => return Err(flow.fail(e)),
        };
        flow.subject = city.city_slug.clone();

        match self.store.delete_city(&city.id).await {
            Ok(true) => {}
            Ok(false) => return Err(flow.fail(SyncError::not_found(id))),
            Err(e) => return Err(flow.fail(SyncError::persistence("delete city", e))),
        }
        flow.advance(SyncState::Persisted);

        let report = self.links.remove_city_everywhere(&city.city_slug).await;
        for message in report.failure_messages() {
            flow.warn(message);
        }
        flow.advance(SyncState::ReferencesCleaned);

        self.notifier.notify(city.public_path()).detach();
        flow.advance(SyncState::NotifiedRevalidation);

        Ok(flow.finish(true))
    }

    async fn check_name(&self, name: &str, exclude_id: Option<&str>) -> Result<String, SyncError> {
        let verdict = match exclude_id {
            Some(id) => self.guard.can_rename_city(id, name).await?,
            None => self.guard.can_create_city(name).await?,
        };
        verdict.into_result(name)
    }
}
