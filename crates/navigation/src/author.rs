//! Creating, editing, duplicating and deleting routes.

use chrono::{DateTime, Utc};
use model::{
    route::{Route, RouteStep},
    Table, WithId,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{
    admin::AdminCapability,
    database::{Database, Repo},
    storage::route_map_path,
    Operation, PersistenceError, RequestResult, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Text,
    Map,
}

/// An uncommitted copy of a route. Edits never touch the route it was
/// copied from, and nothing is checked until it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    /// Set when the draft edits a stored route.
    #[serde(default)]
    pub id: Option<Id<Route>>,
    #[serde(default)]
    pub start_location: String,
    #[serde(default)]
    pub end_location: String,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

impl Default for RouteDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteDraft {
    /// A new route without endpoints and a single empty step.
    pub fn new() -> Self {
        Self {
            id: None,
            start_location: String::new(),
            end_location: String::new(),
            steps: vec![RouteStep::default()],
        }
    }

    pub fn edit(route: &WithId<Route>) -> Self {
        Self {
            id: Some(route.id),
            start_location: route.content.start_location.clone(),
            end_location: route.content.end_location.clone(),
            steps: route.content.steps.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn set_endpoint<S: Into<String>>(&mut self, endpoint: Endpoint, location: S) {
        match endpoint {
            Endpoint::Start => self.start_location = location.into(),
            Endpoint::End => self.end_location = location.into(),
        }
    }

    pub fn add_step(&mut self) {
        self.steps.push(RouteStep::default());
    }

    /// Removing the last step is allowed; the draft then fails to save.
    pub fn remove_step(&mut self, index: usize) -> Option<RouteStep> {
        if index < self.steps.len() {
            Some(self.steps.remove(index))
        } else {
            None
        }
    }

    pub fn edit_step<S: Into<String>>(&mut self, index: usize, field: StepField, value: S) -> bool {
        let Some(step) = self.steps.get_mut(index) else {
            return false;
        };
        match field {
            StepField::Text => step.text = value.into(),
            StepField::Map => step.map = value.into(),
        }
        true
    }

    /// Checks endpoints, then steps, stopping at the first problem.
    pub fn validate(&self) -> Result<Route, ValidationError> {
        if self.start_location.is_empty() || self.end_location.is_empty() {
            return Err(ValidationError::MissingEndpoint);
        }
        if self.start_location == self.end_location {
            return Err(ValidationError::SameEndpoints);
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        if let Some(step) = self.steps.iter().position(|step| step.text.trim().is_empty()) {
            return Err(ValidationError::EmptyStepText { step });
        }
        Ok(Route {
            start_location: self.start_location.clone(),
            end_location: self.end_location.clone(),
            steps: self.steps.clone(),
        })
    }

    /// Upload path for a map image of one of this draft's steps.
    pub fn map_upload_path(&self, file_name: &str, at: DateTime<Utc>) -> String {
        route_map_path(&self.start_location, &self.end_location, file_name, at)
    }
}

/// First phase of duplicating a route: choosing the endpoints of the copy.
/// They start out as the source's own endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSelection {
    source_id: Id<Route>,
    steps: Vec<RouteStep>,
    pub start_location: String,
    pub end_location: String,
}

impl DuplicateSelection {
    pub fn new(source: &WithId<Route>) -> Self {
        Self {
            source_id: source.id,
            steps: source.content.steps.clone(),
            start_location: source.content.start_location.clone(),
            end_location: source.content.end_location.clone(),
        }
    }

    pub fn source_id(&self) -> Id<Route> {
        self.source_id
    }

    pub fn set_endpoint<S: Into<String>>(&mut self, endpoint: Endpoint, location: S) {
        match endpoint {
            Endpoint::Start => self.start_location = location.into(),
            Endpoint::End => self.end_location = location.into(),
        }
    }

    /// Second phase: a new draft between the chosen endpoints carrying a
    /// copy of the source's steps.
    pub fn proceed(&self) -> Result<RouteDraft, ValidationError> {
        if self.start_location.is_empty() || self.end_location.is_empty() {
            return Err(ValidationError::MissingEndpoint);
        }
        if self.start_location == self.end_location {
            return Err(ValidationError::SameEndpoints);
        }
        Ok(RouteDraft {
            id: None,
            start_location: self.start_location.clone(),
            end_location: self.end_location.clone(),
            steps: self.steps.clone(),
        })
    }
}

/// The admin's route editor. Holds at most one open draft or one pending
/// duplication at a time; opening one discards the other.
pub struct RouteAuthor<D: Database> {
    database: D,
    draft: Option<RouteDraft>,
    duplicate: Option<DuplicateSelection>,
}

impl<D: Database> RouteAuthor<D> {
    pub fn new(database: D, _admin: &AdminCapability) -> Self {
        Self {
            database,
            draft: None,
            duplicate: None,
        }
    }

    pub fn start_create(&mut self) -> &mut RouteDraft {
        self.open(RouteDraft::new())
    }

    pub fn start_edit(&mut self, route: &WithId<Route>) -> &mut RouteDraft {
        self.open(RouteDraft::edit(route))
    }

    pub fn open(&mut self, draft: RouteDraft) -> &mut RouteDraft {
        self.duplicate = None;
        self.draft.insert(draft)
    }

    pub fn start_duplicate(&mut self, source: &WithId<Route>) -> &mut DuplicateSelection {
        self.draft = None;
        self.duplicate.insert(DuplicateSelection::new(source))
    }

    pub fn duplicate_selection_mut(&mut self) -> Option<&mut DuplicateSelection> {
        self.duplicate.as_mut()
    }

    /// Turns the pending duplication into an open draft. On a validation
    /// error the selection stays open for correction.
    pub fn proceed_duplicate(&mut self) -> Result<&mut RouteDraft, ValidationError> {
        let draft = self
            .duplicate
            .as_ref()
            .ok_or(ValidationError::NoOpenDraft)?
            .proceed()?;
        Ok(self.open(draft))
    }

    pub fn draft(&self) -> Option<&RouteDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut RouteDraft> {
        self.draft.as_mut()
    }

    pub fn close(&mut self) {
        self.draft = None;
        self.duplicate = None;
    }

    /// Validates and stores the open draft, inserting it when new and
    /// replacing the stored route otherwise. The editor closes on success
    /// and keeps the draft on any error.
    pub async fn save(&mut self) -> RequestResult<WithId<Route>> {
        let draft = self.draft.as_ref().ok_or(ValidationError::NoOpenDraft)?;
        let route = draft.validate()?;
        let id = draft.id;

        self.warn_on_duplicate_pair(id, &route).await;

        let saved = match id {
            None => Repo::<Route>::insert(&self.database, route)
                .await
                .map_err(|e| PersistenceError::new(Route::TABLE, Operation::Insert, e))?,
            Some(id) => Repo::<Route>::update(&self.database, WithId::new(id, route))
                .await
                .map_err(|e| PersistenceError::new(Route::TABLE, Operation::Update, e))?,
        };
        log::info!(
            "Saved route {} from '{}' to '{}'",
            saved.id,
            saved.content.start_location,
            saved.content.end_location
        );
        self.draft = None;
        Ok(saved)
    }

    /// Deletes a stored route, closing the editor if it has that route open.
    pub async fn delete(&mut self, id: Id<Route>) -> RequestResult<()> {
        Repo::<Route>::delete(&self.database, id)
            .await
            .map_err(|e| PersistenceError::new(Route::TABLE, Operation::Delete, e))?;
        log::info!("Deleted route {}", id);
        if self.draft.as_ref().and_then(|draft| draft.id) == Some(id) {
            self.draft = None;
        }
        Ok(())
    }

    // Lookups pick the first of several routes with the same endpoints, so
    // a second one is stored but can never be navigated.
    async fn warn_on_duplicate_pair(&self, id: Option<Id<Route>>, route: &Route) {
        let routes = match Repo::<Route>::get_all(&self.database).await {
            Ok(routes) => routes,
            Err(error) => {
                log::debug!("Skipping duplicate check: {}", error);
                return;
            }
        };
        if let Some(other) = routes.iter().find(|other| {
            Some(other.id) != id && other.content.connects(&route.start_location, &route.end_location)
        }) {
            log::warn!(
                "Route {} already connects '{}' to '{}'",
                other.id,
                route.start_location,
                route.end_location
            );
        }
    }
}
