//! Derives which places can be navigated from and to, and resolves a chosen
//! pair of places to the route connecting them.
//!
//! Routes name their endpoints by location name. Every lookup re-resolves
//! those names against the location list it is given, so a renamed or
//! deleted location simply stops showing up.

use std::collections::HashSet;

use itertools::Itertools;
use model::{location::Location, route::Route, WithId};

use crate::NotFoundError;

/// Locations that are the start of at least one route, in location order.
pub fn start_locations<'a>(
    routes: &[WithId<Route>],
    locations: &'a [WithId<Location>],
) -> Vec<&'a WithId<Location>> {
    let names = routes
        .iter()
        .map(|route| route.content.start_location.as_str())
        .collect::<HashSet<_>>();
    filter_by_name(locations, &names)
}

/// Locations reachable by a single route from `start`, in location order.
pub fn destinations_from<'a>(
    start: &str,
    routes: &[WithId<Route>],
    locations: &'a [WithId<Location>],
) -> Vec<&'a WithId<Location>> {
    let names = routes
        .iter()
        .filter(|route| route.content.start_location == start)
        .map(|route| route.content.end_location.as_str())
        .collect::<HashSet<_>>();
    filter_by_name(locations, &names)
}

/// The first route in store order going from `start` to `end`.
pub fn resolve_route<'a>(
    start: &str,
    end: &str,
    routes: &'a [WithId<Route>],
) -> Result<&'a WithId<Route>, NotFoundError> {
    routes
        .iter()
        .find(|route| route.content.connects(start, end))
        .ok_or_else(|| NotFoundError::Route {
            start: start.to_owned(),
            end: end.to_owned(),
        })
}

/// Resolves a `/navigate/{slug}` path to the location it names.
pub fn resolve_deep_link<'a>(
    path: &str,
    locations: &'a [WithId<Location>],
) -> Option<&'a WithId<Location>> {
    let mut segments = path.split('/').skip(1);
    if segments.next() != Some("navigate") {
        return None;
    }
    let slug = segments.next().filter(|slug| !slug.is_empty())?;
    locations.iter().find(|location| location.content.slug == slug)
}

/// Location names in alphabetical order, as offered by the endpoint pickers
/// of the route editor.
pub fn location_names(locations: &[WithId<Location>]) -> Vec<&str> {
    locations
        .iter()
        .map(|location| location.content.name.as_str())
        .sorted()
        .collect()
}

fn filter_by_name<'a>(
    locations: &'a [WithId<Location>],
    names: &HashSet<&str>,
) -> Vec<&'a WithId<Location>> {
    locations
        .iter()
        .filter(|location| names.contains(location.content.name.as_str()))
        .collect()
}

/// Locations and routes loaded once, with every lookup running against
/// this snapshot.
#[derive(Debug, Clone, Default)]
pub struct Campus {
    pub locations: Vec<WithId<Location>>,
    pub routes: Vec<WithId<Route>>,
}

impl Campus {
    pub fn new(locations: Vec<WithId<Location>>, routes: Vec<WithId<Route>>) -> Self {
        Self { locations, routes }
    }

    pub fn start_locations(&self) -> Vec<&WithId<Location>> {
        start_locations(&self.routes, &self.locations)
    }

    pub fn destinations_from(&self, start: &str) -> Vec<&WithId<Location>> {
        destinations_from(start, &self.routes, &self.locations)
    }

    pub fn resolve_route(&self, start: &str, end: &str) -> Result<&WithId<Route>, NotFoundError> {
        resolve_route(start, end, &self.routes)
    }

    pub fn resolve_deep_link(&self, path: &str) -> Option<&WithId<Location>> {
        resolve_deep_link(path, &self.locations)
    }

    pub fn location_by_slug(&self, slug: &str) -> Result<&WithId<Location>, NotFoundError> {
        self.locations
            .iter()
            .find(|location| location.content.slug == slug)
            .ok_or_else(|| NotFoundError::Location {
                slug: slug.to_owned(),
            })
    }

    /// Routes without a single step to follow.
    pub fn empty_routes(&self) -> Vec<&WithId<Route>> {
        self.routes
            .iter()
            .filter(|route| route.content.steps.is_empty())
            .collect()
    }

    /// Routes naming a start or end that no location carries.
    pub fn orphaned_routes(&self) -> Vec<&WithId<Route>> {
        let names = self
            .locations
            .iter()
            .map(|location| location.content.name.as_str())
            .collect::<HashSet<_>>();
        self.routes
            .iter()
            .filter(|route| {
                !names.contains(route.content.start_location.as_str())
                    || !names.contains(route.content.end_location.as_str())
            })
            .collect()
    }
}
