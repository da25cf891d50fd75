use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{ExampleData, Table};

/// One instruction of a route, optionally illustrated by a map image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub text: String,
    /// URL of the map image; empty when the step has none.
    #[serde(default)]
    pub map: String,
}

impl RouteStep {
    pub fn new<T: Into<String>, M: Into<String>>(text: T, map: M) -> Self {
        Self {
            text: text.into(),
            map: map.into(),
        }
    }

    pub fn text<T: Into<String>>(text: T) -> Self {
        Self::new(text, "")
    }

    pub fn map_url(&self) -> Option<&str> {
        if self.map.is_empty() {
            None
        } else {
            Some(&self.map)
        }
    }
}

/// A directed, admin authored path between two locations, referenced by
/// name. The order of `steps` is the order they are walked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub start_location: String,
    pub end_location: String,
    pub steps: Vec<RouteStep>,
}

impl Route {
    pub fn connects(&self, start: &str, end: &str) -> bool {
        self.start_location == start && self.end_location == end
    }
}

impl HasId for Route {
    type IdType = i64;
}

impl Table for Route {
    const TABLE: &'static str = "routes";
}

impl ExampleData for Route {
    fn example_data() -> Self {
        Self {
            start_location: "Main Office".to_owned(),
            end_location: "Library".to_owned(),
            steps: vec![
                RouteStep::new(
                    "Leave the office and turn left into the main hallway.",
                    "https://example.org/route-maps/main-office-to-library/1.jpg",
                ),
                RouteStep::text("The library is the second door on your right."),
            ],
        }
    }
}
