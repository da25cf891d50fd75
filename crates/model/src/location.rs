use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{id::HasId, slug::slugify};

use crate::{ExampleData, Table};

/// A named place on campus.
///
/// Routes refer to locations by `name`, never by id. The `slug` is derived
/// from the name once, when the location is created, and is not touched
/// again when the location is renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    /// Derived from the name when the location is first stored.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub is_classroom: bool,
}

impl Location {
    pub fn new<S: Into<String>>(name: S, is_classroom: bool) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            is_classroom,
        }
    }
}

impl HasId for Location {
    type IdType = i64;
}

impl Table for Location {
    const TABLE: &'static str = "locations";
}

impl ExampleData for Location {
    fn example_data() -> Self {
        Self::new("Main Office", false)
    }
}
