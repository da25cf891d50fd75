use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{ExampleData, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub name: String,
    pub description: String,
}

impl HasId for Facility {
    type IdType = i64;
}

impl Table for Facility {
    const TABLE: &'static str = "facilities";
}

impl ExampleData for Facility {
    fn example_data() -> Self {
        Self {
            name: "Sports Hall".to_owned(),
            description: "Indoor courts, changing rooms and a climbing wall.".to_owned(),
        }
    }
}
