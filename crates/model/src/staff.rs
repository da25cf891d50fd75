use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{ExampleData, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub name: String,
    pub title: String,
    pub department: String,
    pub room: String,
}

impl HasId for Staff {
    type IdType = i64;
}

impl Table for Staff {
    const TABLE: &'static str = "staff";
}

impl ExampleData for Staff {
    fn example_data() -> Self {
        Self {
            name: "Dana Whitfield".to_owned(),
            title: "Head of Science".to_owned(),
            department: "Science".to_owned(),
            room: "B12".to_owned(),
        }
    }
}
