use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{ExampleData, Table};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub img: String,
    pub caption: String,
}

/// The school's name, about text and landing page slideshow. There is exactly
/// one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolInfo {
    pub name: String,
    pub about: String,
    #[serde(default)]
    pub slideshow: Vec<Slide>,
}

impl HasId for SchoolInfo {
    type IdType = i64;
}

impl Table for SchoolInfo {
    const TABLE: &'static str = "school_info";
}

impl ExampleData for SchoolInfo {
    fn example_data() -> Self {
        Self {
            name: "Riverside High School".to_owned(),
            about: "A public secondary school on the east bank.".to_owned(),
            slideshow: vec![Slide {
                img: "https://example.org/slides/front.jpg".to_owned(),
                caption: "The main entrance".to_owned(),
            }],
        }
    }
}
