use schemars::JsonSchema;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

pub mod facility;
pub mod location;
pub mod route;
pub mod school;
pub mod staff;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A record type stored in its own table of the data-access collaborator.
pub trait Table: HasId<IdType = i64> {
    const TABLE: &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(bound(
    serialize = "V: Serialize",
    deserialize = "V: Deserialize<'de>, V::IdType: Deserialize<'de>"
))]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }

    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(V) -> V,
    {
        Self::new(self.id, f(self.content))
    }
}

impl<V> PartialEq for WithId<V>
where
    V: HasId + PartialEq,
    V::IdType: Serialize + Debug + Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.content == other.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[test]
    fn with_id_flattens_content() {
        let location = WithId::new(Id::new(3), Location::new("Main Office", false));
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Main Office");
        assert_eq!(json["slug"], "main-office");
        assert_eq!(json["isClassroom"], false);

        let back: WithId<Location> = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, Id::new(3));
        assert_eq!(back.content.slug, "main-office");
    }
}
