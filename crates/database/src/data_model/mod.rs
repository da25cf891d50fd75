use model::{Table, WithId};
use utility::id::Id;

pub mod facility;
pub mod location;
pub mod route;
pub mod school;
pub mod staff;

pub trait DatabaseRow {
    type Model: Table;

    fn get_id(&self) -> Id<Self::Model>;
    fn to_model(self) -> Self::Model;
}

pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Vec<WithId<R::Model>> {
    rows.into_iter().map(with_id).collect::<Vec<_>>()
}

pub fn with_id<R: DatabaseRow>(row: R) -> WithId<R::Model> {
    WithId::new(row.get_id(), row.to_model())
}
