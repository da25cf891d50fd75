use model::{location::Location, WithId};
use schemars::JsonSchema;
use serde::Serialize;

/// Narrows a set of locations down by a search term and groups the matches,
/// listing classrooms in their own collapsible group after everything else.
#[derive(Debug, Clone)]
pub struct LocationPicker {
    others: Vec<WithId<Location>>,
    classrooms: Vec<WithId<Location>>,
    term: String,
    classrooms_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroups {
    pub others: Vec<WithId<Location>>,
    pub classrooms: Vec<WithId<Location>>,
    pub classrooms_open: bool,
}

impl LocationGroups {
    /// Locations a user can pick right now: the others, followed by the
    /// classrooms if their group is open.
    pub fn visible(&self) -> impl Iterator<Item = &WithId<Location>> {
        let classrooms: &[WithId<Location>] = if self.classrooms_open {
            &self.classrooms
        } else {
            &[]
        };
        self.others.iter().chain(classrooms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PickerResults {
    Matches(LocationGroups),
    /// A search term is set and nothing matches it.
    NoMatches { term: String },
    /// There is nothing to pick from at all.
    Empty,
}

impl LocationPicker {
    /// Locations keep the order they are given in within their group.
    pub fn new<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = WithId<Location>>,
    {
        let (classrooms, others) = locations
            .into_iter()
            .partition(|location| location.content.is_classroom);
        Self {
            others,
            classrooms,
            term: String::new(),
            classrooms_open: false,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn classrooms_open(&self) -> bool {
        self.classrooms_open
    }

    /// Sets the search term. If only classrooms match a non-empty term their
    /// group is opened, since it would otherwise hide every result.
    pub fn search<S: Into<String>>(&mut self, term: S) {
        self.term = term.into();
        if !self.term.is_empty()
            && self.matching(&self.classrooms).next().is_some()
            && self.matching(&self.others).next().is_none()
        {
            self.classrooms_open = true;
        }
    }

    pub fn toggle_classrooms(&mut self) {
        self.classrooms_open = !self.classrooms_open;
    }

    pub fn results(&self) -> PickerResults {
        let others = self.matching(&self.others).cloned().collect::<Vec<_>>();
        let classrooms = self.matching(&self.classrooms).cloned().collect::<Vec<_>>();

        if !others.is_empty() || !classrooms.is_empty() {
            PickerResults::Matches(LocationGroups {
                others,
                classrooms,
                classrooms_open: self.classrooms_open,
            })
        } else if !self.term.is_empty() {
            PickerResults::NoMatches {
                term: self.term.clone(),
            }
        } else {
            PickerResults::Empty
        }
    }

    fn matching<'a>(
        &'a self,
        locations: &'a [WithId<Location>],
    ) -> impl Iterator<Item = &'a WithId<Location>> + 'a {
        let needle = self.term.to_lowercase();
        locations
            .iter()
            .filter(move |location| location.content.name.to_lowercase().contains(&needle))
    }
}
