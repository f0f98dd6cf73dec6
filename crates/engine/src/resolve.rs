//! # Reference Resolution
//!
//! Extracts the dependent references a [`Person`] carries. The plan owns its
//! references so each can be moved into the fetch that resolves it; how those
//! fetches are sequenced and joined is left to the composition drivers.

use holonet_types::Person;

/// The dependent references of one primary record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// Single-reference field; always fetched, even when `films` is empty.
    pub homeworld: String,
    /// List-reference field, in the order the output must preserve.
    pub films: Vec<String>,
}

impl ResolutionPlan {
    pub fn from_person(person: &Person) -> Self {
        Self {
            homeworld: person.homeworld.clone(),
            films: person.films.clone(),
        }
    }

    /// Number of fetches the plan fans out to.
    pub fn fan_out(&self) -> usize {
        1 + self.films.len()
    }
}
