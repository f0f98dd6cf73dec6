use holonet_types::{Film, Person, PersonInfo, Planet};

/// Merge a primary record with its resolved references.
///
/// `films` must already be in the order of `person.films`; the projection of
/// each referenced resource happened when it was deserialized.
pub fn assemble(person: &Person, planet: Planet, films: Vec<Film>) -> PersonInfo {
    PersonInfo {
        name: person.name.clone(),
        height: person.height.clone(),
        gender: person.gender.to_string(),
        homeworld: planet.name,
        films,
    }
}
