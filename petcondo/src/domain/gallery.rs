//! Gallery search and species filtering.
//!
//! Pure functions over an in-memory pet list; nothing here touches a port.

use std::collections::BTreeSet;

use super::pet::Pet;

/// Search text and optional species selected in the gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryQuery {
    /// Free-text search, matched case-insensitively.
    pub search: String,
    /// Exact species label, or `None`/empty for every species.
    pub species: Option<String>,
}

impl GalleryQuery {
    /// Build a query from raw inputs.
    pub fn new(search: impl Into<String>, species: Option<String>) -> Self {
        Self {
            search: search.into(),
            species,
        }
    }

    /// Apply this query to `pets`.
    pub fn apply<'a>(&self, pets: &'a [Pet]) -> Vec<&'a Pet> {
        filter_pets(pets, &self.search, self.species.as_deref())
    }
}

/// True when `pet` satisfies the search text and species filter.
///
/// The search text matches as a case-insensitive substring of the pet name,
/// breed, owner name or owner apartment. An empty or missing species matches
/// every pet; otherwise the species must be equal.
pub fn matches(pet: &Pet, search: &str, species: Option<&str>) -> bool {
    let needle = search.to_lowercase();
    let matches_search = [
        pet.name.as_str(),
        pet.breed.as_str(),
        pet.resident_name.as_str(),
        pet.resident_apartment.as_str(),
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle));

    let matches_species = match species {
        None | Some("") => true,
        Some(wanted) => pet.species == wanted,
    };

    matches_search && matches_species
}

/// Filter `pets`, keeping their relative order.
pub fn filter_pets<'a>(pets: &'a [Pet], search: &str, species: Option<&str>) -> Vec<&'a Pet> {
    pets.iter()
        .filter(|pet| matches(pet, search, species))
        .collect()
}

/// Sorted, de-duplicated species present in the full pet list.
///
/// Compute this from the unfiltered list so the species options do not
/// shrink while the user is searching.
pub fn distinct_species(pets: &[Pet]) -> Vec<String> {
    pets.iter()
        .map(|pet| pet.species.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PetId, ResidentId};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn pet(name: &str, species: &str, breed: &str, owner: &str, apartment: &str) -> Pet {
        Pet {
            id: PetId::random(),
            resident_id: ResidentId::new("r1"),
            resident_name: owner.to_owned(),
            resident_block: "1".to_owned(),
            resident_apartment: apartment.to_owned(),
            name: name.to_owned(),
            species: species.to_owned(),
            breed: breed.to_owned(),
            age: 2,
            description: String::new(),
            photo: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("date"),
        }
    }

    #[fixture]
    fn pets() -> Vec<Pet> {
        vec![
            pet("Rex", "Cão", "Vira-lata", "Ana", "101"),
            pet("Mimi", "Gato", "Siamês", "Bruno", "202"),
            pet("Thor", "Cão", "Labrador", "Carla", "303"),
            pet("Piu", "Pássaro", "Canário", "Ana", "101"),
        ]
    }

    fn names(result: &[&Pet]) -> Vec<String> {
        result.iter().map(|pet| pet.name.clone()).collect()
    }

    #[rstest]
    fn empty_query_keeps_everything_in_order(pets: Vec<Pet>) {
        let result = filter_pets(&pets, "", None);
        assert_eq!(names(&result), ["Rex", "Mimi", "Thor", "Piu"]);
    }

    #[rstest]
    #[case("rex", &["Rex"])]
    #[case("LABRA", &["Thor"])]
    #[case("ana", &["Rex", "Piu"])]
    #[case("202", &["Mimi"])]
    #[case("zebra", &[])]
    fn search_covers_name_breed_owner_and_apartment(
        pets: Vec<Pet>,
        #[case] search: &str,
        #[case] expected: &[&str],
    ) {
        let result = filter_pets(&pets, search, None);
        assert_eq!(names(&result), expected);
    }

    #[rstest]
    fn species_filter_is_exact(pets: Vec<Pet>) {
        let result = filter_pets(&pets, "", Some("Cão"));
        assert_eq!(names(&result), ["Rex", "Thor"]);

        let none = filter_pets(&pets, "", Some("cão"));
        assert!(none.is_empty());
    }

    #[rstest]
    fn empty_species_matches_everything(pets: Vec<Pet>) {
        assert_eq!(filter_pets(&pets, "", Some("")).len(), pets.len());
    }

    #[rstest]
    fn search_and_species_combine(pets: Vec<Pet>) {
        let result = GalleryQuery::new("ana", Some("Pássaro".to_owned())).apply(&pets);
        assert_eq!(names(&result), ["Piu"]);
    }

    #[rstest]
    #[case("")]
    #[case("a")]
    #[case("10")]
    #[case("cão")]
    fn filtered_results_are_bounded_and_all_match(pets: Vec<Pet>, #[case] search: &str) {
        for species in [None, Some("Cão"), Some("Gato")] {
            let result = filter_pets(&pets, search, species);
            assert!(result.len() <= pets.len());
            assert!(result.iter().all(|pet| matches(pet, search, species)));
        }
    }

    #[rstest]
    fn distinct_species_is_sorted_and_idempotent(pets: Vec<Pet>) {
        let first = distinct_species(&pets);
        let second = distinct_species(&pets);
        assert_eq!(first, ["Cão", "Gato", "Pássaro"]);
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_species_of_empty_list_is_empty() {
        assert!(distinct_species(&[]).is_empty());
    }
}
