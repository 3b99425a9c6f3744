//! Pure text rendering of coordinator snapshots.
//!
//! Each function takes a snapshot (or a slice of it) and returns the full text
//! to print; nothing here reads state on its own.

use std::fmt::Write as _;

use crate::domain::{
    CoordinatorState, EncodedImage, GalleryQuery, Pet, SPECIES_OPTIONS, SessionIdentity,
    distinct_species,
};

use super::messages::UserMessage;

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// One pet as a short card.
pub fn pet_card(pet: &Pet) -> String {
    let years = if pet.age == 1 { "ano" } else { "anos" };
    let mut card = format!(
        "{name} ({species})\n  {breed} • {age} {years}\n  {owner} - Bloco {block}, Apt {apartment}",
        name = pet.name,
        species = pet.species,
        breed = pet.breed,
        age = pet.age,
        owner = pet.resident_name,
        block = pet.resident_block,
        apartment = pet.resident_apartment,
    );
    if !pet.description.is_empty() {
        let _ = write!(card, "\n  {}", pet.description);
    }
    let photo = if pet.photo.is_empty() { "sem foto" } else { "com foto" };
    let _ = write!(
        card,
        "\n  {photo} • cadastrado em {}",
        pet.created_at.format("%d/%m/%Y")
    );
    card
}

fn cards(pets: &[&Pet]) -> String {
    pets.iter()
        .map(|pet| pet_card(pet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Gallery view: species filter options, match count and matching cards.
pub fn gallery(pets: &[Pet], query: &GalleryQuery) -> String {
    if pets.is_empty() {
        return "Nenhum pet cadastrado".to_owned();
    }

    let species = distinct_species(pets);
    let matching = query.apply(pets);
    let mut out = format!(
        "Espécies: {}\n{}",
        species.join(", "),
        plural(matching.len(), "pet encontrado", "pets encontrados"),
    );
    if matching.is_empty() {
        out.push_str("\n\nNenhum pet encontrado");
    } else {
        let _ = write!(out, "\n\n{}", cards(&matching));
    }
    out
}

/// "My pets" view for the signed-in resident.
pub fn my_pets(state: &CoordinatorState) -> String {
    let Some(session) = state.session.as_ref() else {
        return "Faça login para ver seus pets.".to_owned();
    };
    let Some(resident) = state.resident.as_ref() else {
        return format!(
            "{}\nPara ver seus pets, primeiro você precisa se cadastrar como morador.",
            session_line(session)
        );
    };

    let owned: Vec<&Pet> = state.pets.iter().collect();
    let mut out = format!(
        "{}\n{} - Bloco {}, Apt {}\n{}",
        session_line(session),
        resident.name,
        resident.block,
        resident.apartment,
        plural(owned.len(), "pet cadastrado", "pets cadastrados"),
    );
    if !owned.is_empty() {
        let _ = write!(out, "\n\n{}", cards(&owned));
    }
    out
}

/// Status line for the signed-in account.
pub fn session_line(identity: &SessionIdentity) -> String {
    format!("Conectado como {}", identity.email())
}

/// Confirmation shown after sign-up.
pub fn account_created(identity: &SessionIdentity) -> String {
    format!(
        "Conta criada para {}.\nSe necessário, confirme seu e-mail antes de cadastrar pets.",
        identity.email()
    )
}

/// Confirmation shown after a successful registration.
pub fn registration_success(pet: &Pet, state: &CoordinatorState) -> String {
    format!("Pet Cadastrado com Sucesso!\n\n{}\n\n{}", pet_card(pet), my_pets(state))
}

/// Species offered by the registration form.
pub fn species_options() -> String {
    SPECIES_OPTIONS.join("\n")
}

/// Summary of a preprocessed photo.
pub fn compressed_image(image: &EncodedImage, output: &str) -> String {
    format!(
        "{output}: {}x{} {} ({} bytes)",
        image.width,
        image.height,
        image.mime_type,
        image.bytes.len()
    )
}

/// Error title and body.
pub fn message(message: &UserMessage) -> String {
    format!("{}\n{}", message.title, message.body)
}
