//! Command execution.
//!
//! [`run`] wires the hosted adapters from configuration; [`execute`] drives
//! any coordinator, which keeps the command logic testable with doubles.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::domain::ports::{PetRepository, ResidentRepository, SessionProvider};
use crate::domain::{
    Coordinator, Credentials, Error, GalleryQuery, ImageDecodeError, PetScope, RegistrationForm,
    RegistrationFormDraft, Resident, SessionIdentity, SessionValidationError, ValidationError,
    compress_image,
};
use crate::outbound::supabase::{ClientSetupError, SupabaseAuth, SupabaseClient, SupabaseRegistry};

use super::files::{read_file, write_file};
use super::{AccountArgs, Cli, Command, CompressImageArgs, GalleryArgs, RegisterPetArgs, render};

/// Failure of a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Backend settings were missing or unusable.
    #[error(transparent)]
    Setup(#[from] ClientSetupError),
    /// The coordinator rejected the operation.
    #[error(transparent)]
    Domain(#[from] Error),
    /// Email or password flags were unusable.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] SessionValidationError),
    /// The registration form failed validation.
    #[error("invalid registration form: {0}")]
    Form(#[from] ValidationError),
    /// The photo could not be preprocessed.
    #[error(transparent)]
    Image(#[from] ImageDecodeError),
    /// An input file could not be read.
    #[error("read '{}': {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// An output file could not be written.
    #[error("write '{}': {source}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Run `cli` against the hosted backend described by `settings`.
///
/// Commands that work offline never build a client, so they succeed without
/// backend settings.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<String, CommandError> {
    let max_dimension = settings.max_image_dimension();
    if let Some(outcome) = run_local(&cli.command, max_dimension) {
        return outcome;
    }

    let client = Arc::new(SupabaseClient::from_settings(settings)?);
    let sessions = Arc::new(SupabaseAuth::new(Arc::clone(&client)));
    let registry = Arc::new(SupabaseRegistry::new(client));
    let coordinator = Coordinator::new(sessions, Arc::clone(&registry), registry);
    execute(&cli.command, &coordinator, max_dimension).await
}

/// Execute one command through `coordinator` and return the text to print.
pub async fn execute<S, R, P>(
    command: &Command,
    coordinator: &Coordinator<S, R, P>,
    max_dimension: u32,
) -> Result<String, CommandError>
where
    S: SessionProvider,
    R: ResidentRepository,
    P: PetRepository,
{
    match command {
        Command::Species => Ok(render::species_options()),
        Command::CompressImage(args) => compress(args, max_dimension),
        Command::Gallery(args) => {
            restore(coordinator).await;
            gallery(coordinator, args).await
        }
        Command::SignUp(args) => {
            restore(coordinator).await;
            let identity = coordinator.register(&credentials(args)?).await?;
            Ok(render::account_created(&identity))
        }
        Command::MyPets(args) => {
            restore(coordinator).await;
            let identity = coordinator.authenticate(&credentials(args)?).await?;
            let scope = PetScope::OwnedBy(identity.id().clone());
            coordinator
                .load_resident_and_pets(identity.id(), &scope)
                .await?;
            Ok(render::my_pets(&coordinator.snapshot()))
        }
        Command::RegisterPet(args) => {
            restore(coordinator).await;
            register_pet(coordinator, args, max_dimension).await
        }
    }
}

fn run_local(command: &Command, max_dimension: u32) -> Option<Result<String, CommandError>> {
    match command {
        Command::Species => Some(Ok(render::species_options())),
        Command::CompressImage(args) => Some(compress(args, max_dimension)),
        _ => None,
    }
}

/// Sessions are not persisted between invocations, so this normally restores
/// nothing; it still settles the loading flag before the command runs.
async fn restore<S, R, P>(coordinator: &Coordinator<S, R, P>)
where
    S: SessionProvider,
    R: ResidentRepository,
    P: PetRepository,
{
    let _subscription = coordinator.initialize().await;
}

fn credentials(args: &AccountArgs) -> Result<Credentials, SessionValidationError> {
    Credentials::try_from_parts(&args.email, &args.password)
}

async fn gallery<S, R, P>(
    coordinator: &Coordinator<S, R, P>,
    args: &GalleryArgs,
) -> Result<String, CommandError>
where
    S: SessionProvider,
    R: ResidentRepository,
    P: PetRepository,
{
    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        let credentials = Credentials::try_from_parts(email, password)?;
        coordinator.authenticate(&credentials).await?;
    }
    coordinator.refresh_pets(&PetScope::All).await?;

    let query = GalleryQuery::new(args.search.clone(), args.species.clone());
    Ok(render::gallery(&coordinator.snapshot().pets, &query))
}

async fn register_pet<S, R, P>(
    coordinator: &Coordinator<S, R, P>,
    args: &RegisterPetArgs,
    max_dimension: u32,
) -> Result<String, CommandError>
where
    S: SessionProvider,
    R: ResidentRepository,
    P: PetRepository,
{
    let identity = coordinator.authenticate(&credentials(&args.account)?).await?;
    let photo = match &args.pet.photo {
        Some(path) => photo_data_uri(path, max_dimension)?,
        None => String::new(),
    };

    let draft = form_draft(args, &identity, coordinator.snapshot().resident.as_ref(), photo);
    let form = RegistrationForm::try_from(draft)?;
    let pet = coordinator.submit_registration(&form).await?;
    Ok(render::registration_success(&pet, &coordinator.snapshot()))
}

/// Merge flags with the resident on file; explicit flags win.
fn form_draft(
    args: &RegisterPetArgs,
    identity: &SessionIdentity,
    cached: Option<&Resident>,
    photo: String,
) -> RegistrationFormDraft {
    let resident = &args.resident;
    let pick = |flag: &Option<String>, on_file: Option<&String>| {
        flag.clone()
            .or_else(|| on_file.cloned())
            .unwrap_or_default()
    };
    RegistrationFormDraft {
        resident_name: pick(&resident.resident_name, cached.map(|r| &r.name)),
        resident_block: pick(&resident.block, cached.map(|r| &r.block)),
        resident_apartment: pick(&resident.apartment, cached.map(|r| &r.apartment)),
        resident_phone: pick(&resident.phone, cached.map(|r| &r.phone)),
        resident_email: resident
            .resident_email
            .clone()
            .or_else(|| cached.map(|r| r.email.clone()))
            .unwrap_or_else(|| identity.email().to_owned()),
        pet_name: args.pet.pet_name.clone(),
        pet_species: args.pet.species.clone(),
        pet_breed: args.pet.breed.clone(),
        pet_age: args.pet.age,
        pet_description: args.pet.description.clone(),
        pet_photo: photo,
    }
}

fn photo_data_uri(path: &Path, max_dimension: u32) -> Result<String, CommandError> {
    let bytes = read_file(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let image = compress_image(&bytes, max_dimension)?;
    debug!(path = %path.display(), width = image.width, height = image.height, "photo attached");
    Ok(image.to_data_uri())
}

fn compress(args: &CompressImageArgs, default_dimension: u32) -> Result<String, CommandError> {
    let bytes = read_file(&args.input).map_err(|source| CommandError::Read {
        path: args.input.clone(),
        source,
    })?;
    let image = compress_image(&bytes, args.max_dimension.unwrap_or(default_dimension))?;
    write_file(&args.output, &image.bytes).map_err(|source| CommandError::Write {
        path: args.output.clone(),
        source,
    })?;
    Ok(render::compressed_image(
        &image,
        &args.output.display().to_string(),
    ))
}
