//! Command-line front end.
//!
//! Parses arguments with clap, drives the coordinator and prints text rendered
//! from its snapshots. Sessions are not persisted between invocations, so
//! commands that need one sign in first with `--email`/`--password`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;
mod files;
pub mod messages;
pub mod render;

pub use commands::{CommandError, execute, run};
pub use messages::UserMessage;

/// `petcondo` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "petcondo",
    about = "Register and browse the pets living in the condominium",
    version
)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every registered pet, optionally filtered.
    Gallery(GalleryArgs),
    /// Print the species offered by the registration form.
    Species,
    /// Create an account.
    SignUp(AccountArgs),
    /// Sign in and list the pets owned by your resident record.
    MyPets(AccountArgs),
    /// Sign in and register a pet, creating your resident record if needed.
    RegisterPet(RegisterPetArgs),
    /// Downscale and re-encode a photo as JPEG.
    CompressImage(CompressImageArgs),
}

/// Email and password used to sign in.
#[derive(Debug, Clone, Args)]
pub struct AccountArgs {
    /// Account email.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Account password.
    #[arg(long, value_name = "password")]
    pub password: String,
}

/// Gallery filters.
#[derive(Debug, Clone, Args)]
pub struct GalleryArgs {
    /// Case-insensitive text matched against pet name, breed, owner name and
    /// apartment.
    #[arg(long, value_name = "text", default_value = "")]
    pub search: String,
    /// Exact species label.
    #[arg(long, value_name = "name")]
    pub species: Option<String>,
    /// Sign in before listing, for projects that hide pets from anonymous
    /// visitors.
    #[arg(long, value_name = "email", requires = "password")]
    pub email: Option<String>,
    /// Password for `--email`.
    #[arg(long, value_name = "password", requires = "email")]
    pub password: Option<String>,
}

/// Resident half of the registration form.
///
/// Omitted values fall back to the resident already on file for the account.
#[derive(Debug, Clone, Default, Args)]
pub struct ResidentArgs {
    /// Resident name.
    #[arg(long, value_name = "name")]
    pub resident_name: Option<String>,
    /// Building block.
    #[arg(long, value_name = "block")]
    pub block: Option<String>,
    /// Apartment number.
    #[arg(long, value_name = "apartment")]
    pub apartment: Option<String>,
    /// Contact phone with area code.
    #[arg(long, value_name = "phone")]
    pub phone: Option<String>,
    /// Contact email; defaults to the account email.
    #[arg(long, value_name = "email")]
    pub resident_email: Option<String>,
}

/// Pet half of the registration form.
#[derive(Debug, Clone, Args)]
pub struct PetArgs {
    /// Pet name.
    #[arg(long, value_name = "name")]
    pub pet_name: String,
    /// Species label.
    #[arg(long, value_name = "species")]
    pub species: String,
    /// Breed label.
    #[arg(long, value_name = "breed")]
    pub breed: String,
    /// Age in years.
    #[arg(long, value_name = "years", allow_negative_numbers = true)]
    pub age: i64,
    /// Free-text description.
    #[arg(long, value_name = "text", default_value = "")]
    pub description: String,
    /// Photo to preprocess and embed.
    #[arg(long, value_name = "path")]
    pub photo: Option<PathBuf>,
}

/// `register-pet` arguments.
#[derive(Debug, Clone, Args)]
pub struct RegisterPetArgs {
    /// Account to sign in with.
    #[command(flatten)]
    pub account: AccountArgs,
    /// Resident details.
    #[command(flatten)]
    pub resident: ResidentArgs,
    /// Pet details.
    #[command(flatten)]
    pub pet: PetArgs,
}

/// `compress-image` arguments.
#[derive(Debug, Clone, Args)]
pub struct CompressImageArgs {
    /// Source image.
    #[arg(long, value_name = "path")]
    pub input: PathBuf,
    /// Destination for the JPEG output.
    #[arg(long, value_name = "path")]
    pub output: PathBuf,
    /// Longest edge in pixels; defaults to the configured bound.
    #[arg(long = "max-dimension", value_name = "pixels")]
    pub max_dimension: Option<u32>,
}

#[cfg(test)]
mod tests {
    //! Argument parsing coverage.

    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("petcondo").chain(args.iter().copied()))
    }

    #[rstest]
    fn parses_register_pet_flags() {
        let cli = parse(&[
            "register-pet",
            "--email",
            "ana@x.com",
            "--password",
            "secret1",
            "--block",
            "2",
            "--pet-name",
            "Rex",
            "--species",
            "Cão",
            "--breed",
            "SRD",
            "--age",
            "3",
        ])
        .expect("parse");

        let Command::RegisterPet(args) = cli.command else {
            panic!("expected register-pet");
        };
        assert_eq!(args.account.email, "ana@x.com");
        assert_eq!(args.resident.block.as_deref(), Some("2"));
        assert!(args.resident.resident_name.is_none());
        assert_eq!(args.pet.age, 3);
        assert!(args.pet.photo.is_none());
    }

    #[rstest]
    fn gallery_credentials_must_come_in_pairs() {
        assert!(parse(&["gallery", "--email", "ana@x.com"]).is_err());
        assert!(parse(&["gallery", "--species", "Gato"]).is_ok());
    }

    #[rstest]
    #[case(&["compress-image", "--input", "a.png", "--output", "a.jpg"], None)]
    #[case(
        &["compress-image", "--input", "a.png", "--output", "a.jpg", "--max-dimension", "400"],
        Some(400)
    )]
    fn compress_image_bound_is_optional(#[case] args: &[&str], #[case] expected: Option<u32>) {
        let cli = parse(args).expect("parse");
        let Command::CompressImage(args) = cli.command else {
            panic!("expected compress-image");
        };
        assert_eq!(args.max_dimension, expected);
    }

    #[rstest]
    fn negative_ages_reach_form_validation() {
        let cli = parse(&[
            "register-pet",
            "--email",
            "a@x.com",
            "--password",
            "p",
            "--pet-name",
            "Rex",
            "--species",
            "Cão",
            "--breed",
            "SRD",
            "--age",
            "-1",
        ])
        .expect("parse");
        let Command::RegisterPet(args) = cli.command else {
            panic!("expected register-pet");
        };
        assert_eq!(args.pet.age, -1);
    }
}
