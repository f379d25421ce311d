//! Gemini model and credential commands.
//!
//! `models list` runs discovery alone, the same check the UI's
//! "TEST API GEMINI" button performs. `models auth` manages the key in the
//! system keyring.

use anyhow::{Result, bail};
use avatar_models::ModelDescriptor;
use avatar_models::auth::{CredentialSource, CredentialStore, GOOGLE_PROVIDER, env_vars_for_provider};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use dialoguer::{Password, theme::ColorfulTheme};

use super::{build_annotator, credential_store};
use crate::config::ConfigLoader;

/// Models management arguments.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommands,
}

/// Models subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelsCommands {
    /// List models the configured key can use for annotation
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store the Gemini API key in the system keyring
    Auth {
        /// Delete the stored key instead
        #[arg(long)]
        delete: bool,
    },
}

/// Run models command.
pub async fn run(args: ModelsArgs) -> Result<()> {
    match args.command {
        ModelsCommands::List { json } => list_models(json).await,
        ModelsCommands::Auth { delete } => manage_auth(&credential_store(), delete),
    }
}

/// List usable models in provider order.
async fn list_models(json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let annotator = build_annotator(&config)?;
    let store = credential_store();
    let key = store.get(GOOGLE_PROVIDER).ok();

    let models = annotator.list_available_models(key.as_ref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    if let Some(key) = &key {
        let source = match store.credential_source(GOOGLE_PROVIDER) {
            Some(CredentialSource::Keyring) => " (keyring)",
            Some(CredentialSource::Environment) => " (environment)",
            None => "",
        };
        println!("Key: {}{}", key.preview(), source);
    }

    if models.is_empty() {
        println!("No usable models for this key.");
        return Ok(());
    }

    println!("{}", models_table(&models));
    println!("Total: {}", models.len());
    Ok(())
}

fn models_table(models: &[ModelDescriptor]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Model").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
    ]);

    for (i, model) in models.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&model.id),
            Cell::new(model.category),
        ]);
    }

    table
}

/// Store or delete the Gemini key.
fn manage_auth(store: &CredentialStore, delete: bool) -> Result<()> {
    if delete {
        match store.delete(GOOGLE_PROVIDER) {
            Ok(()) => println!("Gemini API key deleted."),
            Err(avatar_models::Error::CredentialsNotFound(_)) => {
                println!("No Gemini API key stored in the keyring.")
            }
            Err(e) => bail!("Failed to delete credentials: {}", e),
        }
        return Ok(());
    }

    let env_hint = env_vars_for_provider(GOOGLE_PROVIDER)
        .first()
        .map(|v| format!(" (or set {})", v))
        .unwrap_or_default();
    println!("Enter your Gemini API key{}", env_hint);
    println!("Get one at https://aistudio.google.com");

    let key = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API key")
        .interact()?;

    if key.trim().is_empty() {
        bail!("API key cannot be empty");
    }

    store.set(GOOGLE_PROVIDER, key.trim())?;
    println!("Gemini API key saved to keyring.");
    Ok(())
}
