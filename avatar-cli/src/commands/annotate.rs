//! One-shot annotation from the command line.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Args;

use super::{build_annotator, credential_store};
use crate::config::ConfigLoader;

/// Arguments for the annotate command
#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Text to annotate, or `-` to read from stdin
    pub text: String,

    /// Accept invalid TLS certificates (intercepting proxies)
    #[arg(long)]
    pub insecure: bool,
}

/// Run the annotate command
pub async fn run(args: AnnotateArgs) -> Result<()> {
    let text = read_text(&args.text)?;

    let mut config = ConfigLoader::load()?;
    config.provider.insecure_transport |= args.insecure;

    let annotator = build_annotator(&config)?;
    let key = credential_store().get(avatar_models::auth::GOOGLE_PROVIDER).ok();

    let annotation = annotator.annotate(&text, key.as_ref()).await?;

    println!("{}", annotation.text);
    eprintln!("model: {}", annotation.model);
    Ok(())
}

fn read_text(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    Ok(buf)
}
