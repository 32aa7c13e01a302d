//! Preview binary - compiles a single note and prints the result without
//! serving it.
//!
//! Usage:
//!   cargo run --bin preview -- <locale> <slug>
//!   cargo run --bin preview -- ko ownership
//!
//! Optional environment variables:
//! - CONTENT_DIR (defaults to content)

use anyhow::{bail, Context, Result};
use tracing::info;

use garden_press::compile::{ContentCompiler, ReferenceOutcome, StaticResolver};
use garden_press::i18n::Locale;
use garden_press::store::ContentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("garden_press=info".parse()?),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        bail!("Usage: preview <locale> <slug> (e.g. preview ko ownership)");
    }
    let locale = Locale::from_code(&args[1])?;
    let slug = &args[2];

    let content_dir = std::env::var("CONTENT_DIR").unwrap_or_else(|_| "content".to_string());
    let store = ContentStore::open(&content_dir)
        .with_context(|| format!("Failed to open content root '{}'", content_dir))?;

    info!(locale = locale.code(), slug = slug.as_str(), "Loading note");
    let document = store.load(locale, slug)?;

    // Resolve references against the local route table
    let resolver = StaticResolver::new(store.route_table(locale)?);

    let compiler = ContentCompiler::new();
    let compiled = compiler.compile(&document, &resolver).await?;

    println!();
    println!("========== NOTE PREVIEW ==========");
    println!("Locale: {} ({})", locale.code(), locale.native_name());
    println!("Slug:   {}", document.slug);
    println!(
        "Title:  {}",
        compiled.title.as_deref().unwrap_or("(untitled)")
    );
    println!("Date:   {}", compiled.date.text);
    println!();

    if compiled.references.is_empty() {
        println!("No cross-references.");
    } else {
        println!("Cross-references:");
        for outcome in &compiled.references {
            match outcome {
                ReferenceOutcome::Resolved { reference, route } => {
                    println!("  [ok]      {} -> {}", reference.slug, route);
                }
                ReferenceOutcome::Broken { reference } => {
                    println!("  [missing] {}", reference.slug);
                }
            }
        }
    }

    println!();
    println!("--- Rendered HTML ---");
    println!();
    println!("{}", compiled.html);
    println!("--- End of HTML ---");
    println!();

    Ok(())
}
