//! Card Studio command-line editor.
//!
//! ## Usage
//!
//! ```bash
//! # List the deck
//! card-studio show
//!
//! # Print the deck JSON, or a share link for it
//! card-studio export
//! card-studio share --base-url https://cards.example/
//!
//! # Replace the deck from JSON, a share token or a share link
//! card-studio import @deck.json
//! card-studio import "https://cards.example/?share=W3siaWQiOi..."
//!
//! # Edit cards and sections
//! card-studio edit characters mark name "Marcos"
//! card-studio style places "Isometric voxel diorama."
//! card-studio mute objects vape
//!
//! # Image settings and generation
//! card-studio settings --api-key "$GEMINI_API_KEY" --model gemini-3-pro-image-preview
//! card-studio generate --section events
//! card-studio generate-card characters mark
//! ```

mod config;
mod studio;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cardstudio_deck::{AspectRatio, CardField, ImageModel, ImageSize, section_icon};
use cardstudio_generation::QueueEvent;
use cardstudio_imagegen::Client;
use cardstudio_storage::{FileStore, PersistenceGateway, SaveOutcome};

use config::StudioConfig;
use studio::{DeckOrigin, Studio};

/// Card Studio - design a party card deck and generate its artwork
#[derive(Parser)]
#[command(name = "card-studio")]
#[command(version)]
struct Cli {
    /// Data directory (default: ~/.config/card-studio)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Page URL the studio is opened at; a `share` parameter loads that deck
    #[arg(long, global = true)]
    open: Option<String>,

    /// Image API models endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sections and cards
    Show,

    /// Print the deck as JSON
    Export,

    /// Print a share link for the deck
    Share {
        /// Page the link points at (default from config)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Replace the deck from JSON, a share token or a share link
    Import {
        /// Payload text, "@<path>" to read a file, or "-" for stdin
        payload: String,
    },

    /// Set a card field
    Edit {
        section: String,
        card: String,
        field: FieldArg,
        value: String,
    },

    /// Set a section's base style prompt
    Style { section: String, style: String },

    /// Toggle a card's muted flag
    Mute { section: String, card: String },

    /// Show the image prompt of a card
    Prompt { section: String, card: String },

    /// Show or change image generation settings
    Settings {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<ImageModel>,
        #[arg(long)]
        aspect_ratio: Option<AspectRatio>,
        #[arg(long)]
        image_size: Option<ImageSize>,
    },

    /// Generate artwork for every card missing it
    Generate {
        /// Limit the run to one section
        #[arg(long)]
        section: Option<String>,
    },

    /// Generate (or regenerate) one card's artwork
    GenerateCard { section: String, card: String },

    /// Restore the starter deck and default settings
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Name,
    Description,
    Image,
    ImageDetail,
    Type,
}

impl From<FieldArg> for CardField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Name => CardField::Name,
            FieldArg::Description => CardField::Description,
            FieldArg::Image => CardField::Image,
            FieldArg::ImageDetail => CardField::ImageDetail,
            FieldArg::Type => CardField::Type,
        }
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cardstudio=debug")),
        )
        .init();
}

fn read_payload(arg: String) -> Result<String> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    if let Some(path) = arg.strip_prefix('@') {
        return std::fs::read_to_string(path).with_context(|| format!("reading {path}"));
    }
    Ok(arg)
}

fn report_save(outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Full => {}
        SaveOutcome::Stripped => {
            eprintln!("Saved without embedded images (deck too large for storage).")
        }
        SaveOutcome::Dropped => eprintln!("Deck could not be saved."),
    }
}

fn print_event(event: &QueueEvent) {
    match event {
        QueueEvent::Started { scope, total } => println!("Generating {scope}: {total} cards"),
        QueueEvent::CardCompleted {
            section_id,
            card_id,
        } => println!("  done     {section_id}/{card_id}"),
        QueueEvent::CardSkipped {
            section_id,
            card_id,
        } => println!("  skipped  {section_id}/{card_id}"),
        QueueEvent::CardFailed {
            section_id,
            card_id,
            error,
        } => println!("  failed   {section_id}/{card_id}: {error}"),
        QueueEvent::Progress(progress) => println!("  progress {progress}"),
        QueueEvent::Finished { status, progress } => println!("Run {status} at {progress}"),
        QueueEvent::CardStarted { .. } | QueueEvent::Paused | QueueEvent::Resumed => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let config = StudioConfig::load(cli.data_dir)?.with_endpoint(cli.endpoint);
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("opening {}", config.data_dir.display()))?;
    let client = Client::new()?.with_endpoint(config.endpoint.clone());
    let mut studio = Studio::hydrate(
        PersistenceGateway::new(store),
        Arc::new(client),
        cli.open.as_deref(),
    );

    match cli.command {
        Commands::Show => {
            if studio.origin() == DeckOrigin::SharedLink {
                println!("Loaded from share link.");
            }
            let deck = studio.deck().await;
            let focus = studio.selection();
            for section in &deck.sections {
                println!(
                    "{} [{}] {} ({} cards)",
                    section.id,
                    section_icon(&section.id).name(),
                    section.title,
                    section.cards.len()
                );
                for card in &section.cards {
                    let cursor = if section.id == focus.section_id && card.id == focus.card_id {
                        ">"
                    } else {
                        " "
                    };
                    let art = if card.image.is_empty() { " " } else { "*" };
                    let muted = if card.is_muted { " (muted)" } else { "" };
                    println!("{cursor} {art} {:<14} {}{muted}", card.id, card.name);
                }
            }
        }

        Commands::Export => println!("{}", studio.export().await),

        Commands::Share { base_url } => {
            let base = base_url.unwrap_or(config.share_base_url);
            println!("{}", studio.share_url(&base).await);
        }

        Commands::Import { payload } => {
            let payload = read_payload(payload)?;
            let outcome = studio.import(&payload).await?;
            let deck = studio.deck().await;
            println!(
                "Imported {} sections, {} cards.",
                deck.sections.len(),
                deck.total_cards()
            );
            report_save(outcome);
        }

        Commands::Edit {
            section,
            card,
            field,
            value,
        } => {
            if !studio.edit_card(&section, &card, field.into(), &value).await {
                bail!("no card {section}/{card}");
            }
        }

        Commands::Style { section, style } => {
            if !studio.set_section_style(&section, &style).await {
                bail!("no section {section}");
            }
        }

        Commands::Mute { section, card } => match studio.toggle_muted(&section, &card).await {
            Some(muted) => println!("{section}/{card} muted: {muted}"),
            None => bail!("no card {section}/{card}"),
        },

        Commands::Prompt { section, card } => match studio.prompt(&section, &card).await {
            Some(prompt) => println!("{prompt}"),
            None => bail!("no card {section}/{card}"),
        },

        Commands::Settings {
            api_key,
            model,
            aspect_ratio,
            image_size,
        } => {
            let changed = api_key.is_some()
                || model.is_some()
                || aspect_ratio.is_some()
                || image_size.is_some();
            if changed
                && !studio.update_settings(|s| {
                    if let Some(key) = api_key {
                        s.api_key = key;
                    }
                    if let Some(model) = model {
                        s.model = model;
                    }
                    if let Some(ratio) = aspect_ratio {
                        s.aspect_ratio = ratio;
                    }
                    if let Some(size) = image_size {
                        s.image_size = size;
                    }
                })
            {
                eprintln!("Settings could not be saved.");
            }

            let settings = studio.settings();
            let key = if settings.has_api_key() { "set" } else { "not set" };
            println!("API key:      {key}");
            println!("Model:        {} ({})", settings.model, settings.model.label());
            println!("Aspect ratio: {}", settings.aspect_ratio);
            if settings.model.supports_image_size() {
                println!("Image size:   {}", settings.image_size);
            }
        }

        Commands::Generate { section } => {
            let handle = studio.queue_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("Stopping after the current card...");
                    handle.stop();
                }
            });
            let snapshot = studio.generate(section.as_deref(), print_event).await?;
            if let Some(error) = snapshot.last_error {
                eprintln!("Last error: {error}");
            }
        }

        Commands::GenerateCard { section, card } => {
            studio.generate_card(&section, &card).await?;
            println!("Generated artwork for {section}/{card}.");
        }

        Commands::Reset => {
            studio.reset().await?;
            println!("Deck and settings restored to defaults.");
            if let Some(url) = studio.page_url() {
                println!("{url}");
            }
        }
    }

    Ok(())
}
