//! Photo Gallery - CLI
//!
//! Command-line front end over an on-disk gallery.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use photo_gallery::{
    DataDirectory, FileCamera, GalleryConfig, KeyValueStore, PhotoGallery, SqliteStore,
};

#[derive(Parser)]
#[command(name = "photo-gallery")]
#[command(author = "Karen Tonoyan")]
#[command(version = photo_gallery::VERSION)]
#[command(about = "Photo gallery backed by a JSON index and a local file store")]
struct Cli {
    /// Gallery root directory
    #[arg(short, long, default_value = "./gallery")]
    root: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a photo by importing an image file
    Capture {
        /// Image file
        image: PathBuf,
    },

    /// List photos, newest first
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the raw persisted index
    ShowIndex,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn open_store(root: &Path) -> anyhow::Result<SqliteStore> {
    let path = root.join("storage.db");
    SqliteStore::open(&path).with_context(|| format!("opening {}", path.display()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    };

    match cli.command {
        Commands::Capture { image } => {
            let camera = Arc::new(FileCamera::new());
            camera.queue(&image);

            let gallery = PhotoGallery::new(
                camera,
                Arc::new(DataDirectory::new(&cli.root)),
                Arc::new(open_store(&cli.root)?),
                config,
            )?;
            gallery.initialize().await?;

            let record = gallery
                .capture_photo()
                .await
                .with_context(|| format!("capturing {}", image.display()))?;

            println!("✅ Saved {} ({} photos)", record.filepath, gallery.len());
        }

        Commands::List { json } => {
            let gallery = PhotoGallery::new(
                Arc::new(FileCamera::new()),
                Arc::new(DataDirectory::new(&cli.root)),
                Arc::new(open_store(&cli.root)?),
                config,
            )?;
            gallery.initialize().await?;

            let photos = gallery.photos();
            if json {
                println!("{}", serde_json::to_string_pretty(&*photos)?);
            } else if photos.is_empty() {
                println!("📭 No photos in gallery");
            } else {
                println!("📷 Photos in gallery ({}):", photos.len());
                println!("{:-<60}", "");
                for photo in photos.iter() {
                    let status = match &photo.inline_content {
                        Some(content) => format!("{} chars inline", content.len()),
                        None => "file missing".to_string(),
                    };
                    println!("{} - {}", photo.filepath, status);
                }
            }
        }

        Commands::ShowIndex => {
            let store = open_store(&cli.root)?;
            match store.get(&config.index_key).await? {
                Some(raw) => println!("{}", raw),
                None => println!("[]"),
            }
        }
    }

    Ok(())
}
