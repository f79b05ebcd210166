use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tuberscan::cli::{Cli, Command, PredictArgs};
use tuberscan::{
    catalog, classifier, AppConfig, BookmarkStore, CaptureSource, FileStore, LocalFilePicker,
    PredictionPipeline, PredictionState, TipRotation,
};

const METER_WIDTH: usize = 20;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if cli.api_url.is_some() {
        config.api_url = cli.api_url.clone();
    }
    if cli.mock {
        config.mock = true;
    }

    match cli.command {
        Command::Predict(args) => predict(config, args).await?,
        Command::Explore(args) => print_diseases(&catalog::search(args.query.as_deref().unwrap_or(""))),
        Command::Show(args) => show(&args.id)?,
        Command::Bookmark(args) => toggle_bookmark(&args.id).await?,
        Command::Bookmarks => list_bookmarks().await?,
        Command::Tip(args) => print_tips(args.count),
    }

    Ok(())
}

async fn predict(mut config: AppConfig, args: PredictArgs) -> Result<()> {
    if let Some(timeout) = args.timeout {
        config.timeout_seconds = timeout;
    }
    let classifier = classifier::from_config(&config).context("Could not set up the classifier")?;
    let picker = Arc::new(LocalFilePicker::new(args.images.clone()));
    let pipeline = PredictionPipeline::new(classifier, picker);

    for _ in &args.images {
        let state = pipeline.capture_and_predict(CaptureSource::Library).await?;
        if let Some(image) = pipeline.current_image().await {
            println!("{image}");
        }
        print_state(&state);
        println!();
    }

    let recent = pipeline.recent_images().await;
    if !recent.is_empty() {
        println!("Recent images:");
        for reference in recent {
            println!("  {reference}");
        }
    }
    Ok(())
}

fn print_state(state: &PredictionState) {
    match state {
        PredictionState::Succeeded(prediction) => {
            println!("  Disease:    {}", prediction.label);
            println!("  Confidence: {}%", prediction.confidence_display());
            println!("  [{}]", meter(prediction.meter_fill()));
        }
        PredictionState::Failed(message) => println!("  {message}"),
        PredictionState::InProgress => println!("  Analyzing image..."),
        PredictionState::Idle => println!("  No image selected."),
    }
}

fn meter(fill: f32) -> String {
    let filled = (fill / 100.0 * METER_WIDTH as f32).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(METER_WIDTH - filled))
}

fn print_diseases(diseases: &[&'static tuberscan::Disease]) {
    if diseases.is_empty() {
        println!("No diseases match that search.");
        return;
    }
    for disease in diseases {
        println!("{:<14} {:<20} {}", disease.id, disease.name, disease.short);
    }
}

fn show(id: &str) -> Result<()> {
    let disease = catalog::find(id)
        .with_context(|| format!("No disease with id '{id}'. Try 'tuberscan explore'."))?;
    println!("{}", disease.name);
    println!("{}", disease.short);
    println!();
    println!("{}", disease.full);
    Ok(())
}

async fn open_bookmarks() -> Result<BookmarkStore> {
    let storage = FileStore::in_data_dir().context("Could not open bookmark storage")?;
    let store = BookmarkStore::new(Arc::new(storage));
    store.initialize().await;
    Ok(store)
}

async fn toggle_bookmark(id: &str) -> Result<()> {
    let disease = catalog::find(id)
        .with_context(|| format!("No disease with id '{id}'. Try 'tuberscan explore'."))?;
    let store = open_bookmarks().await?;
    if store.toggle(disease).await {
        println!("Saved {}.", disease.name);
    } else {
        println!("Removed {}.", disease.name);
    }
    Ok(())
}

async fn list_bookmarks() -> Result<()> {
    let store = open_bookmarks().await?;
    let diseases = store.bookmarked_diseases().await;
    if diseases.is_empty() {
        println!("No bookmarks yet. Save one with 'tuberscan bookmark <id>'.");
        return Ok(());
    }
    print_diseases(&diseases);
    Ok(())
}

fn print_tips(count: usize) {
    let mut rotation = TipRotation::today();
    for index in 0..count.max(1) {
        if index == 0 {
            println!("Tip of the day: {}", rotation.current());
        } else {
            println!("{}", rotation.advance());
        }
    }
}
