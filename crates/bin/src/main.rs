//! Podium CLI binary.
//!
//! Provides the command-line interface for the Podium race predictor.

mod integration;

use clap::{Parser, Subcommand};
use integration::cache_manager;
use integration::data_pipeline::{
    FetchConfig, build_client, fetch_inputs, load_mapping, load_qualifying, print_cache_info,
};
use podium::{ArtifactLayout, GrandPrix, PipelineError, PredictionPipeline, QualifyingSnapshot};
use podium_model::{PredictorConfig, SplitConfig};
use podium_output::{Dashboard, ResultWriter, no_predictions_message};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "podium")]
#[command(about = "Podium: F1 race-order prediction from qualifying and sector times", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pipeline steps (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported Grand Prix events
    Events,

    /// Snapshot target qualifying results to CSV
    Qualifying {
        /// Event slug (see `podium events`)
        #[arg(long, value_parser = parse_event)]
        event: GrandPrix,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,

        /// Directory for qualifying snapshots
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Predict race order for an event and save the artifacts
    Predict {
        /// Event slug (see `podium events`)
        #[arg(long, value_parser = parse_event)]
        event: GrandPrix,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,

        /// Driver code to name mapping (JSON)
        #[arg(long, default_value = "driver_mapping.json")]
        mapping: PathBuf,

        /// Directory for qualifying snapshots
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory for predictions and MAE files
        #[arg(long, default_value = "predictions")]
        output_dir: PathBuf,

        /// Train/held-out shuffle seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Minimum complete rows required to fit the model
        #[arg(long, default_value = "5")]
        min_rows: usize,
    },

    /// Show the saved prediction for an event
    Show {
        /// Event slug (see `podium events`)
        #[arg(long, value_parser = parse_event)]
        event: GrandPrix,

        /// Render as markdown
        #[arg(long)]
        markdown: bool,

        /// Directory holding predictions and MAE files
        #[arg(long, default_value = "predictions")]
        output_dir: PathBuf,

        /// Directory holding track images
        #[arg(long, default_value = "images")]
        images_dir: PathBuf,
    },

    /// Show response cache statistics
    Cache {
        /// Remove every cached response
        #[arg(long)]
        clear: bool,
    },
}

fn parse_event(slug: &str) -> Result<GrandPrix, String> {
    slug.parse().map_err(|e: podium_data::DataError| e.to_string())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Events => list_events(),
        Commands::Qualifying {
            event,
            no_cache,
            refresh,
            data_dir,
        } => {
            let config = FetchConfig {
                use_cache: !no_cache,
                force_refresh: refresh,
            };
            let layout = ArtifactLayout {
                data_dir,
                ..Default::default()
            };
            snapshot_qualifying(event, config, &layout).await?;
        }
        Commands::Predict {
            event,
            no_cache,
            refresh,
            mapping,
            data_dir,
            output_dir,
            seed,
            min_rows,
        } => {
            let config = FetchConfig {
                use_cache: !no_cache,
                force_refresh: refresh,
            };
            let layout = ArtifactLayout {
                data_dir,
                predictions_dir: output_dir,
                ..Default::default()
            };
            let predictor = PredictorConfig {
                split: SplitConfig {
                    seed,
                    ..Default::default()
                },
                min_training_rows: min_rows,
                ..Default::default()
            };
            predict_event(event, config, &layout, &mapping, predictor).await?;
        }
        Commands::Show {
            event,
            markdown,
            output_dir,
            images_dir,
        } => {
            let layout = ArtifactLayout {
                predictions_dir: output_dir,
                images_dir,
                ..Default::default()
            };
            show_event(event, &layout, markdown)?;
        }
        Commands::Cache { clear } => {
            manage_cache(clear)?;
        }
    }

    Ok(())
}

fn list_events() {
    println!("Supported Grand Prix");
    println!("====================\n");
    println!(
        "  {:<12} {:<16} {:<12} {:>6} {:>10}",
        "Slug", "Event", "Country", "Season", "Reference"
    );
    for gp in GrandPrix::all() {
        println!(
            "  {:<12} {:<16} {:<12} {:>6} {:>10}",
            gp.slug(),
            gp.name(),
            gp.country(),
            gp.season(),
            gp.reference_season()
        );
    }
}

async fn snapshot_qualifying(
    gp: GrandPrix,
    config: FetchConfig,
    layout: &ArtifactLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config)?;
    let path = layout.qualifying_csv(gp);

    match load_qualifying(&client, gp, layout).await {
        Ok(QualifyingSnapshot::Fetched(entries)) => {
            println!(
                "Qualifying data saved to '{}' ({} drivers)",
                path.display(),
                entries.len()
            );
        }
        Ok(QualifyingSnapshot::Existing(entries)) => {
            println!(
                "Qualifying data already present at '{}' ({} drivers)",
                path.display(),
                entries.len()
            );
        }
        Err(e @ PipelineError::SourceUnavailable { .. }) => {
            println!("{e}");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn predict_event(
    gp: GrandPrix,
    config: FetchConfig,
    layout: &ArtifactLayout,
    mapping: &std::path::Path,
    predictor: PredictorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!(
        "║{:^62}║",
        format!("RACE PREDICTION: {} {}", gp.season(), gp.name())
    );
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    if config.use_cache {
        print_cache_info();
        if config.force_refresh {
            println!("  Mode: Force refresh (re-fetching all data)");
        }
    } else {
        println!("  Cache: Disabled");
    }
    println!();

    let pipeline = PredictionPipeline::new(predictor, load_mapping(mapping)?)?;
    let client = build_client(config)?;
    let writer = ResultWriter::new(layout.predictions_csv(gp), layout.mae_txt(gp));

    let outcome = fetch_inputs(&client, gp, layout)
        .await
        .and_then(|(qualifying, laps)| pipeline.run(gp.name(), &qualifying, &laps, &writer));

    match outcome {
        Ok(run) => {
            println!(
                "\nTrained on {} drivers, scored on {} held out.",
                run.train_rows, run.test_rows
            );
            println!("{}", run.report);
            println!("Predictions saved to '{}'", writer.predictions_path().display());
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            println!("\nPrediction aborted: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn show_event(
    gp: GrandPrix,
    layout: &ArtifactLayout,
    markdown: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let track_image = layout.track_image(gp);
    let dashboard = Dashboard::load(
        gp.name(),
        &layout.predictions_csv(gp),
        &layout.mae_txt(gp),
        Some(&track_image),
    )?;

    match dashboard {
        Some(dashboard) if markdown => print!("{}", dashboard.to_markdown()),
        Some(dashboard) => print!("{dashboard}"),
        None => println!("{}", no_predictions_message(gp.name())),
    }
    Ok(())
}

fn manage_cache(clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Response cache");
    println!("==============\n");
    print_cache_info();

    if clear {
        let cache = cache_manager::open_cache()?;
        let stats = cache.get_stats()?;
        cache.clear_all()?;
        println!("\nCleared {} cached responses.", stats.entries);
    }
    Ok(())
}
