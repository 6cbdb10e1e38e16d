//! ferrite-digits command-line front end.
//!
//! Run with:
//!   cargo run --release -- train --config run.json --output model.json
//!   cargo run --release -- evaluate --config run.json --model model.json
//!   cargo run --release -- classify --model model.json --image digit.png

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrite_digits::train::split_data;
use ferrite_digits::{evaluate, train_loop, DataPoint, Image, Network, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "ferrite-digits", version, about = "Train and run a feedforward digit classifier")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "ferrite_digits=debug").
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a new network and save it as JSON.
    Train {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Overrides `training.epochs` from the config file.
        #[arg(long)]
        epochs: Option<usize>,
        /// Seed for weight initialisation and shuffling.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Report cost and accuracy of a saved network on the configured data.
    Evaluate {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        model: PathBuf,
    },
    /// Classify one image file with a saved network.
    Classify {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        image: PathBuf,
        /// Side length the image is resized to before classification.
        #[arg(long, default_value_t = 28)]
        size: usize,
        /// Treat the image as RGB instead of greyscale.
        #[arg(long)]
        colour: bool,
        /// Comma-separated class names; defaults to the class indices.
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Train { config, output, epochs, seed } => train(config, output, epochs, seed),
        Command::Evaluate { config, model } => evaluate_model(config, model),
        Command::Classify { model, image, size, colour, labels } => {
            classify(model, image, size, colour, labels)
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn train(
    config_path: PathBuf,
    output: PathBuf,
    epochs: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = RunConfig::load_json(&config_path)
        .with_context(|| format!("reading run config {}", config_path.display()))?;
    if let Some(epochs) = epochs {
        config.training.epochs = epochs;
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut all_data = load_data(&config)?;
    if config.training.shuffle {
        all_data.shuffle(&mut rng);
    }
    let (mut training_data, validation_data) = split_data(all_data, config.training.training_split);

    let mut network = Network::from_config(&config.network, &mut rng)?;
    let history = train_loop(
        &mut network,
        &mut training_data,
        Some(validation_data.as_slice()),
        &config.training,
        &mut rng,
    )?;

    if let Some(last) = history.last() {
        println!(
            "trained {} epochs: train accuracy {:.2}%, validation accuracy {}",
            last.epoch,
            last.train_accuracy * 100.0,
            last.validation_accuracy.map_or("n/a".to_owned(), |a| format!("{:.2}%", a * 100.0)),
        );
    }

    network.save_json(&output)
        .with_context(|| format!("saving network to {}", output.display()))?;
    println!("saved network to {}", output.display());
    Ok(())
}

fn evaluate_model(config_path: PathBuf, model: PathBuf) -> anyhow::Result<()> {
    let config = RunConfig::load_json(&config_path)
        .with_context(|| format!("reading run config {}", config_path.display()))?;
    let network = Network::load_json(&model)
        .with_context(|| format!("loading network from {}", model.display()))?;
    if network.layer_sizes() != config.network.layer_sizes.as_slice() {
        bail!(
            "network layer sizes {:?} differ from the configured {:?}",
            network.layer_sizes(),
            config.network.layer_sizes
        );
    }

    let data = load_data(&config)?;
    let evaluation = evaluate(&network, &data);
    println!(
        "{} / {} correct ({:.2}%), mean cost {:.6}",
        evaluation.correct,
        evaluation.total,
        evaluation.accuracy * 100.0,
        evaluation.mean_cost
    );
    Ok(())
}

fn classify(
    model: PathBuf,
    image_path: PathBuf,
    size: usize,
    colour: bool,
    labels: Vec<String>,
) -> anyhow::Result<()> {
    let network = Network::load_json(&model)
        .with_context(|| format!("loading network from {}", model.display()))?;

    let bytes = std::fs::read(&image_path)
        .with_context(|| format!("reading image {}", image_path.display()))?;
    let image = Image::from_encoded(&bytes, size, !colour, 0)?;
    if image.pixel_values.len() != network.input_size() {
        bail!(
            "image yields {} inputs but the network expects {}",
            image.pixel_values.len(),
            network.input_size()
        );
    }

    let (prediction, outputs) = network.classify(&image.pixel_values);
    let name = |index: usize| labels.get(index).cloned().unwrap_or_else(|| index.to_string());
    info!(prediction = %name(prediction), "classified {}", image_path.display());

    let mut ranked: Vec<(usize, f64)> = outputs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (index, score) in ranked {
        println!("{:>12}  {:6.2}%", name(index), score * 100.0);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_data(config: &RunConfig) -> anyhow::Result<Vec<DataPoint>> {
    if config.data.files.is_empty() {
        bail!("the run config lists no data files");
    }
    let loader = config.data.loader();
    let images = loader.load_files(&config.data.files, config.data.format)?;
    let data = loader.data_points(&images)?;
    info!(samples = data.len(), "dataset ready");
    Ok(data)
}
