use anyhow::{Context, Result};
use clap::Parser;
use jtm_loader::{DatasetConfig, DecodePolicy, DirectoryLoader};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Load the JTM images of one HMDB51 split into memory.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Which train/test partition of the dataset to use.
    #[arg(long, default_value = "1")]
    split: String,

    /// Dataset root directory. Falls back to the HMDB51_ROOT environment
    /// variable when omitted.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Skip entries that fail to decode instead of aborting.
    #[arg(long)]
    skip_bad: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match args.root {
        Some(root) => DatasetConfig::new(root, args.split),
        None => DatasetConfig::from_env(args.split)
            .context("pass --root or set HMDB51_ROOT to the dataset root")?,
    };

    let policy = if args.skip_bad {
        DecodePolicy::Skip
    } else {
        DecodePolicy::FailFast
    };
    let loader = DirectoryLoader::new().with_policy(policy);

    let train = loader.load(config.train_dir())?;
    info!(images = train.len(), skipped = train.skipped(), "train split loaded");
    let test = loader.load(config.test_dir())?;
    info!(images = test.len(), skipped = test.skipped(), "test split loaded");

    println!("train: {} images, test: {} images", train.len(), test.len());
    Ok(())
}
