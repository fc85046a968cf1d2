//! Figloom CLI - batch reconstruction of layered-character figures

mod commands;
mod config;

use anyhow::{bail, Result};
use clap::Parser;
use config::Config;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "figloom")]
#[command(about = "Rebuilds layered-character figures from an unpacked export", long_about = None)]
#[command(version)]
struct Cli {
    /// Export root; the parent directory of ExportedProject
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output directory for diced exports
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// JSON config path; generated under ./configs when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate the config file from the export
    #[arg(short, long)]
    genconfig: bool,

    /// Produce one figure per composition-key list
    #[arg(short, long)]
    assemble: bool,

    /// Crop every sprite out of the atlas
    #[arg(short, long)]
    breakup: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut cli = Cli::parse();

    // Diced exports carry no sprite descriptors and short-circuit into the
    // mesh reassembly path.
    if let Some(dir) = &cli.dir {
        if figloom_unity::is_diced_export(dir) {
            println!("Analysing diced export structure");
            return commands::dice::run(dir, &cli.output);
        }
    }

    // With no stage flags, everything runs.
    if !cli.genconfig && !cli.assemble && !cli.breakup {
        cli.genconfig = true;
        cli.assemble = true;
        cli.breakup = true;
    }

    let mut config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.json"));

    if cli.genconfig && cli.config.is_none() {
        let Some(dir) = cli.dir.as_deref() else {
            bail!("--dir is required to generate a config file");
        };
        println!("Generating config file");
        config_path = commands::genconfig::run(dir, Path::new("configs"))?;
    }

    let config = Config::load(&config_path)?;

    if cli.breakup {
        println!("Producing sprites");
        commands::breakup::run(&config)?;
    }

    if cli.assemble {
        println!("Producing figures");
        commands::assemble::run(&config)?;
    }

    Ok(())
}
