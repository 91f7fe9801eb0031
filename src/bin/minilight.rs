use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use minilight_rs::model::{self, RenderOutcome};
use minilight_rs::random::Random;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "minilight")]
#[command(about = "Minimal unbiased global illumination renderer", long_about = None)]
struct Args {
    /// Scene model file; the image is written next to it as <modelPath>.ppm
    model_path: PathBuf,

    /// Fixed random seed for reproducible renders
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    // clap does not model "-?", accept it as an extra help spelling
    if std::env::args().skip(1).any(|arg| arg == "-?") {
        Args::command().print_help().ok();
        return ExitCode::SUCCESS;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(outcome) => {
            println!();
            println!(
                "{}",
                match outcome {
                    RenderOutcome::Finished => "finished",
                    RenderOutcome::Interrupted => "interrupted",
                }
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("minilight: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<RenderOutcome> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("installing the interrupt handler")?;
    }

    let file = File::open(&args.model_path)
        .with_context(|| format!("opening model {}", args.model_path.display()))?;
    let mut job = model::parse(file)
        .with_context(|| format!("reading model {}", args.model_path.display()))?;

    let mut random = args.seed.map(Random::with_seed).unwrap_or_default();
    let output_path = model::output_path(&args.model_path);
    model::render(&mut job, &mut random, &interrupted, &output_path)
        .with_context(|| format!("writing image {}", output_path.display()))
}
