//! DKO Match Tracker
//!
//! Watches the game screen, reads the queue and opponent names with OCR,
//! flags ranked opponents from the public leaderboard, and keeps a local
//! win/loss history.

mod automation;
mod capture;
mod history;
mod leaderboard;
mod logging;
mod ocr;
mod paths;
mod queue;
mod report;
mod screen;

#[cfg(test)]
mod testing;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

use automation::{load_config, run_detection_loop, DetectionContext, Services, StdinPrompt};
use capture::DisplayCapture;
use history::MatchHistory;
use leaderboard::Leaderboard;
use ocr::TesseractEngine;
use queue::Queue;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the tesseract executable
    #[arg(long)]
    tesseract_cmd: Option<PathBuf>,

    /// Queue being played (1v1, 2v2, 3v3); skips queue detection
    #[arg(long)]
    queue: Option<String>,

    /// Verbose logging and saving of every OCR capture
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Configuration file (defaults to config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match history database
    #[arg(long)]
    history_db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    paths::ensure_directories().context("Failed to create output directories")?;
    logging::init(&paths::get_logs_dir(), args.debug);

    std::panic::set_hook(Box::new(|panic_info| {
        error!("[PANIC] {}", panic_info);
    }));

    let preselected = match args.queue.as_deref().map(Queue::from_selector).transpose() {
        Ok(queue) => queue,
        Err(_) => {
            println!("Invalid queue name provided, exiting...");
            return Ok(());
        }
    };

    if let Err(e) = run(&args, preselected) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args, preselected: Option<Queue>) -> Result<()> {
    info!("DKO Match Tracker starting...");

    let config = load_config(args.config.as_deref())?;
    for warning in config.validate().context("Invalid screen layout")? {
        warn!("Config: {}", warning);
    }
    if let Some(queue) = preselected {
        if config.layout.screens(queue).is_none() {
            bail!("No screens are configured for {}", queue);
        }
        info!("Queue preselected: {}", queue);
    }

    let ocr = TesseractEngine::locate(args.tesseract_cmd.as_deref())
        .context("Tesseract OCR is not available")?;

    let leaderboard =
        Leaderboard::fetch(&config.leaderboard_url).context("Failed to load the leaderboard")?;
    for queue in Queue::ALL {
        if queue.leaderboard_id().is_some() {
            info!("Leaderboard {}: {} ranked players", queue, leaderboard.entries(queue).len());
        }
    }
    info!(
        "Leaderboard snapshot taken at {}; it is not refreshed while running",
        leaderboard.fetched_at().format("%H:%M:%S")
    );

    let history_path = args.history_db.clone().unwrap_or_else(paths::get_history_path);
    let history = MatchHistory::open(&history_path)?;

    let display = DisplayCapture::primary().context("Screen capture is not available")?;
    let prompt = StdinPrompt;

    let services = Services {
        screen: &display,
        ocr: &ocr,
        leaderboard: &leaderboard,
        history: &history,
        prompt: &prompt,
    };
    let mut ctx = DetectionContext::new(&config, services, preselected);
    if args.debug {
        ctx = ctx.with_debug(paths::get_debug_dir());
    }

    run_detection_loop(&mut ctx)
}
