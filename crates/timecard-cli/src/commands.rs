use crate::args::Cli;
use crate::config::Config;
use crate::logging;
use crate::sample;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use timecard_core::{StdoutConsole, Timecard};

const SLEEP_SLICE: Duration = Duration::from_millis(50);

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config = Config::resolve(&cli)?;
    tracing::debug!(?config, "configuration resolved");

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing Ctrl-C handler")?;

    let mut table = sample::build_table(&config, StdoutConsole::new());
    table.write_headers()?;
    warn_if_too_wide(&table);

    let mut rng = rand::thread_rng();
    let interval = Duration::from_millis(config.interval_ms);
    let commit_every = u64::from(config.commit_every);
    let mut ticks = 0u64;

    while !interrupted.load(Ordering::SeqCst) {
        sample::tick(&mut table, &mut rng, sample::BURST_STEP)?;
        sleep_unless_interrupted(interval, &interrupted);

        ticks += 1;
        table.write_line(ticks % commit_every == 0)?;

        if cli.ticks.is_some_and(|limit| ticks >= limit) {
            break;
        }
    }

    table.finish()?;
    tracing::debug!(ticks, "stopped");
    Ok(())
}

fn sleep_unless_interrupted(total: Duration, interrupted: &AtomicBool) {
    let deadline = Instant::now() + total;
    while !interrupted.load(Ordering::SeqCst) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        thread::sleep(remaining.min(SLEEP_SLICE));
    }
}

fn warn_if_too_wide(table: &Timecard) {
    if let Some((terminal_size::Width(width), _)) = terminal_size::terminal_size() {
        let needed = table.header_width();
        if needed > usize::from(width) {
            tracing::warn!(needed, available = width, "table is wider than the terminal");
        }
    }
}
