//! The live dashboard loop.
//!
//! Reads the clock once per pass, renders a frame for that instant and
//! redraws the whole screen. SIGINT/SIGTERM set a flag that the loop polls;
//! the screen is restored before returning.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::debug;
use weekboard_core::Dashboard;

use super::load_schedule;

const REFRESH: Duration = Duration::from_secs(1);
const POLL: Duration = Duration::from_millis(50);

pub struct DashboardOptions<'a> {
    pub config: Option<&'a Path>,
    pub once: bool,
    pub seed: Option<u64>,
}

/// Local wall-clock time in `tz` plus the zone abbreviation.
fn local_now(tz: Tz) -> (NaiveDateTime, String) {
    let now = Utc::now().with_timezone(&tz);
    (now.naive_local(), now.format("%Z").to_string())
}

pub fn run(opts: DashboardOptions<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = load_schedule(opts.config)?;
    let tz = schedule.timezone;
    let dashboard = match opts.seed {
        Some(seed) => Dashboard::with_seed(schedule, seed),
        None => Dashboard::new(schedule),
    };

    if opts.once {
        let mut dashboard = dashboard;
        let (now, zone) = local_now(tz);
        let frame = dashboard.render(now, &zone)?;
        println!("{frame}");
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&shutdown))?;
    signal_hook::flag::register(SIGINT, Arc::clone(&shutdown))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run_loop(&mut stdout, dashboard.colorize(true), tz, &shutdown);

    // Always restore terminal state.
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    result
}

fn run_loop(
    stdout: &mut io::Stdout,
    mut dashboard: Dashboard,
    tz: Tz,
    shutdown: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut passes: u64 = 0;
    while !shutdown.load(Ordering::Relaxed) {
        let started = Instant::now();
        let (now, zone) = local_now(tz);
        let frame = dashboard.render(now, &zone)?;

        queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        for line in frame.to_string().lines() {
            write!(stdout, "{line}\r\n")?;
        }
        stdout.flush()?;
        passes += 1;

        while started.elapsed() < REFRESH && !shutdown.load(Ordering::Relaxed) {
            std::thread::sleep(POLL);
        }
    }
    debug!(passes, "dashboard stopped");
    Ok(())
}
