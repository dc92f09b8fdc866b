//! Terminal progress bar shown while the snapshot renders.
//!
//! The bar only measures elapsed time against an estimate. It never checks the
//! asset location, so reaching 100% does not mean the image exists.

use async_trait::async_trait;
use std::future::Future;
use std::io::Write;
use std::time::Duration;

pub const BAR_WIDTH: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// The estimate elapsed.
    Elapsed,
    /// Cancelled before the estimate elapsed.
    Interrupted,
}

/// Blocks the run for roughly the render time.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn run_progress(&self, estimate: Duration) -> ProgressOutcome;
}

/// One frame, e.g. `Progress [=====--------------------] 20.00% Complete`.
pub fn render_bar(elapsed_secs: u64, total_secs: u64) -> String {
    let fraction = if total_secs == 0 {
        1.0
    } else {
        (elapsed_secs.min(total_secs) as f64) / (total_secs as f64)
    };
    let filled = ((fraction * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    format!(
        "Progress [{}{}] {:.2}% Complete",
        "=".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        fraction * 100.0
    )
}

/// Redraw the bar once per second until `estimate` elapses or `cancel`
/// resolves. The line is always terminated so later output starts clean.
pub async fn run_until<W, C>(estimate: Duration, out: &mut W, cancel: C) -> ProgressOutcome
where
    W: Write + Send,
    C: Future<Output = ()> + Send,
{
    let total = estimate.as_secs();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut elapsed = 0;
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            biased;
            _ = &mut cancel => {
                let _ = writeln!(out);
                let _ = out.flush();
                return ProgressOutcome::Interrupted;
            }
            _ = ticker.tick() => {
                let _ = write!(out, "\r{}", render_bar(elapsed, total));
                let _ = out.flush();
                if elapsed >= total {
                    let _ = writeln!(out);
                    return ProgressOutcome::Elapsed;
                }
                elapsed += 1;
            }
        }
    }
}

/// Draws to stdout; Ctrl-C interrupts the wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalProgress;

#[async_trait]
impl ProgressReporter for TerminalProgress {
    async fn run_progress(&self, estimate: Duration) -> ProgressOutcome {
        let mut out = std::io::stdout();
        let interrupt = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available: the wait cannot be interrupted.
                std::future::pending::<()>().await;
            }
        };
        run_until(estimate, &mut out, interrupt).await
    }
}
