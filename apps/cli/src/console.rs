//! Terminal implementations of the operator and progress seams.

use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use scribe_core::{Operator, ProgressReporter, RunSummary};
use scribe_shared::{Result, ScribeError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Spinner shared by the progress reporter and the operator.
pub(crate) fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Reads answers from stdin and prints to stdout, hiding the spinner while
/// waiting for input.
pub(crate) struct ConsoleOperator<R = BufReader<Stdin>> {
    lines: Lines<R>,
    spinner: ProgressBar,
    visible: fn() -> ProgressDrawTarget,
}

impl ConsoleOperator {
    pub(crate) fn new(spinner: ProgressBar) -> Self {
        Self::with_reader(BufReader::new(tokio::io::stdin()), spinner)
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleOperator<R> {
    fn with_reader(reader: R, spinner: ProgressBar) -> Self {
        Self {
            lines: reader.lines(),
            spinner,
            visible: ProgressDrawTarget::stderr,
        }
    }
}

/// Hides the spinner until dropped.
struct HiddenSpinner<'a> {
    spinner: &'a ProgressBar,
    visible: fn() -> ProgressDrawTarget,
}

impl<'a> HiddenSpinner<'a> {
    fn new(spinner: &'a ProgressBar, visible: fn() -> ProgressDrawTarget) -> Self {
        spinner.set_draw_target(ProgressDrawTarget::hidden());
        Self { spinner, visible }
    }
}

impl Drop for HiddenSpinner<'_> {
    fn drop(&mut self) {
        self.spinner.set_draw_target((self.visible)());
    }
}

impl<R: AsyncBufRead + Unpin + Send> Operator for ConsoleOperator<R> {
    async fn ask(&mut self, prompt: &str) -> Result<String> {
        let _hidden = HiddenSpinner::new(&self.spinner, self.visible);

        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}")
            .and_then(|()| stdout.flush())
            .map_err(|e| ScribeError::io("<stdout>", e))?;

        self.lines
            .next_line()
            .await
            .map_err(|e| ScribeError::io("<stdin>", e))?
            .ok_or_else(|| ScribeError::Input("standard input closed".into()))
    }

    fn notice(&mut self, message: &str) {
        self.spinner.suspend(|| println!("{message}"));
    }

    fn show(&mut self, heading: &str, body: &str) {
        self.spinner.suspend(|| {
            println!();
            println!("--- {heading} ---");
            println!("{body}");
            println!("{}", "-".repeat(50));
        });
    }
}

// ---------------------------------------------------------------------------
// Progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
pub(crate) struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    pub(crate) fn new(spinner: ProgressBar) -> Self {
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn section_started(&self, part: usize, section: usize, title: &str) {
        self.spinner
            .set_message(format!("Writing {part}.{section}. {title}"));
    }

    fn section_finished(&self, part: usize, section: usize, degraded: bool) {
        if degraded {
            self.spinner.suspend(|| {
                eprintln!("  ! section {part}.{section} contains an error marker");
            });
        }
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}
