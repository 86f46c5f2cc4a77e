//! Shared progress bar for seeding runs.

use indicatif::{ProgressBar, ProgressStyle};

/// Row-count progress over a whole batch; hidden unless enabled.
pub struct SeedProgress {
    bar: ProgressBar,
}

impl SeedProgress {
    pub fn new(total_rows: u64, enabled: bool) -> anyhow::Result<Self> {
        let bar = if enabled {
            let bar = ProgressBar::new(total_rows);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}",
                )?
                .progress_chars("█▓▒░  "),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Ok(Self { bar })
    }

    /// Label the table currently being filled
    pub fn table(&self, name: &'static str) {
        self.bar.set_message(name);
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
