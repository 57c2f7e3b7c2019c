use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub(crate) const SAMPLE_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} samples {msg}";

/// Spinner by default; a bounded bar once a length is given.
pub(crate) struct ProgressBarBuilder {
    template: &'static str,
    message: String,
    length: Option<u64>,
    tick: Option<Duration>,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            template: SPINNER_TEMPLATE,
            message: message.into(),
            length: None,
            tick: None,
        }
    }

    pub(crate) fn with_template(mut self, template: &'static str) -> Self {
        self.template = template;
        self
    }

    pub(crate) fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub(crate) fn with_tick(mut self) -> Self {
        self.tick = Some(Duration::from_millis(200));
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = match self.length {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };

        let style = match self.length {
            Some(_) => ProgressStyle::default_bar()
                .template(self.template)?
                .progress_chars("#>-"),
            None => ProgressStyle::default_spinner().template(self.template)?,
        };
        pb.set_style(style);
        pb.set_message(self.message);

        if let Some(interval) = self.tick {
            pb.enable_steady_tick(interval);
        }

        Ok(pb)
    }
}
