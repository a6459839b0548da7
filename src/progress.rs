use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown during the linear classification pass over the corpus.
pub struct ClassifyProgressBar {
    bar: ProgressBar,
}

impl ClassifyProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} Classifying samples... {pos}")
                .unwrap(),
        );

        Self { bar }
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ClassifyProgressBar {
    fn default() -> Self {
        Self::new()
    }
}
