//! Sweep progress display with automatic batching for large sweeps

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Pipeline stages reported per run
pub const STAGES: [&str; 5] = ["generate", "analyse", "build", "sample", "compare"];

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>8} [{bar:30.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Moduli: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for a sweep over moduli
///
/// Small sequential sweeps get one bar per modulus showing the current
/// stage; larger sweeps add a batch bar and keep only the most recent runs
/// visible. Parallel sweeps only count completed runs on the batch bar.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    run_bars: Vec<ProgressBar>,
    /// (`label`, `stage index`) for the rolling window display
    run_states: Vec<(String, usize)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            run_bars: Vec::new(),
            run_states: Vec::new(),
        }
    }

    /// Initialise bars for `run_count` runs
    pub fn initialize(&mut self, run_count: usize, parallel: bool) {
        if parallel || run_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(run_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
        if parallel {
            return;
        }

        for _ in 0..run_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let pb = ProgressBar::new(STAGES.len() as u64);
            pb.set_style(STAGE_STYLE.clone());
            self.run_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Batch bar handle that can be advanced from worker threads
    pub fn batch_handle(&self) -> Option<ProgressBar> {
        self.batch_bar.clone()
    }

    /// Register a run
    pub fn start_run(&mut self, index: usize, modulus: u64) {
        if index >= self.run_states.len() {
            self.run_states.resize(index + 1, (String::new(), 0));
        }
        if let Some(state) = self.run_states.get_mut(index) {
            *state = (format!("m={modulus}"), 0);
        }
        self.update_bars();
    }

    /// Report the stage a run has reached
    pub fn update_stage(&mut self, index: usize, stage: usize) {
        if let Some(state) = self.run_states.get_mut(index) {
            state.1 = stage.min(STAGES.len());
        }
        self.update_bars();
    }

    /// Mark a run as completed and advance the batch bar
    pub fn complete_run(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.run_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = STAGES.len();
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All moduli processed");
        }
        let _ = self.multi_progress.clear();
    }

    fn update_bars(&self) {
        let active: Vec<&(String, usize)> = self
            .run_states
            .iter()
            .filter(|(label, _)| !label.is_empty())
            .collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_index, (label, stage)) in visible.iter().enumerate() {
            if let Some(bar) = self.run_bars.get(bar_index) {
                bar.set_position(*stage as u64);
                bar.set_prefix(label.clone());
                bar.set_message(STAGES.get(*stage).copied().unwrap_or("done"));
            }
        }
    }
}
