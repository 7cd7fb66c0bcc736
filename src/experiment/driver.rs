//! Sweeps the full pipeline over a list of moduli
//!
//! Each run is: generate the triangle, analyse its block structure, build a
//! candidate IFS from the motif, sample its attractor and score the sample
//! against the analysed raster. Runs share nothing mutable except the raster
//! cache, so a parallel sweep only touches the cache once all runs finish.

use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

use crate::analysis::comparator::{ComparatorConfig, PatternComparator};
use crate::analysis::similarity::SelfSimilarityAnalyzer;
use crate::cancellation::CancellationToken;
use crate::experiment::cache::{RasterKey, TriangleCache};
use crate::experiment::report::{RunReport, SweepReport};
use crate::ifs::candidate::{AssignmentRule, IfsCandidate};
use crate::ifs::hutchinson::HutchinsonRenderer;
use crate::ifs::sampler::{AttractorSample, AttractorSampler, SamplerConfig};
use crate::io::configuration::{
    ANIMATION_SUFFIX, ATTRACTOR_SUFFIX, DEFAULT_ANIMATION_FRAMES, DEFAULT_MODULUS,
    DEFAULT_ROW_COUNT, DEFAULT_SAMPLE_IMAGE_SIZE, GIF_FRAME_DELAY_MS, MAX_RASTER_ROWS,
    REPORT_FILE_NAME, TRIANGLE_SUFFIX,
};
use crate::io::error::{PatternError, Result, invalid_parameter, validate_modulus};
use crate::io::image::{RenderOptions, export_raster_png, export_sample_png};
use crate::io::progress::ProgressManager;
use crate::io::visualization::ChaosAnimation;
use crate::math::is_prime;
use crate::pattern::encoder::{EncoderOptions, EncodingMode, PatternEncoder};
use crate::pattern::palette::Palette;
use crate::triangle::{ModularTriangleGenerator, Raster};

/// How many rows to generate for a modulus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSpec {
    /// The same row count for every modulus
    Fixed(usize),
    /// `m^k` rows for modulus `m`, so every run analyses `k` full levels
    PowerOfModulus(u32),
}

impl Default for RowSpec {
    fn default() -> Self {
        Self::Fixed(DEFAULT_ROW_COUNT)
    }
}

impl RowSpec {
    /// Row count for `modulus`
    ///
    /// # Errors
    ///
    /// Returns `InvalidRowCount` for zero rows, a zero exponent, or a count
    /// above the raster limit
    pub fn rows_for(&self, modulus: u64) -> Result<usize> {
        let rows = match *self {
            Self::Fixed(rows) => rows,
            Self::PowerOfModulus(0) => {
                return Err(PatternError::InvalidRowCount {
                    rows: 1,
                    reason: "the exponent must be at least 1",
                });
            }
            Self::PowerOfModulus(exponent) => usize::try_from(modulus)
                .ok()
                .and_then(|m| m.checked_pow(exponent))
                .ok_or(PatternError::InvalidRowCount {
                    rows: usize::MAX,
                    reason: "modulus power overflows",
                })?,
        };
        check_raster_rows(rows)
    }
}

/// Reject row counts the raster cannot hold
///
/// Rasters store every cell of the square, so the cap bounds memory rather
/// than the triangle itself.
///
/// # Errors
///
/// Returns `InvalidRowCount` for zero rows or more than [`MAX_RASTER_ROWS`]
pub const fn check_raster_rows(rows: usize) -> Result<usize> {
    if rows == 0 {
        Err(PatternError::InvalidRowCount {
            rows,
            reason: "at least one row is required",
        })
    } else if rows > MAX_RASTER_ROWS {
        Err(PatternError::InvalidRowCount {
            rows,
            reason: "exceeds the raster size limit",
        })
    } else {
        Ok(rows)
    }
}

/// Attractor approximation used for each run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerKind {
    /// Random map selection, uniform over the maps
    #[default]
    ChaosGame,
    /// Every address of the given length, applied to the start point
    Addresses {
        /// Address length
        depth: u32,
    },
    /// Repeated Hutchinson passes on the raster grid
    Hutchinson {
        /// Number of passes
        depth: u32,
    },
}

impl SamplerKind {
    /// Deterministic kinds ignore the seed
    pub const fn is_deterministic(self) -> bool {
        !matches!(self, Self::ChaosGame)
    }
}

/// Files written for each run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Directory receiving images and the CSV report
    pub directory: PathBuf,
    /// Write the triangle and attractor PNGs
    pub render: bool,
    /// Write a GIF of the chaos game filling in
    pub animate: bool,
    /// Triangle rendering settings
    pub render_options: RenderOptions,
    /// Side of the attractor image and animation frames
    pub sample_image_size: u32,
}

impl OutputOptions {
    /// Report and images under `directory` with default rendering
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            render: true,
            animate: false,
            render_options: RenderOptions::default(),
            sample_image_size: DEFAULT_SAMPLE_IMAGE_SIZE,
        }
    }

    fn file_for(&self, modulus: u64, suffix: &str) -> PathBuf {
        self.directory.join(format!("m{modulus}{suffix}"))
    }

    /// Path of the CSV report
    pub fn report_path(&self) -> PathBuf {
        self.directory.join(REPORT_FILE_NAME)
    }
}

/// Everything a sweep needs
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Moduli in sweep order
    pub moduli: Vec<u64>,
    /// Rows per modulus
    pub rows: RowSpec,
    /// Residue encoding
    pub encoder: EncoderOptions,
    /// Attractor approximation
    pub sampler_kind: SamplerKind,
    /// Chaos-game settings; `iterations` and `seed` are ignored by
    /// deterministic kinds
    pub sampler: SamplerConfig,
    /// Scoring settings
    pub comparator: ComparatorConfig,
    /// Files to write, if any
    pub output: Option<OutputOptions>,
    /// Run moduli on the rayon pool
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            moduli: vec![DEFAULT_MODULUS],
            rows: RowSpec::default(),
            encoder: EncoderOptions::default(),
            sampler_kind: SamplerKind::default(),
            sampler: SamplerConfig::default(),
            comparator: ComparatorConfig::default(),
            output: None,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Check every parameter before any run starts
    ///
    /// # Errors
    ///
    /// Returns the first invalid modulus, row count or parameter found
    pub fn validate(&self) -> Result<()> {
        if self.moduli.is_empty() {
            return Err(invalid_parameter(
                "moduli",
                &"[]",
                &"at least one modulus is required",
            ));
        }
        for &modulus in &self.moduli {
            validate_modulus(modulus)?;
            self.rows.rows_for(modulus)?;
        }
        PatternComparator::new(self.comparator)?;
        match self.sampler_kind {
            SamplerKind::ChaosGame if self.sampler.iterations == 0 => Err(invalid_parameter(
                "iterations",
                &0,
                &"at least one iteration is required",
            )),
            SamplerKind::Addresses { depth: 0 } | SamplerKind::Hutchinson { depth: 0 } => Err(
                invalid_parameter("depth", &0, &"depth must be at least 1"),
            ),
            _ => Ok(()),
        }?;
        if let Some(output) = &self.output {
            output.render_options.validate()?;
            if output.sample_image_size == 0 {
                return Err(invalid_parameter(
                    "sample_image_size",
                    &0,
                    &"image must have pixels",
                ));
            }
        }
        Ok(())
    }
}

/// Generate and encode a triangle, streaming rows into the raster
///
/// # Errors
///
/// Returns validation errors for the modulus and row count, and `Cancelled`
/// if `token` fires before the last row
pub fn generate_raster(
    modulus: u64,
    rows: usize,
    encoder: EncoderOptions,
    token: Option<&CancellationToken>,
) -> Result<Raster> {
    check_raster_rows(rows)?;
    let mut generator = ModularTriangleGenerator::new(modulus, rows)?;
    if let Some(token) = token {
        generator = generator.with_cancellation(token.clone());
    }
    let raster = PatternEncoder::new(encoder).encode_rows(generator.rows(), rows, modulus);
    if token.is_some_and(CancellationToken::is_cancelled) {
        return Err(PatternError::Cancelled {
            operation: "triangle generation",
        });
    }
    Ok(raster)
}

/// Approximate the attractor of `candidate` the way `kind` asks
///
/// `resolution` is the grid side used by Hutchinson rendering.
///
/// # Errors
///
/// Propagates sampler validation errors and `Cancelled`
pub fn sample_candidate(
    candidate: &IfsCandidate,
    kind: SamplerKind,
    config: SamplerConfig,
    resolution: usize,
    token: &CancellationToken,
) -> Result<AttractorSample> {
    match kind {
        SamplerKind::ChaosGame => AttractorSampler::new(candidate, config)?
            .with_cancellation(token.clone())
            .sample(),
        SamplerKind::Addresses { depth } => {
            let candidate = candidate
                .clone()
                .with_rule(AssignmentRule::AddressIndexed { depth })?;
            AttractorSampler::new(&candidate, config)?
                .with_cancellation(token.clone())
                .sample()
        }
        SamplerKind::Hutchinson { depth } => HutchinsonRenderer::new(resolution, depth)?
            .with_cancellation(token.clone())
            .sample(candidate),
    }
}

/// Analysis, synthesis, sampling and scoring for one raster
///
/// `on_stage` is called with the index of each stage as it starts.
fn evaluate(
    config: &ExperimentConfig,
    raster: &Raster,
    token: &CancellationToken,
    on_stage: &mut dyn FnMut(usize),
) -> Result<(AttractorSample, RunReport)> {
    let started = Instant::now();
    let modulus = raster.modulus();

    on_stage(1);
    let verdict = SelfSimilarityAnalyzer::new(modulus)?.analyze(raster)?;
    debug!(
        modulus,
        rows_analyzed = verdict.rows_analyzed,
        motif = verdict.motif.non_empty_count(),
        confidence = verdict.confidence,
        "analysed block structure"
    );

    on_stage(2);
    let candidate = IfsCandidate::from_verdict(modulus, &verdict)?;

    on_stage(3);
    let sample = sample_candidate(
        &candidate,
        config.sampler_kind,
        config.sampler,
        verdict.rows_analyzed,
        token,
    )?;

    on_stage(4);
    let truth = raster.prefix(verdict.rows_analyzed);
    let comparison = PatternComparator::new(config.comparator)?.compare(&truth, &sample);

    let report = RunReport {
        modulus,
        prime: is_prime(modulus),
        rows: raster.rows(),
        rows_analyzed: verdict.rows_analyzed,
        motif_non_empty: verdict.motif.non_empty_count(),
        motif_total: verdict.motif.total_positions(),
        self_similar: verdict.self_similar,
        confidence: verdict.confidence,
        map_count: candidate.len(),
        sample_points: sample.len(),
        score: comparison.score,
        recall: comparison.recall,
        precision: comparison.precision,
        elapsed: started.elapsed(),
    };
    Ok((sample, report))
}

/// Write the images requested for one run
fn write_outputs(
    output: &OutputOptions,
    encoder: EncoderOptions,
    raster: &Raster,
    sample: &AttractorSample,
) -> Result<()> {
    let modulus = raster.modulus();
    if output.render {
        let palette = match encoder.mode {
            EncodingMode::Binary => Palette::binary(),
            EncodingMode::Continuous => Palette::ramp(raster.class_count()),
        };
        export_raster_png(
            raster,
            &palette,
            output.render_options,
            &output.file_for(modulus, TRIANGLE_SUFFIX),
        )?;
        export_sample_png(
            sample,
            output.sample_image_size,
            &output.file_for(modulus, ATTRACTOR_SUFFIX),
        )?;
    }
    if output.animate && !sample.is_empty() {
        ChaosAnimation::new(sample, DEFAULT_ANIMATION_FRAMES, output.sample_image_size)?
            .export_gif(&output.file_for(modulus, ANIMATION_SUFFIX), GIF_FRAME_DELAY_MS)?;
    }
    Ok(())
}

/// Full pipeline for one modulus without the cache
fn run_uncached(
    config: &ExperimentConfig,
    modulus: u64,
    token: &CancellationToken,
) -> Result<(Arc<Raster>, RunReport)> {
    let rows = config.rows.rows_for(modulus)?;
    let raster = Arc::new(generate_raster(modulus, rows, config.encoder, Some(token))?);
    let (sample, report) = evaluate(config, &raster, token, &mut |_| {})?;
    if let Some(output) = &config.output {
        write_outputs(output, config.encoder, &raster, &sample)?;
    }
    Ok((raster, report))
}

/// Drives a sweep and owns the state shared across its runs
pub struct ExperimentDriver {
    config: ExperimentConfig,
    cache: TriangleCache,
    cancellation: CancellationToken,
    progress: Option<ProgressManager>,
}

impl ExperimentDriver {
    /// Validate the configuration and create a driver
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: TriangleCache::new(),
            cancellation: CancellationToken::new(),
            progress: None,
        })
    }

    /// Show progress bars during [`Self::run`]
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Handle that stops the sweep from another thread
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Configuration in use
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Rasters generated so far
    pub const fn cache(&self) -> &TriangleCache {
        &self.cache
    }

    /// Run every modulus and write the CSV report if output is configured
    ///
    /// A failing modulus is recorded in the report and the sweep continues.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the sweep was cancelled, or a file error if
    /// the report cannot be written
    pub fn run(&mut self) -> Result<SweepReport> {
        let span = info_span!("sweep", moduli = self.config.moduli.len());
        let _guard = span.enter();
        info!(
            moduli = ?self.config.moduli,
            parallel = self.config.parallel,
            sampler = ?self.config.sampler_kind,
            "starting sweep"
        );

        if let Some(progress) = self.progress.as_mut() {
            progress.initialize(self.config.moduli.len(), self.config.parallel);
        }

        let outcome = if self.config.parallel {
            self.run_parallel()
        } else {
            self.run_sequential()
        };

        if let Some(progress) = &self.progress {
            progress.finish();
        }
        let report = outcome?;

        if let Some(output) = &self.config.output {
            let path = output.report_path();
            report.write_csv(&path)?;
            info!(path = %path.display(), "wrote report");
        }
        info!(
            runs = report.runs.len(),
            failures = report.failures.len(),
            "sweep finished"
        );
        Ok(report)
    }

    fn run_sequential(&mut self) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        let moduli = self.config.moduli.clone();
        for (index, modulus) in moduli.into_iter().enumerate() {
            if let Some(progress) = self.progress.as_mut() {
                progress.start_run(index, modulus);
            }
            let outcome = self.run_modulus_at(index, modulus);
            if let Some(progress) = self.progress.as_mut() {
                progress.complete_run(index);
            }
            record(&mut report, modulus, outcome)?;
        }
        Ok(report)
    }

    fn run_parallel(&mut self) -> Result<SweepReport> {
        let config = &self.config;
        let token = &self.cancellation;
        let bar = self.progress.as_ref().and_then(ProgressManager::batch_handle);

        let outcomes: Vec<(u64, Result<(Arc<Raster>, RunReport)>)> = config
            .moduli
            .par_iter()
            .map(|&modulus| {
                let outcome = run_uncached(config, modulus, token);
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
                (modulus, outcome)
            })
            .collect();

        let mut report = SweepReport::default();
        for (modulus, outcome) in outcomes {
            let outcome = match outcome {
                Ok((raster, run)) => {
                    let key = RasterKey {
                        modulus,
                        rows: raster.rows(),
                        encoder: self.config.encoder,
                    };
                    self.cache.insert(key, raster);
                    Ok(run)
                }
                Err(error) => Err(error),
            };
            record(&mut report, modulus, outcome)?;
        }
        Ok(report)
    }

    /// Run the pipeline for one modulus, reusing a cached raster if present
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage
    pub fn run_modulus(&mut self, modulus: u64) -> Result<RunReport> {
        self.run_modulus_at(0, modulus)
    }

    fn run_modulus_at(&mut self, index: usize, modulus: u64) -> Result<RunReport> {
        let span = info_span!("run", modulus);
        let _guard = span.enter();

        let rows = self.config.rows.rows_for(modulus)?;
        let key = RasterKey {
            modulus,
            rows,
            encoder: self.config.encoder,
        };
        let encoder = self.config.encoder;
        let token = self.cancellation.clone();
        let raster = self.cache.get_or_try_insert(key, || {
            generate_raster(modulus, rows, encoder, Some(&token))
        })?;

        let progress = &mut self.progress;
        let mut on_stage = |stage: usize| {
            if let Some(progress) = progress.as_mut() {
                progress.update_stage(index, stage);
            }
        };
        let (sample, report) = evaluate(&self.config, &raster, &self.cancellation, &mut on_stage)?;

        if let Some(output) = &self.config.output {
            write_outputs(output, self.config.encoder, &raster, &sample)?;
        }
        info!(
            score = report.score,
            self_similar = report.self_similar,
            maps = report.map_count,
            "run complete"
        );
        Ok(report)
    }
}

/// Fold one outcome into the report; cancellation aborts the sweep
fn record(report: &mut SweepReport, modulus: u64, outcome: Result<RunReport>) -> Result<()> {
    match outcome {
        Ok(run) => report.runs.push(run),
        Err(error @ PatternError::Cancelled { .. }) => return Err(error),
        Err(error) => {
            warn!(modulus, %error, "run failed");
            report.failures.push((modulus, error.to_string()));
        }
    }
    Ok(())
}
