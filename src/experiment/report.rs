//! Results of experiment runs

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::io::error::{Result, file_system_error};

/// Outcome of the full pipeline for one modulus
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Modulus
    pub modulus: u64,
    /// Whether the modulus is prime
    pub prime: bool,
    /// Rows generated
    pub rows: usize,
    /// Rows in the analysed power-of-modulus prefix
    pub rows_analyzed: usize,
    /// Non-empty blocks of the base motif
    pub motif_non_empty: usize,
    /// Block positions of the base motif, `m(m+1)/2`
    pub motif_total: usize,
    /// Whether every level reproduced the motif
    pub self_similar: bool,
    /// Analyzer confidence in `[0, 1]`
    pub confidence: f64,
    /// Contraction maps in the synthesised candidate
    pub map_count: usize,
    /// Points sampled from the attractor
    pub sample_points: usize,
    /// Comparison score in `[0, 1]`
    pub score: f64,
    /// Fraction of raster cells reproduced
    pub recall: f64,
    /// Fraction of sampled cells supported by the raster
    pub precision: f64,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Runs of one sweep, including moduli that failed
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Successful runs in sweep order
    pub runs: Vec<RunReport>,
    /// `(modulus, error message)` for runs that failed
    pub failures: Vec<(u64, String)>,
}

const CSV_HEADER: &str = "modulus,prime,rows,rows_analyzed,motif_non_empty,motif_total,self_similar,confidence,maps,sample_points,score,recall,precision,elapsed_ms";

impl RunReport {
    fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.6},{},{},{:.6},{:.6},{:.6},{}",
            self.modulus,
            self.prime,
            self.rows,
            self.rows_analyzed,
            self.motif_non_empty,
            self.motif_total,
            self.self_similar,
            self.confidence,
            self.map_count,
            self.sample_points,
            self.score,
            self.recall,
            self.precision,
            self.elapsed.as_millis()
        )
    }
}

impl SweepReport {
    /// Whether every requested modulus produced a run
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Report lines as CSV, header first
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for run in &self.runs {
            out.push_str(&run.csv_line());
            out.push('\n');
        }
        out
    }

    /// Write the CSV form, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the directory or file cannot be written
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| file_system_error(parent, "create directory", e))?;
        }
        let mut file =
            std::fs::File::create(path).map_err(|e| file_system_error(path, "create file", e))?;
        file.write_all(self.to_csv().as_bytes())
            .map_err(|e| file_system_error(path, "write report", e))
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>7} {:>5} {:>6} {:>9} {:>7} {:>10} {:>5} {:>7} {:>9}",
            "modulus", "prime", "rows", "motif", "similar", "confidence", "maps", "score", "time"
        )?;
        for run in &self.runs {
            writeln!(
                f,
                "{:>7} {:>5} {:>6} {:>9} {:>7} {:>10.4} {:>5} {:>7.4} {:>8}ms",
                run.modulus,
                if run.prime { "yes" } else { "no" },
                run.rows_analyzed,
                format!("{}/{}", run.motif_non_empty, run.motif_total),
                if run.self_similar { "yes" } else { "no" },
                run.confidence,
                run.map_count,
                run.score,
                run.elapsed.as_millis()
            )?;
        }
        for (modulus, message) in &self.failures {
            writeln!(f, "{modulus:>7} failed: {message}")?;
        }
        Ok(())
    }
}
