//! JSON line-delimited logging of loss steps.
//!
//! Pure peripheral for the surrounding training loop; the loss functions
//! themselves never log.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::loss::LossOutput;
use crate::moments::{MomentCategory, MomentStatistics};

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

#[derive(Debug, Serialize)]
pub struct LossLogEntry {
    pub step: usize,
    pub loss: f32,
    pub max_gap: BTreeMap<MomentCategory, f32>,
    pub mean_gap_pct: BTreeMap<MomentCategory, f32>,
    pub max_gap_pct: BTreeMap<MomentCategory, f32>,
    pub timestamp_ms: u128,
}

/// Appends one loss step to `<log_dir>/loss.jsonl`, creating the directory
/// on first use.
pub fn log_loss_step<P: AsRef<Path>>(
    log_dir: P,
    step: usize,
    output: &LossOutput,
) -> io::Result<()> {
    fs::create_dir_all(&log_dir)?;
    let entry = LossLogEntry {
        step,
        loss: output.loss,
        max_gap: output.diagnostics.max_gap.clone(),
        mean_gap_pct: output.diagnostics.mean_gap_pct.clone(),
        max_gap_pct: output.diagnostics.max_gap_pct.clone(),
        timestamp_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    };
    append_json_line(log_dir.as_ref().join("loss.jsonl"), &entry)
}

#[derive(Debug, Serialize)]
pub struct MomentLogEntry {
    pub step: usize,
    pub mean: f32,
    pub mean_abs: f32,
    pub variance: f32,
    pub n_batch: usize,
    pub n_coeff: usize,
    pub timestamp_ms: u128,
}

/// Appends summary statistics of a moment collection to
/// `<log_dir>/moments.jsonl`.
pub fn log_moment_statistics<P: AsRef<Path>>(
    log_dir: P,
    step: usize,
    stats: &MomentStatistics,
) -> io::Result<()> {
    fs::create_dir_all(&log_dir)?;
    let entry = MomentLogEntry {
        step,
        mean: stats.mean,
        mean_abs: stats.mean_abs,
        variance: stats.variance,
        n_batch: stats.n_batch,
        n_coeff: stats.n_coeff,
        timestamp_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    };
    append_json_line(log_dir.as_ref().join("moments.jsonl"), &entry)
}
