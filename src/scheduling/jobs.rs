//! Job-list CSV input and generation.

use anyhow::{bail, Context, Result};
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads per-job durations from a two-column CSV (`Job ID,Duration`).
///
/// The first record is a header and is skipped; every following
/// non-empty record contributes the integer in its second field.
pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("cannot open job list {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut durations = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("cannot read job list {}", path.display()))?;
        if index == 0 {
            // header record
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let duration = match (fields.next(), fields.next()) {
            (Some(_), Some(value)) => value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("line {}: invalid duration {value:?}", index + 1))?,
            _ => bail!("line {}: expected two comma-separated fields", index + 1),
        };
        durations.push(duration);
    }
    Ok(durations)
}

/// Generates `count` durations drawn uniformly from `min..=max`.
/// `min` must not exceed `max`.
pub fn generate_jobs<R: Rng>(count: usize, min: u32, max: u32, rng: &mut R) -> Vec<u32> {
    (0..count).map(|_| rng.random_range(min..=max)).collect()
}

/// Writes a job list in the standard format: a `Job ID,Duration` header
/// followed by `Job_<i>,<duration>` records with 1-based ids.
pub fn write_jobs(path: impl AsRef<Path>, durations: &[u32]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("cannot create job list {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Job ID,Duration")?;
    for (index, duration) in durations.iter().enumerate() {
        writeln!(writer, "Job_{},{}", index + 1, duration)?;
    }
    writer.flush()?;
    Ok(())
}
