//! Tabular export of a point set and its known cycles through polars.

use anyhow::{bail, Context, Result};
use billiards::point_set::PointSet;
use billiards::search::Registry;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("csv") => Ok(Format::Csv),
            Some(e) if e.eq_ignore_ascii_case("parquet") => Ok(Format::Parquet),
            _ => bail!(
                "cannot infer export format from {} (use .csv or .parquet)",
                path.display()
            ),
        }
    }
}

/// One row per point: coordinates, derived angles, and the known cycle if any.
pub fn point_frame(set: &PointSet, cycles: &Registry) -> PolarsResult<DataFrame> {
    let n = set.len();
    let mut index = Vec::with_capacity(n);
    let (mut x, mut y) = (Vec::with_capacity(n), Vec::with_capacity(n));
    let (mut a0, mut a1) = (Vec::with_capacity(n), Vec::with_capacity(n));
    let (mut p0, mut p1) = (Vec::with_capacity(n), Vec::with_capacity(n));
    let mut cycle = Vec::with_capacity(n);
    let mut length = Vec::with_capacity(n);
    let mut weight = Vec::with_capacity(n);
    let mut segments = Vec::with_capacity(n);
    for (i, apex) in set.elements.iter().enumerate() {
        let angles = apex.angles_over_half_pi();
        let polar = apex.polar();
        let known = cycles.get(&i);
        index.push(i as u64);
        x.push(apex.x);
        y.push(apex.y);
        a0.push(angles.b0);
        a1.push(angles.b1);
        p0.push(polar.b0);
        p1.push(polar.b1);
        cycle.push(known.map(|c| c.to_string()));
        length.push(known.map(|c| c.len() as u64));
        weight.push(known.map(|c| c.total_weight()));
        segments.push(known.map(|c| c.monoidal_component_count() as u64));
    }
    df!(
        "index" => index,
        "x" => x,
        "y" => y,
        "angle_b0" => a0,
        "angle_b1" => a1,
        "polar_b0" => p0,
        "polar_b1" => p1,
        "cycle" => cycle,
        "length" => length,
        "weight" => weight,
        "segments" => segments
    )
}

/// Writes the frame to `out`, choosing the format from its extension.
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<Format> {
    let format = Format::from_path(out)?;
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match format {
        Format::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        Format::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
    }
    tracing::info!(
        rows = df.height(),
        cols = df.width(),
        out = %out.display(),
        ?format,
        "exported"
    );
    Ok(format)
}
