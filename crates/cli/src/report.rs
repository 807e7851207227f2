//! Human-readable per-point reports.

use billiards::apex::{convergents_of_f64, convergents_of_ratio, Apex};
use billiards::search::{CommitEvent, CommitKind, Progress, ProgressSink};
use billiards::turn_path::{BaseValues, TurnPath};

fn pair(v: BaseValues<f64>, precision: usize) -> String {
    format!("({:.p$}, {:.p$})", v.b0, v.b1, p = precision)
}

fn chain(convergents: &[(i64, i64)]) -> String {
    convergents
        .iter()
        .map(|(p, q)| format!("{p}/{q}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Multi-line description of one point: coordinates in every system we use,
/// the angle ratio as continued-fraction convergents, and the known cycle.
pub fn point_report(
    index: usize,
    apex: &Apex,
    cycle: Option<&TurnPath>,
    precision: usize,
    caption: &str,
) -> String {
    let angles = apex.angles_over_half_pi();
    let mut lines = vec![
        format!("[{index}] {caption}"),
        format!(
            "  cartesian coords ({:.p$}, {:.p$})",
            apex.x,
            apex.y,
            p = precision
        ),
        format!("  angles over pi/2 {}", pair(angles, precision)),
        format!("  inverse angle {}", pair(apex.polar(), precision)),
        format!(
            "  angle ratio {}",
            chain(&convergents_of_f64(angles.b0 / angles.b1, 8))
        ),
        format!("  cotangent {}", pair(apex.biradial(), precision)),
    ];
    if let Some(cycle) = cycle {
        // Closed words turn twice around each vertex, so halve the weight.
        let w = cycle.weight().map(|v| v / 2);
        lines.push(format!("  cycle {cycle}"));
        lines.push(format!(
            "    weight ratio: {}",
            chain(&convergents_of_ratio(w.b1, w.b0))
        ));
    }
    lines.into_iter().map(|l| l + "\n").collect()
}

/// Running counters shown between reports.
pub fn counters_line(progress: &Progress) -> String {
    format!(
        "found {}, updated {}, failed {}. still active: {:?}",
        progress.found, progress.updated, progress.failed, progress.active
    )
}

/// Prints a report for every commit of a run over `points`.
pub struct Console<'a> {
    pub points: &'a [Apex],
    pub precision: usize,
    /// Only report points whose registry entry changed.
    pub changes_only: bool,
}

impl ProgressSink for Console<'_> {
    fn on_commit(&self, event: &CommitEvent, progress: &Progress) {
        let Some(apex) = self.points.get(event.index) else {
            return;
        };
        let (caption, cycle) = match &event.kind {
            CommitKind::Found(new) => ("cycle found".to_string(), Some(new)),
            CommitKind::Updated { old, new } => (
                format!("found smaller cycle [{} -> {}]", old.len(), new.len()),
                Some(new),
            ),
            CommitKind::Unchanged => ("no change".to_string(), None),
            CommitKind::Failed => ("no cycle found".to_string(), None),
            CommitKind::Cancelled => ("cancelled".to_string(), None),
            CommitKind::Skipped => ("skipped (cycle known)".to_string(), None),
        };
        if cycle.is_some() {
            eprint!("\r\x1b[2K");
            print!(
                "{}",
                point_report(event.index, apex, cycle, self.precision, &caption)
            );
        } else if !self.changes_only {
            eprint!("\r\x1b[2K");
            println!("[{}] {caption}", event.index);
        }
        eprint!("{} ...", counters_line(progress));
    }
}
