//! `pointset` subcommands.

use anyhow::{bail, Context, Result};
use billiards::apex::{Apex, ApexContext, Metric};
use billiards::point_set::PointSet;
use billiards::search::{
    ClosureOracle, ExploreCfg, FeasibilityOracle, Orchestrator, PropagateCfg, RandomWalkCfg,
    RandomWalkSearch, Registry,
};
use billiards::store::DataManager;
use billiards::summary::summarize;
use billiards::Vec2;
use serde_json::json;
use std::path::Path;

use crate::export::{point_frame, write_frame};
use crate::interrupt::capture_interrupt;
use crate::provenance::{write_sidecar, Payload};
use crate::report::{point_report, Console};
use crate::{DistanceArg, MetricArg, PointsetCmd, SearchArgs};

pub fn run(data_dir: &Path, cmd: PointsetCmd) -> Result<()> {
    let dm = DataManager::new(data_dir)
        .with_context(|| format!("opening data dir {}", data_dir.display()))?;
    match cmd {
        PointsetCmd::Create {
            name,
            count,
            grid_density,
            seed,
        } => create(&dm, &name, count, grid_density, seed),
        PointsetCmd::List => list(&dm),
        PointsetCmd::Print { name } => print(&dm, &name),
        PointsetCmd::Info { name, index } => info(&dm, &name, index),
        PointsetCmd::Delete { name } => {
            dm.delete_point_set(&name)
                .with_context(|| format!("deleting point set '{name}'"))?;
            tracing::info!(name, "deleted point set");
            Ok(())
        }
        PointsetCmd::Search(args) => search(&dm, &args),
        PointsetCmd::CopyCycles {
            from,
            to,
            neighbors,
            distance,
            threads,
        } => copy_cycles(&dm, &from, &to, neighbors, distance, threads),
        PointsetCmd::Validate { name, index } => validate(&dm, &name, index),
        PointsetCmd::Probe {
            name,
            coords,
            metric,
            count,
        } => probe(&dm, &name, coords, metric, count),
        PointsetCmd::Export { name, out } => export(&dm, &name, &out),
    }
}

fn load(dm: &DataManager, name: &str) -> Result<(PointSet, Registry)> {
    let set = dm
        .load_point_set(name)
        .with_context(|| format!("loading point set '{name}'"))?;
    let cycles = dm
        .load_known_cycles(name)
        .with_context(|| format!("loading known cycles of '{name}'"))?;
    Ok((set, cycles))
}

fn create(
    dm: &DataManager,
    name: &str,
    count: usize,
    grid_density: u32,
    seed: Option<u64>,
) -> Result<()> {
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    let set = PointSet::random(grid_density, count, seed);
    tracing::info!(name, count, grid_density, seed, "generated point set");
    dm.save_point_set(&set, name)
        .with_context(|| format!("saving point set '{name}'"))
}

fn list(dm: &DataManager) -> Result<()> {
    let sets = dm.list_point_sets().context("listing point sets")?;
    let mut names: Vec<_> = sets.keys().collect();
    names.sort_by_key(|n| n.to_lowercase());
    for name in names {
        let meta = &sets[name];
        let mut line = name.clone();
        if let Some(count) = meta.count {
            line.push_str(&format!(" ({count})"));
        }
        if let Some(created) = meta.created {
            line.push_str(&format!(" {}", created.format("%Y-%m-%d %H:%M UTC")));
        }
        println!("{line}");
    }
    Ok(())
}

fn print(dm: &DataManager, name: &str) -> Result<()> {
    let set = dm
        .load_point_set(name)
        .with_context(|| format!("loading point set '{name}'"))?;
    for p in &set.elements {
        println!("{},{}", p.x, p.y);
    }
    Ok(())
}

fn point(set: &PointSet, name: &str, index: usize) -> Result<Apex> {
    match set.get(index) {
        Some(apex) => Ok(*apex),
        None => bail!("{name} has no element at index {index} ({} points)", set.len()),
    }
}

fn info(dm: &DataManager, name: &str, index: Option<usize>) -> Result<()> {
    let (set, cycles) = load(dm, name)?;
    match index {
        Some(i) => {
            let apex = point(&set, name, i)?;
            print!("{}", point_report(i, &apex, cycles.get(&i), 8, ""));
        }
        None => {
            println!("pointset: {name}");
            for line in summarize(set.len(), &cycles).to_string().lines() {
                println!("  {line}");
            }
        }
    }
    Ok(())
}

fn search(dm: &DataManager, args: &SearchArgs) -> Result<()> {
    let cancel = capture_interrupt()?;
    let (set, cycles) = load(dm, &args.name)?;
    let oracle = RandomWalkSearch::new(
        RandomWalkCfg {
            max_degree: args.max_degree,
            seed: args.seed,
        },
        ClosureOracle::default(),
    )?;
    let console = Console {
        points: &set.elements,
        precision: 4,
        changes_only: false,
    };
    let report = Orchestrator::new(cancel)
        .with_parallelism(args.threads)
        .with_progress(&console)
        .explore(
            ExploreCfg {
                options: args.options(),
                target: args.index,
            },
            &set.elements,
            cycles,
            &oracle,
        )?;
    let p = &report.progress;
    eprint!("\r\x1b[2K");
    println!(
        "found {}, updated {}, failed {}.",
        p.found, p.updated, p.failed
    );
    dm.save_known_cycles(&report.registry, &args.name)
        .with_context(|| format!("saving known cycles of '{}'", args.name))
}

fn copy_cycles(
    dm: &DataManager,
    from: &str,
    to: &str,
    neighbors: usize,
    distance: DistanceArg,
    threads: usize,
) -> Result<()> {
    let cancel = capture_interrupt()?;
    let (sources, source_cycles) = load(dm, from)?;
    let (targets, target_cycles) = load(dm, to)?;
    let console = Console {
        points: &targets.elements,
        precision: 8,
        changes_only: true,
    };
    let report = Orchestrator::new(cancel)
        .with_parallelism(threads)
        .with_progress(&console)
        .propagate(
            PropagateCfg { neighbors },
            &sources.elements,
            &source_cycles,
            &targets.elements,
            target_cycles,
            distance.function(),
            &ClosureOracle::default(),
        )?;
    let p = &report.progress;
    eprint!("\r\x1b[2K");
    if p.changed() {
        println!(
            "{} found, {} updated, {} unchanged",
            p.found, p.updated, p.unchanged
        );
        println!("saving...");
        dm.save_known_cycles(&report.registry, to)
            .with_context(|| format!("saving known cycles of '{to}'"))?;
    }
    Ok(())
}

fn validate(dm: &DataManager, name: &str, index: usize) -> Result<()> {
    let (set, cycles) = load(dm, name)?;
    let apex = point(&set, name, index)?;
    let Some(path) = cycles.get(&index) else {
        bail!("{name}[{index}] has no known cycle");
    };
    let ok = ClosureOracle::default().is_feasible(path, &ApexContext::new(apex));
    println!("{}", if ok { "Passed!" } else { "Failed!" });
    Ok(())
}

fn probe(
    dm: &DataManager,
    name: &str,
    coords: (f64, f64),
    metric: MetricArg,
    count: usize,
) -> Result<()> {
    let (set, cycles) = load(dm, name)?;
    let metric = Metric::from(metric);
    let target = Vec2::new(coords.0, coords.1);
    let mut ranked: Vec<(f64, usize)> = set
        .elements
        .iter()
        .enumerate()
        .map(|(i, a)| (metric.distance(a, target), i))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    for &(d, i) in ranked.iter().take(count) {
        let caption = format!("(distance {d:.6})");
        print!(
            "{}",
            point_report(i, &set.elements[i], cycles.get(&i), 6, &caption)
        );
    }
    Ok(())
}

fn export(dm: &DataManager, name: &str, out: &Path) -> Result<()> {
    let (set, cycles) = load(dm, name)?;
    let mut df = point_frame(&set, &cycles).context("building export frame")?;
    let format = write_frame(&mut df, out)?;
    let dir = dm.point_set_dir(name)?;
    let payload = Payload::new(json!({
        "pointset": name,
        "points": set.len(),
        "known_cycles": cycles.len(),
        "format": format!("{format:?}").to_lowercase(),
    }))
    .with_input(dir.join("points.json"))
    .with_input(dir.join("cycles.json"));
    let sidecar = write_sidecar(out, payload)?;
    tracing::info!(sidecar = %sidecar.display(), "wrote provenance");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use billiards::turn_path::TurnPath;
    use tempfile::tempdir;

    fn create_cmd(name: &str, count: usize) -> PointsetCmd {
        PointsetCmd::Create {
            name: name.into(),
            count,
            grid_density: 10,
            seed: Some(5),
        }
    }

    #[test]
    fn create_is_reproducible_with_seed() {
        let dir = tempdir().unwrap();
        run(dir.path(), create_cmd("a", 12)).unwrap();
        run(dir.path(), create_cmd("b", 12)).unwrap();
        let dm = DataManager::new(dir.path()).unwrap();
        let (a, b) = (dm.load_point_set("a").unwrap(), dm.load_point_set("b").unwrap());
        assert_eq!(a.elements, b.elements);
        assert_eq!(a.metadata.count, Some(12));
        run(dir.path(), PointsetCmd::List).unwrap();
    }

    #[test]
    fn export_writes_artifact_and_sidecar() {
        let dir = tempdir().unwrap();
        run(dir.path(), create_cmd("grid", 8)).unwrap();
        let dm = DataManager::new(dir.path()).unwrap();
        let mut cycles = Registry::new();
        cycles.insert(2, "B0:1 B1:1 B0:-1 B1:-1".parse().unwrap());
        dm.save_known_cycles(&cycles, "grid").unwrap();

        let out = dir.path().join("out/grid.csv");
        run(
            dir.path(),
            PointsetCmd::Export {
                name: "grid".into(),
                out: out.clone(),
            },
        )
        .unwrap();
        assert!(out.exists());
        let sidecar = dir.path().join("out/grid.provenance.json");
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(doc["params"]["known_cycles"], 1);
        assert_eq!(doc["params"]["format"], "csv");
    }

    #[test]
    fn lookups_fail_cleanly() {
        let dir = tempdir().unwrap();
        run(dir.path(), create_cmd("grid", 3)).unwrap();
        let missing = run(dir.path(), PointsetCmd::Print { name: "nope".into() });
        assert!(missing.is_err());
        let oob = run(
            dir.path(),
            PointsetCmd::Validate {
                name: "grid".into(),
                index: 3,
            },
        );
        assert!(format!("{:#}", oob.unwrap_err()).contains("no element at index 3"));
        let unknown = run(
            dir.path(),
            PointsetCmd::Validate {
                name: "grid".into(),
                index: 0,
            },
        );
        assert!(format!("{:#}", unknown.unwrap_err()).contains("no known cycle"));
        run(
            dir.path(),
            PointsetCmd::Probe {
                name: "grid".into(),
                coords: (2.0, 2.0),
                metric: MetricArg::Polar,
                count: 5,
            },
        )
        .unwrap();
    }

    #[test]
    fn copy_without_source_cycles_does_not_save() {
        let dir = tempdir().unwrap();
        run(dir.path(), create_cmd("src", 4)).unwrap();
        run(dir.path(), create_cmd("dst", 4)).unwrap();
        let dm = DataManager::new(dir.path()).unwrap();
        copy_cycles(&dm, "src", "dst", 2, DistanceArg::Polar, 1).unwrap();
        assert!(!dir.path().join("pointset/dst/cycles.json").exists());
    }

    #[test]
    fn copy_by_biradial_distance_takes_nearest_cycle() {
        let dir = tempdir().unwrap();
        let dm = DataManager::new(dir.path()).unwrap();
        // Cotangents (1.02, 1.02) and (1, 2.33) against the target's (1, 1).
        let src = PointSet::new(vec![Apex::new(0.3, 0.3), Apex::new(0.5, 0.49)]);
        let dst = PointSet::new(vec![Apex::new(0.5, 0.5)]);
        dm.save_point_set(&src, "src").unwrap();
        dm.save_point_set(&dst, "dst").unwrap();
        // Both close at the target, where B0:4 is a full turn.
        let far: TurnPath = "B0:4 B1:2 B0:-4 B1:-2".parse().unwrap();
        let near: TurnPath = "B0:4 B1:1 B0:-4 B1:-1".parse().unwrap();
        let mut cycles = Registry::new();
        cycles.insert(0, far);
        cycles.insert(1, near.clone());
        dm.save_known_cycles(&cycles, "src").unwrap();

        copy_cycles(&dm, "src", "dst", 1, DistanceArg::Biradial, 1).unwrap();
        let copied = dm.load_known_cycles("dst").unwrap();
        assert_eq!(copied.get(&0), Some(&near));
    }

    #[test]
    fn delete_removes_the_set() {
        let dir = tempdir().unwrap();
        run(dir.path(), create_cmd("gone", 2)).unwrap();
        run(dir.path(), PointsetCmd::Delete { name: "gone".into() }).unwrap();
        assert!(run(dir.path(), PointsetCmd::Delete { name: "gone".into() }).is_err());
    }
}
