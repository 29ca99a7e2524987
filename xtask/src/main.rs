use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "sparse-reorder workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ordering benchmarks sequentially and with the rayon fan-out
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Criterion baseline name and the cargo features it is built with.
const VARIANTS: &[(&str, Option<&str>)] = &[("sequential", None), ("parallel", Some("parallel"))];

const BENCH: &str = "orderings";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    for (baseline, features) in VARIANTS {
        println!("\n>>> Benchmarking {baseline}");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.env("CARGO_INCREMENTAL", "0");
        cmd.arg("bench").arg("--bench").arg(BENCH);
        if let Some(features) = features {
            cmd.arg("--features").arg(features);
        }

        // Args for the test runner (Criterion) go after --
        cmd.arg("--");
        cmd.arg("--save-baseline").arg(baseline);
        if quick {
            cmd.arg("--measurement-time").arg("0.1");
            cmd.arg("--noplot");
            cmd.arg("--sample-size").arg("10");
        }

        let status = cmd
            .status()
            .with_context(|| format!("failed to run bench for {baseline}"))?;
        if status.success() {
            println!("Finished {baseline} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: benchmark failed for {baseline}");
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let mut results: HashMap<String, HashMap<String, f64>> = HashMap::new();

    let criterion_dir = Path::new("target/criterion").join(BENCH);
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }
    collect_results(&criterion_dir, &criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("cannot create {}", report_path.display()))?;

    writeln!(file, "# Ordering Benchmark Report")?;
    writeln!(file)?;
    writeln!(file, "| Workload | sequential (elem/s) | parallel (elem/s) | speedup |")?;
    writeln!(file, "|---|---|---|---|")?;

    let mut workloads: Vec<_> = results.keys().cloned().collect();
    workloads.sort();
    for workload in workloads {
        let row = &results[&workload];
        let sequential = row.get("sequential").copied();
        let parallel = row.get("parallel").copied();
        let speedup = match (sequential, parallel) {
            (Some(s), Some(p)) if s > 0.0 => format!("**{:.2}x**", p / s),
            _ => "-".to_string(),
        };
        writeln!(
            file,
            "| {} | {} | {} | {} |",
            workload,
            format_rate(sequential),
            format_rate(parallel),
            speedup
        )?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r > 1_000_000.0 => format!("{:.2}M", r / 1_000_000.0),
        Some(r) if r > 1_000.0 => format!("{:.2}K", r / 1_000.0),
        Some(r) => format!("{r:.0}"),
        None => "N/A".to_string(),
    }
}

/// Walks `target/criterion/orderings/<ordering>/<workload>/<baseline>/estimates.json`.
fn collect_results(root: &Path, dir: &Path, results: &mut HashMap<String, HashMap<String, f64>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(root, &path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }
        let Some(baseline_dir) = path.parent() else {
            continue;
        };
        let Some(baseline) = baseline_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !VARIANTS.iter().any(|(name, _)| *name == baseline) {
            continue;
        }
        let Some(workload_dir) = baseline_dir.parent() else {
            continue;
        };
        let Ok(workload) = workload_dir.strip_prefix(root) else {
            continue;
        };
        let workload = workload.to_string_lossy().replace('\\', "/");

        let elements = fs::read_to_string(workload_dir.join("benchmark.json"))
            .ok()
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
            .and_then(|json| json.get("throughput")?.get("Elements")?.as_f64())
            .unwrap_or(1.0);

        let mean_ns = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
            .and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64())
            .unwrap_or(0.0);

        if mean_ns > 0.0 {
            results
                .entry(workload)
                .or_default()
                .insert(baseline.to_string(), elements * 1e9 / mean_ns);
        }
    }
}
