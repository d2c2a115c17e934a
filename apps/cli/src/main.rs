// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! meshvol - STL volume measurement from the command line
//!
//! - `volume`: print the enclosed volume of one or more STL files
//! - `info`: print encoding, counts, bounds and volume of one STL file
//!
//! Reports go to stdout, logs and failures to stderr. The exit status is
//! non-zero if any file could not be processed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meshvol_core::StlKind;
use meshvol_geometry::{compute_volume_with, signed_volume_with, Bounds, Mesh, VolumeOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "meshvol", version)]
#[command(about = "Measure the volume enclosed by STL meshes", long_about = None)]
struct Cli {
    /// Worker threads for parallel stages (overrides MESHVOL_WORKER_THREADS)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Triangle count above which volume is summed in parallel
    /// (overrides MESHVOL_PARALLEL_THRESHOLD)
    #[arg(long, global = true)]
    parallel_threshold: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the enclosed volume of each STL file
    Volume(VolumeArgs),
    /// Describe a single STL file
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct VolumeArgs {
    /// STL files (ASCII or binary)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print the signed sum instead of its absolute value
    #[arg(long)]
    signed: bool,

    /// Emit a JSON array instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// STL file (ASCII or binary)
    file: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct VolumeReport {
    path: String,
    triangles: usize,
    volume: f64,
    signed: bool,
}

#[derive(Debug, Serialize)]
struct BoundsReport {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

impl From<Bounds> for BoundsReport {
    fn from(bounds: Bounds) -> Self {
        Self {
            min: [bounds.min.x, bounds.min.y, bounds.min.z],
            max: [bounds.max.x, bounds.max.y, bounds.max.z],
            dimensions: [bounds.width(), bounds.height(), bounds.depth()],
        }
    }
}

#[derive(Debug, Serialize)]
struct InfoReport {
    path: String,
    encoding: &'static str,
    triangles: usize,
    unique_vertices: usize,
    bounds: Option<BoundsReport>,
    volume: f64,
    signed_volume: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(threads) = cli.threads {
        config.worker_threads = threads.max(1);
    }
    if let Some(threshold) = cli.parallel_threshold {
        config.parallel_threshold = threshold;
    }

    // Initialize logging (stderr keeps stdout a clean report)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        worker_threads = config.worker_threads,
        parallel_threshold = config.parallel_threshold,
        "Starting meshvol"
    );

    // Initialize rayon thread pool
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
    {
        tracing::warn!(error = %e, "Could not size rayon thread pool, using default");
    }

    let options = VolumeOptions {
        parallel_threshold: config.parallel_threshold,
    };

    let ok = match &cli.command {
        Commands::Volume(args) => run_volume(args, &options),
        Commands::Info(args) => run_info(args, &options),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load(path: &Path) -> Result<Mesh> {
    Mesh::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn load_classified(path: &Path) -> Result<(StlKind, Mesh)> {
    Mesh::load_classified(path).with_context(|| format!("failed to load {}", path.display()))
}

/// Failure family for the stderr report
fn error_kind(err: &anyhow::Error) -> String {
    match err.downcast_ref::<meshvol_geometry::Error>() {
        Some(meshvol_geometry::Error::StlError(e)) => e.kind().to_string(),
        Some(_) => "mesh".into(),
        None => "other".into(),
    }
}

fn report_failure(err: &anyhow::Error) {
    eprintln!("error [{}]: {:#}", error_kind(err), err);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{}", text);
    Ok(())
}

fn run_volume(args: &VolumeArgs, options: &VolumeOptions) -> bool {
    let mut ok = true;
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let mesh = match load(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                report_failure(&e);
                ok = false;
                continue;
            }
        };

        let volume = if args.signed {
            signed_volume_with(&mesh, options)
        } else {
            compute_volume_with(&mesh, options)
        };

        let report = VolumeReport {
            path: path.display().to_string(),
            triangles: mesh.triangle_count(),
            volume,
            signed: args.signed,
        };

        if args.json {
            reports.push(report);
        } else {
            println!("{}\t{}", report.path, report.volume);
        }
    }

    if args.json {
        if let Err(e) = print_json(&reports) {
            report_failure(&e);
            ok = false;
        }
    }

    ok
}

fn describe(path: &Path, options: &VolumeOptions) -> Result<InfoReport> {
    let (kind, mesh) = load_classified(path)?;
    let signed_volume = signed_volume_with(&mesh, options);

    Ok(InfoReport {
        path: path.display().to_string(),
        encoding: match kind {
            StlKind::Ascii => "ascii",
            StlKind::Binary { .. } => "binary",
        },
        triangles: mesh.triangle_count(),
        unique_vertices: mesh.vertex_count(),
        bounds: mesh.bounds().map(BoundsReport::from),
        volume: signed_volume.abs(),
        signed_volume,
    })
}

fn run_info(args: &InfoArgs, options: &VolumeOptions) -> bool {
    let report = match describe(&args.file, options) {
        Ok(report) => report,
        Err(e) => {
            report_failure(&e);
            return false;
        }
    };

    if args.json {
        return match print_json(&report) {
            Ok(()) => true,
            Err(e) => {
                report_failure(&e);
                false
            }
        };
    }

    println!("path:            {}", report.path);
    println!("encoding:        {}", report.encoding);
    println!("triangles:       {}", report.triangles);
    println!("unique vertices: {}", report.unique_vertices);
    if let Some(bounds) = &report.bounds {
        println!(
            "bounds:          [{}, {}, {}] .. [{}, {}, {}]",
            bounds.min[0], bounds.min[1], bounds.min[2], bounds.max[0], bounds.max[1], bounds.max[2]
        );
        println!(
            "dimensions:      {} x {} x {}",
            bounds.dimensions[0], bounds.dimensions[1], bounds.dimensions[2]
        );
    }
    println!("volume:          {}", report.volume);
    println!("signed volume:   {}", report.signed_volume);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshvol_core::{write_stl, StlFormat};

    #[test]
    fn test_cli_parses_volume_flags() {
        let cli = Cli::try_parse_from(["meshvol", "volume", "a.stl", "b.stl", "--signed", "--threads", "2"])
            .unwrap();
        assert_eq!(cli.threads, Some(2));
        match cli.command {
            Commands::Volume(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.signed);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_volume_requires_a_file() {
        assert!(Cli::try_parse_from(["meshvol", "volume"]).is_err());
    }

    #[test]
    fn test_error_kind_sees_through_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.stl")).unwrap_err();
        assert_eq!(error_kind(&err), "io");
    }

    #[test]
    fn test_describe_reports_format_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.stl");
        std::fs::write(&path, vec![0xABu8; 300]).unwrap();

        let err = describe(&path, &VolumeOptions::default()).unwrap_err();
        assert_eq!(error_kind(&err), "format");
    }

    #[test]
    fn test_describe_tetrahedron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tet.stl");
        let (o, x, y, z) = ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        let facets = vec![[o, y, x], [o, x, z], [o, z, y], [x, y, z]];
        let file = std::fs::File::create(&path).unwrap();
        write_stl(file, StlFormat::Ascii, "tet", facets).unwrap();

        let report = describe(&path, &VolumeOptions::default()).unwrap();
        assert_eq!(report.encoding, "ascii");
        assert_eq!(report.triangles, 4);
        assert_eq!(report.unique_vertices, 4);
        assert!((report.volume - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(report.bounds.unwrap().dimensions, [1.0, 1.0, 1.0]);
    }
}
