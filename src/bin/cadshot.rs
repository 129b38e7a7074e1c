// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Cadshot CLI

use anyhow::Result;
use cadshot::{io, Assembly, Part, Shape, SnapshotOptions, Tolerances};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::Path;

#[derive(Parser)]
#[command(name = "cadshot")]
#[command(about = "Cadshot - offscreen PNG snapshots of CAD assemblies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input assembly JSON or STL file
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output PNG file
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an assembly to a PNG snapshot
    Snapshot(SnapshotArgs),

    /// Print assembly structure and bounds
    Info {
        /// Input assembly JSON or STL file
        input: String,
    },

    /// Show version information
    Version,
}

/// Flags mirroring [`SnapshotOptions`] field by field
#[derive(Args)]
struct SnapshotArgs {
    /// Input assembly JSON or STL file
    input: String,

    /// Output PNG file
    #[arg(short, long)]
    output: String,

    /// Image width in pixels (default: 800)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (default: 600)
    #[arg(long)]
    height: Option<u32>,

    /// Camera position as X,Y,Z (default: derived from scene bounds)
    #[arg(long, value_parser = parse_triple)]
    camera: Option<[f64; 3]>,

    /// Camera up direction as X,Y,Z (default: 0,0,1)
    #[arg(long, value_parser = parse_triple)]
    up: Option<[f64; 3]>,

    /// Focal point as X,Y,Z (default: 0,0,0)
    #[arg(long, value_parser = parse_triple)]
    focal: Option<[f64; 3]>,

    /// Use an orthographic projection
    #[arg(long)]
    parallel: bool,

    /// Background color as R,G,B with channels in [0,1] (default: 0.8,0.8,0.8)
    #[arg(long, value_parser = parse_triple)]
    background: Option<[f64; 3]>,

    /// Near,far clipping planes (default: fitted to the scene)
    #[arg(long, value_parser = parse_pair)]
    clip: Option<[f64; 2]>,
}

impl SnapshotArgs {
    /// Build export options, deferring every unset flag to
    /// [`SnapshotOptions::default`]
    fn to_options(&self) -> SnapshotOptions {
        let defaults = SnapshotOptions::default();
        SnapshotOptions {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            camera_position: self.camera,
            view_up_direction: self.up.unwrap_or(defaults.view_up_direction),
            focal_point: self.focal.unwrap_or(defaults.focal_point),
            parallel_projection: self.parallel,
            background_color: self.background.unwrap_or(defaults.background_color),
            clipping_range: self.clip,
        }
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Snapshot(args)) => {
            snapshot_command(&args.input, &args.output, &args.to_options(), cli.verbose)?;
        }
        Some(Commands::Info { input }) => {
            info_command(input)?;
        }
        Some(Commands::Version) => {
            println!("Cadshot v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            // Default behavior: snapshot input to output
            if let (Some(input), Some(output)) = (&cli.input, &cli.output) {
                snapshot_command(input, output, &SnapshotOptions::default(), cli.verbose)?;
            } else {
                eprintln!("Error: Input and output files required");
                eprintln!("Usage: cadshot <INPUT> --output <OUTPUT>");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Parse "X,Y,Z" into three floats
fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected X,Y,Z but got '{}'", s));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid component '{}': {}", part, e))?;
    }
    Ok(values)
}

/// Parse "NEAR,FAR" into two floats
fn parse_pair(s: &str) -> Result<[f64; 2], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected NEAR,FAR but got '{}'", s));
    }
    let mut values = [0.0; 2];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid component '{}': {}", part, e))?;
    }
    Ok(values)
}

/// Wrap a bare STL file in a single-part assembly; anything else is
/// treated as an assembly document
fn load_input(input: &str) -> Result<Assembly> {
    let path = Path::new(input);
    let is_stl = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("stl"))
        .unwrap_or(false);

    if is_stl {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh")
            .to_string();
        let mut assembly = Assembly::new(name.clone());
        assembly.add_part(Part::new(
            name,
            Shape::Stl {
                path: path.to_path_buf(),
            },
        ));
        Ok(assembly)
    } else {
        io::load_assembly(path)
    }
}

fn snapshot_command(
    input: &str,
    output: &str,
    options: &SnapshotOptions,
    verbose: bool,
) -> Result<()> {
    if !Path::new(input).exists() {
        eprintln!("Error: Input file not found: {}", input);
        std::process::exit(1);
    }

    if verbose {
        println!("Rendering: {}", input);
    }

    let assembly = load_input(input)?;
    let start = std::time::Instant::now();
    io::export_png(&assembly, options, output)?;
    let elapsed = start.elapsed();

    if verbose {
        println!("Parts: {}", assembly.part_count());
        println!("Image: {}x{}", options.width, options.height);
        println!("Rendered in {:.2?}", elapsed);
        println!("Output: {}", output);
    } else {
        println!("Successfully rendered {} -> {}", input, output);
    }

    Ok(())
}

fn info_command(input: &str) -> Result<()> {
    if !Path::new(input).exists() {
        eprintln!("Error: Input file not found: {}", input);
        std::process::exit(1);
    }

    let assembly = load_input(input)?;
    let bounds = assembly.bounding_box(&Tolerances::default())?;

    println!("{} {}", "Assembly:".bold(), assembly.name.cyan());
    println!("  {} {}", "Parts:".bright_black(), assembly.part_count());
    for part in assembly.iter_parts() {
        let color = part.effective_color();
        println!(
            "    {} {} {}",
            "-".bright_black(),
            part.name,
            format!(
                "rgba({:.2}, {:.2}, {:.2}, {:.2})",
                color.r, color.g, color.b, color.a
            )
            .bright_black()
        );
    }
    if bounds.is_empty() {
        println!("  {} {}", "Bounds:".bright_black(), "empty".yellow());
    } else {
        println!(
            "  {} ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            "Bounds:".bright_black(),
            bounds.min.x,
            bounds.min.y,
            bounds.min.z,
            bounds.max.x,
            bounds.max.y,
            bounds.max.z
        );
    }

    Ok(())
}
