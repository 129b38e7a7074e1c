// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Cadshot
//!
//! Offscreen PNG snapshot rendering for CAD assemblies. Assemblies are
//! trees of placed, colored shapes; export tessellates them, splits faces
//! from feature edges, and rasterizes the scene without a display server.

pub mod assembly;
pub mod geometry;
pub mod io;
pub mod render;
pub mod scene;
pub mod utils;

pub use assembly::{Assembly, Color, Location, Part};
pub use geometry::{BoundingBox, CellType, PolyData, Shape, Tolerances};
pub use io::{export_png, load_assembly, SnapshotOptions};
pub use render::Renderer;
pub use scene::{Actor, ActorProperty, Camera};

use anyhow::Result;
use std::path::Path;

/// Load an assembly document and render it straight to a PNG file
pub fn snapshot_file(
    assembly_path: impl AsRef<Path>,
    options: &SnapshotOptions,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let assembly = io::load_assembly(assembly_path)?;
    io::export_png(&assembly, options, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_of_basic_cube() -> Result<()> {
        let mut assembly = Assembly::new("cube");
        assembly.add_part(Part::new(
            "body",
            Shape::Box {
                size: Vector3::new(10.0, 10.0, 10.0),
            },
        ));

        let dir = TempDir::new()?;
        let output = dir.path().join("cube.png");
        export_png(&assembly, &SnapshotOptions::default(), &output)?;

        assert!(output.exists());
        Ok(())
    }
}
