// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Assembly document and mesh file loading

use crate::assembly::Assembly;
use crate::geometry::PolyData;
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an assembly tree from a JSON document
pub fn load_assembly(path: impl AsRef<Path>) -> Result<Assembly> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let assembly: Assembly = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse assembly document: {}", path.display()))?;

    log::debug!(
        "Loaded assembly '{}' with {} parts",
        assembly.name,
        assembly.part_count()
    );
    Ok(assembly)
}

/// Read an STL file into poly-data with smoothed per-point normals.
///
/// Normals are recomputed from the triangles, area-weighted, rather than
/// trusted from the file; exporters routinely write zeroed ones.
pub fn import_stl(path: impl AsRef<Path>) -> Result<PolyData> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let stl = stl_io::read_stl(&mut file)
        .with_context(|| format!("Failed to read STL file: {}", path.display()))?;

    let mut data = PolyData::new();
    data.points = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut normals = vec![Vector3::zeros(); data.points.len()];
    for face in &stl.faces {
        let [i0, i1, i2] = face.vertices;
        let p0 = data.points[i0];
        let p1 = data.points[i1];
        let p2 = data.points[i2];
        // cross product length carries the area weighting
        let face_normal = (p1 - p0).cross(&(p2 - p0));
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;

        data.triangles
            .push([i0 as u32, i1 as u32, i2 as u32]);
    }
    for normal in &mut normals {
        let len = normal.norm();
        if len > 1e-12 {
            *normal /= len;
        } else {
            *normal = Vector3::z();
        }
    }
    data.normals = Some(normals);

    log::debug!(
        "Imported {} triangles from {}",
        data.triangle_count(),
        path.display()
    );
    Ok(data)
}
