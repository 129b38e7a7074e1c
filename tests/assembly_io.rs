// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Assembly document and STL shape loading tests

use anyhow::Result;
use cadshot::{io, snapshot_file, Assembly, Part, Shape, SnapshotOptions};
use image::Rgb;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write a small pyramid mesh the way any STL exporter would
fn write_pyramid_stl() -> Result<NamedTempFile> {
    let vertex = |p: [f32; 3]| stl_io::Vertex::new(p);
    let triangle = |a: [f32; 3], b: [f32; 3], c: [f32; 3]| stl_io::Triangle {
        normal: stl_io::Normal::new([0.0, 0.0, 0.0]),
        vertices: [vertex(a), vertex(b), vertex(c)],
    };

    let base = [
        [0.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [2.0, 2.0, 0.0],
        [0.0, 2.0, 0.0],
    ];
    let apex = [1.0, 1.0, 2.0];
    let triangles = vec![
        triangle(base[0], base[2], base[1]),
        triangle(base[0], base[3], base[2]),
        triangle(base[0], base[1], apex),
        triangle(base[1], base[2], apex),
        triangle(base[2], base[3], apex),
        triangle(base[3], base[0], apex),
    ];

    let mut file = NamedTempFile::with_suffix(".stl")?;
    stl_io::write_stl(file.as_file_mut(), triangles.iter())?;
    file.as_file_mut().flush()?;
    Ok(file)
}

#[test]
fn test_stl_shape_round_trip() -> Result<()> {
    let stl = write_pyramid_stl()?;
    let data = io::import_stl(stl.path())?;

    println!(
        "Imported mesh: {} points, {} triangles",
        data.point_count(),
        data.triangle_count()
    );
    assert_eq!(data.point_count(), 5);
    assert_eq!(data.triangle_count(), 6);

    let bbox = data.bounding_box();
    assert!((bbox.max.z - 2.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_stl_part_renders_to_png() -> Result<()> {
    let stl = write_pyramid_stl()?;

    let mut assembly = Assembly::new("imported");
    assembly.add_part(Part::new(
        "pyramid",
        Shape::Stl {
            path: stl.path().to_path_buf(),
        },
    ));

    let options = SnapshotOptions {
        width: 160,
        height: 120,
        ..SnapshotOptions::default()
    };
    let output = NamedTempFile::with_suffix(".png")?;
    io::export_png(&assembly, &options, output.path())?;

    let image = image::open(output.path())?.to_rgb8();
    let covered = image
        .pixels()
        .filter(|p| *p != &Rgb([204, 204, 204]))
        .count();
    assert!(covered > 50, "pyramid covers only {} pixels", covered);
    Ok(())
}

#[test]
fn test_assembly_document_to_snapshot() -> Result<()> {
    let mut doc = NamedTempFile::with_suffix(".json")?;
    write!(
        doc,
        r#"{{
            "name": "gearbox",
            "parts": [
                {{
                    "name": "housing",
                    "shape": {{ "type": "box", "size": [4.0, 3.0, 2.0] }},
                    "color": {{ "r": 0.3, "g": 0.5, "b": 0.8, "a": 1.0 }}
                }}
            ],
            "children": [
                {{
                    "name": "shaft-group",
                    "parts": [
                        {{
                            "name": "shaft",
                            "shape": {{ "type": "cylinder", "radius": 0.3, "height": 5.0 }},
                            "location": {{
                                "translation": [2.0, 1.5, 2.0],
                                "rotation": [0.0, 0.0, 0.0]
                            }}
                        }}
                    ]
                }}
            ]
        }}"#
    )?;
    doc.flush()?;

    let output = NamedTempFile::with_suffix(".png")?;
    let options = SnapshotOptions {
        width: 200,
        height: 150,
        ..SnapshotOptions::default()
    };
    snapshot_file(doc.path(), &options, output.path())?;

    let image = image::open(output.path())?.to_rgb8();
    assert_eq!(image.dimensions(), (200, 150));

    let covered = image
        .pixels()
        .filter(|p| *p != &Rgb([204, 204, 204]))
        .count();
    assert!(covered > 200, "assembly covers only {} pixels", covered);
    Ok(())
}

#[test]
fn test_loaded_document_structure() -> Result<()> {
    let mut doc = NamedTempFile::with_suffix(".json")?;
    write!(
        doc,
        r#"{{
            "name": "widget",
            "parts": [
                {{ "name": "a", "shape": {{ "type": "sphere", "radius": 1.0 }} }}
            ],
            "children": [
                {{
                    "name": "sub",
                    "parts": [
                        {{ "name": "b", "shape": {{ "type": "box", "size": [1.0, 1.0, 1.0] }} }}
                    ]
                }}
            ]
        }}"#
    )?;
    doc.flush()?;

    let assembly = io::load_assembly(doc.path())?;
    assert_eq!(assembly.name, "widget");
    assert_eq!(assembly.part_count(), 2);

    let names: Vec<&str> = assembly.iter_parts().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    Ok(())
}
