// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Assembly tree data model
//!
//! An [`Assembly`] is a named tree of sub-assemblies whose nodes carry
//! [`Part`]s: a shape with a placement and an optional color. Rendering
//! walks the tree and turns every part into scene actors.

mod color;
mod location;

pub use color::Color;
pub use location::Location;

use crate::geometry::{BoundingBox, PolyData, Shape, Tolerances};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A placed shape within an assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub color: Option<Color>,
}

impl Part {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            location: Location::default(),
            color: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Color used for rendering; parts without one fall back to the
    /// default part color
    pub fn effective_color(&self) -> Color {
        self.color.unwrap_or(Color::DEFAULT_PART)
    }
}

/// Named tree of parts and nested sub-assemblies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assembly {
    pub name: String,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub children: Vec<Assembly>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn add_child(&mut self, child: Assembly) {
        self.children.push(child);
    }

    /// Depth-first walk over this node and every nested sub-assembly
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse { stack: vec![self] }
    }

    /// All parts of the tree in traversal order
    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> + '_ {
        self.traverse().flat_map(|node| node.parts.iter())
    }

    pub fn part_count(&self) -> usize {
        self.iter_parts().count()
    }

    /// True when no node of the tree carries a part
    pub fn is_empty(&self) -> bool {
        self.iter_parts().next().is_none()
    }

    /// Tessellate every part into one merged, placed poly-data set
    pub fn to_polydata(&self, tolerances: &Tolerances) -> Result<PolyData> {
        let mut merged = PolyData::new();
        for part in self.iter_parts() {
            let mut data = part
                .shape
                .tessellate(tolerances)
                .with_context(|| format!("Failed to tessellate part '{}'", part.name))?;
            data.transform(&part.location.to_matrix());
            merged.merge(&data);
        }
        Ok(merged)
    }

    /// Bounds of the placed, tessellated assembly
    pub fn bounding_box(&self, tolerances: &Tolerances) -> Result<BoundingBox> {
        Ok(self.to_polydata(tolerances)?.bounding_box())
    }
}

/// Iterator produced by [`Assembly::traverse`]
pub struct Traverse<'a> {
    stack: Vec<&'a Assembly>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Assembly;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // reversed so children come back in declaration order
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
