// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! I/O module - assembly loading and snapshot export

mod export_png;
mod import;

pub use export_png::{default_camera_position, export_png, SnapshotOptions};
pub use import::{import_stl, load_assembly};
