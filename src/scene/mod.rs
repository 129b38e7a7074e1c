// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Scene module - actors and cameras

mod actor;
mod camera;

pub use actor::{Actor, ActorProperty};
pub use camera::Camera;
