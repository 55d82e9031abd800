//! World module - scene data owned by the host
//!
//! - Quads and triangles grouped into meshes
//! - A scene is a camera position plus meshes
//! - RON scene and settings files

mod geometry;
mod scene_file;

pub use geometry::*;
pub use scene_file::*;
