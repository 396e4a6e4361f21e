//! In-process solid modeling: prisms from closed loops, the fluid box and
//! named face selections.

pub mod design;
pub mod extrude;
pub mod primitives;
pub mod selection;
pub mod store;

pub use design::{Design, FluidDomain};
pub use selection::{BoundaryFaces, NamedSelection};
pub use store::{Body, BodyId, EntityStore, Face, FaceId};

use crate::profile::ProfileError;

/// Errors raised while building bodies or selections.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("profile '{name}' is not convex at vertex {vertex}")]
    NonConvexProfile { name: String, vertex: usize },

    #[error("{parameter} must be positive, got {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },

    #[error("a body named '{0}' already exists")]
    DuplicateBody(String),

    #[error("a named selection '{0}' already exists")]
    DuplicateSelection(String),

    #[error("no body named '{0}'")]
    UnknownBody(String),
}
