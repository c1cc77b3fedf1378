//! Collaborator traits consumed by the learning core.

mod progress;
mod repository;

pub use progress::*;
pub use repository::*;
