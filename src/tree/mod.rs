//! Hierarchical view over translation keys
/// Occupied-target resolution
mod conflict;
/// Tree operations
mod model;
/// Node storage
mod node;

pub use conflict::{
    Conflict,
    Resolution,
};
pub use model::TranslationTree;
pub use node::NodeId;
