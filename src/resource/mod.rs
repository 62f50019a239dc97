//! Per-locale translation resources
/// Change notification types
mod event;
/// Flat key/value store
mod store;

pub use event::{
    ChangeEvent,
    ResourceListener,
};
pub use store::Resource;
