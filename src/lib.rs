//! i18n-keytree
//!
//! Hierarchical translation key store for translation editors. Every locale
//! is a flat [`resource::Resource`] of dotted keys; a [`project::Project`]
//! applies structural edits (add, store, remove, rename, duplicate) to all of
//! them at once and keeps a [`tree::TranslationTree`] of the keys in step.

pub mod config;
pub mod files;
pub mod indexer;
pub mod key;
pub mod project;
pub mod resource;
pub mod tree;

mod test_utils;
