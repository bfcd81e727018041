//! Core traits, settings, validation guards, and the module registry for Shelf.

pub mod module;
pub mod registry;
pub mod settings;
pub mod validation;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
