#![deny(missing_docs)]
//! funcbar_core: shared building blocks (config, logging, output model, modules).

/// Configuration helpers (AppId, dirs, load_or_init, etc.)
pub mod cfg;
/// Tracing/log initialization helpers.
pub mod logx;
/// What a module displays.
pub mod output;
/// Runtime error type.
pub mod error;
/// Host-facing module trait and the handle capability.
pub mod module;
/// Basic module with a single worker.
pub mod base;
/// `once` / `every` builders turning async functions into modules.
pub mod funcs;

pub use base::{Base, ModuleHandle};
pub use error::ModuleError;
pub use funcs::{every, once};
pub use module::{Handle, Module, ModuleCtx};
pub use output::{Output, Segment};
