//! Generic built-ins for bottom-up evaluation.
//!
//! A generic built-in is any type implementing [`Builtin`]: it reports the
//! symbol code it answers for and turns a call atom into zero or one derived
//! facts. [`BuBuiltin`] wraps one so the bottom-up engine can hold built-ins
//! of different concrete types side by side, and [`BuiltinRegistry`] keys
//! those adapters by symbol so calls inside clause bodies can be routed.
//!
//! Adapters never unify; the engine unifies the derived fact against the
//! call. A default-constructed adapter wraps nothing and reports
//! [`BuiltinError::Unconfigured`] instead of pretending the call failed.

pub mod builtin;
pub mod builtins;
pub mod registry;

pub use builtin::{BuBuiltin, Builtin, BuiltinError};
pub use registry::BuiltinRegistry;
