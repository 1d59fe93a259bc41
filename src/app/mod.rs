//! Binary plumbing: settings, shared context, terminal output.

mod config_runtime;
mod context;
pub(crate) mod terminal;

pub(crate) use config_runtime::Settings;
pub(crate) use context::AppContext;
