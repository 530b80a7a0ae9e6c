//! Bot module - Core bot functionality.

pub mod dispatcher;
mod error_handler;
pub mod jobs;
mod runtime;

pub use dispatcher::build_dispatcher;
pub use runtime::run;
