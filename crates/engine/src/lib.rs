//! Engine crate – the calculator core shared by every adapter.
//!
//! All real logic lives here: the state machine, formatting, the key
//! mapping, and the JSON command surface. The crate knows nothing about
//! any particular UI, so GUI shells and the headless CLI harness drive
//! the exact same code.

pub mod calculator;
pub mod commands;
pub mod context;
pub mod format;
pub mod keymap;
pub mod platform;
pub mod scenario;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use calculator::{Calculator, Operator, Snapshot, ERROR_DISPLAY};
pub use commands::CommandRegistry;
pub use context::AppContext;
pub use keymap::{map_char, map_key, press_keys, Action};
pub use types::{CommandResult, ErrorCode, ErrorInfo, Status};
