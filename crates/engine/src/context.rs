//! Application context – capability trait objects handed to every command.

use crate::platform::{FilePrefsStore, HeadlessClipboard, MemoryPrefsStore, SystemClipboard};
use crate::traits::*;

/// Capabilities surrounding a calculator session.
///
/// Holds trait-object implementations so adapters (CLI / GUI shells) can
/// swap them – a real prefs file vs an in-memory map, a real clipboard vs
/// a headless stub. The calculator itself never touches these; only the
/// command surface does.
pub struct AppContext {
    prefs: Box<dyn PrefsStore>,
    clipboard: Box<dyn ClipboardOps>,
}

impl AppContext {
    pub fn new(prefs: Box<dyn PrefsStore>, clipboard: Box<dyn ClipboardOps>) -> Self {
        Self { prefs, clipboard }
    }

    /// Real platform implementations, with the clipboard downgraded to the
    /// headless stub when no display server is reachable.
    pub fn default_platform() -> Self {
        let clipboard: Box<dyn ClipboardOps> = if detect_headless() {
            Box::new(HeadlessClipboard)
        } else {
            Box::new(SystemClipboard)
        };
        Self {
            prefs: Box::new(FilePrefsStore::at_default_path()),
            clipboard,
        }
    }

    /// Context for headless / CI environments: nothing persists, nothing
    /// shells out.
    pub fn default_headless() -> Self {
        Self {
            prefs: Box::new(MemoryPrefsStore::default()),
            clipboard: Box::new(HeadlessClipboard),
        }
    }

    pub fn prefs(&self) -> &dyn PrefsStore {
        self.prefs.as_ref()
    }

    pub fn clipboard(&self) -> &dyn ClipboardOps {
        self.clipboard.as_ref()
    }
}

pub fn detect_headless() -> bool {
    match std::env::consts::OS {
        "linux" => {
            // No X11 or Wayland display → headless
            std::env::var("DISPLAY").is_err() && std::env::var("WAYLAND_DISPLAY").is_err()
        }
        "macos" => {
            // Best-effort: assume not headless unless SSH_TTY is set and no display
            std::env::var("SSH_TTY").is_ok() && std::env::var("DISPLAY").is_err()
        }
        _ => false,
    }
}
