//! Platform implementations of the capability traits.
//!
//! - [`FilePrefsStore`]: JSON file in the user config dir
//! - [`MemoryPrefsStore`]: in-process map for headless runs and tests
//! - [`SystemClipboard`]: platform clipboard via CLI tools
//! - [`HeadlessClipboard`]: always reports UNSUPPORTED cleanly

use crate::traits::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

// ===========================================================================
// Preference stores
// ===========================================================================

/// Preferences persisted as a flat JSON object on disk. Reads tolerate a
/// missing file; writes create the parent directory on demand.
pub struct FilePrefsStore {
    path: PathBuf,
}

impl FilePrefsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the platform config dir, falling back to the temp dir
    /// when no config dir is known.
    pub fn at_default_path() -> Self {
        let base = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(base.join("calcctl").join("prefs.json"))
    }

    fn load(&self) -> CapResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| CapError::Other(format!("corrupt prefs file: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Err(
                CapError::PermissionDenied(format!("cannot read {}", self.path.display())),
            ),
            Err(e) => Err(CapError::Io(e)),
        }
    }
}

impl PrefsStore for FilePrefsStore {
    fn get(&self, key: &str) -> CapResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> CapResult<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&values)
            .map_err(|e| CapError::Other(format!("serializing prefs: {}", e)))?;
        std::fs::write(&self.path, raw).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                CapError::PermissionDenied(format!("cannot write {}", self.path.display()))
            }
            _ => CapError::Io(e),
        })
    }
}

/// In-process store for headless contexts. Nothing survives the process.
#[derive(Default)]
pub struct MemoryPrefsStore {
    values: Mutex<HashMap<String, String>>,
}

impl PrefsStore for MemoryPrefsStore {
    fn get(&self, key: &str) -> CapResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| CapError::Other("prefs store poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CapResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| CapError::Other("prefs store poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ===========================================================================
// Clipboard
// ===========================================================================

/// System clipboard via platform CLI tools.
///
/// - macOS: pbcopy / pbpaste
/// - Linux: xclip / xsel / wl-copy+wl-paste, first one found wins
pub struct SystemClipboard;

impl ClipboardOps for SystemClipboard {
    fn read_text(&self) -> CapResult<String> {
        #[cfg(target_os = "macos")]
        {
            run_paste("pbpaste", &[])
        }
        #[cfg(target_os = "linux")]
        {
            run_paste("xclip", &["-selection", "clipboard", "-o"])
                .or_else(|_| run_paste("xsel", &["--clipboard", "--output"]))
                .or_else(|_| run_paste("wl-paste", &[]))
                .map_err(|_| {
                    CapError::DependencyMissing("none of xclip, xsel, or wl-paste found".into())
                })
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            Err(CapError::Unsupported(
                "clipboard not implemented for this OS".into(),
            ))
        }
    }

    fn write_text(&self, text: &str) -> CapResult<()> {
        #[cfg(target_os = "macos")]
        {
            run_copy("pbcopy", &[], text)
        }
        #[cfg(target_os = "linux")]
        {
            run_copy("xclip", &["-selection", "clipboard"], text)
                .or_else(|_| run_copy("xsel", &["--clipboard", "--input"], text))
                .or_else(|_| run_copy("wl-copy", &[], text))
                .map_err(|_| {
                    CapError::DependencyMissing("none of xclip, xsel, or wl-copy found".into())
                })
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            let _ = text;
            Err(CapError::Unsupported(
                "clipboard not implemented for this OS".into(),
            ))
        }
    }
}

#[allow(dead_code)]
fn run_paste(cmd: &str, args: &[&str]) -> CapResult<String> {
    let output = std::process::Command::new(cmd)
        .args(args)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CapError::DependencyMissing(format!("{} not found", cmd))
            } else {
                CapError::Io(e)
            }
        })?;
    if !output.status.success() {
        return Err(CapError::Other(format!(
            "{} exited with {}",
            cmd, output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[allow(dead_code)]
fn run_copy(cmd: &str, args: &[&str], text: &str) -> CapResult<()> {
    use std::io::Write;
    let mut child = std::process::Command::new(cmd)
        .args(args)
        .stdin(std::process::Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CapError::DependencyMissing(format!("{} not found", cmd))
            } else {
                CapError::Io(e)
            }
        })?;
    if let Some(ref mut stdin) = child.stdin {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if !status.success() {
        return Err(CapError::Other(format!("{} exited with {}", cmd, status)));
    }
    Ok(())
}

/// Clipboard stub for headless environments. Never panics.
pub struct HeadlessClipboard;

impl ClipboardOps for HeadlessClipboard {
    fn read_text(&self) -> CapResult<String> {
        Err(CapError::Unsupported(
            "clipboard unavailable in headless environment".into(),
        ))
    }
    fn write_text(&self, _text: &str) -> CapResult<()> {
        Err(CapError::Unsupported(
            "clipboard unavailable in headless environment".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_run_id;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryPrefsStore::default();
        assert_eq!(store.get("theme").expect("get"), None);
        store.set("theme", "light").expect("set");
        assert_eq!(store.get("theme").expect("get"), Some("light".into()));
        store.set("theme", "dark").expect("overwrite");
        assert_eq!(store.get("theme").expect("get"), Some("dark".into()));
    }

    #[test]
    fn file_store_round_trips() {
        let path = std::env::temp_dir()
            .join(format!("engine_prefs_{}", &new_run_id()[..8]))
            .join("prefs.json");
        let store = FilePrefsStore::new(path.clone());

        // Missing file reads as empty, not as an error.
        assert_eq!(store.get("theme").expect("get"), None);

        store.set("theme", "light").expect("set");
        store.set("last_socket", "/tmp/calc.sock").expect("set");
        assert_eq!(store.get("theme").expect("get"), Some("light".into()));
        assert_eq!(
            store.get("last_socket").expect("get"),
            Some("/tmp/calc.sock".into())
        );

        // A fresh handle sees the persisted values.
        let reopened = FilePrefsStore::new(path.clone());
        assert_eq!(reopened.get("theme").expect("get"), Some("light".into()));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn headless_clipboard_reports_unsupported() {
        let clip = HeadlessClipboard;
        assert!(matches!(clip.read_text(), Err(CapError::Unsupported(_))));
        assert!(matches!(
            clip.write_text("42"),
            Err(CapError::Unsupported(_))
        ));
    }
}
