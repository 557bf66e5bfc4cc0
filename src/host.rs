//! Host capabilities behind an injected trait.
//!
//! Version lookup, clipboard access, and report persistence are platform
//! side effects; keeping them behind [`Host`] keeps every formatter pure and
//! lets tests substitute a stub instead of reaching for ambient globals.

use std::io::{self, Write as _};
use std::path::Path;
use std::process::{Command, Stdio};

/// Platform capabilities consumed by run construction and report delivery.
pub trait Host {
    /// Version of the FlowLint shell itself (flows into `flowlintVersion`).
    fn version(&self) -> String;

    /// Place `text` on the system clipboard. Never panics or returns an
    /// error; `false` means every available mechanism failed.
    fn write_clipboard(&self, text: &str) -> bool;

    /// Persist a rendered report. Failures surface to the caller; whether a
    /// write can succeed is environment-dependent and not this crate's call.
    fn save_report(&self, content: &str, path: &Path) -> io::Result<()>;
}

/// Production host backed by the real clipboard and filesystem.
#[derive(Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        SystemHost
    }

    /// Fallback clipboard path: pipe through the OS clipboard command.
    fn write_clipboard_via_command(text: &str) -> bool {
        let candidates: &[(&str, &[&str])] = if cfg!(target_os = "macos") {
            &[("pbcopy", &[])]
        } else if cfg!(target_os = "windows") {
            &[("clip", &[])]
        } else {
            &[
                ("wl-copy", &[]),
                ("xclip", &["-selection", "clipboard"]),
            ]
        };
        for (cmd, args) in candidates {
            let child = Command::new(cmd)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let Ok(mut child) = child else { continue };
            if let Some(stdin) = child.stdin.as_mut() {
                if stdin.write_all(text.as_bytes()).is_err() {
                    let _ = child.wait();
                    continue;
                }
            }
            // stdin must be dropped before wait() or the command hangs
            drop(child.stdin.take());
            if matches!(child.wait(), Ok(status) if status.success()) {
                return true;
            }
        }
        false
    }
}

impl Host for SystemHost {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn write_clipboard(&self, text: &str) -> bool {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if clipboard.set_text(text.to_string()).is_ok() {
                    return true;
                }
                Self::write_clipboard_via_command(text)
            }
            Err(_) => Self::write_clipboard_via_command(text),
        }
    }

    fn save_report(&self, content: &str, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
    }
}

/// Test host with a fixed version and an in-memory clipboard.
#[cfg(test)]
#[derive(Debug)]
pub struct StubHost {
    version: String,
    pub clipboard: std::sync::Mutex<Vec<String>>,
    pub clipboard_works: bool,
}

#[cfg(test)]
impl StubHost {
    pub fn new(version: &str) -> Self {
        StubHost {
            version: version.to_string(),
            clipboard: std::sync::Mutex::new(Vec::new()),
            clipboard_works: true,
        }
    }
}

#[cfg(test)]
impl Host for StubHost {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn write_clipboard(&self, text: &str) -> bool {
        if !self.clipboard_works {
            return false;
        }
        self.clipboard.lock().unwrap().push(text.to_string());
        true
    }

    fn save_report(&self, content: &str, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
    }
}
