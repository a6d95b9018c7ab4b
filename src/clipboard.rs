/*!
 * Clipboard support for repo2tree
 *
 * The output is piped into the first clipboard command available on the
 * host: tmux first when a session is running, then the platform tool.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The clipboard command could not be run or exited unsuccessfully
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Clipboard commands known to repo2tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer, forwarded to the outer clipboard with `-w`
    Tmux,
    /// macOS `pbcopy`
    MacOS,
    /// Windows clipboard from WSL
    Wsl,
    /// Wayland `wl-copy`
    Wayland,
    /// X11 `xsel`
    Xsel,
    /// X11 `xclip`
    Xclip,
    /// Android Termux
    Termux,
}

impl ClipboardProvider {
    /// Program and arguments that read the text from stdin
    pub fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Wsl => ("clip.exe", &[]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Providers worth trying on this host, most preferred first
    pub fn candidates() -> Vec<Self> {
        let mut providers = Vec::new();

        if env::var_os("TMUX").is_some() {
            providers.push(Self::Tmux);
        }

        if cfg!(target_os = "macos") {
            providers.push(Self::MacOS);
        } else if cfg!(target_os = "windows") || env::var_os("WSL_DISTRO_NAME").is_some() {
            providers.push(Self::Wsl);
        } else if cfg!(target_os = "android") {
            providers.push(Self::Termux);
        } else {
            providers.extend([Self::Wayland, Self::Xsel, Self::Xclip]);
        }

        providers
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();

        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

        child
            .stdin
            .take()
            .ok_or_else(|| ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd)))?
            .write_all(text.as_bytes())?;

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed(format!(
                "{} exited with status: {}",
                cmd, status
            )))
        }
    }
}

/// Copy text to the first available clipboard provider
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let provider = ClipboardProvider::candidates()
        .into_iter()
        .find(|provider| command_exists(provider.command().0))
        .ok_or(ClipboardError::NoClipboardFound)?;

    debug!(?provider, "copying output to clipboard");
    provider.copy_to_clipboard(text)
}

/// Whether `command` can be found on `PATH`
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        assert!(command_exists("sh"));
        assert!(!command_exists("nonexistentcommandxyz"));
    }

    #[test]
    fn test_candidates_are_not_empty() {
        assert!(!ClipboardProvider::candidates().is_empty());
    }

    #[test]
    fn test_commands_read_stdin() {
        assert_eq!(
            ClipboardProvider::Tmux.command(),
            ("tmux", &["load-buffer", "-w", "-"][..])
        );
        assert_eq!(ClipboardProvider::MacOS.command().1.len(), 0);
    }
}
