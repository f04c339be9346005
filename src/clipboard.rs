/*!
 * Clipboard support for batchview
 *
 * Copies the generated document with the first clipboard command available
 * on the system.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// The clipboard command ran but did not succeed
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Clipboard commands, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    Tmux,
    Wayland,
    Xsel,
    Xclip,
    MacOS,
    Wsl,
    Termux,
}

impl ClipboardProvider {
    fn program(self) -> &'static str {
        match self {
            Self::Tmux => "tmux",
            Self::Wayland => "wl-copy",
            Self::Xsel => "xsel",
            Self::Xclip => "xclip",
            Self::MacOS => "pbcopy",
            Self::Wsl => "clip.exe",
            Self::Termux => "termux-clipboard-set",
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Tmux => &["load-buffer", "-w", "-"],
            Self::Xsel => &["-b", "-i"],
            Self::Xclip => &["-selection", "clipboard", "-in"],
            Self::Wayland | Self::MacOS | Self::Wsl | Self::Termux => &[],
        }
    }

    /// Providers worth trying on this platform
    pub fn candidates() -> Vec<Self> {
        let mut providers = Vec::new();
        if env::var_os("TMUX").is_some() {
            providers.push(Self::Tmux);
        }

        if cfg!(target_os = "macos") {
            providers.push(Self::MacOS);
        } else if cfg!(target_os = "android") {
            providers.push(Self::Termux);
        } else if env::var_os("WSL_DISTRO_NAME").is_some() || cfg!(target_os = "windows") {
            providers.push(Self::Wsl);
        } else {
            providers.extend([Self::Wayland, Self::Xsel, Self::Xclip]);
        }
        providers
    }

    /// First candidate whose command is installed
    pub fn detect() -> Option<Self> {
        Self::candidates()
            .into_iter()
            .find(|provider| command_exists(provider.program()))
    }

    /// Pipe `text` into the provider's command
    pub fn copy(self, text: &str) -> Result<()> {
        let cmd = self.program();
        debug!("Copying {} bytes with {}", text.len(), cmd);

        let mut child = Command::new(cmd)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()?;

        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| ClipboardError::CommandFailed(format!("no stdin for {}", cmd)))?;
        stdin.write_all(text.as_bytes())?;

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

/// Copy text with the detected provider
pub fn copy_to_clipboard(text: &str) -> Result<ClipboardProvider> {
    let provider = ClipboardProvider::detect().ok_or(ClipboardError::NoClipboardFound)?;
    provider.copy(text)?;
    Ok(provider)
}

/// Whether an executable with this name is on the PATH
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| is_file(&dir.join(command))))
        .unwrap_or(false)
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
