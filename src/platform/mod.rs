// ScrollWise platform abstraction
// Provides the platform-specific configuration directory for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod linux;

/// Returns the platform-specific configuration directory for ScrollWise.
///
/// - **Linux**: `~/.config/scrollwise` (or `$XDG_CONFIG_HOME/scrollwise`)
/// - **macOS**: `~/Library/Application Support/ScrollWise`
/// - **Windows**: `%APPDATA%/ScrollWise`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        linux::get_config_dir()
    }
}
