// ScrollWise config path for Linux: ~/.config/scrollwise

use std::env;
use std::path::PathBuf;

/// Uses `$XDG_CONFIG_HOME/scrollwise` if set, otherwise `~/.config/scrollwise`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("scrollwise"),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            PathBuf::from(home).join(".config").join("scrollwise")
        }
    }
}
