//! Configuration file path resolution
//!
//! Files are named `config-<username>` and looked up in the downloads
//! directory first, then the per-user application config directory, then
//! the working directory.

use std::path::{Path, PathBuf};

const APP_VENDOR: &str = "Btic";
const APP_DIR: &str = "ConfigConnectorTickelia";

/// File name for a user's configuration
pub fn config_file_name(username: &str) -> String {
    format!("config-{username}")
}

/// Default location a new configuration file is written to
pub fn default_output_path(username: &str) -> PathBuf {
    let name = config_file_name(username);
    if let Some(mut path) = dirs::download_dir() {
        path.push(name);
        return path;
    }
    if let Some(mut path) = dirs::config_dir() {
        path.push(APP_VENDOR);
        path.push(APP_DIR);
        path.push(name);
        return path;
    }
    PathBuf::from(name)
}

/// All locations probed when looking for an existing configuration
pub fn candidate_paths(username: &str) -> Vec<PathBuf> {
    let name = config_file_name(username);
    let mut candidates = Vec::new();
    if let Some(mut path) = dirs::download_dir() {
        path.push(&name);
        candidates.push(path);
    }
    if let Some(mut path) = dirs::config_dir() {
        path.push(APP_VENDOR);
        path.push(APP_DIR);
        path.push(&name);
        candidates.push(path);
    }
    candidates.push(PathBuf::from(&name));
    candidates
}

/// First existing configuration file for `username`, if any
pub fn find_existing(username: &str) -> Option<PathBuf> {
    candidate_paths(username).into_iter().find(|p| p.exists())
}

/// Resolve a caller-supplied output path; relative paths land in the
/// downloads directory
pub fn resolve_output_path(requested: &str) -> PathBuf {
    let path = Path::new(requested);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match dirs::download_dir() {
        Some(mut base) => {
            base.push(requested);
            base
        }
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_embeds_the_username() {
        assert_eq!(config_file_name("jdoe"), "config-jdoe");
    }

    #[test]
    fn absolute_output_paths_are_used_verbatim() {
        let requested = if cfg!(windows) { "C:\\tmp\\config-x" } else { "/tmp/config-x" };
        assert_eq!(resolve_output_path(requested), PathBuf::from(requested));
    }

    #[test]
    fn candidates_end_with_the_working_directory_fallback() {
        let candidates = candidate_paths("jdoe");
        assert_eq!(candidates.last(), Some(&PathBuf::from("config-jdoe")));
    }
}
