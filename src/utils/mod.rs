//! Utility functions for the provider host

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Expand `~` and environment variables, then resolve relative paths against `base`
pub fn resolve_path(path: &Path, base: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::full(&path_str)
        .map_err(|e| anyhow!("Failed to expand path {:?}: {}", path, e))?;
    let expanded = PathBuf::from(expanded.as_ref());

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Directory that relative configuration paths are resolved against
pub fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Render a nanosecond `id` as a UTC timestamp
pub fn format_id(id: i64) -> String {
    let timestamp = Utc.timestamp_nanos(id);
    timestamp.format("%Y-%m-%d %H:%M:%S%.9f UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_path(Path::new("crds"), Path::new("/etc/provider")).unwrap();
        assert_eq!(resolved, PathBuf::from("/etc/provider/crds"));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let resolved = resolve_path(Path::new("/opt/crds"), Path::new("/etc/provider")).unwrap();
        assert_eq!(resolved, PathBuf::from("/opt/crds"));
    }

    #[test]
    fn test_resolve_home_path() {
        if let Ok(home) = std::env::var("HOME") {
            let resolved = resolve_path(Path::new("~/crds"), Path::new("/etc")).unwrap();
            assert_eq!(resolved, PathBuf::from(home).join("crds"));
        }
    }

    #[test]
    fn test_config_base_dir() {
        assert_eq!(config_base_dir(Path::new("crd-manifests.yaml")), PathBuf::from("."));
        assert_eq!(
            config_base_dir(Path::new("/etc/provider/crd-manifests.yaml")),
            PathBuf::from("/etc/provider")
        );
    }

    #[test]
    fn test_format_id() {
        assert_eq!(format_id(0), "1970-01-01 00:00:00.000000000 UTC");
    }
}
