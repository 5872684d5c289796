//! Tool configuration loaded from a Java-style properties file.
//!
//! Only `addauth.digest` is interpreted: it holds a `user:password` credential that
//! is added to the session under the `digest` scheme. Every other property is ignored;
//! nothing is copied into process-wide state.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::ConfigError;

/// Property carrying the digest credential.
pub const ADDAUTH_DIGEST: &str = "addauth.digest";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolConfig {
    /// `user:password` for digest authentication, if configured.
    pub digest: Option<String>,
}

impl ToolConfig {
    /// Reads and parses a properties file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let properties = java_properties::read(file).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), count = properties.len(), "loaded properties");
        Ok(Self::from_properties(properties))
    }

    pub fn from_properties(mut properties: HashMap<String, String>) -> Self {
        ToolConfig { digest: properties.remove(ADDAUTH_DIGEST) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# credentials").unwrap();
        writeln!(file, "addauth.digest=super:s3cr3t").unwrap();
        writeln!(file, "zookeeper.sasl.client=false").unwrap();
        let config = ToolConfig::load(file.path()).unwrap();
        assert_eq!(config.digest.as_deref(), Some("super:s3cr3t"));
        assert_eq!(config, ToolConfig { digest: Some("super:s3cr3t".into()) });
    }

    #[test]
    fn test_missing_digest() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ToolConfig::load(file.path()).unwrap();
        assert_eq!(config.digest, None);
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.properties");
        let err = ToolConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
