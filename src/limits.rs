// Compiler safety limits module
//
// Bounds the resources a single compilation unit may consume:
// - Memory from very large source files, strings and comments
// - Runaway token and node counts
// - Pathologically deep scope nesting
//
// All limits have permissive defaults and can be overridden via pytoasm.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default project file looked up in the working directory
pub const PROJECT_FILE: &str = "pytoasm.toml";

/// Compiler safety limits with permissive defaults
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerLimits {
    // Lexer limits
    pub max_input_size: usize,        // Maximum source size in bytes
    pub max_token_count: usize,       // Maximum number of tokens per unit
    pub max_identifier_length: usize, // Maximum identifier length in bytes
    pub max_string_length: usize,     // Maximum string literal body in bytes
    pub max_comment_length: usize,    // Maximum comment length in bytes

    // Parser limits
    pub max_scope_depth: usize, // Maximum number of simultaneously open scopes

    // AST limits
    pub max_ast_nodes: usize, // Maximum AST nodes per unit
}

impl Default for CompilerLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000,    // 10 MB
            max_token_count: 100_000,      // 100k tokens
            max_identifier_length: 1_000,  // 1k bytes
            max_string_length: 1_000_000,  // 1 MB
            max_comment_length: 100_000,   // 100k bytes
            max_scope_depth: 256,
            max_ast_nodes: 1_000_000, // 1M nodes
        }
    }
}

impl CompilerLimits {
    /// Load limits from a project TOML file, falling back to defaults
    ///
    /// Returns error only if the file is unreadable or malformed, not if it is missing
    pub fn from_project_toml<P: AsRef<Path>>(path: P) -> Result<Self, LimitError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| LimitError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            LimitError::Parse { reason, .. } => LimitError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Limits for one run: an explicitly named file must exist, the default
    /// project file in the working directory may be absent
    pub fn load(explicit: Option<&Path>) -> Result<Self, LimitError> {
        match explicit {
            Some(path) if !path.exists() => Err(LimitError::Read {
                path: path.display().to_string(),
                reason: "file not found".to_string(),
            }),
            Some(path) => Self::from_project_toml(path),
            None => Self::from_project_toml(PROJECT_FILE),
        }
    }

    /// Parse limits from TOML text; only keys present in `[limits]` override defaults
    pub fn from_toml_str(content: &str) -> Result<Self, LimitError> {
        let config: ProjectConfig = toml::from_str(content).map_err(|e| LimitError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;

        let mut limits = Self::default();

        if let Some(overrides) = config.limits {
            let LimitsConfig {
                max_input_size,
                max_token_count,
                max_identifier_length,
                max_string_length,
                max_comment_length,
                max_scope_depth,
                max_ast_nodes,
            } = overrides;

            if let Some(v) = max_input_size {
                limits.max_input_size = v;
            }
            if let Some(v) = max_token_count {
                limits.max_token_count = v;
            }
            if let Some(v) = max_identifier_length {
                limits.max_identifier_length = v;
            }
            if let Some(v) = max_string_length {
                limits.max_string_length = v;
            }
            if let Some(v) = max_comment_length {
                limits.max_comment_length = v;
            }
            if let Some(v) = max_scope_depth {
                limits.max_scope_depth = v;
            }
            if let Some(v) = max_ast_nodes {
                limits.max_ast_nodes = v;
            }
        }

        limits.validate()?;
        Ok(limits)
    }

    /// Validate that all limits are reasonable (positive, not absurdly large)
    pub fn validate(&self) -> Result<(), LimitError> {
        const MAX_REASONABLE: usize = 100_000_000; // 100 MB

        let checks: [(&'static str, usize, usize); 7] = [
            ("max_input_size", self.max_input_size, MAX_REASONABLE),
            ("max_token_count", self.max_token_count, MAX_REASONABLE),
            ("max_identifier_length", self.max_identifier_length, 100_000),
            ("max_string_length", self.max_string_length, MAX_REASONABLE),
            ("max_comment_length", self.max_comment_length, MAX_REASONABLE),
            ("max_scope_depth", self.max_scope_depth, 10_000),
            ("max_ast_nodes", self.max_ast_nodes, 10_000_000),
        ];

        for (name, value, ceiling) in checks {
            if value == 0 || value > ceiling {
                return Err(LimitError::Invalid { name, value });
            }
        }

        Ok(())
    }
}

/// TOML configuration structures for deserialization
#[derive(Debug, Deserialize)]
struct ProjectConfig {
    limits: Option<LimitsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsConfig {
    max_input_size: Option<usize>,
    max_token_count: Option<usize>,
    max_identifier_length: Option<usize>,
    max_string_length: Option<usize>,
    max_comment_length: Option<usize>,
    max_scope_depth: Option<usize>,
    max_ast_nodes: Option<usize>,
}

/// Error type for limit validation and loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LimitError {
    #[error("Limit error: failed to read {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("Limit error: failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("Limit error: invalid limit '{name}': {value} (must be positive and reasonable)")]
    Invalid { name: &'static str, value: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_reasonable() {
        let limits = CompilerLimits::default();
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let limits = CompilerLimits::default();
        assert_eq!(limits.max_input_size, 10_000_000);
        assert_eq!(limits.max_token_count, 100_000);
        assert_eq!(limits.max_identifier_length, 1_000);
        assert_eq!(limits.max_scope_depth, 256);
        assert_eq!(limits.max_ast_nodes, 1_000_000);
    }

    #[test]
    fn test_validation_catches_zero_values() {
        let mut limits = CompilerLimits::default();
        limits.max_input_size = 0;
        assert_eq!(
            limits.validate(),
            Err(LimitError::Invalid {
                name: "max_input_size",
                value: 0
            })
        );

        limits = CompilerLimits::default();
        limits.max_scope_depth = 0;
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_validation_catches_too_large_values() {
        let mut limits = CompilerLimits::default();
        limits.max_input_size = 200_000_000;
        assert!(limits.validate().is_err());

        limits = CompilerLimits::default();
        limits.max_scope_depth = 20_000;
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let limits = CompilerLimits::from_project_toml("nonexistent-pytoasm.toml").unwrap();
        assert_eq!(limits, CompilerLimits::default());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let result = CompilerLimits::load(Some(Path::new("nonexistent-pytoasm.toml")));
        assert!(matches!(result, Err(LimitError::Read { .. })));
    }

    #[test]
    fn test_partial_override() {
        let limits = CompilerLimits::from_toml_str(
            r#"
[limits]
max_input_size = 2000000
max_scope_depth = 32
"#,
        )
        .unwrap();
        assert_eq!(limits.max_input_size, 2_000_000);
        assert_eq!(limits.max_scope_depth, 32);
        assert_eq!(limits.max_token_count, 100_000);
    }

    #[test]
    fn test_override_from_file() {
        let temp_path = std::env::temp_dir().join("pytoasm_test_limits.toml");
        fs::write(&temp_path, "[limits]\nmax_ast_nodes = 64\n").unwrap();

        let limits = CompilerLimits::from_project_toml(&temp_path).unwrap();
        assert_eq!(limits.max_ast_nodes, 64);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_malformed_toml_returns_error() {
        let result = CompilerLimits::from_toml_str("this is not valid toml {{{");
        assert!(matches!(result, Err(LimitError::Parse { .. })));
    }

    #[test]
    fn test_unknown_limit_is_rejected() {
        let result = CompilerLimits::from_toml_str("[limits]\nmax_expr_depth = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let result = CompilerLimits::from_toml_str("[limits]\nmax_token_count = 0\n");
        assert!(matches!(result, Err(LimitError::Invalid { .. })));
    }
}
