//! Configuration management for dgm.
//!
//! Parses `dgm.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.output_dir`
//! - `builder.program`

mod expand;

use dgm_builder::DEFAULT_PAD_FACTOR;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dgm.toml";

/// Filter configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Class names that mark diagram and definition nodes.
    pub markers: MarkersConfig,
    /// Render request defaults.
    pub render: RenderConfig,
    /// External renderer invocation.
    pub builder: BuilderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Marker classes.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Class of diagram blocks and inline spans.
    pub diagram: String,
    /// Class of definition blocks.
    pub definition: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            diagram: "diagram".to_owned(),
            definition: "diagram-def".to_owned(),
        }
    }
}

/// Render request defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Identifier evaluated for diagram blocks.
    pub expression: String,
    /// Directory for rendered images when the document does not name one.
    pub output_dir: PathBuf,
    /// Modules imported by every build (rendering backend included).
    pub imports: Vec<String>,
    /// Bounding box scale applied by autopad (1.1 = 10% margin).
    pub pad_factor: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            expression: "dia".to_owned(),
            output_dir: PathBuf::from("diagrams"),
            imports: vec![
                "Diagrams.Prelude".to_owned(),
                "Diagrams.Backend.Rasterific".to_owned(),
            ],
            pad_factor: DEFAULT_PAD_FACTOR,
        }
    }
}

/// External renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Renderer executable.
    pub program: String,
    /// Extra arguments passed on every invocation.
    pub args: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            program: "dgm-render".to_owned(),
            args: Vec::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`builder.program`").
        field: String,
        /// Error message (e.g., "${`DGM_RENDER`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl FilterConfig {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dgm.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string, expanding and validating it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_markers()?;
        self.validate_render()?;
        require_non_empty(&self.builder.program, "builder.program")?;
        Ok(())
    }

    fn validate_markers(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.markers.diagram, "markers.diagram")?;
        require_non_empty(&self.markers.definition, "markers.definition")?;

        if self.markers.diagram == self.markers.definition {
            return Err(ConfigError::Validation(format!(
                "markers.diagram and markers.definition must differ (both '{}')",
                self.markers.diagram
            )));
        }
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.expression, "render.expression")?;

        if self.render.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "render.output_dir cannot be empty".to_owned(),
            ));
        }

        let factor = self.render.pad_factor;
        if !factor.is_finite() || factor < 1.0 {
            return Err(ConfigError::Validation(format!(
                "render.pad_factor must be a finite number >= 1.0 (got {factor})"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.builder.program = expand::expand_env(&self.builder.program, "builder.program")?;

        if let Some(dir) = self.render.output_dir.to_str() {
            self.render.output_dir =
                PathBuf::from(expand::expand_env(dir, "render.output_dir")?);
        }

        Ok(())
    }
}
