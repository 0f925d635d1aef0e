//! Build request types.

use std::path::PathBuf;

use serde::Serialize;

/// Requested output size in pixels.
///
/// Each dimension is optional; a missing dimension is left for the renderer
/// to derive from the other one (or from the diagram's natural size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SizeSpec {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl SizeSpec {
    #[must_use]
    pub fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self { width, height }
    }

    /// Both dimensions set.
    #[must_use]
    pub fn exact(width: f64, height: f64) -> Self {
        Self::new(Some(width), Some(height))
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Default [`PostProcess::CenterPad`] scale (10% margin).
pub const DEFAULT_PAD_FACTOR: f64 = 1.1;

/// Transformation applied to the diagram before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcess {
    /// Center the diagram and scale its bounding box by `factor`
    /// (1.1 leaves a 10% margin).
    CenterPad { factor: f64 },
}

/// Everything a builder needs to produce one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRequest {
    /// Declarations brought into scope before evaluating `expression`.
    pub declarations: Vec<String>,
    /// Modules imported by the generated program (rendering backend included).
    pub imports: Vec<String>,
    /// Expression whose value is rendered.
    pub expression: String,
    pub size: SizeSpec,
    pub post_process: Option<PostProcess>,
    /// Directory holding rendered images; doubles as the cache.
    pub output_dir: PathBuf,
}

impl BuildRequest {
    /// Request for `expression` with no declarations, imports or post-processing.
    #[must_use]
    pub fn new(expression: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            declarations: Vec::new(),
            imports: Vec::new(),
            expression: expression.into(),
            size: SizeSpec::default(),
            post_process: None,
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn declarations(mut self, declarations: Vec<String>) -> Self {
        self.declarations = declarations;
        self
    }

    #[must_use]
    pub fn imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }

    #[must_use]
    pub fn size(mut self, size: SizeSpec) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn post_process(mut self, post_process: Option<PostProcess>) -> Self {
        self.post_process = post_process;
        self
    }
}
