//! Render delegate.
//!
//! [`DiagramRenderer`] is the single place where transformers talk to the
//! builder. It assembles the [`BuildRequest`], stores freshly rendered images
//! and folds every failure into [`RenderOutcome::Failure`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dgm_builder::{
    BuildOutcome, BuildRequest, DEFAULT_PAD_FACTOR, DiagramBuilder, PostProcess, SizeSpec,
    image_path,
};

use crate::diagnostics::{DiagnosticSink, StderrSink};
use crate::error::OutputError;

/// Result of rendering one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Path of the image, `<dir>/<hash>.png`.
    Success(PathBuf),
    /// Human-readable message, prefixed with the failure kind.
    Failure(String),
}

/// Compiles expressions through a [`DiagramBuilder`] into image files.
pub struct DiagramRenderer<B> {
    builder: B,
    imports: Vec<String>,
    default_dir: PathBuf,
    pad_factor: f64,
    sink: Box<dyn DiagnosticSink>,
}

impl<B: DiagramBuilder> DiagramRenderer<B> {
    /// Create a renderer writing to `default_dir` unless told otherwise.
    ///
    /// `imports` are added to every request and must include the rendering
    /// backend.
    pub fn new(builder: B, imports: Vec<String>, default_dir: impl Into<PathBuf>) -> Self {
        Self {
            builder,
            imports,
            default_dir: default_dir.into(),
            pad_factor: DEFAULT_PAD_FACTOR,
            sink: Box::new(StderrSink::new()),
        }
    }

    /// Set the autopad scale.
    #[must_use]
    pub fn pad_factor(mut self, pad_factor: f64) -> Self {
        self.pad_factor = pad_factor;
        self
    }

    /// Set where failure messages are reported (default: stderr).
    #[must_use]
    pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    #[must_use]
    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    /// Render `expression` with `declarations` in scope.
    ///
    /// With `autopad` the diagram is centered and padded before rasterization.
    /// `output_dir` falls back to the renderer's default directory and is
    /// created if missing. Failures are reported to the diagnostic sink once
    /// and returned, never raised.
    pub fn render(
        &self,
        declarations: &[String],
        expression: &str,
        autopad: bool,
        size: SizeSpec,
        output_dir: Option<&Path>,
    ) -> RenderOutcome {
        let dir = output_dir.unwrap_or(&self.default_dir);

        if let Err(source) = fs::create_dir_all(dir) {
            let e = OutputError::CreateDir {
                path: dir.to_path_buf(),
                source,
            };
            return self.fail(format!("Build error: {e}"));
        }

        let post_process = autopad.then_some(PostProcess::CenterPad {
            factor: self.pad_factor,
        });
        let request = BuildRequest::new(expression, dir)
            .declarations(declarations.to_vec())
            .imports(self.imports.clone())
            .size(size)
            .post_process(post_process);

        tracing::debug!(
            expression,
            declarations = declarations.len(),
            dir = %dir.display(),
            autopad,
            "rendering diagram"
        );

        match self.builder.build(&request) {
            Ok(BuildOutcome::ParseError(message)) => self.fail(format!("Parse error: {message}")),
            Ok(BuildOutcome::InterpError(message)) => {
                self.fail(format!("Interpreter error: {message}"))
            }
            Ok(BuildOutcome::Skipped { hash }) => {
                let path = image_path(dir, &hash);
                tracing::debug!(path = %path.display(), "reusing rendered diagram");
                RenderOutcome::Success(path)
            }
            Ok(BuildOutcome::Built { hash, png }) => {
                let path = image_path(dir, &hash);
                if let Err(source) = write_image(dir, &path, &png) {
                    let e = OutputError::WriteImage { path, source };
                    return self.fail(format!("Build error: {e}"));
                }
                tracing::info!(path = %path.display(), bytes = png.len(), "diagram rendered");
                RenderOutcome::Success(path)
            }
            Err(e) => self.fail(format!("Build error: {e}")),
        }
    }

    fn fail(&self, message: String) -> RenderOutcome {
        tracing::warn!(%message, "diagram render failed");
        self.sink.report(&message);
        RenderOutcome::Failure(message)
    }
}

/// Write `png` to `path` through a temporary file in `dir`.
///
/// The image appears under its final name only once fully written.
fn write_image(dir: &Path, path: &Path, png: &[u8]) -> io::Result<()> {
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(png)?;
    file.persist(path)?;
    Ok(())
}
