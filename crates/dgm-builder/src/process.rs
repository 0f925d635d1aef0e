//! Builder backed by an external renderer process.
//!
//! The renderer receives the [`BuildRequest`] as JSON on stdin and answers
//! through its exit status:
//!
//! | Exit status          | Meaning                     | Payload                 |
//! |----------------------|-----------------------------|-------------------------|
//! | 0                    | rendered                    | PNG bytes on stdout     |
//! | [`EXIT_PARSE_ERROR`] | source failed to parse      | message on stderr       |
//! | anything else        | source failed to evaluate   | message on stderr       |

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use crate::key::BuildKey;
use crate::{BuildError, BuildOutcome, BuildRequest, DiagramBuilder, image_path};

/// Exit status a renderer uses to report a parse failure (`EX_DATAERR`).
pub const EXIT_PARSE_ERROR: i32 = 65;

/// Content-addressed builder that shells out to a renderer program.
///
/// # Example
///
/// ```no_run
/// use dgm_builder::ProcessBuilder;
///
/// let builder = ProcessBuilder::new("dgm-render").args(["--backend", "raster"]);
/// ```
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments passed to the renderer on every call.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn run(&self, request: &BuildRequest) -> Result<Output, BuildError> {
        let payload = serde_json::to_vec(request)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BuildError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // A renderer that exits before reading the request reports through
        // its exit status, not through the closed pipe.
        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(&payload)
            && e.kind() != ErrorKind::BrokenPipe
        {
            return Err(e.into());
        }

        Ok(child.wait_with_output()?)
    }
}

impl DiagramBuilder for ProcessBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        let hash = BuildKey::from_request(request).compute_hash();
        let path = image_path(&request.output_dir, &hash);

        if path.is_file() {
            tracing::debug!(hash = %hash, path = %path.display(), "diagram cache hit");
            return Ok(BuildOutcome::Skipped { hash });
        }

        tracing::debug!(
            hash = %hash,
            program = %self.program.display(),
            "running diagram renderer"
        );
        let output = self.run(request)?;

        let outcome = match output.status.code() {
            Some(0) if output.stdout.is_empty() => {
                BuildOutcome::InterpError("renderer produced no image".to_owned())
            }
            Some(0) => BuildOutcome::Built {
                hash,
                png: output.stdout,
            },
            Some(EXIT_PARSE_ERROR) => BuildOutcome::ParseError(failure_message(&output)),
            _ => BuildOutcome::InterpError(failure_message(&output)),
        };
        Ok(outcome)
    }
}

/// Renderer stderr, or the exit status when stderr is empty.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("renderer exited with {}", output.status)
    } else {
        stderr.to_owned()
    }
}
