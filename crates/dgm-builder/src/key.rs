//! Build cache key computation.
//!
//! Provides [`BuildKey`] for computing the content hash that names a rendered
//! image and decides whether a previous render can be reused.

use sha2::{Digest, Sha256};

use crate::{BuildRequest, PostProcess, SizeSpec};

/// Build parameters for cache key computation.
///
/// Contains every parameter that affects the rendered image. The output
/// directory is not part of the key, so a diagram gets the same file name in
/// every directory it is rendered into.
#[derive(Debug, Clone, Copy)]
pub struct BuildKey<'a> {
    /// Declarations in scope, in order.
    pub declarations: &'a [String],
    /// Imported modules, rendering backend included.
    pub imports: &'a [String],
    /// Expression being rendered.
    pub expression: &'a str,
    /// Requested output size.
    pub size: SizeSpec,
    /// Post-processing step, if any.
    pub post_process: Option<PostProcess>,
}

impl<'a> BuildKey<'a> {
    #[must_use]
    pub fn from_request(request: &'a BuildRequest) -> Self {
        Self {
            declarations: &request.declarations,
            imports: &request.imports,
            expression: &request.expression,
            size: request.size,
            post_process: request.post_process,
        }
    }

    /// Compute a content hash for this key.
    ///
    /// # Hash Format
    ///
    /// Hex-encoded SHA-256 over the length-prefixed fields, so that moving
    /// text between adjacent declarations changes the hash.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();

        update_list(&mut hasher, self.declarations);
        update_list(&mut hasher, self.imports);
        update_str(&mut hasher, self.expression);
        update_dimension(&mut hasher, self.size.width);
        update_dimension(&mut hasher, self.size.height);
        match self.post_process {
            None => hasher.update([0u8]),
            Some(PostProcess::CenterPad { factor }) => {
                hasher.update([1u8]);
                hasher.update(factor.to_bits().to_le_bytes());
            }
        }

        hex::encode(hasher.finalize())
    }
}

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn update_list(hasher: &mut Sha256, values: &[String]) {
    hasher.update((values.len() as u64).to_le_bytes());
    for value in values {
        update_str(hasher, value);
    }
}

fn update_dimension(hasher: &mut Sha256, value: Option<f64>) {
    match value {
        None => hasher.update([0u8]),
        Some(v) => {
            hasher.update([1u8]);
            hasher.update(v.to_bits().to_le_bytes());
        }
    }
}
