//! Output size parsing.
//!
//! Malformed sizes are never an error: a dimension that fails to parse is
//! simply left unconstrained.

use dgm_builder::SizeSpec;
use dgm_doc::Attr;

/// Size from a node's `width` / `height` attributes.
#[must_use]
pub fn size_from_attrs(attr: &Attr) -> SizeSpec {
    SizeSpec::new(
        parse_dimension(attr.get("width")),
        parse_dimension(attr.get("height")),
    )
}

/// Parse a `<width>x<height>` string such as `400x300`.
///
/// Returns `None` unless both sides are valid dimensions.
#[must_use]
pub fn parse_imgsize(value: &str) -> Option<SizeSpec> {
    let (width, height) = value.trim().split_once('x')?;
    Some(SizeSpec::exact(
        parse_dimension(Some(width))?,
        parse_dimension(Some(height))?,
    ))
}

/// Positive, finite number.
fn parse_dimension(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
