//! Argument checks shared by endpoint methods
//!
//! Every check runs before any network activity and reports failures as
//! [`Error::Validation`](crate::Error::Validation) naming the offending field.

use std::fmt::Display;

use crate::{Error, Result};

/// Shallowest graph traversal accepted
pub const MIN_GRAPH_DEPTH: u32 = 1;
/// Deepest graph traversal accepted
pub const MAX_GRAPH_DEPTH: u32 = 10;
/// Smallest look-back window, in days
pub const MIN_DAY_WINDOW: u32 = 1;

/// Reject empty or whitespace-only text
pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Reject ids that cannot stand as a single URL path segment
///
/// `.` and `..`, including their `%2e` spellings, are resolved as dot
/// segments and would retarget the request at a parent resource.
pub fn require_path_id(field: &str, value: &str) -> Result<()> {
    require_non_blank(field, value)?;
    if is_dot_segment(value) {
        return Err(Error::validation(
            field,
            format!("{} must not be a relative path segment, got {:?}", field, value),
        ));
    }
    Ok(())
}

/// Whether a URL parser would treat `segment` as `.` or `..`
pub fn is_dot_segment(segment: &str) -> bool {
    let normalized = segment.to_ascii_lowercase().replace("%2e", ".");
    normalized == "." || normalized == ".."
}

/// Reject values outside `min..=max`
pub fn require_range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(Error::validation(
            field,
            format!("{} must be between {} and {}, got {}", field, min, max, value),
        ));
    }
    Ok(())
}

/// Reject values below `min`
pub fn require_min<T>(field: &str, value: T, min: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if value < min {
        return Err(Error::validation(
            field,
            format!("{} must be at least {}, got {}", field, min, value),
        ));
    }
    Ok(())
}

/// Reject scores outside `[0, 1]`, including NaN
pub fn require_unit_interval(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::validation(
            field,
            format!("{} must be between 0 and 1, got {}", field, value),
        ));
    }
    Ok(())
}

/// [`require_unit_interval`] for optional fields
pub fn optional_unit_interval(field: &str, value: Option<f64>) -> Result<()> {
    value.map_or(Ok(()), |v| require_unit_interval(field, v))
}

/// [`require_min`] for optional fields
pub fn optional_min<T>(field: &str, value: Option<T>, min: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    value.map_or(Ok(()), |v| require_min(field, v, min))
}

/// [`require_range`] for optional fields
pub fn optional_range<T>(field: &str, value: Option<T>, min: T, max: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    value.map_or(Ok(()), |v| require_range(field, v, min, max))
}
