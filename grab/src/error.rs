//! Error types for building a grab controller.
//!
//! Nothing on the per-tick path returns these; they surface from configuration and
//! category resolution, before the first tick.

use thiserror::Error;

/// Errors that can occur while configuring the grab controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrabError {
    /// A settings field is out of range or non-finite.
    #[error("Invalid setting `{field}`: {value} ({reason})")]
    InvalidSetting {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// `min_scale_factor` is greater than `max_scale_factor`.
    #[error("Invalid scale range: min {min} > max {max}")]
    InvalidScaleRange { min: f32, max: f32 },

    /// A category name was never registered.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The category registry is full.
    #[error("Too many categories (limit is {0})")]
    TooManyCategories(usize),

    /// The viewpoint collaborator had no pose to offer at construction.
    #[error("No viewpoint available")]
    MissingViewpoint,
}

/// Result type for grab controller configuration.
pub type GrabResult<T> = std::result::Result<T, GrabError>;
