//! Error types for the layout engine

use thiserror::Error;

use crate::host::ShapeId;

/// Errors that can occur while planning or placing a layout
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Alignment or adjacency token that is not recognized
    #[error("invalid position '{token}' (valid positions: {valid})")]
    InvalidPosition { token: String, valid: String },

    /// Bounding-box computation found no contributing geometry
    #[error("no geometry contributes to the bounds of {subject}")]
    EmptyBounds { subject: String },

    /// Size label placeholder not present in an artwork shape
    #[error("size label placeholder '{placeholder}' missing in shape '{shape}'")]
    SizeLabelMissing { shape: String, placeholder: String },

    /// Named artwork piece not found where required
    #[error("required shape '{name}' not found in {container}")]
    MissingRequiredShape { name: String, container: String },

    /// The host could not report geometry for a shape
    #[error("bounds unavailable for shape {shape:?}: {reason}")]
    BoundsUnavailable { shape: ShapeId, reason: String },

    /// The quantity cannot be satisfied on any finite number of canvases
    #[error("capacity exceeded: {reason}")]
    CapacityExceeded { reason: String },

    /// Rotation angle outside the supported quarter turns
    #[error("unsupported rotation of {degrees} degrees (expected 0, ±90 or ±180)")]
    UnsupportedRotation { degrees: f64 },

    /// A caller-supplied parameter is out of range
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Shape handle not known to the host
    #[error("unknown shape {0:?}")]
    UnknownShape(ShapeId),

    /// Canvas handle not known to the host
    #[error("unknown canvas {0}")]
    UnknownCanvas(u32),
}

impl LayoutError {
    /// Create an invalid position error listing the accepted tokens
    pub fn invalid_position(token: impl Into<String>, valid: &[&str]) -> Self {
        Self::InvalidPosition {
            token: token.into(),
            valid: valid.join(", "),
        }
    }

    /// Create an empty bounds error
    pub fn empty_bounds(subject: impl Into<String>) -> Self {
        Self::EmptyBounds {
            subject: subject.into(),
        }
    }

    /// Create a missing size label error
    pub fn size_label_missing(shape: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::SizeLabelMissing {
            shape: shape.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Create a missing shape error
    pub fn missing_shape(name: impl Into<String>, container: impl Into<String>) -> Self {
        Self::MissingRequiredShape {
            name: name.into(),
            container: container.into(),
        }
    }

    /// Create a bounds unavailable error
    pub fn bounds_unavailable(shape: ShapeId, reason: impl Into<String>) -> Self {
        Self::BoundsUnavailable {
            shape,
            reason: reason.into(),
        }
    }

    /// Create a capacity exceeded error
    pub fn capacity(reason: impl Into<String>) -> Self {
        Self::CapacityExceeded {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// The shape this error is about, if any
    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            Self::BoundsUnavailable { shape, .. } => Some(*shape),
            Self::UnknownShape(shape) => Some(*shape),
            _ => None,
        }
    }
}
