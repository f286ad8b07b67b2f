//! Job files: what to lay out, how many, and at what size
//!
//! A job is a small TOML document. The `[job]` table is required; the
//! `[layout]` table overrides [`LayoutConfig`] defaults and the
//! `[artwork]` table describes the source artwork for the headless host.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{Dimension, LayoutConfig, LayoutError, Mode, Orientation};

/// Errors that can occur when loading a job file
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to read job file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse job TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid job: {0}")]
    Invalid(#[from] LayoutError),
}

/// Orientation requested by a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationChoice {
    /// Use the planner's recommendation
    Auto,
    Fixed(Orientation),
}

impl FromStr for OrientationChoice {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(OrientationChoice::Auto)
        } else {
            s.parse().map(OrientationChoice::Fixed)
        }
    }
}

/// Source artwork sizes, in inches
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ArtworkSpec {
    pub front: Dimension,
    pub back: Dimension,
}

/// A complete, validated job
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub quantity: u32,
    pub mode: Mode,
    pub size_label: String,
    /// Target size of each piece, in inches
    pub dimension: Dimension,
    pub orientation: OrientationChoice,
    pub layout: LayoutConfig,
    pub artwork: ArtworkSpec,
}

/// TOML structure for deserializing jobs
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlJobFile {
    job: TomlJob,
    layout: Option<TomlLayout>,
    artwork: Option<ArtworkSpec>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlJob {
    quantity: u32,
    mode: String,
    size_label: String,
    width: f64,
    height: f64,
    orientation: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLayout {
    gap: Option<f64>,
    canvas_max_width: Option<f64>,
    canvas_max_height: Option<f64>,
    label_placeholder: Option<String>,
    front_name: Option<String>,
    back_name: Option<String>,
    rotate_to_fit: Option<bool>,
}

impl TomlLayout {
    fn apply(self, mut config: LayoutConfig) -> LayoutConfig {
        if let Some(gap) = self.gap {
            config.gap = gap;
        }
        if let Some(width) = self.canvas_max_width {
            config.canvas_max_width = width;
        }
        if let Some(height) = self.canvas_max_height {
            config.canvas_max_height = height;
        }
        if let Some(name) = self.label_placeholder {
            config.label_placeholder = name;
        }
        if let Some(name) = self.front_name {
            config.front_name = name;
        }
        if let Some(name) = self.back_name {
            config.back_name = name;
        }
        if let Some(rotate) = self.rotate_to_fit {
            config.rotate_to_fit = rotate;
        }
        config
    }
}

impl Job {
    /// Load a job from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, JobError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a job from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, JobError> {
        let parsed: TomlJobFile = toml::from_str(content)?;
        let job = parsed.job;

        let dimension = Dimension::new(job.width, job.height);
        if !dimension.is_positive() {
            return Err(LayoutError::invalid_parameter(
                "dimension",
                format!("piece size {}x{} must be positive", job.width, job.height),
            )
            .into());
        }
        if job.quantity == 0 {
            return Err(
                LayoutError::invalid_parameter("quantity", "at least one garment is required")
                    .into(),
            );
        }

        let orientation = match job.orientation.as_deref() {
            Some(token) => token.parse()?,
            None => OrientationChoice::Auto,
        };
        let layout = match parsed.layout {
            Some(overrides) => overrides.apply(LayoutConfig::default()),
            None => LayoutConfig::default(),
        };

        Ok(Job {
            quantity: job.quantity,
            mode: job.mode.parse()?,
            size_label: job.size_label,
            dimension,
            orientation,
            layout,
            artwork: parsed.artwork.unwrap_or(ArtworkSpec {
                front: dimension,
                back: dimension,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_JOB: &str = r#"
[job]
quantity = 8
mode = "FB"
size_label = "M"
width = 20.5
height = 30.0
orientation = "auto"

[layout]
gap = 0.25
canvas_max_width = 22.0

[artwork]
front = { width = 10.0, height = 12.0 }
back = { width = 11.0, height = 12.0 }
"#;

    #[test]
    fn test_parse_full_job() {
        let job = Job::from_str(FULL_JOB).unwrap();
        assert_eq!(job.quantity, 8);
        assert_eq!(job.mode, Mode::FB);
        assert_eq!(job.size_label, "M");
        assert_eq!(job.dimension, Dimension::new(20.5, 30.0));
        assert_eq!(job.orientation, OrientationChoice::Auto);
        assert_eq!(job.layout.gap, 0.25);
        assert_eq!(job.layout.canvas_max_width, 22.0);
        assert_eq!(job.layout.canvas_max_height, 200.0);
        assert_eq!(job.artwork.back, Dimension::new(11.0, 12.0));
    }

    #[test]
    fn test_defaults_when_tables_missing() {
        let job = Job::from_str(
            r#"
[job]
quantity = 3
mode = "pant"
size_label = "XS"
width = 8.0
height = 4.0
orientation = "horizontal"
"#,
        )
        .unwrap();
        assert_eq!(job.mode, Mode::Pant);
        assert_eq!(job.orientation, OrientationChoice::Fixed(Orientation::Horizontal));
        assert_eq!(job.layout, LayoutConfig::default());
        assert_eq!(job.artwork.front, Dimension::new(8.0, 4.0));
    }

    #[test]
    fn test_unknown_mode_is_invalid() {
        let err = Job::from_str(
            r#"
[job]
quantity = 3
mode = "XL"
size_label = "XS"
width = 8.0
height = 4.0
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            JobError::Invalid(LayoutError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_quantity_is_invalid() {
        let err = Job::from_str(
            r#"
[job]
quantity = 0
mode = "B"
size_label = "S"
width = 8.0
height = 4.0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, JobError::Invalid(_)));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Job::from_str("[job\nquantity = ");
        assert!(matches!(result, Err(JobError::ParseError(_))));
    }
}
