//! Configuration for pdfplan.
//!
//! A [`WorkspaceConfig`] gathers every tunable of an editing session:
//! - The import size ceiling and import parallelism
//! - Export behavior (compression, rotation, document metadata)
//! - Preview zoom bounds, thumbnail scale and device pixel ratio
//!
//! Configurations can be built in code, or deserialized from JSON where
//! missing fields fall back to their defaults.
//!
//! # Examples
//!
//! ```
//! use pdfplan::config::WorkspaceConfig;
//!
//! let config = WorkspaceConfig::from_json_str(r#"{ "maxFileSize": 1048576 }"#).unwrap();
//! assert_eq!(config.max_file_size, 1_048_576);
//! assert!(config.export.compress);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PdfPlanError, Result};

/// Default import ceiling: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Page rotation in degrees, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    /// Upright.
    #[default]
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Clockwise270,
}

impl Rotation {
    /// Parse rotation from degrees.
    ///
    /// Any multiple of 90 is accepted and normalized into `0..360`, so
    /// `-90` is the same as `270`.
    ///
    /// # Errors
    ///
    /// Returns an error if the degrees value is not a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PdfPlanError::invalid_config(format!(
                "Invalid rotation: {degrees}. Must be a multiple of 90"
            ))),
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Combine two rotations.
    pub fn rotate_by(self, other: Rotation) -> Self {
        match (self.as_degrees() + other.as_degrees()) % 360 {
            90 => Self::Clockwise90,
            180 => Self::Rotate180,
            270 => Self::Clockwise270,
            _ => Self::None,
        }
    }

    /// Whether the rotation swaps a page's width and height.
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Self::Clockwise90 | Self::Clockwise270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = PdfPlanError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.as_degrees()
    }
}

/// PDF metadata to set on exported documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }
}

/// Options controlling how a plan is turned into a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Compress content streams of the output.
    pub compress: bool,

    /// Add each entry's rotation to the copied page's `/Rotate`.
    pub apply_rotation: bool,

    /// Info dictionary fields for the output.
    pub metadata: Metadata,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compress: true,
            apply_rotation: true,
            metadata: Metadata::default(),
        }
    }
}

/// Preview and thumbnail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    /// Zoom applied to a fresh workspace.
    pub default_zoom: f32,
    /// Smallest zoom reachable with zoom out.
    pub min_zoom: f32,
    /// Largest zoom reachable with zoom in.
    pub max_zoom: f32,
    /// Increment used by zoom in/out.
    pub zoom_step: f32,
    /// Scale used for thumbnails.
    pub thumbnail_scale: f32,
    /// Device pixels per CSS pixel.
    pub device_pixel_ratio: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            default_zoom: 1.0,
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.25,
            thumbnail_scale: 0.3,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Complete configuration of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Largest file accepted by import, in bytes.
    pub max_file_size: u64,

    /// Number of files parsed concurrently by a batch import.
    pub import_workers: usize,

    /// Export settings.
    pub export: ExportOptions,

    /// Preview settings.
    pub preview: PreviewConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            import_workers: 4,
            export: ExportOptions::default(),
            preview: PreviewConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PdfPlanError::invalid_config(format!("Malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid
    /// configuration.
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            PdfPlanError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PdfPlanError::other(e.to_string()))
    }

    /// Check that the values are usable together.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            return Err(PdfPlanError::invalid_config(
                "maxFileSize must be greater than zero",
            ));
        }

        if self.import_workers == 0 {
            return Err(PdfPlanError::invalid_config(
                "importWorkers must be at least 1",
            ));
        }

        let preview = &self.preview;
        if !(preview.min_zoom > 0.0 && preview.min_zoom <= preview.max_zoom) {
            return Err(PdfPlanError::invalid_config(format!(
                "Zoom bounds must satisfy 0 < minZoom <= maxZoom (got {} and {})",
                preview.min_zoom, preview.max_zoom
            )));
        }

        if !(preview.min_zoom..=preview.max_zoom).contains(&preview.default_zoom) {
            return Err(PdfPlanError::invalid_config(format!(
                "defaultZoom {} is outside {}..={}",
                preview.default_zoom, preview.min_zoom, preview.max_zoom
            )));
        }

        if preview.zoom_step <= 0.0 {
            return Err(PdfPlanError::invalid_config("zoomStep must be positive"));
        }

        if preview.thumbnail_scale <= 0.0 || preview.device_pixel_ratio <= 0.0 {
            return Err(PdfPlanError::invalid_config(
                "thumbnailScale and devicePixelRatio must be positive",
            ));
        }

        Ok(())
    }
}
