//! Error types for the particle morph viewer.
//!
//! The animation core itself never fails: an unavailable text canvas or a
//! renderer that is not attached yet both degrade to a no-op. These types cover
//! the ambient edges around it (configuration files, fonts, GPU and window
//! setup).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, saving or validating a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is out of its meaningful range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A palette entry that is not a `#RRGGBB` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color `{0}`, expected #RRGGBB")]
pub struct ColorError(pub String);

/// Errors raised while loading a font for the text canvas.
#[derive(Debug, Error)]
pub enum TextError {
    /// The font file could not be read.
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not a usable TrueType/OpenType font.
    #[error("{0} is not a valid font file")]
    InvalidFont(PathBuf),
    /// No configured path was given and none of the known system fonts exist.
    #[error("no bold serif font found in the known system locations")]
    NoFont,
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no texture formats for this adapter.
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,
}

/// Errors that stop the viewer from running.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The scene configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
