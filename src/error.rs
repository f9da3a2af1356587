//! Error types for the galaxy scene.
//!
//! Simulation code only fails on bad configuration; everything else degrades
//! to "nothing renders". GPU and window errors only come from the viewer.

use thiserror::Error;

/// Invalid generation or layout parameters.
///
/// These are caller contract violations: the components refuse to build
/// rather than divide by zero later in a frame callback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A galaxy needs at least one spiral arm.
    #[error("galaxy branches must be >= 1, got {0}")]
    NoBranches(u32),
    /// Radius used as a divisor for colour mixing.
    #[error("galaxy radius must be > 0, got {0}")]
    NonPositiveRadius(f32),
    /// Durations are used as divisors for progress.
    #[error("{what} duration must be > 0 seconds, got {value}")]
    NonPositiveDuration {
        /// Which duration was rejected.
        what: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Sprite sizes are drawn from a range that must stay above zero.
    #[error("{what} size must be > 0, got {value}")]
    NonPositiveSize {
        /// Which size was rejected.
        what: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A `min..max` pair whose upper bound does not clear its lower bound.
    #[error("{what} range is empty or inverted: min {min}, max {max}")]
    InvertedRange {
        /// Which range was rejected.
        what: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// A numeric parameter was NaN or infinite.
    #[error("parameter `{0}` must be finite")]
    NotFinite(&'static str),
    /// The orbital layout divides by the node count.
    #[error("orbital menu needs at least one item")]
    EmptyOrbit,
    /// Two orbital items share an id.
    #[error("duplicate orbital item id {0}")]
    DuplicateItem(u32),
    /// Colour strings must be 6 hex digits with an optional leading `#`.
    #[error("invalid hex colour `{0}`")]
    InvalidColor(String),
    /// Unknown quality tier name.
    #[error("unknown device tier `{0}` (expected mobile, tablet or desktop)")]
    UnknownTier(String),
    /// A gradient needs at least one colour stop.
    #[error("gradient needs at least one colour stop")]
    EmptyGradient,
}

/// Errors that can occur while loading a scene configuration file.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Failed to read the file from disk.
    #[error("failed to read scene config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid RON for a [`SceneConfig`](crate::config::SceneConfig).
    #[error("failed to parse scene config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The file parsed but describes an invalid scene.
    #[error("invalid scene config: {0}")]
    Invalid(#[from] ConfigError),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no supported formats.
    #[error("surface has no supported texture formats")]
    NoSurfaceFormat,
}

/// Errors that can occur when running the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The scene could not be built from its configuration.
    #[error("scene error: {0}")]
    Scene(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::NoBranches(0).to_string(),
            "galaxy branches must be >= 1, got 0"
        );
        let err = ConfigError::NonPositiveDuration { what: "comet", value: 0.0 };
        assert!(err.to_string().contains("comet"));
    }

    #[test]
    fn test_preset_error_wraps_config_error() {
        let err: PresetError = ConfigError::EmptyOrbit.into();
        assert!(matches!(err, PresetError::Invalid(ConfigError::EmptyOrbit)));
    }
}
