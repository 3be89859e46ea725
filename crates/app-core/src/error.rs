use thiserror::Error;

/// Rasterization or GPU resource creation failed. Recoverable: the affected
/// slot keeps its previous visual and creation is retried on a later tick.
#[derive(Debug, Error)]
#[error("resource creation failed: {0}")]
pub struct ResourceError(pub String);

/// The platform rejected a playback start (autoplay policy, missing media,
/// I/O). Surfaced to the UI label; the session stays in its prior state.
#[derive(Debug, Clone, Error)]
#[error("playback rejected: {0}")]
pub struct PlaybackError(pub String);

/// A required peripheral (DOM element, canvas context) was missing at
/// startup. Fatal to that component only: it logs and disables itself.
#[derive(Debug, Error)]
#[error("missing peripheral: {0}")]
pub struct InitializationError(pub &'static str);
