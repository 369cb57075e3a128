use thiserror::Error;

/// Errors surfaced by the compositor and snapshot extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Pixel extraction was requested outside the surface. This is fatal for
    /// the single operation that asked for it and must not be swallowed.
    #[error("pixel access denied: {width}x{height} region at ({x}, {y}) is outside the surface")]
    PixelAccessDenied { x: i64, y: i64, width: u32, height: u32 },

    /// The render target has a zero dimension. Rendering against it is a
    /// no-op; the caller layer logs and carries on.
    #[error("no drawing surface available")]
    SurfaceUnavailable,
}
