//! silhouette-core: trace the silhouette of an image and draw a border
//! around it (sans-IO).
//!
//! The pipeline is:
//! alpha mask -> region labelling + contour tracing -> path building
//! (cached per [`BorderState`]) -> inset transform -> stroke -> overlay.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! images and byte slices. File handling lives in the `silhouette` CLI.

pub mod border;
pub mod contour;
pub mod decode;
pub mod diagnostics;
pub mod labels;
pub mod mask;
pub mod tracer;
pub mod types;

pub use border::{BorderState, TracedBorder, effective_stroke_width, inset_transform, process};
pub use contour::{Contour, ContourKind, RegionId, contours_to_paths};
pub use diagnostics::{TraceDiagnostics, trace_image};
pub use labels::{LabelCell, LabelGrid};
pub use mask::{ALPHA_THRESHOLD, PixelMask};
pub use tracer::{TraceResult, trace};
pub use types::{
    BorderConfig, BorderError, Color, Dimensions, GridPoint, ParseColorError, RgbaImage,
};

/// Decode image bytes and draw the border of their silhouette.
///
/// Convenience wrapper around [`decode::decode_rgba`] and [`process`].
/// The decoded image is traced only if `state` has no cached trace yet.
///
/// # Errors
///
/// Returns [`BorderError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`BorderError::ImageDecode`] if the image format is unrecognized.
pub fn process_bytes(image_bytes: &[u8], state: &BorderState) -> Result<RgbaImage, BorderError> {
    let source = decode::decode_rgba(image_bytes)?;
    Ok(process(&source, state))
}
