#![forbid(unsafe_code)]

pub mod blend;
pub mod color;
pub mod crop;
pub mod decode;
pub mod error;
pub mod export;
pub mod fit;
pub mod ring;
pub mod sampler;
pub mod state;
pub mod svg_raster;

pub use color::Rgb;
pub use crop::{CropRegion, PixelRect, Squareness, crop_to_rect, crop_window};
pub use decode::{decode_photo, parse_overlay_svg};
pub use error::{PringsError, PringsResult};
pub use export::{EXPORT_FILENAME, EXPORT_SIZE_CAP, ExportArtifact, Exporter, compose, export_size};
pub use fit::{FitRect, contain, cover, cover_aligned};
pub use ring::{RING_DIAMETER, RingGeometry, RingParams, overlay_svg, ring_path, text_anchor};
pub use sampler::{CoalescedPointer, PickerSession, SamplerSurface};
pub use state::{ColorTarget, ExportStatus, RingAction, update_ring};
