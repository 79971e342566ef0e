use std::io::Cursor;

use anyhow::Context as _;

use crate::blend;
use crate::decode;
use crate::error::{PringsError, PringsResult};
use crate::fit;
use crate::ring::{self, RingParams};
use crate::state::ExportStatus;
use crate::svg_raster;

/// Exports never exceed this many CSS pixels per side; source photos smaller
/// than the cap are never upscaled.
pub const EXPORT_SIZE_CAP: u32 = 800;

/// Fixed artifact name handed to the download trigger.
pub const EXPORT_FILENAME: &str = "prings.png";

/// The final composited bitmap, already PNG-encoded. Write-once, one per
/// export action.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Export side length in CSS pixels: capped, never upscaled, always square.
pub fn export_size(photo_width: u32, photo_height: u32) -> u32 {
    photo_width.min(photo_height).min(EXPORT_SIZE_CAP)
}

/// Compose the photo and ring overlay into the export artifact.
///
/// The overlay is regenerated from the parameters, rasterized at the full
/// output resolution, and drawn over the cover-fit photo. Both decode steps
/// complete before the first blit; on any failure no artifact is produced.
#[tracing::instrument(skip(photo, params), fields(text_len = params.text.len()))]
pub fn compose(
    photo: &image::RgbaImage,
    params: &RingParams,
    device_pixel_ratio: f64,
) -> PringsResult<ExportArtifact> {
    params.validate()?;

    let (photo_w, photo_h) = photo.dimensions();
    if photo_w == 0 || photo_h == 0 {
        return Err(PringsError::invalid_dimensions(
            "photo must be non-empty".to_string(),
        ));
    }
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return Err(PringsError::invalid_dimensions(format!(
            "device pixel ratio must be finite and > 0, got {device_pixel_ratio}"
        )));
    }

    let side_css = export_size(photo_w, photo_h);
    let side_px = (f64::from(side_css) * device_pixel_ratio).round().max(1.0) as u32;

    // Overlay first: it must be fully decoded before any blit happens.
    let markup = ring::overlay_svg(params, ring::RING_DIAMETER)?;
    let overlay_tree = decode::parse_overlay_svg(&markup)?;
    let overlay = svg_raster::rasterize_overlay(&overlay_tree, side_px, side_px)?;

    // Cover-fit the photo onto the output surface; crop-skipped photos may be
    // non-square, the surface never is.
    let placed = fit::cover(
        f64::from(side_px),
        f64::from(side_px),
        f64::from(photo_w),
        f64::from(photo_h),
    )?;
    let scaled = image::imageops::resize(
        photo,
        placed.width.round().max(1.0) as u32,
        placed.height.round().max(1.0) as u32,
        image::imageops::FilterType::Triangle,
    );

    let mut surface = image::RgbaImage::new(side_px, side_px);
    image::imageops::overlay(
        &mut surface,
        &scaled,
        placed.offset_x.round() as i64,
        placed.offset_y.round() as i64,
    );

    let mut pixels = surface.into_raw();
    blend::premultiply_rgba8_in_place(&mut pixels);
    blend::over_in_place(&mut pixels, &overlay, 1.0)?;
    blend::unpremultiply_rgba8_in_place(&mut pixels);

    let composed = image::RgbaImage::from_raw(side_px, side_px, pixels).ok_or_else(|| {
        PringsError::canvas_unavailable(format!("failed to assemble {side_px}x{side_px} surface"))
    })?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(composed)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode export png")?;

    Ok(ExportArtifact {
        filename: EXPORT_FILENAME,
        width: side_px,
        height: side_px,
        png,
    })
}

/// Export driver with the `idle -> pending -> (resolved | error)` lifecycle.
/// A pending export blocks re-triggering; an error re-enables retry.
#[derive(Debug, Default)]
pub struct Exporter {
    status: ExportStatus,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ExportStatus {
        self.status
    }

    pub fn export(
        &mut self,
        photo: &image::RgbaImage,
        params: &RingParams,
        device_pixel_ratio: f64,
    ) -> PringsResult<ExportArtifact> {
        if !self.status.can_begin() {
            return Err(PringsError::validation(
                "an export is already in flight".to_string(),
            ));
        }

        self.status = ExportStatus::Pending;
        match compose(photo, params, device_pixel_ratio) {
            Ok(artifact) => {
                self.status = ExportStatus::Resolved;
                Ok(artifact)
            }
            Err(err) => {
                self.status = ExportStatus::Error;
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        self.status = ExportStatus::Idle;
    }
}
