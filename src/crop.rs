use crate::error::{PringsError, PringsResult};

pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 3.0;

/// User-selected pan + zoom over a source image.
///
/// `offset` displaces the crop window's center from the image center, as a
/// fraction of the source dimensions; `(0, 0)` keeps the window centered.
/// Reset to defaults whenever a new source image is loaded.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropRegion {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
}

impl Default for CropRegion {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl CropRegion {
    pub fn validate(&self) -> PringsResult<()> {
        if !self.zoom.is_finite() || self.zoom < ZOOM_MIN || self.zoom > ZOOM_MAX {
            return Err(PringsError::invalid_crop_region(format!(
                "zoom must be within [{ZOOM_MIN}, {ZOOM_MAX}], got {}",
                self.zoom
            )));
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(PringsError::invalid_crop_region(
                "crop offsets must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// A rectangle in source-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Whether [`crop_to_rect`] must insist on a square rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Squareness {
    Required,
    Any,
}

/// Derive the square crop viewport in source pixel space from a region.
///
/// The side is `min(width, height) / zoom`; the window is centered, panned
/// by the region's offset, then clamped fully inside the source bounds.
pub fn crop_window(
    source_width: u32,
    source_height: u32,
    region: &CropRegion,
) -> PringsResult<PixelRect> {
    if source_width == 0 || source_height == 0 {
        return Err(PringsError::invalid_dimensions(format!(
            "source must be non-empty, got {source_width}x{source_height}"
        )));
    }
    region.validate()?;

    let w = f64::from(source_width);
    let h = f64::from(source_height);
    let side = (w.min(h) / region.zoom).round().max(1.0);

    let center_x = w / 2.0 + region.offset_x * w;
    let center_y = h / 2.0 + region.offset_y * h;

    let x = (center_x - side / 2.0).round().clamp(0.0, w - side);
    let y = (center_y - side / 2.0).round().clamp(0.0, h - side);

    Ok(PixelRect {
        x: x as u32,
        y: y as u32,
        width: side as u32,
        height: side as u32,
    })
}

/// Blit `rect` 1:1 from the photo onto a new `rect.width x rect.height`
/// bitmap.
///
/// The rectangle is trusted as reported by the crop widget; the engine only
/// checks bounds, and squareness when the caller requires square output.
pub fn crop_to_rect(
    photo: &image::RgbaImage,
    rect: PixelRect,
    squareness: Squareness,
) -> PringsResult<image::RgbaImage> {
    if rect.width == 0 || rect.height == 0 {
        return Err(PringsError::invalid_crop_region(format!(
            "crop rect must be non-empty, got {}x{}",
            rect.width, rect.height
        )));
    }
    if squareness == Squareness::Required && rect.width != rect.height {
        return Err(PringsError::invalid_crop_region(format!(
            "square output required but crop rect is {}x{}",
            rect.width, rect.height
        )));
    }

    let (src_w, src_h) = photo.dimensions();
    let within = rect
        .x
        .checked_add(rect.width)
        .is_some_and(|right| right <= src_w)
        && rect
            .y
            .checked_add(rect.height)
            .is_some_and(|bottom| bottom <= src_h);
    if !within {
        return Err(PringsError::invalid_crop_region(format!(
            "crop rect {}x{}+{}+{} exceeds source {}x{}",
            rect.width, rect.height, rect.x, rect.y, src_w, src_h
        )));
    }

    Ok(image::imageops::crop_imm(photo, rect.x, rect.y, rect.width, rect.height).to_image())
}
