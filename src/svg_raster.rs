use crate::error::{PringsError, PringsResult};

/// Refuse pathological surface allocations; exports are capped well below
/// this, so hitting it means a caller bug.
const MAX_DIM: u32 = 16_384;

/// Rasterize an overlay tree into premultiplied RGBA8 at exactly
/// `width x height`, scaling the tree's own size to fill the target.
pub fn rasterize_overlay(tree: &usvg::Tree, width: u32, height: u32) -> PringsResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(PringsError::invalid_dimensions(format!(
            "overlay raster size must be non-zero, got {width}x{height}"
        )));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(PringsError::invalid_dimensions(format!(
            "overlay raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(PringsError::image_decode(
            "overlay svg has invalid width/height".to_string(),
        ));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        PringsError::canvas_unavailable(format!("failed to allocate {width}x{height} overlay pixmap"))
    })?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
