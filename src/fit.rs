use crate::error::{PringsError, PringsResult};

/// A child rectangle scaled and placed inside (or over) a parent box.
///
/// Offsets are the child's top-left relative to the parent's top-left; under
/// cover semantics they are zero or negative for the overflowing dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FitMode {
    /// Child fully covers the parent; overflow is cropped.
    Cover,
    /// Child fits fully inside the parent; leftover space is padding.
    Contain,
}

/// Scale the child to fully cover the parent, preserving the child's aspect
/// ratio, centered.
pub fn cover(
    parent_width: f64,
    parent_height: f64,
    child_width: f64,
    child_height: f64,
) -> PringsResult<FitRect> {
    fit(
        FitMode::Cover,
        parent_width,
        parent_height,
        child_width,
        child_height,
        1.0,
        0.5,
        0.5,
    )
}

/// [`cover`] with an explicit alignment pair in `[0,1]²` (0.5/0.5 centers).
pub fn cover_aligned(
    parent_width: f64,
    parent_height: f64,
    child_width: f64,
    child_height: f64,
    align_x: f64,
    align_y: f64,
) -> PringsResult<FitRect> {
    fit(
        FitMode::Cover,
        parent_width,
        parent_height,
        child_width,
        child_height,
        1.0,
        align_x,
        align_y,
    )
}

/// Scale the child to fit fully inside the parent, preserving the child's
/// aspect ratio, centered.
pub fn contain(
    parent_width: f64,
    parent_height: f64,
    child_width: f64,
    child_height: f64,
) -> PringsResult<FitRect> {
    fit(
        FitMode::Contain,
        parent_width,
        parent_height,
        child_width,
        child_height,
        1.0,
        0.5,
        0.5,
    )
}

#[allow(clippy::too_many_arguments)]
fn fit(
    mode: FitMode,
    parent_width: f64,
    parent_height: f64,
    child_width: f64,
    child_height: f64,
    scale: f64,
    align_x: f64,
    align_y: f64,
) -> PringsResult<FitRect> {
    for (name, v) in [
        ("parent width", parent_width),
        ("parent height", parent_height),
        ("child width", child_width),
        ("child height", child_height),
        ("scale", scale),
    ] {
        if !v.is_finite() || v <= 0.0 {
            return Err(PringsError::invalid_dimensions(format!(
                "{name} must be finite and > 0, got {v}"
            )));
        }
    }

    let child_ratio = child_width / child_height;
    let parent_ratio = parent_width / parent_height;

    let mut width = parent_width * scale;
    let mut height = parent_height * scale;

    let child_relatively_wider = child_ratio > parent_ratio;
    let fix_width = match mode {
        FitMode::Contain => child_relatively_wider,
        FitMode::Cover => !child_relatively_wider,
    };

    if fix_width {
        height = width / child_ratio;
    } else {
        width = height * child_ratio;
    }

    Ok(FitRect {
        width,
        height,
        offset_x: (parent_width - width) * align_x,
        offset_y: (parent_height - height) * align_y,
    })
}
