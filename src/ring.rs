use kurbo::{Arc, BezPath, ParamCurve, ParamCurveArclen, Point, Shape, Vec2};

use crate::color::Rgb;
use crate::error::{PringsError, PringsResult};

/// Display diameter the product renders the ring at, in display units.
pub const RING_DIAMETER: f64 = 320.0;

/// Distance from the outer display edge to the ring's center line.
pub const RING_INSET: f64 = 26.25;

/// Stroke width of the ring band. Fixed regardless of diameter; the visual
/// proportions only hold at [`RING_DIAMETER`].
pub const RING_STROKE_WIDTH: f64 = 52.5;

/// Smallest diameter for which the ring radius stays positive.
pub const MIN_RING_DIAMETER: f64 = 2.0 * RING_INSET;

/// CSS pixels per rem at the default root font size.
const PX_PER_REM: f64 = 16.0;

/// Gradient anchor points, fixed in user space independent of diameter.
const GRADIENT_START: (f64, f64) = (195.0, 260.0);
const GRADIENT_END: (f64, f64) = (234.0, 197.0);

pub const FONT_SIZE_REM_MIN: f64 = 1.0;
pub const FONT_SIZE_REM_MAX: f64 = 3.0;
pub const TEXT_START_OFFSET_PCT_MIN: f64 = 0.0;
pub const TEXT_START_OFFSET_PCT_MAX: f64 = 100.0;

/// Everything the user can tune about the ring overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RingParams {
    pub text: String,
    pub text_color: Rgb,
    pub ring_color: Rgb,
    pub fade_color: Rgb,
    pub font_family: String,
    pub font_size_rem: f64,
    pub text_start_offset_pct: f64,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            text: "#Bought Twitter".to_string(),
            text_color: Rgb::new(0xFF, 0xFF, 0xFF),
            ring_color: Rgb::new(0x54, 0x87, 0x3C),
            fade_color: Rgb::new(0x00, 0x00, 0x00),
            font_family: "sans-serif".to_string(),
            font_size_rem: 2.25,
            text_start_offset_pct: 2.0,
        }
    }
}

impl RingParams {
    pub fn validate(&self) -> PringsResult<()> {
        if !self.font_size_rem.is_finite()
            || self.font_size_rem < FONT_SIZE_REM_MIN
            || self.font_size_rem > FONT_SIZE_REM_MAX
        {
            return Err(PringsError::validation(format!(
                "font_size_rem must be within [{FONT_SIZE_REM_MIN}, {FONT_SIZE_REM_MAX}], got {}",
                self.font_size_rem
            )));
        }
        if !self.text_start_offset_pct.is_finite()
            || self.text_start_offset_pct < TEXT_START_OFFSET_PCT_MIN
            || self.text_start_offset_pct > TEXT_START_OFFSET_PCT_MAX
        {
            return Err(PringsError::validation(format!(
                "text_start_offset_pct must be within [{TEXT_START_OFFSET_PCT_MIN}, {TEXT_START_OFFSET_PCT_MAX}], got {}",
                self.text_start_offset_pct
            )));
        }
        Ok(())
    }
}

/// Ring placement derived from a display diameter. Never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingGeometry {
    pub center: Point,
    pub radius: f64,
    pub stroke_width: f64,
}

impl RingGeometry {
    pub fn for_diameter(diameter: f64) -> PringsResult<Self> {
        if !diameter.is_finite() || diameter < MIN_RING_DIAMETER {
            return Err(PringsError::invalid_dimensions(format!(
                "ring diameter must be finite and >= {MIN_RING_DIAMETER}, got {diameter}"
            )));
        }
        let half = diameter / 2.0;
        Ok(Self {
            center: Point::new(half, half),
            radius: half - RING_INSET,
            stroke_width: RING_STROKE_WIDTH,
        })
    }
}

/// The ring's center line as a closed path: a full circle built from two 180°
/// arcs, starting at the 9 o'clock point and sweeping through the bottom.
///
/// The sweep direction matches the SVG `d` attribute emitted by
/// [`overlay_svg`], so arclength offsets along this path and `startOffset`
/// percentages on the text path agree.
pub fn ring_path(diameter: f64) -> PringsResult<BezPath> {
    let geo = RingGeometry::for_diameter(diameter)?;
    let radii = Vec2::new(geo.radius, geo.radius);

    let mut path = BezPath::new();
    path.move_to(Point::new(geo.center.x - geo.radius, geo.center.y));
    for start_angle in [std::f64::consts::PI, 0.0] {
        let arc = Arc::new(geo.center, radii, start_angle, -std::f64::consts::PI, 0.0);
        arc.to_cubic_beziers(1e-3, |p1, p2, p3| path.curve_to(p1, p2, p3));
    }
    Ok(path)
}

/// Total arclength of the ring path (the "100%" that `startOffset` is
/// measured against).
pub fn path_length(path: &BezPath) -> f64 {
    path.perimeter(1e-6)
}

/// Point on the ring path where text starting at `offset_pct` percent is
/// anchored.
pub fn text_anchor(offset_pct: f64, diameter: f64) -> PringsResult<Point> {
    if !(TEXT_START_OFFSET_PCT_MIN..=TEXT_START_OFFSET_PCT_MAX).contains(&offset_pct) {
        return Err(PringsError::validation(format!(
            "text start offset must be within [0, 100], got {offset_pct}"
        )));
    }
    let path = ring_path(diameter)?;
    let target = path_length(&path) * (offset_pct / 100.0);

    let mut remaining = target;
    let mut last = None;
    for seg in path.segments() {
        let len = seg.arclen(1e-9);
        if remaining <= len {
            let t = seg.inv_arclen(remaining, 1e-9);
            return Ok(seg.eval(t));
        }
        remaining -= len;
        last = Some(seg);
    }
    // offset_pct == 100 lands exactly on the path end.
    last.map(|seg| seg.eval(1.0))
        .ok_or_else(|| PringsError::invalid_dimensions("ring path has no segments".to_string()))
}

/// Render the overlay as standalone SVG markup.
///
/// Pure function of the parameters and diameter; callers regenerate it from
/// scratch on every change. Empty `text` omits the text layer entirely.
pub fn overlay_svg(params: &RingParams, diameter: f64) -> PringsResult<String> {
    params.validate()?;
    let geo = RingGeometry::for_diameter(diameter)?;

    let c = geo.center.x;
    let r = geo.radius;
    let font_px = params.font_size_rem * PX_PER_REM;
    let (gx1, gy1) = GRADIENT_START;
    let (gx2, gy2) = GRADIENT_END;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg width="{diameter}" height="{diameter}" viewBox="0 0 {diameter} {diameter}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
<defs>
<linearGradient id="ringGradient" x1="{gx1}" y1="{gy1}" x2="{gx2}" y2="{gy2}" gradientUnits="userSpaceOnUse">
<stop stop-color="{ring}"/>
<stop offset="1" stop-color="{fade}" stop-opacity="0"/>
</linearGradient>
</defs>
<path d="M {c} {c} m -{r},0 a {r},{r} 0 1,0 {d2},0 a {r},{r} 0 1,0 -{d2},0" id="ringTextPath" fill="none" stroke="url(#ringGradient)" stroke-width="{stroke}"/>
"#,
        ring = params.ring_color.to_hex(),
        fade = params.fade_color.to_hex(),
        d2 = r * 2.0,
        stroke = geo.stroke_width,
    ));

    if !params.text.is_empty() {
        svg.push_str(&format!(
            r##"<text dy="0.3em" font-size="{font_px}" font-weight="700" letter-spacing="2.4" fill="{fill}" font-family="{family}">
<textPath xlink:href="#ringTextPath" startOffset="{offset}%">{text}</textPath>
</text>
"##,
            fill = params.text_color.to_hex(),
            family = escape_xml(&params.font_family),
            offset = params.text_start_offset_pct,
            text = escape_xml(&params.text),
        ));
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
