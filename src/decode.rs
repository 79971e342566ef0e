use std::sync::Arc;

use crate::error::{PringsError, PringsResult};

/// Decode an uploaded photo into straight-alpha RGBA8.
///
/// This is the crop engine's decode boundary: it either yields a fully
/// decoded bitmap or fails, never a partially readable one.
pub fn decode_photo(bytes: &[u8]) -> PringsResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PringsError::image_decode(format!("decode photo: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Parse overlay SVG markup into a render tree.
///
/// Text inside the overlay resolves against the system font database, with a
/// graceful fallback to any available face so a missing family never fails
/// the parse.
pub fn parse_overlay_svg(markup: &str) -> PringsResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: overlay_fontdb(),
        font_resolver: overlay_font_resolver(),
        ..Default::default()
    };
    usvg::Tree::from_data(markup.as_bytes(), &opts)
        .map_err(|e| PringsError::image_decode(format!("parse overlay svg: {e}")))
}

fn overlay_fontdb() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
}

fn overlay_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}
