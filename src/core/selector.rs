//! Background image selection.

use super::section::{Section, SectionCatalog};

/// Pick the backdrop image for the current frame.
///
/// Above half a viewport the hero image is shown; below it the image of the
/// active section, or of the first section when the index is unset or out
/// of range.  Pure and cheap enough to call every frame.
pub fn select<'a>(
    scroll_position: u32,
    viewport_height: u32,
    active_section: Option<usize>,
    hero_image: &'a str,
    sections: &'a [Section],
) -> &'a str {
    if (scroll_position as f64) < 0.5 * viewport_height as f64 {
        return hero_image;
    }
    active_section
        .and_then(|i| sections.get(i))
        .or_else(|| sections.first())
        .map_or(hero_image, |s| s.image.as_str())
}

/// [`select`] over a catalog.
pub fn select_from<'a>(
    scroll_position: u32,
    viewport_height: u32,
    active_section: Option<usize>,
    catalog: &'a SectionCatalog,
) -> &'a str {
    select(
        scroll_position,
        viewport_height,
        active_section,
        catalog.hero_image(),
        catalog.sections(),
    )
}
