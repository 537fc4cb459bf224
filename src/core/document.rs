//! Document geometry: where the hero and every section sit on the page.
//!
//! The page is a hero block exactly one viewport tall followed by one block
//! per section.  Section blocks are at least one viewport tall, grow with
//! their content plus vertical padding, and every section after the first
//! is preceded by a fixed gap.  All values are virtual pixels.

use super::visibility::ElementSpan;

/// Gap above every section except the first.
pub const SECTION_GAP_PX: u32 = 80;

/// Vertical padding inside a section block, applied above and below.
pub const SECTION_PADDING_PX: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub top: u32,
    pub height: u32,
}

impl Block {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Span relative to the viewport top at `scroll`.
    pub fn span_at(&self, scroll: u32) -> ElementSpan {
        ElementSpan::new(self.top as i64 - scroll as i64, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentLayout {
    viewport_height: u32,
    sections: Vec<Block>,
}

impl DocumentLayout {
    /// Lay out the page for `viewport_height`, given the rendered height of
    /// each section card.
    pub fn new(viewport_height: u32, card_heights: &[u32]) -> Self {
        let mut sections = Vec::with_capacity(card_heights.len());
        let mut y = viewport_height;
        for (i, &card) in card_heights.iter().enumerate() {
            if i > 0 {
                y += SECTION_GAP_PX;
            }
            let height = (card + 2 * SECTION_PADDING_PX).max(viewport_height);
            sections.push(Block { top: y, height });
            y += height;
        }
        Self {
            viewport_height,
            sections,
        }
    }

    pub fn hero(&self) -> Block {
        Block {
            top: 0,
            height: self.viewport_height,
        }
    }

    pub fn sections(&self) -> &[Block] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<Block> {
        self.sections.get(index).copied()
    }

    pub fn document_height(&self) -> u32 {
        self.sections
            .last()
            .map_or(self.viewport_height, Block::bottom)
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> u32 {
        self.document_height().saturating_sub(self.viewport_height)
    }

    /// Scroll offset that brings the top of section `index` to the top of
    /// the viewport, clamped to the scrollable range.
    pub fn section_scroll_target(&self, index: usize) -> Option<u32> {
        self.section(index).map(|b| b.top.min(self.max_scroll()))
    }

    /// Viewport-relative spans of every section at `scroll`.
    pub fn section_spans(&self, scroll: u32) -> Vec<ElementSpan> {
        self.sections.iter().map(|b| b.span_at(scroll)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_cards_get_one_viewport_each() {
        let doc = DocumentLayout::new(600, &[100, 100, 100]);
        let tops: Vec<u32> = doc.sections().iter().map(|b| b.top).collect();
        assert_eq!(tops, vec![600, 1280, 1960]);
        assert_eq!(doc.document_height(), 2560);
        assert_eq!(doc.max_scroll(), 1960);
    }

    #[test]
    fn tall_cards_grow_their_block() {
        let doc = DocumentLayout::new(600, &[1000]);
        assert_eq!(doc.section(0).unwrap().height, 1160);
        assert_eq!(doc.document_height(), 1760);
    }

    #[test]
    fn hero_only_document_has_no_scroll_room() {
        let doc = DocumentLayout::new(600, &[]);
        assert_eq!(doc.document_height(), 600);
        assert_eq!(doc.max_scroll(), 0);
    }

    #[test]
    fn scroll_target_is_clamped() {
        let doc = DocumentLayout::new(600, &[100, 100]);
        assert_eq!(doc.section_scroll_target(0), Some(600));
        // last block is exactly one viewport tall, its top is max_scroll
        assert_eq!(doc.section_scroll_target(1), Some(doc.max_scroll()));
        assert_eq!(doc.section_scroll_target(5), None);
    }

    #[test]
    fn spans_are_viewport_relative() {
        let doc = DocumentLayout::new(600, &[100]);
        let spans = doc.section_spans(700);
        assert_eq!(spans, vec![ElementSpan::new(-100, 600)]);
    }
}
