//! Per-section visibility detection.
//!
//! A section counts as "in view" when enough of it overlaps the centre band
//! of the viewport: the band excludes a 20 % margin at the top and bottom,
//! and at least 40 % of the section must fall inside it.  Sections taller
//! than the band are measured against the band height instead, otherwise a
//! tall panel could never satisfy the amount.
//!
//! [`SectionObserver`] turns the boolean predicate into edge-triggered
//! reports: one report per entry, re-armed only after the section leaves.

/// Vertical extent of an element relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpan {
    /// Top edge in pixels; negative when scrolled above the viewport.
    pub top: i64,
    pub height: u32,
}

impl ElementSpan {
    pub fn new(top: i64, height: u32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> i64 {
        self.top + self.height as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityPredicate {
    /// Fraction of the element that must be inside the band.
    pub amount: f64,
    /// Fraction of the viewport height excluded at the top and at the bottom.
    pub margin: f64,
}

impl Default for VisibilityPredicate {
    fn default() -> Self {
        Self {
            amount: 0.4,
            margin: 0.2,
        }
    }
}

impl VisibilityPredicate {
    /// Overlap ratio of `span` with the centre band, in `[0, 1]`.
    pub fn ratio(&self, span: ElementSpan, viewport_height: u32) -> f64 {
        let vh = viewport_height as f64;
        let band_top = vh * self.margin;
        let band_bottom = vh * (1.0 - self.margin);
        let band_height = band_bottom - band_top;
        if span.height == 0 || band_height <= 0.0 {
            return 0.0;
        }

        let top = span.top as f64;
        let bottom = span.bottom() as f64;
        let overlap = (bottom.min(band_bottom) - top.max(band_top)).max(0.0);
        let measured = (span.height as f64).min(band_height);
        (overlap / measured).clamp(0.0, 1.0)
    }

    pub fn is_visible(&self, span: ElementSpan, viewport_height: u32) -> bool {
        let ratio = self.ratio(span, viewport_height);
        ratio > 0.0 && ratio >= self.amount
    }
}

/// Edge-triggered visibility latch for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionObserver {
    index: usize,
    has_fired: bool,
}

impl SectionObserver {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            has_fired: false,
        }
    }

    /// Feed the current predicate value.  Returns the section index on a
    /// false→true edge while un-fired; exits only re-arm the latch.
    pub fn observe(&mut self, in_view: bool) -> Option<usize> {
        match (in_view, self.has_fired) {
            (true, false) => {
                self.has_fired = true;
                Some(self.index)
            }
            (false, true) => {
                self.has_fired = false;
                None
            }
            _ => None,
        }
    }
}

/// One observer per section, evaluated together each frame.
#[derive(Debug, Clone, Default)]
pub struct ObserverSet {
    predicate: VisibilityPredicate,
    observers: Vec<SectionObserver>,
}

impl ObserverSet {
    pub fn new(section_count: usize, predicate: VisibilityPredicate) -> Self {
        Self {
            predicate,
            observers: (0..section_count).map(SectionObserver::new).collect(),
        }
    }

    /// Evaluate every section span (indexed like the observers) and return
    /// the indices that just entered view, in section order.
    pub fn observe(&mut self, spans: &[ElementSpan], viewport_height: u32) -> Vec<usize> {
        let predicate = self.predicate;
        self.observers
            .iter_mut()
            .zip(spans)
            .filter_map(|(obs, &span)| obs.observe(predicate.is_visible(span, viewport_height)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: u32 = 1000;

    #[test]
    fn short_element_in_centre_is_visible() {
        let p = VisibilityPredicate::default();
        // band is [200, 800]
        assert!(p.is_visible(ElementSpan::new(400, 200), VH));
    }

    #[test]
    fn element_inside_margin_is_not_visible() {
        let p = VisibilityPredicate::default();
        assert!(!p.is_visible(ElementSpan::new(0, 150), VH));
        assert!(!p.is_visible(ElementSpan::new(850, 150), VH));
    }

    #[test]
    fn amount_threshold_is_inclusive() {
        let p = VisibilityPredicate::default();
        // 100 px element with exactly 40 px inside the band
        assert!(p.is_visible(ElementSpan::new(760, 100), VH));
        assert!(!p.is_visible(ElementSpan::new(761, 100), VH));
    }

    #[test]
    fn tall_element_is_measured_against_band() {
        let p = VisibilityPredicate::default();
        // 3000 px panel covering the whole band
        assert!(p.is_visible(ElementSpan::new(-1000, 3000), VH));
        // only its last 100 px remain inside the band
        assert!(!p.is_visible(ElementSpan::new(-2700, 3000), VH));
    }

    #[test]
    fn zero_height_and_zero_viewport_are_never_visible() {
        let p = VisibilityPredicate::default();
        assert!(!p.is_visible(ElementSpan::new(500, 0), VH));
        assert!(!p.is_visible(ElementSpan::new(0, 100), 0));
    }

    #[test]
    fn observer_reports_once_per_entry() {
        let mut obs = SectionObserver::new(3);
        let reports: Vec<_> = [true, true, true, false, false, true, true]
            .into_iter()
            .filter_map(|v| obs.observe(v))
            .collect();
        assert_eq!(reports, vec![3, 3]);
    }

    #[test]
    fn exit_only_rearms() {
        let mut obs = SectionObserver::new(0);
        assert_eq!(obs.observe(true), Some(0));
        assert!(obs.has_fired);
        assert_eq!(obs.observe(false), None);
        assert!(!obs.has_fired);
    }

    #[test]
    fn observer_set_reports_entering_sections() {
        let mut set = ObserverSet::new(3, VisibilityPredicate::default());
        let spans = [
            ElementSpan::new(-2000, 1000),
            ElementSpan::new(100, 1000),
            ElementSpan::new(1200, 1000),
        ];
        assert_eq!(set.observe(&spans, VH), vec![1]);
        assert!(set.observe(&spans, VH).is_empty());
    }
}
