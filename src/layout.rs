//! Vertical stacking of sections. The page shell composes sections in a
//! fixed order; their document rects follow from cumulative heights at the
//! current viewport and are re-derived on every resize.

use crate::{
    core::{SectionRect, Viewport},
    model::Section,
};

/// Top offset of each section, in viewport-height units, in page order.
pub fn stack_offsets(sections: &[Section]) -> Vec<f64> {
    let mut tops = Vec::with_capacity(sections.len());
    let mut acc = 0.0;
    for section in sections {
        tops.push(acc);
        acc += section.height;
    }
    tops
}

/// Document rect of a section at the given viewport.
pub fn section_rect(top_units: f64, height_units: f64, viewport: &Viewport) -> SectionRect {
    SectionRect::new(top_units * viewport.height, height_units * viewport.height)
}

/// Full document height in px.
pub fn document_height(sections: &[Section], viewport: &Viewport) -> f64 {
    sections.iter().map(|s| s.height).sum::<f64>() * viewport.height
}

/// Largest reachable scroll position.
pub fn max_scroll(sections: &[Section], viewport: &Viewport) -> f64 {
    (document_height(sections, viewport) - viewport.height).max(0.0)
}
