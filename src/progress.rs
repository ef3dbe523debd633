use crate::{
    core::{Edge, Progress, SectionRect, Viewport},
    error::{ScrollFxError, ScrollFxResult},
};

/// One trigger rule: the scroll position at which `target` edge of the
/// tracked rect meets `viewport` edge of the scroll window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OffsetRule {
    pub target: Edge,
    pub viewport: Edge,
}

impl OffsetRule {
    pub const fn new(target: Edge, viewport: Edge) -> Self {
        Self { target, viewport }
    }

    /// Document scroll position at which this rule triggers.
    pub fn trigger_scroll(&self, rect: SectionRect, viewport: &Viewport) -> f64 {
        rect.top + self.target.fraction() * rect.height
            - self.viewport.fraction() * viewport.height
    }
}

/// (entry rule, exit rule) pair defining the observed scroll window.
/// Progress is 0 when `enter` triggers and 1 when `exit` triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScrollOffsets {
    pub enter: OffsetRule,
    pub exit: OffsetRule,
}

impl ScrollOffsets {
    /// Track the full pass through the viewport: target top reaches the
    /// viewport bottom, through target bottom reaching the viewport top.
    pub const ENTER_TO_EXIT: Self = Self {
        enter: OffsetRule::new(Edge::Start, Edge::End),
        exit: OffsetRule::new(Edge::End, Edge::Start),
    };

    /// Track the pinned portion of an oversized section: target top reaches
    /// the viewport top, through target bottom reaching the viewport bottom.
    pub const PINNED: Self = Self {
        enter: OffsetRule::new(Edge::Start, Edge::Start),
        exit: OffsetRule::new(Edge::End, Edge::End),
    };

    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.enter == self.exit {
            return Err(ScrollFxError::validation(
                "offset entry and exit rules must differ",
            ));
        }
        Ok(())
    }
}

/// Derives Progress for one tracked section. Owns its measurement and last
/// valid value; one instance per section, never shared.
#[derive(Clone, Debug)]
pub struct ProgressMapper {
    offsets: ScrollOffsets,
    rect: Option<SectionRect>,
    last: Progress,
}

impl ProgressMapper {
    pub fn new(offsets: ScrollOffsets) -> Self {
        Self {
            offsets,
            rect: None,
            last: Progress::ZERO,
        }
    }

    /// Record a fresh measurement (mount, layout pass, resize).
    pub fn set_rect(&mut self, rect: SectionRect) {
        self.rect = Some(rect);
    }

    /// Forget the measurement (section left the render tree).
    pub fn clear_rect(&mut self) {
        self.rect = None;
    }

    /// Recompute Progress for the current scroll position. Degenerate
    /// measurements (no rect, zero height, zero-size viewport, coincident
    /// trigger points) hold the last valid value instead of erroring.
    pub fn observe(&mut self, viewport: &Viewport) -> Progress {
        let Some(rect) = self.rect else {
            return self.last;
        };
        if !rect.is_measurable() || !viewport.is_measurable() {
            return self.last;
        }

        let enter = self.offsets.enter.trigger_scroll(rect, viewport);
        let exit = self.offsets.exit.trigger_scroll(rect, viewport);
        let span = exit - enter;
        if span.abs() < f64::EPSILON {
            return self.last;
        }

        self.last = Progress::new((viewport.scroll_y - enter) / span);
        self.last
    }

    /// Last derived value (0 before the first valid measurement).
    pub fn progress(&self) -> Progress {
        self.last
    }
}
