use std::{cell::RefCell, rc::Rc};

use crate::{
    binding::{BoundValue, Channel, EffectBinding},
    core::{Progress, Viewport},
    curve::Latch,
    error::ScrollFxResult,
    hub::{ScrollHub, Subscription},
    layout,
    model::{Page, Section, TrackSpec},
    progress::ProgressMapper,
    range::TrackRange,
};

/// Everything a renderer needs for one section at the current scroll
/// position: resolved channel values plus the assembled transform.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedSection {
    pub id: String,
    pub progress: Progress,
    pub values: Vec<ResolvedBinding>,
    /// Scroll-jack translation for the hosted track, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_translate_x: Option<f64>,
    pub transform: kurbo::Affine,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ResolvedBinding {
    pub target: String,
    pub channel: Channel,
    pub value: BoundValue,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedPage {
    pub sections: Vec<EvaluatedSection>,
}

/// Per-section mutable state: the mapper, latch arms, and track range.
/// Owned by one mounted section; nothing here is shared across sections.
struct SectionState {
    id: String,
    top_units: f64,
    height_units: f64,
    bindings: Vec<EffectBinding>,
    latches: Vec<Latch>, // parallel to `bindings`
    mapper: ProgressMapper,
    track: Option<TrackSpec>,
    range: TrackRange,
}

impl SectionState {
    fn new(section: &Section, top_units: f64) -> Self {
        Self {
            id: section.id.clone(),
            top_units,
            height_units: section.height,
            latches: vec![Latch::default(); section.bindings.len()],
            bindings: section.bindings.clone(),
            mapper: ProgressMapper::new(section.offsets),
            track: section.track.clone(),
            range: TrackRange::unmounted(),
        }
    }

    fn handle_resize(&mut self, viewport: &Viewport) {
        self.mapper
            .set_rect(layout::section_rect(self.top_units, self.height_units, viewport));
        if let Some(track) = &self.track {
            self.range = TrackRange::measure(track.extent(viewport), viewport.width);
            tracing::debug!(section = %self.id, range = self.range.range(), "track remeasured");
        }
        self.handle_scroll(viewport);
    }

    fn handle_scroll(&mut self, viewport: &Viewport) {
        let p = self.mapper.observe(viewport).value();
        for (binding, latch) in self.bindings.iter().zip(self.latches.iter_mut()) {
            if let Some(spec) = &binding.latch {
                latch.update(spec, p);
            }
        }
    }

    fn snapshot(&self) -> ScrollFxResult<EvaluatedSection> {
        let progress = self.mapper.progress();

        let mut values = Vec::with_capacity(self.bindings.len());
        let mut tx = 0.0;
        let mut ty = 0.0;
        let mut scale = 1.0;
        for (binding, latch) in self.bindings.iter().zip(self.latches.iter()) {
            let value = binding.evaluate_at(progress, latch.is_fired())?;
            if let BoundValue::Scalar(v) = value {
                match binding.channel {
                    Channel::TranslateX => tx += v,
                    Channel::TranslateY => ty += v,
                    Channel::Scale => scale *= v,
                    _ => {}
                }
            }
            values.push(ResolvedBinding {
                target: binding.target.clone(),
                channel: binding.channel,
                value,
            });
        }

        let track_translate_x = self.track.as_ref().map(|_| self.range.translate_x(progress));
        if let Some(t) = track_translate_x {
            tx += t;
        }

        Ok(EvaluatedSection {
            id: self.id.clone(),
            progress,
            values,
            track_translate_x,
            transform: kurbo::Affine::translate((tx, ty)) * kurbo::Affine::scale(scale),
        })
    }
}

struct MountedSection {
    id: String,
    state: Rc<RefCell<SectionState>>,
    // RAII: dropping the handles deregisters the listeners.
    _subs: Vec<Subscription>,
}

/// Live page: validates the model, instantiates per-section state, and
/// keeps it current through hub scroll/resize events. Dropping the runtime
/// (or a single section) releases its subscriptions.
pub struct PageRuntime {
    sections: Vec<MountedSection>,
}

impl PageRuntime {
    #[tracing::instrument(skip(page, hub))]
    pub fn mount(page: &Page, hub: &ScrollHub, viewport: &Viewport) -> ScrollFxResult<Self> {
        page.validate()?;

        let tops = layout::stack_offsets(&page.sections);
        let mut sections = Vec::with_capacity(page.sections.len());
        for (section, top_units) in page.sections.iter().zip(tops) {
            let state = Rc::new(RefCell::new(SectionState::new(section, top_units)));
            state.borrow_mut().handle_resize(viewport);

            let scroll_state = Rc::clone(&state);
            let scroll_sub = hub.on_scroll(move |vp| scroll_state.borrow_mut().handle_scroll(vp));
            let resize_state = Rc::clone(&state);
            let resize_sub = hub.on_resize(move |vp| resize_state.borrow_mut().handle_resize(vp));

            sections.push(MountedSection {
                id: section.id.clone(),
                state,
                _subs: vec![scroll_sub, resize_sub],
            });
        }

        Ok(Self { sections })
    }

    /// Drop one section's state and subscriptions. Returns false when the
    /// id is unknown.
    pub fn unmount_section(&mut self, id: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        self.sections.len() != before
    }

    pub fn section_progress(&self, id: &str) -> Option<Progress> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.state.borrow().mapper.progress())
    }

    /// Resolve every binding at the current state. Pure read; event
    /// handlers have already folded scroll position into the mappers.
    pub fn snapshot(&self) -> ScrollFxResult<EvaluatedPage> {
        let sections = self
            .sections
            .iter()
            .map(|s| s.state.borrow().snapshot())
            .collect::<ScrollFxResult<Vec<_>>>()?;
        Ok(EvaluatedPage { sections })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binding::BindingCurve,
        curve::{Curve, LatchPolicy, LatchSpec},
        ease::Ease,
        progress::ScrollOffsets,
    };
    use std::collections::BTreeMap;

    fn vp(scroll_y: f64) -> Viewport {
        Viewport::new(1280.0, 800.0).at_scroll(scroll_y)
    }

    fn opacity(target: &str, pairs: &[(f64, f64)], latch: Option<LatchSpec>) -> EffectBinding {
        EffectBinding {
            target: target.to_string(),
            channel: Channel::Opacity,
            curve: BindingCurve::Scalar(Curve::from_pairs(pairs.iter().copied())),
            ease: Ease::Linear,
            latch,
        }
    }

    fn two_section_page() -> Page {
        Page {
            theme: BTreeMap::new(),
            sections: vec![
                Section {
                    id: "hero".to_string(),
                    height: 1.0,
                    offsets: ScrollOffsets::ENTER_TO_EXIT,
                    bindings: vec![opacity("scroll-cue", &[(0.5, 1.0), (0.75, 0.0)], None)],
                    track: None,
                },
                Section {
                    id: "gallery".to_string(),
                    height: 3.0,
                    offsets: ScrollOffsets::PINNED,
                    bindings: vec![],
                    track: Some(TrackSpec {
                        panel_widths: vec![1.0, 1.0],
                        tail_px: 64.0,
                    }),
                },
            ],
        }
    }

    #[test]
    fn mount_subscribes_and_drop_unsubscribes() {
        let hub = ScrollHub::new();
        {
            let runtime = PageRuntime::mount(&two_section_page(), &hub, &vp(0.0)).unwrap();
            assert_eq!(hub.scroll_listeners(), 2);
            assert_eq!(hub.resize_listeners(), 2);
            drop(runtime);
        }
        assert_eq!(hub.scroll_listeners(), 0);
        assert_eq!(hub.resize_listeners(), 0);
    }

    #[test]
    fn unmounting_one_section_releases_only_its_listeners() {
        let hub = ScrollHub::new();
        let mut runtime = PageRuntime::mount(&two_section_page(), &hub, &vp(0.0)).unwrap();
        assert!(runtime.unmount_section("hero"));
        assert!(!runtime.unmount_section("hero"));
        assert_eq!(hub.scroll_listeners(), 1);
        assert_eq!(hub.resize_listeners(), 1);
        assert!(runtime.section_progress("hero").is_none());
        assert!(runtime.section_progress("gallery").is_some());
    }

    #[test]
    fn gallery_translation_tracks_pinned_progress() {
        let hub = ScrollHub::new();
        let runtime = PageRuntime::mount(&two_section_page(), &hub, &vp(0.0)).unwrap();

        // Gallery occupies units [1, 4): pinned window is scroll 800..2400.
        hub.emit_scroll(&vp(800.0));
        let snap = runtime.snapshot().unwrap();
        let gallery = &snap.sections[1];
        assert_eq!(gallery.progress, Progress::ZERO);
        assert_eq!(gallery.track_translate_x, Some(0.0));

        hub.emit_scroll(&vp(2400.0));
        let snap = runtime.snapshot().unwrap();
        let gallery = &snap.sections[1];
        assert_eq!(gallery.progress, Progress::ONE);
        // range = 2*1280 + 64 - 1280 = 1344.
        assert_eq!(gallery.track_translate_x, Some(-1344.0));
        assert_eq!(gallery.transform, kurbo::Affine::translate((-1344.0, 0.0)));
    }

    #[test]
    fn resize_remeasures_the_track() {
        let hub = ScrollHub::new();
        let runtime = PageRuntime::mount(&two_section_page(), &hub, &vp(0.0)).unwrap();

        let narrow = Viewport::new(640.0, 800.0).at_scroll(2400.0);
        hub.emit_resize(&narrow);
        let snap = runtime.snapshot().unwrap();
        // range = 2*640 + 64 - 640 = 704.
        assert_eq!(snap.sections[1].track_translate_x, Some(-704.0));
    }

    #[test]
    fn latch_survives_scroll_reversal_until_remount() {
        let hub = ScrollHub::new();
        let page = Page {
            theme: BTreeMap::new(),
            sections: vec![Section {
                id: "thanks".to_string(),
                height: 1.0,
                offsets: ScrollOffsets::ENTER_TO_EXIT,
                bindings: vec![opacity(
                    "wash",
                    &[(0.0, 0.0), (1.0, 1.0)],
                    Some(LatchSpec {
                        threshold: 0.95,
                        policy: LatchPolicy::UntilUnmount,
                    }),
                )],
                track: None,
            }],
        };
        let runtime = PageRuntime::mount(&page, &hub, &vp(0.0)).unwrap();

        // Section spans scroll -800..800 under ENTER_TO_EXIT; p=0.95 at 720.
        hub.emit_scroll(&vp(720.0));
        hub.emit_scroll(&vp(0.0)); // reverse to p=0.5
        let snap = runtime.snapshot().unwrap();
        assert_eq!(snap.sections[0].progress.value(), 0.5);
        assert_eq!(
            snap.sections[0].values[0].value,
            BoundValue::Scalar(1.0),
            "latched output stays pinned at the terminal value"
        );

        // A fresh mount starts unlatched.
        let hub2 = ScrollHub::new();
        let remounted = PageRuntime::mount(&page, &hub2, &vp(0.0)).unwrap();
        let snap = remounted.snapshot().unwrap();
        assert_eq!(snap.sections[0].values[0].value, BoundValue::Scalar(0.5));
    }

    #[test]
    fn invalid_page_fails_mount() {
        let hub = ScrollHub::new();
        let page = Page {
            theme: BTreeMap::new(),
            sections: vec![],
        };
        assert!(PageRuntime::mount(&page, &hub, &vp(0.0)).is_err());
        assert_eq!(hub.scroll_listeners(), 0);
    }
}
