use std::collections::BTreeMap;

use crate::{
    binding::{BindingCurve, Channel, EffectBinding},
    core::Rgba8,
    curve::{Curve, LatchSpec},
    ease::Ease,
    error::ScrollFxResult,
    model::{Page, Section, TrackSpec},
    progress::ScrollOffsets,
};

pub fn scalar_curve(pairs: impl IntoIterator<Item = (f64, f64)>) -> BindingCurve {
    BindingCurve::Scalar(Curve::from_pairs(pairs))
}

pub fn color_curve(pairs: impl IntoIterator<Item = (f64, Rgba8)>) -> BindingCurve {
    BindingCurve::Color(Curve::from_pairs(pairs))
}

pub struct PageBuilder {
    theme: BTreeMap<String, String>,
    sections: Vec<Section>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            theme: BTreeMap::new(),
            sections: Vec::new(),
        }
    }

    pub fn theme_role(mut self, role: impl Into<String>, value: impl Into<String>) -> Self {
        self.theme.insert(role.into(), value.into());
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn build(self) -> ScrollFxResult<Page> {
        let page = Page {
            theme: self.theme,
            sections: self.sections,
        };
        page.validate()?;
        Ok(page)
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SectionBuilder {
    id: String,
    height: f64,
    offsets: ScrollOffsets,
    bindings: Vec<EffectBinding>,
    track: Option<TrackSpec>,
}

impl SectionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            height: 1.0,
            offsets: ScrollOffsets::ENTER_TO_EXIT,
            bindings: Vec::new(),
            track: None,
        }
    }

    /// Section height in viewport-height multiples (1.0 = 100vh).
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn offsets(mut self, offsets: ScrollOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn bind(mut self, target: impl Into<String>, channel: Channel, curve: BindingCurve) -> Self {
        self.bindings.push(EffectBinding {
            target: target.into(),
            channel,
            curve,
            ease: Ease::Linear,
            latch: None,
        });
        self
    }

    pub fn bind_eased(
        mut self,
        target: impl Into<String>,
        channel: Channel,
        curve: BindingCurve,
        ease: Ease,
    ) -> Self {
        self.bindings.push(EffectBinding {
            target: target.into(),
            channel,
            curve,
            ease,
            latch: None,
        });
        self
    }

    pub fn bind_latched(
        mut self,
        target: impl Into<String>,
        channel: Channel,
        curve: BindingCurve,
        ease: Ease,
        latch: LatchSpec,
    ) -> Self {
        self.bindings.push(EffectBinding {
            target: target.into(),
            channel,
            curve,
            ease,
            latch: Some(latch),
        });
        self
    }

    pub fn track(mut self, track: TrackSpec) -> Self {
        self.track = Some(track);
        self
    }

    pub fn build(self) -> ScrollFxResult<Section> {
        let section = Section {
            id: self.id,
            height: self.height,
            offsets: self.offsets,
            bindings: self.bindings,
            track: self.track,
        };
        section.validate()?;
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_validate_on_build() {
        let page = PageBuilder::new()
            .theme_role("ivory", "#f5f0e8")
            .section(
                SectionBuilder::new("poem")
                    .height(2.0)
                    .bind(
                        "poem-line-0",
                        Channel::Opacity,
                        scalar_curve([(0.0, 0.0), (0.1, 1.0)]),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(page.sections.len(), 1);
        assert_eq!(page.theme.get("ivory").map(String::as_str), Some("#f5f0e8"));
    }

    #[test]
    fn bad_section_fails_at_build() {
        assert!(SectionBuilder::new("").build().is_err());
        assert!(SectionBuilder::new("x").height(0.0).build().is_err());
    }
}
