use std::collections::{BTreeMap, BTreeSet};

use crate::{
    binding::EffectBinding,
    core::Viewport,
    error::{ScrollFxError, ScrollFxResult},
    progress::ScrollOffsets,
};

/// Declarative description of a scroll-driven page: sections in fixed
/// vertical order, each with its offset rules and effect bindings.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Page {
    /// Opaque theme tokens (color/font roles such as `ivory` or
    /// `muted-foreground`). Carried through to consumers, never computed on.
    #[serde(default)]
    pub theme: BTreeMap<String, String>,
    pub sections: Vec<Section>,
}

/// One vertically stacked section. `height` is in viewport-height
/// multiples: 1.0 is a full-screen section, 3.0 a 300vh scroll-jack host.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Section {
    pub id: String,
    pub height: f64,
    pub offsets: ScrollOffsets,
    #[serde(default)]
    pub bindings: Vec<EffectBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackSpec>,
}

/// Horizontal track hosted by a pinned section. Panel widths are in
/// viewport-width multiples; `tail_px` is a fixed trailing spacer.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TrackSpec {
    pub panel_widths: Vec<f64>,
    #[serde(default)]
    pub tail_px: f64,
}

impl TrackSpec {
    /// Full scrollable extent of the track at the given viewport, in px.
    pub fn extent(&self, viewport: &Viewport) -> f64 {
        let panels: f64 = self.panel_widths.iter().sum();
        panels * viewport.width + self.tail_px
    }

    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.panel_widths.is_empty() {
            return Err(ScrollFxError::validation(
                "track must have at least one panel",
            ));
        }
        for w in &self.panel_widths {
            if !w.is_finite() || *w <= 0.0 {
                return Err(ScrollFxError::validation(
                    "track panel widths must be finite and > 0",
                ));
            }
        }
        if !self.tail_px.is_finite() || self.tail_px < 0.0 {
            return Err(ScrollFxError::validation(
                "track tail must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

impl Section {
    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.id.trim().is_empty() {
            return Err(ScrollFxError::validation("section id must be non-empty"));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ScrollFxError::validation(format!(
                "section '{}' height must be finite and > 0",
                self.id
            )));
        }
        self.offsets.validate()?;
        for binding in &self.bindings {
            binding.validate()?;
        }
        if let Some(track) = &self.track {
            track.validate()?;
        }
        Ok(())
    }
}

impl Page {
    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.sections.is_empty() {
            return Err(ScrollFxError::validation(
                "page must have at least one section",
            ));
        }
        for role in self.theme.keys() {
            if role.trim().is_empty() {
                return Err(ScrollFxError::validation("theme role must be non-empty"));
            }
        }

        let mut ids = BTreeSet::new();
        for section in &self.sections {
            section.validate()?;
            if !ids.insert(section.id.as_str()) {
                return Err(ScrollFxError::validation(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
        }
        Ok(())
    }

    /// Total page height in viewport-height multiples.
    pub fn total_height_units(&self) -> f64 {
        self.sections.iter().map(|s| s.height).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binding::{BindingCurve, Channel},
        curve::Curve,
        ease::Ease,
    };

    fn section(id: &str) -> Section {
        Section {
            id: id.to_string(),
            height: 1.0,
            offsets: ScrollOffsets::ENTER_TO_EXIT,
            bindings: vec![],
            track: None,
        }
    }

    #[test]
    fn duplicate_section_ids_are_rejected() {
        let page = Page {
            theme: BTreeMap::new(),
            sections: vec![section("hero"), section("hero")],
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn empty_page_is_rejected() {
        let page = Page {
            theme: BTreeMap::new(),
            sections: vec![],
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn invalid_binding_fails_page_validation() {
        let mut s = section("poem");
        s.bindings.push(EffectBinding {
            target: "line".to_string(),
            channel: Channel::Opacity,
            curve: BindingCurve::Scalar(Curve { keys: vec![] }),
            ease: Ease::Linear,
            latch: None,
        });
        let page = Page {
            theme: BTreeMap::new(),
            sections: vec![s],
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn track_extent_scales_with_viewport() {
        let track = TrackSpec {
            panel_widths: vec![1.0, 1.0],
            tail_px: 64.0,
        };
        track.validate().unwrap();
        let vp = Viewport::new(1280.0, 800.0);
        assert_eq!(track.extent(&vp), 2624.0);
    }

    #[test]
    fn track_rejects_bad_panels() {
        assert!(
            TrackSpec {
                panel_widths: vec![],
                tail_px: 0.0,
            }
            .validate()
            .is_err()
        );
        assert!(
            TrackSpec {
                panel_widths: vec![-1.0],
                tail_px: 0.0,
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn total_height_sums_sections() {
        let mut gallery = section("gallery");
        gallery.height = 3.0;
        let page = Page {
            theme: BTreeMap::new(),
            sections: vec![section("hero"), gallery],
        };
        assert_eq!(page.total_height_units(), 4.0);
    }
}
