use crate::{
    core::{Progress, Rgba8},
    curve::{Curve, LatchSpec},
    ease::Ease,
    error::{ScrollFxError, ScrollFxResult},
};

/// Named output channel a binding drives. One binding per channel per
/// target; the evaluator assembles translate/scale channels into a single
/// transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
    HeightPercent,
    ColorWash,
}

impl Channel {
    fn wants_color(self) -> bool {
        matches!(self, Self::ColorWash)
    }
}

/// The curve behind a binding. Scalar for geometric/opacity channels,
/// color for RGBA washes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingCurve {
    Scalar(Curve<f64>),
    Color(Curve<Rgba8>),
}

/// Value a binding resolved to at some Progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundValue {
    Scalar(f64),
    Color(Rgba8),
}

/// A pure mapping from Progress to one output channel of one target.
/// `target` is an opaque style handle (element id or theme role); the
/// engine never interprets it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EffectBinding {
    pub target: String,
    pub channel: Channel,
    pub curve: BindingCurve,
    #[serde(default)]
    pub ease: Ease,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latch: Option<LatchSpec>,
}

impl EffectBinding {
    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.target.trim().is_empty() {
            return Err(ScrollFxError::validation(
                "binding target must be non-empty",
            ));
        }

        match (&self.curve, self.channel.wants_color()) {
            (BindingCurve::Scalar(_), true) => {
                return Err(ScrollFxError::validation(format!(
                    "binding '{}' drives a color channel with a scalar curve",
                    self.target
                )));
            }
            (BindingCurve::Color(_), false) => {
                return Err(ScrollFxError::validation(format!(
                    "binding '{}' drives a scalar channel with a color curve",
                    self.target
                )));
            }
            _ => {}
        }

        match &self.curve {
            BindingCurve::Scalar(c) => {
                c.validate()?;
                for k in &c.keys {
                    if !k.value.is_finite() {
                        return Err(ScrollFxError::validation(format!(
                            "binding '{}' has a non-finite output value",
                            self.target
                        )));
                    }
                    let ok = match self.channel {
                        Channel::Opacity => (0.0..=1.0).contains(&k.value),
                        Channel::HeightPercent => k.value >= 0.0,
                        _ => true,
                    };
                    if !ok {
                        return Err(ScrollFxError::validation(format!(
                            "binding '{}' output is out of range for {:?}",
                            self.target, self.channel
                        )));
                    }
                }
            }
            BindingCurve::Color(c) => c.validate()?,
        }

        if let Some(latch) = &self.latch {
            latch.validate()?;
        }
        Ok(())
    }

    /// Resolve the bound value at `progress`. A fired latch pins the output
    /// to the curve's terminal value regardless of the live Progress.
    pub fn evaluate_at(&self, progress: Progress, pinned: bool) -> ScrollFxResult<BoundValue> {
        match &self.curve {
            BindingCurve::Scalar(c) => {
                let v = if pinned {
                    c.terminal()?
                } else {
                    c.sample(progress.value(), self.ease)?
                };
                Ok(BoundValue::Scalar(v))
            }
            BindingCurve::Color(c) => {
                let v = if pinned {
                    c.terminal()?
                } else {
                    c.sample(progress.value(), self.ease)?
                };
                Ok(BoundValue::Color(v))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::LatchPolicy;

    fn opacity_ramp() -> EffectBinding {
        EffectBinding {
            target: "veil".to_string(),
            channel: Channel::Opacity,
            curve: BindingCurve::Scalar(Curve::from_pairs([
                (0.0, 0.0),
                (0.3, 1.0),
                (0.7, 1.0),
                (1.0, 0.0),
            ])),
            ease: Ease::Linear,
            latch: None,
        }
    }

    #[test]
    fn four_point_opacity_ramp() {
        let b = opacity_ramp();
        b.validate().unwrap();
        assert_eq!(
            b.evaluate_at(Progress::new(0.5), false).unwrap(),
            BoundValue::Scalar(1.0)
        );
        assert_eq!(
            b.evaluate_at(Progress::new(0.85), false).unwrap(),
            BoundValue::Scalar(0.5)
        );
    }

    #[test]
    fn pinned_binding_holds_terminal_value() {
        let b = EffectBinding {
            target: "blood-wash".to_string(),
            channel: Channel::ColorWash,
            curve: BindingCurve::Color(Curve::from_pairs([
                (0.0, Rgba8::TRANSPARENT),
                (1.0, Rgba8::new(120, 0, 16, 255)),
            ])),
            ease: Ease::Linear,
            latch: Some(LatchSpec {
                threshold: 0.95,
                policy: LatchPolicy::UntilUnmount,
            }),
        };
        b.validate().unwrap();
        assert_eq!(
            b.evaluate_at(Progress::new(0.5), true).unwrap(),
            BoundValue::Color(Rgba8::new(120, 0, 16, 255))
        );
    }

    #[test]
    fn channel_and_curve_kind_must_agree() {
        let mut b = opacity_ramp();
        b.channel = Channel::ColorWash;
        assert!(b.validate().is_err());

        let mut c = opacity_ramp();
        c.curve = BindingCurve::Color(Curve::from_pairs([(0.0, Rgba8::TRANSPARENT)]));
        assert!(c.validate().is_err());
    }

    #[test]
    fn opacity_outputs_must_stay_normalized() {
        let mut b = opacity_ramp();
        b.curve = BindingCurve::Scalar(Curve::from_pairs([(0.0, 0.0), (1.0, 2.0)]));
        assert!(b.validate().is_err());
    }

    #[test]
    fn empty_target_is_rejected() {
        let mut b = opacity_ramp();
        b.target = "  ".to_string();
        assert!(b.validate().is_err());
    }
}
