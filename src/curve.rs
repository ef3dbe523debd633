use crate::{
    core::Rgba8,
    ease::Ease,
    error::{ScrollFxError, ScrollFxResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Piecewise-linear curve over the Progress domain. Below the first key the
/// output holds the first value, above the last key the last value; there is
/// no extrapolation past the declared bounds.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Curve<T> {
    pub keys: Vec<CurveKey<T>>, // sorted by `at`
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CurveKey<T> {
    pub at: f64, // breakpoint in [0,1]
    pub value: T,
}

impl<T> Curve<T>
where
    T: Lerp + Clone,
{
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, T)>) -> Self {
        Self {
            keys: pairs
                .into_iter()
                .map(|(at, value)| CurveKey { at, value })
                .collect(),
        }
    }

    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.keys.is_empty() {
            return Err(ScrollFxError::validation("curve must have at least one key"));
        }
        for k in &self.keys {
            if !k.at.is_finite() || !(0.0..=1.0).contains(&k.at) {
                return Err(ScrollFxError::validation(
                    "curve breakpoints must lie in [0, 1]",
                ));
            }
        }
        if !self.keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(ScrollFxError::validation(
                "curve keys must be sorted by breakpoint",
            ));
        }
        Ok(())
    }

    /// Sample at progress `p`. `ease` shapes the parameter within each
    /// segment; breakpoints themselves are always hit exactly.
    pub fn sample(&self, p: f64, ease: Ease) -> ScrollFxResult<T> {
        if self.keys.is_empty() {
            return Err(ScrollFxError::binding("cannot sample an empty curve"));
        }

        let idx = self.keys.partition_point(|k| k.at <= p);

        if idx == 0 {
            return Ok(self.keys[0].value.clone());
        }
        if idx >= self.keys.len() {
            return Ok(self.keys[self.keys.len() - 1].value.clone());
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.at - a.at;
        if denom <= 0.0 {
            return Ok(a.value.clone());
        }

        let t = (p - a.at) / denom;
        Ok(T::lerp(&a.value, &b.value, ease.apply(t)))
    }

    /// Value the curve holds at and beyond its last breakpoint.
    pub fn terminal(&self) -> ScrollFxResult<T> {
        self.keys
            .last()
            .map(|k| k.value.clone())
            .ok_or_else(|| ScrollFxError::binding("cannot sample an empty curve"))
    }
}

/// Whether a fired latch may re-arm within one mount lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchPolicy {
    /// Once fired, stays fired until the owning state is dropped (remount).
    #[default]
    UntilUnmount,
    /// Re-arms when Progress returns all the way to 0 (the section has
    /// genuinely left the observed range), not on mere scroll reversal.
    ResetOnReenter,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatchSpec {
    /// Progress at or above which the bound output pins to its terminal value.
    pub threshold: f64,
    #[serde(default)]
    pub policy: LatchPolicy,
}

impl LatchSpec {
    pub fn validate(&self) -> ScrollFxResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScrollFxError::validation(
                "latch threshold must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// One-way pin. Per-instance state owned by the section runtime; never
/// process-global.
#[derive(Clone, Copy, Debug, Default)]
pub struct Latch {
    fired: bool,
}

impl Latch {
    pub fn update(&mut self, spec: &LatchSpec, progress: f64) -> bool {
        if self.fired && spec.policy == LatchPolicy::ResetOnReenter && progress <= 0.0 {
            self.fired = false;
        }
        if !self.fired && progress >= spec.threshold {
            self.fired = true;
        }
        self.fired
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }
}
