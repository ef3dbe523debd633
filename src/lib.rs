#![forbid(unsafe_code)]

pub mod binding;
pub mod core;
pub mod curve;
pub mod dsl;
pub mod ease;
pub mod error;
pub mod eval;
pub mod hub;
pub mod layout;
pub mod modal;
pub mod model;
pub mod presets;
pub mod progress;
pub mod range;

pub use binding::{BindingCurve, BoundValue, Channel, EffectBinding};
pub use self::core::{Edge, Progress, Rgba8, SectionRect, Viewport};
pub use curve::{Curve, CurveKey, Latch, LatchPolicy, LatchSpec, Lerp};
pub use ease::Ease;
pub use error::{ScrollFxError, ScrollFxResult};
pub use eval::{EvaluatedPage, EvaluatedSection, PageRuntime, ResolvedBinding};
pub use hub::{ScrollHub, Subscription};
pub use modal::{ModalOverlay, ScrollLock};
pub use model::{Page, Section, TrackSpec};
pub use progress::{OffsetRule, ProgressMapper, ScrollOffsets};
pub use range::TrackRange;
