//! Built-in page description for the short-film promotional site the
//! engine was written for: hero, poem, horizontal gallery, poster/QR cards,
//! and a closing section with a latched color wash.

use crate::{
    binding::Channel,
    core::{Edge, Rgba8},
    curve::{LatchPolicy, LatchSpec},
    dsl::{PageBuilder, SectionBuilder, color_curve, scalar_curve},
    ease::Ease,
    error::ScrollFxResult,
    model::{Page, TrackSpec},
    progress::{OffsetRule, ScrollOffsets},
};

pub const POEM_LINES: usize = 14;

/// The deep red used by the closing wash overlay.
const WASH: Rgba8 = Rgba8::new(120, 0, 16, 255);

pub fn film_site() -> ScrollFxResult<Page> {
    let mut poem = SectionBuilder::new("poem").height(2.0);
    // Staggered line reveals: line i fades and rises over
    // [i/(n+2), (i+1)/(n+2)] of the section's pass through the viewport.
    let denom = (POEM_LINES + 2) as f64;
    for i in 0..POEM_LINES {
        let start = i as f64 / denom;
        let end = (i + 1) as f64 / denom;
        let target = format!("poem-line-{i}");
        poem = poem
            .bind(
                target.clone(),
                Channel::Opacity,
                scalar_curve([(start, 0.0), (end, 1.0)]),
            )
            .bind(
                target,
                Channel::TranslateY,
                scalar_curve([(start, 20.0), (end, 0.0)]),
            );
    }

    PageBuilder::new()
        .theme_role("background", "#faf7f2")
        .theme_role("ivory", "#f5f0e8")
        .theme_role("charcoal", "#2b2926")
        .theme_role("muted-foreground", "#8a857d")
        .section(
            SectionBuilder::new("hero")
                .bind(
                    "scroll-cue",
                    Channel::Opacity,
                    scalar_curve([(0.5, 1.0), (0.75, 0.0)]),
                )
                .build()?,
        )
        .section(poem.build()?)
        .section(
            // Video panel plus essay/poster panel, scroll-jacked while the
            // 300vh host is pinned.
            SectionBuilder::new("gallery")
                .height(3.0)
                .offsets(ScrollOffsets::PINNED)
                .bind(
                    "gallery-video",
                    Channel::Opacity,
                    scalar_curve([(0.0, 0.0), (0.3, 1.0), (0.7, 1.0), (1.0, 0.0)]),
                )
                .bind(
                    "gallery-video",
                    Channel::Scale,
                    scalar_curve([(0.0, 0.9), (0.3, 1.0)]),
                )
                .track(TrackSpec {
                    panel_widths: vec![1.0, 1.0],
                    tail_px: 64.0,
                })
                .build()?,
        )
        .section(
            // Reveal-once cards: latched so they stay in place after the
            // first reveal even when the user scrolls back up.
            SectionBuilder::new("poster-qr")
                .bind_latched(
                    "poster-card",
                    Channel::Opacity,
                    scalar_curve([(0.2, 0.0), (0.45, 1.0)]),
                    Ease::OutCubic,
                    LatchSpec {
                        threshold: 0.45,
                        policy: LatchPolicy::UntilUnmount,
                    },
                )
                .bind_latched(
                    "poster-card",
                    Channel::TranslateX,
                    scalar_curve([(0.2, -40.0), (0.45, 0.0)]),
                    Ease::OutCubic,
                    LatchSpec {
                        threshold: 0.45,
                        policy: LatchPolicy::UntilUnmount,
                    },
                )
                .bind_latched(
                    "qr-card",
                    Channel::Opacity,
                    scalar_curve([(0.3, 0.0), (0.55, 1.0)]),
                    Ease::OutCubic,
                    LatchSpec {
                        threshold: 0.55,
                        policy: LatchPolicy::UntilUnmount,
                    },
                )
                .bind_latched(
                    "qr-card",
                    Channel::TranslateX,
                    scalar_curve([(0.3, 40.0), (0.55, 0.0)]),
                    Ease::OutCubic,
                    LatchSpec {
                        threshold: 0.55,
                        policy: LatchPolicy::UntilUnmount,
                    },
                )
                .build()?,
        )
        .section(
            SectionBuilder::new("thank-you")
                // The page bottom is this section's bottom; finish the
                // range when both bottoms meet so the wash can complete.
                .offsets(ScrollOffsets {
                    enter: OffsetRule::new(Edge::Start, Edge::End),
                    exit: OffsetRule::new(Edge::End, Edge::End),
                })
                .bind_latched(
                    "blood-wash",
                    Channel::ColorWash,
                    color_curve([
                        (0.0, Rgba8::new(WASH.r, WASH.g, WASH.b, 0)),
                        (0.6, Rgba8::new(WASH.r, WASH.g, WASH.b, 200)),
                        (1.0, WASH),
                    ]),
                    Ease::Linear,
                    LatchSpec {
                        threshold: 0.95,
                        policy: LatchPolicy::UntilUnmount,
                    },
                )
                .bind(
                    "curtain",
                    Channel::HeightPercent,
                    scalar_curve([(0.0, 0.0), (1.0, 100.0)]),
                )
                .build()?,
        )
        .build()
}
