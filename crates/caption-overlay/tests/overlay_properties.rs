//! Property-based tests for the per-frame overlay pipeline
//!
//! Identical inputs must give identical outputs, and the tracker, tokenizer
//! and outline synthesizer must stay inside their documented ranges for any
//! input.

use caption_core::{
    resolve_styling, CaptionEntry, PartialHighlight, PartialStylingDescriptor, Rgba,
};
use caption_overlay::layout::{compute_scale, ReferenceResolution};
use caption_overlay::{
    compose_overlay, synthesize_outline, tokenize, track, CaptionSnapshot, OutlineCache,
    OverlayConfig, PlaybackState, SpanKind, ViewportSize,
};
use proptest::prelude::*;

/// Entries with arbitrary, possibly overlapping or reversed intervals
fn arb_entries() -> impl Strategy<Value = Vec<CaptionEntry>> {
    prop::collection::vec((0.0f64..60.0, 0.0f64..10.0, "[a-z ]{0,20}"), 0..8).prop_map(
        |items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (start, len, text))| {
                    CaptionEntry::new(i as i64 + 1, start, start + len, text)
                })
                .collect()
        },
    )
}

fn arb_sentence() -> impl Strategy<Value = String> {
    "[a-z]{1,6}( [a-z]{1,6}){0,6}"
}

proptest! {
    #[test]
    fn tracker_is_deterministic(entries in arb_entries(), t in -5.0f64..80.0, playing: bool) {
        prop_assert_eq!(track(&entries, t, playing), track(&entries, t, playing));
    }

    #[test]
    fn tracker_picks_first_containing_entry(entries in arb_entries(), t in 0.0f64..70.0) {
        let state = track(&entries, t, true);
        let expected = entries.iter().position(|e| e.contains(t));
        prop_assert_eq!(state.active.map(|a| a.index), expected);
        match state.active {
            Some(active) => prop_assert!((0.0..=1.0).contains(&active.progress)),
            None => prop_assert_eq!(state.progress(), -1.0),
        }
    }

    #[test]
    fn paused_tracker_always_shows_something(entries in arb_entries(), t in 0.0f64..70.0) {
        prop_assume!(!entries.is_empty());
        prop_assert!(track(&entries, t, false).active.is_some());
    }

    #[test]
    fn karaoke_keeps_text_and_marks_one_word(text in arb_sentence(), progress in 0.0f64..=1.0) {
        let style = resolve_styling(&PartialStylingDescriptor {
            highlight: PartialHighlight { active_word: Some(true), ..Default::default() },
            ..Default::default()
        });
        let spans = tokenize(&text, style.highlight(), 1.0, progress, false);
        let joined: String = spans.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(&joined, &text);

        let highlighted: Vec<_> = spans.iter().filter(|s| s.kind == SpanKind::Highlighted).collect();
        prop_assert_eq!(highlighted.len(), 1);
        prop_assert!(!highlighted[0].outlined);
        prop_assert_eq!(spans.clone(), tokenize(&text, style.highlight(), 1.0, progress, false));
    }

    #[test]
    fn outline_stays_within_stroke(width in 0.0f32..10.0, scale in 0.1f32..3.0) {
        let layers = synthesize_outline(width, scale, Rgba::BLACK);
        let scaled = width * scale;
        if scaled > 0.0 {
            prop_assert!(layers.len() >= 8);
        }
        for layer in &layers {
            let radius = (layer.dx * layer.dx + layer.dy * layer.dy).sqrt();
            prop_assert!(radius <= scaled + 0.1);
        }
        prop_assert_eq!(layers, synthesize_outline(width, scale, Rgba::BLACK));
    }

    #[test]
    fn scaled_canvas_fits_viewport(width in 1.0f32..4000.0, height in 1.0f32..4000.0, portrait: bool) {
        let reference = if portrait {
            ReferenceResolution::new(720, 1280)
        } else {
            ReferenceResolution::new(1280, 720)
        };
        let scale = compute_scale(reference, ViewportSize::new(width, height));
        prop_assert!(scale > 0.0);
        prop_assert!(reference.width as f32 * scale <= width * 1.0001);
        prop_assert!(reference.height as f32 * scale <= height * 1.0001);
    }

    #[test]
    fn composition_is_deterministic(
        entries in arb_entries(),
        t in 0.0f64..70.0,
        playing: bool,
        width in 100.0f32..2000.0,
        height in 100.0f32..2000.0,
    ) {
        let snapshot = CaptionSnapshot { entries, ..CaptionSnapshot::default() };
        let config = OverlayConfig::default();
        let mut cache = OutlineCache::new(config.outline_cache_capacity);
        let playback = PlaybackState { current_time: t, is_playing: playing };
        let viewport = ViewportSize::new(width, height);

        let first = compose_overlay(&snapshot, playback, viewport, &config, &mut cache);
        let second = compose_overlay(&snapshot, playback, viewport, &config, &mut cache);
        prop_assert_eq!(first, second);
    }
}
