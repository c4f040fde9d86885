//! End-to-end preview: store edits, media events and viewport changes
//! flowing through a `PreviewSession`

use caption_core::{CaptionEntry, PartialHighlight, PartialStylingDescriptor, VerticalPosition};
use caption_overlay::{
    CaptionSnapshot, ManualScheduler, MediaEvent, OutputFormat, OverlayConfig, PreviewSession,
    SimulatedMedia, SnapshotStore, SpanKind, ViewportSize,
};
use pretty_assertions::assert_eq;

fn entries() -> Vec<CaptionEntry> {
    vec![
        CaptionEntry::new(1, 0.0, 2.0, "hello world foo"),
        CaptionEntry::new(2, "0:02", "0:04", "second <h>line</h>"),
    ]
}

fn session(store: &SnapshotStore) -> PreviewSession<ManualScheduler> {
    let mut session =
        PreviewSession::new(store.clone(), ManualScheduler::new(), OverlayConfig::default())
            .unwrap();
    session.resize(ViewportSize::new(360.0, 640.0));
    session
}

#[test]
fn playing_media_selects_caption_by_time() {
    let store = SnapshotStore::new(CaptionSnapshot {
        entries: entries(),
        ..CaptionSnapshot::default()
    });
    let mut session = session(&store);
    let mut media = SimulatedMedia::new(6.0);

    media.seek(3.0);
    media.play();
    session.handle_media_event(MediaEvent::Play, Some(&media));
    let caption = session.frame().caption.clone().unwrap();
    assert_eq!(caption.entry_id, 2);
    assert_eq!(caption.progress, 0.5);
    assert!(!caption.is_preview);
    assert_eq!(
        caption
            .spans
            .iter()
            .filter(|s| s.kind == SpanKind::Highlighted)
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>(),
        ["line"]
    );

    media.seek(5.0);
    for token in session.clock_mut().scheduler_mut().take_due() {
        session.on_frame(token, Some(&media));
    }
    assert!(session.frame().is_empty());

    media.pause();
    session.handle_media_event(MediaEvent::Pause, Some(&media));
    let preview = session.frame().caption.clone().unwrap();
    assert_eq!(preview.entry_id, 1);
    assert_eq!(preview.progress, 0.5);
    assert!(preview.is_preview);
}

#[test]
fn style_edits_push_to_the_session() {
    let store = SnapshotStore::new(CaptionSnapshot {
        entries: entries(),
        ..CaptionSnapshot::default()
    });
    let mut session = session(&store);
    assert_eq!(session.frame().caption.as_ref().unwrap().style.font_size_px, 24.0);

    store
        .update_styling(&PartialStylingDescriptor {
            font_size: Some(80.0),
            position: Some("top".into()),
            highlight: PartialHighlight {
                active_word: Some(true),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

    let caption = session.frame().caption.clone().unwrap();
    assert_eq!(caption.style.font_size_px, 40.0);
    assert_eq!(caption.position.anchor, VerticalPosition::Top);
    assert_eq!(caption.position.offset_y_px, 30.0);
    assert_eq!(
        caption
            .spans
            .iter()
            .find(|s| s.kind == SpanKind::Highlighted)
            .map(|s| s.text.as_str()),
        Some("hello")
    );
}

#[test]
fn format_switch_rescales() {
    let store = SnapshotStore::new(CaptionSnapshot {
        entries: entries(),
        ..CaptionSnapshot::default()
    });
    let mut session = session(&store);
    session.resize(ViewportSize::new(640.0, 400.0));
    assert_eq!(session.frame().scale, 0.3125);

    store.set_format(OutputFormat::Landscape).unwrap();
    assert_eq!(session.frame().scale, 0.5);
}

#[test]
fn small_viewports_keep_legible_fonts() {
    let store = SnapshotStore::new(CaptionSnapshot {
        entries: entries(),
        ..CaptionSnapshot::default()
    });
    let mut session = session(&store);
    session.resize(ViewportSize::new(72.0, 128.0));
    let caption = session.frame().caption.clone().unwrap();
    assert_eq!(caption.style.font_size_px, 8.0);
}

#[test]
fn scrub_timeline_follows_media_duration() {
    let store = SnapshotStore::new(CaptionSnapshot {
        entries: entries(),
        ..CaptionSnapshot::default()
    });
    let mut session = session(&store);

    let timeline = session.scrub_timeline();
    assert_eq!(timeline.total_duration, 4.0);
    assert_eq!(timeline.segments[1].width_percent, 50.0);

    let media = SimulatedMedia::new(8.0);
    session.handle_media_event(MediaEvent::LoadedMetadata, Some(&media));
    let timeline = session.scrub_timeline();
    assert_eq!(timeline.total_duration, 8.0);
    assert_eq!(timeline.segments[1].left_percent, 25.0);
    assert_eq!(timeline.segments[1].label, "0:02");
    assert_eq!(timeline.seek_target(1), Some(2.0));
}

#[cfg(feature = "srt")]
#[test]
fn srt_import_feeds_the_store() {
    let document = caption_core::formats::parse_srt(
        "1\n00:00:00,000 --> 00:00:02,000\nhello\n\n2\n00:00:02,000 --> 00:00:04,500\nworld\n",
    );
    let store = SnapshotStore::new(CaptionSnapshot::default());
    let mut session = session(&store);
    assert!(session.frame().is_empty());

    store.update_entries(document.entries).unwrap();
    let mut media = SimulatedMedia::new(10.0);
    media.seek(4.25);
    session.handle_media_event(MediaEvent::Seeked, Some(&media));
    let caption = session.frame().caption.clone().unwrap();
    assert_eq!(caption.entry_id, 2);
    assert_eq!(caption.text(), "world");
}
