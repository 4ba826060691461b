//! Headless entry point.
//!
//! Loads the editor config and a project (or builds a small demo one), logs
//! a summary, then plays the timeline once through on the ticker thread.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use studio_timeline::core::time::{self, from_seconds as secs};
use studio_timeline::{Asset, EditorConfig, EditorSession, MediaKind, TickOutcome, TrackKind};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting studio-timeline...");

    let config = match EditorConfig::default_path() {
        Some(path) => EditorConfig::load_or_default(&path),
        None => EditorConfig::default(),
    };

    let mut session = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => EditorSession::load(&path, config)
            .with_context(|| format!("failed to open project {}", path.display()))?,
        None => demo_session(config)?,
    };

    summarize(&session);
    play_through(&mut session)?;
    Ok(())
}

fn demo_session(config: EditorConfig) -> anyhow::Result<EditorSession> {
    let mut session = EditorSession::new("Demo", config);
    let intro = Asset::new("intro", "intro.mp4", MediaKind::Video, "file:///media/intro.mp4", Some(secs(8.0)));
    let music = Asset::new("music", "theme.wav", MediaKind::Audio, "file:///media/theme.wav", Some(secs(20.0)));

    let timeline = session.timeline_mut();
    timeline.set_duration(secs(12.0))?;
    let video = timeline.add_track(TrackKind::Video);
    let audio = timeline.add_track(TrackKind::Audio);
    timeline.add_track(TrackKind::Text);

    let clip = timeline.insert_media_clip(video, &intro, 0)?;
    timeline.split_clip(clip, secs(4.0))?;
    timeline.insert_media_clip(audio, &music, 0)?;
    let title = timeline.add_text_clip(secs(1.0))?;
    timeline.set_clip_text(title, "Hello, timeline")?;

    let project = session.project_mut();
    project.add_asset(intro);
    project.add_asset(music);
    Ok(session)
}

fn summarize(session: &EditorSession) {
    let timeline = session.timeline();
    log::info!(
        "project {}: {} long, {} tracks, {} clips",
        session.project().name,
        time::format_time(timeline.duration()),
        timeline.tracks().len(),
        timeline.clip_count()
    );
    for track in timeline.tracks() {
        for clip in timeline.clips_on_track(track.id) {
            log::info!(
                "  [{}] {} {}..{} ({})",
                track.name,
                clip.name,
                time::format_time(clip.start),
                time::format_time(clip.end()),
                clip.content.label()
            );
        }
    }
}

fn play_through(session: &mut EditorSession) -> anyhow::Result<()> {
    session.play().context("failed to start playback")?;
    let mut reported_second = session.playhead() / time::constants::NANOS_PER_SECOND;

    while session.is_playing() {
        match session.wait_tick(Duration::from_secs(1)) {
            Some(TickOutcome::ReachedEnd) => break,
            Some(TickOutcome::Advanced(position)) => {
                let second = position / time::constants::NANOS_PER_SECOND;
                if second != reported_second {
                    log::info!(
                        "playhead {} ({} audible clip(s))",
                        time::format_time(position),
                        session.audible_at_playhead().len()
                    );
                    reported_second = second;
                }
            }
            Some(TickOutcome::Idle) | None => {}
        }
    }

    log::info!("playback finished");
    Ok(())
}
