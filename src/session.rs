//! Editor session: one project, one transport, one optional ticker.
//!
//! The session is the single owner of the timeline. The ticker thread only
//! sends [`Tick`]s; they are applied here by [`EditorSession::pump`] or
//! [`EditorSession::wait_tick`], on the thread that owns the session.

use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::path::Path;
use std::time::Duration;

use crate::config::EditorConfig;
use crate::core::error::EditResult;
use crate::core::id::ClipId;
use crate::core::time::{self, Time};
use crate::core::timeline::Timeline;
use crate::playback::{PlaybackController, PlaybackState, Tick, TickOutcome, Ticker, TickerError, TickerHandle};
use crate::project::{Project, ProjectError};

struct RunningTicker {
    handle: TickerHandle,
    ticks: Receiver<Tick>,
}

pub struct EditorSession {
    config: EditorConfig,
    project: Project,
    playback: PlaybackController,
    ticker: Option<RunningTicker>,
}

impl EditorSession {
    /// Fresh, empty project laid out from `config`
    pub fn new(name: impl Into<String>, config: EditorConfig) -> Self {
        let mut project = Project::new(name, config.default_duration());
        project.timeline = Timeline::with_defaults(config.default_duration(), config.edit_defaults());
        project.timeline.scale = config.scale();
        Self::with_project(project, config)
    }

    /// Wrap an existing project. The config supplies edit defaults and the
    /// transport settings; the project keeps its own duration and zoom.
    pub fn with_project(mut project: Project, config: EditorConfig) -> Self {
        project.timeline.set_defaults(config.edit_defaults());
        let playback = config.playback_controller();
        Self {
            config,
            project,
            playback,
            ticker: None,
        }
    }

    pub fn load(path: &Path, config: EditorConfig) -> Result<Self, ProjectError> {
        Ok(Self::with_project(Project::load(path)?, config))
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        self.project.save(path)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn timeline(&self) -> &Timeline {
        &self.project.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.project.timeline
    }

    /// Run one edit against the timeline. Rejected edits are logged and
    /// returned unchanged; the timeline is untouched in that case.
    pub fn edit<T>(&mut self, name: &str, f: impl FnOnce(&mut Timeline) -> EditResult<T>) -> EditResult<T> {
        let result = f(&mut self.project.timeline);
        match &result {
            Ok(_) => log::debug!("{} applied", name),
            Err(e) => log::warn!("{} rejected: {}", name, e),
        }
        result
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn playhead(&self) -> Time {
        self.project.timeline.playhead()
    }

    /// Media under the playhead that should be heard, with its source time
    pub fn audible_at_playhead(&self) -> Vec<(ClipId, Time)> {
        let timeline = &self.project.timeline;
        timeline
            .audible_at(timeline.playhead())
            .into_iter()
            .map(|(clip, source)| (clip.id, source))
            .collect()
    }

    /// Start playing and spin up the ticker if it is not already running
    pub fn play(&mut self) -> Result<(), TickerError> {
        if self.ticker.is_none() {
            let (handle, ticks) = Ticker::start(self.playback.tick_interval())?;
            self.ticker = Some(RunningTicker { handle, ticks });
        }
        if self.playback.play() {
            log::info!("playing from {}", time::format_time(self.playhead()));
        }
        Ok(())
    }

    /// Pause and cancel the ticker. Ticks still in flight are discarded.
    pub fn pause(&mut self) {
        self.stop_ticker();
        if self.playback.pause() {
            log::info!("paused at {}", time::format_time(self.playhead()));
        }
    }

    pub fn toggle_playback(&mut self) -> Result<PlaybackState, TickerError> {
        if self.playback.is_playing() {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.playback.state())
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.handle.cancel();
        }
    }

    fn apply_tick(&mut self, tick: Tick) -> TickOutcome {
        let outcome = self.playback.tick(&mut self.project.timeline, tick.elapsed);
        if outcome == TickOutcome::ReachedEnd {
            log::info!("reached end of timeline");
            self.stop_ticker();
        }
        outcome
    }

    /// Apply every tick that has already arrived, without blocking.
    /// Returns the outcome of the last one applied.
    pub fn pump(&mut self) -> Option<TickOutcome> {
        let mut last = None;
        loop {
            let Some(ticker) = &self.ticker else { break };
            let tick = match ticker.ticks.try_recv() {
                Ok(tick) => tick,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.stop_ticker();
                    break;
                }
            };
            let outcome = self.apply_tick(tick);
            last = Some(outcome);
            if outcome == TickOutcome::ReachedEnd {
                break;
            }
        }
        last
    }

    /// Block for at most `timeout` waiting for the next tick and apply it.
    /// Returns `None` when nothing is ticking or the wait timed out.
    pub fn wait_tick(&mut self, timeout: Duration) -> Option<TickOutcome> {
        let ticker = self.ticker.as_ref()?;
        match ticker.ticks.recv_timeout(timeout) {
            Ok(tick) => Some(self.apply_tick(tick)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.stop_ticker();
                None
            }
        }
    }

    pub fn seek(&mut self, position: Time) -> Time {
        self.playback.seek(&mut self.project.timeline, position)
    }

    pub fn seek_to_pixel(&mut self, x: f64) -> Time {
        self.playback.seek_to_pixel(&mut self.project.timeline, x)
    }

    pub fn skip_forward(&mut self) -> Time {
        self.playback.skip_forward(&mut self.project.timeline)
    }

    pub fn skip_backward(&mut self) -> Time {
        self.playback.skip_backward(&mut self.project.timeline)
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
