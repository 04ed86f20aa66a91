//! Session controller
//!
//! Owns the running `GameSession` and everything outside it: the persisted
//! high score, the scoreboard, audio and HUD feedback. Collaborator failures
//! stop here; they are logged and the run carries on with in-memory state.

use crate::consts::{MAX_FRAME_DT, SIM_DT};
use crate::platform::assets::{self, AssetProvider};
use crate::platform::{AudioSink, HighScoreStore, ScoreEntry, Scoreboard, SoundEffect};
use crate::settings::Settings;
use crate::sim::{FatalCause, GameEvent, GameSession, Hitboxes, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{Feedback, Hud, TOP_SCORES_SHOWN};

/// Simulation steps allowed per host frame
const MAX_SUBSTEPS: u32 = 8;

/// Lifecycle of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing started yet
    Idle,
    Running,
    GameOver,
}

pub struct SessionController {
    state: SessionState,
    session: Option<GameSession>,
    tuning: Tuning,
    hitboxes: Hitboxes,
    settings: Settings,
    high_score: u64,
    /// Whether the last run beat the previous best
    new_record: bool,
    top_scores: Vec<ScoreEntry>,
    feedback: Feedback,
    /// Input edges not yet consumed by a tick
    pending: TickInput,
    accumulator: f32,
    store: Box<dyn HighScoreStore>,
    scoreboard: Box<dyn Scoreboard>,
    audio: Box<dyn AudioSink>,
}

impl SessionController {
    /// Build a controller and load the persisted best. A failing store leaves
    /// the best at 0.
    pub fn new(
        tuning: Tuning,
        mut store: Box<dyn HighScoreStore>,
        scoreboard: Box<dyn Scoreboard>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load high score: {}", e);
            0
        });
        log::info!("High score: {}", high_score);

        Self {
            state: SessionState::Idle,
            session: None,
            tuning,
            hitboxes: Hitboxes::default(),
            settings: Settings::default(),
            high_score,
            new_record: false,
            top_scores: Vec::new(),
            feedback: Feedback::new(),
            pending: TickInput::default(),
            accumulator: 0.0,
            store,
            scoreboard,
            audio,
        }
    }

    /// Derive hitboxes from the provider's sprites. Applies from the next start.
    pub fn use_assets(&mut self, provider: &dyn AssetProvider) {
        self.hitboxes = assets::hitboxes(provider);
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn new_record(&self) -> bool {
        self.new_record
    }

    pub fn top_scores(&self) -> &[ScoreEntry] {
        &self.top_scores
    }

    /// Begin a fresh run. Nothing carries over from a previous one.
    pub fn start(&mut self, seed: u64) {
        self.session = Some(GameSession::new(seed, self.tuning.clone(), self.hitboxes));
        self.state = SessionState::Running;
        self.new_record = false;
        self.feedback.clear();
        self.pending = TickInput::default();
        self.accumulator = 0.0;
        self.refresh_top_scores();
        log::info!("Run started with seed: {}", seed);
    }

    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting");
        self.start(seed);
    }

    /// Advance by one host frame of `frame_dt` seconds using fixed steps.
    /// Input edges are held until a step consumes them. While idle, a flip or
    /// restart edge starts a run. Once over, only a restart edge does, so the
    /// game-over screen survives stray flips.
    pub fn update(&mut self, input: TickInput, frame_dt: f32) -> Vec<GameEvent> {
        self.pending.flip |= input.flip;
        self.pending.restart |= input.restart;

        let mut events = Vec::new();
        let frame_dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.feedback.update(frame_dt);

        let starts = match self.state {
            SessionState::Running => None,
            SessionState::Idle => Some(self.pending.flip || self.pending.restart),
            SessionState::GameOver => Some(self.pending.restart),
        };
        if let Some(starts) = starts {
            self.pending = TickInput::default();
            if starts {
                let seed = self.next_seed();
                self.restart(seed);
            }
            return events;
        }

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.pending;
            events.extend(self.step(&input));
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot edges apply to a single step
            self.pending = TickInput::default();

            if self.state != SessionState::Running {
                break;
            }
        }

        events
    }

    /// Run one fixed simulation step and react to its events
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let events = tick(session, input, SIM_DT);

        for event in &events {
            match *event {
                GameEvent::Flipped { .. } => self.audio.play(SoundEffect::Flip),
                GameEvent::PhaseAdvanced { to, .. } => {
                    self.audio.play(SoundEffect::PhaseUp);
                    self.feedback
                        .phase_up(to, self.settings.effective_phase_flash());
                }
                GameEvent::GameOver { final_score } => self.finish(final_score),
                _ => {}
            }
        }

        events
    }

    /// End the run from outside the tick. Idempotent: returns the final
    /// score the first time, None afterwards.
    pub fn on_fatal_collision(&mut self, cause: FatalCause) -> Option<u64> {
        if self.state != SessionState::Running {
            return None;
        }
        let final_score = self.session.as_mut()?.end(cause)?;
        self.finish(final_score);
        Some(final_score)
    }

    /// Game-over bookkeeping: feedback, high score, scoreboard
    fn finish(&mut self, final_score: u64) {
        if self.state == SessionState::GameOver {
            return;
        }
        self.state = SessionState::GameOver;
        self.audio.play(SoundEffect::Hit);

        if final_score > self.high_score {
            self.high_score = final_score;
            self.new_record = true;
            if let Err(e) = self.store.save(final_score) {
                log::warn!("Could not save high score: {}", e);
            }
        }

        if let Err(e) = self.scoreboard.submit(final_score) {
            log::warn!("Could not submit score: {}", e);
        }
        self.refresh_top_scores();

        log::info!(
            "Game over: distance {} (best {}{})",
            final_score,
            self.high_score,
            if self.new_record { ", new record" } else { "" }
        );
    }

    fn refresh_top_scores(&mut self) {
        match self.scoreboard.fetch_top(TOP_SCORES_SHOWN) {
            Ok(top) => self.top_scores = top,
            Err(e) => log::warn!("Could not fetch top scores: {}", e),
        }
    }

    /// Seed for a run started from input rather than by the host
    fn next_seed(&self) -> u64 {
        let prev = self.session.as_ref().map(|s| s.seed).unwrap_or(0);
        prev.wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407)
    }

    /// HUD snapshot, None before the first start
    pub fn hud(&self) -> Option<Hud> {
        let session = self.session.as_ref()?;
        Some(Hud::new(
            session,
            self.high_score,
            &self.top_scores,
            &self.feedback,
        ))
    }
}
