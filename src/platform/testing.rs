//! Collaborator doubles for tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{AudioSink, HighScoreStore, PlatformError, ScoreEntry, Scoreboard, SoundEffect};

/// Store whose value stays visible to the test after boxing
#[derive(Debug, Default, Clone)]
pub struct SharedStore {
    pub value: Rc<Cell<u64>>,
    pub saves: Rc<Cell<u32>>,
}

impl SharedStore {
    pub fn with_value(value: u64) -> Self {
        let store = Self::default();
        store.value.set(value);
        store
    }
}

impl HighScoreStore for SharedStore {
    fn load(&mut self) -> Result<u64, PlatformError> {
        Ok(self.value.get())
    }

    fn save(&mut self, score: u64) -> Result<(), PlatformError> {
        self.value.set(score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Store that fails every call
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl HighScoreStore for FailingStore {
    fn load(&mut self) -> Result<u64, PlatformError> {
        Err(PlatformError::Unavailable("high score store"))
    }

    fn save(&mut self, _score: u64) -> Result<(), PlatformError> {
        Err(PlatformError::Storage("disk full".into()))
    }
}

/// Scoreboard that records submissions
#[derive(Debug, Default, Clone)]
pub struct RecordingScoreboard {
    pub submitted: Rc<RefCell<Vec<u64>>>,
    pub fail: bool,
}

impl Scoreboard for RecordingScoreboard {
    fn submit(&mut self, score: u64) -> Result<(), PlatformError> {
        if self.fail {
            return Err(PlatformError::Unavailable("scoreboard"));
        }
        self.submitted.borrow_mut().push(score);
        Ok(())
    }

    fn fetch_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, PlatformError> {
        if self.fail {
            return Err(PlatformError::Unavailable("scoreboard"));
        }
        let mut scores = self.submitted.borrow().clone();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        Ok(scores
            .into_iter()
            .take(n)
            .map(|score| ScoreEntry { score })
            .collect())
    }
}

/// Audio sink that records what was played
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Rc<RefCell<Vec<SoundEffect>>>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.borrow_mut().push(effect);
    }
}
