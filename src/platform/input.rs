//! Input edge latching
//!
//! Browser events arrive between frames; the latch turns them into one
//! `TickInput` per simulation step. Holding the flip key yields a single flip.

use crate::sim::TickInput;

#[derive(Debug, Default, Clone)]
pub struct InputLatch {
    /// Flip key currently held
    held: bool,
    flip: bool,
    restart: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip key went down. Auto-repeat while held is ignored.
    pub fn key_down(&mut self) {
        if !self.held {
            self.flip = true;
        }
        self.held = true;
    }

    pub fn key_up(&mut self) {
        self.held = false;
    }

    /// Pointer or tap press: always a fresh edge
    pub fn pointer_down(&mut self) {
        self.flip = true;
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    /// Edges collected since the last call; clears them
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            flip: self.flip,
            restart: self.restart,
        };
        self.flip = false;
        self.restart = false;
        input
    }
}
