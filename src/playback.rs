//! Playback controller.
//!
//! Advances the current animation frame index at the fixed tick rate,
//! decoupled from the variable-rate render loop. The frame index is
//! 1-based while playing and 0 while stopped.

use crate::errors::{MarrowError, Result};

/// Frame-index state machine: `Stopped` holds frame 0, `Playing` cycles
/// through `[1, frame_count]` and wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Playback {
    frame_count: usize,
    current_frame: usize,
    playing: bool,
}

impl Playback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a newly loaded clip; playback is implicitly stopped at
    /// frame 0 and the old clip's state is discarded.
    pub fn set_clip(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        self.stop();
    }

    #[inline]
    #[must_use]
    pub fn has_clip(&self) -> bool {
        self.frame_count > 0
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starts playback from the beginning; the next fixed tick lands on
    /// frame 1. Fails when no clip is loaded.
    pub fn play(&mut self) -> Result<()> {
        if !self.has_clip() {
            return Err(MarrowError::NoClipLoaded);
        }
        self.current_frame = 0;
        self.playing = true;
        Ok(())
    }

    /// Halts advancing and resets to frame 0.
    pub fn stop(&mut self) {
        self.current_frame = 0;
        self.playing = false;
    }

    /// One fixed tick: advances the frame, wrapping past the end back to
    /// frame 1. No-op while stopped.
    pub fn advance(&mut self) {
        if !self.playing {
            return;
        }
        self.current_frame += 1;
        if self.current_frame > self.frame_count {
            self.current_frame = 1;
        }
    }
}
