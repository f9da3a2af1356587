//! First-visit intro: title, warp jump, then the main scene.
//!
//! The sequence only moves forward:
//!
//! ```text
//! Initial --enter()--> TextFading --text_fade--> Warping --warp--> Finished
//! ```
//!
//! Visitors who have already seen it this session (the `hasVisitedHomePage`
//! flag is set) start at `Finished` with the main content already shown.

use crate::glow::BloomSettings;
use crate::timer::TimerQueue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Session flag written when the intro is dismissed.
pub const HAS_VISITED_KEY: &str = "hasVisitedHomePage";

/// Where the intro currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimationPhase {
    Initial,
    TextFading,
    Warping,
    Finished,
}

/// Session-scoped boolean flags.
pub trait SessionStore {
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str, value: bool);
}

/// In-memory store, lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    flags: HashMap<String, bool>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already has the visited flag set.
    pub fn visited() -> Self {
        let mut store = Self::new();
        store.set_flag(HAS_VISITED_KEY, true);
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }
}

/// Intro phase lengths, seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroTimings {
    pub text_fade: f32,
    pub warp: f32,
    /// Delay between finishing and showing the main content.
    pub reveal_delay: f32,
}

impl Default for IntroTimings {
    fn default() -> Self {
        Self {
            text_fade: 1.5,
            warp: 1.5,
            reveal_delay: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Warp,
    Finish,
    Reveal,
}

#[derive(Debug, Clone)]
pub struct IntroSequence {
    phase: AnimationPhase,
    timings: IntroTimings,
    timers: TimerQueue<Step>,
    content_visible: bool,
}

impl IntroSequence {
    /// Start the intro, or skip it if this session has seen it.
    pub fn mount(store: &dyn SessionStore, timings: IntroTimings) -> Self {
        let visited = store.get_flag(HAS_VISITED_KEY);
        if visited {
            log::info!("returning visitor, skipping intro");
        }
        Self {
            phase: if visited { AnimationPhase::Finished } else { AnimationPhase::Initial },
            timings,
            timers: TimerQueue::new(),
            content_visible: visited,
        }
    }

    /// Skip straight to the main content.
    pub fn skipped(timings: IntroTimings) -> Self {
        Self::mount(&MemorySessionStore::visited(), timings)
    }

    /// Dismiss the title. Only acts from `Initial`; returns whether it did.
    pub fn enter(&mut self, store: &mut dyn SessionStore) -> bool {
        if self.phase != AnimationPhase::Initial {
            return false;
        }
        store.set_flag(HAS_VISITED_KEY, true);
        let t = self.timings;
        self.timers.schedule_once(t.text_fade, Step::Warp);
        self.timers.schedule_once(t.text_fade + t.warp, Step::Finish);
        self.set_phase(AnimationPhase::TextFading);
        true
    }

    pub fn update(&mut self, dt: f32) {
        for step in self.timers.advance(dt) {
            match step {
                Step::Warp => self.set_phase(AnimationPhase::Warping),
                Step::Finish => {
                    self.set_phase(AnimationPhase::Finished);
                    self.timers.schedule_once(self.timings.reveal_delay, Step::Reveal);
                }
                Step::Reveal => {
                    self.content_visible = true;
                    log::info!("main content revealed");
                }
            }
        }
    }

    fn set_phase(&mut self, phase: AnimationPhase) {
        if phase > self.phase {
            log::debug!("intro phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn starfield_warp_active(&self) -> bool {
        self.phase == AnimationPhase::Warping
    }

    pub fn starfield_visible(&self) -> bool {
        matches!(self.phase, AnimationPhase::TextFading | AnimationPhase::Warping)
    }

    /// Bloom for the intro canvas: blown out while warping.
    pub fn intro_bloom(&self) -> BloomSettings {
        if self.starfield_warp_active() {
            BloomSettings {
                intensity: 30.0,
                luminance_threshold: 0.0,
                luminance_smoothing: 0.8,
            }
        } else {
            BloomSettings {
                intensity: 0.5,
                luminance_threshold: 0.1,
                luminance_smoothing: 0.8,
            }
        }
    }

    /// Target opacity of the intro title.
    pub fn title_opacity(&self) -> f32 {
        match self.phase {
            AnimationPhase::Initial | AnimationPhase::TextFading => 1.0,
            AnimationPhase::Warping | AnimationPhase::Finished => 0.0,
        }
    }

    /// Target scale of the intro title; it shrinks while fading.
    pub fn title_scale(&self) -> f32 {
        if self.phase == AnimationPhase::TextFading {
            0.8
        } else {
            1.0
        }
    }

    pub fn main_content_visible(&self) -> bool {
        self.content_visible
    }

    /// Cancel pending phase changes.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_visit_runs_sequence() {
        let mut store = MemorySessionStore::new();
        let mut intro = IntroSequence::mount(&store, IntroTimings::default());
        assert_eq!(intro.phase(), AnimationPhase::Initial);
        assert!(!intro.main_content_visible());

        intro.update(10.0);
        assert_eq!(intro.phase(), AnimationPhase::Initial);

        assert!(intro.enter(&mut store));
        assert!(store.get_flag(HAS_VISITED_KEY));
        assert_eq!(intro.phase(), AnimationPhase::TextFading);
        assert!(intro.starfield_visible());
        assert!(!intro.starfield_warp_active());

        intro.update(1.5);
        assert_eq!(intro.phase(), AnimationPhase::Warping);
        assert!(intro.starfield_warp_active());
        assert_eq!(intro.intro_bloom().intensity, 30.0);

        intro.update(1.5);
        assert_eq!(intro.phase(), AnimationPhase::Finished);
        assert!(!intro.main_content_visible());

        intro.update(0.5);
        assert!(intro.main_content_visible());
        assert_eq!(intro.pending_timers(), 0);
    }

    #[test]
    fn test_enter_only_once() {
        let mut store = MemorySessionStore::new();
        let mut intro = IntroSequence::mount(&store, IntroTimings::default());
        assert!(intro.enter(&mut store));
        assert!(!intro.enter(&mut store));
        assert_eq!(intro.pending_timers(), 2);
    }

    #[test]
    fn test_returning_visitor_skips() {
        let store = MemorySessionStore::visited();
        let mut intro = IntroSequence::mount(&store, IntroTimings::default());
        assert_eq!(intro.phase(), AnimationPhase::Finished);
        assert!(intro.main_content_visible());
        let mut store = store;
        assert!(!intro.enter(&mut store));
    }

    #[test]
    fn test_single_large_step_lands_in_order() {
        let mut store = MemorySessionStore::new();
        let mut intro = IntroSequence::mount(&store, IntroTimings::default());
        intro.enter(&mut store);
        intro.update(3.0);
        assert_eq!(intro.phase(), AnimationPhase::Finished);
        intro.update(0.5);
        assert!(intro.main_content_visible());
    }

    #[test]
    fn test_title_hooks() {
        let mut store = MemorySessionStore::new();
        let mut intro = IntroSequence::mount(&store, IntroTimings::default());
        assert_eq!((intro.title_opacity(), intro.title_scale()), (1.0, 1.0));
        intro.enter(&mut store);
        assert_eq!((intro.title_opacity(), intro.title_scale()), (1.0, 0.8));
        intro.update(1.5);
        assert_eq!(intro.title_opacity(), 0.0);
        assert_eq!(intro.intro_bloom().luminance_threshold, 0.0);
    }

    #[test]
    fn test_teardown_cancels() {
        let mut store = MemorySessionStore::new();
        let mut intro = IntroSequence::mount(&store, IntroTimings::default());
        intro.enter(&mut store);
        intro.teardown();
        intro.update(10.0);
        assert_eq!(intro.phase(), AnimationPhase::TextFading);
    }
}
