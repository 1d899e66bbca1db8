//! Countdown timers
//!
//! A timer counts `counter` down from `cooldown` while unpaused. Crossing
//! zero fires once; repeating timers then re-arm by adding `cooldown`,
//! one-shot timers stay expired until `reset`.

use std::fmt;

use super::context::Ctx;
use super::entity::Behavior;

/// Observable timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Freshly armed, nothing elapsed yet
    Idle,
    /// Counting toward zero
    CountingDown,
    /// Counter at or below zero (one-shot timers only stay here)
    Expired,
}

pub struct Timer {
    pub cooldown: f32,
    counter: f32,
    one_shot: bool,
    paused: bool,
    on_timeout: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("cooldown", &self.cooldown)
            .field("counter", &self.counter)
            .field("one_shot", &self.one_shot)
            .field("paused", &self.paused)
            .field("on_timeout", &self.on_timeout.is_some())
            .finish()
    }
}

impl Timer {
    /// Repeating timer
    pub fn repeating(cooldown: f32) -> Self {
        Self::new(cooldown, false)
    }

    pub fn one_shot(cooldown: f32) -> Self {
        Self::new(cooldown, true)
    }

    pub fn new(cooldown: f32, one_shot: bool) -> Self {
        let cooldown = cooldown.max(0.0);
        Self {
            cooldown,
            counter: cooldown,
            one_shot,
            paused: false,
            on_timeout: None,
        }
    }

    /// Attach a callback invoked synchronously on every expiry
    pub fn with_callback(mut self, on_timeout: impl FnMut() + 'static) -> Self {
        self.on_timeout = Some(Box::new(on_timeout));
        self
    }

    /// Start paused (power-up style timers armed later with `reset` + `unpause`)
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    pub fn reset(&mut self) {
        self.counter = self.cooldown;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    #[inline]
    pub fn counter(&self) -> f32 {
        self.counter
    }

    /// Unpaused and not yet expired
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.paused && self.counter > 0.0
    }

    pub fn state(&self) -> TimerState {
        if self.counter <= 0.0 {
            TimerState::Expired
        } else if self.counter >= self.cooldown {
            TimerState::Idle
        } else {
            TimerState::CountingDown
        }
    }

    /// Advance by `dt` seconds. Returns true if the timer fired.
    ///
    /// At most one expiry per call; non-positive or NaN `dt` never advances.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.paused || self.counter <= 0.0 || !(dt > 0.0) {
            return false;
        }

        self.counter -= dt;
        if self.counter > 0.0 {
            return false;
        }

        if let Some(on_timeout) = self.on_timeout.as_mut() {
            on_timeout();
        }
        if !self.one_shot {
            self.counter += self.cooldown;
            // Overshoot longer than a full cooldown
            if self.counter <= 0.0 {
                self.counter = self.cooldown;
            }
        }
        true
    }
}

/// A timer living in the entity tree.
///
/// Updated by the frame loop like any other entity; on expiry the callback
/// receives the frame context, so it can act on the timer's parent
/// (e.g. despawn it) or on the shared game state.
pub struct TimerNode<S: 'static> {
    pub timer: Timer,
    on_timeout: Box<dyn FnMut(&mut Ctx<'_, S>)>,
}

impl<S: 'static> TimerNode<S> {
    pub fn new(timer: Timer, on_timeout: impl FnMut(&mut Ctx<'_, S>) + 'static) -> Self {
        Self {
            timer,
            on_timeout: Box::new(on_timeout),
        }
    }
}

impl<S: 'static> Behavior<S> for TimerNode<S> {
    fn update(&mut self, ctx: &mut Ctx<'_, S>, dt: f32) {
        if self.timer.update(dt) {
            (self.on_timeout)(ctx);
        }
    }
}
