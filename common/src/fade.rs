use std::time::{Duration, Instant};

use crate::setting::FadeSetting;

/// Idle-driven opacity decay.
///
/// ACTIVE while input is fresh; once the idle time reaches the configured
/// duration the controller switches to fading and lowers opacity by one step
/// per interval, floored at zero. Any new input snaps opacity back to 1.0.
#[derive(Debug)]
pub struct FadeController {
    enabled: bool,
    idle_duration: Duration,
    interval: Duration,
    step: f32,
    opacity: f32,
    last_input: Instant,
    /// `Some` while fading; the instant of the next decay tick.
    next_tick: Option<Instant>,
}

impl FadeController {
    /// the catch-up loop in [`Self::poll`] advances by whole intervals; a
    /// zero interval would never advance
    const MIN_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new(setting: &FadeSetting, now: Instant) -> Self {
        Self {
            enabled: setting.enabled,
            idle_duration: setting.idle_duration(),
            interval: setting.interval().max(Self::MIN_INTERVAL),
            step: setting.step.max(0.0),
            opacity: 1.0,
            last_input: now,
            next_tick: None,
        }
    }

    /// Records fresh input: opacity back to 1.0, idle clock restarted.
    ///
    /// Returns `true` if a fade was in progress (opacity below 1.0), in which
    /// case the caller clears its history before recording the new token.
    pub fn on_input(&mut self, now: Instant) -> bool {
        let was_fading = self.opacity < 1.0;
        self.opacity = 1.0;
        self.last_input = now;
        self.next_tick = None;
        was_fading
    }

    /// Advances the state machine to `now`.
    ///
    /// Returns `true` exactly when this poll crossed the idle threshold and
    /// began a fade cycle; the caller clears its history on that signal.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(next_tick) = self.next_tick {
            let mut next_tick = next_tick;
            while next_tick <= now {
                self.opacity = (self.opacity - self.step).max(0.0);
                next_tick += self.interval;
            }
            self.next_tick = Some(next_tick);
            return false;
        }
        let idle = now.saturating_duration_since(self.last_input);
        if idle >= self.idle_duration && self.opacity > 0.0 {
            // first decay tick lands on the transition itself
            self.opacity = (self.opacity - self.step).max(0.0);
            self.next_tick = Some(now + self.interval);
            return true;
        }
        false
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// How long the UI may sleep before the controller needs another poll.
    pub fn next_wake(&self, now: Instant) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        match self.next_tick {
            Some(next_tick) => {
                (self.opacity > 0.0).then(|| next_tick.saturating_duration_since(now))
            }
            None => {
                let deadline = self.last_input.checked_add(self.idle_duration)?;
                Some(deadline.saturating_duration_since(now))
            }
        }
    }

    pub fn reload(&mut self, setting: &FadeSetting) {
        self.enabled = setting.enabled;
        self.idle_duration = setting.idle_duration();
        self.interval = setting.interval().max(Self::MIN_INTERVAL);
        self.step = setting.step.max(0.0);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        if !self.enabled {
            self.opacity = 1.0;
            self.next_tick = None;
        }
    }
}
