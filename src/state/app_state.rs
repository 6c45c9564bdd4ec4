use crate::components::confetti::Confetti;
use crate::components::geometry::SPIN_EASING;
use crate::state::wheel::SpinState;
use chrono::{DateTime, Local};
use sheet_feed::ParticipantList;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Wheel rotation animation
// ---------------------------------------------------------------------------

/// Eased interpolation from the previous rotation target to the new one.
#[derive(Debug, Default, Clone)]
pub struct WheelAnimation {
    pub from: f64,
    pub to: f64,
    pub started: Option<Instant>,
    pub duration: Duration,
}

impl WheelAnimation {
    pub fn start(&mut self, from: f64, to: f64, duration: Duration, now: Instant) {
        *self = Self { from, to, started: Some(now), duration };
    }

    /// Wheel angle at `now`; settles on `to` once the duration has elapsed.
    pub fn angle_at(&self, now: Instant) -> f64 {
        let Some(started) = self.started else {
            return self.to;
        };
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(started).as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * SPIN_EASING.ease(t)
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|started| now.saturating_duration_since(started) < self.duration)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    /// True until the one-shot participant load finishes, successfully or not.
    pub loading: bool,
    /// Spinner frame shown while `loading`; advanced by the animation tick.
    pub spinner_frame: usize,
    pub participants: ParticipantList,
    pub spin: SpinState,
    pub animation: WheelAnimation,
    pub confetti: Confetti,
    pub drawn_at: Option<DateTime<Local>>,
    pub show_logs: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(spin_duration: Duration) -> Self {
        Self {
            loading: true,
            spin: SpinState::new(spin_duration),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_animation_reports_target() {
        let anim = WheelAnimation { to: 90.0, ..Default::default() };
        assert_eq!(anim.angle_at(Instant::now()), 90.0);
        assert!(!anim.is_running(Instant::now()));
    }

    #[test]
    fn animation_moves_forward_and_settles() {
        let start = Instant::now();
        let mut anim = WheelAnimation::default();
        anim.start(100.0, 2260.0, Duration::from_secs(10), start);

        assert_eq!(anim.angle_at(start), 100.0);
        let midway = anim.angle_at(start + Duration::from_secs(5));
        assert!(midway > 1180.0 && midway < 2260.0, "midway at {midway}");
        assert!(anim.is_running(start + Duration::from_secs(9)));
        assert_eq!(anim.angle_at(start + Duration::from_secs(10)), 2260.0);
        assert!(!anim.is_running(start + Duration::from_secs(10)));
    }

    #[test]
    fn new_state_starts_loading() {
        let state = AppState::new(Duration::from_secs(1));
        assert!(state.loading);
        assert!(!state.should_quit);
        assert!(state.participants.is_empty());
        assert_eq!(state.spin.duration(), Duration::from_secs(1));
    }
}
