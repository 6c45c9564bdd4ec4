use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::wheel::{Effect, SpinId};
use chrono::Local;
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sheet_feed::ParticipantList;
use std::time::Instant;

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    rng: StdRng,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(AppSettings::load())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let app = Self {
            state: AppState::new(settings.spin_duration),
            settings,
            rng,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Participant load results, delivered by main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_participants_loaded(&mut self, participants: ParticipantList) {
        info!("wheel ready with {} participants", participants.len());
        self.state.participants = participants;
        self.state.loading = false;
    }

    /// Load failures only reach the log; the wheel stays empty.
    pub fn on_load_failed(&mut self, message: String) {
        error!("Sheet load error: {message}");
        self.state.loading = false;
    }

    // -----------------------------------------------------------------------
    // Wheel transitions
    // -----------------------------------------------------------------------

    pub fn spin(&mut self) -> Vec<Effect> {
        let count = self.state.participants.len();
        self.state.spin.spin(count, &mut self.rng)
    }

    pub fn on_spin_elapsed(&mut self, spin_id: SpinId) -> Vec<Effect> {
        let effects = self.state.spin.complete(spin_id);
        if !effects.is_empty() {
            self.state.drawn_at = Some(Local::now());
            if let Some(winner) = self.winner() {
                info!("winner: {winner}");
            }
        }
        effects
    }

    pub fn close_modal(&mut self) {
        self.state.spin.close_modal();
    }

    pub fn winner(&self) -> Option<&str> {
        self.state.spin.winner(&self.state.participants)
    }

    pub fn can_spin(&self) -> bool {
        self.state.spin.can_spin(self.state.participants.len())
    }

    // -----------------------------------------------------------------------
    // Presentation effects
    // -----------------------------------------------------------------------

    pub fn start_animation(&mut self, from: f64, to: f64, duration: std::time::Duration, now: Instant) {
        self.state.animation.start(from, to, duration, now);
    }

    pub fn launch_confetti(&mut self, now: Instant) {
        self.state.confetti.launch(&mut self.rng, now);
        debug!("confetti: {} particles in flight", self.state.confetti.len());
    }

    /// Called every animation tick.
    pub fn advance_animation(&mut self, now: Instant) {
        if self.state.loading {
            self.state.spinner_frame = self.state.spinner_frame.wrapping_add(1);
        }
        self.state.confetti.prune(now);
    }

    /// True while anything on screen changes between ticks.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.state.loading
            || self.state.animation.is_running(now)
            || !self.state.confetti.is_empty()
    }

    pub fn wheel_angle(&self, now: Instant) -> f64 {
        self.state.animation.angle_at(now)
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn request_quit(&mut self) {
        self.state.should_quit = true;
    }
}
