use crate::components::geometry::slice_angle;
use log::debug;
use rand::Rng;
use sheet_feed::ParticipantList;
use std::time::Duration;

pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(25_000);
/// Extra full turns added on every spin, on top of everything already spun.
pub const TURNS_PER_SPIN: u32 = 6;

/// Identifies one spin so its deferred completion can be matched up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinId(u64);

impl SpinId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A spin whose winner is already decided but not yet revealed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpin {
    pub id: SpinId,
    pub winning_index: usize,
    /// Spin counter value to commit once the spin completes.
    pub spin_count: u32,
}

/// Side effects the runtime performs on behalf of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AnimateRotation { from: f64, to: f64, duration: Duration },
    ScheduleCompletion { spin_id: SpinId, after: Duration },
    LaunchConfetti,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinState {
    pub spinning: bool,
    pub winner_index: Option<usize>,
    pub spin_count: u32,
    pub modal_visible: bool,
    /// Cumulative rotation target in degrees, as last requested.
    pub rotation: f64,
    pub pending: Option<PendingSpin>,
    next_id: u64,
    duration: Duration,
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_DURATION)
    }
}

/// Rotation that parks the center of `winning_index` under the pointer at the
/// top, after `spin_count * TURNS_PER_SPIN` full turns.
pub fn rotation_target(count: usize, winning_index: usize, spin_count: u32) -> f64 {
    let slice = slice_angle(count);
    let mid_angle = winning_index as f64 * slice + slice / 2.0;
    let stop_angle = 360.0 - mid_angle;
    let full_spins = f64::from(spin_count) * 360.0 * f64::from(TURNS_PER_SPIN);
    full_spins + stop_angle
}

impl SpinState {
    pub fn new(duration: Duration) -> Self {
        Self {
            spinning: false,
            winner_index: None,
            spin_count: 0,
            modal_visible: false,
            rotation: 0.0,
            pending: None,
            next_id: 0,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn can_spin(&self, participant_count: usize) -> bool {
        participant_count > 0 && !self.spinning
    }

    /// Start a spin. The winner is drawn before anything moves; the rotation
    /// is then computed to land on it. No-op without participants or while a
    /// spin is in flight.
    pub fn spin<R: Rng>(&mut self, participant_count: usize, rng: &mut R) -> Vec<Effect> {
        if !self.can_spin(participant_count) {
            return Vec::new();
        }

        let winning_index = rng.random_range(0..participant_count);
        let spin_count = self.spin_count + 1;
        let target = rotation_target(participant_count, winning_index, spin_count);

        self.next_id += 1;
        let id = SpinId(self.next_id);
        let from = self.rotation;

        self.spinning = true;
        self.winner_index = None;
        self.modal_visible = false;
        self.rotation = target;
        self.pending = Some(PendingSpin { id, winning_index, spin_count });

        debug!("spin {} started: index {winning_index}, target {target:.2}°", id.0);

        vec![
            Effect::AnimateRotation { from, to: target, duration: self.duration },
            Effect::ScheduleCompletion { spin_id: id, after: self.duration },
        ]
    }

    /// Reveal the winner of the pending spin. Completions for any other spin
    /// id are ignored.
    pub fn complete(&mut self, spin_id: SpinId) -> Vec<Effect> {
        let Some(pending) = self.pending.filter(|p| p.id == spin_id) else {
            debug!("ignoring stale completion for spin {}", spin_id.0);
            return Vec::new();
        };

        self.pending = None;
        self.spin_count = pending.spin_count;
        self.winner_index = Some(pending.winning_index);
        self.spinning = false;
        self.modal_visible = true;

        vec![Effect::LaunchConfetti]
    }

    pub fn close_modal(&mut self) {
        self.modal_visible = false;
    }

    pub fn winner<'a>(&self, participants: &'a ParticipantList) -> Option<&'a str> {
        participants.get(self.winner_index?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scheduled_id(effects: &[Effect]) -> SpinId {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleCompletion { spin_id, .. } => Some(*spin_id),
                _ => None,
            })
            .expect("spin should schedule a completion")
    }

    fn run_spin(state: &mut SpinState, count: usize, rng: &mut StdRng) -> f64 {
        let effects = state.spin(count, rng);
        let id = scheduled_id(&effects);
        let target = state.rotation;
        state.complete(id);
        target
    }

    #[test]
    fn target_parks_winning_slice_under_pointer() {
        for count in 1..=60 {
            let slice = 360.0 / count as f64;
            for index in 0..count {
                for spins in 1..=3 {
                    let target = rotation_target(count, index, spins);
                    let mid = index as f64 * slice + slice / 2.0;
                    let at_pointer = (target + mid).rem_euclid(360.0);
                    assert!(
                        at_pointer < 1e-6 || 360.0 - at_pointer < 1e-6,
                        "count={count} index={index} spins={spins}: slice center at {at_pointer}°"
                    );
                }
            }
        }
    }

    #[test]
    fn first_spin_matches_worked_example() {
        // 4 slices of 90°, index 2 centered at 225° -> stop at 135° after 6 turns.
        assert_eq!(rotation_target(4, 2, 1), 2160.0 + 135.0);
    }

    #[test]
    fn rotation_strictly_increases_across_spins() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut state = SpinState::default();
        let mut previous = state.rotation;
        for _ in 0..50 {
            let target = run_spin(&mut state, 7, &mut rng);
            assert!(target > previous, "{target} <= {previous}");
            previous = target;
        }
        assert_eq!(state.spin_count, 50);
    }

    #[test]
    fn spin_emits_animation_then_completion() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SpinState::new(Duration::from_millis(500));
        let effects = state.spin(3, &mut rng);

        assert_eq!(effects.len(), 2);
        assert!(matches!(
            effects[0],
            Effect::AnimateRotation { from, duration, .. }
                if from == 0.0 && duration == Duration::from_millis(500)
        ));
        assert!(matches!(
            effects[1],
            Effect::ScheduleCompletion { after, .. } if after == Duration::from_millis(500)
        ));
        assert!(state.spinning);
        assert_eq!(state.spin_count, 0, "counter only moves on completion");
        assert!(state.winner_index.is_none());
    }

    #[test]
    fn spin_while_spinning_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = SpinState::default();
        state.spin(5, &mut rng);
        let before = state.clone();

        let effects = state.spin(5, &mut rng);

        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn spin_without_participants_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SpinState::default();
        assert!(state.spin(0, &mut rng).is_empty());
        assert_eq!(state, SpinState::default());
    }

    #[test]
    fn completion_reveals_winner_and_requests_confetti() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = SpinState::default();
        let id = scheduled_id(&state.spin(4, &mut rng));
        let expected = state.pending.map(|p| p.winning_index);

        let effects = state.complete(id);

        assert_eq!(effects, vec![Effect::LaunchConfetti]);
        assert_eq!(state.winner_index, expected);
        assert_eq!(state.spin_count, 1);
        assert!(!state.spinning);
        assert!(state.modal_visible);
        assert!(state.pending.is_none());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = SpinState::default();
        let first = scheduled_id(&state.spin(4, &mut rng));
        state.complete(first);
        let _second = state.spin(4, &mut rng);
        let before = state.clone();

        assert!(state.complete(first).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn single_participant_always_wins() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = SpinState::default();
        let list = ParticipantList::new(vec!["solo".into()]);
        for _ in 0..10 {
            run_spin(&mut state, 1, &mut rng);
            assert_eq!(state.winner(&list), Some("solo"));
            assert_eq!(state.rotation.rem_euclid(360.0), 180.0);
        }
    }

    #[test]
    fn new_spin_hides_previous_winner() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = SpinState::default();
        run_spin(&mut state, 4, &mut rng);
        assert!(state.modal_visible);

        state.spin(4, &mut rng);
        assert!(!state.modal_visible);
        assert!(state.winner_index.is_none());
    }

    #[test]
    fn closing_modal_leaves_spin_alone() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = SpinState::default();
        let id = scheduled_id(&state.spin(4, &mut rng));
        state.close_modal();
        assert!(state.spinning);
        assert_eq!(state.complete(id), vec![Effect::LaunchConfetti]);
    }

    #[test]
    fn winners_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = SpinState::default();
        let mut hits = [0u32; 4];
        for _ in 0..4000 {
            run_spin(&mut state, 4, &mut rng);
            if let Some(index) = state.winner_index {
                hits[index] += 1;
            }
        }
        for (index, count) in hits.iter().enumerate() {
            assert!((850..=1150).contains(count), "index {index} won {count} times");
        }
    }
}
