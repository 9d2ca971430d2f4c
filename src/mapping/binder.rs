//! Bind-by-listening session.
//!
//! Rebinding works by listening: the user picks an N64 button slot, then
//! presses the physical input that should drive it. The session compares
//! each polled snapshot against the previous one and binds the first
//! rising edge it sees, or gives up after a bounded number of ticks.
//! The caller owns all timing; every step here is a bounded synchronous
//! computation over two snapshots.

use statum::{machine, state};
use tracing::{debug, info, warn};

use crate::adapter::report::ControllerSnapshot;
use crate::input::classifier::detect_rising_edge;
use crate::input::logical::LogicalInput;
use crate::mapping::mapping_types::{ButtonMapping, N64Button};

#[state]
#[derive(Debug, Clone)]
pub enum BindState {
    Idle,
    Listening,
}

/// Owns the working [`ButtonMapping`] and drives one listening session at
/// a time. Thresholds mirror the classifier parameters and apply to every
/// session started from this binder.
#[machine]
#[derive(Debug)]
pub struct Binder<S: BindState> {
    mapping: ButtonMapping,
    trigger_threshold: f64,
    c_stick_threshold: f64,
    listen_budget: u32,

    // Listening-session fields; dormant while idle.
    slot: Option<N64Button>,
    prev: ControllerSnapshot,
    ticks_left: u32,
}

impl<S: BindState> Binder<S> {
    pub fn mapping(&self) -> &ButtonMapping {
        &self.mapping
    }
}

impl Binder<Idle> {
    /// Create an idle binder around an existing mapping.
    ///
    /// `listen_budget` is the number of poll ticks a listening session
    /// may run before timing out.
    pub fn create(
        mapping: ButtonMapping,
        trigger_threshold: f64,
        c_stick_threshold: f64,
        listen_budget: u32,
    ) -> Self {
        debug!(
            "Creating binder (trigger threshold {:.2}, c-stick threshold {:.2}, {} tick listen budget)",
            trigger_threshold, c_stick_threshold, listen_budget
        );
        Self::new(
            mapping,
            trigger_threshold,
            c_stick_threshold,
            listen_budget,
            None,
            ControllerSnapshot::default(),
            0,
        )
    }

    /// Begin listening for the input that should drive `slot`.
    ///
    /// `baseline` is the snapshot at the moment the session starts, so an
    /// input already held down does not count until it is released and
    /// pressed again.
    pub fn listen(mut self, slot: N64Button, baseline: ControllerSnapshot) -> Binder<Listening> {
        info!("Listening for an input to bind to {}", slot);
        self.slot = Some(slot);
        self.prev = baseline;
        self.ticks_left = self.listen_budget;
        self.transition()
    }

    /// Clear one slot directly, without a session.
    pub fn clear_slot(&mut self, slot: N64Button) -> Option<LogicalInput> {
        let cleared = self.mapping.clear(slot);
        if let Some(input) = cleared {
            info!("Cleared {} (was {})", slot, input);
        }
        cleared
    }

    /// Give up the mapping, consuming the binder.
    pub fn into_mapping(self) -> ButtonMapping {
        self.mapping
    }
}

/// Result of one listening tick.
pub enum ListenStep {
    /// Nothing newly pressed; keep polling.
    Pending(Binder<Listening>),
    /// An input crossed into active and was bound to the slot.
    Bound {
        binder: Binder<Idle>,
        slot: N64Button,
        input: LogicalInput,
    },
    /// The tick budget ran out with no input detected.
    TimedOut(Binder<Idle>),
}

impl Binder<Listening> {
    /// Feed one freshly polled snapshot into the session.
    pub fn step(mut self, snapshot: ControllerSnapshot) -> ListenStep {
        let slot = match self.slot {
            Some(slot) => slot,
            None => {
                // Unreachable through the public API; fail the session
                // rather than the process.
                warn!("Listening session without a slot, aborting");
                return ListenStep::TimedOut(self.finish());
            }
        };

        let detected = detect_rising_edge(
            &self.prev,
            &snapshot,
            self.trigger_threshold,
            self.c_stick_threshold,
        );

        if let Some(input) = detected {
            let displaced = self.mapping.assign(slot, input);
            for other in displaced {
                info!("Unbound {} from {}", input, other);
            }
            info!("Bound {} to {}", input, slot);

            let binder = self.finish();
            return ListenStep::Bound {
                binder,
                slot,
                input,
            };
        }

        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            info!("No input detected for {}, giving up", slot);
            return ListenStep::TimedOut(self.finish());
        }

        self.prev = snapshot;
        ListenStep::Pending(self)
    }

    /// Abort the session, leaving the mapping untouched.
    pub fn cancel(self) -> Binder<Idle> {
        debug!("Listening session cancelled");
        self.finish()
    }

    /// Ticks remaining before the session times out.
    pub fn ticks_left(&self) -> u32 {
        self.ticks_left
    }

    fn finish(mut self) -> Binder<Idle> {
        self.slot = None;
        self.ticks_left = 0;
        self.transition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> ControllerSnapshot {
        ControllerSnapshot {
            left_stick_x: 128,
            left_stick_y: 128,
            c_stick_x: 128,
            c_stick_y: 128,
            ..ControllerSnapshot::default()
        }
    }

    fn binder() -> Binder<Idle> {
        Binder::create(ButtonMapping::default(), 0.5, 0.5, 10)
    }

    #[test]
    fn binds_first_rising_edge_to_the_slot() {
        let listening = binder().listen(N64Button::L, neutral());

        let mut pressed = neutral();
        pressed.x = true;
        match listening.step(pressed) {
            ListenStep::Bound {
                binder,
                slot,
                input,
            } => {
                assert_eq!(slot, N64Button::L);
                assert_eq!(input, LogicalInput::X);
                assert_eq!(binder.mapping().get(N64Button::L), Some(LogicalInput::X));
            }
            _ => panic!("expected a binding"),
        }
    }

    #[test]
    fn input_held_at_baseline_is_not_an_edge() {
        let mut baseline = neutral();
        baseline.a = true;
        let listening = binder().listen(N64Button::B, baseline);

        let mut held = neutral();
        held.a = true;
        match listening.step(held) {
            ListenStep::Pending(_) => {}
            _ => panic!("held input must not bind"),
        }
    }

    #[test]
    fn binding_clears_the_duplicate_slot() {
        // Default Z slot listens to the Z input; listening on A and
        // pressing Z must move the binding over.
        let listening = binder().listen(N64Button::A, neutral());

        let mut pressed = neutral();
        pressed.z = true;
        match listening.step(pressed) {
            ListenStep::Bound { binder, .. } => {
                assert_eq!(binder.mapping().get(N64Button::A), Some(LogicalInput::Z));
                assert_eq!(binder.mapping().get(N64Button::Z), None);
            }
            _ => panic!("expected a binding"),
        }
    }

    #[test]
    fn trigger_squeeze_binds_after_crossing_threshold() {
        let mut listening = binder().listen(N64Button::R, neutral());

        // Below round(127 * 0.5) = 64: not yet an edge.
        let mut soft = neutral();
        soft.right_trigger = 40;
        listening = match listening.step(soft) {
            ListenStep::Pending(next) => next,
            _ => panic!("soft squeeze must not bind"),
        };

        let mut firm = neutral();
        firm.right_trigger = 200;
        match listening.step(firm) {
            ListenStep::Bound { input, .. } => assert_eq!(input, LogicalInput::RightTrigger),
            _ => panic!("expected a binding"),
        }
    }

    #[test]
    fn session_times_out_and_leaves_mapping_untouched() {
        let mut listening = binder().listen(N64Button::CDown, neutral());

        let mut steps = 0;
        let binder = loop {
            match listening.step(neutral()) {
                ListenStep::Pending(next) => {
                    steps += 1;
                    assert!(steps < 10, "session never timed out");
                    assert_eq!(next.ticks_left(), 10 - steps);
                    listening = next;
                }
                ListenStep::TimedOut(idle) => break idle,
                ListenStep::Bound { .. } => panic!("nothing was pressed"),
            }
        };

        assert_eq!(
            binder.mapping().get(N64Button::CDown),
            Some(LogicalInput::CStickDown)
        );
    }

    #[test]
    fn cancel_preserves_the_mapping() {
        let listening = binder().listen(N64Button::Start, neutral());
        let binder = listening.cancel();
        assert_eq!(
            binder.mapping().get(N64Button::Start),
            Some(LogicalInput::Start)
        );
    }

    #[test]
    fn clear_slot_while_idle() {
        let mut binder = binder();
        assert_eq!(binder.clear_slot(N64Button::CUp), Some(LogicalInput::CStickUp));
        assert_eq!(binder.clear_slot(N64Button::CUp), None);
    }
}
