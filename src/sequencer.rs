//! The animation sequencer: a four-state machine cycling between walking
//! and greeting.
//!
//! The sequencer owns the current discrete state, the pose pair being
//! blended and the duration of the blend. Each looping phase is described
//! by a static table of sub-steps; one generic step function interprets
//! the tables, so adding or retiming a keyframe is a data change. Every
//! transition is total over the closed pose set — a target pose outside
//! the active phase's table is a programming error, not a runtime
//! condition.

use blend::BlendSource;
use pose::{PoseId, PoseLibrary, Snapshot};
use skeleton::Skeleton;

/// Discrete state of the sequencer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    /// Looping through the four walk keyframes.
    Walking,
    /// Blending from the interrupted walk into the greeting entry pose.
    WalkingToGreeting,
    /// Looping through the greeting wave keyframes.
    Greeting,
    /// Blending from the interrupted greeting back into the walk.
    GreetingToWalking,
}

impl State {
    /// Display name of the state, for on-screen debug output.
    pub fn as_str(self) -> &'static str {
        match self {
            State::Walking => "WALKING",
            State::WalkingToGreeting => "WALKING_TO_GREETING",
            State::Greeting => "GREETING",
            State::GreetingToWalking => "GREETING_TO_WALKING",
        }
    }
}

/// How many full cycles each looping phase runs before handing over to
/// the other one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CycleLimits {
    /// Walk cycles before greeting. At least 1.
    pub walk: u32,
    /// Greeting waves before walking again. At least 1.
    pub greet: u32,
}

impl Default for CycleLimits {
    fn default() -> Self {
        CycleLimits { walk: 2, greet: 2 }
    }
}

/// Which cycle counter a phase drives.
#[derive(Clone, Copy, Debug)]
enum Counter {
    Walk,
    Greet,
}

/// One sub-step of a looping phase: completing a blend toward `at`
/// selects `next` as the following target.
struct CycleStep {
    at: PoseId,
    next: PoseId,
    duration: f32,
}

/// A looping phase: its sub-step table, the pose that closes a cycle, the
/// re-entry target for another cycle and the exit taken at the cycle
/// limit.
struct Cycle {
    counter: Counter,
    steps: &'static [CycleStep],
    closing: PoseId,
    reentry: (PoseId, f32),
    exit: (State, PoseId, f32),
}

/// A transition phase: a single sub-step handing over to a looping phase
/// and resetting its counter.
struct Handoff {
    state: State,
    counter: Counter,
    target: PoseId,
    duration: f32,
}

static WALKING: Cycle = Cycle {
    counter: Counter::Walk,
    steps: &[
        CycleStep { at: PoseId::Walk2, next: PoseId::Walk3, duration: 0.9 },
        CycleStep { at: PoseId::Walk3, next: PoseId::Walk4, duration: 0.5 },
        CycleStep { at: PoseId::Walk4, next: PoseId::Walk1, duration: 0.9 },
    ],
    closing: PoseId::Walk1,
    reentry: (PoseId::Walk2, 0.5),
    exit: (State::WalkingToGreeting, PoseId::Greet0, 1.5),
};

static GREETING: Cycle = Cycle {
    counter: Counter::Greet,
    steps: &[
        CycleStep { at: PoseId::Greet1, next: PoseId::Greet2, duration: 0.3 },
        CycleStep { at: PoseId::Greet2, next: PoseId::Greet3, duration: 0.4 },
        CycleStep { at: PoseId::Greet3, next: PoseId::Greet4, duration: 0.3 },
    ],
    closing: PoseId::Greet4,
    reentry: (PoseId::Greet2, 0.4),
    exit: (State::GreetingToWalking, PoseId::Walk1, 1.0),
};

static WALKING_TO_GREETING: Handoff = Handoff {
    state: State::Greeting,
    counter: Counter::Greet,
    target: PoseId::Greet1,
    duration: 1.0,
};

static GREETING_TO_WALKING: Handoff = Handoff {
    state: State::Walking,
    counter: Counter::Walk,
    target: PoseId::Walk2,
    duration: 0.5,
};

/// Blend origin: a named pose while looping, a snapshot while
/// transitioning between phases.
#[derive(Clone, Debug)]
enum Origin {
    Pose(PoseId),
    Snapshot(Snapshot),
}

/// Drives which two poses are being blended, and for how long.
///
/// The sequencer accumulates externally supplied frame deltas; it has no
/// notion of wall-clock time. It loops forever through its four states,
/// so there is no completion or error path.
#[derive(Clone, Debug)]
pub struct Sequencer {
    state: State,
    origin: Origin,
    target: PoseId,
    duration: f32,
    phase: f32,
    walk_cycles: u32,
    greet_cycles: u32,
    limits: CycleLimits,
}

impl Sequencer {
    /// Creates a sequencer in the walking state, blending from the first
    /// contact pose toward the first passing pose.
    ///
    /// # Panics
    /// Panics if either cycle limit is zero.
    pub fn new(limits: CycleLimits) -> Self {
        assert!(
            limits.walk >= 1 && limits.greet >= 1,
            "cycle limits must be at least 1, got {:?}", limits
        );
        Sequencer {
            state: State::Walking,
            origin: Origin::Pose(PoseId::Walk1),
            target: PoseId::Walk2,
            duration: 0.5,
            phase: 0.0,
            walk_cycles: 0,
            greet_cycles: 0,
            limits,
        }
    }

    /// Current discrete state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Display name of the current state.
    pub fn state_str(&self) -> &'static str {
        self.state.as_str()
    }

    /// Completed walk cycles since entering the walking phase.
    pub fn walk_cycles(&self) -> u32 {
        self.walk_cycles
    }

    /// Completed greeting waves since entering the greeting phase.
    pub fn greet_cycles(&self) -> u32 {
        self.greet_cycles
    }

    /// Pose currently blended toward.
    pub fn target(&self) -> PoseId {
        self.target
    }

    /// Duration of the current blend, in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Normalized progress of the current blend, in `[0, 1)`.
    pub fn blend_factor(&self) -> f32 {
        self.phase
    }

    /// Advances the sequencer by `dt` seconds and blends the resulting
    /// rotations into the skeleton.
    ///
    /// When the blend completes, exactly one transition from the state
    /// table is applied, however far `dt` overshot the remaining
    /// duration: overshoot is dropped, not caught up.
    pub fn advance(
        &mut self,
        dt: f32,
        skeleton: &mut Skeleton,
        library: &PoseLibrary,
    ) {
        self.phase += dt / self.duration;
        if self.phase >= 1.0 {
            self.phase = 0.0;
            self.step(skeleton);
        }
        let target = &library[self.target];
        match self.origin {
            Origin::Pose(id) => {
                skeleton.apply(BlendSource::Pose(&library[id]), target, self.phase)
            }
            Origin::Snapshot(ref snapshot) => {
                skeleton.apply(BlendSource::Snapshot(snapshot), target, self.phase)
            }
        }
    }

    /// Applies one transition from the state table.
    fn step(&mut self, skeleton: &Skeleton) {
        match self.state {
            State::Walking => self.step_cycle(&WALKING, skeleton),
            State::Greeting => self.step_cycle(&GREETING, skeleton),
            State::WalkingToGreeting => self.step_handoff(&WALKING_TO_GREETING),
            State::GreetingToWalking => self.step_handoff(&GREETING_TO_WALKING),
        }
    }

    fn step_cycle(
        &mut self,
        cycle: &Cycle,
        skeleton: &Skeleton,
    ) {
        if self.target == cycle.closing {
            let count = {
                let counter = self.counter_mut(cycle.counter);
                *counter += 1;
                *counter
            };
            if count < self.limit(cycle.counter) {
                let (next, duration) = cycle.reentry;
                self.retarget(next, duration);
            } else {
                let (state, target, duration) = cycle.exit;
                debug!(
                    "{} cycle {} complete, entering {}",
                    self.state.as_str(), count, state.as_str()
                );
                // The blend out of the interrupted cycle originates from
                // whatever rotations are currently in effect.
                self.origin = Origin::Snapshot(skeleton.snapshot());
                self.state = state;
                self.target = target;
                self.duration = duration;
            }
        } else {
            match cycle.steps.iter().find(|step| step.at == self.target) {
                Some(step) => self.retarget(step.next, step.duration),
                None => unreachable!(
                    "pose {} is not part of the {} cycle",
                    self.target.name(), self.state.as_str()
                ),
            }
        }
    }

    fn step_handoff(&mut self, handoff: &Handoff) {
        debug!("entering {}", handoff.state.as_str());
        self.origin = Origin::Pose(self.target);
        self.state = handoff.state;
        *self.counter_mut(handoff.counter) = 0;
        self.target = handoff.target;
        self.duration = handoff.duration;
    }

    /// Advance within a cycle: the completed target becomes the origin.
    fn retarget(
        &mut self,
        next: PoseId,
        duration: f32,
    ) {
        self.origin = Origin::Pose(self.target);
        self.target = next;
        self.duration = duration;
    }

    fn counter_mut(&mut self, counter: Counter) -> &mut u32 {
        match counter {
            Counter::Walk => &mut self.walk_cycles,
            Counter::Greet => &mut self.greet_cycles,
        }
    }

    fn limit(&self, counter: Counter) -> u32 {
        match counter {
            Counter::Walk => self.limits.walk,
            Counter::Greet => self.limits.greet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_match_the_reference() {
        let limits = CycleLimits::default();
        assert_eq!(limits.walk, 2);
        assert_eq!(limits.greet, 2);
    }

    #[test]
    #[should_panic(expected = "cycle limits")]
    fn zero_limits_are_rejected() {
        Sequencer::new(CycleLimits { walk: 0, greet: 2 });
    }

    #[test]
    fn starts_walking_toward_the_passing_pose() {
        let seq = Sequencer::new(CycleLimits::default());
        assert_eq!(seq.state(), State::Walking);
        assert_eq!(seq.state_str(), "WALKING");
        assert_eq!(seq.target(), PoseId::Walk2);
        assert_eq!(seq.duration(), 0.5);
        assert_eq!(seq.walk_cycles(), 0);
        assert_eq!(seq.blend_factor(), 0.0);
    }
}
