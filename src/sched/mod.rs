//! Cooperative scheduler.
//!
//! Single-threaded runner for suspendable animation tasks. A task is a
//! resumable state object: each resumption executes until it yields a
//! wait condition or signals completion. Waits are measured against the
//! engine's monotonic animation clock, so pausing the simulation pauses
//! every wait. No priority ordering beyond insertion order, and no
//! cancellation primitive beyond task completion.

use glam::Vec3;

use crate::scene::{NodeKey, Scene};

/// Wait condition gating a suspended task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wait {
    /// Ready on the next tick.
    Immediate,
    /// Ready once the animation clock reaches the deadline (absolute
    /// seconds).
    Until(f32),
}

impl Wait {
    #[must_use]
    pub fn is_ready(self, now: f32) -> bool {
        match self {
            Self::Immediate => true,
            Self::Until(deadline) => now >= deadline,
        }
    }
}

/// Yield value of one task resumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Suspend; resume on the next tick.
    Yield,
    /// Suspend for this many seconds of animation-clock time, measured
    /// from the moment of the yield.
    Sleep(f32),
    /// The task is finished and is removed from the scheduler.
    Done,
}

/// A resumable unit of work: an explicit step index plus captured state,
/// resumed by the scheduler whenever its stored wait condition is
/// satisfied.
pub trait Task {
    fn resume(&mut self, scene: &mut Scene, now: f32) -> Step;
}

struct Slot {
    task: Box<dyn Task>,
    wait: Wait,
}

/// Single-threaded cooperative task runner.
#[derive(Default)]
pub struct Scheduler {
    slots: Vec<Slot>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Registers a task; it first resumes on the next tick.
    pub fn start(&mut self, task: Box<dyn Task>) {
        self.slots.push(Slot {
            task,
            wait: Wait::Immediate,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resumes every ready task exactly once, in insertion order.
    ///
    /// Only the tasks present at tick entry are considered; tasks started
    /// during the tick are appended behind that snapshot and first run on
    /// the next tick.
    pub fn tick(&mut self, scene: &mut Scene, now: f32) {
        let snapshot = self.slots.len();
        let mut finished: Vec<usize> = Vec::new();

        for i in 0..snapshot {
            let slot = &mut self.slots[i];
            if !slot.wait.is_ready(now) {
                continue;
            }
            match slot.task.resume(scene, now) {
                Step::Yield => slot.wait = Wait::Immediate,
                Step::Sleep(seconds) => slot.wait = Wait::Until(now + seconds),
                Step::Done => finished.push(i),
            }
        }

        for &i in finished.iter().rev() {
            self.slots.remove(i);
        }
    }
}

/// Decorative drop-in task: waits a delay, then lets gravity pull a node
/// down until it reaches `floor`, where it comes to rest.
///
/// The velocity/position integration itself happens in the fixed-update
/// step; this task only steers acceleration and clamps at contact.
pub struct DropIn {
    node: NodeKey,
    delay: f32,
    floor: f32,
    started: bool,
}

impl DropIn {
    pub const GRAVITY: f32 = -9.8;

    #[must_use]
    pub fn new(node: NodeKey, delay: f32, floor: f32) -> Self {
        Self {
            node,
            delay,
            floor,
            started: false,
        }
    }
}

impl Task for DropIn {
    fn resume(&mut self, scene: &mut Scene, _now: f32) -> Step {
        if !self.started {
            self.started = true;
            return Step::Sleep(self.delay);
        }

        let Some(node) = scene.get_node_mut(self.node) else {
            return Step::Done;
        };
        let t = &mut node.transform;

        if t.position.y <= self.floor {
            t.position.y = self.floor;
            t.velocity = Vec3::ZERO;
            t.acceleration = Vec3::ZERO;
            return Step::Done;
        }

        t.acceleration = Vec3::new(0.0, Self::GRAVITY, 0.0);
        Step::Yield
    }
}
