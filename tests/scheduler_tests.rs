//! Cooperative scheduler tests
//!
//! Tests for:
//! - Sleep deadlines captured at the moment of the yield
//! - Yielding tasks resuming every tick, in insertion order
//! - Done tasks leaving the scheduler
//! - Tasks started mid-sequence waiting for the next tick
//! - The drop-in task riding the fixed-update integrator to the floor

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use marrow::scene::{Node, Scene};
use marrow::sched::{DropIn, Scheduler, Step, Task};

/// Logs the clock at every resumption, sleeping once up front.
struct Waiter {
    log: Rc<RefCell<Vec<f32>>>,
    sleep: f32,
    step: usize,
}

impl Task for Waiter {
    fn resume(&mut self, _scene: &mut Scene, now: f32) -> Step {
        self.log.borrow_mut().push(now);
        self.step += 1;
        if self.step == 1 {
            Step::Sleep(self.sleep)
        } else {
            Step::Done
        }
    }
}

/// Appends its id to a shared log on every resumption, forever.
struct Tagger {
    log: Rc<RefCell<Vec<u32>>>,
    id: u32,
}

impl Task for Tagger {
    fn resume(&mut self, _scene: &mut Scene, _now: f32) -> Step {
        self.log.borrow_mut().push(self.id);
        Step::Yield
    }
}

/// Yields a fixed number of times, then finishes.
struct Countdown {
    remaining: usize,
}

impl Task for Countdown {
    fn resume(&mut self, _scene: &mut Scene, _now: f32) -> Step {
        if self.remaining == 0 {
            Step::Done
        } else {
            self.remaining -= 1;
            Step::Yield
        }
    }
}

// ============================================================================
// Wait handling
// ============================================================================

#[test]
fn sleep_deadline_is_measured_from_the_yield() {
    let mut scene = Scene::new();
    let mut sched = Scheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    sched.start(Box::new(Waiter {
        log: Rc::clone(&log),
        sleep: 2.0,
        step: 0,
    }));

    // First resumption at t=10 sleeps until 12.
    sched.tick(&mut scene, 10.0);
    sched.tick(&mut scene, 11.0);
    sched.tick(&mut scene, 11.9);
    assert_eq!(*log.borrow(), vec![10.0]);

    // First tick at or past the deadline resumes it.
    sched.tick(&mut scene, 12.0);
    assert_eq!(*log.borrow(), vec![10.0, 12.0]);
    assert!(sched.is_empty());
}

#[test]
fn late_tick_resumes_a_sleeper_once() {
    let mut scene = Scene::new();
    let mut sched = Scheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    sched.start(Box::new(Waiter {
        log: Rc::clone(&log),
        sleep: 0.5,
        step: 0,
    }));

    sched.tick(&mut scene, 0.0);
    // The clock jumped well past the deadline; the task still resumes
    // exactly once.
    sched.tick(&mut scene, 7.25);
    assert_eq!(*log.borrow(), vec![0.0, 7.25]);
}

// ============================================================================
// Ordering and lifecycle
// ============================================================================

#[test]
fn ready_tasks_run_in_insertion_order_every_tick() {
    let mut scene = Scene::new();
    let mut sched = Scheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    for id in [1, 2, 3] {
        sched.start(Box::new(Tagger {
            log: Rc::clone(&log),
            id,
        }));
    }

    sched.tick(&mut scene, 0.0);
    sched.tick(&mut scene, 0.1);
    assert_eq!(*log.borrow(), vec![1, 2, 3, 1, 2, 3]);
}

#[test]
fn done_tasks_are_removed() {
    let mut scene = Scene::new();
    let mut sched = Scheduler::new();

    sched.start(Box::new(Countdown { remaining: 2 }));
    sched.start(Box::new(Countdown { remaining: 0 }));
    assert_eq!(sched.len(), 2);

    sched.tick(&mut scene, 0.0);
    assert_eq!(sched.len(), 1);
    sched.tick(&mut scene, 0.1);
    sched.tick(&mut scene, 0.2);
    assert!(sched.is_empty());
}

#[test]
fn task_started_between_ticks_runs_on_the_following_tick() {
    let mut scene = Scene::new();
    let mut sched = Scheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    sched.start(Box::new(Tagger {
        log: Rc::clone(&log),
        id: 1,
    }));
    sched.tick(&mut scene, 0.0);
    assert_eq!(*log.borrow(), vec![1]);

    sched.start(Box::new(Tagger {
        log: Rc::clone(&log),
        id: 2,
    }));
    sched.tick(&mut scene, 0.1);
    assert_eq!(*log.borrow(), vec![1, 1, 2]);
}

// ============================================================================
// Drop-in task
// ============================================================================

#[test]
fn drop_in_waits_then_falls_to_the_floor() {
    let mut scene = Scene::new();
    let mut node = Node::new("crate");
    node.transform.position = Vec3::new(0.0, 5.0, 0.0);
    let key = scene.add_node(node);

    let mut sched = Scheduler::new();
    sched.start(Box::new(DropIn::new(key, 1.0, 0.0)));

    let dt = 0.05;
    let mut now = 0.0;
    for _ in 0..120 {
        sched.tick(&mut scene, now);
        scene.integrate_physics(dt);
        now += dt;

        // Nothing moves during the initial delay.
        if now < 1.0 {
            let y = scene.get_node(key).unwrap().transform.position.y;
            assert!((y - 5.0).abs() < 1e-6, "moved during delay: y = {y}");
        }
    }

    let t = &scene.get_node(key).unwrap().transform;
    assert_eq!(t.position.y, 0.0);
    assert_eq!(t.velocity, Vec3::ZERO);
    assert_eq!(t.acceleration, Vec3::ZERO);
    assert!(sched.is_empty());
}

#[test]
fn drop_in_finishes_if_its_node_disappears() {
    let mut scene = Scene::new();
    let key = scene.add_node(Node::new("ghost"));
    scene.remove_node(key);

    let mut sched = Scheduler::new();
    sched.start(Box::new(DropIn::new(key, 0.0, 0.0)));

    sched.tick(&mut scene, 0.0);
    sched.tick(&mut scene, 0.1);
    assert!(sched.is_empty());
}
