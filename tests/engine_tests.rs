//! Engine tick-loop integration tests
//!
//! Tests for:
//! - Clip loading: tick-rate adoption, atomic failure, subtree replacement
//! - Fixed-update gating of frame advance
//! - Draw-call emission in both render modes
//! - Scheduler wiring through spawn/tick

use glam::Vec3;

use marrow::scene::{DrawCall, Drawable, RenderBackend, RenderMode, Scene};
use marrow::sched::{Step, Task};
use marrow::Engine;

const SINGLE_JOINT: &str = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0.0 0.0 0.0
    CHANNELS 3 Xposition Yposition Zposition
    End Site
    {
        OFFSET 0.0 1.0 0.0
    }
}
MOTION
Frames: 1
Frame Time: 0.0333
0.0 3.0 0.0
";

const TWO_JOINT: &str = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0.0 0.0 0.0
    CHANNELS 3 Xposition Yposition Zposition
    JOINT Chest
    {
        OFFSET 0.0 1.0 0.0
        CHANNELS 3 Zrotation Xrotation Yrotation
        End Site
        {
            OFFSET 0.0 1.0 0.0
        }
    }
}
MOTION
Frames: 2
Frame Time: 0.05
0.0 0.0 0.0 0.0 0.0 0.0
1.0 0.0 0.0 0.0 0.0 0.0
";

#[derive(Default)]
struct Collector {
    calls: Vec<DrawCall>,
}

impl RenderBackend for Collector {
    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

impl Collector {
    fn boxes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c.drawable, Drawable::Box))
            .count()
    }
}

// ============================================================================
// Clip loading
// ============================================================================

#[test]
fn loading_a_clip_adopts_its_frame_rate() {
    let mut engine = Engine::new();
    assert!((engine.tick_rate() - Engine::DEFAULT_TICK_RATE).abs() < 1e-6);

    engine.load_clip_str(SINGLE_JOINT).unwrap();
    assert!((engine.tick_rate() - 1.0 / 0.0333).abs() < 1e-3);
    assert_eq!(engine.playback().frame_count(), 1);
    assert!(!engine.playback().is_playing());
}

#[test]
fn failed_load_leaves_the_previous_clip_intact() {
    let mut engine = Engine::new();
    engine.load_clip_str(TWO_JOINT).unwrap();
    let root = engine.skeleton_root().unwrap();

    assert!(engine.load_clip_str("HIERARCHY\nROOT Broken\n").is_err());

    assert_eq!(engine.skeleton_root(), Some(root));
    assert!(engine.scene.get_node(root).is_some());
    assert_eq!(engine.playback().frame_count(), 2);
    assert_eq!(engine.skeleton().unwrap().joint_count(), 2);
}

#[test]
fn loading_a_new_clip_tears_down_the_old_subtree() {
    let mut engine = Engine::new();
    engine.load_clip_str(TWO_JOINT).unwrap();
    let old_root = engine.skeleton_root().unwrap();
    let old_bones = engine.skeleton().unwrap().bones().to_vec();

    engine.load_clip_str(SINGLE_JOINT).unwrap();

    for bone in old_bones {
        assert!(engine.scene.get_node(bone).is_none());
    }
    assert_ne!(engine.skeleton_root(), Some(old_root));
    assert_eq!(engine.skeleton().unwrap().joint_count(), 1);
    // grid + axes + one bone
    assert_eq!(engine.scene.nodes.len(), 3);
}

#[test]
fn missing_file_reports_io_error() {
    let mut engine = Engine::new();
    assert!(engine.load_clip("/nonexistent/motion.bvh").is_err());
    assert!(engine.skeleton().is_none());
}

// ============================================================================
// Tick loop
// ============================================================================

#[test]
fn frame_advance_waits_for_the_fixed_interval() {
    let mut engine = Engine::new();
    engine.load_clip_str(TWO_JOINT).unwrap();
    engine.play().unwrap();
    // Clip rate is 20 fps (frame time 0.05).

    engine.tick(0.0);
    assert_eq!(engine.playback().current_frame(), 0);

    engine.tick(0.01);
    assert_eq!(engine.playback().current_frame(), 0);

    engine.tick(0.06);
    assert_eq!(engine.playback().current_frame(), 1);

    // Interval restarts from the tick that fired.
    engine.tick(0.08);
    assert_eq!(engine.playback().current_frame(), 1);
    engine.tick(0.12);
    assert_eq!(engine.playback().current_frame(), 2);
    engine.tick(0.18);
    assert_eq!(engine.playback().current_frame(), 1);
}

#[test]
fn playing_frame_moves_the_skeleton_root() {
    let mut engine = Engine::new();
    engine.load_clip_str(SINGLE_JOINT).unwrap();
    let root = engine.skeleton_root().unwrap();

    engine.tick(0.0);
    let bind = engine
        .scene
        .get_node(root)
        .unwrap()
        .world_matrix()
        .transform_point3(Vec3::ZERO);
    assert!(bind.length() < 1e-5);

    engine.play().unwrap();
    engine.tick(0.1);
    // Frame 1 lifts the root by 3 source units, doubled by normalization.
    let posed = engine
        .scene
        .get_node(root)
        .unwrap()
        .world_matrix()
        .transform_point3(Vec3::ZERO);
    assert!((posed - Vec3::new(0.0, 6.0, 0.0)).length() < 1e-4);
}

#[test]
fn stop_freezes_the_pose_and_resets_the_frame() {
    let mut engine = Engine::new();
    engine.load_clip_str(SINGLE_JOINT).unwrap();
    engine.play().unwrap();
    engine.tick(0.0);
    engine.tick(0.1);
    assert_eq!(engine.playback().current_frame(), 1);

    engine.stop();
    assert_eq!(engine.playback().current_frame(), 0);

    // The posed transform stays where it froze until the next play.
    let root = engine.skeleton_root().unwrap();
    engine.tick(0.2);
    let posed = engine
        .scene
        .get_node(root)
        .unwrap()
        .world_matrix()
        .transform_point3(Vec3::ZERO);
    assert!((posed.y - 6.0).abs() < 1e-4);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn render_emits_lines_for_every_visible_node() {
    let mut engine = Engine::new();
    engine.load_clip_str(TWO_JOINT).unwrap();
    engine.tick(0.0);

    let mut backend = Collector::default();
    engine.render(&mut backend);
    // grid + axes + two bones, all as line sets in the default mode
    assert_eq!(backend.calls.len(), 4);
    assert_eq!(backend.boxes(), 0);
}

#[test]
fn box_mode_switches_bone_drawables_only() {
    let mut engine = Engine::new();
    engine.load_clip_str(TWO_JOINT).unwrap();
    engine.tick(0.0);
    engine.set_render_mode(RenderMode::Boxes);
    assert_eq!(engine.render_mode(), RenderMode::Boxes);

    let mut backend = Collector::default();
    engine.render(&mut backend);
    assert_eq!(backend.calls.len(), 4);
    assert_eq!(backend.boxes(), 2);
}

#[test]
fn hidden_nodes_are_skipped() {
    let mut engine = Engine::new();
    engine.load_clip_str(SINGLE_JOINT).unwrap();
    let root = engine.skeleton_root().unwrap();
    engine.scene.get_node_mut(root).unwrap().visible = false;
    engine.tick(0.0);

    let mut backend = Collector::default();
    engine.render(&mut backend);
    assert_eq!(backend.calls.len(), 2);
}

// ============================================================================
// Scheduler wiring
// ============================================================================

struct ClockProbe {
    seen: std::rc::Rc<std::cell::RefCell<Vec<f32>>>,
}

impl Task for ClockProbe {
    fn resume(&mut self, _scene: &mut Scene, now: f32) -> Step {
        self.seen.borrow_mut().push(now);
        Step::Done
    }
}

#[test]
fn spawned_tasks_receive_the_tick_clock() {
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut engine = Engine::new();
    engine.spawn(Box::new(ClockProbe {
        seen: std::rc::Rc::clone(&seen),
    }));
    assert_eq!(engine.scheduled_tasks(), 1);

    engine.tick(1.5);
    assert_eq!(*seen.borrow(), vec![1.5]);
    assert_eq!(engine.scheduled_tasks(), 0);
    assert!((engine.clock() - 1.5).abs() < 1e-6);
}
