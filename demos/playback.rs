//! Headless playback demo.
//!
//! Loads a motion file (path as the first argument, or a built-in clip),
//! plays it for a few seconds of simulated time, and prints the joint
//! tree and the skeleton root's world position along the way. Run with
//! `RUST_LOG=info` to see the load diagnostics.

use glam::Vec3;

use marrow::scene::{DrawCall, RenderBackend};
use marrow::{Engine, Result};

const SAMPLE: &str = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0.0 0.0 0.0
    CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
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
Frames: 4
Frame Time: 0.25
0.0 0.0 0.0   0.0  0.0 0.0   0.0 0.0 0.0
0.5 0.0 0.0  10.0  0.0 0.0  20.0 0.0 0.0
1.0 0.0 0.0   0.0  0.0 0.0   0.0 0.0 0.0
0.5 0.0 0.0 -10.0  0.0 0.0 -20.0 0.0 0.0
";

/// Counts draw calls instead of submitting them anywhere.
#[derive(Default)]
struct NullBackend {
    calls: usize,
}

impl RenderBackend for NullBackend {
    fn draw(&mut self, _call: DrawCall) {
        self.calls += 1;
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut engine = Engine::new();
    match std::env::args().nth(1) {
        Some(path) => engine.load_clip(path)?,
        None => engine.load_clip_str(SAMPLE)?,
    }

    if let Some(report) = engine.hierarchy_report() {
        print!("{report}");
    }

    engine.play()?;
    let root = engine.skeleton_root().expect("clip is loaded");
    let dt = 1.0 / engine.tick_rate();
    let steps = (3.0 / dt).ceil() as usize;

    let mut backend = NullBackend::default();
    for step in 0..=steps {
        let now = step as f32 * dt;
        engine.tick(now);
        engine.render(&mut backend);

        if step % (steps / 6).max(1) == 0 {
            let pos = engine
                .scene
                .get_node(root)
                .map_or(Vec3::ZERO, |n| n.world_matrix().translation.into());
            println!(
                "t={now:5.2}  frame={:>3}  root=({:.2}, {:.2}, {:.2})",
                engine.playback().current_frame(),
                pos.x,
                pos.y,
                pos.z,
            );
        }
    }

    println!("{} draw calls emitted", backend.calls);
    Ok(())
}
