//! Tick-loop integration.
//!
//! [`Engine`] owns the scene graph, the cooperative scheduler and the
//! playback state, and turns clock ticks plus input-collaborator
//! commands into transform updates and draw calls. There is no ambient
//! singleton: the animation clock arrives as an argument each tick.

use std::path::Path;
use std::sync::Arc;

use glam::Mat4;

use crate::bvh::{self, MotionClip};
use crate::errors::Result;
use crate::playback::Playback;
use crate::scene::{
    primitives, DrawCall, Drawable, Node, NodeKey, RenderBackend, RenderMode, Scene, Skeleton,
    Visual,
};
use crate::sched::{Scheduler, Task};

pub struct Engine {
    pub scene: Scene,
    scheduler: Scheduler,
    playback: Playback,
    skeleton: Option<Skeleton>,
    skeleton_root: Option<NodeKey>,
    render_mode: RenderMode,
    /// Fixed updates per second; adopted from the clip on load.
    tick_rate: f32,
    last_fixed_tick: f32,
    clock: f32,
}

impl Engine {
    pub const DEFAULT_TICK_RATE: f32 = 60.0;

    #[must_use]
    pub fn new() -> Self {
        let mut scene = Scene::new();
        scene.add_node(Node::with_visual(
            "grid",
            Visual::LineSet(Arc::new(primitives::grid(10.0, 1.0))),
        ));
        scene.add_node(Node::with_visual(
            "axes",
            Visual::LineSet(Arc::new(primitives::axes(10.0))),
        ));

        Self {
            scene,
            scheduler: Scheduler::new(),
            playback: Playback::new(),
            skeleton: None,
            skeleton_root: None,
            render_mode: RenderMode::default(),
            tick_rate: Self::DEFAULT_TICK_RATE,
            last_fixed_tick: 0.0,
            clock: 0.0,
        }
    }

    // ========================================================================
    // Tick loop
    // ========================================================================

    /// Advances the engine to animation-clock time `now` (seconds).
    ///
    /// Runs, strictly in order: the fixed-rate update (playback frame
    /// advance, skeletal pose application, physics integration) when the
    /// accumulated time allows it, then the world-matrix propagation pass
    /// for the whole graph, then the scheduler. The frame advance happens
    /// before propagation so joints carry the new frame's channel data
    /// into this tick's pass, and draw calls built after `tick` never
    /// observe a partially propagated hierarchy.
    pub fn tick(&mut self, now: f32) {
        self.clock = now;

        if now - self.last_fixed_tick >= 1.0 / self.tick_rate {
            self.last_fixed_tick = now;
            self.fixed_update();
        }

        self.scene.update_world_matrices();
        self.scheduler.tick(&mut self.scene, now);
    }

    fn fixed_update(&mut self) {
        if self.playback.is_playing() {
            self.playback.advance();
            if let Some(skeleton) = &self.skeleton {
                skeleton.apply_frame(&mut self.scene, self.playback.current_frame());
            }
        }
        self.scene.integrate_physics(1.0 / self.tick_rate);
    }

    /// Draw pass: emits one draw call per visible node. Bone visuals
    /// follow the active render mode (line skeleton or oriented boxes).
    pub fn render<R: RenderBackend>(&self, backend: &mut R) {
        for (_key, node) in &self.scene.nodes {
            if !node.visible {
                continue;
            }
            let call = match (&node.visual, self.render_mode) {
                (Visual::None, _) => continue,
                (Visual::LineSet(lines), _)
                | (Visual::Bone { segments: lines, .. }, RenderMode::Lines) => DrawCall {
                    model: node.transform.world_matrix_as_mat4(),
                    drawable: Drawable::Lines(Arc::clone(lines)),
                },
                (Visual::Bone { fit, .. }, RenderMode::Boxes) => DrawCall {
                    model: Mat4::from(*node.world_matrix() * fit.fit_matrix()),
                    drawable: Drawable::Box,
                },
            };
            backend.draw(call);
        }
    }

    // ========================================================================
    // Input-collaborator commands
    // ========================================================================

    /// Parses a motion file and replaces the current clip.
    ///
    /// Synchronous; blocks the tick it happens in, acceptable for a rare
    /// user-triggered operation. On failure the previous clip and scene
    /// state are left fully intact. On success the old skeleton subtree
    /// is torn down immediately, playback resets to stopped at frame 0,
    /// and the fixed tick rate is adopted from the clip's frame time.
    pub fn load_clip(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let clip = bvh::parse_file(path)?;
        self.install_clip(clip);
        Ok(())
    }

    /// [`Engine::load_clip`] for in-memory motion text.
    pub fn load_clip_str(&mut self, text: &str) -> Result<()> {
        let clip = bvh::parse_str(text)?;
        self.install_clip(clip);
        Ok(())
    }

    fn install_clip(&mut self, clip: MotionClip) {
        if let Some(old_root) = self.skeleton_root.take() {
            self.scene.remove_node(old_root);
        }

        let frame_count = clip.frame_count;
        let frame_time = clip.frame_time;

        let mut skeleton = Skeleton::from_clip(clip);
        self.skeleton_root = skeleton.instantiate(&mut self.scene);
        self.skeleton = Some(skeleton);

        self.playback.set_clip(frame_count);
        if frame_time > 0.0 {
            self.tick_rate = 1.0 / frame_time;
        }
    }

    /// Starts playback; fails when no clip is loaded.
    pub fn play(&mut self) -> Result<()> {
        self.playback.play()
    }

    /// Stops playback, resetting to frame 0. The pose freezes where it
    /// is until the next play.
    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        if self.playback.is_playing() {
            self.stop();
            Ok(())
        } else {
            self.play()
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    /// Hands a task to the cooperative scheduler.
    pub fn spawn(&mut self, task: Box<dyn Task>) {
        self.scheduler.start(task);
    }

    /// Indented joint tree of the loaded clip, if any.
    #[must_use]
    pub fn hierarchy_report(&self) -> Option<String> {
        self.skeleton.as_ref().map(|s| s.clip().hierarchy_report())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn skeleton_root(&self) -> Option<NodeKey> {
        self.skeleton_root
    }

    #[inline]
    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    #[inline]
    #[must_use]
    pub fn tick_rate(&self) -> f32 {
        self.tick_rate
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    #[inline]
    #[must_use]
    pub fn scheduled_tasks(&self) -> usize {
        self.scheduler.len()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
