//! Simulation system
//!
//! Manages the fixed-timestep loop:
//! - Delta time calculation
//! - Rotation angle accumulation
//! - Frame pacing (the sleep between frames)

use std::time::{Duration, Instant};
use trispin_math::mat4::{self, Mat4};
use crate::config::{AnimationConfig, TimingConfig};

/// Angle accumulator for the spinning triangle
///
/// The angle only ever grows with time; it is never wrapped so that it stays
/// a faithful record of elapsed rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    angle: f64,
    initial_angle: f64,
    degrees_per_second: f64,
    axis: [f32; 3],
}

impl Rotation {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            angle: config.initial_angle,
            initial_angle: config.initial_angle,
            degrees_per_second: config.degrees_per_second,
            axis: config.axis,
        }
    }

    /// Advance by `delta` seconds
    ///
    /// Negative deltas are treated as zero.
    pub fn update(&mut self, delta: f64) {
        self.angle += delta.max(0.0) * self.degrees_per_second;
    }

    /// Current angle in degrees
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Return to the configured starting angle
    pub fn reset(&mut self) {
        self.angle = self.initial_angle;
    }

    /// Model matrix for the current angle
    pub fn model_matrix(&self) -> Mat4 {
        // Reduce before narrowing to f32 so long runs keep their precision
        let angle = self.angle.rem_euclid(360.0) as f32;
        let [x, y, z] = self.axis;
        mat4::rotate(angle, x, y, z)
    }
}

/// Decides when the next frame may start
///
/// After each frame the loop sleeps for a fixed duration, independent of how
/// long the frame itself took.
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_sleep: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(frame_sleep: Duration) -> Self {
        Self {
            frame_sleep,
            next_frame: Instant::now(),
        }
    }

    /// Record the end of a frame at `now`
    pub fn frame_finished(&mut self, now: Instant) {
        self.next_frame = now + self.frame_sleep;
    }

    /// Earliest time the next frame should start
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    /// Whether the sleep after the last frame has elapsed
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    pub fn frame_sleep(&self) -> Duration {
        self.frame_sleep
    }
}

/// Manages the simulation loop
pub struct SimulationSystem {
    rotation: Rotation,
    pacer: FramePacer,
    last_update: Instant,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(animation: &AnimationConfig, timing: &TimingConfig) -> Self {
        Self {
            rotation: Rotation::new(animation),
            pacer: FramePacer::new(timing.frame_sleep()),
            last_update: Instant::now(),
        }
    }

    /// Restart the clock, typically once setup has finished
    pub fn start(&mut self, now: Instant) {
        self.last_update = now;
        self.pacer.next_frame = now;
    }

    /// Run one simulation step at the current time
    pub fn update(&mut self) -> Mat4 {
        self.update_at(Instant::now())
    }

    /// Run one simulation step at `now` and return the new model matrix
    pub fn update_at(&mut self, now: Instant) -> Mat4 {
        let delta = now.saturating_duration_since(self.last_update);
        self.last_update = now;
        self.rotation.update(delta.as_secs_f64());
        self.rotation.model_matrix()
    }

    /// Record the end of a frame; the next one starts after the frame sleep
    pub fn frame_finished(&mut self, now: Instant) {
        self.pacer.frame_finished(now);
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    /// Reset the rotation to its starting angle
    pub fn reset_rotation(&mut self) {
        self.rotation.reset();
        log::info!("Rotation reset to {:.1} degrees", self.rotation.angle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trispin_math::{mat4::transform, Vec4};

    fn animation() -> AnimationConfig {
        AnimationConfig::default()
    }

    #[test]
    fn test_update_adds_delta_times_speed() {
        let mut rotation = Rotation::new(&animation());
        rotation.update(0.5);
        assert!((rotation.angle() - 25.0).abs() < 1e-9);
        rotation.update(2.0);
        assert!((rotation.angle() - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut rotation = Rotation::new(&animation());
        rotation.update(1.0);
        rotation.update(-3.0);
        assert!((rotation.angle() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_not_wrapped() {
        let mut rotation = Rotation::new(&animation());
        rotation.update(10.0);
        assert!((rotation.angle() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_returns_to_initial_angle() {
        let config = AnimationConfig {
            initial_angle: 15.0,
            ..AnimationConfig::default()
        };
        let mut rotation = Rotation::new(&config);
        rotation.update(1.0);
        rotation.reset();
        assert_eq!(rotation.angle(), 15.0);
    }

    #[test]
    fn test_model_matrix_follows_angle() {
        let mut rotation = Rotation::new(&animation());
        // 1.8s at 50 deg/s = 90 degrees
        rotation.update(1.8);
        let v = transform(rotation.model_matrix(), Vec4::X);
        assert!(v.x.abs() < 1e-4 && (v.y - 1.0).abs() < 1e-4, "got {:?}", v);
    }

    #[test]
    fn test_model_matrix_after_many_turns() {
        let mut rotation = Rotation::new(&animation());
        // 720 full turns plus 90 degrees
        rotation.update((720.0 * 360.0 + 90.0) / 50.0);
        let v = transform(rotation.model_matrix(), Vec4::X);
        assert!(v.x.abs() < 1e-3 && (v.y - 1.0).abs() < 1e-3, "got {:?}", v);
    }

    #[test]
    fn test_angle_monotonic_with_time() {
        let mut sim = SimulationSystem::new(&animation(), &TimingConfig::default());
        let start = Instant::now();
        sim.start(start);

        let mut previous = sim.rotation().angle();
        for ms in [0u64, 5, 16, 16, 40, 1000] {
            sim.update_at(start + Duration::from_millis(ms));
            let angle = sim.rotation().angle();
            assert!(angle >= previous, "{} < {}", angle, previous);
            previous = angle;
        }
        assert!((previous - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_going_backwards_keeps_angle() {
        let mut sim = SimulationSystem::new(&animation(), &TimingConfig::default());
        let start = Instant::now();
        sim.start(start + Duration::from_secs(1));
        sim.update_at(start);
        assert_eq!(sim.rotation().angle(), 0.0);
    }

    #[test]
    fn test_pacer_waits_frame_sleep() {
        let mut pacer = FramePacer::new(TimingConfig::default().frame_sleep());
        let now = Instant::now();
        pacer.frame_finished(now);

        assert_eq!(pacer.next_frame(), now + Duration::from_millis(16));
        assert!(!pacer.is_due(now + Duration::from_millis(15)));
        assert!(pacer.is_due(now + Duration::from_millis(16)));
    }

    #[test]
    fn test_first_frame_due_after_start() {
        let mut sim = SimulationSystem::new(&animation(), &TimingConfig::default());
        let now = Instant::now();
        sim.start(now);
        assert!(sim.pacer().is_due(now));
    }
}
