//! Confetti burst played once when an order is placed.
//!
//! The burst is purely decorative. It owns its particle list, shares no
//! state with the checkout, and ends on its own once every particle has
//! faded. [`ConfettiBurst::frames`] drives it frame by frame; dropping the
//! iterator cancels the animation.
//!
//! Coordinates are pixels relative to the burst origin (the viewport
//! centre), with `y` growing downwards.

use std::f64::consts::TAU;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Colours particles are drawn from.
pub const PALETTE: [&str; 4] = ["#d946ef", "#06b6d4", "#6366f1", "#f97316"];

/// Downward acceleration per frame.
pub const GRAVITY: f64 = 0.2;

/// Frames a particle stays alive.
pub const LIFETIME_FRAMES: u32 = 100;

/// A single piece of confetti.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: String,
    pub rotation: f64,
    pub rotation_speed: f64,
    /// Frames until the particle disappears.
    pub frames_left: u32,
}

impl Particle {
    /// Opacity in `0.0..=1.0`, fading linearly over the lifetime.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        f64::from(self.frames_left) / f64::from(LIFETIME_FRAMES)
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.rotation += self.rotation_speed;
        self.frames_left = self.frames_left.saturating_sub(1);
    }
}

/// A radial burst of confetti particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiBurst {
    particles: Vec<Particle>,
}

impl ConfettiBurst {
    /// Number of particles in a fresh burst.
    pub const PARTICLE_COUNT: usize = 100;

    /// Create a burst with particles spread evenly around a circle.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        #[allow(clippy::cast_precision_loss)] // PARTICLE_COUNT is tiny
        let count = Self::PARTICLE_COUNT as f64;

        let particles = (0..Self::PARTICLE_COUNT)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let angle = (i as f64 / count) * TAU;
                let speed = rng.random::<f64>().mul_add(8.0, 5.0);
                let color = PALETTE.choose(rng).copied().unwrap_or("#d946ef");

                Particle {
                    x: 0.0,
                    y: 0.0,
                    vx: angle.cos() * speed,
                    vy: angle.sin().mul_add(speed, -3.0),
                    size: rng.random::<f64>().mul_add(8.0, 3.0),
                    color: color.to_string(),
                    rotation: rng.random::<f64>() * TAU,
                    rotation_speed: (rng.random::<f64>() - 0.5) * 0.3,
                    frames_left: LIFETIME_FRAMES,
                }
            })
            .collect();

        Self { particles }
    }

    /// Particles still alive.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether every particle has faded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance one frame and drop expired particles.
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.step();
        }
        self.particles.retain(|p| p.frames_left > 0);
    }

    /// Run the burst frame by frame until it finishes.
    ///
    /// Each item is the number of particles alive after that frame.
    #[must_use]
    pub fn frames(self) -> Frames {
        Frames { burst: self }
    }
}

/// Iterator returned by [`ConfettiBurst::frames`].
#[derive(Debug)]
pub struct Frames {
    burst: ConfettiBurst,
}

impl Iterator for Frames {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.burst.is_finished() {
            return None;
        }
        self.burst.step();
        Some(self.burst.particles.len())
    }
}
