//! Order celebration.

use bloom_core::ConfettiBurst;

/// Invoked once when an order is confirmed.
pub trait Celebration: Send + Sync {
    /// Produce the burst to play on the confirmation page.
    fn celebrate(&self) -> ConfettiBurst;
}

/// Confetti seeded from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfettiCelebration;

impl Celebration for ConfettiCelebration {
    fn celebrate(&self) -> ConfettiBurst {
        let burst = ConfettiBurst::new(&mut rand::rng());
        tracing::debug!(particles = burst.particles().len(), "Celebrating order");
        burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confetti_celebration_full_burst() {
        let burst = ConfettiCelebration.celebrate();
        assert_eq!(burst.particles().len(), ConfettiBurst::PARTICLE_COUNT);
        assert!(!burst.is_finished());
    }
}
