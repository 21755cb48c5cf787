//! Deterministic probe-course fitness for exercising the optimizer.
//!
//! The real scrolling-runner simulation lives outside this repository; it
//! feeds observation vectors to each genome's policy network and reports
//! one fitness per genome. This module stands in for it with a fixed set of
//! observation probes paired with the reactions a competent runner should
//! produce, so `train` and `bench` can drive the full evolution loop
//! offline.

use strider_evolution::PolicyEvaluator;
use strider_policy::{Genome, INPUT_SIZE, PolicyNetwork};

/// Action scores above this count as "taken" when scoring a probe.
const ACTION_THRESHOLD: f32 = 0.5;

/// One synthetic observation paired with the reaction it should trigger.
///
/// Observation layout matches the network input contract:
/// `[distance, obs_x, obs_y, obs_w, obs_h, player_y, speed]`, all in
/// `[0, 1]`.
#[derive(Debug, Clone, Copy)]
struct Probe {
    observation: [f32; INPUT_SIZE],
    jump: bool,
    crouch: bool,
}

/// Fixed obstacle-reaction course implementing [`PolicyEvaluator`].
///
/// One point per action decided correctly, two decisions per probe; a
/// perfect policy scores [`max_score`](ProbeCourse::max_score).
#[derive(Debug, Clone)]
pub struct ProbeCourse {
    probes: Vec<Probe>,
}

impl ProbeCourse {
    /// The built-in course: near and far ground obstacles, low-flying
    /// birds, and clear track, at slow and fast scroll speeds.
    #[must_use]
    pub fn standard() -> Self {
        let probes = vec![
            // ground obstacle right in front: jump
            Probe {
                observation: [0.05, 0.10, 0.90, 0.05, 0.15, 1.0, 0.3],
                jump: true,
                crouch: false,
            },
            Probe {
                observation: [0.08, 0.12, 0.90, 0.08, 0.20, 1.0, 0.7],
                jump: true,
                crouch: false,
            },
            // bird at head height: crouch under it
            Probe {
                observation: [0.07, 0.10, 0.55, 0.10, 0.10, 1.0, 0.4],
                jump: false,
                crouch: true,
            },
            Probe {
                observation: [0.10, 0.14, 0.60, 0.10, 0.10, 1.0, 0.8],
                jump: false,
                crouch: true,
            },
            // obstacle still far away: hold the line
            Probe {
                observation: [0.90, 0.95, 0.90, 0.05, 0.15, 1.0, 0.3],
                jump: false,
                crouch: false,
            },
            Probe {
                observation: [0.70, 0.75, 0.55, 0.10, 0.10, 1.0, 0.5],
                jump: false,
                crouch: false,
            },
            // clear track
            Probe {
                observation: [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.2],
                jump: false,
                crouch: false,
            },
            Probe {
                observation: [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.9],
                jump: false,
                crouch: false,
            },
        ];
        Self { probes }
    }

    /// Best score a genome can reach on this course.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn max_score(&self) -> f32 {
        (self.probes.len() * 2) as f32
    }
}

impl PolicyEvaluator for ProbeCourse {
    fn evaluate(&self, genome: &Genome) -> f32 {
        let network = PolicyNetwork::new(genome);
        let mut score = 0.0;
        for probe in &self.probes {
            let [jump, crouch] = network.evaluate(&probe.observation);
            if (jump > ACTION_THRESHOLD) == probe.jump {
                score += 1.0;
            }
            if (crouch > ACTION_THRESHOLD) == probe.crouch {
                score += 1.0;
            }
        }
        score
    }
}
