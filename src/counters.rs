//! Step-phase timing, grounded in `PhysicsPipeline::counters` in
//! `physics_pipeline.rs`. Disabled by default; enabling it costs one
//! `Instant::now()` per phase boundary.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default)]
pub struct Timer {
    enabled: bool,
    start: Option<Instant>,
    time: Duration,
}

impl Timer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start: None,
            time: Duration::default(),
        }
    }

    pub fn resume(&mut self) {
        if self.enabled {
            self.start = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if self.enabled {
            if let Some(start) = self.start.take() {
                self.time += start.elapsed();
            }
        }
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.time = Duration::default();
    }

    pub fn time(&self) -> Duration {
        self.time
    }
}

/// Collision-detection phase timings.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionDetectionCounters {
    pub broad_phase_time: Timer,
    pub narrow_phase_time: Timer,
}

/// Solver phase timings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverCounters {
    pub velocity_assembly_time: Timer,
    pub velocity_resolution_time: Timer,
    pub position_resolution_time: Timer,
}

/// Whole-step phase timings.
#[derive(Clone, Copy, Debug, Default)]
pub struct StageCounters {
    pub collision_detection_time: Timer,
    pub island_construction_time: Timer,
    pub update_time: Timer,
    pub solver_time: Timer,
    pub ccd_time: Timer,
    pub total_time: Timer,
}

/// Opt-in instrumentation for one `World::step` call. Ambient observability
/// (spec §10.6), not excluded by any Non-goal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    enabled: bool,
    pub stages: StageCounters,
    pub cd: CollisionDetectionCounters,
    pub solver: SolverCounters,
}

impl Counters {
    pub fn new(enabled: bool) -> Self {
        let timer = Timer::new(enabled);
        Self {
            enabled,
            stages: StageCounters {
                collision_detection_time: timer,
                island_construction_time: timer,
                update_time: timer,
                solver_time: timer,
                ccd_time: timer,
                total_time: timer,
            },
            cd: CollisionDetectionCounters {
                broad_phase_time: timer,
                narrow_phase_time: timer,
            },
            solver: SolverCounters {
                velocity_assembly_time: timer,
                velocity_resolution_time: timer,
                position_resolution_time: timer,
            },
        }
    }

    pub fn enable(&mut self, enabled: bool) {
        *self = Self::new(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reset(&mut self) {
        let enabled = self.enabled;
        *self = Self::new(enabled);
    }

    pub fn step_started(&mut self) {
        self.stages.total_time.resume();
    }

    pub fn step_completed(&mut self) {
        self.stages.total_time.pause();
    }
}
