//! Frame pump and user commands
//!
//! `Simulation` owns the single flight state of a session. The host calls
//! `frame` once per displayed frame and forwards launch/pause/reset commands
//! from the same thread. Phase changes are queued as `PhaseEvent`s; the host
//! drains them each frame, and only the newest `MAX_PENDING_EVENTS` are kept.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{ConfigError, SimConfig};
use crate::consts::MAX_DT;
use crate::sim::{
    FlightPhase, PhaseEvent, SimState, Telemetry, advance, launch_state, project_telemetry,
};

/// Undrained phase events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 64;

/// A simulation session
pub struct Simulation {
    config: SimConfig,
    state: SimState,
    rng: Pcg32,
    seed: u64,
    events: Vec<PhaseEvent>,
}

impl Simulation {
    /// Create an idle session. `seed` drives the failure pop velocity.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!("Simulation initialized with seed: {}", seed);
        Ok(Self {
            config,
            state: SimState::new(config),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> FlightPhase {
        self.state.phase
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn telemetry(&self) -> Telemetry {
        project_telemetry(&self.state)
    }

    /// Take the phase transitions since the last call.
    ///
    /// Call once per frame; if the host falls behind, older events are lost.
    pub fn drain_events(&mut self) -> Vec<PhaseEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the configuration. Applied immediately only while idle;
    /// otherwise it takes effect on the next launch or reset.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        if self.state.phase == FlightPhase::Idle {
            self.state = SimState::new(config);
        } else {
            log::debug!("Config change deferred until reset ({})", self.state.phase);
        }
        Ok(())
    }

    /// Launch from the pad. Ignored unless idle.
    pub fn launch(&mut self) {
        if self.state.phase != FlightPhase::Idle {
            log::debug!("Launch ignored in phase {}", self.state.phase);
            return;
        }
        let fresh = launch_state(self.config, &mut self.rng);
        self.replace_state(fresh);
    }

    /// Return to the pad with a fresh state
    pub fn reset(&mut self) {
        self.replace_state(SimState::new(self.config));
        log::info!("Simulation reset");
    }

    /// Flip the pause flag. Not allowed on the pad or after landing.
    pub fn toggle_pause(&mut self) {
        if matches!(self.state.phase, FlightPhase::Idle | FlightPhase::Landed) {
            log::debug!("Pause ignored in phase {}", self.state.phase);
            return;
        }
        self.state.paused = !self.state.paused;
        self.state.last_tick = None;
        log::info!("{}", if self.state.paused { "Paused" } else { "Resumed" });
    }

    pub fn pause(&mut self) {
        if !self.state.paused {
            self.toggle_pause();
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused {
            self.toggle_pause();
        }
    }

    /// Per-frame entry point. `now_ms` is the host clock in milliseconds.
    ///
    /// The first frame after construction, reset or a pause toggle only
    /// records the clock.
    pub fn frame(&mut self, now_ms: f64) {
        let last = self.state.last_tick.unwrap_or(now_ms);
        self.state.last_tick = Some(now_ms);
        self.step((now_ms - last) / 1000.0);
    }

    /// Advance one step of at most `MAX_DT` seconds
    pub fn step(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        if self.state.paused || !self.state.phase.is_active() {
            return;
        }

        let before = self.state.phase;
        advance(&mut self.state, dt);
        self.state.record_trajectory();
        self.push_event(before);
    }

    fn replace_state(&mut self, fresh: SimState) {
        let before = self.state.phase;
        self.state = fresh;
        self.push_event(before);
    }

    fn push_event(&mut self, before: FlightPhase) {
        if let Some(event) = PhaseEvent::between(before, self.state.phase, self.state.time) {
            log::info!("Phase {} -> {} at t = {:.2} s", event.from, event.to, event.time);
            if self.events.len() >= MAX_PENDING_EVENTS {
                self.events.remove(0);
            }
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_FAIL_BOUNCES, MAX_TRAJECTORY_POINTS};
    use proptest::prelude::*;

    const DT: f64 = 0.02;

    fn run_to_end(sim: &mut Simulation, max_steps: usize) -> usize {
        for i in 0..max_steps {
            if sim.phase().is_terminal() {
                return i;
            }
            sim.step(DT);
        }
        max_steps
    }

    #[test]
    fn test_launch_and_land() {
        let mut sim = Simulation::new(SimConfig::default(), 42).unwrap();
        assert_eq!(sim.phase(), FlightPhase::Idle);

        sim.launch();
        assert_eq!(sim.phase(), FlightPhase::Powered);

        let steps = run_to_end(&mut sim, 5000);
        assert!(steps < 5000);
        assert_eq!(sim.phase(), FlightPhase::Landed);

        let telemetry = sim.telemetry();
        assert!(telemetry.flight_distance > 0.0);
        assert_eq!(telemetry.altitude, 0.0);

        let phases: Vec<_> = sim.drain_events().iter().map(|e| e.to).collect();
        assert_eq!(
            phases,
            vec![FlightPhase::Powered, FlightPhase::Coasting, FlightPhase::Landed]
        );
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_failed_launch_scenario() {
        let config = SimConfig {
            water_ratio: 0.05,
            ..Default::default()
        };
        let mut sim = Simulation::new(config, 7).unwrap();
        sim.launch();
        assert_eq!(sim.phase(), FlightPhase::FailBounce);
        assert_eq!(
            sim.state().fail_reason,
            Some(crate::sim::FailureReason::InsufficientWater)
        );
        assert_eq!(sim.telemetry().thrust, 0.0);

        run_to_end(&mut sim, 2000);
        assert_eq!(sim.phase(), FlightPhase::Failed);
        assert!(sim.state().fail_bounce_count <= MAX_FAIL_BOUNCES);
        assert!(sim.state().fail_alert_shown);

        // Terminal: further frames change nothing
        let time = sim.state().time;
        sim.step(DT);
        assert_eq!(sim.state().time, time);
    }

    #[test]
    fn test_pause_rules() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.toggle_pause();
        assert!(!sim.is_paused());

        sim.launch();
        sim.step(DT);
        sim.pause();
        assert!(sim.is_paused());
        let time = sim.state().time;
        sim.step(DT);
        assert_eq!(sim.state().time, time);
        assert_eq!(sim.phase(), FlightPhase::Powered);

        sim.resume();
        sim.step(DT);
        assert!(sim.state().time > time);

        run_to_end(&mut sim, 5000);
        sim.toggle_pause();
        assert!(!sim.is_paused());
    }

    #[test]
    fn test_frame_clamps_and_skips_first_tick() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.launch();

        sim.frame(1000.0);
        assert_eq!(sim.state().time, 0.0);

        // A 2 s gap (suspended tab) only advances by MAX_DT
        sim.frame(3000.0);
        assert!((sim.state().time - MAX_DT).abs() < 1e-12);

        sim.frame(3016.0);
        assert!((sim.state().time - MAX_DT - 0.016).abs() < 1e-9);

        // Clock going backwards is a zero step
        sim.frame(2000.0);
        assert!((sim.state().time - MAX_DT - 0.016).abs() < 1e-9);
    }

    #[test]
    fn test_pause_toggle_resets_clock() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.launch();
        sim.frame(0.0);
        sim.frame(16.0);
        sim.toggle_pause();
        sim.toggle_pause();
        let time = sim.state().time;
        sim.frame(5000.0);
        assert_eq!(sim.state().time, time);
    }

    #[test]
    fn test_reset_discards_history() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.launch();
        for _ in 0..50 {
            sim.step(DT);
        }
        sim.reset();
        assert_eq!(sim.phase(), FlightPhase::Idle);
        assert_eq!(sim.state().time, 0.0);
        assert_eq!(sim.state().trajectory.len(), 1);
        assert!(!sim.is_paused());
        let last = sim.drain_events().pop().unwrap();
        assert_eq!(last.to, FlightPhase::Idle);
    }

    #[test]
    fn test_config_deferred_mid_flight() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        let steep = SimConfig {
            launch_angle_deg: 80.0,
            ..Default::default()
        };

        sim.launch();
        sim.step(DT);
        sim.set_config(steep).unwrap();
        assert!((sim.state().config.launch_angle_deg - 60.0).abs() < 1e-12);

        sim.reset();
        assert!((sim.state().config.launch_angle_deg - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_config_applied_when_idle() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        let config = SimConfig {
            water_ratio: 0.5,
            ..Default::default()
        };
        sim.set_config(config).unwrap();
        assert!((sim.telemetry().remaining_water_g - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = SimConfig {
            nozzle_diameter_mm: 0.0,
            ..Default::default()
        };
        assert!(Simulation::new(bad, 1).is_err());

        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        assert!(sim.set_config(bad).is_err());
        assert_eq!(sim.config(), &SimConfig::default());
    }

    #[test]
    fn test_launch_ignored_mid_flight() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.launch();
        sim.step(DT);
        let time = sim.state().time;
        sim.launch();
        assert_eq!(sim.state().time, time);
    }

    #[test]
    fn test_trajectory_capped_over_long_run() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        sim.launch();
        // Small steps so the flight outlasts the window
        for _ in 0..20_000 {
            if sim.phase().is_terminal() {
                break;
            }
            sim.step(0.001);
            assert!(sim.state().trajectory.len() <= MAX_TRAJECTORY_POINTS);
        }
        assert_eq!(sim.state().trajectory.len(), MAX_TRAJECTORY_POINTS);
        assert!(sim.state().trajectory.iter().all(|p| p.y >= 0.0));
    }

    #[test]
    fn test_same_seed_same_failure() {
        let config = SimConfig {
            pressure_bar: 9.0,
            ..Default::default()
        };
        let mut a = Simulation::new(config, 99).unwrap();
        let mut b = Simulation::new(config, 99).unwrap();
        a.launch();
        b.launch();
        run_to_end(&mut a, 2000);
        run_to_end(&mut b, 2000);
        assert_eq!(a.state().position, b.state().position);
        assert_eq!(a.telemetry(), b.telemetry());
    }
    #[test]
    fn test_pause_after_bounce_keeps_bounce() {
        let config = SimConfig {
            water_ratio: 0.05,
            ..Default::default()
        };
        let mut sim = Simulation::new(config, 3).unwrap();
        sim.launch();
        while sim.state().fail_bounce_count == 0 {
            sim.step(DT);
        }
        let velocity = sim.state().velocity;

        sim.pause();
        sim.resume();
        sim.frame(1000.0);
        sim.frame(1000.0);

        assert_eq!(sim.state().fail_bounce_count, 1);
        assert_eq!(sim.state().velocity, velocity);
        assert_eq!(sim.phase(), FlightPhase::FailBounce);
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut sim = Simulation::new(SimConfig::default(), 1).unwrap();
        for _ in 0..100 {
            sim.launch();
            sim.reset();
        }
        let events = sim.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        let last = events.last().unwrap();
        assert_eq!((last.from, last.to), (FlightPhase::Powered, FlightPhase::Idle));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_frames_with_pauses_stay_sane(
            water in 0.01f64..0.9,
            pressure in 0.5f64..10.0,
            seed in any::<u64>(),
            frames in prop::collection::vec((-20.0f64..120.0, 0u8..20), 1..400),
        ) {
            let config = SimConfig {
                water_ratio: water,
                pressure_bar: pressure,
                ..Default::default()
            };
            let mut sim = Simulation::new(config, seed).unwrap();
            sim.launch();

            let mut now = 0.0;
            let mut bounces = 0;
            for (gap_ms, action) in frames {
                // Occasional pause toggles and repeated clock readings
                if action == 0 {
                    sim.toggle_pause();
                }
                if action != 1 {
                    now += gap_ms;
                }
                sim.frame(now);

                let state = sim.state();
                let telemetry = sim.telemetry();
                prop_assert!(telemetry.is_finite());
                prop_assert!(telemetry.altitude >= 0.0);
                prop_assert!(state.trajectory.len() <= MAX_TRAJECTORY_POINTS);
                prop_assert!(state.fail_bounce_count <= MAX_FAIL_BOUNCES);
                prop_assert!(state.fail_bounce_count >= bounces);
                bounces = state.fail_bounce_count;
            }
        }
    }
}
