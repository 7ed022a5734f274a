// src/simulation.rs

//! # Simulation Loop
//!
//! [`SimulationState`] owns everything that changes while the simulation
//! runs: the airframe, the flight controller, the stick, the simulation
//! clock and the telemetry log. The driver (a render loop, a test, a batch
//! run) owns the state and advances it with [`tick`] or [`tick_at`].
//!
//! One tick runs, in order:
//!
//! 1. the pause check,
//! 2. the clamped step is added to the simulation clock,
//! 3. the flight controller reads the body state left by the previous tick
//!    and produces thrust fractions,
//! 4. the body is advanced once,
//! 5. a telemetry sample is taken.
//!
//! The loops are stamped with the simulation clock, so they see exactly the
//! step the integrator takes.

use crate::{
    BodyState, FlightController, FrameClock, Number, RigidBody, SimConfig, SimError, Setpoints,
    StickInput, TelemetryLog, TelemetrySample, ThrustCommand,
};
use log::{debug, info};
use num_traits::ToPrimitive;
use serde::Serialize;

/// Stick movements below this size are not logged.
const STICK_LOG_THRESHOLD: f64 = 0.01;

/// Result of one tick, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame<T> {
    /// Simulation time after the tick, in seconds.
    pub time: T,
    /// Step taken, in seconds.
    pub dt: T,
    /// Body state after the tick.
    pub state: BodyState<T>,
    /// Thrust fractions applied during the tick.
    pub thrust: ThrustCommand<T>,
    /// Set points of the tick.
    pub setpoints: Setpoints<T>,
}

/// Mutable state of a running simulation.
pub struct SimulationState<T: Number> {
    config: SimConfig<T>,
    body: RigidBody<T>,
    controller: FlightController<T>,
    stick: StickInput<T>,
    logged_stick: Option<StickInput<T>>,
    elapsed: T,
    paused: bool,
    frame_clock: FrameClock<T>,
    telemetry: TelemetryLog<T>,
}

impl<T: Number> SimulationState<T> {
    /// Validates `config` and creates a simulation with the body at rest in
    /// its canonical pose.
    pub fn new(config: SimConfig<T>) -> Result<Self, SimError> {
        config.validate()?;
        let body = RigidBody::new(&config.body);
        let controller = FlightController::with_config(
            config.gains,
            config.limits,
            config.modes,
            config.arena.height,
            body.altitude(config.arena.height),
        );
        Ok(SimulationState {
            body,
            controller,
            stick: StickInput::neutral(),
            logged_stick: None,
            elapsed: T::zero(),
            paused: false,
            frame_clock: FrameClock::new(config.timing.max_step),
            telemetry: TelemetryLog::new(&config.telemetry),
            config,
        })
    }

    /// Moves the stick. Axes are saturated to `[-1, 1]`.
    pub fn set_stick(&mut self, x: T, y: T) {
        self.stick = StickInput::new(x, y);
        let threshold = T::lit(STICK_LOG_THRESHOLD);
        let moved = match &self.logged_stick {
            Some(logged) => self.stick.moved_from(logged, threshold),
            None => true,
        };
        if moved {
            debug!(
                "stick moved: x={:.2} y={:.2}",
                ToPrimitive::to_f64(&self.stick.x()).unwrap_or(f64::NAN),
                ToPrimitive::to_f64(&self.stick.y()).unwrap_or(f64::NAN)
            );
            self.logged_stick = Some(self.stick);
        }
    }

    /// Returns the stick to its released position.
    pub fn release_stick(&mut self) {
        self.stick = StickInput::neutral();
    }

    /// Pauses or resumes the simulation.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            info!("simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Flips the pause state and returns the new one.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    /// Puts the body back in its canonical pose, releases the stick and
    /// clears every control loop. The altitude set point becomes the
    /// altitude of the reset body; the simulation clock keeps running.
    pub fn reset(&mut self) {
        self.body.reset(&self.config.body);
        self.stick = StickInput::neutral();
        let altitude = self.body.altitude(self.config.arena.height);
        self.controller.reset(altitude);
        self.telemetry.note(self.elapsed, "reset");
        info!("simulation reset");
    }

    /// The airframe.
    pub fn body(&self) -> &RigidBody<T> {
        &self.body
    }

    /// Mutable access to the airframe, for placing it.
    pub fn body_mut(&mut self) -> &mut RigidBody<T> {
        &mut self.body
    }

    /// The flight controller.
    pub fn controller(&self) -> &FlightController<T> {
        &self.controller
    }

    /// Mutable access to the flight controller, for mode and gain changes.
    pub fn controller_mut(&mut self) -> &mut FlightController<T> {
        &mut self.controller
    }

    /// The current stick position.
    pub fn stick(&self) -> StickInput<T> {
        self.stick
    }

    /// Simulation time in seconds.
    pub fn elapsed(&self) -> T {
        self.elapsed
    }

    /// Whether ticks are currently skipped.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The configuration the simulation was built from.
    pub fn config(&self) -> &SimConfig<T> {
        &self.config
    }

    /// The telemetry log.
    pub fn telemetry(&self) -> &TelemetryLog<T> {
        &self.telemetry
    }

    /// Mutable access to the telemetry log, for clearing it.
    pub fn telemetry_mut(&mut self) -> &mut TelemetryLog<T> {
        &mut self.telemetry
    }

    /// Observable body state.
    pub fn state(&self) -> BodyState<T> {
        self.body.state(&self.config.body)
    }
}

/// Advances the simulation by one frame of `frame_dt` seconds.
///
/// The step is clamped to `[0, timing.max_step]`; a NaN step counts as zero.
/// Returns `None` without touching the state while paused.
pub fn tick<T: Number>(state: &mut SimulationState<T>, frame_dt: T) -> Option<Frame<T>> {
    if state.paused {
        return None;
    }

    let dt = if frame_dt.is_nan() {
        T::zero()
    } else {
        frame_dt.saturate(T::zero(), state.config.timing.max_step)
    };
    state.elapsed = state.elapsed + dt;

    let thrust = state
        .controller
        .control(state.stick, &state.body, state.elapsed);
    state.body.set_thrust(thrust.left, thrust.right);
    state.body.step(&state.config.body, dt);

    let body_state = state.body.state(&state.config.body);
    let setpoints = *state.controller.setpoints();
    if state.config.telemetry.enabled {
        let sample = TelemetrySample {
            state: body_state,
            altitude: state.body.altitude(state.config.arena.height),
            stick: state.stick,
            modes: state.controller.modes(),
            setpoints,
        };
        state.telemetry.record(state.elapsed, &sample);
    }

    Some(Frame {
        time: state.elapsed,
        dt,
        state: body_state,
        thrust,
        setpoints,
    })
}

/// Advances the simulation for a frame presented at `timestamp` seconds on a
/// monotonic clock.
///
/// The step is the time since the previous frame, clamped to the maximum
/// step; the first frame is a zero step. The frame clock keeps running while
/// paused, so resuming never produces a step longer than the maximum.
pub fn tick_at<T: Number>(state: &mut SimulationState<T>, timestamp: T) -> Option<Frame<T>> {
    let dt = state.frame_clock.advance(timestamp);
    tick(state, dt)
}
