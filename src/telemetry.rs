// src/telemetry.rs

//! # Telemetry Log
//!
//! A bounded, rate-limited text log of the flight state. Each sample becomes
//! one line stamped with the simulation time; targets are only printed for
//! the stages that produced them. Every recorded line is also forwarded to
//! the `log` facade at trace level.

use crate::{BodyState, Number, Setpoints, StabilizationModes, StickInput, TelemetryParams};
use log::trace;
use num_traits::ToPrimitive;
use std::collections::VecDeque;
use std::fmt::Write;

/// Everything one telemetry line describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample<T> {
    /// Body state after the tick.
    pub state: BodyState<T>,
    /// Altitude of the body within the arena.
    pub altitude: T,
    /// Stick position used for the tick.
    pub stick: StickInput<T>,
    /// Active stabilization modes.
    pub modes: StabilizationModes,
    /// Set points of the tick.
    pub setpoints: Setpoints<T>,
}

/// Rate-limited ring of telemetry lines.
#[derive(Debug, Clone)]
pub struct TelemetryLog<T> {
    interval: T,
    capacity: usize,
    last_sample: Option<T>,
    lines: VecDeque<String>,
}

impl<T: Number> TelemetryLog<T> {
    /// Creates an empty log.
    pub fn new(params: &TelemetryParams<T>) -> Self {
        TelemetryLog {
            interval: params.interval,
            capacity: params.capacity.max(1),
            last_sample: None,
            lines: VecDeque::new(),
        }
    }

    /// Records `sample` taken at simulation time `now`, unless the previous
    /// sample is more recent than the sampling interval. Returns whether a
    /// line was added.
    pub fn record(&mut self, now: T, sample: &TelemetrySample<T>) -> bool {
        if let Some(last) = self.last_sample {
            if now - last < self.interval {
                return false;
            }
        }
        self.last_sample = Some(now);

        let line = format!("[{:9.3}s] {}", to_f64(now), format_sample(sample));
        trace!("{line}");
        self.push(line);
        true
    }

    /// Appends a free-form line, such as an operator event.
    pub fn note(&mut self, now: T, message: &str) {
        self.push(format!("[{:9.3}s] {message}", to_f64(now)));
    }

    /// Recorded lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of recorded lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every line. The sampling interval restarts.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.last_sample = None;
    }

    /// All lines joined with newlines, for copying or saving.
    pub fn export(&self) -> String {
        let mut text = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(line);
        }
        text
    }

    fn push(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }
}

/// Formats the body of a telemetry line.
pub fn format_sample<T: Number>(sample: &TelemetrySample<T>) -> String {
    let state = &sample.state;
    let mut line = format!(
        "x={:.1} y={:.1} alt={:.1} vx={:.2} vy={:.2} roll={:.1}° rollRate={:.2} left={:.2} right={:.2} joyX={:.2} joyY={:.2}",
        to_f64(state.x),
        to_f64(state.y),
        to_f64(sample.altitude),
        to_f64(state.vx),
        to_f64(state.vy),
        to_f64(state.angle).to_degrees(),
        to_f64(state.omega),
        to_f64(state.left_thrust),
        to_f64(state.right_thrust),
        to_f64(sample.stick.x()),
        to_f64(sample.stick.y()),
    );

    let setpoints = &sample.setpoints;
    // Writing into a String cannot fail.
    if sample.modes.altitude() {
        let _ = write!(
            line,
            " targetAlt={:.1} targetVy={:.1}",
            to_f64(setpoints.altitude),
            to_f64(setpoints.vertical_speed)
        );
    }
    if sample.modes.rate() {
        let _ = write!(line, " targetRollRate={:.2}", to_f64(setpoints.roll_rate));
    }
    if sample.modes.attitude() {
        let _ = write!(line, " targetRoll={:.1}°", to_f64(setpoints.roll).to_degrees());
    }
    line
}

fn to_f64<T: Number>(value: T) -> f64 {
    ToPrimitive::to_f64(&value).unwrap_or(f64::NAN)
}
