//! Common fixtures for integration tests
//!
//! This module provides:
//! - A simulated sensor bus whose samples tests set directly
//! - An alarm sink that records every published level
//! - Scripted filter units that log their invocation order
//! - Scheduler construction helpers over a shared manual clock

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use navfuse_core::{
    time::ManualClock, AirspeedSample, AlarmLevel, AlarmSink, DeadlineScheduler,
    EstimationSettings, FilterChain, FilterError, FilterResult, FilterUnit, GpsPosition,
    SensorMask, SensorSnapshot, SensorSource, UpdateTracker,
};

pub mod scenarios;

/// Sensor bus with one settable sample per class
#[derive(Debug, Clone)]
pub struct SimulatedSensors {
    pub gyro: [f32; 3],
    pub accel: [f32; 3],
    pub mag: [f32; 3],
    pub velocity: [f32; 3],
    pub baro: f32,
    pub airspeed: AirspeedSample,
    pub position: GpsPosition,
}

impl Default for SimulatedSensors {
    /// Vehicle at rest next to the default home
    fn default() -> Self {
        Self {
            gyro: [0.01, -0.02, 0.0],
            accel: [0.0, 0.0, -9.81],
            mag: [0.21, 0.01, 0.43],
            velocity: [0.0; 3],
            baro: 488.0,
            airspeed: AirspeedSample { calibrated: 0.0, connected: true },
            position: scenarios::fix_offset_from(&scenarios::zurich_home(), 0.0001, 0.0),
        }
    }
}

impl SensorSource for SimulatedSensors {
    fn gyro(&self) -> [f32; 3] {
        self.gyro
    }

    fn accel(&self) -> [f32; 3] {
        self.accel
    }

    fn mag(&self) -> [f32; 3] {
        self.mag
    }

    fn gps_velocity(&self) -> [f32; 3] {
        self.velocity
    }

    fn baro_altitude(&self) -> f32 {
        self.baro
    }

    fn airspeed(&self) -> AirspeedSample {
        self.airspeed
    }

    fn gps_position(&self) -> GpsPosition {
        self.position
    }
}

/// Alarm sink keeping the full publication history
#[derive(Debug, Default)]
pub struct RecordingAlarms {
    pub history: Vec<AlarmLevel>,
}

impl RecordingAlarms {
    pub fn last(&self) -> Option<AlarmLevel> {
        self.history.last().copied()
    }
}

impl AlarmSink for RecordingAlarms {
    fn set_attitude_alarm(&mut self, level: AlarmLevel) {
        self.history.push(level);
    }
}

/// Shared record of unit invocations, in call order
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// What a scripted unit does on `update`
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Succeed without touching the snapshot
    Pass,
    /// Always fail
    Fail,
    /// Turn valid gyro and accel into an attitude
    ProduceAttitude,
    /// Fail unless an earlier unit produced attitude
    RequireAttitude,
}

pub struct ScriptedUnit {
    name: &'static str,
    script: Script,
    log: CallLog,
}

impl ScriptedUnit {
    pub fn new(name: &'static str, script: Script, log: &CallLog) -> Self {
        Self { name, script, log: Arc::clone(log) }
    }
}

impl FilterUnit for ScriptedUnit {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self) -> FilterResult<()> {
        Ok(())
    }

    fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
        self.log.lock().unwrap().push(self.name);

        match self.script {
            Script::Pass => Ok(()),
            Script::Fail => Err(FilterError::Internal { reason: "scripted failure" }),
            Script::ProduceAttitude => {
                if !state.is_valid(SensorMask::GYRO | SensorMask::ACCEL) {
                    return Err(FilterError::MissingInput);
                }
                state.att = [1.0, 0.0, 0.0, 0.0];
                state.mark_valid(SensorMask::ATTITUDE);
                Ok(())
            }
            Script::RequireAttitude => {
                if state.is_valid(SensorMask::ATTITUDE) {
                    Ok(())
                } else {
                    Err(FilterError::MissingInput)
                }
            }
        }
    }
}

pub type TestScheduler<'t, 'c> =
    DeadlineScheduler<'t, SimulatedSensors, RecordingAlarms, &'c ManualClock>;

/// Scheduler over simulated collaborators with the default settings
pub fn scheduler<'t, 'c>(
    tracker: &'t UpdateTracker,
    clock: &'c ManualClock,
    chain: FilterChain,
) -> TestScheduler<'t, 'c> {
    DeadlineScheduler::new(
        tracker,
        SimulatedSensors::default(),
        RecordingAlarms::default(),
        clock,
        chain,
        &EstimationSettings::default(),
    )
}

/// Chain of scripted units sharing `log`
pub fn scripted_chain(units: &[(&'static str, Script)], log: &CallLog) -> FilterChain {
    units
        .iter()
        .fold(FilterChain::builder(), |builder, (name, script)| {
            builder.add_unit(ScriptedUnit::new(*name, *script, log))
        })
        .build()
        .unwrap()
}
