//! Cost of one estimation run: tracker take, sanity gate, chain pass

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use navfuse_core::{
    time::FixedTime, AirspeedSample, AlarmLevel, AlarmSink, DeadlineScheduler,
    EstimationSettings, FilterChain, FilterResult, FilterUnit, GpsPosition, HomeLocation,
    SensorClass, SensorMask, SensorSnapshot, SensorSource, UpdateTracker,
};

struct Hover;

impl SensorSource for Hover {
    fn gyro(&self) -> [f32; 3] {
        [0.01, -0.02, 0.003]
    }
    fn accel(&self) -> [f32; 3] {
        [0.05, -0.01, -9.80]
    }
    fn mag(&self) -> [f32; 3] {
        [0.21, 0.01, 0.43]
    }
    fn gps_velocity(&self) -> [f32; 3] {
        [0.1, 0.0, -0.05]
    }
    fn baro_altitude(&self) -> f32 {
        512.0
    }
    fn airspeed(&self) -> AirspeedSample {
        AirspeedSample { calibrated: 3.2, connected: true }
    }
    fn gps_position(&self) -> GpsPosition {
        GpsPosition {
            latitude: 47.3980,
            longitude: 8.5460,
            altitude: 465.0,
            geoid_separation: 48.0,
        }
    }
}

struct Discard;

impl AlarmSink for Discard {
    fn set_attitude_alarm(&mut self, _level: AlarmLevel) {}
}

/// Stand-in for a light estimator: integrates gyro into the attitude slot
struct Integrate;

impl FilterUnit for Integrate {
    fn name(&self) -> &'static str {
        "integrate"
    }

    fn init(&mut self) -> FilterResult<()> {
        Ok(())
    }

    fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
        state.att[0] = 1.0;
        for (q, w) in state.att[1..].iter_mut().zip(state.gyr) {
            *q += 0.5 * w * 0.002;
        }
        state.mark_valid(SensorMask::ATTITUDE);
        Ok(())
    }
}

fn home() -> HomeLocation {
    HomeLocation {
        latitude: 47.3977,
        longitude: 8.5456,
        altitude: 488.0,
        magnetic_field: [21_300.0, 1_500.0, 43_000.0],
        set: true,
    }
}

fn bench_run_cycle(c: &mut Criterion) {
    let tracker = UpdateTracker::new();
    let chain = FilterChain::builder()
        .add_unit(Integrate)
        .add_unit(Integrate)
        .add_unit(Integrate)
        .build()
        .unwrap();
    let mut scheduler = DeadlineScheduler::new(
        &tracker,
        Hover,
        Discard,
        FixedTime::new(0),
        chain,
        &EstimationSettings::default(),
    );
    scheduler.start(Some(&home())).unwrap();

    c.bench_function("run_imu_only", |b| {
        b.iter(|| {
            tracker.mark(SensorClass::Gyro);
            tracker.mark(SensorClass::Accel);
            black_box(scheduler.poll().unwrap())
        })
    });

    c.bench_function("run_all_sensors", |b| {
        b.iter(|| {
            tracker.mark_mask(SensorMask::SENSORS);
            black_box(scheduler.poll().unwrap())
        })
    });
}

fn bench_tracker(c: &mut Criterion) {
    let tracker = UpdateTracker::new();

    c.bench_function("tracker_mark_take", |b| {
        b.iter(|| {
            tracker.mark(black_box(SensorClass::Position));
            black_box(tracker.take_and_clear())
        })
    });
}

criterion_group!(benches, bench_run_cycle, bench_tracker);
criterion_main!(benches);
