//! Demo Source - simulated vehicle for trying the inspector without hardware
//!
//! An autopilot (1:1) and a gimbal (1:154). Timestamps come from the
//! simulated clock, so frequencies read exactly as the nominal rates.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, Duration};
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use super::{EventStream, TelemetrySource};
use crate::error::Result;
use crate::types::{Primitive, RecordValue, SourceKey, TelemetryEvent};

/// Simulated clock step; the fastest stream runs at one record per tick
const TICK_SECS: f64 = 0.1;

const AUTOPILOT: SourceKey = SourceKey {
    system: 1,
    component: 1,
};
const GIMBAL: SourceKey = SourceKey {
    system: 1,
    component: 154,
};

const STATUS_TEXTS: &[(u8, &str)] = &[
    (6, "EKF3 IMU0 is using GPS"),
    (6, "Flight plan received"),
    (4, "PreArm: Battery below minimum arming voltage"),
    (2, "Crash: Disarming"),
];

pub struct DemoSource {
    period: Duration,
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            period: Duration::from_secs_f64(TICK_SECS),
        }
    }

    async fn generate(tx: mpsc::Sender<TelemetryEvent>, period: Duration) {
        let mut interval = time::interval(period);
        for tick in 0u64.. {
            interval.tick().await;
            for event in demo_events(tick) {
                if tx.send(event).await.is_err() {
                    debug!(tick, "demo receiver dropped");
                    return;
                }
            }
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySource for DemoSource {
    fn describe(&self) -> String {
        "demo vehicle".to_string()
    }

    async fn open(&self) -> Result<EventStream> {
        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(Self::generate(tx, self.period));
        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event script
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the simulated vehicle sends on `tick`
pub fn demo_events(tick: u64) -> Vec<TelemetryEvent> {
    let t = tick as f64 * TICK_SECS;
    let mut events = Vec::new();

    if tick == 0 {
        events.push(record(
            AUTOPILOT,
            "AUTOPILOT_VERSION",
            RecordValue::text("ArduCopter V4.5.0 (3fc7011a)\nChibiOS: 6a85082c\nCubeOrange 00340028"),
            t,
        ));
        events.extend(
            [
                ("SYSID_THISMAV", Primitive::Int(1)),
                ("ARMING_CHECK", Primitive::Int(1)),
                ("WPNAV_SPEED", Primitive::Float(500.0)),
                ("BATT_CAPACITY", Primitive::Int(5200)),
            ]
            .into_iter()
            .map(|(name, value)| param(AUTOPILOT, name, value)),
        );
        events.push(param(GIMBAL, "MNT1_TYPE", Primitive::Int(6)));
    }

    events.push(record(
        AUTOPILOT,
        "ATTITUDE",
        RecordValue::fields([
            ("time_boot_ms", Primitive::Int((t * 1000.0) as i64)),
            ("roll", Primitive::Float(0.05 * (t * 0.7).sin())),
            ("pitch", Primitive::Float(0.03 * (t * 0.5).cos())),
            ("yaw", Primitive::Float((t * 0.1) % std::f64::consts::TAU)),
        ]),
        t,
    ));

    if tick % 2 == 0 {
        events.push(record(
            AUTOPILOT,
            "GLOBAL_POSITION_INT",
            RecordValue::fields([
                ("lat", Primitive::Int(473_977_420 + (tick as i64) * 3)),
                ("lon", Primitive::Int(85_455_940 - (tick as i64) * 2)),
                ("alt", Primitive::Int(488_000 + ((t.sin() * 500.0) as i64))),
                ("relative_alt", Primitive::Int(10_000)),
                ("hdg", Primitive::Int(((t * 10.0) as i64 % 360) * 100)),
            ]),
            t,
        ));
    }

    if tick % 10 == 0 {
        let voltage = 12.6 - (tick as f64) * 0.0005;
        for (source, kind) in [(AUTOPILOT, 2i64), (GIMBAL, 26)] {
            events.push(record(
                source,
                "HEARTBEAT",
                RecordValue::fields([
                    ("type", Primitive::Int(kind)),
                    ("autopilot", Primitive::Int(3)),
                    ("base_mode", Primitive::Int(81)),
                    ("system_status", Primitive::Int(4)),
                ]),
                t,
            ));
        }
        events.push(record(
            AUTOPILOT,
            "SYS_STATUS",
            RecordValue::fields([
                ("voltage_battery", Primitive::Int((voltage * 1000.0) as i64)),
                ("current_battery", Primitive::Int(1250)),
                ("battery_remaining", Primitive::Int(87 - (tick / 600) as i64)),
                ("load", Primitive::Int(310)),
            ]),
            t,
        ));
        events.push(record(
            AUTOPILOT,
            "BATTERY_VOLTAGE",
            RecordValue::Scalar(Primitive::Float(voltage)),
            t,
        ));
    }

    if tick % 50 == 0 {
        let (severity, text) = STATUS_TEXTS[(tick / 50) as usize % STATUS_TEXTS.len()];
        events.push(TelemetryEvent::StatusText {
            source: AUTOPILOT,
            severity: Some(severity),
            text: text.to_string(),
        });
    }

    events
}

fn record(source: SourceKey, type_name: &str, value: RecordValue, timestamp: f64) -> TelemetryEvent {
    TelemetryEvent::Record {
        source,
        type_name: type_name.to_string(),
        value,
        timestamp,
    }
}

fn param(source: SourceKey, name: &str, value: Primitive) -> TelemetryEvent {
    TelemetryEvent::Parameter {
        source,
        name: name.to_string(),
        value,
    }
}
