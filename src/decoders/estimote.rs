//! Estimote telemetry (service data `0xFE9A`) and Nearable (manufacturer data
//! `0x015D`) frames.
//!
//! The first byte of both carries the frame kind in its low nibble and the
//! protocol version in its high nibble. Telemetry is split into subframe A
//! (motion) and subframe B (environment); which bits hold what depends on the
//! protocol version.

use super::hex_string;
use crate::constants::{
    ESTIMOTE_FRAME_KIND_MASK, ESTIMOTE_NEARABLE_FRAME, ESTIMOTE_PROTOCOL_VERSION_MASK,
    ESTIMOTE_PROTOCOL_VERSION_SHIFT, ESTIMOTE_TELEMETRY_FRAME, ESTIMOTE_TELEMETRY_SUBFRAME_A,
    ESTIMOTE_TELEMETRY_SUBFRAME_B,
};
use crate::error::DecodeError;
use crate::numeric::{ByteReader, signed_12_4};
use crate::record::{BeaconRecord, HasProperties, Properties, PropertiesBuilder};

const PROTOCOL: &str = "Estimote";

// Motion state duration byte: 6-bit count, 2-bit unit.
const DURATION_NUMBER_MASK: u8 = 0b0011_1111;
const DURATION_UNIT_SHIFT: u8 = 6;

// Subframe A, first combined byte.
const MOTION_STATE_MASK: u8 = 0b0000_0011;
const GPIO_SHIFT: u8 = 4;
const V2_FIRMWARE_ERROR_BIT: u8 = 0b0000_0100;
const V2_CLOCK_ERROR_BIT: u8 = 0b0000_1000;

// Error flags for v1 subframe A (second combined byte) and v0 subframe B
// (fifth combined byte).
const FIRMWARE_ERROR_BIT: u8 = 0b0000_0001;
const CLOCK_ERROR_BIT: u8 = 0b0000_0010;

// Subframe B bit layout.
const UPTIME_HIGH_MASK: u8 = 0b0000_1111;
const UPTIME_UNIT_MASK: u8 = 0b0011_0000;
const UPTIME_UNIT_SHIFT: u8 = 4;
const TEMPERATURE_LOW_MASK: u8 = 0b1100_0000;
const TEMPERATURE_HIGH_MASK: u8 = 0b0000_0011;
const VOLTAGE_LOW_MASK: u8 = 0b1111_1100;
const VOLTAGE_UNAVAILABLE: u16 = 0x3FFF;
const AMBIENT_LIGHT_UNAVAILABLE: u8 = 0xFF;
const BATTERY_LEVEL_UNAVAILABLE: u8 = 0xFF;
const PRESSURE_UNAVAILABLE: u32 = 0xFFFF_FFFF;

// Nearable motion byte.
const NEARABLE_MOVING_BIT: u8 = 0b0100_0000;

const MINUTE: u32 = 60;
const HOUR: u32 = 60 * MINUTE;
const DAY: u32 = 24 * HOUR;
const WEEK: u32 = 7 * DAY;

/// Frame kind from the low nibble of the frame type byte.
pub fn frame_kind(frame_type: u8) -> u8 {
    frame_type & ESTIMOTE_FRAME_KIND_MASK
}

/// Protocol version from the high nibble of the frame type byte.
pub fn protocol_version(frame_type: u8) -> u8 {
    (frame_type & ESTIMOTE_PROTOCOL_VERSION_MASK) >> ESTIMOTE_PROTOCOL_VERSION_SHIFT
}

/// Motion state duration in seconds.
///
/// Unit 0 is seconds, 1 minutes, 2 hours. Unit 3 is days for counts below 32
/// and whole weeks (count - 32) above.
pub fn parse_motion_duration(raw: u8) -> u32 {
    let number = u32::from(raw & DURATION_NUMBER_MASK);
    match raw >> DURATION_UNIT_SHIFT {
        0 => number,
        1 => number * MINUTE,
        2 => number * HOUR,
        _ if number < 32 => number * DAY,
        _ => (number - 32) * WEEK,
    }
}

/// Telemetry subframe A: motion and GPIO.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimoteTelemetryA {
    /// Protocol version from the frame type byte
    pub protocol_version: u8,
    /// First half of the device identifier
    pub identifier: [u8; 8],
    /// Acceleration (x, y, z) in g
    pub acceleration: (f64, f64, f64),
    /// Duration of the previous motion state in seconds
    pub previous_motion_state: u32,
    /// Duration of the current motion state in seconds
    pub current_motion_state: u32,
    pub is_moving: bool,
    /// States of GPIO pins 0..3
    pub gpio_states: [bool; 4],
    /// Absent for protocol version 0
    pub has_firmware_error: Option<bool>,
    /// Absent for protocol version 0
    pub has_clock_error: Option<bool>,
    /// Atmospheric pressure in Pascals, protocol version 2 only
    pub pressure: Option<f64>,
}

impl HasProperties for EstimoteTelemetryA {
    fn properties(&self) -> Properties {
        let mut builder = PropertiesBuilder::new()
            .with("identifier", hex_string(&self.identifier))
            .with("protocol_version", self.protocol_version)
            .with_xyz(
                ["acceleration_x", "acceleration_y", "acceleration_z"],
                Some(self.acceleration),
            )
            .with("previous_motion_state", self.previous_motion_state)
            .with("current_motion_state", self.current_motion_state)
            .with("is_moving", self.is_moving)
            .with_opt("has_firmware_error", self.has_firmware_error)
            .with_opt("has_clock_error", self.has_clock_error)
            .with_opt("pressure", self.pressure);
        for (name, state) in ["gpio_0", "gpio_1", "gpio_2", "gpio_3"]
            .into_iter()
            .zip(self.gpio_states)
        {
            builder = builder.with(name, state);
        }
        builder.build()
    }
}

/// Telemetry subframe B: magnetometer, light, temperature and power.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimoteTelemetryB {
    /// Protocol version from the frame type byte
    pub protocol_version: u8,
    /// First half of the device identifier
    pub identifier: [u8; 8],
    /// Normalized magnetic field (x, y, z), -1.0 to 1.0
    pub magnetic_field: Option<(f64, f64, f64)>,
    /// Ambient light in lux
    pub ambient_light: Option<f64>,
    /// Time since boot in seconds
    pub uptime: u32,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Battery voltage in mV
    pub battery_voltage: Option<u16>,
    /// Protocol version 0 only
    pub has_firmware_error: Option<bool>,
    /// Protocol version 0 only
    pub has_clock_error: Option<bool>,
    /// Battery level in percent, protocol version 1 and later
    pub battery_level: Option<u8>,
}

impl HasProperties for EstimoteTelemetryB {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("identifier", hex_string(&self.identifier))
            .with("protocol_version", self.protocol_version)
            .with_xyz(
                ["magnetic_field_x", "magnetic_field_y", "magnetic_field_z"],
                self.magnetic_field,
            )
            .with_opt("ambient_light", self.ambient_light)
            .with("uptime", self.uptime)
            .with("temperature", self.temperature)
            .with_opt("battery_voltage", self.battery_voltage)
            .with_opt("has_firmware_error", self.has_firmware_error)
            .with_opt("has_clock_error", self.has_clock_error)
            .with_opt("battery_level", self.battery_level)
            .build()
    }
}

/// Estimote Nearable sticker advertisement.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimoteNearable {
    pub identifier: [u8; 8],
    pub hardware_version: u8,
    pub firmware_version: u8,
    /// Temperature in Celsius
    pub temperature: f64,
    pub is_moving: bool,
}

impl HasProperties for EstimoteNearable {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("identifier", hex_string(&self.identifier))
            .with("hardware_version", self.hardware_version)
            .with("firmware_version", self.firmware_version)
            .with("temperature", self.temperature)
            .with("is_moving", self.is_moving)
            .build()
    }
}

/// Decode Estimote service data (the bytes after the `0xFE9A` UUID).
pub fn decode_telemetry(service_data: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = ByteReader::new(PROTOCOL, service_data);
    let frame_type = reader.u8()?;
    if frame_kind(frame_type) != ESTIMOTE_TELEMETRY_FRAME {
        return Err(DecodeError::UnsupportedFrame {
            protocol: PROTOCOL,
            frame_type,
        });
    }
    let version = protocol_version(frame_type);
    let identifier = reader.array()?;

    match reader.u8()? {
        ESTIMOTE_TELEMETRY_SUBFRAME_A => Ok(BeaconRecord::EstimoteTelemetryA(decode_subframe_a(
            &mut reader,
            identifier,
            version,
        )?)),
        ESTIMOTE_TELEMETRY_SUBFRAME_B => Ok(BeaconRecord::EstimoteTelemetryB(decode_subframe_b(
            &mut reader,
            identifier,
            version,
        )?)),
        subframe => Err(DecodeError::UnsupportedFrame {
            protocol: "Estimote telemetry subframe",
            frame_type: subframe,
        }),
    }
}

fn normalized_xyz(raw: [u8; 3], multiplier: f64, divisor: f64) -> (f64, f64, f64) {
    let [x, y, z] = raw.map(|b| f64::from(b as i8) * multiplier / divisor);
    (x, y, z)
}

fn decode_pressure(reader: &mut ByteReader<'_>) -> Option<f64> {
    reader
        .array::<4>()
        .ok()
        .map(u32::from_le_bytes)
        .filter(|raw| *raw != PRESSURE_UNAVAILABLE)
        .map(|raw| f64::from(raw) / 256.0)
}

fn decode_subframe_a(
    reader: &mut ByteReader<'_>,
    identifier: [u8; 8],
    protocol_version: u8,
) -> Result<EstimoteTelemetryA, DecodeError> {
    let acceleration = normalized_xyz(reader.array()?, 2.0, 127.0);
    let previous_motion_state = parse_motion_duration(reader.u8()?);
    let current_motion_state = parse_motion_duration(reader.u8()?);
    let status = reader.u8()?;

    let (has_firmware_error, has_clock_error, pressure) = match protocol_version {
        2 => (
            Some(status & V2_FIRMWARE_ERROR_BIT != 0),
            Some(status & V2_CLOCK_ERROR_BIT != 0),
            decode_pressure(reader),
        ),
        1 => {
            let errors = reader.u8()?;
            (
                Some(errors & FIRMWARE_ERROR_BIT != 0),
                Some(errors & CLOCK_ERROR_BIT != 0),
                None,
            )
        }
        _ => (None, None, None),
    };

    Ok(EstimoteTelemetryA {
        protocol_version,
        identifier,
        acceleration,
        previous_motion_state,
        current_motion_state,
        is_moving: status & MOTION_STATE_MASK == 1,
        gpio_states: [0, 1, 2, 3].map(|pin| status & (1 << (GPIO_SHIFT + pin)) != 0),
        has_firmware_error,
        has_clock_error,
        pressure,
    })
}

fn decode_subframe_b(
    reader: &mut ByteReader<'_>,
    identifier: [u8; 8],
    protocol_version: u8,
) -> Result<EstimoteTelemetryB, DecodeError> {
    let magnetic_raw: [u8; 3] = reader.array()?;
    let magnetic_field =
        (magnetic_raw != [0xFF; 3]).then(|| normalized_xyz(magnetic_raw, 1.0, 128.0));

    let light = reader.u8()?;
    let ambient_light = (light != AMBIENT_LIGHT_UNAVAILABLE).then(|| {
        let exponent = light >> 4;
        let mantissa = light & 0x0F;
        f64::from(1u32 << exponent) * f64::from(mantissa) * 0.72
    });

    let c: [u8; 5] = reader.array()?;

    let uptime_number = (u32::from(c[1] & UPTIME_HIGH_MASK) << 8) | u32::from(c[0]);
    let uptime = match (c[1] & UPTIME_UNIT_MASK) >> UPTIME_UNIT_SHIFT {
        0 => uptime_number,
        1 => uptime_number * MINUTE,
        2 => uptime_number * HOUR,
        _ => uptime_number * DAY,
    };

    let temperature_raw = (u16::from(c[3] & TEMPERATURE_HIGH_MASK) << 10)
        | (u16::from(c[2]) << 2)
        | u16::from((c[1] & TEMPERATURE_LOW_MASK) >> 6);
    let temperature = signed_12_4(temperature_raw);

    let voltage = (u16::from(c[4]) << 6) | u16::from((c[3] & VOLTAGE_LOW_MASK) >> 2);
    let battery_voltage = (voltage != VOLTAGE_UNAVAILABLE).then_some(voltage);

    let (has_firmware_error, has_clock_error) = if protocol_version == 0 {
        (
            Some(c[4] & FIRMWARE_ERROR_BIT != 0),
            Some(c[4] & CLOCK_ERROR_BIT != 0),
        )
    } else {
        (None, None)
    };

    let battery_level = if protocol_version == 0 {
        None
    } else {
        reader
            .optional_u8()
            .filter(|level| *level != BATTERY_LEVEL_UNAVAILABLE)
    };

    Ok(EstimoteTelemetryB {
        protocol_version,
        identifier,
        magnetic_field,
        ambient_light,
        uptime,
        temperature,
        battery_voltage,
        has_firmware_error,
        has_clock_error,
        battery_level,
    })
}

/// Decode Estimote manufacturer data (the bytes after the `0x015D` company ID).
pub fn decode_nearable(data: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = ByteReader::new("Estimote Nearable", data);
    let frame_type = reader.u8()?;
    if frame_kind(frame_type) != ESTIMOTE_NEARABLE_FRAME {
        return Err(DecodeError::UnsupportedFrame {
            protocol: PROTOCOL,
            frame_type,
        });
    }

    Ok(BeaconRecord::EstimoteNearable(EstimoteNearable {
        identifier: reader.array()?,
        hardware_version: reader.u8()?,
        firmware_version: reader.u8()?,
        temperature: signed_12_4(reader.u16_le()?),
        is_moving: reader.u8()? & NEARABLE_MOVING_BIT != 0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTIFIER: [u8; 8] = [0x47, 0xA0, 0x38, 0xD5, 0xEB, 0x03, 0x26, 0x40];

    fn telemetry(frame_type: u8, subframe: u8, body: &[u8]) -> Vec<u8> {
        let mut data = vec![frame_type];
        data.extend(IDENTIFIER);
        data.push(subframe);
        data.extend(body);
        data
    }

    #[test]
    fn test_frame_type_nibbles() {
        assert_eq!(frame_kind(0x22), ESTIMOTE_TELEMETRY_FRAME);
        assert_eq!(protocol_version(0x22), 2);
        assert_eq!(frame_kind(0x12), ESTIMOTE_TELEMETRY_FRAME);
        assert_eq!(protocol_version(0x12), 1);
        assert_eq!(frame_kind(0x01), ESTIMOTE_NEARABLE_FRAME);
        assert_eq!(protocol_version(0x01), 0);
        assert_eq!(protocol_version(0xF0), 15);
    }

    #[test]
    fn test_motion_duration_units() {
        assert_eq!(parse_motion_duration(0b00_000101), 5);
        assert_eq!(parse_motion_duration(0b01_000101), 5 * 60);
        assert_eq!(parse_motion_duration(0b10_000101), 5 * 3600);
        assert_eq!(parse_motion_duration(0b11_000101), 5 * 86400);
        assert_eq!(parse_motion_duration(0b11_100010), 2 * 604800);
    }

    #[test]
    fn test_subframe_a_v2() {
        let body = [
            0x7F, 0x81, 0x00, // acceleration: 2 g, -2 g, 0
            0x01, // previous motion: 1 s
            0x42, // current motion: 2 min
            0b1010_0101, // gpio 1 and 3 high, firmware error, moving
            0x00, 0x00, 0x7B, 0x01, // pressure 0x017B0000 / 256
        ];
        let record = decode_telemetry(&telemetry(0x22, 0x00, &body)).unwrap();
        let BeaconRecord::EstimoteTelemetryA(a) = record else {
            panic!("expected subframe A");
        };
        assert_eq!(a.protocol_version, 2);
        assert_eq!(a.identifier, IDENTIFIER);
        assert_eq!(a.acceleration, (2.0, -2.0, 0.0));
        assert_eq!(a.previous_motion_state, 1);
        assert_eq!(a.current_motion_state, 120);
        assert!(a.is_moving);
        assert_eq!(a.gpio_states, [false, true, false, true]);
        assert_eq!(a.has_firmware_error, Some(true));
        assert_eq!(a.has_clock_error, Some(false));
        assert_eq!(a.pressure, Some(f64::from(0x017B_0000u32) / 256.0));
    }

    #[test]
    fn test_subframe_a_v1_error_byte() {
        let body = [0, 0, 0, 0, 0, 0b0000_0010, 0b0000_0010];
        let BeaconRecord::EstimoteTelemetryA(a) =
            decode_telemetry(&telemetry(0x12, 0x00, &body)).unwrap()
        else {
            panic!("expected subframe A");
        };
        assert!(!a.is_moving);
        assert_eq!(a.has_firmware_error, Some(false));
        assert_eq!(a.has_clock_error, Some(true));
        assert_eq!(a.pressure, None);
    }

    #[test]
    fn test_subframe_a_v0_has_no_error_flags() {
        let body = [0, 0, 0, 0, 0, 0b0000_1101];
        let BeaconRecord::EstimoteTelemetryA(a) =
            decode_telemetry(&telemetry(0x02, 0x00, &body)).unwrap()
        else {
            panic!("expected subframe A");
        };
        assert_eq!(a.has_firmware_error, None);
        assert_eq!(a.has_clock_error, None);
    }

    #[test]
    fn test_subframe_a_v2_pressure_unavailable() {
        let body = [0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        let BeaconRecord::EstimoteTelemetryA(a) =
            decode_telemetry(&telemetry(0x22, 0x00, &body)).unwrap()
        else {
            panic!("expected subframe A");
        };
        assert_eq!(a.pressure, None);
    }

    #[test]
    fn test_subframe_b_v2() {
        let body = [
            0x40, 0xC0, 0x00, // magnetic field: 0.5, -0.5, 0
            0x32, // ambient light: 2^3 * 2 * 0.72
            0x10, 0x52, // uptime 0x210 minutes, temperature low bits 01
            0x5A, // temperature middle bits
            0xA0, 0x2E, // temperature high bits 00, voltage 0x2E<<6 | 0x28
            0x64, // battery level 100 %
        ];
        let BeaconRecord::EstimoteTelemetryB(b) =
            decode_telemetry(&telemetry(0x22, 0x01, &body)).unwrap()
        else {
            panic!("expected subframe B");
        };
        assert_eq!(b.magnetic_field, Some((0.5, -0.5, 0.0)));
        assert_eq!(b.ambient_light, Some(8.0 * 2.0 * 0.72));
        assert_eq!(b.uptime, 0x210 * 60);
        // (0x5A << 2 | 0b01) / 16
        assert_eq!(b.temperature, 361.0 / 16.0);
        assert_eq!(b.battery_voltage, Some((0x2E << 6) | 0x28));
        assert_eq!(b.has_firmware_error, None);
        assert_eq!(b.battery_level, Some(100));
    }

    #[test]
    fn test_subframe_b_unavailable_fields() {
        let body = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0xFC, 0xFF, 0xFF];
        let BeaconRecord::EstimoteTelemetryB(b) =
            decode_telemetry(&telemetry(0x12, 0x01, &body)).unwrap()
        else {
            panic!("expected subframe B");
        };
        assert_eq!(b.magnetic_field, None);
        assert_eq!(b.ambient_light, None);
        assert_eq!(b.battery_voltage, None);
        assert_eq!(b.battery_level, None);
    }

    #[test]
    fn test_subframe_b_v0_error_flags() {
        let body = [0, 0, 0, 0, 0, 0, 0xC0, 0x03, 0x03];
        let BeaconRecord::EstimoteTelemetryB(b) =
            decode_telemetry(&telemetry(0x02, 0x01, &body)).unwrap()
        else {
            panic!("expected subframe B");
        };
        assert_eq!(b.has_firmware_error, Some(true));
        assert_eq!(b.has_clock_error, Some(true));
        assert_eq!(b.battery_level, None);
        // 12-bit temperature 0xF00 is negative
        assert_eq!(b.temperature, -16.0);
    }

    #[test]
    fn test_unknown_subframe() {
        assert_eq!(
            decode_telemetry(&telemetry(0x22, 0x02, &[0; 10])),
            Err(DecodeError::UnsupportedFrame {
                protocol: "Estimote telemetry subframe",
                frame_type: 2
            })
        );
    }

    #[test]
    fn test_non_telemetry_frame_kind() {
        assert!(matches!(
            decode_telemetry(&telemetry(0x21, 0x00, &[0; 10])),
            Err(DecodeError::UnsupportedFrame { frame_type: 0x21, .. })
        ));
    }

    #[test]
    fn test_nearable() {
        let mut data = vec![0x01];
        data.extend(IDENTIFIER);
        data.extend([0x04, 0x01, 0x68, 0x01, 0x40]);
        let BeaconRecord::EstimoteNearable(n) = decode_nearable(&data).unwrap() else {
            panic!("expected nearable");
        };
        assert_eq!(n.identifier, IDENTIFIER);
        assert_eq!(n.hardware_version, 4);
        assert_eq!(n.firmware_version, 1);
        assert_eq!(n.temperature, 22.5);
        assert!(n.is_moving);
    }

    #[test]
    fn test_nearable_wrong_kind() {
        assert!(matches!(
            decode_nearable(&[0x02, 0x00]),
            Err(DecodeError::UnsupportedFrame { .. })
        ));
    }
}
