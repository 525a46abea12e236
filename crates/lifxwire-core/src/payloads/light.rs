use std::io::Read;
use std::time::Duration;

use serde::Serialize;

use super::PayloadCodec;
use super::common::{self, LABEL_LEN, Label};
use crate::protocol::{Result, WireReader, WireWriter};

const HUE_DEGREES_MAX: u32 = 359;
const PERCENT_MAX: u32 = 100;

/// Hue, saturation, brightness and colour temperature.
///
/// The first three span the full `u16` range; `kelvin` is a plain
/// temperature (2500 is warm, 9000 is cool).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Hsbk {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

impl Hsbk {
    /// Hue scaled onto the 0..=359 colour wheel, truncated.
    pub fn hue_degrees(&self) -> u16 {
        scale(self.hue, HUE_DEGREES_MAX) as u16
    }

    /// Saturation scaled to 0..=100, truncated.
    pub fn saturation_percent(&self) -> u8 {
        scale(self.saturation, PERCENT_MAX) as u8
    }

    /// Brightness scaled to 0..=100, truncated.
    pub fn brightness_percent(&self) -> u8 {
        scale(self.brightness, PERCENT_MAX) as u8
    }
}

fn scale(value: u16, max: u32) -> u32 {
    u32::from(value) * max / u32::from(u16::MAX)
}

impl PayloadCodec for Hsbk {
    const WIRE_SIZE: usize = 8;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_u16(self.hue);
        writer.put_u16(self.saturation);
        writer.put_u16(self.brightness);
        writer.put_u16(self.kelvin);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            hue: reader.read_u16()?,
            saturation: reader.read_u16()?,
            brightness: reader.read_u16()?,
            kelvin: reader.read_u16()?,
        })
    }
}

/// Client request to change colour over a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetColor {
    pub reserved: u8,
    pub color: Hsbk,
    /// Sent as whole milliseconds; must fit in 32 bits.
    #[serde(rename = "duration_ms", serialize_with = "common::serialize_millis")]
    pub duration: Duration,
}

impl PayloadCodec for SetColor {
    const WIRE_SIZE: usize = 1 + Hsbk::WIRE_SIZE + 4;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        let millis = common::duration_to_millis("duration", self.duration)?;
        writer.put_u8(self.reserved);
        self.color.write_to(writer)?;
        writer.put_u32(millis);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            reserved: reader.read_u8()?,
            color: Hsbk::read_from(reader)?,
            duration: common::millis_to_duration(reader.read_u32()?),
        })
    }
}

/// Device reply describing colour, power and label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LightState {
    pub color: Hsbk,
    pub reserved: u16,
    /// 0 is off, 65535 is on.
    pub power: u16,
    pub label: Label,
    pub reserved_b: u64,
}

impl PayloadCodec for LightState {
    const WIRE_SIZE: usize = Hsbk::WIRE_SIZE + 2 + 2 + LABEL_LEN + 8;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        self.color.write_to(writer)?;
        writer.put_u16(self.reserved);
        writer.put_u16(self.power);
        writer.put_slice(self.label.as_bytes());
        writer.put_u64(self.reserved_b);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            color: Hsbk::read_from(reader)?,
            reserved: reader.read_u16()?,
            power: reader.read_u16()?,
            label: Label::from_raw(reader.read_array()?),
            reserved_b: reader.read_u64()?,
        })
    }
}

/// Client request to change power over a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetLightPower {
    /// 0 or 65535.
    pub level: u16,
    #[serde(rename = "duration_ms", serialize_with = "common::serialize_millis")]
    pub duration: Duration,
}

impl PayloadCodec for SetLightPower {
    const WIRE_SIZE: usize = 6;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        let millis = common::duration_to_millis("duration", self.duration)?;
        writer.put_u16(self.level);
        writer.put_u32(millis);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            level: reader.read_u16()?,
            duration: common::millis_to_duration(reader.read_u32()?),
        })
    }
}
