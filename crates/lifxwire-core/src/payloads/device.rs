use std::io::Read;

use serde::Serialize;
use time::OffsetDateTime;

use super::PayloadCodec;
use super::common::{self, Label, LABEL_LEN};
use crate::protocol::{Result, WireReader, WireWriter};

pub const ECHO_LEN: usize = 64;
pub const MEMBERSHIP_ID_LEN: usize = 16;

/// Reply to `DeviceGetService`. A port of 0 means the service is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateService {
    pub service: u8,
    pub port: u32,
}

impl StateService {
    /// Service number for UDP.
    pub const UDP: u8 = 1;
}

impl PayloadCodec for StateService {
    const WIRE_SIZE: usize = 5;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_u8(self.service);
        writer.put_u32(self.port);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            service: reader.read_u8()?,
            port: reader.read_u32()?,
        })
    }
}

/// Radio statistics shared by the host and wifi info replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalInfo {
    /// Radio receive signal strength in milliwatts.
    pub signal: f32,
    pub tx: u32,
    pub rx: u32,
    pub reserved: i16,
}

impl PayloadCodec for SignalInfo {
    const WIRE_SIZE: usize = 14;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_f32(self.signal);
        writer.put_u32(self.tx);
        writer.put_u32(self.rx);
        writer.put_i16(self.reserved);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            signal: reader.read_f32()?,
            tx: reader.read_u32()?,
            rx: reader.read_u32()?,
            reserved: reader.read_i16()?,
        })
    }
}

/// Firmware build stamp and version, for host and wifi firmware replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FirmwareInfo {
    /// Build time in nanoseconds since the UNIX epoch.
    #[serde(serialize_with = "common::serialize_nanos_time")]
    pub build: u64,
    pub reserved: u64,
    pub version: u32,
}

impl FirmwareInfo {
    pub fn build_time(&self) -> Option<OffsetDateTime> {
        common::nanos_to_datetime(self.build)
    }
}

impl PayloadCodec for FirmwareInfo {
    const WIRE_SIZE: usize = 20;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_u64(self.build);
        writer.put_u64(self.reserved);
        writer.put_u32(self.version);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            build: reader.read_u64()?,
            reserved: reader.read_u64()?,
            version: reader.read_u32()?,
        })
    }
}

/// Power level body for device and light power messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PowerLevel {
    pub level: u16,
}

impl PowerLevel {
    pub const OFF: PowerLevel = PowerLevel { level: 0 };
    pub const ON: PowerLevel = PowerLevel { level: u16::MAX };

    /// Any non-zero level counts as on.
    pub fn is_on(&self) -> bool {
        self.level != 0
    }
}

impl PayloadCodec for PowerLevel {
    const WIRE_SIZE: usize = 2;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_u16(self.level);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            level: reader.read_u16()?,
        })
    }
}

/// Body of `DeviceSetLabel` and `DeviceStateLabel`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateLabel {
    pub label: Label,
}

impl StateLabel {
    pub fn new(text: &str) -> Result<Self> {
        Ok(Self {
            label: Label::new(text)?,
        })
    }
}

impl PayloadCodec for StateLabel {
    const WIRE_SIZE: usize = LABEL_LEN;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_slice(self.label.as_bytes());
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            label: Label::from_raw(reader.read_array()?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateVersion {
    pub vendor: u32,
    pub product: u32,
    pub version: u32,
}

impl PayloadCodec for StateVersion {
    const WIRE_SIZE: usize = 12;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_u32(self.vendor);
        writer.put_u32(self.product);
        writer.put_u32(self.version);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            vendor: reader.read_u32()?,
            product: reader.read_u32()?,
            version: reader.read_u32()?,
        })
    }
}

/// Device clock and run-time counters, all in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateInfo {
    #[serde(serialize_with = "common::serialize_nanos_time")]
    pub time: u64,
    pub uptime: u64,
    pub downtime: u64,
}

impl StateInfo {
    pub fn current_time(&self) -> Option<OffsetDateTime> {
        common::nanos_to_datetime(self.time)
    }
}

impl PayloadCodec for StateInfo {
    const WIRE_SIZE: usize = 24;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_u64(self.time);
        writer.put_u64(self.uptime);
        writer.put_u64(self.downtime);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            time: reader.read_u64()?,
            uptime: reader.read_u64()?,
            downtime: reader.read_u64()?,
        })
    }
}

/// Location or group membership: an opaque id, a label and when it changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Membership {
    #[serde(serialize_with = "common::serialize_hex")]
    pub id: [u8; MEMBERSHIP_ID_LEN],
    pub label: Label,
    #[serde(serialize_with = "common::serialize_nanos_time")]
    pub updated_at: u64,
}

impl Membership {
    pub fn updated_time(&self) -> Option<OffsetDateTime> {
        common::nanos_to_datetime(self.updated_at)
    }
}

impl PayloadCodec for Membership {
    const WIRE_SIZE: usize = MEMBERSHIP_ID_LEN + LABEL_LEN + 8;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_slice(&self.id);
        writer.put_slice(self.label.as_bytes());
        writer.put_u64(self.updated_at);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            id: reader.read_array()?,
            label: Label::from_raw(reader.read_array()?),
            updated_at: reader.read_u64()?,
        })
    }
}

/// Echo request/response body: 64 opaque bytes returned verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Echo {
    #[serde(serialize_with = "common::serialize_hex")]
    pub payload: [u8; ECHO_LEN],
}

impl Echo {
    /// Copy up to 64 bytes, zero-padding the rest.
    pub fn truncated(bytes: &[u8]) -> Self {
        Self {
            payload: common::copy_truncated(bytes),
        }
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self {
            payload: [0; ECHO_LEN],
        }
    }
}

impl PayloadCodec for Echo {
    const WIRE_SIZE: usize = ECHO_LEN;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        writer.put_slice(&self.payload);
        Ok(())
    }

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            payload: reader.read_array()?,
        })
    }
}
