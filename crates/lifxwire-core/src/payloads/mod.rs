//! Message bodies that follow the 36-byte header.
//!
//! Each body type implements [`PayloadCodec`]; [`Payload`] is the closed set
//! of bodies the decoder can produce plus an opaque [`Payload::Unknown`] for
//! encoding codes outside the registry.

mod common;
mod device;
mod light;

use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::protocol::{ByteOrder, Result, WireReader, WireWriter};

pub use common::{LABEL_LEN, Label, nanos_to_datetime};
pub use device::{
    Echo, FirmwareInfo, Membership, PowerLevel, SignalInfo, StateInfo, StateLabel, StateService,
    StateVersion,
};
pub use light::{Hsbk, LightState, SetColor, SetLightPower};

/// Fixed-size body codec.
///
/// `write_to` validates every range-limited field before writing, so a failed
/// encode leaves no partial output behind.
pub trait PayloadCodec: Sized {
    const WIRE_SIZE: usize;

    fn write_to(&self, writer: &mut WireWriter) -> Result<()>;

    fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self>;

    fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let mut writer = WireWriter::with_capacity(Self::WIRE_SIZE, order);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    fn decode<R: Read + ?Sized>(stream: &mut R, order: ByteOrder) -> Result<Self> {
        Self::read_from(&mut WireReader::new(stream, order))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Payload {
    /// Get requests and acknowledgements carry no body.
    Empty,
    StateService(StateService),
    HostInfo(SignalInfo),
    HostFirmware(FirmwareInfo),
    WifiInfo(SignalInfo),
    WifiFirmware(FirmwareInfo),
    Power(PowerLevel),
    Label(StateLabel),
    Version(StateVersion),
    Info(StateInfo),
    Location(Membership),
    Group(Membership),
    Echo(Echo),
    SetColor(SetColor),
    LightState(LightState),
    SetLightPower(SetLightPower),
    LightPower(PowerLevel),
    /// Raw body for a code the registry does not know. Never produced by
    /// decoding.
    Unknown(#[serde(serialize_with = "common::serialize_hex")] Vec<u8>),
}

impl Payload {
    pub fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        match self {
            Payload::Empty => Ok(Vec::new()),
            Payload::StateService(body) => body.encode(order),
            Payload::HostInfo(body) | Payload::WifiInfo(body) => body.encode(order),
            Payload::HostFirmware(body) | Payload::WifiFirmware(body) => body.encode(order),
            Payload::Power(body) | Payload::LightPower(body) => body.encode(order),
            Payload::Label(body) => body.encode(order),
            Payload::Version(body) => body.encode(order),
            Payload::Info(body) => body.encode(order),
            Payload::Location(body) | Payload::Group(body) => body.encode(order),
            Payload::Echo(body) => body.encode(order),
            Payload::SetColor(body) => body.encode(order),
            Payload::LightState(body) => body.encode(order),
            Payload::SetLightPower(body) => body.encode(order),
            Payload::Unknown(bytes) => Ok(bytes.clone()),
        }
    }

    /// Encoded body length in bytes.
    pub fn wire_size(&self) -> usize {
        match self {
            Payload::Empty => 0,
            Payload::StateService(_) => StateService::WIRE_SIZE,
            Payload::HostInfo(_) | Payload::WifiInfo(_) => SignalInfo::WIRE_SIZE,
            Payload::HostFirmware(_) | Payload::WifiFirmware(_) => FirmwareInfo::WIRE_SIZE,
            Payload::Power(_) | Payload::LightPower(_) => PowerLevel::WIRE_SIZE,
            Payload::Label(_) => StateLabel::WIRE_SIZE,
            Payload::Version(_) => StateVersion::WIRE_SIZE,
            Payload::Info(_) => StateInfo::WIRE_SIZE,
            Payload::Location(_) | Payload::Group(_) => Membership::WIRE_SIZE,
            Payload::Echo(_) => Echo::WIRE_SIZE,
            Payload::SetColor(_) => SetColor::WIRE_SIZE,
            Payload::LightState(_) => LightState::WIRE_SIZE,
            Payload::SetLightPower(_) => SetLightPower::WIRE_SIZE,
            Payload::Unknown(bytes) => bytes.len(),
        }
    }

    pub(crate) fn decode_empty(_stream: &mut dyn Read, _order: ByteOrder) -> Result<Self> {
        Ok(Payload::Empty)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => f.write_str("empty"),
            Payload::StateService(body) => write!(f, "service={} port={}", body.service, body.port),
            Payload::HostInfo(body) | Payload::WifiInfo(body) => {
                write!(f, "signal={} tx={} rx={}", body.signal, body.tx, body.rx)
            }
            Payload::HostFirmware(body) | Payload::WifiFirmware(body) => {
                write!(f, "build={} version={}", body.build, body.version)
            }
            Payload::Power(body) | Payload::LightPower(body) => write!(f, "level={}", body.level),
            Payload::Label(body) => write!(f, "label={:?}", body.label.to_text()),
            Payload::Version(body) => write!(
                f,
                "vendor={} product={} version={}",
                body.vendor, body.product, body.version
            ),
            Payload::Info(body) => write!(
                f,
                "time={} uptime={} downtime={}",
                body.time, body.uptime, body.downtime
            ),
            Payload::Location(body) | Payload::Group(body) => write!(
                f,
                "id={} label={:?} updated_at={}",
                common::hex_string(&body.id),
                body.label.to_text(),
                body.updated_at
            ),
            Payload::Echo(body) => write!(f, "echo={}", common::hex_string(&body.payload)),
            Payload::SetColor(body) => write!(
                f,
                "color={} duration={}ms",
                hsbk(&body.color),
                body.duration.as_millis()
            ),
            Payload::LightState(body) => write!(
                f,
                "color={} power={} label={:?}",
                hsbk(&body.color),
                body.power,
                body.label.to_text()
            ),
            Payload::SetLightPower(body) => {
                write!(f, "level={} duration={}ms", body.level, body.duration.as_millis())
            }
            Payload::Unknown(bytes) => write!(f, "unknown len={}", bytes.len()),
        }
    }
}

fn hsbk(color: &Hsbk) -> String {
    format!(
        "{}/{}/{}/{}K",
        color.hue, color.saturation, color.brightness, color.kelvin
    )
}
