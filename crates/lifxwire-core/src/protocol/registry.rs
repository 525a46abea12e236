use std::io::Read;

use super::byte_order::ByteOrder;
use super::error::Result;
use super::message_type::MessageType;
use crate::payloads::{
    Echo, FirmwareInfo, LightState, Membership, Payload, PayloadCodec, PowerLevel, SetColor,
    SetLightPower, SignalInfo, StateInfo, StateLabel, StateService, StateVersion,
};

/// Decodes a payload body of one message type from the stream.
pub type PayloadDecoder = fn(&mut dyn Read, ByteOrder) -> Result<Payload>;

macro_rules! decoder {
    ($body:ty => $variant:path) => {{
        fn decode(stream: &mut dyn Read, order: ByteOrder) -> Result<Payload> {
            <$body as PayloadCodec>::decode(stream, order).map($variant)
        }
        decode as PayloadDecoder
    }};
}

const EMPTY: PayloadDecoder = Payload::decode_empty;

/// Message type to payload decoder. Built at compile time and never mutated.
pub static REGISTRY: &[(MessageType, PayloadDecoder)] = &[
    (MessageType::DeviceGetService, EMPTY),
    (
        MessageType::DeviceStateService,
        decoder!(StateService => Payload::StateService),
    ),
    (MessageType::DeviceGetHostInfo, EMPTY),
    (
        MessageType::DeviceStateHostInfo,
        decoder!(SignalInfo => Payload::HostInfo),
    ),
    (MessageType::DeviceGetHostFirmware, EMPTY),
    (
        MessageType::DeviceStateHostFirmware,
        decoder!(FirmwareInfo => Payload::HostFirmware),
    ),
    (MessageType::DeviceGetWifiInfo, EMPTY),
    (
        MessageType::DeviceStateWifiInfo,
        decoder!(SignalInfo => Payload::WifiInfo),
    ),
    (MessageType::DeviceGetWifiFirmware, EMPTY),
    (
        MessageType::DeviceStateWifiFirmware,
        decoder!(FirmwareInfo => Payload::WifiFirmware),
    ),
    (MessageType::DeviceGetPower, EMPTY),
    (MessageType::DeviceSetPower, decoder!(PowerLevel => Payload::Power)),
    (MessageType::DeviceStatePower, decoder!(PowerLevel => Payload::Power)),
    (MessageType::DeviceGetLabel, EMPTY),
    (MessageType::DeviceSetLabel, decoder!(StateLabel => Payload::Label)),
    (MessageType::DeviceStateLabel, decoder!(StateLabel => Payload::Label)),
    (MessageType::DeviceGetVersion, EMPTY),
    (
        MessageType::DeviceStateVersion,
        decoder!(StateVersion => Payload::Version),
    ),
    (MessageType::DeviceGetInfo, EMPTY),
    (MessageType::DeviceStateInfo, decoder!(StateInfo => Payload::Info)),
    (MessageType::DeviceAcknowledgement, EMPTY),
    (MessageType::DeviceGetLocation, EMPTY),
    (
        MessageType::DeviceStateLocation,
        decoder!(Membership => Payload::Location),
    ),
    (MessageType::DeviceGetGroup, EMPTY),
    (MessageType::DeviceStateGroup, decoder!(Membership => Payload::Group)),
    (MessageType::DeviceEchoRequest, decoder!(Echo => Payload::Echo)),
    (MessageType::DeviceEchoResponse, decoder!(Echo => Payload::Echo)),
    (MessageType::LightGet, EMPTY),
    (MessageType::LightSetColor, decoder!(SetColor => Payload::SetColor)),
    (MessageType::LightState, decoder!(LightState => Payload::LightState)),
    (MessageType::LightGetPower, EMPTY),
    (
        MessageType::LightSetPower,
        decoder!(SetLightPower => Payload::SetLightPower),
    ),
    (
        MessageType::LightStatePower,
        decoder!(PowerLevel => Payload::LightPower),
    ),
];

/// Decoder registered for a raw message type code.
pub fn lookup(code: u16) -> Option<PayloadDecoder> {
    REGISTRY
        .iter()
        .find(|(message_type, _)| message_type.code() == code)
        .map(|&(_, decoder)| decoder)
}

/// Message types whose registered decoder yields this payload variant.
fn message_types_for(payload: &Payload) -> &'static [MessageType] {
    use MessageType as M;
    match payload {
        Payload::Empty => &[
            M::DeviceGetService,
            M::DeviceGetHostInfo,
            M::DeviceGetHostFirmware,
            M::DeviceGetWifiInfo,
            M::DeviceGetWifiFirmware,
            M::DeviceGetPower,
            M::DeviceGetLabel,
            M::DeviceGetVersion,
            M::DeviceGetInfo,
            M::DeviceAcknowledgement,
            M::DeviceGetLocation,
            M::DeviceGetGroup,
            M::LightGet,
            M::LightGetPower,
        ],
        Payload::StateService(_) => &[M::DeviceStateService],
        Payload::HostInfo(_) => &[M::DeviceStateHostInfo],
        Payload::HostFirmware(_) => &[M::DeviceStateHostFirmware],
        Payload::WifiInfo(_) => &[M::DeviceStateWifiInfo],
        Payload::WifiFirmware(_) => &[M::DeviceStateWifiFirmware],
        Payload::Power(_) => &[M::DeviceSetPower, M::DeviceStatePower],
        Payload::Label(_) => &[M::DeviceSetLabel, M::DeviceStateLabel],
        Payload::Version(_) => &[M::DeviceStateVersion],
        Payload::Info(_) => &[M::DeviceStateInfo],
        Payload::Location(_) => &[M::DeviceStateLocation],
        Payload::Group(_) => &[M::DeviceStateGroup],
        Payload::Echo(_) => &[M::DeviceEchoRequest, M::DeviceEchoResponse],
        Payload::SetColor(_) => &[M::LightSetColor],
        Payload::LightState(_) => &[M::LightState],
        Payload::SetLightPower(_) => &[M::LightSetPower],
        Payload::LightPower(_) => &[M::LightStatePower],
        Payload::Unknown(_) => &[],
    }
}

/// Whether decoding `code` can give back `payload`.
///
/// Registered codes accept only their own body; `Payload::Unknown` is
/// accepted only for codes with no registered decoder.
pub fn accepts(code: u16, payload: &Payload) -> bool {
    match payload {
        Payload::Unknown(_) => lookup(code).is_none(),
        body => message_types_for(body)
            .iter()
            .any(|message| message.code() == code),
    }
}
