use std::fmt;

use serde::Serialize;

/// Label reported for codes outside the table.
pub const UNKNOWN_TYPE_NAME: &str = "UnknownType";

macro_rules! message_types {
    ($($name:ident = $code:literal,)+) => {
        /// Message type codes carried in the protocol header.
        ///
        /// Codes are fixed by the protocol and must never be renumbered.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u16)]
        pub enum MessageType {
            $($name = $code,)+
        }

        impl MessageType {
            pub const ALL: &'static [MessageType] = &[$(MessageType::$name,)+];

            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(MessageType::$name),)+
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(MessageType::$name => stringify!($name),)+
                }
            }
        }
    };
}

message_types! {
    DeviceGetService = 2,
    DeviceStateService = 3,
    DeviceGetHostInfo = 12,
    DeviceStateHostInfo = 13,
    DeviceGetHostFirmware = 14,
    DeviceStateHostFirmware = 15,
    DeviceGetWifiInfo = 16,
    DeviceStateWifiInfo = 17,
    DeviceGetWifiFirmware = 18,
    DeviceStateWifiFirmware = 19,
    DeviceGetPower = 20,
    DeviceSetPower = 21,
    DeviceStatePower = 22,
    DeviceGetLabel = 23,
    DeviceSetLabel = 24,
    DeviceStateLabel = 25,
    DeviceGetVersion = 32,
    DeviceStateVersion = 33,
    DeviceGetInfo = 34,
    DeviceStateInfo = 35,
    DeviceAcknowledgement = 45,
    DeviceGetLocation = 48,
    DeviceStateLocation = 50,
    DeviceGetGroup = 51,
    DeviceStateGroup = 53,
    DeviceEchoRequest = 58,
    DeviceEchoResponse = 59,
    LightGet = 101,
    LightSetColor = 102,
    LightState = 107,
    LightGetPower = 116,
    LightSetPower = 117,
    LightStatePower = 118,
}

impl MessageType {
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Light messages live in their own code range above the device range.
    pub fn is_light(self) -> bool {
        self.code() >= MessageType::LightGet.code()
    }
}

/// Diagnostic name for a raw code; unknown codes map to `"UnknownType"`.
pub fn type_name(code: u16) -> &'static str {
    MessageType::from_code(code)
        .map(MessageType::name)
        .unwrap_or(UNKNOWN_TYPE_NAME)
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MessageType> for u16 {
    fn from(value: MessageType) -> Self {
        value.code()
    }
}
