use serde::{Deserialize, Serialize};

use crate::error::{Result, WkError};

/// Byte order of a WKB geometry, as given by its leading byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    BigEndian,
    #[default]
    LittleEndian,
}

impl Endianness {
    /// The byte order of the host.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::BigEndian
        } else {
            Endianness::LittleEndian
        }
    }
}

impl TryFrom<u8> for Endianness {
    type Error = WkError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Endianness::BigEndian),
            1 => Ok(Endianness::LittleEndian),
            _ => Err(WkError::WkbParse(format!(
                "Unexpected byte order: {value}"
            ))),
        }
    }
}

impl From<Endianness> for u8 {
    fn from(value: Endianness) -> Self {
        use Endianness::*;
        match value {
            BigEndian => 0,
            LittleEndian => 1,
        }
    }
}
