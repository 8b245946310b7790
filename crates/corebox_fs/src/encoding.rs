use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use corebox_base::{CoreboxError, CoreboxResult};

/// Text codec used to turn file bytes into text and back.
///
/// `Hex` and `Base64` are binary-to-text codecs: loading produces the encoded
/// form of the file bytes, saving decodes the given text into the bytes written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Latin1,
    Ascii,
    Hex,
    Base64,
}

impl Encoding {
    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Latin1 => "latin1",
            Encoding::Ascii => "ascii",
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
        }
    }

    /// Decodes file bytes into text.
    ///
    /// Only UTF-8 can fail: invalid sequences are reported as `InvalidData`.
    pub fn decode(self, bytes: Vec<u8>) -> std::io::Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            Encoding::Utf16Le => {
                // A trailing odd byte is not a complete code unit and is dropped
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                Ok(String::from_utf16_lossy(&units))
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Ascii => Ok(bytes.iter().map(|&b| char::from(b & 0x7f)).collect()),
            Encoding::Hex => Ok(hex::encode(bytes)),
            Encoding::Base64 => Ok(STANDARD.encode(bytes)),
        }
    }

    /// Encodes text into the bytes to write.
    ///
    /// `Latin1` and `Ascii` keep the low byte of every UTF-16 code unit.
    pub fn encode(self, text: &str) -> CoreboxResult<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Encoding::Latin1 | Encoding::Ascii => {
                Ok(text.encode_utf16().map(|unit| unit as u8).collect())
            }
            Encoding::Hex => hex::decode(text).map_err(|e| {
                Box::new(CoreboxError::invalid_argument(format!(
                    "content is not valid hex: {}",
                    e
                )))
            }),
            Encoding::Base64 => STANDARD.decode(text).map_err(|e| {
                Box::new(CoreboxError::invalid_argument(format!(
                    "content is not valid base64: {}",
                    e
                )))
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Box<CoreboxError>;

    fn from_str(name: &str) -> CoreboxResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-16le" | "utf16le" | "ucs2" | "ucs-2" => Ok(Encoding::Utf16Le),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            "ascii" => Ok(Encoding::Ascii),
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            _ => Err(Box::new(CoreboxError::invalid_argument(format!(
                "unknown encoding '{}'",
                name
            )))),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = Box<CoreboxError>;

    fn try_from(name: String) -> CoreboxResult<Self> {
        name.parse()
    }
}
