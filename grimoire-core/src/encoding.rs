//! Textual transport for binary values.
//!
//! Records arrive and proofs leave as hexadecimal strings. This codec is
//! used only at the system boundary (CLI input, proof JSON); the tree
//! itself never sees text.

use crate::error::Result;

/// Name of the codec, published in every proof's `Encoding` field.
pub const NAME: &str = "Hex";

/// Encode bytes as a lowercase hex string, two characters per byte.
pub fn encode_bytes(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into bytes.
///
/// Odd-length input and non-hex digits are rejected. Uppercase digits
/// are accepted on input; output is always lowercase.
pub fn decode_string(s: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(s)?)
}

/// Serde adapter: `Hash` as a hex string.
pub mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::hash::Hash;

    pub fn serialize<S: Serializer>(hash: &Hash, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&hash.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Hash, D::Error> {
        let s = String::deserialize(d)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: optional byte payload as a hex string or null.
pub mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        s: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => s.serialize_some(&super::encode_bytes(b)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<Vec<u8>>, D::Error> {
        let opt = Option::<String>::deserialize(d)?;
        match opt {
            Some(s) => super::decode_string(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
