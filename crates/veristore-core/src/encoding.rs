//! Compact self-describing text encoding for cryptographic artifacts.
//!
//! Every artifact (identifier, nonce, public key, signature) travels as a
//! short text token: the raw bytes are left-padded with zero byte(s) to a
//! multiple of 3, base64url-encoded, and the leading 1-2 characters are
//! overwritten with a fixed code naming the artifact type and algorithm.
//! The code alone is enough to interpret the remaining payload.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;

use crate::error::EncodingError;

/// Placeholder stamped into `id` (and, at genesis, `prefix`) while hashing.
///
/// Same character length as an encoded 256-bit identifier, so the serialized
/// record has identical byte length whether the field holds the placeholder
/// or the real value.
pub const ADDRESS_PLACEHOLDER: &str = "############################################";

/// Artifact type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// Self-addressing identifier, Blake3-256 digest.
    Blake3Address,
    /// 128-bit random nonce/salt.
    Nonce128,
    /// Ed25519 public key.
    Ed25519PublicKey,
    /// Ed25519 signature.
    Ed25519Signature,
}

impl Code {
    /// The leading character(s) of a token with this code.
    pub const fn text(self) -> &'static str {
        match self {
            Code::Blake3Address => "E",
            Code::Nonce128 => "0A",
            Code::Ed25519PublicKey => "B",
            Code::Ed25519Signature => "0B",
        }
    }

    /// Number of leading zero pad bytes before the raw material.
    pub const fn pad(self) -> usize {
        match self {
            Code::Blake3Address | Code::Ed25519PublicKey => 1,
            Code::Nonce128 | Code::Ed25519Signature => 2,
        }
    }

    /// Length of the raw material in bytes.
    pub const fn raw_len(self) -> usize {
        match self {
            Code::Blake3Address | Code::Ed25519PublicKey => 32,
            Code::Nonce128 => 16,
            Code::Ed25519Signature => 64,
        }
    }

    /// Length of the full encoded token in characters.
    pub const fn token_len(self) -> usize {
        (self.raw_len() + self.pad()) / 3 * 4
    }

    /// Identify the code from a token's leading characters.
    pub fn from_token(token: &str) -> Result<Self, EncodingError> {
        if token.starts_with("0A") {
            Ok(Code::Nonce128)
        } else if token.starts_with("0B") {
            Ok(Code::Ed25519Signature)
        } else if token.starts_with('E') {
            Ok(Code::Blake3Address)
        } else if token.starts_with('B') {
            Ok(Code::Ed25519PublicKey)
        } else {
            Err(EncodingError::UnknownCode(token.chars().take(2).collect()))
        }
    }
}

/// Encode raw material as a self-describing token.
pub fn encode(code: Code, raw: &[u8]) -> Result<String, EncodingError> {
    if raw.len() != code.raw_len() {
        return Err(EncodingError::RawLength {
            expected: code.raw_len(),
            got: raw.len(),
        });
    }

    let mut padded = vec![0u8; code.pad()];
    padded.extend_from_slice(raw);

    // Padded length is a multiple of 3, so no '=' appears and the pad
    // byte(s) occupy exactly the characters the code overwrites.
    let mut token = URL_SAFE.encode(&padded);
    token.replace_range(..code.text().len(), code.text());

    Ok(token)
}

/// Decode a token back into its code and raw material.
pub fn decode(token: &str) -> Result<(Code, Vec<u8>), EncodingError> {
    let code = Code::from_token(token)?;
    if token.len() != code.token_len() {
        return Err(EncodingError::TokenLength {
            expected: code.token_len(),
            got: token.len(),
        });
    }

    // Restore the characters the code displaced; they carried zero bits.
    let mut b64 = String::with_capacity(token.len());
    for _ in 0..code.text().len() {
        b64.push('A');
    }
    b64.push_str(&token[code.text().len()..]);

    let padded = URL_SAFE
        .decode(b64.as_bytes())
        .map_err(|e| EncodingError::Base64(e.to_string()))?;

    Ok((code, padded[code.pad()..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_token_shape() {
        let token = encode(Code::Blake3Address, &[0xab; 32]).unwrap();
        assert_eq!(token.len(), 44);
        assert!(token.starts_with('E'));
        assert_eq!(token.len(), ADDRESS_PLACEHOLDER.len());
    }

    #[test]
    fn test_roundtrip_all_codes() {
        for (code, len) in [
            (Code::Blake3Address, 32),
            (Code::Nonce128, 16),
            (Code::Ed25519PublicKey, 32),
            (Code::Ed25519Signature, 64),
        ] {
            let raw: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let token = encode(code, &raw).unwrap();
            assert_eq!(token.len(), code.token_len());
            let (decoded_code, decoded_raw) = decode(&token).unwrap();
            assert_eq!(decoded_code, code);
            assert_eq!(decoded_raw, raw);
        }
    }

    #[test]
    fn test_reject_wrong_raw_length() {
        assert!(matches!(
            encode(Code::Blake3Address, &[0u8; 16]),
            Err(EncodingError::RawLength { expected: 32, got: 16 })
        ));
    }

    #[test]
    fn test_reject_unknown_code() {
        assert!(matches!(
            decode("Zabc"),
            Err(EncodingError::UnknownCode(_))
        ));
    }

    #[test]
    fn test_reject_truncated_token() {
        let token = encode(Code::Nonce128, &[0u8; 16]).unwrap();
        assert!(matches!(
            decode(&token[..token.len() - 4]),
            Err(EncodingError::TokenLength { .. })
        ));
    }

    #[test]
    fn test_fixed_nonce_token_decodes() {
        // The all-zeroes test nonce used throughout the reference vectors.
        let (code, raw) = decode("0A0000000000000000000000").unwrap();
        assert_eq!(code, Code::Nonce128);
        assert_eq!(raw.len(), 16);
    }
}
