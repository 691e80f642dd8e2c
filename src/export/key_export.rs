//! Public key exchange document
//!
//! Signers announce themselves to each other with a small JSON document:
//!
//! ```json
//! { "xfp": "73c5da0a", "name": "Alice", "pubkey": "03..." }
//! ```
//!
//! The same text is saved to file and fed to QR encoders, so it is always
//! valid UTF-8.

use crate::cosigner::{Fingerprint, LocalKey, Signer};
use crate::crypto::public_key_from_hex;
use crate::multisig::WalletError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyExport {
    /// Master key fingerprint
    pub xfp: Fingerprint,
    #[serde(default)]
    pub name: String,
    /// Compressed public key (hex)
    pub pubkey: String,
}

impl KeyExport {
    pub fn from_local_key(local: &LocalKey) -> Self {
        Self {
            xfp: local.fingerprint(),
            name: local.name().to_string(),
            pubkey: local.public_key_hex(),
        }
    }

    /// Encode as pretty-printed JSON bytes
    pub fn encode(&self) -> Result<Vec<u8>, WalletError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Encode as text for QR rendering
    pub fn to_text(&self) -> Result<String, WalletError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and verify an exchange document
    ///
    /// The fingerprint must match the one derived from the public key.
    pub fn parse(bytes: &[u8]) -> Result<Self, WalletError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| WalletError::ImportParseError(format!("not UTF-8: {}", e)))?;
        let doc: KeyExport = serde_json::from_str(text.trim())
            .map_err(|e| WalletError::ImportParseError(e.to_string()))?;

        let public_key = public_key_from_hex(&doc.pubkey)
            .map_err(|e| WalletError::ImportParseError(format!("pubkey: {}", e)))?;
        let derived = Fingerprint::from_public_key(&public_key);
        if derived != doc.xfp {
            return Err(WalletError::ImportParseError(format!(
                "fingerprint {} does not match public key (expected {})",
                doc.xfp, derived
            )));
        }

        Ok(Self {
            pubkey: hex::encode(public_key.serialize()),
            ..doc
        })
    }

    pub fn into_signer(self) -> Signer {
        Signer::with_public_key(self.xfp, &self.name, self.pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_key_round_trip() {
        let local = LocalKey::generate("Alice").unwrap();
        let bytes = KeyExport::from_local_key(&local).encode().unwrap();

        let signer = KeyExport::parse(&bytes).unwrap().into_signer();
        assert_eq!(signer, local.signer());
    }

    #[test]
    fn test_text_is_json() {
        let local = LocalKey::generate("").unwrap();
        let text = KeyExport::from_local_key(&local).to_text().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["xfp"], local.fingerprint().to_hex());
        assert_eq!(value["name"], "");
    }

    #[test]
    fn test_name_is_optional() {
        let local = LocalKey::generate("ignored").unwrap();
        let json = format!(
            r#"{{"xfp":"{}","pubkey":"{}"}}"#,
            local.fingerprint(),
            local.public_key_hex()
        );
        let doc = KeyExport::parse(json.as_bytes()).unwrap();
        assert_eq!(doc.name, "");
    }

    #[test]
    fn test_rejects_malformed_input() {
        let cases: [&[u8]; 5] = [
            b"\xff\xfe",
            b"not json",
            br#"{"xfp":"73c5da0a"}"#,
            br#"{"xfp":"73c5","pubkey":"02"}"#,
            br#"{"xfp":"73c5da0a","pubkey":"02abcdef"}"#,
        ];
        for input in cases {
            assert!(
                matches!(KeyExport::parse(input), Err(WalletError::ImportParseError(_))),
                "accepted {:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_rejects_fingerprint_mismatch() {
        let local = LocalKey::generate("").unwrap();
        let mut doc = KeyExport::from_local_key(&local);
        let mut bytes = *doc.xfp.as_bytes();
        bytes[0] ^= 0xff;
        doc.xfp = Fingerprint::from(bytes);

        let encoded = doc.encode().unwrap();
        assert!(matches!(
            KeyExport::parse(&encoded),
            Err(WalletError::ImportParseError(_))
        ));
    }
}
