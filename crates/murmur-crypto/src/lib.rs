// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use murmur_core::{SignError, Signer, VerifyError, Verifier};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("malformed key material: {0}")]
    Malformed(String),
}

/// An Ed25519 keypair, serialisable as hex for config files and CLI output.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a fresh keypair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_secret_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|e| KeyError::Malformed(e.to_string()))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| KeyError::Malformed("secret key must be 32 bytes".into()))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&array),
        })
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

/// `Signer` over a single local keypair, as used by a node signing its own
/// originated messages.
pub struct Ed25519Signer {
    keypair: Keypair,
}

impl Ed25519Signer {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl Signer for Ed25519Signer {
    async fn sign(&self, value: &[u8]) -> Result<Vec<u8>, SignError> {
        Ok(self.keypair.signing_key.sign(value).to_bytes().to_vec())
    }
}

/// `Verifier` that authenticates every incoming message against a single,
/// fixed public key — every node in the broadcast network shares one
/// originator identity (spec.md Open Question OQ1: the signature covers
/// `value` alone).
pub struct Ed25519Verifier {
    verifying_key: VerifyingKey,
}

impl Ed25519Verifier {
    pub fn new(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    pub fn from_public_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|e| KeyError::Malformed(e.to_string()))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| KeyError::Malformed("public key must be 32 bytes".into()))?;
        let verifying_key =
            VerifyingKey::from_bytes(&array).map_err(|e| KeyError::Malformed(e.to_string()))?;
        Ok(Self { verifying_key })
    }
}

#[async_trait]
impl Verifier for Ed25519Verifier {
    async fn verify(&self, value: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        let sig_bytes: [u8; 64] = signature
            .try_into()
            .map_err(|_| VerifyError::BadSignature)?;
        let signature = Signature::from_bytes(&sig_bytes);
        self.verifying_key
            .verify(value, &signature)
            .map_err(|_| VerifyError::BadSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_then_verify_round_trips() {
        let keypair = Keypair::generate();
        let verifying_key = keypair.verifying_key();
        let signer = Ed25519Signer::new(keypair);
        let verifier = Ed25519Verifier::new(verifying_key);

        let value = b"hello gossip";
        let signature = signer.sign(value).await.unwrap();

        verifier.verify(value, &signature).await.unwrap();
    }

    #[tokio::test]
    async fn tampered_value_fails_verification() {
        let keypair = Keypair::generate();
        let verifying_key = keypair.verifying_key();
        let signer = Ed25519Signer::new(keypair);
        let verifier = Ed25519Verifier::new(verifying_key);

        let signature = signer.sign(b"original").await.unwrap();

        let result = verifier.verify(b"tampered", &signature).await;
        assert!(matches!(result, Err(VerifyError::BadSignature)));
    }

    #[tokio::test]
    async fn wrong_signer_fails_verification() {
        let keypair = Keypair::generate();
        let signer = Ed25519Signer::new(keypair);
        let other_verifying_key = Keypair::generate().verifying_key();
        let verifier = Ed25519Verifier::new(other_verifying_key);

        let signature = signer.sign(b"hello").await.unwrap();

        let result = verifier.verify(b"hello", &signature).await;
        assert!(matches!(result, Err(VerifyError::BadSignature)));
    }

    #[test]
    fn secret_hex_round_trips_through_from_secret_hex() {
        let keypair = Keypair::generate();
        let hex_str = keypair.secret_hex();

        let restored = Keypair::from_secret_hex(&hex_str).unwrap();
        assert_eq!(restored.public_hex(), keypair.public_hex());
    }

    #[test]
    fn malformed_secret_hex_is_rejected() {
        let result = Keypair::from_secret_hex("not-hex");
        assert!(result.is_err());
    }
}
