pub mod asn1;
pub mod pem_reader;
pub mod pem_writer;
pub mod rsa_key;
pub mod elliptic_key;
pub mod key_pair;
pub mod batch;

pub use pem_reader::*;
pub use rsa_key::*;
pub use elliptic_key::*;
pub use key_pair::*;
pub use batch::*;

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use k256::ecdsa::SigningKey;
use rsa::RsaPrivateKey;
use crate::config::silent;

const BASE64_SPLIT: usize = 64;

pub const LABEL_RSA_PRIVATE: &str = "RSA PRIVATE KEY";
pub const LABEL_EC_PRIVATE: &str = "EC PRIVATE KEY";
pub const LABEL_PUBLIC: &str = "PUBLIC KEY";

pub enum KeyError {
    /// PEM framing missing or carrying the wrong label.
    Decode(String),
    /// DER payload malformed.
    Parse(String),
    UnknownVersion(i64),
    InvalidCurveValue,
    InvalidKeyLength,
    /// A freshly produced signature failed its own check.
    Verification(String),
    UnknownKeyType(String),
    Generate(String),
    /// The signing backend refused the digest.
    Sign(String),
}

impl KeyError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyError::Decode(msg) => write!(f, "failed to decode pem: {}", msg),
            KeyError::Parse(msg) => write!(f, "failed to parse key data: {}", msg),
            KeyError::UnknownVersion(v) => write!(f, "unknown EC private key version {}", v),
            KeyError::InvalidCurveValue => write!(f, "invalid elliptic curve private key value"),
            KeyError::InvalidKeyLength => write!(f, "invalid private key length"),
            KeyError::Verification(msg) => write!(f, "signature verification failed: {}", msg),
            KeyError::UnknownKeyType(t) => write!(f, "unknown key type `{}', available: rsa, elliptic", t),
            KeyError::Generate(msg) => write!(f, "key generation failed: {}", msg),
            KeyError::Sign(msg) => write!(f, "signing failed: {}", msg),
        }
    }
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for KeyError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Rsa,
    Elliptic,
}

impl KeyType {
    /// Tag used by the ledger in identity documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "rsa",
            KeyType::Elliptic => "elliptic",
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rsa" => Ok(KeyType::Rsa),
            "elliptic" => Ok(KeyType::Elliptic),
            _ => Err(KeyError::UnknownKeyType(s.to_string())),
        }
    }
}

/// Signature bytes together with the SHA-256 digest they were made over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub bytes: Vec<u8>,
    pub digest: Vec<u8>,
}

impl Signature {
    pub fn to_base64(&self) -> String {
        base64::encode(&self.bytes)
    }
}

/// Borrowed view of the key material behind a [`Key`].
#[derive(Debug, Clone, Copy)]
pub enum BackendKey<'a> {
    Rsa(&'a RsaPrivateKey),
    Elliptic(&'a SigningKey),
}

/// A private key of either supported kind.
///
/// Built by generation or from a private PEM, never changed afterwards.
#[derive(Debug, Clone)]
pub enum Key {
    Rsa(RsaKey),
    Elliptic(EllipticKey),
}

impl Key {
    pub fn generate_rsa() -> Result<Key, KeyError> {
        Ok(Key::Rsa(RsaKey::generate()?))
    }

    pub fn generate_elliptic() -> Result<Key, KeyError> {
        Ok(Key::Elliptic(EllipticKey::generate()?))
    }

    pub fn generate(key_type: KeyType) -> Result<Key, KeyError> {
        match key_type {
            KeyType::Rsa => Key::generate_rsa(),
            KeyType::Elliptic => Key::generate_elliptic(),
        }
    }

    /// Rebuild a key from its private PEM. Backend errors pass through unchanged.
    pub fn from_pem(pem: &str, key_type: KeyType) -> Result<Key, KeyError> {
        match key_type {
            KeyType::Rsa => Ok(Key::Rsa(RsaKey::from_pem(pem)?)),
            KeyType::Elliptic => Ok(Key::Elliptic(EllipticKey::from_pem(pem)?)),
        }
    }

    /// Hash `data` with SHA-256 and sign the digest.
    ///
    /// The signature is checked against the key's own public half before it
    /// is returned; a failing check is reported as [`KeyError::Verification`].
    pub fn sign(&self, data: &[u8]) -> Result<Signature, KeyError> {
        let res = match self {
            Key::Rsa(k) => k.sign(data),
            Key::Elliptic(k) => k.sign(data),
        };
        if let Err(KeyError::Verification(msg)) = &res {
            if !silent() { eprintln!("{} key produced a signature it cannot verify: {}", self.key_type(), msg); }
        }
        res
    }

    pub fn verify(&self, signature: &[u8], digest: &[u8]) -> bool {
        match self {
            Key::Rsa(k) => k.verify(signature, digest),
            Key::Elliptic(k) => k.verify(signature, digest),
        }
    }

    /// Verify against someone else's public PEM without building a [`Key`].
    pub fn verify_with_pem(signature: &[u8], digest: &[u8], public_pem: &str, key_type: KeyType) -> Result<bool, KeyError> {
        match key_type {
            KeyType::Rsa => RsaKey::verify_with_pem(signature, digest, public_pem),
            KeyType::Elliptic => EllipticKey::verify_with_pem(signature, digest, public_pem),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            Key::Rsa(_) => KeyType::Rsa,
            Key::Elliptic(_) => KeyType::Elliptic,
        }
    }

    pub fn private_pem(&self) -> &str {
        match self {
            Key::Rsa(k) => k.private_pem(),
            Key::Elliptic(k) => k.private_pem(),
        }
    }

    pub fn public_pem(&self) -> &str {
        match self {
            Key::Rsa(k) => k.public_pem(),
            Key::Elliptic(k) => k.public_pem(),
        }
    }

    pub fn backend(&self) -> BackendKey<'_> {
        match self {
            Key::Rsa(k) => BackendKey::Rsa(k.key()),
            Key::Elliptic(k) => BackendKey::Elliptic(k.key()),
        }
    }
}
