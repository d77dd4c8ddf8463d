//! DER records for the two elliptic key PEM blocks:
//!
//! ```text
//! ECPrivateKey ::= SEQUENCE {
//!     version        INTEGER (1),
//!     privateKey     OCTET STRING,
//!     parameters [0] EXPLICIT OBJECT IDENTIFIER OPTIONAL,
//!     publicKey  [1] EXPLICIT BIT STRING OPTIONAL }
//!
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm SEQUENCE { algorithm OBJECT IDENTIFIER, parameters OBJECT IDENTIFIER OPTIONAL },
//!     subjectPublicKey BIT STRING }
//! ```

use der::asn1::{BitString, ObjectIdentifier, OctetString};
use der::{Decode, Encode, Sequence};
use crate::keys::KeyError;

/// id-ecPublicKey
pub const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// secp256k1
pub const OID_SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

pub const EC_PRIVATE_KEY_VERSION: u8 = 1;

impl From<der::Error> for KeyError {
    fn from(e: der::Error) -> Self {
        KeyError::Parse(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Sequence)]
pub struct EcPrivateKeyRecord {
    pub version: u8,
    pub private_key: OctetString,
    #[asn1(context_specific = "0", optional = "true")]
    pub named_curve: Option<ObjectIdentifier>,
    #[asn1(context_specific = "1", optional = "true")]
    pub public_key: Option<BitString>,
}

impl EcPrivateKeyRecord {
    pub fn new(scalar: &[u8], public_point: Option<&[u8]>) -> Result<Self, KeyError> {
        Ok(Self {
            version: EC_PRIVATE_KEY_VERSION,
            private_key: OctetString::new(scalar)?,
            named_curve: Some(OID_SECP256K1),
            public_key: public_point.map(BitString::from_bytes).transpose()?,
        })
    }

    pub fn to_der_bytes(&self) -> Result<Vec<u8>, KeyError> {
        Ok(self.to_der()?)
    }

    pub fn from_der_bytes(data: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::from_der(data)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Sequence)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<ObjectIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Sequence)]
pub struct PkixPublicKey {
    pub algorithm: AlgorithmIdentifier,
    pub public_key: BitString,
}

impl PkixPublicKey {
    /// Named-curve EC public key over secp256k1.
    pub fn secp256k1(point: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            algorithm: AlgorithmIdentifier { algorithm: OID_EC_PUBLIC_KEY, parameters: Some(OID_SECP256K1) },
            public_key: BitString::from_bytes(point)?,
        })
    }

    pub fn to_der_bytes(&self) -> Result<Vec<u8>, KeyError> {
        Ok(self.to_der()?)
    }

    pub fn from_der_bytes(data: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::from_der(data)?)
    }
}
