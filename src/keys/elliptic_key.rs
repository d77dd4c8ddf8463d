use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};
use crate::keys::asn1::{EcPrivateKeyRecord, PkixPublicKey, EC_PRIVATE_KEY_VERSION, OID_EC_PUBLIC_KEY, OID_SECP256K1};
use crate::keys::pem_reader::PemBlock;
use crate::keys::pem_writer::encode_pem;
use crate::keys::{KeyError, Signature, LABEL_EC_PRIVATE, LABEL_PUBLIC};

const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

lazy_static! {
    pub static ref CURVE_ORDER: BigUint = BigUint::from_bytes_be(&SECP256K1_ORDER);
}

/// Byte width of an encoded private scalar.
pub fn scalar_width() -> usize {
    ((CURVE_ORDER.bits() + 7) / 8) as usize
}

/// secp256k1 private key with both PEM forms computed up front.
#[derive(Debug, Clone)]
pub struct EllipticKey {
    key: SigningKey,
    private_pem: String,
    public_pem: String,
}

impl EllipticKey {
    pub fn generate() -> Result<Self, KeyError> {
        let key = SigningKey::random(&mut rand::thread_rng());
        Self::from_key(key)
    }

    /// Parse an `EC PRIVATE KEY` block.
    ///
    /// The scalar must lie in `1..n`. Any public point stored in the record
    /// is ignored and recomputed from the scalar. Both cached PEMs are
    /// re-encoded from the parsed key, so `private_pem()` is the canonical
    /// form of `pem` rather than the text as given.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let block = PemBlock::decode_labeled(pem, LABEL_EC_PRIVATE)?;
        let record = EcPrivateKeyRecord::from_der_bytes(&block.contents)?;
        if record.version != EC_PRIVATE_KEY_VERSION {
            return Err(KeyError::UnknownVersion(i64::from(record.version)));
        }
        if let Some(oid) = &record.named_curve {
            if *oid != OID_SECP256K1 {
                return Err(KeyError::Parse(format!("unsupported elliptic curve {}", oid)));
            }
        }
        let octets = record.private_key.as_bytes();
        let d = BigUint::from_bytes_be(octets);
        if d >= *CURVE_ORDER || d.is_zero() {
            return Err(KeyError::InvalidCurveValue);
        }
        let scalar = fixed_width(octets)?;
        let key = SigningKey::from_slice(&scalar).map_err(|_| KeyError::InvalidCurveValue)?;
        Self::from_key(key)
    }

    fn from_key(key: SigningKey) -> Result<Self, KeyError> {
        let point = key.verifying_key().to_encoded_point(false).as_bytes().to_vec();
        let record = EcPrivateKeyRecord::new(&key.to_bytes(), Some(point.as_slice()))?;
        Ok(Self {
            private_pem: encode_pem(LABEL_EC_PRIVATE, &record.to_der_bytes()?),
            public_pem: encode_pem(LABEL_PUBLIC, &PkixPublicKey::secp256k1(&point)?.to_der_bytes()?),
            key,
        })
    }

    /// Produces low-S DER signatures.
    pub fn sign(&self, data: &[u8]) -> Result<Signature, KeyError> {
        let digest = Sha256::digest(data).to_vec();
        let sig: EcdsaSignature = self.key.sign_prehash(&digest)
            .map_err(|e| KeyError::Sign(e.to_string()))?;
        let bytes = sig.to_der().as_bytes().to_vec();
        if !verify_der(self.key.verifying_key(), &bytes, &digest) {
            return Err(KeyError::Verification("ecdsa self-check rejected the signature".to_string()));
        }
        Ok(Signature { bytes, digest })
    }

    pub fn verify(&self, signature: &[u8], digest: &[u8]) -> bool {
        verify_der(self.key.verifying_key(), signature, digest)
    }

    /// Verify against a `PUBLIC KEY` PEM carrying an id-ecPublicKey / secp256k1 point.
    pub fn verify_with_pem(signature: &[u8], digest: &[u8], public_pem: &str) -> Result<bool, KeyError> {
        let public = public_from_pem(public_pem)?;
        Ok(verify_der(&public, signature, digest))
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    /// Uncompressed SEC1 point, `0x04 || X || Y`.
    pub fn public_point(&self) -> Vec<u8> {
        self.key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
    }

    pub fn private_pem(&self) -> &str {
        &self.private_pem
    }

    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }
}

/// Left-pad to [`scalar_width`], dropping surplus leading zero bytes.
fn fixed_width(octets: &[u8]) -> Result<Vec<u8>, KeyError> {
    let width = scalar_width();
    let mut octets = octets;
    while octets.len() > width {
        if octets[0] != 0 {
            return Err(KeyError::InvalidKeyLength);
        }
        octets = &octets[1..];
    }
    let mut out = vec![0u8; width];
    out[width - octets.len()..].copy_from_slice(octets);
    Ok(out)
}

fn public_from_pem(pem: &str) -> Result<VerifyingKey, KeyError> {
    let block = PemBlock::decode_labeled(pem, LABEL_PUBLIC)?;
    let record = PkixPublicKey::from_der_bytes(&block.contents)?;
    if record.algorithm.algorithm != OID_EC_PUBLIC_KEY {
        return Err(KeyError::Parse(format!("not an elliptic curve public key: {}", record.algorithm.algorithm)));
    }
    if let Some(oid) = &record.algorithm.parameters {
        if *oid != OID_SECP256K1 {
            return Err(KeyError::Parse(format!("unsupported elliptic curve {}", oid)));
        }
    }
    let point = record.public_key.as_bytes()
        .ok_or_else(|| KeyError::Parse("public key bit string is not byte aligned".to_string()))?;
    VerifyingKey::from_sec1_bytes(point)
        .map_err(|_| KeyError::Parse("invalid curve point".to_string()))
}

/// Other signers may leave `s` in the upper half, so it is normalized before checking.
fn verify_der(key: &VerifyingKey, signature: &[u8], digest: &[u8]) -> bool {
    match EcdsaSignature::from_der(signature) {
        Ok(sig) => {
            let sig = sig.normalize_s().unwrap_or(sig);
            key.verify_prehash(digest, &sig).is_ok()
        }
        Err(_) => false,
    }
}
