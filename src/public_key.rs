//! Public key encodings carried in DNSKEY RDATA and signature verification
//! with *ring*.

use crate::algorithm::{DnssecAlgorithm, KeyFamily};
use crate::error::{DnssecError, Result};
use hickory_proto::rr::RecordType;
use ring::signature;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// RFC 3110 encoding split into its big-endian components.
    Rsa { exponent: Vec<u8>, modulus: Vec<u8> },
    /// Uncompressed curve point `X | Y` without the SEC1 `0x04` prefix.
    Ecdsa(Vec<u8>),
    EdDsa(Vec<u8>),
}

impl PublicKey {
    pub fn from_dnskey_bytes(algorithm: DnssecAlgorithm, bytes: &[u8]) -> Result<Self> {
        match algorithm.family() {
            KeyFamily::Rsa => parse_rsa(bytes),
            KeyFamily::Ecdsa | KeyFamily::EdDsa => {
                let expected = algorithm.public_key_len().unwrap_or_default();
                if bytes.len() != expected {
                    return Err(DnssecError::invalid_rdata(
                        RecordType::DNSKEY,
                        format!(
                            "{} public key should span {} octets (got {})",
                            algorithm,
                            expected,
                            bytes.len()
                        ),
                    ));
                }
                Ok(match algorithm.family() {
                    KeyFamily::Ecdsa => PublicKey::Ecdsa(bytes.to_vec()),
                    _ => PublicKey::EdDsa(bytes.to_vec()),
                })
            }
        }
    }

    pub fn to_dnskey_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Rsa { exponent, modulus } => {
                let mut bytes = Vec::with_capacity(3 + exponent.len() + modulus.len());
                if exponent.len() < 256 {
                    bytes.push(exponent.len() as u8);
                } else {
                    bytes.push(0);
                    bytes.extend_from_slice(&(exponent.len() as u16).to_be_bytes());
                }
                bytes.extend_from_slice(exponent);
                bytes.extend_from_slice(modulus);
                bytes
            }
            PublicKey::Ecdsa(point) => point.clone(),
            PublicKey::EdDsa(key) => key.clone(),
        }
    }

    /// Check `signature` over `message`.
    ///
    /// `Ok(false)` means the signature is well-formed input that does not
    /// verify; `Err` means this key cannot be used with `algorithm` at all.
    #[allow(deprecated)]
    pub fn verify(&self, algorithm: DnssecAlgorithm, message: &[u8], sig: &[u8]) -> Result<bool> {
        let outcome = match (self, algorithm) {
            (PublicKey::Rsa { exponent, modulus }, _) => {
                let params = match algorithm {
                    DnssecAlgorithm::RsaSha1 | DnssecAlgorithm::RsaSha1Nsec3Sha1 => {
                        &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY
                    }
                    DnssecAlgorithm::RsaSha256 => {
                        &signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY
                    }
                    DnssecAlgorithm::RsaSha512 => {
                        &signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY
                    }
                    other => return Err(DnssecError::UnsupportedAlgorithm(other.into())),
                };
                let key = signature::RsaPublicKeyComponents {
                    n: modulus.as_slice(),
                    e: exponent.as_slice(),
                };
                key.verify(params, message, sig)
            }
            (PublicKey::Ecdsa(point), _) => {
                let params: &dyn signature::VerificationAlgorithm = match algorithm {
                    DnssecAlgorithm::EcdsaP256Sha256 => &signature::ECDSA_P256_SHA256_FIXED,
                    DnssecAlgorithm::EcdsaP384Sha384 => &signature::ECDSA_P384_SHA384_FIXED,
                    other => return Err(DnssecError::UnsupportedAlgorithm(other.into())),
                };
                let mut prefixed = Vec::with_capacity(point.len() + 1);
                prefixed.push(0x04);
                prefixed.extend_from_slice(point);
                signature::UnparsedPublicKey::new(params, &prefixed).verify(message, sig)
            }
            (PublicKey::EdDsa(key), DnssecAlgorithm::Ed25519) => {
                signature::UnparsedPublicKey::new(&signature::ED25519, key).verify(message, sig)
            }
            // *ring* has no Ed448 support.
            (PublicKey::EdDsa(_), other) => {
                return Err(DnssecError::UnsupportedAlgorithm(other.into()));
            }
        };
        Ok(outcome.is_ok())
    }
}

fn parse_rsa(bytes: &[u8]) -> Result<PublicKey> {
    if bytes.len() < 3 {
        return Err(DnssecError::invalid_rdata(
            RecordType::DNSKEY,
            format!(
                "RSA public key should contain at least 3 octets (got {})",
                bytes.len()
            ),
        ));
    }
    let (exponent_len, exponent_start) = match bytes[0] {
        0 => (usize::from(u16::from_be_bytes([bytes[1], bytes[2]])), 3),
        len => (usize::from(len), 1),
    };
    let modulus_start = exponent_start + exponent_len;
    if exponent_len == 0 || modulus_start >= bytes.len() {
        return Err(DnssecError::invalid_rdata(
            RecordType::DNSKEY,
            "RSA exponent length leaves no room for the modulus",
        ));
    }
    Ok(PublicKey::Rsa {
        exponent: bytes[exponent_start..modulus_start].to_vec(),
        modulus: bytes[modulus_start..].to_vec(),
    })
}
