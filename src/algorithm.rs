use crate::error::DnssecError;
use sha2::Digest;
use std::fmt;

/// DNSSEC signing algorithms this crate understands (RFC 8624 registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnssecAlgorithm {
    RsaSha1,
    RsaSha1Nsec3Sha1,
    RsaSha256,
    RsaSha512,
    EcdsaP256Sha256,
    EcdsaP384Sha384,
    Ed25519,
    Ed448,
}

/// Key encoding family shared by several algorithm numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    Ecdsa,
    EdDsa,
}

impl DnssecAlgorithm {
    pub fn family(self) -> KeyFamily {
        match self {
            DnssecAlgorithm::RsaSha1
            | DnssecAlgorithm::RsaSha1Nsec3Sha1
            | DnssecAlgorithm::RsaSha256
            | DnssecAlgorithm::RsaSha512 => KeyFamily::Rsa,
            DnssecAlgorithm::EcdsaP256Sha256 | DnssecAlgorithm::EcdsaP384Sha384 => KeyFamily::Ecdsa,
            DnssecAlgorithm::Ed25519 | DnssecAlgorithm::Ed448 => KeyFamily::EdDsa,
        }
    }

    /// Exact public key length for algorithms with fixed-size keys.
    pub fn public_key_len(self) -> Option<usize> {
        match self {
            DnssecAlgorithm::EcdsaP256Sha256 => Some(64),
            DnssecAlgorithm::EcdsaP384Sha384 => Some(96),
            DnssecAlgorithm::Ed25519 => Some(32),
            DnssecAlgorithm::Ed448 => Some(57),
            _ => None,
        }
    }
}

impl TryFrom<u8> for DnssecAlgorithm {
    type Error = DnssecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(DnssecAlgorithm::RsaSha1),
            7 => Ok(DnssecAlgorithm::RsaSha1Nsec3Sha1),
            8 => Ok(DnssecAlgorithm::RsaSha256),
            10 => Ok(DnssecAlgorithm::RsaSha512),
            13 => Ok(DnssecAlgorithm::EcdsaP256Sha256),
            14 => Ok(DnssecAlgorithm::EcdsaP384Sha384),
            15 => Ok(DnssecAlgorithm::Ed25519),
            16 => Ok(DnssecAlgorithm::Ed448),
            other => Err(DnssecError::UnsupportedAlgorithm(other)),
        }
    }
}

impl From<DnssecAlgorithm> for u8 {
    fn from(algorithm: DnssecAlgorithm) -> Self {
        match algorithm {
            DnssecAlgorithm::RsaSha1 => 5,
            DnssecAlgorithm::RsaSha1Nsec3Sha1 => 7,
            DnssecAlgorithm::RsaSha256 => 8,
            DnssecAlgorithm::RsaSha512 => 10,
            DnssecAlgorithm::EcdsaP256Sha256 => 13,
            DnssecAlgorithm::EcdsaP384Sha384 => 14,
            DnssecAlgorithm::Ed25519 => 15,
            DnssecAlgorithm::Ed448 => 16,
        }
    }
}

impl fmt::Display for DnssecAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = match self {
            DnssecAlgorithm::RsaSha1 => "RSASHA1",
            DnssecAlgorithm::RsaSha1Nsec3Sha1 => "RSASHA1-NSEC3-SHA1",
            DnssecAlgorithm::RsaSha256 => "RSASHA256",
            DnssecAlgorithm::RsaSha512 => "RSASHA512",
            DnssecAlgorithm::EcdsaP256Sha256 => "ECDSAP256SHA256",
            DnssecAlgorithm::EcdsaP384Sha384 => "ECDSAP384SHA384",
            DnssecAlgorithm::Ed25519 => "ED25519",
            DnssecAlgorithm::Ed448 => "ED448",
        };
        f.write_str(mnemonic)
    }
}

/// DS digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestType {
    Sha1,
    Sha256,
    Sha384,
}

impl DigestType {
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestType::Sha1 => sha1::Sha1::digest(data).to_vec(),
            DigestType::Sha256 => sha2::Sha256::digest(data).to_vec(),
            DigestType::Sha384 => sha2::Sha384::digest(data).to_vec(),
        }
    }

    pub fn digest_len(self) -> usize {
        match self {
            DigestType::Sha1 => 20,
            DigestType::Sha256 => 32,
            DigestType::Sha384 => 48,
        }
    }
}

impl TryFrom<u8> for DigestType {
    type Error = DnssecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DigestType::Sha1),
            2 => Ok(DigestType::Sha256),
            4 => Ok(DigestType::Sha384),
            other => Err(DnssecError::UnsupportedDigestType(other)),
        }
    }
}

impl From<DigestType> for u8 {
    fn from(digest_type: DigestType) -> Self {
        match digest_type {
            DigestType::Sha1 => 1,
            DigestType::Sha256 => 2,
            DigestType::Sha384 => 4,
        }
    }
}
