use crate::algorithm::DnssecAlgorithm;
use crate::error::{DnssecError, Result};
use crate::period::DatePeriod;
use crate::public_key::PublicKey;
use crate::record::Record;
use crate::rrsig::RrsigData;
use hickory_proto::rr::RecordType;

const ZONE_KEY_FLAG: u16 = 0x0100;
const SECURE_ENTRY_POINT_FLAG: u16 = 0x0001;

/// Protocol octet mandated by RFC 4034 section 2.1.2.
pub const DNSSEC_PROTOCOL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnskeyFlags {
    pub zone_key: bool,
    pub secure_entry_point: bool,
}

impl DnskeyFlags {
    fn from_bits(bits: u16) -> Self {
        DnskeyFlags {
            zone_key: bits & ZONE_KEY_FLAG != 0,
            secure_entry_point: bits & SECURE_ENTRY_POINT_FLAG != 0,
        }
    }

    fn bits(self) -> u16 {
        let mut bits = 0;
        if self.zone_key {
            bits |= ZONE_KEY_FLAG;
        }
        if self.secure_entry_point {
            bits |= SECURE_ENTRY_POINT_FLAG;
        }
        bits
    }
}

/// Parsed DNSKEY RDATA.
#[derive(Debug, Clone)]
pub struct DnskeyData {
    public_key: PublicKey,
    protocol: u8,
    algorithm: DnssecAlgorithm,
    flags: DnskeyFlags,
    key_tag: Option<u16>,
}

impl DnskeyData {
    pub fn new(
        public_key: PublicKey,
        algorithm: DnssecAlgorithm,
        flags: DnskeyFlags,
    ) -> Self {
        DnskeyData {
            public_key,
            protocol: DNSSEC_PROTOCOL,
            algorithm,
            flags,
            key_tag: None,
        }
    }

    pub fn from_rdata(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 4 {
            return Err(DnssecError::invalid_rdata(
                RecordType::DNSKEY,
                format!("expected at least 4 octets (got {})", rdata.len()),
            ));
        }
        let algorithm = DnssecAlgorithm::try_from(rdata[3])?;
        let public_key = PublicKey::from_dnskey_bytes(algorithm, &rdata[4..])?;
        Ok(DnskeyData {
            public_key,
            protocol: rdata[2],
            algorithm,
            flags: DnskeyFlags::from_bits(u16::from_be_bytes([rdata[0], rdata[1]])),
            key_tag: Some(calculate_key_tag(rdata)),
        })
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = Vec::new();
        rdata.extend_from_slice(&self.flags.bits().to_be_bytes());
        rdata.push(self.protocol);
        rdata.push(self.algorithm.into());
        rdata.extend_from_slice(&self.public_key.to_dnskey_bytes());
        rdata
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    pub fn algorithm(&self) -> DnssecAlgorithm {
        self.algorithm
    }

    pub fn flags(&self) -> DnskeyFlags {
        self.flags
    }

    /// The tag read off the wire, or computed from the serialised RDATA for
    /// keys built in memory.
    pub fn key_tag(&self) -> u16 {
        self.key_tag
            .unwrap_or_else(|| calculate_key_tag(&self.to_rdata()))
    }

    /// Whether `rrsig` claims to be made by this key and is usable during
    /// `period`. Does not check the signature itself.
    pub fn verify_rrsig(&self, rrsig: &RrsigData, period: &DatePeriod) -> bool {
        if self.key_tag() != rrsig.key_tag() {
            return false;
        }
        if self.algorithm != rrsig.algorithm() {
            return false;
        }
        period.overlaps(rrsig.inception(), rrsig.expiration())
    }
}

impl PartialEq for DnskeyData {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
            && self.protocol == other.protocol
            && self.algorithm == other.algorithm
            && self.flags == other.flags
            && self.key_tag() == other.key_tag()
    }
}

impl Eq for DnskeyData {}

/// A DNSKEY record together with its parsed RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyRecord {
    pub data: DnskeyData,
    pub record: Record,
}

impl DnskeyRecord {
    pub fn from_record(record: Record) -> Result<Self> {
        let data = DnskeyData::from_rdata(record.rdata())?;
        Ok(DnskeyRecord { data, record })
    }
}

/// Key tag of a DNSKEY RDATA (RFC 4034 Appendix B).
pub fn calculate_key_tag(rdata: &[u8]) -> u16 {
    let mut ac: u32 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i % 2 == 0 {
            ac += (byte as u32) << 8;
        } else {
            ac += byte as u32;
        }
    }

    ac += (ac >> 16) & 0xFFFF;
    (ac & 0xFFFF) as u16
}
