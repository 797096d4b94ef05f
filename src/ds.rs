use crate::algorithm::{DigestType, DnssecAlgorithm};
use crate::dnskey::DnskeyRecord;
use crate::error::{DnssecError, Result};
use crate::name::to_canonical_wire;
use crate::record::Record;
use hickory_proto::rr::RecordType;

/// Parsed DS RDATA, also used for trust anchors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DsData {
    key_tag: u16,
    algorithm: DnssecAlgorithm,
    digest_type: DigestType,
    digest: Vec<u8>,
}

impl DsData {
    pub fn new(
        key_tag: u16,
        algorithm: DnssecAlgorithm,
        digest_type: DigestType,
        digest: Vec<u8>,
    ) -> Self {
        DsData {
            key_tag,
            algorithm,
            digest_type,
            digest,
        }
    }

    /// DS pointing at `dnskey`, owned by the same name.
    pub fn for_dnskey(dnskey: &DnskeyRecord, digest_type: DigestType) -> Self {
        DsData::new(
            dnskey.data.key_tag(),
            dnskey.data.algorithm(),
            digest_type,
            calculate_dnskey_digest(dnskey, digest_type),
        )
    }

    pub fn from_rdata(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 5 {
            return Err(DnssecError::invalid_rdata(
                RecordType::DS,
                format!("expected at least 5 octets (got {})", rdata.len()),
            ));
        }
        let algorithm = DnssecAlgorithm::try_from(rdata[2])?;
        let digest_type = DigestType::try_from(rdata[3])?;
        let digest = rdata[4..].to_vec();
        if digest.len() != digest_type.digest_len() {
            return Err(DnssecError::invalid_rdata(
                RecordType::DS,
                format!(
                    "digest should span {} octets (got {})",
                    digest_type.digest_len(),
                    digest.len()
                ),
            ));
        }
        Ok(DsData {
            key_tag: u16::from_be_bytes([rdata[0], rdata[1]]),
            algorithm,
            digest_type,
            digest,
        })
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = Vec::with_capacity(4 + self.digest.len());
        rdata.extend_from_slice(&self.key_tag.to_be_bytes());
        rdata.push(self.algorithm.into());
        rdata.push(self.digest_type.into());
        rdata.extend_from_slice(&self.digest);
        rdata
    }

    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    pub fn algorithm(&self) -> DnssecAlgorithm {
        self.algorithm
    }

    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Whether this DS designates `dnskey`: same key tag, same algorithm and
    /// a matching digest over the owner name and RDATA.
    pub fn verify_dnskey(&self, dnskey: &DnskeyRecord) -> bool {
        if self.key_tag != dnskey.data.key_tag() {
            tracing::trace!(
                "Key tag mismatch: DS={} computed={}",
                self.key_tag,
                dnskey.data.key_tag()
            );
            return false;
        }

        if self.algorithm != dnskey.data.algorithm() {
            tracing::trace!(
                "Algorithm mismatch: DS={} DNSKEY={}",
                self.algorithm,
                dnskey.data.algorithm()
            );
            return false;
        }

        let computed = calculate_dnskey_digest(dnskey, self.digest_type);
        if computed != self.digest {
            tracing::trace!(
                "DS digest mismatch: computed={} expected={}",
                hex::encode(&computed),
                hex::encode(&self.digest)
            );
            return false;
        }
        true
    }
}

/// A DS record together with its parsed RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRecord {
    pub data: DsData,
    pub record: Record,
}

impl DsRecord {
    pub fn from_record(record: Record) -> Result<Self> {
        let data = DsData::from_rdata(record.rdata())?;
        Ok(DsRecord { data, record })
    }
}

/// Digest of the owner name and RDATA of `dnskey` (RFC 4034 section 5.1.4).
pub fn calculate_dnskey_digest(dnskey: &DnskeyRecord, digest_type: DigestType) -> Vec<u8> {
    let mut digest_input = to_canonical_wire(dnskey.record.name());
    digest_input.extend_from_slice(dnskey.record.rdata());
    digest_type.digest(&digest_input)
}
