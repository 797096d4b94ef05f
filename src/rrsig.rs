use crate::algorithm::DnssecAlgorithm;
use crate::dnskey::DnskeyData;
use crate::error::{DnssecError, Result};
use crate::name::{count_labels, normalize, to_canonical_wire, wildcard_owner};
use crate::record::Record;
use crate::rrset::RecordSet;
use hickory_proto::rr::{Name, RecordType};
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder};

/// Length of the fixed RRSIG RDATA fields preceding the signer name.
const FIXED_FIELDS_LEN: usize = 18;

/// Parsed RRSIG RDATA (RFC 4034 section 3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigData {
    type_covered: RecordType,
    algorithm: DnssecAlgorithm,
    labels: u8,
    original_ttl: u32,
    expiration: u32,
    inception: u32,
    key_tag: u16,
    signer_name: Name,
    signature: Vec<u8>,
}

impl RrsigData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: RecordType,
        algorithm: DnssecAlgorithm,
        labels: u8,
        original_ttl: u32,
        expiration: u32,
        inception: u32,
        key_tag: u16,
        signer_name: &Name,
        signature: Vec<u8>,
    ) -> Self {
        RrsigData {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name: normalize(signer_name),
            signature,
        }
    }

    /// Unsigned RRSIG covering `rrset`; pair it with
    /// [`with_signature`](Self::with_signature) once
    /// [`signed_data`](Self::signed_data) has been signed.
    pub fn for_rrset(
        rrset: &RecordSet,
        algorithm: DnssecAlgorithm,
        signer_name: &Name,
        key_tag: u16,
        inception: u32,
        expiration: u32,
    ) -> Self {
        RrsigData::new(
            rrset.record_type(),
            algorithm,
            count_labels(rrset.name()),
            rrset.ttl(),
            expiration,
            inception,
            key_tag,
            signer_name,
            Vec::new(),
        )
    }

    pub fn with_signature(self, signature: Vec<u8>) -> Self {
        RrsigData { signature, ..self }
    }

    pub fn from_rdata(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < FIXED_FIELDS_LEN + 1 {
            return Err(DnssecError::invalid_rdata(
                RecordType::RRSIG,
                format!("expected more than {} octets (got {})", FIXED_FIELDS_LEN, rdata.len()),
            ));
        }
        let type_covered = RecordType::from(u16::from_be_bytes([rdata[0], rdata[1]]));
        let algorithm = DnssecAlgorithm::try_from(rdata[2])?;

        let mut decoder = BinDecoder::new(&rdata[FIXED_FIELDS_LEN..]);
        let signer_name = Name::read(&mut decoder).map_err(|e| {
            DnssecError::invalid_rdata(RecordType::RRSIG, format!("bad signer name: {}", e))
        })?;
        let signature = rdata[FIXED_FIELDS_LEN + decoder.index()..].to_vec();
        if signature.is_empty() {
            return Err(DnssecError::invalid_rdata(
                RecordType::RRSIG,
                "signature is empty",
            ));
        }

        Ok(RrsigData::new(
            type_covered,
            algorithm,
            rdata[3],
            u32::from_be_bytes([rdata[4], rdata[5], rdata[6], rdata[7]]),
            u32::from_be_bytes([rdata[8], rdata[9], rdata[10], rdata[11]]),
            u32::from_be_bytes([rdata[12], rdata[13], rdata[14], rdata[15]]),
            u16::from_be_bytes([rdata[16], rdata[17]]),
            &signer_name,
            signature,
        ))
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = self.header();
        rdata.extend_from_slice(&self.signature);
        rdata
    }

    /// Fixed fields followed by the signer name: the RDATA minus the
    /// signature.
    fn header(&self) -> Vec<u8> {
        let mut header = Vec::with_capacity(FIXED_FIELDS_LEN + 64);
        header.extend_from_slice(&u16::from(self.type_covered).to_be_bytes());
        header.push(self.algorithm.into());
        header.push(self.labels);
        header.extend_from_slice(&self.original_ttl.to_be_bytes());
        header.extend_from_slice(&self.expiration.to_be_bytes());
        header.extend_from_slice(&self.inception.to_be_bytes());
        header.extend_from_slice(&self.key_tag.to_be_bytes());
        header.extend(to_canonical_wire(&self.signer_name));
        header
    }

    /// The octets the signature is computed over (RFC 4034 section 3.1.8.1).
    pub fn signed_data(&self, rrset: &RecordSet) -> Vec<u8> {
        let owner = wildcard_owner(rrset.name(), self.labels);
        let mut data = self.header();
        data.extend(rrset.to_wire_as(&owner));
        data
    }

    /// Check this signature over `rrset` with `dnskey`.
    pub fn verify_rrset(&self, rrset: &RecordSet, dnskey: &DnskeyData) -> bool {
        if self.type_covered != rrset.record_type() {
            tracing::debug!(
                "RRSIG covers {} but RRset is {}",
                self.type_covered,
                rrset.record_type()
            );
            return false;
        }

        if self.original_ttl != rrset.ttl() {
            tracing::debug!(
                "RRSIG original TTL {} does not match RRset TTL {}",
                self.original_ttl,
                rrset.ttl()
            );
            return false;
        }

        if !self.signer_name.zone_of(rrset.name()) {
            tracing::debug!(
                "RRSIG signer {} is not an ancestor of {}",
                self.signer_name,
                rrset.name()
            );
            return false;
        }

        if count_labels(rrset.name()) < self.labels {
            tracing::debug!(
                "RRSIG claims {} labels but {} only has {}",
                self.labels,
                rrset.name(),
                count_labels(rrset.name())
            );
            return false;
        }

        if self.algorithm != dnskey.algorithm() {
            return false;
        }

        match dnskey
            .public_key()
            .verify(self.algorithm, &self.signed_data(rrset), &self.signature)
        {
            Ok(valid) => valid,
            Err(e) => {
                tracing::debug!("Cannot verify RRSIG with key {}: {}", dnskey.key_tag(), e);
                false
            }
        }
    }

    pub fn type_covered(&self) -> RecordType {
        self.type_covered
    }

    pub fn algorithm(&self) -> DnssecAlgorithm {
        self.algorithm
    }

    pub fn labels(&self) -> u8 {
        self.labels
    }

    pub fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    pub fn expiration(&self) -> u32 {
        self.expiration
    }

    pub fn inception(&self) -> u32 {
        self.inception
    }

    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// An RRSIG record together with its parsed RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigRecord {
    pub data: RrsigData,
    pub record: Record,
}

impl RrsigRecord {
    pub fn from_record(record: Record) -> Result<Self> {
        let data = RrsigData::from_rdata(record.rdata())?;
        Ok(RrsigRecord { data, record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnskey::DnskeyFlags;
    use crate::public_key::PublicKey;
    use crate::question::Question;
    use hickory_proto::rr::DNSClass;
    use ring::rand::SystemRandom;
    use ring::signature::{Ed25519KeyPair, KeyPair};
    use std::str::FromStr;

    const INCEPTION: u32 = 1_700_000_000;
    const EXPIRATION: u32 = 1_700_086_400;

    fn rrset(name: &str, ttl: u32) -> RecordSet {
        let name = Name::from_str(name).unwrap();
        let question = Question::new(&name, RecordType::A, DNSClass::IN);
        let records = [
            Record::new(&name, RecordType::A, DNSClass::IN, ttl, vec![192, 0, 2, 2]),
            Record::new(&name, RecordType::A, DNSClass::IN, ttl, vec![192, 0, 2, 1]),
        ];
        RecordSet::new(&question, &records).unwrap()
    }

    fn key_pair() -> (Ed25519KeyPair, DnskeyData) {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();
        let dnskey = DnskeyData::new(
            PublicKey::EdDsa(pair.public_key().as_ref().to_vec()),
            DnssecAlgorithm::Ed25519,
            DnskeyFlags {
                zone_key: true,
                secure_entry_point: false,
            },
        );
        (pair, dnskey)
    }

    fn sign(pair: &Ed25519KeyPair, dnskey: &DnskeyData, rrset: &RecordSet) -> RrsigData {
        let unsigned = RrsigData::for_rrset(
            rrset,
            DnssecAlgorithm::Ed25519,
            &Name::from_str("example.com.").unwrap(),
            dnskey.key_tag(),
            INCEPTION,
            EXPIRATION,
        );
        let signature = pair.sign(&unsigned.signed_data(rrset)).as_ref().to_vec();
        unsigned.with_signature(signature)
    }

    #[test]
    fn test_round_trip_every_family() {
        let cases = [
            (DnssecAlgorithm::RsaSha256, 256),
            (DnssecAlgorithm::EcdsaP256Sha256, 64),
            (DnssecAlgorithm::EcdsaP384Sha384, 96),
            (DnssecAlgorithm::Ed25519, 64),
            (DnssecAlgorithm::Ed448, 114),
        ];

        for (algorithm, signature_len) in cases {
            let rrsig = RrsigData::new(
                RecordType::A,
                algorithm,
                3,
                300,
                EXPIRATION,
                INCEPTION,
                4242,
                &Name::from_str("Example.COM").unwrap(),
                vec![0xaa; signature_len],
            );

            let parsed = RrsigData::from_rdata(&rrsig.to_rdata()).unwrap();
            assert_eq!(parsed, rrsig);
            assert_eq!(parsed.algorithm(), algorithm);
            assert_eq!(parsed.signature().len(), signature_len);
            assert_eq!(parsed.signer_name().to_string(), "example.com.");
        }
    }

    #[test]
    fn test_header_layout() {
        let rrsig = RrsigData::new(
            RecordType::A,
            DnssecAlgorithm::Ed25519,
            2,
            0x0000_0e10,
            0x0102_0304,
            0x0506_0708,
            0x0a0b,
            &Name::root(),
            vec![1],
        );
        assert_eq!(
            rrsig.to_rdata(),
            vec![0, 1, 15, 2, 0, 0, 0x0e, 0x10, 1, 2, 3, 4, 5, 6, 7, 8, 0x0a, 0x0b, 0, 1]
        );
    }

    #[test]
    fn test_malformed_rdata() {
        let err = RrsigData::from_rdata(&[0; 10]).unwrap_err();
        assert!(err.to_string().starts_with("RRSIG data is malformed"));
    }

    #[test]
    fn test_empty_signature() {
        let rrsig = RrsigData::new(
            RecordType::A,
            DnssecAlgorithm::Ed25519,
            2,
            300,
            EXPIRATION,
            INCEPTION,
            1,
            &Name::from_str("example.com.").unwrap(),
            Vec::new(),
        );
        let err = RrsigData::from_rdata(&rrsig.to_rdata()).unwrap_err();
        assert!(err.to_string().contains("signature is empty"));
    }

    #[test]
    fn test_valid_signature() {
        let (pair, dnskey) = key_pair();
        let rrset = rrset("www.example.com.", 300);
        let rrsig = sign(&pair, &dnskey, &rrset);

        assert!(rrsig.verify_rrset(&rrset, &dnskey));
    }

    #[test]
    fn test_wrong_key() {
        let (pair, dnskey) = key_pair();
        let (_, other_dnskey) = key_pair();
        let rrset = rrset("www.example.com.", 300);
        let rrsig = sign(&pair, &dnskey, &rrset);

        assert!(!rrsig.verify_rrset(&rrset, &other_dnskey));
    }

    #[test]
    fn test_type_covered_mismatch() {
        let (pair, dnskey) = key_pair();
        let rrset = rrset("www.example.com.", 300);
        let rrsig = sign(&pair, &dnskey, &rrset);
        let retyped = RrsigData::new(
            RecordType::AAAA,
            rrsig.algorithm(),
            rrsig.labels(),
            rrsig.original_ttl(),
            rrsig.expiration(),
            rrsig.inception(),
            rrsig.key_tag(),
            rrsig.signer_name(),
            rrsig.signature().to_vec(),
        );

        assert!(!retyped.verify_rrset(&rrset, &dnskey));
    }

    #[test]
    fn test_ttl_mismatch() {
        let (pair, dnskey) = key_pair();
        let rrsig = sign(&pair, &dnskey, &rrset("www.example.com.", 300));

        assert!(!rrsig.verify_rrset(&rrset("www.example.com.", 299), &dnskey));
    }

    #[test]
    fn test_signer_outside_owner_tree() {
        let (pair, dnskey) = key_pair();
        let foreign = rrset("www.example.org.", 300);
        let rrsig = sign(&pair, &dnskey, &foreign);

        assert!(!rrsig.verify_rrset(&foreign, &dnskey));
    }

    #[test]
    fn test_too_many_labels() {
        let (pair, dnskey) = key_pair();
        let rrset = rrset("www.example.com.", 300);
        let rrsig = sign(&pair, &dnskey, &rrset);
        let inflated = RrsigData::new(
            rrsig.type_covered(),
            rrsig.algorithm(),
            4,
            rrsig.original_ttl(),
            rrsig.expiration(),
            rrsig.inception(),
            rrsig.key_tag(),
            rrsig.signer_name(),
            rrsig.signature().to_vec(),
        );

        assert!(!inflated.verify_rrset(&rrset, &dnskey));
    }

    #[test]
    fn test_wildcard_expansion_uses_wildcard_owner() {
        let (pair, dnskey) = key_pair();
        let wildcard = rrset("*.example.com.", 300);
        let rrsig = sign(&pair, &dnskey, &wildcard);
        assert_eq!(rrsig.labels(), 2);

        let expanded = rrset("anything.example.com.", 300);
        assert!(rrsig.verify_rrset(&expanded, &dnskey));
    }

    #[test]
    fn test_tampered_record_fails() {
        let (pair, dnskey) = key_pair();
        let rrsig = sign(&pair, &dnskey, &rrset("www.example.com.", 300));

        let name = Name::from_str("www.example.com.").unwrap();
        let question = Question::new(&name, RecordType::A, DNSClass::IN);
        let tampered = RecordSet::new(
            &question,
            &[Record::new(&name, RecordType::A, DNSClass::IN, 300, vec![198, 51, 100, 1])],
        )
        .unwrap();

        assert!(!rrsig.verify_rrset(&tampered, &dnskey));
    }
}
