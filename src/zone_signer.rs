//! Key generation and signing for building DNSSEC fixtures in tests.

use crate::algorithm::{DigestType, DnssecAlgorithm};
use crate::dnskey::{DnskeyData, DnskeyFlags, DnskeyRecord};
use crate::ds::{DsData, DsRecord};
use crate::public_key::PublicKey;
use crate::question::Question;
use crate::record::Record;
use crate::rrset::RecordSet;
use crate::rrsig::{RrsigData, RrsigRecord};
use chrono::{DateTime, Duration, Utc};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use ring::rand::SystemRandom;
use ring::signature::{
    ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED_SIGNING, EcdsaKeyPair,
    Ed25519KeyPair, KeyPair,
};

const FIVE_MINUTES: u32 = 300;

#[derive(Debug, Clone, Copy)]
pub struct SignatureOptions {
    pub inception: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
}

impl Default for SignatureOptions {
    fn default() -> Self {
        let now = Utc::now();
        SignatureOptions {
            inception: now,
            expiration: now + Duration::seconds(i64::from(FIVE_MINUTES)),
        }
    }
}

enum SigningKey {
    Ecdsa(EcdsaKeyPair),
    Ed25519(Ed25519KeyPair),
}

pub struct ZoneSigner {
    zone_name: Name,
    algorithm: DnssecAlgorithm,
    key: SigningKey,
    rng: SystemRandom,
}

pub struct DnskeyResponse {
    pub dnskey: DnskeyRecord,
    pub rrsig: RrsigRecord,
    pub message: Message,
}

impl DnskeyResponse {
    pub fn message_records(&self) -> Vec<Record> {
        vec![self.dnskey.record.clone(), self.rrsig.record.clone()]
    }
}

pub struct DsResponse {
    pub ds: DsRecord,
    pub rrsig: RrsigRecord,
    pub message: Message,
}

pub struct RrsigResponse {
    pub data: RrsigData,
    pub record: Record,
    pub message: Message,
}

pub struct ZoneResponses {
    pub dnskey: DnskeyResponse,
    pub ds: DsResponse,
}

impl ZoneSigner {
    /// New key pair for `zone_name`. Only the algorithms *ring* can generate
    /// keys for are accepted.
    pub fn generate(algorithm: DnssecAlgorithm, zone_name: &Name) -> Self {
        let rng = SystemRandom::new();
        let key = match algorithm {
            DnssecAlgorithm::EcdsaP256Sha256 | DnssecAlgorithm::EcdsaP384Sha384 => {
                let params = if algorithm == DnssecAlgorithm::EcdsaP256Sha256 {
                    &ECDSA_P256_SHA256_FIXED_SIGNING
                } else {
                    &ECDSA_P384_SHA384_FIXED_SIGNING
                };
                let pkcs8 = EcdsaKeyPair::generate_pkcs8(params, &rng).unwrap();
                SigningKey::Ecdsa(EcdsaKeyPair::from_pkcs8(params, pkcs8.as_ref(), &rng).unwrap())
            }
            DnssecAlgorithm::Ed25519 => {
                let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
                SigningKey::Ed25519(Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap())
            }
            other => panic!("cannot generate {} keys", other),
        };
        ZoneSigner {
            zone_name: crate::name::normalize(zone_name),
            algorithm,
            key,
            rng,
        }
    }

    pub fn zone_name(&self) -> &Name {
        &self.zone_name
    }

    fn public_key(&self) -> PublicKey {
        match &self.key {
            // Drop the SEC1 uncompressed-point prefix.
            SigningKey::Ecdsa(pair) => PublicKey::Ecdsa(pair.public_key().as_ref()[1..].to_vec()),
            SigningKey::Ed25519(pair) => PublicKey::EdDsa(pair.public_key().as_ref().to_vec()),
        }
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        match &self.key {
            SigningKey::Ecdsa(pair) => pair.sign(&self.rng, data).unwrap().as_ref().to_vec(),
            SigningKey::Ed25519(pair) => pair.sign(data).as_ref().to_vec(),
        }
    }

    pub fn dnskey_data(&self, flags: DnskeyFlags) -> DnskeyData {
        DnskeyData::new(self.public_key(), self.algorithm, flags)
    }

    /// Self-signed DNSKEY RRset containing this zone's key.
    pub fn generate_dnskey(&self, options: &SignatureOptions) -> DnskeyResponse {
        self.generate_dnskey_with(options, &[])
    }

    /// Like [`generate_dnskey`](Self::generate_dnskey), with extra DNSKEY
    /// records added to the RRset before signing.
    pub fn generate_dnskey_with(
        &self,
        options: &SignatureOptions,
        additional_dnskeys: &[Record],
    ) -> DnskeyResponse {
        let data = self.dnskey_data(DnskeyFlags {
            zone_key: true,
            secure_entry_point: false,
        });
        let record = Record::new(
            &self.zone_name,
            RecordType::DNSKEY,
            DNSClass::IN,
            FIVE_MINUTES,
            data.to_rdata(),
        );
        let mut members = vec![record.clone()];
        members.extend_from_slice(additional_dnskeys);
        let rrset = RecordSet::new(&record.question(), &members).unwrap();
        let rrsig = self.generate_rrsig(&rrset, data.key_tag(), options);

        DnskeyResponse {
            dnskey: DnskeyRecord::from_record(record).unwrap(),
            rrsig: RrsigRecord::from_record(rrsig.record).unwrap(),
            message: rrsig.message,
        }
    }

    /// DS for a child zone's DNSKEY, signed with this zone's key.
    pub fn generate_ds(
        &self,
        child_dnskey: &DnskeyRecord,
        parent_key_tag: u16,
        digest_type: DigestType,
        options: &SignatureOptions,
    ) -> DsResponse {
        let child_zone = child_dnskey.record.name();
        assert!(
            self.zone_name.zone_of(child_zone) && &self.zone_name != child_zone,
            "{} isn't a child of {}",
            child_zone,
            self.zone_name
        );
        let data = DsData::for_dnskey(child_dnskey, digest_type);
        let record = Record::new(
            child_zone,
            RecordType::DS,
            DNSClass::IN,
            FIVE_MINUTES,
            data.to_rdata(),
        );
        let rrset = RecordSet::new(&record.question(), [&record]).unwrap();
        let rrsig = self.generate_rrsig(&rrset, parent_key_tag, options);

        DsResponse {
            ds: DsRecord::from_record(record).unwrap(),
            rrsig: RrsigRecord::from_record(rrsig.record).unwrap(),
            message: rrsig.message,
        }
    }

    /// RRSIG over `rrset` by this zone, and a NOERROR response carrying both.
    pub fn generate_rrsig(
        &self,
        rrset: &RecordSet,
        key_tag: u16,
        options: &SignatureOptions,
    ) -> RrsigResponse {
        let unsigned = RrsigData::for_rrset(
            rrset,
            self.algorithm,
            &self.zone_name,
            key_tag,
            options.inception.timestamp() as u32,
            options.expiration.timestamp() as u32,
        );
        let signature = self.sign(&unsigned.signed_data(rrset));
        let data = unsigned.with_signature(signature);
        let record = Record::new(
            rrset.name(),
            RecordType::RRSIG,
            rrset.class(),
            rrset.ttl(),
            data.to_rdata(),
        );

        let mut answers = rrset.records().to_vec();
        answers.push(record.clone());
        let message = response_message(&rrset.question(), &answers, ResponseCode::NoError);
        RrsigResponse {
            data,
            record,
            message,
        }
    }

    /// This zone's DNSKEY response and the DS response its parent serves.
    pub fn generate_zone_responses(
        &self,
        parent: &ZoneSigner,
        parent_key_tag: u16,
        options: &SignatureOptions,
    ) -> ZoneResponses {
        let dnskey = self.generate_dnskey(options);
        let ds = parent.generate_ds(&dnskey.dnskey, parent_key_tag, DigestType::Sha256, options);
        ZoneResponses { dnskey, ds }
    }
}

pub fn response_message(question: &Question, answers: &[Record], rcode: ResponseCode) -> Message {
    let mut message = Message::new();
    message.set_message_type(MessageType::Response);
    message.set_response_code(rcode);
    message.add_query(question.to_query());
    for record in answers {
        message.add_answer(record.to_hickory().unwrap());
    }
    message
}
