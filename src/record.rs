use crate::error::Result;
use crate::name::{normalize, to_canonical_wire};
use crate::question::Question;
use hickory_proto::op::Message;
use hickory_proto::rr::{self, DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable, BinEncoder, EncodeMode};
use std::fmt;

/// A resource record whose RDATA is kept as canonical wire octets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    name: Name,
    record_type: RecordType,
    class: DNSClass,
    ttl: u32,
    rdata: Vec<u8>,
}

impl Record {
    pub fn new(
        name: &Name,
        record_type: RecordType,
        class: DNSClass,
        ttl: u32,
        rdata: Vec<u8>,
    ) -> Self {
        Record {
            name: normalize(name),
            record_type,
            class,
            ttl,
            rdata,
        }
    }

    /// Re-encode a record decoded by hickory, without name compression and
    /// with canonical name spelling inside the RDATA.
    ///
    /// Only fields hickory models survive. DNSKEY flags are rebuilt from the
    /// zone key, SEP and revoke bits, so any other flag bit is dropped and the
    /// key tag of such a key changes.
    pub fn from_hickory(record: &rr::Record) -> Result<Self> {
        let mut rdata = Vec::new();
        if let Some(data) = record.data() {
            let mut encoder = BinEncoder::with_mode(&mut rdata, EncodeMode::Signing);
            encoder.set_canonical_names(true);
            data.emit(&mut encoder)?;
        }
        Ok(Record::new(
            record.name(),
            record.record_type(),
            record.dns_class(),
            record.ttl(),
            rdata,
        ))
    }

    pub fn to_hickory(&self) -> Result<rr::Record> {
        Ok(rr::Record::from_bytes(&self.to_wire())?)
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn class(&self) -> DNSClass {
        self.class
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn rdata(&self) -> &[u8] {
        &self.rdata
    }

    pub fn question(&self) -> Question {
        Question::new(&self.name, self.record_type, self.class)
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.record_type == question.record_type()
            && self.class == question.class()
            && &self.name == question.name()
    }

    /// Full wire form: owner, type, class, TTL, RDLENGTH, RDATA.
    pub fn to_wire(&self) -> Vec<u8> {
        self.to_wire_as(&self.name, self.ttl)
    }

    /// Wire form with the owner and TTL replaced, as needed when building
    /// signed data for wildcard-expanded answers.
    pub(crate) fn to_wire_as(&self, owner: &Name, ttl: u32) -> Vec<u8> {
        let mut wire = to_canonical_wire(owner);
        wire.extend_from_slice(&u16::from(self.record_type).to_be_bytes());
        wire.extend_from_slice(&u16::from(self.class).to_be_bytes());
        wire.extend_from_slice(&ttl.to_be_bytes());
        wire.extend_from_slice(&(self.rdata.len() as u16).to_be_bytes());
        wire.extend_from_slice(&self.rdata);
        wire
    }
}

/// Answer section of `message` as [`Record`]s.
pub fn answer_records(message: &Message) -> Result<Vec<Record>> {
    message.answers().iter().map(Record::from_hickory).collect()
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} \\# {} {}",
            self.name,
            self.ttl,
            self.class,
            self.record_type,
            self.rdata.len(),
            hex::encode(&self.rdata)
        )
    }
}
