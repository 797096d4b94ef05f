use crate::error::{DnssecError, Result};
use crate::question::Question;
use crate::record::Record;
use hickory_proto::rr::{DNSClass, Name, RecordType};

/// A canonical RRset (RFC 4034 section 6.3): records sharing owner, class,
/// type and TTL, deduplicated and sorted by RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    name: Name,
    class: DNSClass,
    record_type: RecordType,
    ttl: u32,
    records: Vec<Record>,
}

impl RecordSet {
    /// Build the RRset answering `question` out of `records`, ignoring the
    /// records that do not match it.
    pub fn new<'a>(question: &Question, records: impl IntoIterator<Item = &'a Record>) -> Result<Self> {
        let mut matching: Vec<Record> = records
            .into_iter()
            .filter(|record| record.matches(question))
            .cloned()
            .collect();

        let ttl = match matching.first() {
            Some(record) => record.ttl(),
            None => return Err(DnssecError::EmptySet(question.key())),
        };
        if let Some(mismatch) = matching.iter().find(|record| record.ttl() != ttl) {
            return Err(DnssecError::InconsistentTtl {
                key: question.key(),
                first: ttl,
                second: mismatch.ttl(),
            });
        }

        // Slice ordering puts a missing octet before a present zero octet.
        matching.sort_by(|a, b| a.rdata().cmp(b.rdata()));
        matching.dedup_by(|a, b| a.rdata() == b.rdata());

        Ok(RecordSet {
            name: question.name().clone(),
            class: question.class(),
            record_type: question.record_type(),
            ttl,
            records: matching,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn class(&self) -> DNSClass {
        self.class
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn question(&self) -> Question {
        Question::new(&self.name, self.record_type, self.class)
    }

    /// Concatenated wire form of the members, in canonical order, with the
    /// owner name replaced by `owner`.
    pub(crate) fn to_wire_as(&self, owner: &Name) -> Vec<u8> {
        self.records
            .iter()
            .flat_map(|record| record.to_wire_as(owner, self.ttl))
            .collect()
    }
}
