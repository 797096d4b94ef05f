use crate::name::normalize;
use hickory_proto::op::Query;
use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::fmt;

/// A (name, type, class) triple identifying an RRset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    name: Name,
    record_type: RecordType,
    class: DNSClass,
}

impl Question {
    pub fn new(name: &Name, record_type: RecordType, class: DNSClass) -> Self {
        Question {
            name: normalize(name),
            record_type,
            class,
        }
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

    /// `name/TYPE` identifier used to correlate messages with the question
    /// they answer.
    pub fn key(&self) -> String {
        format!("{}/{}", self.name, self.record_type)
    }

    /// Same class, different name and type.
    pub fn with(&self, name: &Name, record_type: RecordType) -> Self {
        Question::new(name, record_type, self.class)
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::query(self.name.clone(), self.record_type);
        query.set_query_class(self.class);
        query
    }
}

impl From<&Query> for Question {
    fn from(query: &Query) -> Self {
        Question::new(query.name(), query.query_type(), query.query_class())
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.class, self.record_type)
    }
}
