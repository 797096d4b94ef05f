use hickory_proto::error::ProtoError;
use hickory_proto::rr::RecordType;
use thiserror::Error;

/// Input-contract violations.
///
/// Security outcomes are never reported through this type: they travel as
/// [`VerificationResult`](crate::VerificationResult) values instead.
#[derive(Debug, Error)]
pub enum DnssecError {
    #[error("{record_type} data is malformed: {reason}")]
    InvalidRdata {
        record_type: RecordType,
        reason: String,
    },

    #[error("RRset for {0} should have at least one matching record")]
    EmptySet(String),

    #[error("RRset for {key} contains different TTLs (e.g., {first}, {second})")]
    InconsistentTtl { key: String, first: u32, second: u32 },

    #[error("Unsupported DNSSEC algorithm ({0})")]
    UnsupportedAlgorithm(u8),

    #[error("Unsupported DS digest type ({0})")]
    UnsupportedDigestType(u8),

    #[error("Validity period starts after it ends ({start} > {end})")]
    InvalidPeriod { start: String, end: String },

    #[error("At least one message must answer {0}")]
    MissingResponse(String),

    #[error("DNS codec error: {0}")]
    Proto(#[from] ProtoError),

    #[error("Resolver failed to answer {question}")]
    Resolver {
        question: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DnssecError {
    pub(crate) fn invalid_rdata(record_type: RecordType, reason: impl Into<String>) -> Self {
        DnssecError::InvalidRdata {
            record_type,
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns an algorithm or digest this crate
    /// cannot process, as opposed to malformed data.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            DnssecError::UnsupportedAlgorithm(_) | DnssecError::UnsupportedDigestType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DnssecError>;
