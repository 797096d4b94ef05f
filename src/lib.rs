//! DNSSEC chain-of-trust verification.
//!
//! An [`UnverifiedChain`] gathers a DNS answer together with the DNSKEY and
//! DS messages of every zone from the root down to the answering zone, and
//! [`UnverifiedChain::verify`] classifies it as secure, insecure, bogus or
//! indeterminate against a set of trust anchors.

pub mod algorithm;
pub mod chain;
pub mod dnskey;
pub mod ds;
pub mod error;
pub mod name;
pub mod period;
pub mod public_key;
pub mod question;
pub mod record;
pub mod resolver;
pub mod rrset;
pub mod rrsig;
pub mod signed_rrset;
pub mod status;
pub mod zone;

#[cfg(test)]
pub(crate) mod proptest_helpers;
#[cfg(test)]
pub(crate) mod zone_signer;

pub use algorithm::{DigestType, DnssecAlgorithm};
pub use chain::UnverifiedChain;
pub use dnskey::{DnskeyData, DnskeyFlags, DnskeyRecord};
pub use ds::{DsData, DsRecord};
pub use error::{DnssecError, Result};
pub use period::DatePeriod;
pub use public_key::PublicKey;
pub use question::Question;
pub use record::Record;
pub use resolver::IntoMessage;
pub use rrset::RecordSet;
pub use rrsig::{RrsigData, RrsigRecord};
pub use signed_rrset::SignedRecordSet;
pub use status::{Failure, SecurityStatus, VerificationResult};
pub use zone::Zone;
