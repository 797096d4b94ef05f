use crate::dnskey::DnskeyRecord;
use crate::error::Result;
use crate::period::DatePeriod;
use crate::question::Question;
use crate::record::Record;
use crate::rrset::RecordSet;
use crate::rrsig::RrsigRecord;
use hickory_proto::rr::{Name, RecordType};

/// An RRset plus the RRSIGs that accompanied it in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRecordSet {
    rrset: RecordSet,
    rrsigs: Vec<RrsigRecord>,
}

impl SignedRecordSet {
    /// Pick the RRset answering `question` out of `records`, along with the
    /// RRSIGs covering it.
    pub fn from_records(question: &Question, records: &[Record]) -> Result<Self> {
        let rrset = RecordSet::new(question, records)?;

        let mut rrsigs = Vec::new();
        for record in records {
            if record.record_type() != RecordType::RRSIG
                || record.class() != question.class()
                || record.name() != question.name()
            {
                continue;
            }
            match RrsigRecord::from_record(record.clone()) {
                Ok(rrsig) if rrsig.data.type_covered() == question.record_type() => {
                    rrsigs.push(rrsig)
                }
                Ok(_) => {}
                Err(e) if e.is_unsupported() => {
                    tracing::warn!("Skipping RRSIG for {}: {}", question.key(), e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(SignedRecordSet { rrset, rrsigs })
    }

    pub fn rrset(&self) -> &RecordSet {
        &self.rrset
    }

    pub fn rrsigs(&self) -> &[RrsigRecord] {
        &self.rrsigs
    }

    pub fn signer_names(&self) -> Vec<&Name> {
        self.rrsigs
            .iter()
            .map(|rrsig| rrsig.data.signer_name())
            .collect()
    }

    /// Whether at least one RRSIG, usable during `period`, validates the
    /// RRset with one of `dnskeys`.
    ///
    /// An RRSIG is only paired with keys owned by its signer. When
    /// `expected_signer` is given, RRSIGs from any other signer are ignored.
    pub fn verify(
        &self,
        dnskeys: &[DnskeyRecord],
        period: &DatePeriod,
        expected_signer: Option<&Name>,
    ) -> bool {
        for rrsig in &self.rrsigs {
            let signer = rrsig.data.signer_name();
            if expected_signer.is_some_and(|expected| expected != signer) {
                tracing::debug!(
                    "Ignoring RRSIG for {} by {}: expected signer {:?}",
                    self.rrset.question().key(),
                    signer,
                    expected_signer.map(ToString::to_string)
                );
                continue;
            }

            let valid = dnskeys
                .iter()
                .filter(|dnskey| dnskey.record.name() == signer)
                .filter(|dnskey| dnskey.data.verify_rrsig(&rrsig.data, period))
                .any(|dnskey| rrsig.data.verify_rrset(&self.rrset, &dnskey.data));
            if valid {
                return true;
            }
        }

        tracing::debug!(
            "No valid RRSIG among {} candidate(s) for {}",
            self.rrsigs.len(),
            self.rrset.question().key()
        );
        false
    }
}
