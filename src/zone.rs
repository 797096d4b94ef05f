use crate::dnskey::DnskeyRecord;
use crate::ds::{DsData, DsRecord};
use crate::error::Result;
use crate::period::DatePeriod;
use crate::question::Question;
use crate::record::{Record, answer_records};
use crate::signed_rrset::SignedRecordSet;
use crate::status::VerificationResult;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RecordType};

/// A zone whose DNSKEY RRset has been authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: Name,
    dnskeys: Vec<DnskeyRecord>,
}

impl Zone {
    /// Authenticate the DNSKEY RRset of `zone_name` from `dnskey_message`.
    ///
    /// At least one DNSKEY must be designated by `ds_data`, and the RRset
    /// must carry an RRSIG, valid during `period`, made by one of those keys.
    pub fn init(
        zone_name: &Name,
        dnskey_message: &Message,
        ds_data: &[DsData],
        period: &DatePeriod,
    ) -> Result<VerificationResult<Zone>> {
        if let Some(reason) = unexpected_rcode("DNSKEY", dnskey_message) {
            return Ok(VerificationResult::insecure(reason));
        }

        let question = Question::new(zone_name, RecordType::DNSKEY, DNSClass::IN);
        let signed = SignedRecordSet::from_records(&question, &answer_records(dnskey_message)?)?;
        let dnskeys = parse_supported(signed.rrset().records(), DnskeyRecord::from_record)?;

        let entry_points: Vec<DnskeyRecord> = dnskeys
            .iter()
            .filter(|dnskey| ds_data.iter().any(|ds| ds.verify_dnskey(dnskey)))
            .cloned()
            .collect();
        if entry_points.is_empty() {
            return Ok(VerificationResult::bogus("No DNSKEY matched specified DS(s)"));
        }

        if !signed.verify(&entry_points, period, None) {
            return Ok(VerificationResult::bogus("No valid DNSKEY RRSig was found"));
        }

        tracing::debug!(
            "Zone {} initialised with {} DNSKEY(s)",
            question.name(),
            dnskeys.len()
        );
        Ok(VerificationResult::Secure(Zone {
            name: question.name().clone(),
            dnskeys,
        }))
    }

    /// Authenticate the root zone against the configured trust anchors.
    pub fn init_root(
        dnskey_message: &Message,
        trust_anchors: &[DsData],
        period: &DatePeriod,
    ) -> Result<VerificationResult<Zone>> {
        Zone::init(&Name::root(), dnskey_message, trust_anchors, period)
    }

    /// Authenticate the delegated child `zone_name`.
    ///
    /// The DS RRset in `ds_message` must be signed by this zone, then it
    /// anchors the child's DNSKEY RRset.
    pub fn init_child(
        &self,
        zone_name: &Name,
        dnskey_message: &Message,
        ds_message: &Message,
        period: &DatePeriod,
    ) -> Result<VerificationResult<Zone>> {
        if let Some(reason) = unexpected_rcode("DS", ds_message) {
            return Ok(VerificationResult::insecure(reason));
        }

        let question = Question::new(zone_name, RecordType::DS, DNSClass::IN);
        let signed = SignedRecordSet::from_records(&question, &answer_records(ds_message)?)?;
        if !signed.verify(&self.dnskeys, period, Some(&self.name)) {
            return Ok(VerificationResult::bogus(
                "Could not find at least one valid DS record",
            ));
        }

        let ds_data: Vec<DsData> = parse_supported(signed.rrset().records(), DsRecord::from_record)?
            .into_iter()
            .map(|ds| ds.data)
            .collect();
        Zone::init(zone_name, dnskey_message, &ds_data, period)
    }

    /// Whether `signed` carries a valid RRSIG made by one of this zone's keys.
    pub fn verify_rrset(&self, signed: &SignedRecordSet, period: &DatePeriod) -> bool {
        signed.verify(&self.dnskeys, period, None)
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn dnskeys(&self) -> &[DnskeyRecord] {
        &self.dnskeys
    }
}

fn unexpected_rcode(record_type: &str, message: &Message) -> Option<String> {
    let rcode = message.response_code();
    if rcode == ResponseCode::NoError {
        return None;
    }
    Some(format!(
        "Expected {} rcode to be NOERROR (0; got {})",
        record_type,
        u16::from(rcode)
    ))
}

/// Parse every record with `parse`, skipping those using an algorithm or
/// digest type this crate cannot handle.
fn parse_supported<T>(
    records: &[Record],
    parse: impl Fn(Record) -> Result<T>,
) -> Result<Vec<T>> {
    let mut parsed = Vec::with_capacity(records.len());
    for record in records {
        match parse(record.clone()) {
            Ok(value) => parsed.push(value),
            Err(e) if e.is_unsupported() => {
                tracing::warn!("Skipping {} record for {}: {}", record.record_type(), record.name(), e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(parsed)
}
