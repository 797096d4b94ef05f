use crate::ds::DsData;
use crate::error::{DnssecError, Result};
use crate::name::zones_in_chain;
use crate::period::DatePeriod;
use crate::question::Question;
use crate::record::answer_records;
use crate::resolver::IntoMessage;
use crate::rrset::RecordSet;
use crate::signed_rrset::SignedRecordSet;
use crate::status::VerificationResult;
use crate::zone::Zone;
use futures::future::try_join_all;
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use std::collections::HashMap;
use std::future::Future;

/// A DNS answer and the DNSKEY/DS messages collected along its delegation
/// path, not yet checked.
#[derive(Debug, Clone)]
pub struct UnverifiedChain {
    query: Question,
    response: Message,
    zone_messages: HashMap<String, Message>,
}

impl UnverifiedChain {
    /// Build the chain out of pre-collected messages.
    ///
    /// Each message is indexed by its first question. Only the DNSKEY and DS
    /// messages of zones on the path to the query name are kept; the message
    /// answering `query` itself is mandatory.
    pub fn from_messages(
        query: Question,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<Self> {
        let mut by_key: HashMap<String, Message> = HashMap::new();
        for message in messages {
            match message.queries().first() {
                Some(first) => {
                    by_key.insert(Question::from(first).key(), message);
                }
                None => tracing::debug!("Ignoring message {} without a question", message.id()),
            }
        }

        let response = by_key
            .get(&query.key())
            .cloned()
            .ok_or_else(|| DnssecError::MissingResponse(query.key()))?;

        let mut zone_messages = HashMap::new();
        for zone in zones_in_chain(query.name()) {
            let mut wanted = vec![query.with(&zone, RecordType::DNSKEY).key()];
            if !zone.is_root() {
                wanted.push(query.with(&zone, RecordType::DS).key());
            }
            for key in wanted {
                if let Some(message) = by_key.remove(&key) {
                    zone_messages.insert(key, message);
                }
            }
        }

        Ok(UnverifiedChain {
            query,
            response,
            zone_messages,
        })
    }

    /// Collect the chain through `resolver`.
    ///
    /// All lookups are independent of each other and run concurrently. A
    /// resolver failure aborts retrieval with [`DnssecError::Resolver`].
    pub async fn retrieve<F, Fut, M>(query: Question, resolver: F) -> Result<Self>
    where
        F: Fn(Question) -> Fut,
        Fut: Future<Output = anyhow::Result<M>>,
        M: IntoMessage,
    {
        let zones = zones_in_chain(query.name());
        let dnskey_lookups = zones
            .iter()
            .map(|zone| resolve(&resolver, query.with(zone, RecordType::DNSKEY)));
        let ds_lookups = zones
            .iter()
            .filter(|zone| !zone.is_root())
            .map(|zone| resolve(&resolver, query.with(zone, RecordType::DS)));

        let (dnskeys, ds, (_, response)) = futures::try_join!(
            try_join_all(dnskey_lookups),
            try_join_all(ds_lookups),
            resolve(&resolver, query.clone()),
        )?;

        tracing::debug!(
            "Retrieved {} zone message(s) for {}",
            dnskeys.len() + ds.len(),
            query.key()
        );
        Ok(UnverifiedChain {
            query,
            response,
            zone_messages: dnskeys.into_iter().chain(ds).collect(),
        })
    }

    pub fn query(&self) -> &Question {
        &self.query
    }

    pub fn response(&self) -> &Message {
        &self.response
    }

    /// Message answering `key`, in `name/TYPE` form.
    pub fn zone_message(&self, key: &str) -> Option<&Message> {
        self.zone_messages.get(key)
    }

    /// Every message in the chain: zone messages ordered by key, then the
    /// response.
    pub fn messages(&self) -> Vec<&Message> {
        let mut keys: Vec<&String> = self.zone_messages.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| &self.zone_messages[key])
            .chain(std::iter::once(&self.response))
            .collect()
    }

    /// Walk the chain of trust from the root down to the zone that signed
    /// the response, then check the response itself.
    pub fn verify(
        &self,
        period: &DatePeriod,
        trust_anchors: &[DsData],
    ) -> Result<VerificationResult<RecordSet>> {
        let root = match self.root_zone(period, trust_anchors)?.into_result() {
            Ok(zone) => zone,
            Err(failure) => return Ok(failure.into()),
        };

        let answer = SignedRecordSet::from_records(&self.query, &answer_records(&self.response)?)?;
        let apex_name = answer
            .signer_names()
            .first()
            .map(|signer| (*signer).clone())
            .unwrap_or_else(|| answer.rrset().name().clone());

        let apex = match self.walk(root, &apex_name, period)?.into_result() {
            Ok(zone) => zone,
            Err(failure) => return Ok(failure.into()),
        };

        if !apex.verify_rrset(&answer, period) {
            tracing::info!("{}: response signature is invalid", self.query.key());
            return Ok(VerificationResult::bogus(
                "Query response does not have a valid signature",
            ));
        }

        tracing::info!("{} is secure (signed by {})", self.query.key(), apex.name());
        Ok(VerificationResult::Secure(answer.rrset().clone()))
    }

    fn root_zone(
        &self,
        period: &DatePeriod,
        trust_anchors: &[DsData],
    ) -> Result<VerificationResult<Zone>> {
        let key = self.query.with(&Name::root(), RecordType::DNSKEY).key();
        let Some(dnskey_message) = self.zone_messages.get(&key) else {
            return Ok(VerificationResult::indeterminate(
                "Cannot initialise root zone without a DNSKEY response",
            ));
        };
        Ok(Zone::init_root(dnskey_message, trust_anchors, period)?
            .augment("Got invalid DNSKEY for root zone"))
    }

    fn walk(
        &self,
        root: Zone,
        apex_name: &Name,
        period: &DatePeriod,
    ) -> Result<VerificationResult<Zone>> {
        let mut parent = root;
        for zone_name in zones_in_chain(apex_name).into_iter().skip(1) {
            let dnskey_key = self.query.with(&zone_name, RecordType::DNSKEY).key();
            let Some(dnskey_message) = self.zone_messages.get(&dnskey_key) else {
                return Ok(VerificationResult::indeterminate(format!(
                    "Cannot verify zone {} without a DNSKEY response",
                    zone_name
                )));
            };
            let ds_key = self.query.with(&zone_name, RecordType::DS).key();
            let Some(ds_message) = self.zone_messages.get(&ds_key) else {
                return Ok(VerificationResult::indeterminate(format!(
                    "Cannot verify zone {} without a DS response",
                    zone_name
                )));
            };

            let child = parent.init_child(&zone_name, dnskey_message, ds_message, period)?;
            parent = match child.into_result() {
                Ok(zone) => zone,
                Err(failure) => {
                    tracing::info!("{}: zone {} failed verification", self.query.key(), zone_name);
                    return Ok(failure
                        .augment(format!("Failed to verify zone {}", zone_name))
                        .into());
                }
            };
        }
        Ok(VerificationResult::Secure(parent))
    }
}

async fn resolve<F, Fut, M>(resolver: &F, question: Question) -> Result<(String, Message)>
where
    F: Fn(Question) -> Fut,
    Fut: Future<Output = anyhow::Result<M>>,
    M: IntoMessage,
{
    let key = question.key();
    tracing::debug!("Resolving {}", key);
    let answer = resolver(question)
        .await
        .map_err(|source| DnssecError::Resolver {
            question: key.clone(),
            source,
        })?;
    Ok((key, answer.into_message()?))
}
