mod capture;
mod config;
mod transport;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use config::Config;
use dnssec_chain::{DatePeriod, Question, SecurityStatus, UnverifiedChain, VerificationResult};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::UdpResolver;

/// Verify the DNSSEC chain of trust for a DNS answer.
#[derive(Debug, Parser)]
#[command(name = "dnssec-chain", version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verify messages from a capture file instead of querying the resolver
    #[arg(long)]
    messages: Option<PathBuf>,

    /// Write every message of the chain to a capture file
    #[arg(long)]
    save_messages: Option<PathBuf>,

    /// Instant to check signature validity at (RFC 3339, default: now)
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Domain name to verify
    name: String,

    /// Record type to verify
    #[arg(default_value = "A")]
    record_type: String,
}

#[derive(Debug, Serialize)]
struct Report {
    query: String,
    status: SecurityStatus,
    reasons: Vec<String>,
    records: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .context(format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    // Logs go to stderr, the report to stdout
    let log_level = config.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dnssec_chain={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate().context("Configuration validation failed")?;
    let trust_anchors = config.ds_data()?;

    let name = Name::from_str(&args.name).context(format!("Invalid domain name: {}", args.name))?;
    let record_type = RecordType::from_str(&args.record_type.to_uppercase())
        .context(format!("Invalid record type: {}", args.record_type))?;
    let question = Question::new(&name, record_type, DNSClass::IN);

    let chain = match &args.messages {
        Some(path) => {
            tracing::info!("Loading messages from {}", path.display());
            UnverifiedChain::from_messages(question, capture::read_messages(path)?)?
        }
        None => {
            let upstream = config.upstream()?;
            tracing::info!("Retrieving chain for {} via {}", question.key(), upstream);
            let resolver = UdpResolver::new(upstream, config.timeout());
            UnverifiedChain::retrieve(question, |question| resolver.resolve(question)).await?
        }
    };

    if let Some(path) = &args.save_messages {
        capture::write_messages(path, chain.messages())?;
        tracing::info!("Saved messages to {}", path.display());
    }

    let period = args.at.map(DatePeriod::instant).unwrap_or_else(DatePeriod::now);
    let result = chain.verify(&period, &trust_anchors)?;

    let report = build_report(chain.query(), &result);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if result.is_secure() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_report(query: &Question, result: &VerificationResult<dnssec_chain::RecordSet>) -> Report {
    let records = match result {
        VerificationResult::Secure(rrset) => {
            rrset.records().iter().map(ToString::to_string).collect()
        }
        _ => Vec::new(),
    };
    Report {
        query: query.to_string(),
        status: result.status(),
        reasons: result.reason_chain().to_vec(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnssec_chain::{Record, RecordSet};

    fn question() -> Question {
        Question::new(&Name::from_str("example.com.").unwrap(), RecordType::A, DNSClass::IN)
    }

    #[test]
    fn test_secure_report_lists_records() {
        let record = Record::new(
            question().name(),
            RecordType::A,
            DNSClass::IN,
            60,
            vec![192, 0, 2, 1],
        );
        let rrset = RecordSet::new(&question(), [&record]).unwrap();

        let report = build_report(&question(), &VerificationResult::Secure(rrset));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "SECURE");
        assert_eq!(json["query"], "example.com. IN A");
        assert_eq!(json["records"].as_array().unwrap().len(), 1);
        assert!(json["reasons"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_failure_report_lists_reasons() {
        let result: VerificationResult<RecordSet> =
            VerificationResult::bogus("Could not find at least one valid DS record")
                .augment("Failed to verify zone com.");

        let report = build_report(&question(), &result);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "BOGUS");
        assert_eq!(
            json["reasons"],
            serde_json::json!([
                "Failed to verify zone com.",
                "Could not find at least one valid DS record"
            ])
        );
        assert!(json["records"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "dnssec-chain",
            "-c",
            "config.yaml",
            "--at",
            "2023-11-14T22:13:20Z",
            "example.com",
            "dnskey",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("config.yaml")));
        assert_eq!(args.at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(args.record_type, "dnskey");
        assert!(args.messages.is_none());
    }
}
