//! Message capture files: one base64-encoded wire message per line.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hickory_proto::op::Message;
use std::path::Path;

pub fn read_messages<P: AsRef<Path>>(path: P) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path.as_ref()).context(format!(
        "Failed to read capture file {}",
        path.as_ref().display()
    ))?;
    parse_messages(&content)
}

pub fn parse_messages(content: &str) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let wire = STANDARD
            .decode(line)
            .context(format!("Line {}: invalid base64", index + 1))?;
        let message = Message::from_vec(&wire)
            .context(format!("Line {}: invalid DNS message", index + 1))?;
        messages.push(message);
    }
    tracing::debug!("Parsed {} captured message(s)", messages.len());
    Ok(messages)
}

pub fn write_messages<'a, P: AsRef<Path>>(
    path: P,
    messages: impl IntoIterator<Item = &'a Message>,
) -> Result<()> {
    let mut content = String::new();
    for message in messages {
        if let Some(query) = message.queries().first() {
            content.push_str(&format!("# {} {}\n", query.name(), query.query_type()));
        }
        let wire = message.to_vec().context("Failed to encode DNS message")?;
        content.push_str(&STANDARD.encode(wire));
        content.push('\n');
    }
    std::fs::write(path.as_ref(), content).context(format!(
        "Failed to write capture file {}",
        path.as_ref().display()
    ))
}
