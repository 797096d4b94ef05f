use anyhow::{Context, Result};
use dnssec_chain::Question;
use hickory_proto::op::{Edns, Message, MessageType, OpCode};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

/// Payload size advertised over EDNS, per the DNS flag day 2020 guidance.
const EDNS_PAYLOAD_SIZE: u16 = 1232;

/// Stub resolver forwarding DNSSEC-enabled queries to an upstream recursor.
pub struct UdpResolver {
    upstream: SocketAddr,
    timeout: Duration,
}

impl UdpResolver {
    pub fn new(upstream: SocketAddr, timeout: Duration) -> Self {
        UdpResolver { upstream, timeout }
    }

    pub async fn resolve(&self, question: Question) -> Result<Message> {
        let request = build_request(&question);
        let request_buf = request
            .to_vec()
            .context("Failed to encode DNS query")?;

        let response = self.exchange_udp(&request_buf).await?;
        check_response(&request, &response)?;
        if !response.truncated() {
            return Ok(response);
        }

        tracing::debug!("Response for {} truncated, retrying over TCP", question.key());
        let response = self.exchange_tcp(&request_buf).await?;
        check_response(&request, &response)?;
        Ok(response)
    }

    async fn exchange_udp(&self, request: &[u8]) -> Result<Message> {
        let bind_addr = if self.upstream.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .context(format!("Failed to bind to {}", bind_addr))?;
        socket
            .connect(self.upstream)
            .await
            .context(format!("Failed to connect to {}", self.upstream))?;
        socket.send(request).await?;

        let mut buf = vec![0u8; usize::from(EDNS_PAYLOAD_SIZE)];
        let len = tokio::time::timeout(self.timeout, socket.recv(&mut buf))
            .await
            .context(format!("Timed out waiting for {} (UDP)", self.upstream))??;

        tracing::trace!("Received {} bytes from {} (UDP)", len, self.upstream);
        Message::from_vec(&buf[..len]).context("Failed to parse DNS response")
    }

    async fn exchange_tcp(&self, request: &[u8]) -> Result<Message> {
        tokio::time::timeout(self.timeout, async {
            let mut stream = TcpStream::connect(self.upstream)
                .await
                .context(format!("Failed to connect to {}", self.upstream))?;

            let mut framed = Vec::with_capacity(request.len() + 2);
            framed.extend_from_slice(&(request.len() as u16).to_be_bytes());
            framed.extend_from_slice(request);
            stream.write_all(&framed).await?;

            let mut len_buf = [0u8; 2];
            stream.read_exact(&mut len_buf).await?;
            let len = usize::from(u16::from_be_bytes(len_buf));
            let mut buf = vec![0u8; len];
            stream.read_exact(&mut buf).await?;

            tracing::trace!("Received {} bytes from {} (TCP)", len, self.upstream);
            Message::from_vec(&buf).context("Failed to parse DNS response")
        })
        .await
        .context(format!("Timed out waiting for {} (TCP)", self.upstream))?
    }
}

/// Recursive query with checking disabled and the DO bit set, so the
/// upstream returns RRSIGs without filtering out bogus data.
pub fn build_request(question: &Question) -> Message {
    let mut request = Message::new();
    request.set_id(rand::random());
    request.set_message_type(MessageType::Query);
    request.set_op_code(OpCode::Query);
    request.set_recursion_desired(true);
    request.set_checking_disabled(true);
    request.add_query(question.to_query());

    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_PAYLOAD_SIZE);
    edns.set_dnssec_ok(true);
    request.set_edns(edns);
    request
}

fn check_response(request: &Message, response: &Message) -> Result<()> {
    if response.id() != request.id() {
        anyhow::bail!(
            "Response ID {} does not match query ID {}",
            response.id(),
            request.id()
        );
    }
    if response.message_type() != MessageType::Response {
        anyhow::bail!("Upstream sent a query instead of a response");
    }
    Ok(())
}
