//! TCP implementation of the transport.

use super::{RpcReply, RpcRequest, Transport, TransportError};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

/// Socket transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Model server host
    pub host: String,
    /// Model server port
    pub port: u16,
    /// Bound on establishing the connection
    pub connect_timeout: Duration,
    /// Bound on each blocking read or write once connected
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9999,
            connect_timeout: Duration::from_millis(2000),
            read_timeout: Duration::from_millis(30_000),
        }
    }
}

impl TransportConfig {
    /// `host:port` as written in log lines
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Transport opening one TCP connection per call.
#[derive(Debug, Clone, Default)]
pub struct SocketTransport {
    config: TransportConfig,
}

fn classify_io(err: std::io::Error, phase: &'static str) -> TransportError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => TransportError::Timeout { phase },
        _ => TransportError::Io(err),
    }
}

/// Time left before `deadline`, `None` once it has passed.
fn remaining(deadline: Instant, now: Instant) -> Option<Duration> {
    deadline
        .checked_duration_since(now)
        .filter(|left| !left.is_zero())
}

impl SocketTransport {
    /// Create a transport for the given server
    #[must_use]
    pub const fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>, TransportError> {
        let address = self.config.address();
        let addrs: Vec<SocketAddr> = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(|_| TransportError::AddressResolution(address.clone()))?
            .collect();
        if addrs.is_empty() {
            return Err(TransportError::AddressResolution(address));
        }
        Ok(addrs)
    }

    /// Try each resolved address in turn; all attempts share one connect timeout.
    fn connect(&self) -> Result<TcpStream, TransportError> {
        let addrs = self.resolve()?;
        let deadline = Instant::now() + self.config.connect_timeout;
        let mut last_error = None;
        for addr in addrs {
            let Some(budget) = remaining(deadline, Instant::now()) else {
                last_error = Some(std::io::Error::from(ErrorKind::TimedOut));
                break;
            };
            match TcpStream::connect_timeout(&addr, budget) {
                Ok(stream) => return Ok(stream),
                Err(err) => {
                    tracing::debug!("Connect to {} failed: {}", addr, err);
                    last_error = Some(err);
                }
            }
        }
        let address = self.config.address();
        Err(match last_error {
            Some(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                TransportError::Timeout {
                    phase: "connecting to the model server",
                }
            }
            Some(source) => TransportError::Connect {
                addr: address,
                source,
            },
            None => TransportError::AddressResolution(address),
        })
    }
}

impl Transport for SocketTransport {
    fn exchange(&self, request: &RpcRequest) -> Result<RpcReply, TransportError> {
        let line = request.to_line()?;
        let mut stream = self.connect()?;
        stream.set_read_timeout(Some(self.config.read_timeout))?;
        stream.set_write_timeout(Some(self.config.read_timeout))?;

        stream
            .write_all(line.as_bytes())
            .and_then(|()| stream.flush())
            .map_err(|e| classify_io(e, "sending the request"))?;

        let mut reply_line = String::new();
        let read = BufReader::new(&stream)
            .read_line(&mut reply_line)
            .map_err(|e| classify_io(e, "waiting for the reply"))?;
        if read == 0 {
            return Err(TransportError::EndOfStream);
        }

        tracing::debug!(
            "Model server {} answered {:?} with {} bytes",
            self.config.address(),
            request.function,
            read
        );
        RpcReply::from_line(&reply_line)
    }
}
