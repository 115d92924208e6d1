// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP protocol implementation for Kasa devices.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol, xor};

/// Responses larger than this are treated as corrupt frames.
const MAX_FRAME_LEN: usize = 1024 * 1024;

// ============================================================================
// TcpConfig - Connection parameters
// ============================================================================

/// Configuration for a Kasa device reachable over the local TCP protocol.
///
/// # Examples
///
/// ```
/// use kasa_lib::protocol::TcpConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = TcpConfig::new("192.168.1.100");
///
/// // With all options
/// let config = TcpConfig::new("192.168.1.100")
///     .with_port(9999)
///     .with_timeout(Duration::from_secs(2))
///     .with_retry_count(1);
/// ```
#[derive(Debug, Clone)]
pub struct TcpConfig {
    host: String,
    port: u16,
    timeout: Duration,
    retry_count: u32,
}

impl TcpConfig {
    /// Default port of the Kasa local protocol.
    pub const DEFAULT_PORT: u16 = 9999;
    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default number of additional attempts after a failed one.
    pub const DEFAULT_RETRY_COUNT: u32 = 3;

    /// Creates a new TCP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the Kasa device
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            retry_count: Self::DEFAULT_RETRY_COUNT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a failed request is retried.
    #[must_use]
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry count.
    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Returns the `host:port` socket address string.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Creates a `TcpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty.
    pub fn into_client(self) -> Result<TcpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        Ok(TcpClient {
            config: self,
            lock: Mutex::new(()),
        })
    }
}

// ============================================================================
// TcpClient - XOR-framed JSON over TCP
// ============================================================================

/// TCP client for communicating with Kasa devices.
///
/// A new connection is opened for every request. Requests issued through the
/// same client are serialized, since devices drop concurrent connections.
///
/// # Examples
///
/// ```no_run
/// use kasa_lib::protocol::{Protocol, TcpClient};
///
/// # async fn example() -> kasa_lib::Result<()> {
/// let client = TcpClient::new("192.168.1.100")?;
/// let response = client.send_raw(r#"{"system":{"get_sysinfo":{}}}"#).await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TcpClient {
    config: TcpConfig,
    lock: Mutex<()>,
}

impl TcpClient {
    /// Creates a new TCP client for the specified host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        TcpConfig::new(host).into_client()
    }

    /// Returns the configuration of this client.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Performs a single request/response exchange bounded by the timeout.
    async fn exchange(&self, request: &str) -> Result<String, ProtocolError> {
        let timeout = self.config.timeout;
        tokio::time::timeout(timeout, self.exchange_unbounded(request))
            .await
            .map_err(|_| {
                ProtocolError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
            })?
    }

    async fn exchange_unbounded(&self, request: &str) -> Result<String, ProtocolError> {
        let address = self.config.address();
        let mut stream = TcpStream::connect(&address)
            .await
            .map_err(|e| ProtocolError::ConnectionFailed(format!("{address}: {e}")))?;

        stream.write_all(&xor::encrypt(request)).await?;

        let mut header = [0u8; xor::HEADER_LEN];
        stream.read_exact(&mut header).await?;
        let len = xor::payload_len(header);
        if len > MAX_FRAME_LEN {
            return Err(ProtocolError::Framing(format!(
                "frame of {len} bytes exceeds {MAX_FRAME_LEN}"
            )));
        }

        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).await?;

        xor::decrypt(&payload)
    }
}

impl Protocol for TcpClient {
    async fn send_raw(&self, request: &str) -> Result<CommandResponse, ProtocolError> {
        let _guard = self.lock.lock().await;

        tracing::debug!(host = %self.config.host, request = %request, "Sending TCP request");

        let mut attempt = 0;
        loop {
            match self.exchange(request).await {
                Ok(body) => {
                    tracing::debug!(body = %body, "Received TCP response");
                    return Ok(CommandResponse::new(body));
                }
                Err(e) if attempt < self.config.retry_count => {
                    attempt += 1;
                    tracing::warn!(
                        host = %self.config.host,
                        attempt,
                        error = %e,
                        "Request failed, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Builder for creating a TCP client with custom configuration.
#[derive(Debug, Default)]
pub struct TcpClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
    retry_count: Option<u32>,
}

impl TcpClientBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry count.
    #[must_use]
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Builds the TCP client.
    ///
    /// # Errors
    ///
    /// Returns error if host is not set or empty.
    pub fn build(self) -> Result<TcpClient, ProtocolError> {
        let host = self
            .host
            .ok_or_else(|| ProtocolError::InvalidAddress("host is required".to_string()))?;

        let mut config = TcpConfig::new(host);
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(retry_count) = self.retry_count {
            config = config.with_retry_count(retry_count);
        }
        config.into_client()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcp_config_default_values() {
        let config = TcpConfig::new("192.168.1.100");
        assert_eq!(config.host(), "192.168.1.100");
        assert_eq!(config.port(), 9999);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_count(), 3);
    }

    #[test]
    fn tcp_config_builder_chain() {
        let config = TcpConfig::new("192.168.1.100")
            .with_port(10000)
            .with_timeout(Duration::from_secs(1))
            .with_retry_count(0);

        assert_eq!(config.port(), 10000);
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert_eq!(config.retry_count(), 0);
    }

    #[test]
    fn tcp_config_address() {
        let config = TcpConfig::new("192.168.1.100");
        assert_eq!(config.address(), "192.168.1.100:9999");
    }

    #[test]
    fn tcp_config_empty_host_rejected() {
        let result = TcpConfig::new("  ").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn builder_missing_host() {
        let result = TcpClientBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_with_all_options() {
        let client = TcpClientBuilder::new()
            .host("192.168.1.100")
            .port(9998)
            .timeout(Duration::from_secs(2))
            .retry_count(1)
            .build()
            .unwrap();

        assert_eq!(client.config().port(), 9998);
        assert_eq!(client.config().timeout(), Duration::from_secs(2));
        assert_eq!(client.config().retry_count(), 1);
    }
}
