//! Network bring-up for hosts where the OS already manages Wi-Fi.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::transport::Endpoint;

use super::NetworkLink;

/// A link that is up before the process starts.
///
/// Credentials are not used. The local address is discovered by routing a
/// UDP socket toward the camera; no packet is sent.
#[derive(Debug, Clone)]
pub struct PreassociatedLink {
    camera: Endpoint,
}

impl PreassociatedLink {
    /// Creates a link that routes toward `camera`.
    #[inline]
    #[must_use]
    pub fn new(camera: Endpoint) -> Self {
        Self { camera }
    }
}

#[async_trait]
impl NetworkLink for PreassociatedLink {
    async fn connect(&mut self, credentials: &Credentials) -> Result<IpAddr> {
        if !credentials.ssid.is_empty() {
            warn!(ssid = %credentials.ssid, "Wi-Fi is managed by the host; SSID ignored");
        }

        let unspecified = if self.camera.host.contains(':') {
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        };
        let socket = UdpSocket::bind((unspecified, 0))
            .await
            .map_err(|e| Error::link(e.to_string()))?;
        socket
            .connect((self.camera.host.as_str(), self.camera.port))
            .await
            .map_err(|e| Error::link(format!("no route to {}: {e}", self.camera.host)))?;

        let local = socket.local_addr().map_err(|e| Error::link(e.to_string()))?.ip();
        info!(ip = %local, "Network link up");
        Ok(local)
    }
}
