//! Backend connectivity as shown in the page header.

use serde::Serialize;

use crate::backend::BackendClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    /// Probe not finished yet.
    #[default]
    Checking,
    Connected,
    Disconnected,
}

impl ConnectivityStatus {
    pub fn from_probe(healthy: bool) -> Self {
        if healthy {
            ConnectivityStatus::Connected
        } else {
            ConnectivityStatus::Disconnected
        }
    }

    /// Run the health probe once.
    pub async fn probe(client: &BackendClient) -> Self {
        Self::from_probe(client.check_health().await)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityStatus::Checking => "checking",
            ConnectivityStatus::Connected => "connected",
            ConnectivityStatus::Disconnected => "disconnected",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectivityStatus::Connected)
    }
}
