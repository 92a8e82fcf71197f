use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub listen: SocketAddr,
    pub templates: PathBuf,
    pub ip_source: IpSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8000)),
            templates: PathBuf::from("templates"),
            ip_source: IpSource::default(),
        }
    }
}

/// Where the client address used for the cloud-config is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IpSource {
    /// The TCP peer address.
    #[default]
    ConnectInfo,

    /// `X-Real-IP`, set by a trusted reverse proxy.
    XRealIp,

    /// Left-most entry of `X-Forwarded-For`, set by a trusted reverse proxy.
    XForwardedFor,
}
