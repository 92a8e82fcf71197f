use crate::{config::IpSource, routes::AppState};
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

pub const X_REAL_IP: &str = "x-real-ip";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientAddrError {
    #[error("peer address is not available on the connection")]
    MissingPeer,

    #[error("request has no `{0}` header")]
    MissingHeader(&'static str),

    #[error("client address is not an IP address: {0:?}")]
    Unparseable(String),

    #[error("client address has no fourth octet: {0}")]
    NotIpv4(IpAddr),
}

/// Client address resolved through the configured [`IpSource`].
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub IpAddr);

impl FromRequestParts<AppState> for ClientAddr {
    type Rejection = crate::error::AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = match state.ip_source {
            IpSource::ConnectInfo => {
                ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
                    .await
                    .ok()
                    .map(|ConnectInfo(peer)| peer)
            }
            _ => None,
        };

        let addr = resolve(state.ip_source, &parts.headers, peer)?;
        Ok(Self(addr))
    }
}

pub fn resolve(
    source: IpSource,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) -> Result<IpAddr, ClientAddrError> {
    match source {
        IpSource::ConnectInfo => peer
            .map(|peer| peer.ip())
            .ok_or(ClientAddrError::MissingPeer),
        IpSource::XRealIp => parse_addr(header_str(headers, X_REAL_IP)?),
        IpSource::XForwardedFor => {
            let forwarded = header_str(headers, X_FORWARDED_FOR)?;
            // Left-most entry is the originating client.
            let first = forwarded.split(',').next().unwrap_or_default();
            parse_addr(first)
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, ClientAddrError> {
    let value = headers
        .get(name)
        .ok_or(ClientAddrError::MissingHeader(name))?;

    value.to_str().map_err(|_| {
        ClientAddrError::Unparseable(String::from_utf8_lossy(value.as_bytes()).into_owned())
    })
}

/// Parses a bare IP address, tolerating a trailing port.
pub fn parse_addr(value: &str) -> Result<IpAddr, ClientAddrError> {
    let value = value.trim();

    value
        .parse::<IpAddr>()
        .or_else(|_| value.parse::<SocketAddr>().map(|addr| addr.ip()))
        .map_err(|_| ClientAddrError::Unparseable(value.to_owned()))
}

/// Fourth octet of an IPv4 (or IPv4-mapped IPv6) address.
pub fn node_number(addr: IpAddr) -> Result<u8, ClientAddrError> {
    match addr.to_canonical() {
        IpAddr::V4(v4) => Ok(v4.octets()[3]),
        IpAddr::V6(_) => Err(ClientAddrError::NotIpv4(addr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn node_number_is_fourth_octet() {
        assert_eq!(node_number("10.0.0.42".parse().unwrap()), Ok(42));
        assert_eq!(node_number("192.168.1.5".parse().unwrap()), Ok(5));
        assert_eq!(node_number("::ffff:10.0.0.7".parse().unwrap()), Ok(7));
    }

    #[test]
    fn node_number_rejects_ipv6() {
        let loopback: IpAddr = "::1".parse().unwrap();
        assert_eq!(node_number(loopback), Err(ClientAddrError::NotIpv4(loopback)));
    }

    #[test]
    fn parse_addr_rejects_short_dotted_forms() {
        assert_eq!(
            parse_addr("10.0.0"),
            Err(ClientAddrError::Unparseable("10.0.0".to_owned()))
        );
        assert!(parse_addr("node-4.cluster").is_err());
    }

    #[test]
    fn parse_addr_strips_port() {
        assert_eq!(parse_addr(" 10.1.2.3:4567 "), Ok("10.1.2.3".parse().unwrap()));
    }

    #[test]
    fn connect_info_uses_peer() {
        let peer = SocketAddr::from(([172, 16, 0, 9], 40000));
        assert_eq!(
            resolve(IpSource::ConnectInfo, &HeaderMap::new(), Some(peer)),
            Ok(peer.ip())
        );
        assert_eq!(
            resolve(IpSource::ConnectInfo, &HeaderMap::new(), None),
            Err(ClientAddrError::MissingPeer)
        );
    }

    #[test]
    fn connect_info_ignores_proxy_headers() {
        let peer = SocketAddr::from(([172, 16, 0, 9], 40000));
        let headers = headers(X_REAL_IP, "10.0.0.1");

        assert_eq!(
            resolve(IpSource::ConnectInfo, &headers, Some(peer)),
            Ok(peer.ip())
        );
    }

    #[test]
    fn x_real_ip_header() {
        let headers = headers(X_REAL_IP, "10.20.30.40");
        assert_eq!(
            resolve(IpSource::XRealIp, &headers, None),
            Ok("10.20.30.40".parse().unwrap())
        );
        assert_eq!(
            resolve(IpSource::XRealIp, &HeaderMap::new(), None),
            Err(ClientAddrError::MissingHeader(X_REAL_IP))
        );
    }

    #[test]
    fn x_forwarded_for_takes_left_most_entry() {
        let headers = headers(X_FORWARDED_FOR, "10.9.8.7, 172.16.0.1, 172.16.0.2");
        assert_eq!(
            resolve(IpSource::XForwardedFor, &headers, None),
            Ok("10.9.8.7".parse().unwrap())
        );
    }
}
