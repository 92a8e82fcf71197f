use super::AppState;
use crate::{
    client_addr::{self, ClientAddr, ClientAddrError},
    error::AppError,
    templates,
};
use axum::{extract::State, http::header, response::IntoResponse};
use serde::Serialize;
use std::net::IpAddr;
use tracing::debug;

pub const CONTENT_TYPE: &str = "text/yaml";

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CloudConfigContext {
    pub private_ip: String,
    pub public_ip: String,
    pub node_num: String,
}

impl CloudConfigContext {
    /// Nodes have a single interface, so the client address serves as both IPs.
    pub fn for_client(addr: IpAddr) -> Result<Self, ClientAddrError> {
        let node_num = client_addr::node_number(addr)?;
        let ip = addr.to_canonical().to_string();

        Ok(Self {
            private_ip: ip.clone(),
            public_ip: ip,
            node_num: node_num.to_string(),
        })
    }
}

#[tracing::instrument(skip(state))]
pub async fn pxe_cloud_config(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
) -> Result<impl IntoResponse, AppError> {
    let context = CloudConfigContext::for_client(addr)?;
    debug!("Rendering cloud-config for node {}", context.node_num);

    let body = state.templates.render(templates::PXE_CLOUD_CONFIG, &context)?;

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}
