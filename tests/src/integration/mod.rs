//! Integration flows across the gateway's modules.

pub mod channel_flows;
pub mod http_flows;
