//! Outbound ports.

mod raw_api_port;

pub use raw_api_port::RawApiPort;

#[cfg(test)]
pub use raw_api_port::MockRawApiPort;
