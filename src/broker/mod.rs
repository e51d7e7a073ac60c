//! Broker session implementations

pub mod auth;
pub mod bridge;
pub mod messages;
pub mod paper;

pub use bridge::BridgeBrokerClient;
pub use paper::PaperBroker;
