//! Chat relay connection

pub mod gateway;
pub mod messages;

pub use gateway::{ChatGateway, MessageFilter, ReconnectPolicy};
