//! Messaging platform clients for Drumbeat.
//!
//! Each client implements the core [`MessagingClient`] trait for one
//! platform. The scheduler is platform-agnostic; it only sees the trait.
//!
//! Available clients:
//! - **Discord** — Discord REST API v10
//!
//! [`MessagingClient`]: drumbeat_core::MessagingClient

pub mod discord;

pub use discord::DiscordClient;
