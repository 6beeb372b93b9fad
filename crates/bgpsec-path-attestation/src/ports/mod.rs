//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that BGP speakers call
//! - **Outbound (Driven)**: key store, signature scheme and clock

pub mod inbound;
pub mod outbound;
