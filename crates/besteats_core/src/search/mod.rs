//! Nearby place search.
//!
//! # Responsibility
//! - Define the injected place search contract and its error taxonomy.
//! - Decode the keyword search payload of the Kakao local API.
//! - Run searches off the consumer thread with timeout and cancellation.

pub mod client;
pub mod dispatch;
pub mod kakao;
