//! # Hub Client Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── codec_benchmarks.rs   # Envelope codec and bus fan-out
//! └── src/
//!     ├── fixtures.rs           # Signed messages and registry events
//!     └── integration/
//!         ├── client_flows.rs   # Facade queries against LocalHub
//!         └── event_service.rs  # Subscription ordering, filters, faults
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hub-tests
//! cargo test -p hub-tests integration::event_service
//!
//! # Benchmarks
//! cargo bench -p hub-tests
//! ```

#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

pub mod fixtures;
pub mod integration;
