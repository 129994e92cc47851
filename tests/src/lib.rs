//! # Peer-Link Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/    # Two- and three-peer scenarios over MemorySignalingHub
//! │   ├── rendezvous.rs   # connect, reciprocation, messaging
//! │   └── lifecycle.rs    # disconnects, collisions, restarts
//! └── benches/            # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pl-tests
//! cargo test -p pl-tests integration::rendezvous::
//! cargo bench -p pl-tests
//! ```

pub mod integration;
