//! # World-Ledger Test Suite
//!
//! Unified test crate covering the cross-subsystem write path:
//!
//! ```text
//! tests/src/
//! └── integration/      # intent → envelope → hash → consensus → projection
//!     ├── write_path.rs # end-to-end pipeline properties
//!     └── race.rs       # concurrent duplicate submissions
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p wl-tests
//!
//! # By category
//! cargo test -p wl-tests integration::
//! ```

pub mod integration;
