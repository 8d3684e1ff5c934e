//! # ledgerkit Testkit
//!
//! Testing utilities for ledgerkit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned canonical frames and digests
//! - **Generators**: Proptest strategies for keys and records
//! - **Fixtures**: A sample record type and a ready-made in-memory ledger
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ledgerkit_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hash) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, hash);
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ledgerkit_testkit::fixtures::{sample_assets, seed_assets, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let ctx = fixture.context();
//! seed_assets(&ctx, &sample_assets(3)).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{random_tx_id, sample_assets, seed_assets, SampleAsset, TestFixture};
pub use generators::{asset_set, blank_key, flat_record, ledger_key, sample_asset};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
