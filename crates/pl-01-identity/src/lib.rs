//! # Identity Module
//!
//! Generates and validates the short numeric rendezvous code and derives the
//! namespaced identifier used to address a peer on the transport layer.
//!
//! ## Contract
//!
//! - [`generate_code`] draws uniformly from `10000..=99999`. Two sessions
//!   drawing the same code is a transport-level failure (address already in
//!   use), not something this module guards against.
//! - [`is_valid_code`] is a pure predicate over text or integer input.
//! - [`derive_identifier`] is deterministic for a given code and draws a
//!   fresh one when none is given.
//!
//! ## Example
//!
//! ```rust
//! use pl_01_identity::{derive_identifier, is_valid_code, parse_code};
//!
//! assert!(is_valid_code("10000"));
//! assert!(!is_valid_code("99999a"));
//! assert!(!is_valid_code(100_000));
//!
//! let code = parse_code("12345").unwrap();
//! assert_eq!(derive_identifier(Some(code)), derive_identifier(Some(code)));
//! ```

pub mod code;
pub mod namespace;

pub use code::{generate_code, generate_code_with, is_valid_code, parse_code, CodeCandidate};
pub use namespace::{derive_identifier, IdentityNamespace, DEFAULT_NAMESPACE};

// Vocabulary re-exports so callers need only this crate for identity work.
pub use shared_types::{Code, CodeError, PeerIdentifier};
