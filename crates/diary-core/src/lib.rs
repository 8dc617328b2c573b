//! # Diary Core
//!
//! Core library for Diary - a private, append-only journal encrypted
//! end-to-end and synced as a single opaque blob.
//!
//! The server only ever stores ciphertext; everything that understands the
//! journal lives here, on the client side.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation and the AES-256-CBC blob cipher
//! - **document**: revision-history model and encrypted load/save
//! - **sync**: blob transport (HTTP client + trait seam)
//! - **session**: explicit client session and its state machine

pub mod crypto;
pub mod document;
pub mod error;
pub mod session;
pub mod sync;

pub use document::{Journal, JournalEntry, Revision};
pub use error::{DiaryError, Result};
pub use session::{Session, SessionState};
pub use sync::{BlobTransport, SyncClient, VersionToken};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
