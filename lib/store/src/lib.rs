//! # edurec Store
//!
//! Persistence layer for the edurec learning portal:
//!
//! - [`ArtifactStore`] - loads the pre-trained artifacts once at startup,
//!   degrading each pipeline to an unavailable sentinel on failure
//! - [`UserStore`] - JSON-document user store with in-lock username
//!   uniqueness and atomic writes
//! - [`password`] - Argon2id credential hashing at the store boundary

pub mod artifacts;
pub mod password;
pub mod users;

pub use artifacts::ArtifactStore;
pub use password::{hash_password, verify_password};
pub use users::{NewUser, UserRecord, UserStore};
