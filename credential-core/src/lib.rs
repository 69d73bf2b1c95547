//! Core domain primitives for per-tenant credential resolution: identity
//! extraction from verified tokens, the encrypted credential store, and the
//! stored-vs-fallback resolution seam.

pub mod bundle;
pub mod errors;
pub mod fallback;
pub mod identity;
pub mod kv;
pub mod resolver;
pub mod store;
pub mod token;

pub use bundle::CredentialBundle;
pub use errors::{Error, Result};
pub use fallback::default_bundle;
pub use identity::{extract_tenant_id, TenantId, TENANT_CLAIMS};
pub use kv::{KeyValueStore, MemoryStore};
pub use resolver::CredentialResolver;
pub use store::{CredentialStore, EncryptionKey};
pub use token::AccessToken;
