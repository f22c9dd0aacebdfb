//! Admin session flag store seam
//!
//! The admin guard is a presentational gate over a single persisted
//! boolean. The flag is opaque client-local state, not a token to be
//! trusted for real authorization; the trait keeps that explicit and
//! swappable.

use async_trait::async_trait;

use crate::error::Result;

/// Persisted admin session flag
///
/// Lifecycle: absent/false at first visit, set on successful login,
/// cleared on logout. There is no expiry and no server-side validation.
#[async_trait]
pub trait AdminSessionStore: Send + Sync {
    /// Read the flag; absent means false
    async fn is_authenticated(&self) -> Result<bool>;

    /// Set the flag after a successful login
    async fn set_authenticated(&self) -> Result<()>;

    /// Clear the flag on logout
    async fn clear(&self) -> Result<()>;
}
