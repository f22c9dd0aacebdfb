//! Admin credential verification seam

use async_trait::async_trait;

/// Validates admin login credentials
///
/// The guard consumes this interface rather than comparing literals
/// itself, so the demo pair can be replaced by a real identity backend.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns true when the email/password pair is valid
    async fn verify(&self, email: &str, password: &str) -> bool;
}

/// Demo verifier comparing against one fixed plaintext pair
///
/// Explicitly a stand-in: no hashing, no rate limiting, no lockout.
#[derive(Debug, Clone)]
pub struct FixedCredentialVerifier {
    email: String,
    password: String,
}

impl FixedCredentialVerifier {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for FixedCredentialVerifier {
    async fn verify(&self, email: &str, password: &str) -> bool {
        email == self.email && password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_credentials() {
        let verifier = FixedCredentialVerifier::new("admin@example.com", "secret");
        assert!(verifier.verify("admin@example.com", "secret").await);
        assert!(!verifier.verify("admin@example.com", "wrong").await);
        assert!(!verifier.verify("other@example.com", "secret").await);
    }
}
