//! Centralized demo constants
//!
//! Single source of truth for the literals the demo flow is built on.
//! Every one of these is a stand-in for a value a real deployment would
//! obtain elsewhere (delivered OTPs, an identity provider, a CRM
//! endpoint); they are centralized here so no other crate hardcodes them.

/// One-time passcode demo values
pub mod otp {
    /// The only code the demo verifier accepts
    pub const DEMO_ACCEPTED_CODE: &str = "123456";

    /// Inline error shown for any non-matching code
    pub const MISMATCH_ERROR: &str = "Invalid OTP. For demo, use 123456.";
}

/// Admin login demo values
pub mod admin {
    /// Demo login email
    pub const DEMO_EMAIL: &str = "admin@siaptenang.id";

    /// Demo login password (plaintext; this is a demo gate, not auth)
    pub const DEMO_PASSWORD: &str = "admin123";

    /// Key the session flag is persisted under
    pub const SESSION_FLAG_KEY: &str = "admin_auth";

    /// Inline error shown on credential mismatch
    pub const LOGIN_ERROR: &str = "Email atau password yang Anda masukkan salah.";
}

/// Admin route paths used by the guard
pub mod routes {
    pub const ADMIN_HOME: &str = "/admin";
    pub const ADMIN_LOGIN: &str = "/admin/login";
}

/// Simulated latency defaults (milliseconds)
///
/// Pacing only, not correctness requirements: zero is a valid setting
/// everywhere.
pub mod delays {
    /// Simulated third-party OTP dispatch call
    pub const OTP_DISPATCH_MS: u64 = 2000;

    /// Simulated login backend call
    pub const LOGIN_MS: u64 = 1200;
}

/// Messaging deep-link defaults
pub mod messaging {
    /// Consultation line the share link points at
    pub const WHATSAPP_PHONE: &str = "15550000000";

    /// Share message template; `{score}` and `{category}` are substituted
    pub const SHARE_TEMPLATE: &str =
        "Hi, I scored {score} ({category}) on the assessment. I'd like to consult.";
}
