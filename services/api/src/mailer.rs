//! Confirmation-code delivery
//!
//! Actual mail transport lives outside this service. The mailer logs the
//! outgoing message so the code is reachable in development and the send
//! call sites stay in place for a real transport.

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::info;

const CONFIRMATION_CODE_LENGTH: usize = 24;

/// Confirmation-code mailer
#[derive(Debug, Clone)]
pub struct Mailer {
    from_address: String,
}

impl Mailer {
    /// Create a new Mailer from environment variables
    ///
    /// # Environment Variables
    /// - `MAIL_FROM`: sender address (default: `noreply@revue.local`)
    pub fn from_env() -> Self {
        let from_address =
            std::env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@revue.local".to_string());

        Mailer { from_address }
    }

    /// Send a confirmation code to a user's email address
    pub fn send_confirmation_code(&self, email: &str, code: &str) {
        info!(
            from = %self.from_address,
            to = %email,
            "Confirmation code issued: {}",
            code
        );
    }
}

/// Generate a random alphanumeric confirmation code
pub fn generate_confirmation_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CONFIRMATION_CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_codes_are_alphanumeric_and_unique() {
        let a = generate_confirmation_code();
        let b = generate_confirmation_code();

        assert_eq!(a.len(), CONFIRMATION_CODE_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
