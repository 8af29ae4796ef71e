//! Session-token verification.
//!
//! The identity provider issues RS256-signed session tokens; the `sub`
//! claim carries the provider's stable user reference. The server only
//! verifies tokens, it never issues them.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use mingle_common::config::IdentityConfig;
use mingle_common::{AppError, AppResult};
use serde::Deserialize;

/// Claims extracted from a session token.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Verifier for identity-provider session tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier from the identity configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key_pem.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid identity public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&config.issuer]);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify a session token and return the external identity reference.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;
        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}
