use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

// Errors returned by access-token verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid 'user.id' claim (expected UUID)")]
    InvalidUserId,
}

/// Access token claims. The identity lives in a nested `user.id` object,
/// matching what the login service issues.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    pub user: UserClaim,
    pub exp: u64,
}

#[derive(Debug, Deserialize)]
pub struct UserClaim {
    pub id: String,
}

/// HS256 access-token verifier.
///
/// Signature and `exp` are always checked; a token that merely decodes is
/// not accepted.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify signature + expiry and extract the identity claim.
    ///
    /// Pure; no side effects. Callers attach the returned id to the request
    /// context for downstream handlers.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        Uuid::parse_str(&data.claims.user.id).map_err(|_| TokenError::InvalidUserId)
    }
}

/// Mint a token the way the login service does. Test use only.
#[cfg(test)]
pub fn issue(secret: &str, user_id: &str, exp: u64) -> String {
    use jsonwebtoken::{EncodingKey, Header};

    let claims = serde_json::json!({ "user": { "id": user_id }, "exp": exp });
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
