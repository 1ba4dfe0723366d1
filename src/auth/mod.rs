//! Admin session verification.
//!
//! Admin requests from the embedded app carry an App Bridge session token in
//! `Authorization: Bearer <jwt>`. A [`SessionVerifier`] turns that token into
//! an [`AdminSession`]; the verifier is injected through the router state so
//! tests and other hosts can swap it.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::AuthError;

/// The merchant session an admin handler runs under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSession {
    /// Shop domain, e.g. `example.myshopify.com`
    pub shop: String,
    /// Staff user id from the token subject
    pub user_id: Option<String>,
}

pub trait SessionVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AdminSession, AuthError>;
}

/// Claims carried by a Shopify session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// `https://<shop>/admin`
    pub iss: String,
    /// `https://<shop>`
    pub dest: String,
    /// App API key
    pub aud: String,
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
}

/// Verifies HS256 session tokens signed with the app's API secret
pub struct ShopifySessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl ShopifySessionVerifier {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[api_key]);
        validation.validate_nbf = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(api_secret.as_bytes()),
            validation,
        }
    }
}

impl SessionVerifier for ShopifySessionVerifier {
    fn verify(&self, token: &str) -> Result<AdminSession, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        let claims = data.claims;
        let shop = host_of(&claims.dest)?;
        if host_of(&claims.iss)? != shop {
            return Err(AuthError::ShopMismatch);
        }

        Ok(AdminSession {
            shop,
            user_id: claims.sub,
        })
    }
}

fn host_of(value: &str) -> Result<String, AuthError> {
    Url::parse(value)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| AuthError::InvalidToken(format!("'{}' is not a shop URL", value)))
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const KEY: &str = "app-key";
    const SECRET: &str = "app-secret";

    fn claims() -> SessionClaims {
        let now = Utc::now().timestamp();
        SessionClaims {
            iss: "https://demo.myshopify.com/admin".to_string(),
            dest: "https://demo.myshopify.com".to_string(),
            aud: KEY.to_string(),
            sub: Some("42".to_string()),
            exp: now + 60,
            nbf: now - 5,
            iat: now - 5,
            jti: Some("jti-1".to_string()),
            sid: None,
        }
    }

    fn sign(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_session() {
        let verifier = ShopifySessionVerifier::new(KEY, SECRET);
        let session = verifier.verify(&sign(&claims(), SECRET)).unwrap();
        assert_eq!(session.shop, "demo.myshopify.com");
        assert_eq!(session.user_id.as_deref(), Some("42"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = ShopifySessionVerifier::new(KEY, SECRET);
        let err = verifier.verify(&sign(&claims(), "other")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let verifier = ShopifySessionVerifier::new(KEY, SECRET);
        let mut foreign = claims();
        foreign.aud = "someone-else".to_string();
        assert!(matches!(
            verifier.verify(&sign(&foreign, SECRET)),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = ShopifySessionVerifier::new(KEY, SECRET);
        let mut stale = claims();
        stale.exp = Utc::now().timestamp() - 600;
        assert_eq!(
            verifier.verify(&sign(&stale, SECRET)),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn issuer_must_match_destination() {
        let verifier = ShopifySessionVerifier::new(KEY, SECRET);
        let mut forged = claims();
        forged.iss = "https://evil.myshopify.com/admin".to_string();
        assert_eq!(
            verifier.verify(&sign(&forged, SECRET)),
            Err(AuthError::ShopMismatch)
        );
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(AuthError::MissingToken));
    }
}
