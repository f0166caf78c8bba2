use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::{TokenClaims, TokenKind, UserId};
use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MIN_KEY_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    typ: String,
    jti: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// HS256 signer/verifier. The signing key is loaded once at construction;
/// a missing or weak secret is a startup failure, not a runtime error.
pub struct JwtHs256Codec {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtHs256Codec {
    /// Operators may supply the secret either as base64 or as a raw UTF-8
    /// string. Input that is valid, properly padded base64 is decoded;
    /// anything else is taken as raw bytes.
    pub fn from_secret(issuer: impl Into<String>, raw_secret: &str) -> Result<Self> {
        let key = decode_signing_key(raw_secret)?;
        Ok(JwtHs256Codec {
            issuer: issuer.into(),
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
        })
    }

    fn validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = true;
        v.set_issuer(&[self.issuer.clone()]);
        v
    }
}

fn decode_signing_key(raw: &str) -> Result<Vec<u8>> {
    if raw.is_empty() {
        return Err(anyhow!("auth.jwt_secret is required"));
    }

    let looks_base64 = raw.len() % 4 == 0
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=');
    let key = if looks_base64 {
        match BASE64.decode(raw) {
            Ok(bytes) => bytes,
            Err(_) => raw.as_bytes().to_vec(),
        }
    } else {
        raw.as_bytes().to_vec()
    };

    if key.len() < MIN_KEY_BYTES {
        return Err(anyhow!(
            "auth.jwt_secret must be at least {} bytes, got {}",
            MIN_KEY_BYTES,
            key.len()
        ));
    }
    Ok(key)
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn issue(
        &self,
        user_id: UserId,
        email: &str,
        kind: TokenKind,
        jti: &str,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let iat_dt = Utc::now();
        let exp_dt = iat_dt + ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            typ: kind.as_str().to_string(),
            jti: jti.to_string(),
            iss: self.issuer.clone(),
            iat: iat_dt.timestamp(),
            exp: exp_dt.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;
        Ok((token, exp_dt))
    }

    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => AuthError::TokenInvalid,
                _ => AuthError::TokenMalformed,
            }
        })?;

        let claims = data.claims;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::TokenMalformed)?;
        let kind = claims
            .typ
            .parse::<TokenKind>()
            .map_err(|_| AuthError::TokenMalformed)?;

        Ok(TokenClaims {
            user_id,
            email: claims.email,
            kind,
            jti: claims.jti,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The '-' keeps this off the base64 decoding path.
    const SECRET: &str = "0123456789abcdef-0123456789abcdef";
    const ISSUER: &str = "anteroom-test";

    fn codec() -> JwtHs256Codec {
        JwtHs256Codec::from_secret(ISSUER, SECRET).unwrap()
    }

    fn uid() -> UserId {
        UserId(uuid::Uuid::new_v4())
    }

    fn flip_last_char(s: &str) -> String {
        let mut out = s.to_string();
        let last = out.pop().unwrap();
        out.push(if last == 'A' { 'B' } else { 'A' });
        out
    }

    #[tokio::test]
    async fn round_trip_preserves_claims() {
        let codec = codec();
        let user = uid();
        let (token, _) = codec
            .issue(
                user,
                "a@example.com",
                TokenKind::Access,
                "jti-1",
                Duration::from_secs(900),
            )
            .await
            .unwrap();

        let claims = codec.verify(&token).await.unwrap();
        assert_eq!(claims.user_id, user);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.jti, "jti-1");
    }

    #[tokio::test]
    async fn refresh_kind_survives_the_wire() {
        let codec = codec();
        let (token, _) = codec
            .issue(
                uid(),
                "a@example.com",
                TokenKind::Refresh,
                "jti-2",
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        assert_eq!(codec.verify(&token).await.unwrap().kind, TokenKind::Refresh);
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let codec = codec();
        let (token, _) = codec
            .issue(
                uid(),
                "a@example.com",
                TokenKind::Access,
                "jti-3",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let tampered = flip_last_char(&token);
        assert!(matches!(
            codec.verify(&tampered).await,
            Err(AuthError::TokenInvalid | AuthError::TokenMalformed)
        ));
    }

    #[tokio::test]
    async fn tampered_payload_is_rejected() {
        let codec = codec();
        let (token, _) = codec
            .issue(
                uid(),
                "a@example.com",
                TokenKind::Access,
                "jti-4",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = flip_last_char(&parts[1]);
        let forged = parts.join(".");
        assert!(codec.verify(&forged).await.is_err());
    }

    #[tokio::test]
    async fn token_signed_with_different_key_is_rejected() {
        let codec = codec();
        let other =
            JwtHs256Codec::from_secret(ISSUER, "fedcba9876543210-fedcba9876543210").unwrap();
        let (token, _) = other
            .issue(
                uid(),
                "a@example.com",
                TokenKind::Access,
                "jti-5",
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        assert!(matches!(
            codec.verify(&token).await,
            Err(AuthError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let codec = codec();
        let now = Utc::now().timestamp();
        // Past the jsonwebtoken default leeway of 60 seconds.
        let claims = Claims {
            sub: uid().to_string(),
            email: "a@example.com".to_string(),
            typ: "access".to_string(),
            jti: "jti-6".to_string(),
            iss: ISSUER.to_string(),
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&token).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let codec = codec();
        assert!(matches!(
            codec.verify("not-a-token").await,
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn short_secret_fails_construction() {
        assert!(JwtHs256Codec::from_secret(ISSUER, "0123456789abcdef").is_err());
    }

    #[test]
    fn empty_secret_fails_construction() {
        assert!(JwtHs256Codec::from_secret(ISSUER, "").is_err());
    }

    #[test]
    fn thirty_two_byte_secret_is_accepted() {
        assert!(JwtHs256Codec::from_secret(ISSUER, "zyx!wvutsrqponmlkjihgfedcba98765").is_ok());
    }

    #[test]
    fn base64_secret_is_decoded_before_the_length_check() {
        // 32 raw bytes, 44 base64 characters.
        let encoded = BASE64.encode([7u8; 32]);
        assert!(JwtHs256Codec::from_secret(ISSUER, &encoded).is_ok());

        // 16 raw bytes: the decoded form is what gets length-checked.
        let weak = BASE64.encode([7u8; 16]);
        assert!(JwtHs256Codec::from_secret(ISSUER, &weak).is_err());
    }

    #[test]
    fn non_base64_secret_is_used_as_raw_bytes() {
        // 33 chars, not a multiple of 4, contains '-': raw UTF-8 path.
        assert!(JwtHs256Codec::from_secret(ISSUER, "raw-secret-raw-secret-raw-secret!").is_ok());
    }
}
