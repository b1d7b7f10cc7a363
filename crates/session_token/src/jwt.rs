use crate::Error;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl SessionTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Identity carried by a session token. `iat` and `exp` are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims valid from `now_unix_seconds` for `ttl_seconds`.
    #[must_use]
    pub fn new(
        sub: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        now_unix_seconds: i64,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            sub: sub.into(),
            name: name.into(),
            email: email.into(),
            iat: now_unix_seconds,
            exp: now_unix_seconds.saturating_add(ttl_seconds),
        }
    }
}

/// HMAC key shared by signer and verifier.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
    key_length: usize,
}

impl SigningKey {
    pub const MIN_KEY_LENGTH: usize = 16;

    /// # Errors
    ///
    /// Returns [`Error::KeyTooShort`] if the key is shorter than [`Self::MIN_KEY_LENGTH`].
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, Error> {
        let key = key.as_ref();
        if key.len() < Self::MIN_KEY_LENGTH {
            return Err(Error::KeyTooShort {
                actual: key.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|_| Error::InvalidKey)?;
        Ok(Self {
            mac,
            key_length: key.len(),
        })
    }

    /// Keyed MAC state, cloned per token.
    fn mac(&self) -> HmacSha256 {
        self.mac.clone()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_length", &self.key_length)
            .finish_non_exhaustive()
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Create an HS256 signed session token.
///
/// # Errors
///
/// Returns an error if the header or claims cannot be encoded as JSON.
pub fn sign_hs256(key: &SigningKey, claims: &SessionClaims) -> Result<String, Error> {
    let header_b64 = b64e_json(&SessionTokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let mut mac = key.mac();
    mac.update(signing_input.as_bytes());
    let signature_b64 = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Verify an HS256 session token and return its decoded claims.
///
/// # Errors
///
/// Returns an error if:
/// - the token is malformed or contains invalid base64/json,
/// - the header names an algorithm other than `HS256`,
/// - the signature does not match,
/// - `iat` is after `exp`, or `exp` is not after `now_unix_seconds`.
pub fn verify_hs256(
    token: &str,
    key: &SigningKey,
    now_unix_seconds: i64,
) -> Result<SessionClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let sig_b64 = parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() {
        return Err(Error::TokenFormat);
    }

    let header: SessionTokenHeader = b64d_json(header_b64)?;
    if header.alg != "HS256" {
        return Err(Error::UnsupportedAlg(header.alg));
    }

    let signature = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Base64)?;
    let mut mac = key.mac();
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| Error::InvalidSignature)?;

    let claims: SessionClaims = b64d_json(claims_b64)?;
    if claims.iat > claims.exp {
        return Err(Error::InvalidIat);
    }
    if claims.exp <= now_unix_seconds {
        return Err(Error::Expired);
    }

    Ok(claims)
}
