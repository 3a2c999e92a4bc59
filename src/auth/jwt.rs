use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::Result, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Principal, Role};
use crate::config::AppConfig;
use crate::models::Account;

const ACCESS_AUDIENCE: &str = "jobdesk-access";
const REFRESH_AUDIENCE: &str = "jobdesk-refresh";

#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_expiry: Duration,
    refresh_expiry: Duration,
}

/// The identity a token pair is minted for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub id: Uuid,
    pub role: Role,
    pub email: &'a str,
    pub name: &'a str,
    pub company: &'a str,
    pub contact: &'a str,
}

impl<'a> TokenSubject<'a> {
    pub fn of(account: &'a Account, role: Role) -> Self {
        Self {
            id: account.id,
            role,
            email: &account.email,
            name: &account.name,
            company: &account.company,
            contact: &account.contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

impl JwtService {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_issuer.clone(),
            Duration::minutes(config.jwt_access_expiry_minutes),
            Duration::hours(config.jwt_refresh_expiry_hours),
        )
    }

    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        access_expiry: Duration,
        refresh_expiry: Duration,
    ) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            access_expiry,
            refresh_expiry,
        }
    }

    pub fn issue(&self, subject: &TokenSubject<'_>) -> Result<TokenPair> {
        Ok(TokenPair {
            token: self.sign(subject, ACCESS_AUDIENCE, self.access_expiry)?,
            refresh_token: self.sign(subject, REFRESH_AUDIENCE, self.refresh_expiry)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        self.verify(token, ACCESS_AUDIENCE)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        self.verify(token, REFRESH_AUDIENCE)
    }

    fn sign(&self, subject: &TokenSubject<'_>, audience: &str, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let exp = now + lifetime;
        let claims = Claims {
            sub: subject.id,
            email: subject.email.to_owned(),
            name: subject.name.to_owned(),
            company: subject.company.to_owned(),
            contact: subject.contact.to_owned(),
            role: subject.role,
            iss: self.issuer.clone(),
            aud: audience.to_owned(),
            iat: now.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    fn verify(&self, token: &str, audience: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(&[audience]);
        validation.set_issuer(&[self.issuer.as_str()]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub company: String,
    pub contact: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: Uuid,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal {
            id: claims.sub,
            role: claims.role,
            email: claims.email,
            name: claims.name,
            company: claims.company,
            contact: claims.contact,
        }
    }
}
