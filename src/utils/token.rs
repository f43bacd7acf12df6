//! Session tokens handed to the UI after registration, login and area selection.
//!
//! The payload mirrors what the dashboards read back: who the candidate is, which role
//! they hold, and whether they already picked an area (`id_area == None` sends them to the
//! area-selection step).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id_docente: i32,
    pub nombre: String,
    pub apellido_paterno: String,
    pub id_rol: i32,
    pub id_area: Option<i32>,
    pub iat: i64,
    pub exp: i64,
}

/// Identity fields that go into a token; timestamps are filled in at signing time.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub id_docente: i32,
    pub nombre: String,
    pub apellido_paterno: String,
    pub id_rol: i32,
    pub id_area: Option<i32>,
}

#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes.max(1)),
        }
    }

    pub fn issue(&self, subject: TokenSubject) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            id_docente: subject.id_docente,
            nombre: subject.nombre.trim().to_string(),
            apellido_paterno: subject.apellido_paterno.trim().to_string(),
            id_rol: subject.id_rol,
            id_area: subject.id_area,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id_area: Option<i32>) -> TokenSubject {
        TokenSubject {
            id_docente: 10,
            nombre: " Ana ".into(),
            apellido_paterno: "Paredes".into(),
            id_rol: 4,
            id_area,
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let keys = TokenKeys::new("test_secret_key", 60);
        let token = keys.issue(subject(Some(3))).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.id_docente, 10);
        assert_eq!(claims.nombre, "Ana");
        assert_eq!(claims.id_rol, 4);
        assert_eq!(claims.id_area, Some(3));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn area_is_serialized_as_null_when_missing() {
        let keys = TokenKeys::new("test_secret_key", 60);
        let token = keys.issue(subject(None)).unwrap();
        let claims = keys.verify(&token).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json["idArea"].is_null());
        assert_eq!(json["idDocente"], 10);
        assert_eq!(json["apellidoPaterno"], "Paredes");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenKeys::new("secret-a", 60).issue(subject(None)).unwrap();
        assert!(TokenKeys::new("secret-b", 60).verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("test_secret_key", 60);
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            id_docente: 1,
            nombre: "Luis".into(),
            apellido_paterno: "Mora".into(),
            id_rol: 2,
            id_area: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
