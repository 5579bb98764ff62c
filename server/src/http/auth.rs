//! Bearer-JWT gate for protected routes.
//!
//! Tokens are issued by the hosted auth backend and signed with its HS256
//! secret; this service only verifies them.

use actix_web::{
    dev::Payload, error::InternalError, web, FromRequest, HttpRequest, HttpResponse,
};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::AuthSettings;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Extracts and validates a Bearer-JWT, exposing the caller's user id.
#[derive(Debug, Clone)]
pub struct JwtAuth {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl JwtAuth {
    fn verify(req: &HttpRequest) -> Result<Self, &'static str> {
        let settings = req
            .app_data::<web::Data<AuthSettings>>()
            .ok_or("server mis-config: no auth settings")?;

        // Expect:  Authorization: Bearer <JWT>
        let hdr = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or("missing Authorization header")?;

        let token = hdr
            .strip_prefix("Bearer ")
            .ok_or("malformed Authorization header")?;

        let mut validation = Validation::new(Algorithm::HS256);
        match &settings.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| "invalid / expired token")?;

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| "bad sub")?;

        Ok(JwtAuth {
            user_id,
            email: data.claims.email,
        })
    }
}

impl FromRequest for JwtAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        ready(Self::verify(req).map_err(|reason| {
            // Callers get a generic answer; the specific reason stays in the log.
            log::warn!("auth rejected for {}: {reason}", req.path());
            let body = HttpResponse::Unauthorized().json(json!({
                "error": "Unauthorized",
                "message": "Authentication required. Please log in and try again.",
            }));
            InternalError::from_response(reason, body).into()
        }))
    }
}
