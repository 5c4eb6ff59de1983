use crate::core::AppError;
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage, ResponseError,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use futures_util::future::LocalBoxFuture;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Role required on every admin route
pub const ADMIN_ROLE: &str = "admin";

/// Identity carried by an admin bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub username: String,
    pub role: String,
    /// Expiry, milliseconds since the Unix epoch
    pub exp: i64,
}

impl AdminClaims {
    pub fn new(username: impl Into<String>, role: impl Into<String>, exp: i64) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            exp,
        }
    }
}

/// Issues and verifies `base64url(claims).hex(hmac_sha256)` bearer tokens
#[derive(Clone)]
pub struct AdminTokenCodec {
    secret: Arc<[u8]>,
}

impl AdminTokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
        }
    }

    fn mac(&self) -> crate::core::Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Failed to create HMAC: {}", e)))
    }

    /// Sign claims into a bearer token
    pub fn issue(&self, claims: &AdminClaims) -> crate::core::Result<String> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> crate::core::Result<AdminClaims> {
        self.verify_at(token, chrono::Utc::now().timestamp_millis())
    }

    /// Verify signature, role and expiry; `now_ms` is milliseconds since the epoch
    pub fn verify_at(&self, token: &str, now_ms: i64) -> crate::core::Result<AdminClaims> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| AppError::unauthorized("Malformed token"))?;

        let signature =
            hex::decode(signature).map_err(|_| AppError::unauthorized("Malformed token"))?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::unauthorized("Invalid token signature"))?;

        let claims: AdminClaims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or_else(|| AppError::unauthorized("Malformed token"))?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::unauthorized("Admin role required"));
        }
        if claims.exp <= now_ms {
            return Err(AppError::unauthorized("Token expired"));
        }

        Ok(claims)
    }
}

/// Bearer-token authentication for the admin scope
pub struct AdminAuth {
    codec: AdminTokenCodec,
}

impl AdminAuth {
    pub fn new(codec: AdminTokenCodec) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    codec: AdminTokenCodec,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let verified = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or_else(|| AppError::unauthorized("Missing bearer token"))
                .and_then(|token| codec.verify(token));

            match verified {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    svc.call(req).await.map(|res| res.map_into_right_body())
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), reason = %e, "Rejected admin request");
                    let response = e.error_response();
                    Ok(req.into_response(response).map_into_left_body())
                }
            }
        })
    }
}
