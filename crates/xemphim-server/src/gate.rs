//! Bearer-token gate for protected API paths.
//!
//! Paths are matched against patterns like `/api/secure/:path*`. A matching
//! request must carry a signed token, either in the `token` cookie or as an
//! `Authorization: Bearer` header; its decoded [`Claims`] are attached to the
//! request for handlers downstream.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ServerError};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `:name`, exactly one segment.
    Param,
    /// `:name*`, zero or more trailing segments.
    Rest,
}

/// A route pattern in the `/a/:b/:rest*` style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, ServerError> {
        let invalid = |reason| ServerError::Pattern {
            pattern: pattern.to_string(),
            reason,
        };
        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let segment = match part.strip_prefix(':') {
                Some(name) if name.ends_with('*') => {
                    if i + 1 != parts.len() {
                        return Err(invalid("wildcard must be the last segment"));
                    }
                    Segment::Rest
                }
                Some("") => return Err(invalid("parameter needs a name")),
                Some(_) => Segment::Param,
                None => Segment::Literal((*part).to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => {
                    if parts.next() != Some(lit.as_str()) {
                        return false;
                    }
                }
            }
        }
        parts.next().is_none()
    }
}

/// Token payload, as minted by the storefront's login route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user: String,
    #[serde(default)]
    pub roles: Option<String>,
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: usize,
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// The `token` cookie wins over the Authorization header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "token")
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Middleware: reject unauthenticated requests to protected paths.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !state.protected.iter().any(|p| p.matches(path)) {
        return next.run(request).await;
    }

    let Some(token) = token_from_headers(request.headers()) else {
        tracing::debug!(path, "No token on protected path");
        return AppError::Unauthorized("Authentication required").into_response();
    };

    match validate_token(&token, &state.jwt_secret) {
        Ok(claims) => {
            tracing::debug!(path, user = %claims.user, "Token accepted");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path, "Token rejected: {e}");
            AppError::Unauthorized("Invalid token").into_response()
        }
    }
}
