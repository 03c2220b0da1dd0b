use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::{AppError, AppResult},
    services::embed::DEFAULT_DEVICE,
};

pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Bearer token from `Authorization`, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub Option<String>);

impl AccessToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The token, or 401 for endpoints that act on the user's behalf
    pub fn require(&self) -> AppResult<&str> {
        self.as_deref()
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
    }
}

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AccessToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(AccessToken(token))
    }
}

/// Device whose preferences a request reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(pub String);

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for DeviceId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let device = parts
            .headers
            .get(DEVICE_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DEVICE);

        Ok(DeviceId(device.to_string()))
    }
}
