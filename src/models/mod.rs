// huginn-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;

// Record families of the access-control core
pub mod access_grant;
pub use access_grant::*;

pub mod invitation;
pub use invitation::*;

pub mod share_link;
pub use share_link::*;

pub mod notification;
pub use notification::*;

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

// Custom error types
#[derive(Debug)]
pub enum ServiceError {
    InternalServerError,
    BadRequest(String),
    Unauthorized,
    NotFound,
    Forbidden,
    Conflict(String),
    DuplicateInvitation,
    AlreadyRevoked,
    Expired,
    Inactive,
    QuotaExceeded,
    InvalidState(String),
    InvalidPayload(String),
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
            ServiceError::BadRequest(msg) => write!(f, "BadRequest: {}", msg),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::Forbidden => write!(f, "Forbidden"),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::DuplicateInvitation => write!(f, "A pending invitation already exists"),
            ServiceError::AlreadyRevoked => write!(f, "Grant is already revoked"),
            ServiceError::Expired => write!(f, "Expired"),
            ServiceError::Inactive => write!(f, "Inactive"),
            ServiceError::QuotaExceeded => write!(f, "Response quota exceeded"),
            ServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ServiceError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
        }
    }
}

// Implement std::error::Error for ServiceError
impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
// Expiry, revocation and quota exhaustion map to 410 so the frontend can
// tell "existed but is gone" apart from 403/404.
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError =>
                HttpResponse::InternalServerError().json("Internal Server Error"),
            ServiceError::BadRequest(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::Unauthorized =>
                HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound =>
                HttpResponse::NotFound().json("Not Found"),
            ServiceError::Forbidden =>
                HttpResponse::Forbidden().json("Forbidden: You don't have permission to access this resource"),
            ServiceError::Conflict(ref message) =>
                HttpResponse::Conflict().json(message),
            ServiceError::DuplicateInvitation =>
                HttpResponse::Conflict().json("A pending invitation already exists for this user"),
            ServiceError::AlreadyRevoked =>
                HttpResponse::Conflict().json("This grant has already been revoked"),
            ServiceError::Expired =>
                HttpResponse::Gone().json("This invitation or link has expired"),
            ServiceError::Inactive =>
                HttpResponse::Gone().json("This link is no longer active"),
            ServiceError::QuotaExceeded =>
                HttpResponse::Gone().json("This link has reached its response limit"),
            ServiceError::InvalidState(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::InvalidPayload(ref message) =>
                HttpResponse::BadRequest().json(message),
        }
    }
}
