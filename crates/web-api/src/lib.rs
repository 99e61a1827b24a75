//! HTTP and websocket surface of the PeriConecta feed.
//!
//! Axum routes that authenticate callers with bearer tokens and delegate to
//! the application services, plus the `/ws` endpoint streaming like events.

mod auth;
mod error;
mod routes;
mod state;
mod websocket;

pub use auth::{AuthUser, Claims, JwtService, LoginResponse};
pub use config::JwtConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
