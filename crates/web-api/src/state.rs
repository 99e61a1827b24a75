use std::sync::Arc;

use application::{PostService, UserService};
use infrastructure::LocalLikeBroadcaster;

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    /// Realtime channel the websocket endpoint subscribes to.
    pub broadcaster: Arc<LocalLikeBroadcaster>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        post_service: Arc<PostService>,
        broadcaster: Arc<LocalLikeBroadcaster>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_service,
            post_service,
            broadcaster,
            jwt_service,
        }
    }
}
