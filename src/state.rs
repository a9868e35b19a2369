use crate::{auth::TokenVerifier, services::bottle_service::BottleService};
use axum::extract::FromRef;
use std::sync::Arc;

/// Collaborators shared by every handler. Both are immutable handles.
#[derive(Clone)]
pub struct AppState {
    pub bottles: BottleService,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(bottles: BottleService, tokens: TokenVerifier) -> Self {
        Self {
            bottles,
            tokens: Arc::new(tokens),
        }
    }
}

impl FromRef<AppState> for BottleService {
    fn from_ref(state: &AppState) -> Self {
        state.bottles.clone()
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
