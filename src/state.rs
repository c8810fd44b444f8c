/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store: ProfileStore (Postgres 実装 or テスト用 in-memory)
 *   - auth: TokenVerifier
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::store::ProfileStore;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProfileStore>, auth: Arc<TokenVerifier>) -> Self {
        Self { store, auth }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").field("auth", &self.auth).finish()
    }
}
