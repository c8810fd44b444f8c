/*
 * Responsibility
 * - トークンの検証 (ヘッダ抽出 → 検証 → 拒否)
 * - 成功時に AuthCtx を request extensions に載せる
 * - 認可 (resource ownership) は handler/service 側の責務
 */
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the access token. Legacy clients send the raw JWT here,
/// without a Bearer prefix.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Gate for protected operations.
///
/// Applied per protected route via `middleware::from_fn_with_state` (see
/// api::v1::routes); there is no global registration. Failure is terminal:
/// the wrapped handler never runs, and no store access happens.
pub async fn token_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::unauthorized("No token, authorization denied"))?;

    let user_id = match state.auth.verify(token) {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!(error = ?err, "access token verification failed");
            return Err(AppError::unauthorized("Token is not valid"));
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}
