//! Admin dashboard.

use actix_web::{HttpResponse, web};

use folio_infra::cache::{get_json, set_json};
use folio_shared::dto::DashboardResponse;

use super::mappers::dashboard_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const CACHE_KEY: &str = "dashboard:stats";

/// Drop the cached stats after a write that changes them.
pub(super) async fn invalidate(state: &AppState) {
    if let Err(e) = state.cache.delete(CACHE_KEY).await {
        tracing::warn!(error = %e, "Failed to invalidate dashboard cache");
    }
}

/// GET /api/dashboard/stats - admin only, cached for `DASHBOARD_CACHE_SECS`
/// or until the next blog write.
pub async fn stats(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let ttl = state.dashboard_cache_ttl;
    if !ttl.is_zero() {
        if let Some(cached) = get_json::<DashboardResponse>(state.cache.as_ref(), CACHE_KEY).await
        {
            tracing::debug!("Dashboard served from cache");
            return Ok(HttpResponse::Ok().json(cached));
        }
    }

    let body = dashboard_response(state.dashboard.report().await?);

    if !ttl.is_zero() {
        if let Err(e) = set_json(state.cache.as_ref(), CACHE_KEY, &body, Some(ttl)).await {
            tracing::warn!(error = %e, "Failed to cache dashboard");
        }
    }

    Ok(HttpResponse::Ok().json(body))
}
