use super::common::success_response;
use crate::{
    catalog::{CatalogFilter, CatalogOptions, ProviderGroup},
    errors::{ApiError, ServiceError},
    handlers::AppState,
    models::{ContractItem, ContractOverview},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlannableQuery {
    /// Case-insensitive match on description or code
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogReloaded {
    pub items: usize,
    pub source: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    params(CatalogFilter),
    responses(
        (status = 200, description = "Contract items with consumption figures", body = [ContractOverview]),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .read(|planner| {
            Ok(planner
                .catalog()
                .filtered(&filter)
                .into_iter()
                .map(ContractItem::overview)
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/grouped",
    params(CatalogFilter),
    responses(
        (status = 200, description = "Contract items grouped by provider", body = [ProviderGroup]),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn grouped_contracts(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = state
        .read(|planner| Ok(planner.catalog().grouped(&filter)))
        .await?;
    Ok(success_response(groups))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/options",
    responses(
        (status = 200, description = "Distinct tenders, providers and contracts", body = CatalogOptions),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn catalog_options(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let options = state.read(|planner| Ok(planner.catalog().options())).await?;
    Ok(success_response(options))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/plannable",
    params(PlannableQuery),
    responses(
        (status = 200, description = "Items with remaining contract quantity", body = [ContractOverview]),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn plannable_items(
    State(state): State<AppState>,
    Query(query): Query<PlannableQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .read(|planner| {
            Ok(planner
                .catalog()
                .plannable_items(query.search.as_deref())
                .into_iter()
                .map(ContractItem::overview)
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Contract item", body = ContractOverview),
        (status = 404, description = "Unknown item", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .read(|planner| {
            planner
                .catalog()
                .get(&id)
                .map(ContractItem::overview)
                .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", id)))
        })
        .await?;
    Ok(success_response(item))
}

/// Full reload: the planner is rebuilt and all in-memory activity is discarded.
#[utoipa::path(
    post,
    path = "/api/v1/catalog/reload",
    responses(
        (status = 200, description = "Catalog reloaded", body = CatalogReloaded),
        (status = 503, description = "Catalog load failed", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn reload_catalog(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.load_catalog().await?;
    info!(items, "Catalog reloaded on request");
    Ok(success_response(CatalogReloaded {
        items,
        source: state.loader.describe(),
    }))
}
