//! HTTP handlers for catalog, supplier and purchase order endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::catalog::{
    CatalogService, CreateProductInput, CreateSupplierInput, Product, ProductWithSupplier,
    PurchaseOrder, RecordPurchaseOrderInput, Supplier, UpdateProductInput,
};
use crate::AppState;
use shared::models::Role;
use shared::types::{PaginatedResponse, Pagination};

#[derive(Deserialize)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Browse the product catalog, paginated (staff)
pub async fn browse_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<PaginatedResponse<Product>>> {
    require_role(&user, &[Role::Staff])?;
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(5),
    };
    let service = CatalogService::new(state.db);
    let products = service
        .search_products(query.search.as_deref().unwrap_or(""), pagination)
        .await?;
    Ok(Json(products))
}

/// List products with supplier names (admin register)
pub async fn list_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<ProductWithSupplier>>> {
    require_role(&user, &[Role::InventoryAdmin, Role::SuperAdmin])?;
    let service = CatalogService::new(state.db);
    let products = service
        .list_products_with_suppliers(query.search.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    require_role(&user, &[Role::InventoryAdmin, Role::SuperAdmin])?;
    let service = CatalogService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Add a product to the catalog
pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    require_role(&user, &[Role::InventoryAdmin, Role::SuperAdmin])?;
    let service = CatalogService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// Edit a product
pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    require_role(&user, &[Role::InventoryAdmin, Role::SuperAdmin])?;
    let service = CatalogService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// List suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Supplier>>> {
    require_role(&user, &[Role::InventoryAdmin, Role::SuperAdmin])?;
    let service = CatalogService::new(state.db);
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// Add a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    require_role(&user, &[Role::InventoryAdmin, Role::SuperAdmin])?;
    let service = CatalogService::new(state.db);
    let supplier = service.create_supplier(input).await?;
    Ok(Json(supplier))
}

/// Record a purchase order placed with a supplier
pub async fn record_purchase_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RecordPurchaseOrderInput>,
) -> AppResult<Json<PurchaseOrder>> {
    require_role(&user, &[Role::InventoryAdmin])?;
    let service = CatalogService::new(state.db);
    let po = service.record_purchase_order(user.user_id, input).await?;
    Ok(Json(po))
}

/// List recorded purchase orders
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    require_role(&user, &[Role::InventoryAdmin])?;
    let service = CatalogService::new(state.db);
    let orders = service.list_purchase_orders().await?;
    Ok(Json(orders))
}
