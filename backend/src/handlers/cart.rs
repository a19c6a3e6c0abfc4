//! HTTP handlers for the staff ordering workflow

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::cart::{AddItemInput, CartDetail, CartLine, CartService, StaffOrder};
use crate::AppState;
use shared::models::Role;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub q: Option<String>,
}

/// Add a product to the pending cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddItemInput>,
) -> AppResult<Json<CartLine>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    let line = service.add_item(&user.identity(), input).await?;
    Ok(Json(line))
}

/// View the pending cart
pub async fn view_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<CartDetail>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    let cart = service.view_cart(&user.identity()).await?;
    Ok(Json(cart))
}

/// Increase a cart line by one
pub async fn increase_cart_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(cart_item_id): Path<Uuid>,
) -> AppResult<Json<QuantityResponse>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    let quantity = service.increase_item(&user.identity(), cart_item_id).await?;
    Ok(Json(QuantityResponse {
        cart_item_id,
        quantity,
    }))
}

/// Decrease a cart line by one, removing it at zero
pub async fn decrease_cart_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(cart_item_id): Path<Uuid>,
) -> AppResult<Json<DecreaseResponse>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    let quantity = service.decrease_item(&user.identity(), cart_item_id).await?;
    Ok(Json(DecreaseResponse {
        cart_item_id,
        removed: quantity.is_none(),
        quantity,
    }))
}

/// Remove a line from the pending cart
pub async fn remove_cart_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(cart_item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    service.remove_item(&user.identity(), cart_item_id).await?;
    Ok(Json(()))
}

/// Submit the pending cart as an order
pub async fn submit_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<SubmitResponse>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    let cart_id = service.submit(&user.identity()).await?;
    Ok(Json(SubmitResponse {
        submitted: cart_id.is_some(),
        cart_id,
    }))
}

/// List the staff member's past orders
pub async fn staff_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<StaffOrder>>> {
    require_role(&user, &[Role::Staff])?;
    let service = CartService::new(state.db);
    let orders = service
        .order_history(&user.identity(), query.q.as_deref())
        .await?;
    Ok(Json(orders))
}

/// Response for a quantity change
#[derive(Debug, Serialize)]
pub struct QuantityResponse {
    pub cart_item_id: Uuid,
    pub quantity: i32,
}

/// Response for a decrease, which may remove the line entirely
#[derive(Debug, Serialize)]
pub struct DecreaseResponse {
    pub cart_item_id: Uuid,
    pub removed: bool,
    pub quantity: Option<i32>,
}

/// Response for a cart submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub submitted: bool,
    pub cart_id: Option<Uuid>,
}
