//! HTTP handlers for order fulfillment endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::fulfillment::{
    FulfilledOrder, FulfillmentService, PendingOrder, ReceivedOrder,
};
use crate::AppState;
use shared::models::Role;

fn fulfillment_service(state: &AppState) -> FulfillmentService {
    FulfillmentService::new(
        state.db.clone(),
        &state.config,
        state.documents.clone(),
        state.mailer.clone(),
    )
}

/// Receive a submitted order, decrementing stock and assigning its indent number
pub async fn receive_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ReceivedOrder>> {
    require_role(&user, &[Role::InventoryAdmin])?;
    let service = fulfillment_service(&state);
    let order = service.receive_order(cart_id).await?;
    Ok(Json(order))
}

/// List submitted orders awaiting fulfillment
pub async fn pending_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<PendingOrder>>> {
    require_role(&user, &[Role::InventoryAdmin])?;
    let service = fulfillment_service(&state);
    let orders = service.pending_orders().await?;
    Ok(Json(orders))
}

/// List fulfilled orders
pub async fn received_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<FulfilledOrder>>> {
    require_role(&user, &[Role::InventoryAdmin])?;
    let service = fulfillment_service(&state);
    let orders = service.received_history().await?;
    Ok(Json(orders))
}
