//! Route definitions for the Inventory Indent System

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public login, protected profile)
        .nest("/auth", auth_routes())
        // Staff ordering workflow
        .nest("/staff", staff_routes())
        // Inventory admin: catalog, suppliers, purchase orders, fulfillment
        .nest("/admin", admin_routes())
        // Super admin: user accounts and reports
        .nest("/super-admin", super_admin_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .merge(session_routes())
}

/// Session routes (protected)
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Staff ordering routes (protected)
fn staff_routes() -> Router<AppState> {
    Router::new()
        // Catalog browsing
        .route("/products", get(handlers::browse_products))
        // Cart
        .route("/cart", get(handlers::view_cart))
        .route("/cart/items", post(handlers::add_to_cart))
        .route(
            "/cart/items/:cart_item_id",
            delete(handlers::remove_cart_item),
        )
        .route(
            "/cart/items/:cart_item_id/increase",
            post(handlers::increase_cart_item),
        )
        .route(
            "/cart/items/:cart_item_id/decrease",
            post(handlers::decrease_cart_item),
        )
        .route("/cart/submit", post(handlers::submit_cart))
        // Order history
        .route("/orders", get(handlers::staff_orders))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory admin routes (protected)
fn admin_routes() -> Router<AppState> {
    Router::new()
        // Product register
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
        // Suppliers
        .route(
            "/suppliers",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        // Purchase orders
        .route(
            "/purchase-orders",
            get(handlers::list_purchase_orders).post(handlers::record_purchase_order),
        )
        // Fulfillment
        .route("/orders/pending", get(handlers::pending_orders))
        .route("/orders/history", get(handlers::received_orders))
        .route("/orders/:cart_id/receive", post(handlers::receive_order))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Super admin routes (protected)
fn super_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::create_user))
        .route("/reports/counts", get(handlers::system_counts))
        .route("/reports/indent-register", get(handlers::indent_register))
        .route_layer(middleware::from_fn(auth_middleware))
}
