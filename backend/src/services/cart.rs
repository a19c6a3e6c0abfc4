//! Cart service for the staff ordering workflow
//!
//! Each staff member has at most one pending cart. Lines are merged per
//! product, and a submitted cart becomes an order awaiting fulfillment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{CartStatus, StaffIdentity};
use shared::validation::validate_quantity;

/// Cart service for staff cart manipulation and order history
#[derive(Clone)]
pub struct CartService {
    db: PgPool,
}

/// Input for adding a product to the cart
#[derive(Debug, Deserialize)]
pub struct AddItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A single line of a pending cart, with current stock for display
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
    pub cart_item_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub stock: i32,
}

/// The staff member's pending cart
#[derive(Debug, Clone, Serialize)]
pub struct CartDetail {
    pub cart_id: Option<Uuid>,
    pub items: Vec<CartLine>,
}

/// An item line in a past order
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: i32,
}

/// A submitted or fulfilled order in the staff history view
#[derive(Debug, Clone, Serialize)]
pub struct StaffOrder {
    pub cart_id: Uuid,
    pub status: CartStatus,
    pub indent_no: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    status: String,
    indent_no: Option<String>,
    received_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    cart_id: Uuid,
    product_name: String,
    quantity: i32,
}

impl CartService {
    /// Create a new CartService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add a product to the staff member's pending cart, creating the cart
    /// if none exists and merging quantities for a repeated product.
    ///
    /// The stock comparison here covers the added quantity only; the
    /// authoritative all-or-nothing check happens when the order is received.
    pub async fn add_item(&self, staff: &StaffIdentity, input: AddItemInput) -> AppResult<CartLine> {
        if let Err(msg) = validate_quantity(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            });
        }

        let product = sqlx::query_as::<_, (String, i32)>(
            "SELECT name, quantity FROM products WHERE id = $1",
        )
        .bind(input.product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let (product_name, stock) = product;
        if input.quantity > stock {
            return Err(AppError::InsufficientStock {
                product: product_name,
                requested: input.quantity,
                available: stock,
            });
        }

        // Find or create the pending cart in one statement. The partial
        // unique index guarantees a single pending cart per staff member.
        let cart_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO carts (staff_id)
            VALUES ($1)
            ON CONFLICT (staff_id) WHERE status = 'pending'
            DO UPDATE SET updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(staff.id)
        .fetch_one(&self.db)
        .await?;

        let line = sqlx::query_as::<_, CartLine>(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id AS cart_item_id, product_id, $4::TEXT AS name, quantity, $5::INTEGER AS stock
            "#,
        )
        .bind(cart_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(&product_name)
        .bind(stock)
        .fetch_one(&self.db)
        .await?;

        Ok(line)
    }

    /// View the pending cart. Returns an empty cart when none exists.
    pub async fn view_cart(&self, staff: &StaffIdentity) -> AppResult<CartDetail> {
        let cart_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM carts WHERE staff_id = $1 AND status = 'pending'",
        )
        .bind(staff.id)
        .fetch_optional(&self.db)
        .await?;

        let Some(cart_id) = cart_id else {
            return Ok(CartDetail {
                cart_id: None,
                items: Vec::new(),
            });
        };

        let items = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT ci.id AS cart_item_id, ci.product_id, p.name, ci.quantity,
                   p.quantity AS stock
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            WHERE ci.cart_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.db)
        .await?;

        Ok(CartDetail {
            cart_id: Some(cart_id),
            items,
        })
    }

    /// Increase a cart line by one, so long as stock covers the new total
    pub async fn increase_item(&self, staff: &StaffIdentity, cart_item_id: Uuid) -> AppResult<i32> {
        let row = sqlx::query_as::<_, (i32, String, i32)>(
            r#"
            SELECT ci.quantity, p.name, p.quantity AS stock
            FROM cart_items ci
            JOIN carts c ON ci.cart_id = c.id
            JOIN products p ON ci.product_id = p.id
            WHERE ci.id = $1 AND c.staff_id = $2 AND c.status = 'pending'
            "#,
        )
        .bind(cart_item_id)
        .bind(staff.id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item".to_string()))?;

        let (quantity, product_name, stock) = row;
        let new_quantity = quantity + 1;
        if new_quantity > stock {
            return Err(AppError::InsufficientStock {
                product: product_name,
                requested: new_quantity,
                available: stock,
            });
        }

        sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
            .bind(cart_item_id)
            .bind(new_quantity)
            .execute(&self.db)
            .await?;

        Ok(new_quantity)
    }

    /// Decrease a cart line by one, removing the line when it reaches zero.
    /// Returns the remaining quantity, or None when the line was removed.
    pub async fn decrease_item(
        &self,
        staff: &StaffIdentity,
        cart_item_id: Uuid,
    ) -> AppResult<Option<i32>> {
        let quantity = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT ci.quantity
            FROM cart_items ci
            JOIN carts c ON ci.cart_id = c.id
            WHERE ci.id = $1 AND c.staff_id = $2 AND c.status = 'pending'
            "#,
        )
        .bind(cart_item_id)
        .bind(staff.id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item".to_string()))?;

        if quantity <= 1 {
            sqlx::query("DELETE FROM cart_items WHERE id = $1")
                .bind(cart_item_id)
                .execute(&self.db)
                .await?;
            return Ok(None);
        }

        let new_quantity = quantity - 1;
        sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
            .bind(cart_item_id)
            .bind(new_quantity)
            .execute(&self.db)
            .await?;

        Ok(Some(new_quantity))
    }

    /// Remove a line from the pending cart regardless of its quantity
    pub async fn remove_item(&self, staff: &StaffIdentity, cart_item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_items ci
            USING carts c
            WHERE ci.id = $1 AND ci.cart_id = c.id
              AND c.staff_id = $2 AND c.status = 'pending'
            "#,
        )
        .bind(cart_item_id)
        .bind(staff.id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cart item".to_string()));
        }

        Ok(())
    }

    /// Submit the pending cart as an order. Returns the cart id, or None
    /// when there was no pending cart to submit.
    pub async fn submit(&self, staff: &StaffIdentity) -> AppResult<Option<Uuid>> {
        let cart_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE carts SET status = 'ordered', updated_at = NOW()
            WHERE staff_id = $1 AND status = 'pending'
            RETURNING id
            "#,
        )
        .bind(staff.id)
        .fetch_optional(&self.db)
        .await?;

        Ok(cart_id)
    }

    /// List the staff member's submitted and received orders, newest first.
    /// An optional search term matches the indent number, the status, or
    /// any product name in the order.
    pub async fn order_history(
        &self,
        staff: &StaffIdentity,
        search: Option<&str>,
    ) -> AppResult<Vec<StaffOrder>> {
        let term = search.unwrap_or("").trim().to_string();
        let pattern = format!("%{}%", term);

        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT c.id, c.status::TEXT AS status, c.indent_no, c.received_at, c.created_at
            FROM carts c
            WHERE c.staff_id = $1
              AND c.status <> 'pending'
              AND (
                  $2 = ''
                  OR c.indent_no ILIKE $3
                  OR c.status::TEXT ILIKE $3
                  OR EXISTS (
                      SELECT 1 FROM cart_items ci
                      JOIN products p ON ci.product_id = p.id
                      WHERE ci.cart_id = c.id AND p.name ILIKE $3
                  )
              )
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(staff.id)
        .bind(&term)
        .bind(&pattern)
        .fetch_all(&self.db)
        .await?;

        let cart_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items_by_cart = self.items_for_carts(&cart_ids).await?;

        orders
            .into_iter()
            .map(|row| {
                let status = row
                    .status
                    .parse::<CartStatus>()
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                Ok(StaffOrder {
                    cart_id: row.id,
                    status,
                    indent_no: row.indent_no,
                    received_at: row.received_at,
                    created_at: row.created_at,
                    items: items_by_cart.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Fetch order lines for a set of carts, grouped by cart id
    async fn items_for_carts(
        &self,
        cart_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
        if cart_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT ci.cart_id, p.name AS product_name, ci.quantity
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            WHERE ci.cart_id = ANY($1)
            ORDER BY p.name
            "#,
        )
        .bind(cart_ids)
        .fetch_all(&self.db)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.cart_id).or_default().push(OrderItem {
                product_name: row.product_name,
                quantity: row.quantity,
            });
        }

        Ok(grouped)
    }
}
