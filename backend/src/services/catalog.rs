//! Catalog service for products, suppliers and purchase order records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_name, validate_stock_level};

/// Catalog service for managing the product and supplier registers
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// A stocked product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub supplier_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row joined with its supplier name, for the admin register
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductWithSupplier {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub supplier: Option<String>,
}

/// Input for adding a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub quantity: i32,
    pub supplier_id: Uuid,
}

/// Input for editing a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub supplier_id: Option<Uuid>,
}

/// A supplier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact: String,
    pub address: String,
}

/// A recorded purchase order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub po_file: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a purchase order
#[derive(Debug, Deserialize)]
pub struct RecordPurchaseOrderInput {
    pub supplier_id: Uuid,
    pub po_file: String,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Search the product catalog, paginated
    pub async fn search_products(
        &self,
        search: &str,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Product>> {
        let pagination = pagination.normalized();
        let pattern = format!("%{}%", search.trim());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE name ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.db)
        .await?;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, supplier_id, created_at, updated_at
            FROM products
            WHERE name ILIKE $1
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: products,
            pagination: PaginationMeta::new(pagination, total as u64),
        })
    }

    /// List products with supplier names for the admin register
    pub async fn list_products_with_suppliers(
        &self,
        search: &str,
    ) -> AppResult<Vec<ProductWithSupplier>> {
        let pattern = format!("%{}%", search.trim());

        let products = sqlx::query_as::<_, ProductWithSupplier>(
            r#"
            SELECT p.id, p.name, p.quantity, s.name AS supplier
            FROM products p
            LEFT JOIN suppliers s ON p.supplier_id = s.id
            WHERE p.name ILIKE $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a single product
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, supplier_id, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Add a product to the catalog
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        if let Err(msg) = validate_name(&input.name) {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            });
        }
        if let Err(msg) = validate_stock_level(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            });
        }

        // Validate the supplier exists before inserting
        let supplier_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)",
        )
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        if !supplier_exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, quantity, supplier_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, quantity, supplier_id, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.quantity)
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "product name"))?;

        Ok(product)
    }

    /// Edit a product
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        if let Some(name) = &input.name {
            if let Err(msg) = validate_name(name) {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: msg.to_string(),
                });
            }
        }
        if let Some(quantity) = input.quantity {
            if let Err(msg) = validate_stock_level(quantity) {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                supplier_id = COALESCE($4, supplier_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, quantity, supplier_id, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.quantity)
        .bind(input.supplier_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "product name"))?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    /// List suppliers, newest first
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact, address, created_at
            FROM suppliers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Add a supplier
    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        if let Err(msg) = validate_name(&input.name) {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            });
        }
        if input.contact.trim().is_empty() {
            return Err(AppError::Validation {
                field: "contact".to_string(),
                message: "Contact cannot be empty".to_string(),
            });
        }

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact, address)
            VALUES ($1, $2, $3)
            RETURNING id, name, contact, address, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.contact.trim())
        .bind(&input.address)
        .fetch_one(&self.db)
        .await
        .map_err(Self::supplier_conflict)?;

        Ok(supplier)
    }

    /// Map a unique violation on the suppliers table to the offending field
    fn supplier_conflict(err: sqlx::Error) -> AppError {
        match err.as_database_error().and_then(|d| d.constraint()) {
            Some("suppliers_name_key") => AppError::DuplicateEntry("supplier name".to_string()),
            Some("suppliers_contact_key") => {
                AppError::DuplicateEntry("supplier contact".to_string())
            }
            _ => AppError::DatabaseError(err),
        }
    }

    // ========================================================================
    // Purchase Orders
    // ========================================================================

    /// Record a purchase order placed with a supplier
    pub async fn record_purchase_order(
        &self,
        created_by: Uuid,
        input: RecordPurchaseOrderInput,
    ) -> AppResult<PurchaseOrder> {
        if input.po_file.trim().is_empty() {
            return Err(AppError::Validation {
                field: "po_file".to_string(),
                message: "Purchase order file reference cannot be empty".to_string(),
            });
        }

        let supplier_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)",
        )
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        if !supplier_exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let po = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (supplier_id, po_file, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, supplier_id, po_file, created_by, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.po_file.trim())
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(po)
    }

    /// List recorded purchase orders, newest first
    pub async fn list_purchase_orders(&self) -> AppResult<Vec<PurchaseOrder>> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT id, supplier_id, po_file, created_by, created_at
            FROM purchase_orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }
}
