//! Validation utilities for the Inventory Indent System

// ============================================================================
// Order Quantity Validations
// ============================================================================

/// Validate an order quantity: whole units, at least 1
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

/// Validate an initial stock level for a product
pub fn validate_stock_level(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Stock level cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a display name (user, product or supplier)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}
