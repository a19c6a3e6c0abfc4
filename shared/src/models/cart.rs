//! Cart lifecycle models

use serde::{Deserialize, Serialize};

/// Lifecycle state of a cart
///
/// A cart moves strictly forward: `pending` while the staff member is
/// still editing it, `ordered` once submitted, `received` once the
/// inventory admin has fulfilled it. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    Pending,
    Ordered,
    Received,
}

impl CartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Pending => "pending",
            CartStatus::Ordered => "ordered",
            CartStatus::Received => "received",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step
    pub fn can_transition(&self, next: CartStatus) -> bool {
        matches!(
            (self, next),
            (CartStatus::Pending, CartStatus::Ordered)
                | (CartStatus::Ordered, CartStatus::Received)
        )
    }

    /// Received carts never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, CartStatus::Received)
    }
}

impl std::str::FromStr for CartStatus {
    type Err = UnknownCartStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CartStatus::Pending),
            "ordered" => Ok(CartStatus::Ordered),
            "received" => Ok(CartStatus::Received),
            other => Err(UnknownCartStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string does not name a known cart status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cart status: {0}")]
pub struct UnknownCartStatus(pub String);
