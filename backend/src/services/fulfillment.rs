//! Order fulfillment service
//!
//! Receiving an order is the one multi-step write in the system: stock is
//! verified and decremented, the indent number drawn, and the cart marked
//! received inside a single transaction. Letter generation and the receipt
//! mail run after commit and never roll the order back.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{
    DocumentGenerator, IndentLetter, LetterItem, MailAttachment, Mailer, OutgoingMail,
};
use crate::services::IndentSequencer;
use shared::models::{CartStatus, IndentNumber};

/// Fulfillment service handling the receive transaction and admin order views
#[derive(Clone)]
pub struct FulfillmentService {
    db: PgPool,
    sequencer: IndentSequencer,
    documents: Arc<dyn DocumentGenerator>,
    mailer: Option<Arc<dyn Mailer>>,
    notification_copy: String,
}

/// One order line as seen by the receive transaction
#[derive(Debug, Clone, FromRow)]
pub struct FulfillmentLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub requested: i32,
    pub available: i32,
}

/// An item line in an admin order view
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: i32,
}

/// A submitted order awaiting fulfillment
#[derive(Debug, Clone, Serialize)]
pub struct PendingOrder {
    pub cart_id: Uuid,
    pub staff_name: String,
    pub staff_email: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLine>,
}

/// A fulfilled order in the admin history view
#[derive(Debug, Clone, Serialize)]
pub struct FulfilledOrder {
    pub cart_id: Uuid,
    pub staff_name: String,
    pub indent_no: String,
    pub received_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderLine>,
}

/// Result of a successful receive
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedOrder {
    pub cart_id: Uuid,
    pub indent_no: IndentNumber,
    pub staff_name: String,
    pub received_at: DateTime<Utc>,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, FromRow)]
struct CartHeader {
    status: String,
    staff_name: String,
    staff_email: String,
}

#[derive(Debug, FromRow)]
struct OrderHeaderRow {
    id: Uuid,
    staff_name: String,
    staff_email: String,
    indent_no: Option<String>,
    received_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct LineRow {
    cart_id: Uuid,
    product_name: String,
    quantity: i32,
}

/// Check every line of an order against available stock.
///
/// All-or-nothing: the first line that exceeds stock fails the whole order,
/// named in the error so the admin knows which product to restock.
pub fn verify_stock(lines: &[FulfillmentLine]) -> Result<(), AppError> {
    for line in lines {
        if line.requested > line.available {
            return Err(AppError::InsufficientStock {
                product: line.product_name.clone(),
                requested: line.requested,
                available: line.available,
            });
        }
    }
    Ok(())
}

/// Render the indent letter and send the receipt mail to the staff member
/// and the department copy address. A letter failure downgrades the mail to
/// attachment-free rather than suppressing it.
async fn dispatch_side_effects(
    documents: Arc<dyn DocumentGenerator>,
    mailer: Option<Arc<dyn Mailer>>,
    letter: IndentLetter,
    staff_email: String,
    notification_copy: String,
) {
    let letter_path = match documents.generate(&letter).await {
        Ok(path) => {
            tracing::info!("Indent letter for {} written to {}", letter.indent_no, path);
            Some(path)
        }
        Err(e) => {
            tracing::error!(indent_no = %letter.indent_no, "Failed to generate indent letter: {}", e);
            None
        }
    };

    let Some(mailer) = mailer else {
        tracing::debug!("Mail relay not configured, skipping receipt notification");
        return;
    };

    let mut recipients = vec![staff_email];
    if !notification_copy.is_empty() {
        recipients.push(notification_copy);
    }

    let mut mail = OutgoingMail {
        to: recipients,
        subject: "Indent Received".to_string(),
        html_body: "<p>Your indent has been received successfully.</p>".to_string(),
        attachments: Vec::new(),
    };
    if let Some(path) = letter_path {
        let filename = Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.txt", letter.indent_no.file_stem()));
        mail.attachments.push(MailAttachment { filename, path });
    }

    if let Err(e) = mailer.send(&mail).await {
        tracing::error!(indent_no = %letter.indent_no, "Failed to send receipt notification: {}", e);
    }
}

impl FulfillmentService {
    /// Create a new FulfillmentService instance
    pub fn new(
        db: PgPool,
        config: &Config,
        documents: Arc<dyn DocumentGenerator>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        Self {
            db,
            sequencer: IndentSequencer::new(config.indent.prefix.clone()),
            documents,
            mailer,
            notification_copy: config.mail.department_copy().to_string(),
        }
    }

    /// Receive a submitted order: verify and decrement stock, assign the
    /// next indent number for today, and mark the cart received.
    pub async fn receive_order(&self, cart_id: Uuid) -> AppResult<ReceivedOrder> {
        let mut tx = self.db.begin().await?;

        let header = sqlx::query_as::<_, CartHeader>(
            r#"
            SELECT c.status::TEXT AS status, u.name AS staff_name, u.email AS staff_email
            FROM carts c
            JOIN users u ON c.staff_id = u.id
            WHERE c.id = $1
            FOR UPDATE OF c
            "#,
        )
        .bind(cart_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let status = header
            .status
            .parse::<CartStatus>()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        match status {
            CartStatus::Ordered => {}
            CartStatus::Received => {
                return Err(AppError::InvalidStateTransition(
                    "Order has already been received".to_string(),
                ));
            }
            CartStatus::Pending => {
                return Err(AppError::InvalidStateTransition(
                    "Cart has not been submitted yet".to_string(),
                ));
            }
        }

        // Lock product rows in a fixed order so concurrent receives touching
        // the same products cannot deadlock.
        let lines = sqlx::query_as::<_, FulfillmentLine>(
            r#"
            SELECT ci.product_id, p.name AS product_name,
                   ci.quantity AS requested, p.quantity AS available
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            WHERE ci.cart_id = $1
            ORDER BY ci.product_id
            FOR UPDATE OF p
            "#,
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        verify_stock(&lines)?;

        let today = Utc::now().date_naive();
        let indent_no = self.sequencer.next(&mut tx, today).await?;

        for line in &lines {
            sqlx::query(
                "UPDATE products SET quantity = quantity - $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(line.product_id)
            .bind(line.requested)
            .execute(&mut *tx)
            .await?;
        }

        let received_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            UPDATE carts
            SET status = 'received', indent_no = $2, received_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING received_at
            "#,
        )
        .bind(cart_id)
        .bind(indent_no.to_string())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let order = ReceivedOrder {
            cart_id,
            indent_no,
            staff_name: header.staff_name,
            received_at,
            items: lines
                .iter()
                .map(|l| OrderLine {
                    product_name: l.product_name.clone(),
                    quantity: l.requested,
                })
                .collect(),
        };

        self.spawn_side_effects(&order, header.staff_email);

        Ok(order)
    }

    /// Dispatch letter generation and the receipt mail in the background.
    /// The order is already committed; failures are logged and never
    /// surfaced to the caller.
    fn spawn_side_effects(&self, order: &ReceivedOrder, staff_email: String) {
        let letter = IndentLetter {
            indent_no: order.indent_no.clone(),
            staff_name: order.staff_name.clone(),
            issued_at: order.received_at,
            items: order
                .items
                .iter()
                .map(|l| LetterItem {
                    product_name: l.product_name.clone(),
                    quantity: l.quantity,
                })
                .collect(),
        };

        tokio::spawn(dispatch_side_effects(
            self.documents.clone(),
            self.mailer.clone(),
            letter,
            staff_email,
            self.notification_copy.clone(),
        ));
    }

    /// List submitted orders awaiting fulfillment, oldest first
    pub async fn pending_orders(&self) -> AppResult<Vec<PendingOrder>> {
        let headers = sqlx::query_as::<_, OrderHeaderRow>(
            r#"
            SELECT c.id, u.name AS staff_name, u.email AS staff_email,
                   c.indent_no, c.received_at, c.created_at
            FROM carts c
            JOIN users u ON c.staff_id = u.id
            WHERE c.status = 'ordered'
            ORDER BY c.created_at
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let cart_ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let mut lines = self.lines_for_carts(&cart_ids).await?;

        Ok(headers
            .into_iter()
            .map(|h| PendingOrder {
                cart_id: h.id,
                staff_name: h.staff_name,
                staff_email: h.staff_email,
                created_at: h.created_at,
                items: lines.remove(&h.id).unwrap_or_default(),
            })
            .collect())
    }

    /// List fulfilled orders, most recently received first
    pub async fn received_history(&self) -> AppResult<Vec<FulfilledOrder>> {
        let headers = sqlx::query_as::<_, OrderHeaderRow>(
            r#"
            SELECT c.id, u.name AS staff_name, u.email AS staff_email,
                   c.indent_no, c.received_at, c.created_at
            FROM carts c
            JOIN users u ON c.staff_id = u.id
            WHERE c.status = 'received'
            ORDER BY c.received_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let cart_ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let mut lines = self.lines_for_carts(&cart_ids).await?;

        Ok(headers
            .into_iter()
            .map(|h| FulfilledOrder {
                cart_id: h.id,
                staff_name: h.staff_name,
                indent_no: h.indent_no.unwrap_or_default(),
                received_at: h.received_at,
                items: lines.remove(&h.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Fetch order lines for a set of carts, grouped by cart id
    async fn lines_for_carts(&self, cart_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<OrderLine>>> {
        if cart_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, LineRow>(
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

        let mut grouped: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            grouped.entry(row.cart_id).or_default().push(OrderLine {
                product_name: row.product_name,
                quantity: row.quantity,
            });
        }

        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, requested: i32, available: i32) -> FulfillmentLine {
        FulfillmentLine {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            requested,
            available,
        }
    }

    #[test]
    fn verify_stock_passes_when_every_line_is_covered() {
        let lines = vec![line("Marker", 5, 10), line("Stapler", 2, 2)];
        assert!(verify_stock(&lines).is_ok());
    }

    #[test]
    fn verify_stock_passes_for_empty_order() {
        assert!(verify_stock(&[]).is_ok());
    }

    #[test]
    fn verify_stock_names_the_offending_product() {
        let lines = vec![line("Marker", 5, 10), line("Stapler", 3, 2)];
        match verify_stock(&lines) {
            Err(AppError::InsufficientStock {
                product,
                requested,
                available,
            }) => {
                assert_eq!(product, "Stapler");
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn verify_stock_reports_the_first_offender_only() {
        let lines = vec![
            line("Marker", 20, 10),
            line("Stapler", 3, 2),
            line("Tape", 1, 0),
        ];
        match verify_stock(&lines) {
            Err(AppError::InsufficientStock { product, .. }) => assert_eq!(product, "Marker"),
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn verify_stock_allows_exact_depletion() {
        let lines = vec![line("Marker", 10, 10)];
        assert!(verify_stock(&lines).is_ok());
    }

    // ========================================================================
    // Post-commit dispatch, driven through in-memory capability doubles
    // ========================================================================

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct RecordingGenerator {
        generated: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentGenerator for RecordingGenerator {
        async fn generate(&self, letter: &IndentLetter) -> AppResult<String> {
            if self.fail {
                return Err(AppError::Internal("disk full".to_string()));
            }
            let path = format!("indents/{}.txt", letter.indent_no.file_stem());
            self.generated.lock().unwrap().push(path.clone());
            Ok(path)
        }
    }

    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    fn sample_letter() -> IndentLetter {
        IndentLetter {
            indent_no: IndentNumber::new(
                "KIET",
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                1,
            )
            .unwrap(),
            staff_name: "Asha Verma".to_string(),
            issued_at: Utc::now(),
            items: vec![LetterItem {
                product_name: "Marker".to_string(),
                quantity: 3,
            }],
        }
    }

    #[tokio::test]
    async fn receipt_mail_reaches_staff_and_department_copy() {
        let documents = Arc::new(RecordingGenerator {
            generated: Mutex::new(Vec::new()),
            fail: false,
        });
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
        });

        dispatch_side_effects(
            documents.clone() as Arc<dyn DocumentGenerator>,
            Some(mailer.clone() as Arc<dyn Mailer>),
            sample_letter(),
            "asha@kiet.edu".to_string(),
            "store@kiet.edu".to_string(),
        )
        .await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["asha@kiet.edu", "store@kiet.edu"]);
        assert_eq!(sent[0].subject, "Indent Received");
        assert_eq!(sent[0].attachments.len(), 1);
        assert_eq!(sent[0].attachments[0].filename, "KIET20250115-1.txt");
    }

    #[tokio::test]
    async fn letter_failure_still_sends_the_receipt_mail() {
        let documents = Arc::new(RecordingGenerator {
            generated: Mutex::new(Vec::new()),
            fail: true,
        });
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
        });

        dispatch_side_effects(
            documents.clone() as Arc<dyn DocumentGenerator>,
            Some(mailer.clone() as Arc<dyn Mailer>),
            sample_letter(),
            "asha@kiet.edu".to_string(),
            String::new(),
        )
        .await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["asha@kiet.edu"]);
        assert!(sent[0].attachments.is_empty());
    }

    #[tokio::test]
    async fn missing_mail_relay_still_writes_the_letter() {
        let documents = Arc::new(RecordingGenerator {
            generated: Mutex::new(Vec::new()),
            fail: false,
        });

        dispatch_side_effects(
            documents.clone() as Arc<dyn DocumentGenerator>,
            None,
            sample_letter(),
            "asha@kiet.edu".to_string(),
            "store@kiet.edu".to_string(),
        )
        .await;

        assert_eq!(documents.generated.lock().unwrap().len(), 1);
    }
}
