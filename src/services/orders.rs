use crate::{
    entities::{
        cart_item, order, order_item, CartItem, Order, OrderItem, OrderItemModel, OrderModel,
        OrderStatus, Product,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order service covering checkout and the order status lifecycle.
///
/// Checkout converts a session's cart into an order inside a single
/// transaction: stock checks, stock decrements, the order insert, and the
/// cart purge either all land or none do. A failure at any line (a vanished
/// product, insufficient stock) rolls the whole attempt back, so stock is
/// never partially consumed by an order that was not created.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Places an order from the session's cart.
    ///
    /// Each cart line is re-read against the current catalog: the product
    /// must still exist and its stock must cover the line quantity. The
    /// product's name and current price are snapshotted into the order line,
    /// so later catalog edits never alter historical totals.
    ///
    /// # Returns
    ///
    /// * `Ok(OrderWithItems)` - The created order, status `Pending`, with its lines
    /// * `Err(ServiceError::InvalidOperation)` - Cart is empty
    /// * `Err(ServiceError::InsufficientStock)` - A line exceeds current stock
    /// * `Err(ServiceError::NotFound)` - A cart line references a missing product
    /// * `Err(ServiceError::ValidationError)` - Malformed customer email
    #[instrument(skip(self), fields(session_id = %input.session_id))]
    pub async fn checkout(&self, input: CheckoutInput) -> Result<OrderWithItems, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let lines = CartItem::find()
            .filter(cart_item::Column::SessionId.eq(input.session_id.as_str()))
            .order_by_asc(cart_item::Column::AddedAt)
            .all(&txn)
            .await?;

        if lines.is_empty() {
            warn!(session_id = %input.session_id, "Checkout attempted with an empty cart");
            return Err(ServiceError::InvalidOperation("Cart is empty".to_string()));
        }

        let order_id = Uuid::new_v4();
        let now = Utc::now();

        let mut total_amount = Decimal::ZERO;
        let mut snapshots = Vec::with_capacity(lines.len());

        for line in &lines {
            let product = Product::find_by_id(line.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product {} not found", line.product_id))
                })?;

            if !product.has_stock(line.quantity) {
                warn!(
                    product_id = %product.id,
                    requested = line.quantity,
                    available = product.stock_quantity,
                    "Checkout line exceeds current stock"
                );
                return Err(ServiceError::InsufficientStock(format!(
                    "Insufficient stock for {}: requested {}, available {}",
                    product.name, line.quantity, product.stock_quantity
                )));
            }

            total_amount += product.price * Decimal::from(line.quantity);
            snapshots.push(order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(product.id),
                product_name: Set(product.name.clone()),
                quantity: Set(line.quantity),
                price_at_time: Set(product.price),
            });

            let remaining = product.stock_quantity - line.quantity;
            let mut product: crate::entities::product::ActiveModel = product.into();
            product.stock_quantity = Set(remaining);
            product.update(&txn).await?;
        }

        let order = order::ActiveModel {
            id: Set(order_id),
            customer_email: Set(input.customer_email.clone()),
            order_date: Set(now),
            status: Set(OrderStatus::Pending),
            total_amount: Set(total_amount),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            version: Set(1),
        };
        let order = order.insert(&txn).await?;

        let mut items = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            items.push(snapshot.insert(&txn).await?);
        }

        CartItem::delete_many()
            .filter(cart_item::Column::SessionId.eq(input.session_id.as_str()))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderCreated(order_id))
            .await;

        info!(
            "Checkout completed: order {} created from cart {} ({} lines, total {})",
            order_id,
            input.session_id,
            items.len(),
            order.total_amount
        );
        Ok(OrderWithItems { order, items })
    }

    /// List orders, newest first
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderModel>, ServiceError> {
        let orders = Order::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(orders)
    }

    /// Get an order with its lines
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderWithItems, ServiceError> {
        let order = Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let items = order.find_related(OrderItem).all(&*self.db).await?;

        Ok(OrderWithItems { order, items })
    }

    /// Moves an order to a new status.
    ///
    /// The transition table lives on [`OrderStatus`]; an illegal move (for
    /// example confirming an order twice, or cancelling a delivered one)
    /// fails without touching the row. Legal moves bump the order's version.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let txn = self.db.begin().await?;

        let order = Order::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Order not found for status update");
                ServiceError::NotFound(format!("Order {} not found", order_id))
            })?;

        let old_status = order.status;
        if !old_status.can_transition_to(new_status) {
            warn!(
                order_id = %order_id,
                from = %old_status,
                to = %new_status,
                "Rejected illegal status transition"
            );
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot transition order from '{}' to '{}'",
                old_status, new_status
            )));
        }

        let mut active: order::ActiveModel = order.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(Utc::now()));
        let current_version = active.version.as_ref();
        active.version = Set(current_version + 1);

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: old_status.to_string(),
                new_status: new_status.to_string(),
            })
            .await;

        info!(
            "Order {} status updated from '{}' to '{}'",
            order_id, old_status, new_status
        );
        Ok(updated)
    }
}

/// Input for placing an order from a cart
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CheckoutInput {
    #[validate(length(min = 1, message = "Session id is required"))]
    pub session_id: String,
    #[validate(email(message = "Customer email must be a valid email address"))]
    pub customer_email: String,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: OrderModel,
    pub items: Vec<OrderItemModel>,
}
