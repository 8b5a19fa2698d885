use crate::{
    entities::{cart_item, CartItem, CartItemModel, Product},
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

/// Shopping cart service for session-scoped carts.
///
/// A cart is not a row of its own; it is the set of `cart_items` rows sharing
/// a session identifier. The service keeps two invariants:
/// - at most one line per product within a session (repeat adds merge), and
/// - a line is only created or grown when stock covers the merged quantity.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Adds a product to the cart, merging into an existing line when the
    /// session already holds one for that product.
    ///
    /// The stock check runs against the merged quantity inside the same
    /// transaction as the write, so two adds cannot together promise more
    /// units than the product has.
    ///
    /// # Returns
    ///
    /// * `Ok(CartItemModel)` - The new or updated cart line
    /// * `Err(ServiceError::NotFound)` - Product does not exist
    /// * `Err(ServiceError::InsufficientStock)` - Merged quantity exceeds stock
    /// * `Err(ServiceError::ValidationError)` - Requested quantity below 1
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn add_item(
        &self,
        session_id: &str,
        input: AddToCartInput,
    ) -> Result<CartItemModel, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let product = Product::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let existing_item = CartItem::find()
            .filter(cart_item::Column::SessionId.eq(session_id))
            .filter(cart_item::Column::ProductId.eq(input.product_id))
            .one(&txn)
            .await?;

        let merged_quantity = existing_item.as_ref().map_or(0, |item| item.quantity) + input.quantity;

        if !product.has_stock(merged_quantity) {
            warn!(
                product_id = %product.id,
                requested = merged_quantity,
                available = product.stock_quantity,
                "Requested quantity exceeds stock"
            );
            return Err(ServiceError::InsufficientStock(format!(
                "Insufficient stock for {}: requested {}, available {}",
                product.name, merged_quantity, product.stock_quantity
            )));
        }

        let line = if let Some(item) = existing_item {
            let mut item: cart_item::ActiveModel = item.into();
            item.quantity = Set(merged_quantity);
            item.update(&txn).await?
        } else {
            let item = cart_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                session_id: Set(session_id.to_string()),
                product_id: Set(input.product_id),
                quantity: Set(input.quantity),
                added_at: Set(Utc::now()),
            };
            item.insert(&txn).await?
        };

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                session_id: session_id.to_string(),
                product_id: input.product_id,
                quantity: input.quantity,
            })
            .await;

        info!(
            "Added product {} x{} to cart {}",
            input.product_id, input.quantity, session_id
        );
        Ok(line)
    }

    /// Retrieves the cart for a session with product names, current prices,
    /// and line subtotals. A session with no lines yields an empty cart, not
    /// an error.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_cart(&self, session_id: &str) -> Result<CartView, ServiceError> {
        self.load_view(&*self.db, session_id).await
    }

    /// Sets the quantity of a cart line. A quantity of zero or less removes
    /// the line; a positive quantity is re-checked against current stock.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn update_item_quantity(
        &self,
        session_id: &str,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, ServiceError> {
        let txn = self.db.begin().await?;

        let item = self.find_session_item(&txn, session_id, item_id).await?;

        if quantity <= 0 {
            item.delete(&txn).await?;
        } else {
            let product = Product::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product {} not found", item.product_id))
                })?;

            if !product.has_stock(quantity) {
                return Err(ServiceError::InsufficientStock(format!(
                    "Insufficient stock for {}: requested {}, available {}",
                    product.name, quantity, product.stock_quantity
                )));
            }

            let mut item: cart_item::ActiveModel = item.into();
            item.quantity = Set(quantity);
            item.update(&txn).await?;
        }

        let view = self.load_view(&txn, session_id).await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartItemUpdated {
                session_id: session_id.to_string(),
                item_id,
            })
            .await;

        Ok(view)
    }

    /// Removes a single line from the cart.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn remove_item(
        &self,
        session_id: &str,
        item_id: Uuid,
    ) -> Result<CartView, ServiceError> {
        let txn = self.db.begin().await?;

        let item = self.find_session_item(&txn, session_id, item_id).await?;
        item.delete(&txn).await?;

        let view = self.load_view(&txn, session_id).await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartItemRemoved {
                session_id: session_id.to_string(),
                item_id,
            })
            .await;

        info!("Removed item {} from cart {}", item_id, session_id);
        Ok(view)
    }

    /// Deletes every line held by the session. Clearing an already empty
    /// cart is a no-op.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn clear_cart(&self, session_id: &str) -> Result<(), ServiceError> {
        CartItem::delete_many()
            .filter(cart_item::Column::SessionId.eq(session_id))
            .exec(&*self.db)
            .await?;

        self.event_sender
            .send_or_log(Event::CartCleared {
                session_id: session_id.to_string(),
            })
            .await;

        info!("Cleared cart: {}", session_id);
        Ok(())
    }

    /// Item count and total amount for a session, suitable for a cart badge.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_summary(&self, session_id: &str) -> Result<CartSummary, ServiceError> {
        let view = self.load_view(&*self.db, session_id).await?;

        Ok(CartSummary {
            total_items: view.total_items,
            total_amount: view.total_amount,
        })
    }

    async fn find_session_item(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        session_id: &str,
        item_id: Uuid,
    ) -> Result<CartItemModel, ServiceError> {
        let item = CartItem::find_by_id(item_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cart item {} not found", item_id)))?;

        if item.session_id != session_id {
            return Err(ServiceError::InvalidOperation(
                "Item does not belong to this cart".to_string(),
            ));
        }

        Ok(item)
    }

    async fn load_view(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        session_id: &str,
    ) -> Result<CartView, ServiceError> {
        let rows = CartItem::find()
            .filter(cart_item::Column::SessionId.eq(session_id))
            .order_by_asc(cart_item::Column::AddedAt)
            .find_also_related(Product)
            .all(conn)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (line, product) in rows {
            let product = product.ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", line.product_id))
            })?;

            let line_total = product.price * Decimal::from(line.quantity);
            items.push(CartLineView {
                id: line.id,
                product_id: product.id,
                product_name: product.name,
                unit_price: product.price,
                quantity: line.quantity,
                line_total,
            });
        }

        let total_items = items.iter().map(|line| line.quantity).sum();
        let total_amount = items.iter().map(|line| line.line_total).sum();

        Ok(CartView {
            session_id: session_id.to_string(),
            items,
            total_items,
            total_amount,
        })
    }
}

/// Input for adding a product to a cart
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AddToCartInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// One cart line joined with its product
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    #[schema(value_type = f64, example = 19.99)]
    pub unit_price: Decimal,
    pub quantity: i32,
    #[schema(value_type = f64, example = 59.97)]
    pub line_total: Decimal,
}

/// A session's cart with per-line and aggregate totals
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    pub session_id: String,
    pub items: Vec<CartLineView>,
    pub total_items: i32,
    #[schema(value_type = f64, example = 59.97)]
    pub total_amount: Decimal,
}

/// Count and total for a cart badge
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartSummary {
    pub total_items: i32,
    #[schema(value_type = f64, example = 59.97)]
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(-3, false)]
    #[case(0, false)]
    #[case(1, true)]
    #[case(99, true)]
    fn add_input_quantity_bounds(#[case] quantity: i32, #[case] accepted: bool) {
        let input = AddToCartInput {
            product_id: Uuid::new_v4(),
            quantity,
        };
        assert_eq!(input.validate().is_ok(), accepted);
    }

    #[test]
    fn add_input_deserializes_camel_case_free_body() {
        let json = r#"{
            "product_id": "550e8400-e29b-41d4-a716-446655440000",
            "quantity": 3
        }"#;

        let input: AddToCartInput = serde_json::from_str(json).expect("valid body");
        assert_eq!(input.quantity, 3);
    }

    #[test]
    fn line_total_tracks_unit_price_times_quantity() {
        let line_total = dec!(19.99) * Decimal::from(3);
        assert_eq!(line_total, dec!(59.97));
    }

    #[test]
    fn cart_totals_sum_across_lines() {
        let lines = [
            (dec!(19.99), 3),
            (dec!(5.00), 2),
        ];

        let total_items: i32 = lines.iter().map(|(_, qty)| qty).sum();
        let total_amount: Decimal = lines
            .iter()
            .map(|(price, qty)| *price * Decimal::from(*qty))
            .sum();

        assert_eq!(total_items, 5);
        assert_eq!(total_amount, dec!(69.97));
    }
}
