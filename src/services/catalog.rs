use crate::{
    entities::{category, product, Category, CategoryModel, Product, ProductModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Catalog service for browsing and managing products and categories
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// List products, optionally narrowed by category and a substring search
    /// over name and description.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: ProductListQuery,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        let mut db_query = Product::find();

        if let Some(category_id) = query.category_id {
            db_query = db_query.filter(product::Column::CategoryId.eq(category_id));
        }

        if let Some(search) = &query.search {
            let term = search.trim();
            if !term.is_empty() {
                db_query = db_query.filter(
                    product::Column::Name
                        .contains(term)
                        .or(product::Column::Description.contains(term)),
                );
            }
        }

        let products = db_query
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(products)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<ProductModel, ServiceError> {
        Product::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    /// Create a new product.
    ///
    /// The referenced category must already exist; input bounds (name and
    /// description length, positive price, non-negative stock) are validated
    /// before anything is written.
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        input.validate()?;
        self.ensure_category_exists(input.category_id).await?;

        let product_id = Uuid::new_v4();
        let now = Utc::now();

        let product = product::ActiveModel {
            id: Set(product_id),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            price: Set(input.price),
            category_id: Set(input.category_id),
            stock_quantity: Set(input.stock_quantity),
            image_url: Set(input.image_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let product = product.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(product_id))
            .await;

        info!("Created product: {}", product_id);
        Ok(product)
    }

    /// List all categories ordered by name
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(categories)
    }

    /// Create a new category
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<CategoryModel, ServiceError> {
        input.validate()?;

        let category_id = Uuid::new_v4();

        let category = category::ActiveModel {
            id: Set(category_id),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
        };

        let category = category.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CategoryCreated(category_id))
            .await;

        info!("Created category: {}", category_id);
        Ok(category)
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> Result<(), ServiceError> {
        if Category::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::ValidationError(format!(
                "Category {} does not exist",
                category_id
            )));
        }

        Ok(())
    }
}

/// Filters accepted by the product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
    #[validate(custom = "crate::entities::product::validate_positive_price")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub category_id: Uuid,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Input for creating a category
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product_input() -> CreateProductInput {
        CreateProductInput {
            name: "Mechanical Keyboard".to_string(),
            description: "Tenkeyless, hot-swappable switches".to_string(),
            price: dec!(89.99),
            category_id: Uuid::new_v4(),
            stock_quantity: 25,
            image_url: None,
        }
    }

    #[test]
    fn product_input_accepts_valid_fields() {
        assert!(product_input().validate().is_ok());
    }

    #[test]
    fn product_input_rejects_empty_name() {
        let mut input = product_input();
        input.name = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn product_input_rejects_non_positive_price() {
        let mut input = product_input();
        input.price = Decimal::ZERO;
        assert!(input.validate().is_err());

        input.price = dec!(-1.50);
        assert!(input.validate().is_err());
    }

    #[test]
    fn product_input_rejects_negative_stock() {
        let mut input = product_input();
        input.stock_quantity = -1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn product_input_rejects_malformed_image_url() {
        let mut input = product_input();
        input.image_url = Some("not-a-url".to_string());
        assert!(input.validate().is_err());
    }

    #[test]
    fn category_input_rejects_overlong_name() {
        let input = CreateCategoryInput {
            name: "x".repeat(101),
            description: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn list_query_deserializes_from_url_params() {
        let query: ProductListQuery =
            serde_json::from_str(r#"{"search": "keyboard"}"#).expect("valid query");
        assert_eq!(query.search.as_deref(), Some("keyboard"));
        assert!(query.category_id.is_none());
    }
}
