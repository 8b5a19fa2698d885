use crate::{
    entities::{user, User, UserModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User registration service
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Registers a new user from a name and email.
    ///
    /// The email must be well formed and not already registered; a unique
    /// index on the column backs the in-service check.
    #[instrument(skip(self))]
    pub async fn register(&self, input: RegisterUserInput) -> Result<UserModel, ServiceError> {
        input.validate()?;
        self.ensure_unique_email(&input.email).await?;

        let user_id = Uuid::new_v4();

        let user = user::ActiveModel {
            id: Set(user_id),
            name: Set(input.name.clone()),
            email: Set(input.email.clone()),
            created_at: Set(Utc::now()),
        };

        let user = user.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::UserRegistered(user_id))
            .await;

        info!("Registered user: {}", user_id);
        Ok(user)
    }

    /// List registered users, newest first
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserModel>, ServiceError> {
        let users = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(users)
    }

    async fn ensure_unique_email(&self, email: &str) -> Result<(), ServiceError> {
        if User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ServiceError::ValidationError(format!(
                "Email {} is already registered",
                email
            )));
        }

        Ok(())
    }
}

/// Input for registering a user
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RegisterUserInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
}
