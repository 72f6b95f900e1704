//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use eventix_core::domain::{Event, Ticket, User, mask_email};
use eventix_core::error::RepoError;
use eventix_core::ports::{EventRepository, TicketRepository, UserRepository};

use super::entity::event::{self, Entity as EventEntity};
use super::entity::ticket::{self, Entity as TicketEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL event repository.
pub type PostgresEventRepository = PostgresBaseRepository<EventEntity>;

/// PostgreSQL ticket repository.
pub type PostgresTicketRepository = PostgresBaseRepository<TicketEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn list_all(&self) -> Result<Vec<Event>, RepoError> {
        let result = EventEntity::find()
            .order_by_asc(event::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        // Increment happens in the database in a single statement.
        let updated = EventEntity::update_many()
            .col_expr(event::Column::Likes, Expr::col(event::Column::Likes).add(1))
            .col_expr(event::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(event::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Ticket>, RepoError> {
        let result = TicketEntity::find()
            .filter(ticket::Column::UserId.eq(user_id))
            .order_by_asc(ticket::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
