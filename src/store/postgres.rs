//! PostgreSQL implementation of the store capability interface.
//!
//! Uses sqlx over the shared connection pool. Dynamic filters are assembled
//! with `QueryBuilder`; every user-supplied value goes through a bind
//! parameter, never string interpolation.
//!
//! The (product_id, user_id) uniqueness rule is enforced by a partial unique
//! index (see `migrations/`), so concurrent duplicate submissions are
//! resolved by the database and the losing insert surfaces as
//! [`StoreError::Duplicate`].

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    models::{
        page::{SortBy, SortOrder},
        review::Review,
        token::ApiToken,
    },
    store::{ReviewFilter, ReviewStore, StoreError},
};

/// sqlx-backed store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: DbPool,
}

impl PostgresStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map driver errors into the store taxonomy.
///
/// Unique-constraint violations become `Duplicate`; everything else is an
/// opaque backend failure.
fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate;
        }
    }
    StoreError::Unavailable(err.into())
}

/// Append the `WHERE` clause shared by count and list queries.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, product_id: &str, filter: &ReviewFilter) {
    builder.push(" WHERE product_id = ");
    builder.push_bind(product_id.to_owned());

    if !filter.ratings.is_empty() {
        builder.push(" AND rating = ANY(");
        builder.push_bind(filter.ratings.clone());
        builder.push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND created_at >= ");
        builder.push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND created_at <= ");
        builder.push_bind(to);
    }
}

#[async_trait]
impl ReviewStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn insert_token(&self, token: ApiToken) -> Result<ApiToken, StoreError> {
        sqlx::query_as::<_, ApiToken>(
            r#"
            INSERT INTO api_tokens (id, token, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, name, created_at
            "#,
        )
        .bind(token.id)
        .bind(&token.token)
        .bind(&token.name)
        .bind(token.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn find_token(&self, secret: &str) -> Result<Option<ApiToken>, StoreError> {
        sqlx::query_as::<_, ApiToken>(
            "SELECT id, token, name, created_at FROM api_tokens WHERE token = $1",
        )
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_review(&self, review: Review) -> Result<Review, StoreError> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, product_id, user_id, rating, comment, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, product_id, user_id, rating, comment, status, created_at
            "#,
        )
        .bind(review.id)
        .bind(&review.product_id)
        .bind(&review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.status)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn review_exists(&self, product_id: &str, user_id: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE product_id = $1 AND user_id = $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, StoreError> {
        let deleted = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn count_reviews(
        &self,
        product_id: &str,
        filter: &ReviewFilter,
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM reviews");
        push_filters(&mut builder, product_id, filter);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(total as u64)
    }

    async fn list_reviews(
        &self,
        product_id: &str,
        filter: &ReviewFilter,
        sort_by: SortBy,
        sort_order: SortOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Review>, StoreError> {
        let mut builder = QueryBuilder::new(
            "SELECT id, product_id, user_id, rating, comment, status, created_at FROM reviews",
        );
        push_filters(&mut builder, product_id, filter);

        // Sort column and direction come from validated enums, not user
        // strings; id breaks ties for stable pagination.
        builder.push(format!(
            " ORDER BY {} {}, id ASC",
            sort_by.column(),
            sort_order.keyword()
        ));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
        builder.push(" OFFSET ");
        builder.push_bind(offset as i64);

        builder
            .build_query_as::<Review>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn rating_counts(&self, product_id: &str) -> Result<[u64; 5], StoreError> {
        let rows = sqlx::query_as::<_, (i16, i64)>(
            "SELECT rating, COUNT(*) FROM reviews WHERE product_id = $1 GROUP BY rating",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut counts = [0u64; 5];
        for (rating, count) in rows {
            if (1..=5).contains(&rating) {
                counts[(rating - 1) as usize] = count as u64;
            }
        }
        Ok(counts)
    }
}
