// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing store: search execution (the pager) and listings CRUD.

use crate::models::auth::AuthUser;
use crate::models::property::{Property, PropertyPayload};
use crate::models::search::{SearchFilters, SearchResponse};
use crate::services::error::ApiError;
use crate::services::query::{self, BindValue, LISTING_COLUMNS};
use sqlx::postgres::PgArguments;
use sqlx::PgPool;
use uuid::Uuid;

fn bind_rows<'q, O>(
    mut q: sqlx::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    binds: &[BindValue],
) -> sqlx::QueryAs<'q, sqlx::Postgres, O, PgArguments> {
    for bind in binds {
        q = match bind {
            BindValue::Text(v) => q.bind(v.clone()),
            BindValue::Float(v) => q.bind(*v),
            BindValue::Int(v) => q.bind(*v),
        };
    }
    q
}

fn bind_scalar<'q, O>(
    mut q: sqlx::QueryScalar<'q, sqlx::Postgres, O, PgArguments>,
    binds: &[BindValue],
) -> sqlx::QueryScalar<'q, sqlx::Postgres, O, PgArguments> {
    for bind in binds {
        q = match bind {
            BindValue::Text(v) => q.bind(v.clone()),
            BindValue::Float(v) => q.bind(*v),
            BindValue::Int(v) => q.bind(*v),
        };
    }
    q
}

/// Store for property listings.
pub struct PropertyStore {
    pool: PgPool,
}

impl PropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute a search: compose the plan, then run the count and the page
    /// fetch inside one transaction so both observe the same snapshot and the
    /// reported total can never disagree with the page contents.
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResponse, ApiError> {
        let plan = query::compose(filters)?;
        let count_sql = plan.count_sql();
        let select_sql = plan.select_sql();

        let mut tx = self.pool.begin().await?;

        let count: i64 = bind_scalar(sqlx::query_scalar(&count_sql), plan.binds())
            .fetch_one(&mut *tx)
            .await?;

        let properties: Vec<Property> = bind_rows(sqlx::query_as(&select_sql), plan.binds())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(SearchResponse {
            properties,
            count,
            page: plan.page,
            limit: plan.limit,
            total_pages: query::total_pages(count, plan.limit),
        })
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        payload: &PropertyPayload,
    ) -> Result<Property, ApiError> {
        payload.validate().map_err(ApiError::Validation)?;

        let id = Uuid::now_v7();
        let sql = format!(
            "INSERT INTO properties (id, broker_id, agency_id, city, district, street, \
             house_number, heating_type, floor_number, num_rooms, area_m2, price, \
             purpose, type, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
             COALESCE($16, 'active')) \
             RETURNING {LISTING_COLUMNS}"
        );

        let property: Property = sqlx::query_as(&sql)
            .bind(id)
            .bind(user.user_id)
            .bind(user.agency_id)
            .bind(&payload.city)
            .bind(&payload.district)
            .bind(&payload.street)
            .bind(&payload.house_number)
            .bind(&payload.heating_type)
            .bind(payload.floor_number)
            .bind(payload.num_rooms)
            .bind(payload.area_m2)
            .bind(payload.price)
            .bind(&payload.purpose)
            .bind(&payload.property_type)
            .bind(&payload.description)
            .bind(&payload.status)
            .fetch_one(&self.pool)
            .await?;

        println!(
            "[LISTINGS] Listing created: id={}, broker_id={}",
            property.id, user.user_id
        );

        Ok(property)
    }

    pub async fn get(&self, id: Uuid) -> Result<Property, ApiError> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))
    }

    pub async fn list_for_broker(&self, user: &AuthUser) -> Result<Vec<Property>, ApiError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM properties \
             WHERE broker_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as(&sql)
            .bind(user.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        payload: &PropertyPayload,
    ) -> Result<Property, ApiError> {
        payload.validate().map_err(ApiError::Validation)?;
        self.authorize_mutation(user, id).await?;

        let sql = format!(
            "UPDATE properties SET city = $1, district = $2, street = $3, \
             house_number = $4, heating_type = $5, floor_number = $6, num_rooms = $7, \
             area_m2 = $8, price = $9, purpose = $10, type = $11, description = $12, \
             status = COALESCE($13, status), updated_at = now() \
             WHERE id = $14 \
             RETURNING {LISTING_COLUMNS}"
        );

        let property: Property = sqlx::query_as(&sql)
            .bind(&payload.city)
            .bind(&payload.district)
            .bind(&payload.street)
            .bind(&payload.house_number)
            .bind(&payload.heating_type)
            .bind(payload.floor_number)
            .bind(payload.num_rooms)
            .bind(payload.area_m2)
            .bind(payload.price)
            .bind(&payload.purpose)
            .bind(&payload.property_type)
            .bind(&payload.description)
            .bind(&payload.status)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(property)
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        self.authorize_mutation(user, id).await?;

        sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        println!(
            "[LISTINGS] Listing deleted: id={}, by user_id={}",
            id, user.user_id
        );

        Ok(())
    }

    /// Append an uploaded image key to the listing's ordered image list.
    pub async fn attach_image(
        &self,
        user: &AuthUser,
        id: Uuid,
        image_key: &str,
    ) -> Result<(), ApiError> {
        self.authorize_mutation(user, id).await?;

        sqlx::query(
            "UPDATE properties SET images = array_append(images, $1), updated_at = now() \
             WHERE id = $2",
        )
        .bind(image_key)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Ownership gate for mutations: the owning broker, or a company user of
    /// the owning agency.
    async fn authorize_mutation(&self, user: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let owner: Option<(Uuid, Option<Uuid>)> =
            sqlx::query_as("SELECT broker_id, agency_id FROM properties WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let (broker_id, agency_id) =
            owner.ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?;

        if !user.can_manage_listing(broker_id, agency_id) {
            return Err(ApiError::Forbidden(
                "You may only modify your own listings".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/estate_desk_test".to_string());
        PgPool::connect(&url).await.expect("connect test database")
    }

    #[tokio::test]
    #[ignore] // Requires Postgres
    async fn test_search_with_empty_filters_returns_everything() {
        let store = PropertyStore::new(test_pool().await);
        let response = store.search(&SearchFilters::default()).await.unwrap();
        assert_eq!(response.page, 1);
        assert_eq!(response.limit, 10);
        assert!(response.properties.len() as i64 <= response.limit);
        assert_eq!(
            response.total_pages,
            query::total_pages(response.count, response.limit)
        );
    }

    #[tokio::test]
    #[ignore] // Requires Postgres
    async fn test_search_failure_is_distinct_from_empty_result() {
        let store = PropertyStore::new(test_pool().await);
        let unmatchable = SearchFilters {
            city: Some("no-such-city-zzz".to_string()),
            ..Default::default()
        };
        let response = store.search(&unmatchable).await.unwrap();
        assert_eq!(response.count, 0);
        assert_eq!(response.total_pages, 0);
        assert!(response.properties.is_empty());
    }
}
