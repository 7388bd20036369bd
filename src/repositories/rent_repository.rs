//! Repositorio de rentas
//!
//! Lecturas y escrituras administrativas directas. Las transiciones del
//! ciclo de vida (inicio y cierre) viven en `services::rent_service`, que
//! las ejecuta dentro de una transacción.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rent::{AdminRentRequest, Rent};
use crate::utils::errors::AppError;

const RENT_COLUMNS: &str =
    "id, renter_id, transport_id, rent_type, price_of_unit, start_time, end_time, total_price";

pub struct RentRepository {
    pool: PgPool,
}

impl RentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Rent>, AppError> {
        let rent = sqlx::query_as::<_, Rent>(&format!(
            "SELECT {} FROM rents WHERE id = $1",
            RENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rent)
    }

    pub async fn list_by_renter(&self, renter_id: Uuid) -> Result<Vec<Rent>, AppError> {
        let rents = sqlx::query_as::<_, Rent>(&format!(
            "SELECT {} FROM rents WHERE renter_id = $1 ORDER BY start_time DESC",
            RENT_COLUMNS
        ))
        .bind(renter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rents)
    }

    pub async fn list_by_transport(&self, transport_id: Uuid) -> Result<Vec<Rent>, AppError> {
        let rents = sqlx::query_as::<_, Rent>(&format!(
            "SELECT {} FROM rents WHERE transport_id = $1 ORDER BY start_time DESC",
            RENT_COLUMNS
        ))
        .bind(transport_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rents)
    }

    /// Alta administrativa de un registro crudo, sin transición de estado
    pub async fn create_raw(&self, record: &AdminRentRequest) -> Result<Rent, AppError> {
        let rent = sqlx::query_as::<_, Rent>(
            r#"
            INSERT INTO rents (
                id, renter_id, transport_id, rent_type, price_of_unit,
                start_time, end_time, total_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, renter_id, transport_id, rent_type, price_of_unit,
                      start_time, end_time, total_price
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.renter_id)
        .bind(record.transport_id)
        .bind(record.rent_type)
        .bind(record.price_of_unit)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(record.total_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(rent)
    }

    /// Reescritura administrativa del registro completo
    pub async fn update_raw(&self, id: Uuid, record: &AdminRentRequest) -> Result<Rent, AppError> {
        let rent = sqlx::query_as::<_, Rent>(
            r#"
            UPDATE rents
            SET renter_id = $2, transport_id = $3, rent_type = $4, price_of_unit = $5,
                start_time = $6, end_time = $7, total_price = $8
            WHERE id = $1
            RETURNING id, renter_id, transport_id, rent_type, price_of_unit,
                      start_time, end_time, total_price
            "#,
        )
        .bind(id)
        .bind(record.renter_id)
        .bind(record.transport_id)
        .bind(record.rent_type)
        .bind(record.price_of_unit)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(record.total_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(rent)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
