//! Repositorio de transportes

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::transport::{Transport, TransportType, TransportTypeFilter};
use crate::utils::errors::AppError;

const TRANSPORT_COLUMNS: &str = "id, owner_id, transport_type, model, color, identifier, \
     description, latitude, longitude, minute_price, day_price, can_be_rented";

/// Campos de inserción/reescritura de un transporte
pub struct TransportRecord<'a> {
    pub owner_id: Uuid,
    pub transport_type: TransportType,
    pub model: &'a str,
    pub color: &'a str,
    pub identifier: &'a str,
    pub description: Option<&'a str>,
    pub latitude: f64,
    pub longitude: f64,
    pub minute_price: Option<Decimal>,
    pub day_price: Option<Decimal>,
    pub can_be_rented: bool,
}

pub struct TransportRepository {
    pool: PgPool,
}

impl TransportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, record: TransportRecord<'_>) -> Result<Transport, AppError> {
        let transport = sqlx::query_as::<_, Transport>(
            r#"
            INSERT INTO transports (
                id, owner_id, transport_type, model, color, identifier,
                description, latitude, longitude, minute_price, day_price, can_be_rented
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, owner_id, transport_type, model, color, identifier,
                      description, latitude, longitude, minute_price, day_price, can_be_rented
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.owner_id)
        .bind(record.transport_type)
        .bind(record.model)
        .bind(record.color)
        .bind(record.identifier)
        .bind(record.description)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.minute_price)
        .bind(record.day_price)
        .bind(record.can_be_rented)
        .fetch_one(&self.pool)
        .await?;

        Ok(transport)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Transport>, AppError> {
        let transport = sqlx::query_as::<_, Transport>(&format!(
            "SELECT {} FROM transports WHERE id = $1",
            TRANSPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transport)
    }

    /// Reescribe los campos editables; el tipo y el dueño no cambian aquí
    pub async fn update(
        &self,
        id: Uuid,
        record: TransportRecord<'_>,
    ) -> Result<Transport, AppError> {
        let transport = sqlx::query_as::<_, Transport>(
            r#"
            UPDATE transports
            SET model = $2, color = $3, identifier = $4, description = $5,
                latitude = $6, longitude = $7, minute_price = $8, day_price = $9,
                can_be_rented = $10
            WHERE id = $1
            RETURNING id, owner_id, transport_type, model, color, identifier,
                      description, latitude, longitude, minute_price, day_price, can_be_rented
            "#,
        )
        .bind(id)
        .bind(record.model)
        .bind(record.color)
        .bind(record.identifier)
        .bind(record.description)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.minute_price)
        .bind(record.day_price)
        .bind(record.can_be_rented)
        .fetch_one(&self.pool)
        .await?;

        Ok(transport)
    }

    /// Reescritura administrativa completa, incluidos dueño y tipo
    pub async fn replace(
        &self,
        id: Uuid,
        record: TransportRecord<'_>,
    ) -> Result<Transport, AppError> {
        let transport = sqlx::query_as::<_, Transport>(
            r#"
            UPDATE transports
            SET owner_id = $2, transport_type = $3, model = $4, color = $5,
                identifier = $6, description = $7, latitude = $8, longitude = $9,
                minute_price = $10, day_price = $11, can_be_rented = $12
            WHERE id = $1
            RETURNING id, owner_id, transport_type, model, color, identifier,
                      description, latitude, longitude, minute_price, day_price, can_be_rented
            "#,
        )
        .bind(id)
        .bind(record.owner_id)
        .bind(record.transport_type)
        .bind(record.model)
        .bind(record.color)
        .bind(record.identifier)
        .bind(record.description)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.minute_price)
        .bind(record.day_price)
        .bind(record.can_be_rented)
        .fetch_one(&self.pool)
        .await?;

        Ok(transport)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Listado paginado con filtro de tipo (vía administrativa)
    pub async fn list(
        &self,
        start: i64,
        count: i64,
        filter: TransportTypeFilter,
    ) -> Result<Vec<Transport>, AppError> {
        let type_filter = match filter {
            TransportTypeFilter::All => None,
            TransportTypeFilter::Only(t) => Some(t),
        };

        let transports = sqlx::query_as::<_, Transport>(&format!(
            r#"
            SELECT {}
            FROM transports
            WHERE $3::transport_type IS NULL OR transport_type = $3
            ORDER BY identifier
            OFFSET $1 LIMIT $2
            "#,
            TRANSPORT_COLUMNS
        ))
        .bind(start)
        .bind(count)
        .bind(type_filter)
        .fetch_all(&self.pool)
        .await?;

        Ok(transports)
    }

    /// Candidatos para la búsqueda por proximidad: rentables y con
    /// ubicación conocida. El corte por radio se hace en memoria.
    pub async fn list_rentable_located(
        &self,
        filter: TransportTypeFilter,
    ) -> Result<Vec<Transport>, AppError> {
        let type_filter = match filter {
            TransportTypeFilter::All => None,
            TransportTypeFilter::Only(t) => Some(t),
        };

        let transports = sqlx::query_as::<_, Transport>(&format!(
            r#"
            SELECT {}
            FROM transports
            WHERE can_be_rented = TRUE
              AND latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND ($1::transport_type IS NULL OR transport_type = $1)
            "#,
            TRANSPORT_COLUMNS
        ))
        .bind(type_filter)
        .fetch_all(&self.pool)
        .await?;

        Ok(transports)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Transport>, AppError> {
        let transports = sqlx::query_as::<_, Transport>(&format!(
            "SELECT {} FROM transports WHERE owner_id = $1 ORDER BY identifier",
            TRANSPORT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transports)
    }

    pub async fn identifier_taken(
        &self,
        identifier: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM transports WHERE identifier = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(identifier)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
