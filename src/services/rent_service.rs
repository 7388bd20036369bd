//! Servicio del ciclo de vida de rentas
//!
//! Este módulo concentra las dos transiciones de estado (inicio y cierre)
//! y la regla de facturación. Ambas transiciones corren dentro de una
//! transacción con `SELECT ... FOR UPDATE` sobre la fila implicada, de modo
//! que dos peticiones concurrentes sobre el mismo transporte no puedan
//! pasar la comprobación de rentabilidad a la vez.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::rent::{Rent, RentType};
use crate::models::transport::Transport;
use crate::utils::errors::{conflict_error, AppError, AppResult};

/// Unidades facturadas para una duración en segundos.
///
/// Minutos: cada minuto empezado cuenta. Días: días completos más uno si
/// queda cualquier resto, salvo resto exactamente cero.
pub fn billed_units(rent_type: RentType, elapsed_seconds: i64) -> i64 {
    match rent_type {
        RentType::Minutes => (elapsed_seconds + 59) / 60,
        RentType::Days => {
            let whole_days = elapsed_seconds / 86_400;
            if elapsed_seconds % 86_400 > 0 {
                whole_days + 1
            } else {
                whole_days
            }
        }
    }
}

/// Total a liquidar: unidades por el precio congelado al inicio
pub fn total_price(price_of_unit: Decimal, units: i64) -> Decimal {
    price_of_unit * Decimal::from(units)
}

pub struct RentService {
    pool: PgPool,
}

impl RentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inicia una renta: congela el precio de la unidad elegida, retira la
    /// ubicación del transporte y lo marca como no rentable.
    pub async fn start(
        &self,
        renter_id: Uuid,
        transport_id: Uuid,
        rent_type: RentType,
    ) -> AppResult<Rent> {
        let mut tx = self.pool.begin().await?;

        let transport = sqlx::query_as::<_, Transport>(
            r#"
            SELECT id, owner_id, transport_type, model, color, identifier,
                   description, latitude, longitude, minute_price, day_price, can_be_rented
            FROM transports
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(transport_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

        if !transport.can_be_rented {
            return Err(conflict_error("El transporte no está disponible para renta"));
        }

        if transport.owner_id == renter_id {
            return Err(conflict_error("No se puede rentar el transporte propio"));
        }

        let price_of_unit = transport
            .price_for(rent_type)
            .ok_or_else(|| conflict_error("El transporte no ofrece esa unidad de tarifa"))?;

        let rent = sqlx::query_as::<_, Rent>(
            r#"
            INSERT INTO rents (id, renter_id, transport_id, rent_type, price_of_unit, start_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, renter_id, transport_id, rent_type, price_of_unit,
                      start_time, end_time, total_price
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(renter_id)
        .bind(transport_id)
        .bind(rent_type)
        .bind(price_of_unit)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE transports SET can_be_rented = FALSE, latitude = NULL, longitude = NULL WHERE id = $1",
        )
        .bind(transport_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("🔑 Renta {} iniciada sobre transporte {}", rent.id, transport_id);
        Ok(rent)
    }

    /// Cierra una renta: deja el transporte en las coordenadas entregadas,
    /// lo vuelve rentable, liquida el total y lo debita del balance.
    ///
    /// `enforce_renter` distingue la vía de usuario (solo el arrendatario)
    /// de la administrativa. `bill_actor` reproduce el comportamiento
    /// original de cobrar al actor en el cierre administrativo; apagado,
    /// se cobra siempre al arrendatario.
    pub async fn end(
        &self,
        rent_id: Uuid,
        actor_id: Uuid,
        latitude: f64,
        longitude: f64,
        enforce_renter: bool,
        bill_actor: bool,
    ) -> AppResult<Rent> {
        let mut tx = self.pool.begin().await?;

        let rent = sqlx::query_as::<_, Rent>(
            r#"
            SELECT id, renter_id, transport_id, rent_type, price_of_unit,
                   start_time, end_time, total_price
            FROM rents
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(rent_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Renta no encontrada".to_string()))?;

        if enforce_renter && rent.renter_id != actor_id {
            return Err(AppError::Forbidden(
                "Solo quien creó la renta puede terminarla".to_string(),
            ));
        }

        if rent.end_time.is_some() {
            return Err(conflict_error("La renta ya está terminada"));
        }

        let end_time = Utc::now();
        let elapsed_seconds = (end_time - rent.start_time).num_seconds().max(0);
        let units = billed_units(rent.rent_type, elapsed_seconds);
        let total = total_price(rent.price_of_unit, units);

        // el transporte pudo haber sido borrado durante la renta
        if let Some(transport_id) = rent.transport_id {
            sqlx::query(
                "UPDATE transports SET latitude = $2, longitude = $3, can_be_rented = TRUE WHERE id = $1",
            )
            .bind(transport_id)
            .bind(latitude)
            .bind(longitude)
            .execute(&mut *tx)
            .await?;
        }

        let rent = sqlx::query_as::<_, Rent>(
            r#"
            UPDATE rents
            SET end_time = $2, total_price = $3
            WHERE id = $1
            RETURNING id, renter_id, transport_id, rent_type, price_of_unit,
                      start_time, end_time, total_price
            "#,
        )
        .bind(rent_id)
        .bind(end_time)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let billed_user = if bill_actor { actor_id } else { rent.renter_id };

        // el balance puede quedar negativo: no hay chequeo de crédito
        sqlx::query("UPDATE users SET balance = balance - $2 WHERE id = $1")
            .bind(billed_user)
            .bind(total)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "🏁 Renta {} terminada: {} unidades, total {}",
            rent.id, units, total
        );
        Ok(rent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_billing_rounds_up_started_minutes() {
        assert_eq!(billed_units(RentType::Minutes, 60), 1);
        assert_eq!(billed_units(RentType::Minutes, 61), 2);
        assert_eq!(billed_units(RentType::Minutes, 90), 2);
        assert_eq!(billed_units(RentType::Minutes, 0), 0);
        assert_eq!(billed_units(RentType::Minutes, 1), 1);
    }

    #[test]
    fn test_day_billing_rounds_up_partial_days() {
        assert_eq!(billed_units(RentType::Days, 2 * 86_400), 2);
        assert_eq!(billed_units(RentType::Days, 2 * 86_400 + 1), 3);
        assert_eq!(billed_units(RentType::Days, 86_400 - 1), 1);
        assert_eq!(billed_units(RentType::Days, 0), 0);
    }

    #[test]
    fn test_total_price_uses_snapshotted_unit_price() {
        let unit = Decimal::new(550, 2); // 5.50
        assert_eq!(total_price(unit, 2), Decimal::new(1100, 2));
        assert_eq!(total_price(unit, 0), Decimal::ZERO);
    }

    #[test]
    fn test_minute_billing_long_rental_counts_total_elapsed() {
        // 2 días y 30 segundos en minutos: 2881 minutos empezados
        let elapsed = 2 * 86_400 + 30;
        assert_eq!(billed_units(RentType::Minutes, elapsed), 2881);
    }
}
