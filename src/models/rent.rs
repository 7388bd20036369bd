//! Modelo de Rent
//!
//! Este módulo contiene el registro de renta y sus requests. El precio por
//! unidad se congela al iniciar la renta y no sigue al precio del transporte.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Unidad de facturación - mapea al ENUM rent_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "rent_type")]
pub enum RentType {
    Minutes,
    Days,
}

impl FromStr for RentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Minutes" => Ok(RentType::Minutes),
            "Days" => Ok(RentType::Days),
            _ => Err(()),
        }
    }
}

/// Rent principal - mapea exactamente a la tabla rents.
///
/// `transport_id` es opcional: sobrevive al borrado del transporte.
/// `end_time` y `total_price` quedan NULL mientras la renta está activa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rent {
    pub id: Uuid,
    pub renter_id: Uuid,
    pub transport_id: Option<Uuid>,
    pub rent_type: RentType,
    pub price_of_unit: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_price: Option<Decimal>,
}

impl Rent {
    /// La renta sigue activa (sin liquidar)
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Request administrativo para crear o reescribir un registro de renta
#[derive(Debug, Deserialize, Validate)]
pub struct AdminRentRequest {
    pub renter_id: Uuid,
    pub transport_id: Option<Uuid>,
    pub rent_type: RentType,
    pub price_of_unit: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_price: Option<Decimal>,
}

/// Response de renta para la API
#[derive(Debug, Serialize)]
pub struct RentResponse {
    pub id: Uuid,
    pub renter_id: Uuid,
    pub transport_id: Option<Uuid>,
    pub rent_type: RentType,
    pub price_of_unit: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_price: Option<Decimal>,
}

impl From<Rent> for RentResponse {
    fn from(rent: Rent) -> Self {
        Self {
            id: rent.id,
            renter_id: rent.renter_id,
            transport_id: rent.transport_id,
            rent_type: rent.rent_type,
            price_of_unit: rent.price_of_unit,
            start_time: rent.start_time,
            end_time: rent.end_time,
            total_price: rent.total_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_type_parsing() {
        assert_eq!("Minutes".parse::<RentType>(), Ok(RentType::Minutes));
        assert_eq!("Days".parse::<RentType>(), Ok(RentType::Days));
        assert!("Hours".parse::<RentType>().is_err());
        assert!("minutes".parse::<RentType>().is_err());
    }
}
