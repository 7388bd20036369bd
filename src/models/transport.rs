//! Modelo de Transport
//!
//! Este módulo contiene el struct Transport y sus variantes para CRUD.
//! Mapea exactamente al schema PostgreSQL con los ENUM transport_type.
//!
//! Los precios por unidad son `Option<Decimal>`: `None` significa que la
//! tarifa no se ofrece. La ubicación es `Option`: `None` significa que el
//! transporte está en una renta activa.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Tipo de transporte - mapea al ENUM transport_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transport_type")]
pub enum TransportType {
    Car,
    Bike,
    Scooter,
}

impl FromStr for TransportType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Car" => Ok(TransportType::Car),
            "Bike" => Ok(TransportType::Bike),
            "Scooter" => Ok(TransportType::Scooter),
            _ => Err(()),
        }
    }
}

/// Filtro de tipo para búsquedas y listados: un tipo concreto o `All`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportTypeFilter {
    All,
    Only(TransportType),
}

impl FromStr for TransportTypeFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(TransportTypeFilter::All);
        }
        TransportType::from_str(s).map(TransportTypeFilter::Only)
    }
}

/// Transport principal - mapea exactamente a la tabla transports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transport {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub transport_type: TransportType,
    pub model: String,
    pub color: String,
    pub identifier: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub minute_price: Option<Decimal>,
    pub day_price: Option<Decimal>,
    pub can_be_rented: bool,
}

impl Transport {
    /// El transporte está en una renta activa (ubicación retirada)
    pub fn in_rental(&self) -> bool {
        self.latitude.is_none() || self.longitude.is_none()
    }

    /// Precio de la unidad pedida, si se ofrece
    pub fn price_for(&self, rent_type: crate::models::rent::RentType) -> Option<Decimal> {
        match rent_type {
            crate::models::rent::RentType::Minutes => self.minute_price,
            crate::models::rent::RentType::Days => self.day_price,
        }
    }
}

/// Flag rentable derivado: sin ninguna tarifa ofrecida el transporte
/// nunca puede quedar rentable, con tarifa vale lo pedido.
pub fn derived_can_be_rented(
    requested: bool,
    minute_price: &Option<Decimal>,
    day_price: &Option<Decimal>,
) -> bool {
    if minute_price.is_none() && day_price.is_none() {
        false
    } else {
        requested
    }
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut error = ValidationError::new("price");
        error.add_param("value".into(), &price.to_string());
        return Err(error);
    }
    Ok(())
}

/// Request para crear un nuevo transporte
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransportRequest {
    pub can_be_rented: Option<bool>,

    pub transport_type: TransportType,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,

    #[validate(length(min = 1, max = 20))]
    pub identifier: String,

    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(custom = "validate_price")]
    pub minute_price: Option<Decimal>,

    #[validate(custom = "validate_price")]
    pub day_price: Option<Decimal>,
}

/// Request para actualizar un transporte existente (dueño).
///
/// Reemplazo completo de los campos editables; el tipo de transporte
/// no se puede cambiar por esta vía.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransportRequest {
    pub can_be_rented: bool,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,

    #[validate(length(min = 1, max = 20))]
    pub identifier: String,

    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(custom = "validate_price")]
    pub minute_price: Option<Decimal>,

    #[validate(custom = "validate_price")]
    pub day_price: Option<Decimal>,
}

/// Request administrativo: como el de creación pero con dueño explícito
#[derive(Debug, Deserialize, Validate)]
pub struct AdminTransportRequest {
    pub owner_id: Uuid,

    pub can_be_rented: Option<bool>,

    pub transport_type: TransportType,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,

    #[validate(length(min = 1, max = 20))]
    pub identifier: String,

    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(custom = "validate_price")]
    pub minute_price: Option<Decimal>,

    #[validate(custom = "validate_price")]
    pub day_price: Option<Decimal>,
}

/// Response de transporte para la API
#[derive(Debug, Serialize)]
pub struct TransportResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub transport_type: TransportType,
    pub model: String,
    pub color: String,
    pub identifier: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub minute_price: Option<Decimal>,
    pub day_price: Option<Decimal>,
    pub can_be_rented: bool,
}

impl From<Transport> for TransportResponse {
    fn from(transport: Transport) -> Self {
        Self {
            id: transport.id,
            owner_id: transport.owner_id,
            transport_type: transport.transport_type,
            model: transport.model,
            color: transport.color,
            identifier: transport.identifier,
            description: transport.description,
            latitude: transport.latitude,
            longitude: transport.longitude,
            minute_price: transport.minute_price,
            day_price: transport.day_price,
            can_be_rented: transport.can_be_rented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_transport_type_filter_parsing() {
        assert_eq!("All".parse::<TransportTypeFilter>(), Ok(TransportTypeFilter::All));
        assert_eq!(
            "Bike".parse::<TransportTypeFilter>(),
            Ok(TransportTypeFilter::Only(TransportType::Bike))
        );
        assert!("bike".parse::<TransportTypeFilter>().is_err());
        assert!("Tractor".parse::<TransportTypeFilter>().is_err());
    }

    #[test]
    fn test_derived_can_be_rented_requires_a_price() {
        let minute = Some(Decimal::new(550, 2));

        assert!(derived_can_be_rented(true, &minute, &None));
        assert!(!derived_can_be_rented(false, &minute, &None));
        // sin tarifas el flag pedido se ignora
        assert!(!derived_can_be_rented(true, &None, &None));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(validate_price(&Decimal::new(-100, 2)).is_err());
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::new(990, 2)).is_ok());
    }
}
