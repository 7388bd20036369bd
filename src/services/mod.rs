//! Servicios de dominio

pub mod rent_service;
pub mod token_service;
