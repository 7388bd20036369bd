//! Repositorios de acceso a datos

pub mod rent_repository;
pub mod token_repository;
pub mod transport_repository;
pub mod user_repository;
