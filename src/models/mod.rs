//! Modelos de dominio

pub mod rent;
pub mod transport;
pub mod user;
