//! API de renta de transportes
//!
//! Backend REST para registrar usuarios, publicar transportes, rentarlos
//! por minutos o por días y liquidar el saldo al cierre.

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
