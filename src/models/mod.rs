// src/models/mod.rs

pub mod caja;
pub mod clientes;
pub mod financiamientos;
pub mod garantias;
