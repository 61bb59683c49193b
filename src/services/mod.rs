// src/services/mod.rs

pub mod caja_service;
pub mod clientes_service;
pub mod difusion;
pub mod documentos;
pub mod financiamientos_service;
pub mod garantias_service;
pub mod recordatorios;
