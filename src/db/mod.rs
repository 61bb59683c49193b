// src/db/mod.rs

pub mod clientes_repo;
pub mod financiamientos_repo;
pub mod garantias_repo;

pub use clientes_repo::ClientesRepository;
pub use financiamientos_repo::FinanciamientosRepository;
pub use garantias_repo::GarantiasRepository;
