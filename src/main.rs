// src/main.rs

mod common;
mod config;
mod db;
mod handlers;
mod models;
mod scheduler;
mod services;
mod whatsapp;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa el sistema de logs
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falló la inicialización del estado de la aplicación.");

    // Corre las migraciones pendientes al arrancar. Si fallan, mejor no
    // levantar el servidor.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallaron las migraciones de la base de datos.");
    tracing::info!("✅ Migraciones ejecutadas!");

    // Trabajos diarios de recordatorios (cuotas y garantías)
    scheduler::lanzar(app_state.clone());

    // --- Rutas ---
    let rutas_financiamientos = Router::new()
        .route(
            "/",
            get(handlers::financiamientos::formulario).post(handlers::financiamientos::crear),
        )
        .route("/pagar", post(handlers::financiamientos::pagar))
        .route("/buscar", get(handlers::financiamientos::buscar));

    let rutas_garantias = Router::new().route(
        "/",
        get(handlers::garantias::formulario).post(handlers::garantias::crear),
    );

    let rutas_caja = Router::new()
        .route(
            "/",
            get(handlers::caja::formulario).post(handlers::caja::registrar),
        )
        .route("/reporte", get(handlers::caja::reporte))
        .route("/export", get(handlers::caja::exportar));

    let rutas_sesion = Router::new()
        .route("/qr", get(handlers::sesion::qr))
        .route("/reiniciar", post(handlers::sesion::reiniciar));

    let app = Router::new()
        .route("/", get(handlers::panel::panel))
        .route("/difusion", post(handlers::difusion::difundir))
        .route("/ofertas", post(handlers::difusion::ofertas))
        .route("/webhook/mensaje", post(handlers::webhook::mensaje))
        .nest("/financiamientos", rutas_financiamientos)
        .nest("/garantias", rutas_garantias)
        .nest("/caja", rutas_caja)
        .nest("/sesion", rutas_sesion)
        .with_state(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Falló la creación del listener TCP.");

    tracing::info!("🚀 Servidor escuchando en {}", "0.0.0.0:3000");

    axum::serve(listener, app)
        .await
        .expect("Error fatal en el servidor Axum.");
}
