// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use chrono::FixedOffset;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::fechas::offset_horario,
    db::{ClientesRepository, FinanciamientosRepository, GarantiasRepository},
    services::{
        caja_service::CajaService, clientes_service::ClientesService, difusion::Despachador,
        documentos::DocumentosService, financiamientos_service::FinanciamientosService,
        garantias_service::GarantiasService, recordatorios::RecordatoriosService,
    },
    whatsapp::{ChatClient, GatewayWhatsApp},
};

// Pausa corta entre avisos de los trabajos diarios (no es la pausa larga
// de las campañas de difusión).
const PAUSA_RECORDATORIOS: Duration = Duration::from_secs(15);

/// Constantes de política del negocio, leídas una sola vez del entorno.
#[derive(Clone)]
pub struct Ajustes {
    pub offset: FixedOffset,
    pub pausa_difusion: Duration,
    pub ventana_ofertas: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    // La sesión de chat es un objeto con dueño, inyectado a los handlers.
    // Nada de variables globales mutables.
    pub chat: Arc<dyn ChatClient>,

    pub clientes_repo: ClientesRepository,
    pub garantias_repo: GarantiasRepository,
    pub financiamientos_repo: FinanciamientosRepository,

    pub clientes: ClientesService,
    pub financiamientos: FinanciamientosService,
    pub garantias: GarantiasService,
    pub despachador: Despachador,
    pub recordatorios: RecordatoriosService,
    pub caja: CajaService,

    pub ajustes: Ajustes,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");
        let gateway_url =
            env::var("WHATSAPP_API_URL").expect("WHATSAPP_API_URL debe estar definida");
        let api_key = env::var("WHATSAPP_API_KEY").ok();

        let ruta_caja =
            PathBuf::from(env::var("CAJA_PATH").unwrap_or_else(|_| "caja.txt".to_string()));
        let ruta_fuentes = env::var("RUTA_FUENTES").unwrap_or_else(|_| "./fonts".to_string());

        // Por defecto: hora de Lima, 90 segundos entre mensajes de difusión,
        // y las ofertas iniciales repartidas en una ventana de dos horas.
        let offset_horas: i32 = variable_numerica("TZ_OFFSET_HORAS", -5) as i32;
        let pausa_difusion =
            Duration::from_secs(variable_numerica("PAUSA_DIFUSION_SEGUNDOS", 90) as u64);
        let ventana_ofertas =
            Duration::from_secs(variable_numerica("VENTANA_OFERTAS_SEGUNDOS", 7200) as u64);

        // Conecta a la base de datos, propagando errores con '?'
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida!");

        // --- Arma el grafo de dependencias ---
        let chat: Arc<dyn ChatClient> = Arc::new(GatewayWhatsApp::new(gateway_url, api_key));

        let clientes_repo = ClientesRepository::new(db_pool.clone());
        let garantias_repo = GarantiasRepository::new(db_pool.clone());
        let financiamientos_repo = FinanciamientosRepository::new(db_pool.clone());

        let despachador = Despachador::new(chat.clone());
        let documentos = DocumentosService::new(ruta_fuentes);

        let ajustes = Ajustes {
            offset: offset_horario(offset_horas),
            pausa_difusion,
            ventana_ofertas,
        };

        let clientes = ClientesService::new(clientes_repo.clone());
        let financiamientos = FinanciamientosService::new(
            financiamientos_repo.clone(),
            clientes_repo.clone(),
            documentos.clone(),
            despachador.clone(),
        );
        let garantias = GarantiasService::new(
            garantias_repo.clone(),
            clientes_repo.clone(),
            documentos.clone(),
            despachador.clone(),
        );
        let recordatorios = RecordatoriosService::new(
            garantias_repo.clone(),
            financiamientos_repo.clone(),
            clientes_repo.clone(),
            despachador.clone(),
            ajustes.offset,
            PAUSA_RECORDATORIOS,
        );
        let caja = CajaService::new(ruta_caja);

        Ok(Self {
            db_pool,
            chat,
            clientes_repo,
            garantias_repo,
            financiamientos_repo,
            clientes,
            financiamientos,
            garantias,
            despachador,
            recordatorios,
            caja,
            ajustes,
        })
    }
}

fn variable_numerica(nombre: &str, por_defecto: i64) -> i64 {
    env::var(nombre)
        .ok()
        .and_then(|valor| valor.parse().ok())
        .unwrap_or(por_defecto)
}
