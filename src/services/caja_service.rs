// src/services/caja_service.rs

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    models::caja::{Movimiento, Periodo, ReporteCaja},
};

/// La caja del negocio: un archivo plano de solo-agregar. Cada venta o
/// gasto anotado a mano es una fila; los reportes releen el archivo entero.
#[derive(Clone)]
pub struct CajaService {
    ruta: PathBuf,
}

impl CajaService {
    pub fn new(ruta: PathBuf) -> Self {
        Self { ruta }
    }

    pub fn registrar(&self, movimiento: &Movimiento) -> Result<(), AppError> {
        let mut archivo = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.ruta)?;
        writeln!(archivo, "{}", movimiento.a_linea())?;
        Ok(())
    }

    /// Lee todas las filas. Las malformadas se saltan con un aviso en el
    /// log, no tumban el reporte.
    pub fn leer_todos(&self) -> Result<Vec<Movimiento>, AppError> {
        if !self.ruta.exists() {
            return Ok(Vec::new());
        }
        let contenido = fs::read_to_string(&self.ruta)?;

        let movimientos = contenido
            .lines()
            .filter(|linea| !linea.trim().is_empty())
            .filter_map(|linea| {
                let mov = Movimiento::de_linea(linea);
                if mov.is_none() {
                    tracing::warn!("Fila de caja malformada, se ignora: {}", linea);
                }
                mov
            })
            .collect();

        Ok(movimientos)
    }

    pub fn reporte(&self, periodo: Periodo, hoy: FechaCorta) -> Result<ReporteCaja, AppError> {
        let movimientos = self.leer_todos()?;
        let desde = hoy.mas_dias(-(periodo.dias() - 1));
        Ok(resumir(&movimientos, desde, hoy))
    }

    /// Exporta la caja completa como CSV para descargar.
    pub fn exportar_csv(&self) -> Result<String, AppError> {
        let movimientos = self.leer_todos()?;
        let mut salida = String::from("fecha,tipo,descripcion,monto,moneda\n");
        for mov in movimientos {
            salida.push_str(&format!(
                "{},{},\"{}\",{},{}\n",
                mov.fecha,
                mov.tipo.como_texto(),
                mov.descripcion.replace('"', "'"),
                mov.monto,
                mov.moneda
            ));
        }
        Ok(salida)
    }
}

/// El corazón del reporte, separado para poder probarlo sin disco:
/// suma Ventas, suma Gastos, balance = Ventas - Gastos, y cuenta las
/// filas dentro del rango [desde, hasta].
pub fn resumir(movimientos: &[Movimiento], desde: FechaCorta, hasta: FechaCorta) -> ReporteCaja {
    use crate::models::caja::TipoMovimiento;

    let mut ventas = Decimal::ZERO;
    let mut gastos = Decimal::ZERO;
    let mut cantidad = 0usize;

    for mov in movimientos {
        if mov.fecha < desde || mov.fecha > hasta {
            continue;
        }
        cantidad += 1;
        match mov.tipo {
            TipoMovimiento::Venta => ventas += mov.monto,
            TipoMovimiento::Gasto => gastos += mov.monto,
        }
    }

    ReporteCaja {
        ventas,
        gastos,
        balance: ventas - gastos,
        cantidad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caja::TipoMovimiento;

    fn mov(fecha: &str, tipo: TipoMovimiento, monto: &str) -> Movimiento {
        Movimiento {
            fecha: FechaCorta::parsear(fecha).unwrap(),
            tipo,
            descripcion: "x".to_string(),
            monto: monto.parse().unwrap(),
            moneda: "PEN".to_string(),
        }
    }

    #[test]
    fn el_balance_es_ventas_menos_gastos() {
        let movimientos = vec![
            mov("10/08/2025", TipoMovimiento::Venta, "450.00"),
            mov("11/08/2025", TipoMovimiento::Venta, "300.00"),
            mov("11/08/2025", TipoMovimiento::Gasto, "120.50"),
            // fuera de rango: no cuenta
            mov("01/07/2025", TipoMovimiento::Venta, "999.00"),
        ];
        let desde = FechaCorta::parsear("09/08/2025").unwrap();
        let hasta = FechaCorta::parsear("15/08/2025").unwrap();

        let reporte = resumir(&movimientos, desde, hasta);
        assert_eq!(reporte.ventas, "750.00".parse().unwrap());
        assert_eq!(reporte.gastos, "120.50".parse().unwrap());
        assert_eq!(reporte.balance, reporte.ventas - reporte.gastos);
        assert_eq!(reporte.cantidad, 3);
    }

    #[test]
    fn registrar_y_releer_por_archivo() {
        let dir = tempfile::tempdir().unwrap();
        let caja = CajaService::new(dir.path().join("caja.txt"));

        caja.registrar(&mov("10/08/2025", TipoMovimiento::Venta, "450.00"))
            .unwrap();
        caja.registrar(&mov("10/08/2025", TipoMovimiento::Gasto, "80.00"))
            .unwrap();

        let movimientos = caja.leer_todos().unwrap();
        assert_eq!(movimientos.len(), 2);
        assert_eq!(movimientos[0].tipo, TipoMovimiento::Venta);
        assert_eq!(movimientos[1].tipo, TipoMovimiento::Gasto);
    }

    #[test]
    fn caja_inexistente_es_caja_vacia() {
        let dir = tempfile::tempdir().unwrap();
        let caja = CajaService::new(dir.path().join("no-existe.txt"));
        assert!(caja.leer_todos().unwrap().is_empty());
    }

    #[test]
    fn las_filas_malformadas_no_tumban_la_lectura() {
        let dir = tempfile::tempdir().unwrap();
        let ruta = dir.path().join("caja.txt");
        std::fs::write(
            &ruta,
            "10/08/2025;Venta;radio;450.00;PEN\nbasura total\n11/08/2025;Gasto;cables;30;PEN\n",
        )
        .unwrap();

        let caja = CajaService::new(ruta);
        assert_eq!(caja.leer_todos().unwrap().len(), 2);
    }

    #[test]
    fn el_csv_lleva_encabezado_y_una_fila_por_movimiento() {
        let dir = tempfile::tempdir().unwrap();
        let caja = CajaService::new(dir.path().join("caja.txt"));
        caja.registrar(&mov("10/08/2025", TipoMovimiento::Venta, "450.00"))
            .unwrap();

        let csv = caja.exportar_csv().unwrap();
        let lineas: Vec<&str> = csv.lines().collect();
        assert_eq!(lineas.len(), 2);
        assert_eq!(lineas[0], "fecha,tipo,descripcion,monto,moneda");
        assert!(lineas[1].starts_with("10/08/2025,Venta,"));
    }
}
