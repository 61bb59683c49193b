// src/models/caja.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::fechas::FechaCorta;

// La caja es un archivo plano de solo-agregar. Cada fila:
//   fecha;tipo;descripcion;monto;moneda
// Se relee completo para armar los reportes (el volumen es chico).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoMovimiento {
    Venta,
    Gasto,
}

impl TipoMovimiento {
    pub fn como_texto(&self) -> &'static str {
        match self {
            TipoMovimiento::Venta => "Venta",
            TipoMovimiento::Gasto => "Gasto",
        }
    }

    pub fn parsear(texto: &str) -> Option<Self> {
        match texto.trim() {
            "Venta" => Some(TipoMovimiento::Venta),
            "Gasto" => Some(TipoMovimiento::Gasto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movimiento {
    pub fecha: FechaCorta,
    pub tipo: TipoMovimiento,
    pub descripcion: String,
    pub monto: Decimal,
    pub moneda: String,
}

impl Movimiento {
    /// Una fila del archivo. El separador es ';', así que lo limpiamos
    /// de la descripción antes de escribir.
    pub fn a_linea(&self) -> String {
        format!(
            "{};{};{};{};{}",
            self.fecha,
            self.tipo.como_texto(),
            self.descripcion.replace(';', ","),
            self.monto,
            self.moneda
        )
    }

    /// Filas malformadas devuelven None y el que llama decide ignorarlas.
    pub fn de_linea(linea: &str) -> Option<Movimiento> {
        let mut partes = linea.trim().splitn(5, ';');
        let fecha = FechaCorta::parsear(partes.next()?).ok()?;
        let tipo = TipoMovimiento::parsear(partes.next()?)?;
        let descripcion = partes.next()?.to_string();
        let monto: Decimal = partes.next()?.trim().parse().ok()?;
        let moneda = partes.next()?.trim().to_string();
        Some(Movimiento {
            fecha,
            tipo,
            descripcion,
            monto,
            moneda,
        })
    }
}

// Los tres cortes del reporte, relativos al día de hoy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodo {
    Dia,
    Semana,
    Mes,
}

impl Periodo {
    pub fn parsear(texto: &str) -> Option<Self> {
        match texto.trim().to_lowercase().as_str() {
            "dia" | "día" => Some(Periodo::Dia),
            "semana" => Some(Periodo::Semana),
            "mes" => Some(Periodo::Mes),
            _ => None,
        }
    }

    /// Cuántos días hacia atrás abarca el corte (incluyendo hoy).
    pub fn dias(&self) -> i64 {
        match self {
            Periodo::Dia => 1,
            Periodo::Semana => 7,
            Periodo::Mes => 30,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporteCaja {
    pub ventas: Decimal,
    pub gastos: Decimal,
    pub balance: Decimal,
    pub cantidad: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linea_ida_y_vuelta() {
        let mov = Movimiento {
            fecha: FechaCorta::parsear("15/08/2025").unwrap(),
            tipo: TipoMovimiento::Venta,
            descripcion: "Radio Pioneer + instalación".to_string(),
            monto: "450.00".parse().unwrap(),
            moneda: "PEN".to_string(),
        };
        let linea = mov.a_linea();
        assert_eq!(linea, "15/08/2025;Venta;Radio Pioneer + instalación;450.00;PEN");
        assert_eq!(Movimiento::de_linea(&linea).unwrap(), mov);
    }

    #[test]
    fn descripcion_con_separador_no_rompe_la_fila() {
        let mov = Movimiento {
            fecha: FechaCorta::parsear("01/02/2025").unwrap(),
            tipo: TipoMovimiento::Gasto,
            descripcion: "Cables; conectores".to_string(),
            monto: "80".parse().unwrap(),
            moneda: "PEN".to_string(),
        };
        let recuperado = Movimiento::de_linea(&mov.a_linea()).unwrap();
        assert_eq!(recuperado.descripcion, "Cables, conectores");
        assert_eq!(recuperado.monto, mov.monto);
    }

    #[test]
    fn linea_malformada_devuelve_none() {
        assert!(Movimiento::de_linea("").is_none());
        assert!(Movimiento::de_linea("no es una fila").is_none());
        assert!(Movimiento::de_linea("15/08/2025;Prestamo;x;10;PEN").is_none());
        assert!(Movimiento::de_linea("15/08/2025;Venta;x;diez;PEN").is_none());
    }

    #[test]
    fn periodo_parsea_los_tres_cortes() {
        assert_eq!(Periodo::parsear("dia"), Some(Periodo::Dia));
        assert_eq!(Periodo::parsear("Semana"), Some(Periodo::Semana));
        assert_eq!(Periodo::parsear("MES"), Some(Periodo::Mes));
        assert_eq!(Periodo::parsear("trimestre"), None);
    }
}
