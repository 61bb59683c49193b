// src/services/documentos.rs

use genpdf::{Element, Margins, elements, style};

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    models::{financiamientos::Financiamiento, garantias::Garantia},
};

/// Genera los PDFs de contrato y de garantía en memoria. Sin lógica
/// condicional más allá de "¿hay placa?": párrafos fijos intercalados con
/// los datos del registro. Mismo registro, mismo contenido.
#[derive(Clone)]
pub struct DocumentosService {
    ruta_fuentes: String,
}

impl DocumentosService {
    pub fn new(ruta_fuentes: String) -> Self {
        Self { ruta_fuentes }
    }

    fn documento_base(&self, titulo: &str) -> Result<genpdf::Document, AppError> {
        // Carga la fuente de la carpeta 'fonts/'
        let familia = genpdf::fonts::from_files(&self.ruta_fuentes, "Roboto", None)
            .map_err(|_| {
                AppError::FuenteNoEncontrada(format!(
                    "no se encontró la fuente Roboto en {}",
                    self.ruta_fuentes
                ))
            })?;

        let mut doc = genpdf::Document::new(familia);
        doc.set_title(titulo);
        let mut decorador = genpdf::SimplePageDecorator::new();
        decorador.set_margins(Margins::trbl(10, 10, 10, 10));
        doc.set_page_decorator(decorador);
        Ok(doc)
    }

    fn renderizar(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::Pdf(e.to_string()))?;
        Ok(buffer)
    }

    pub fn contrato_pdf(&self, plan: &Financiamiento) -> Result<Vec<u8>, AppError> {
        let mut doc = self.documento_base("Contrato de financiamiento")?;

        doc.push(
            elements::Paragraph::new("AUTORADIO - CONTRATO DE FINANCIAMIENTO")
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(format!("Cliente: {}", plan.nombre)));
        doc.push(elements::Paragraph::new(format!("Documento: {}", plan.documento)));
        doc.push(elements::Paragraph::new(format!("Teléfono: {}", plan.telefono)));

        // Si no hay placa, la línea simplemente no va.
        if let Some(placa) = &plan.placa {
            doc.push(elements::Paragraph::new(format!("Placa: {}", placa)));
        }

        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(format!(
            "Monto total: {} | Inicial: {}",
            plan.total, plan.inicial
        )));
        doc.push(elements::Paragraph::new(format!(
            "Inicio: {} | Fin: {}",
            FechaCorta(plan.fecha_inicio),
            FechaCorta(plan.fecha_fin)
        )));
        doc.push(elements::Break::new(1.5));

        // --- TABLA DE CUOTAS ---
        let mut tabla = elements::TableLayout::new(vec![1, 2, 2, 2]);
        tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let negrita = style::Style::new().bold();
        tabla
            .row()
            .element(elements::Paragraph::new("N°").styled(negrita))
            .element(elements::Paragraph::new("Vence").styled(negrita))
            .element(elements::Paragraph::new("Monto").styled(negrita))
            .element(elements::Paragraph::new("Estado").styled(negrita))
            .push()
            .expect("fila de encabezado");

        for cuota in &plan.cuotas {
            let estado = if cuota.pagada { "Pagada" } else { "Pendiente" };
            tabla
                .row()
                .element(elements::Paragraph::new(format!("{}", cuota.numero)))
                .element(elements::Paragraph::new(cuota.vence.to_string()))
                .element(elements::Paragraph::new(format!("{:.2}", cuota.monto)))
                .element(elements::Paragraph::new(estado))
                .push()
                .expect("fila de cuota");
        }

        doc.push(tabla);
        doc.push(elements::Break::new(2));

        doc.push(elements::Paragraph::new(
            "El cliente se compromete a pagar cada cuota en la fecha indicada. \
             El atraso en el pago habilita a la empresa a retirar el equipo instalado.",
        ));
        doc.push(elements::Break::new(1));
        doc.push(
            elements::Paragraph::new("Firma del cliente: ______________________")
                .styled(style::Style::new().with_font_size(10)),
        );

        Self::renderizar(doc)
    }

    pub fn garantia_pdf(&self, garantia: &Garantia) -> Result<Vec<u8>, AppError> {
        let mut doc = self.documento_base("Certificado de garantía")?;

        doc.push(
            elements::Paragraph::new("AUTORADIO - CERTIFICADO DE GARANTÍA")
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(format!(
            "Producto instalado: {}",
            garantia.producto
        )));
        doc.push(elements::Paragraph::new(format!(
            "Teléfono del cliente: {}",
            garantia.telefono
        )));

        if let Some(placa) = &garantia.placa {
            doc.push(elements::Paragraph::new(format!("Placa del vehículo: {}", placa)));
        }

        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(format!(
            "Fecha de instalación: {}",
            FechaCorta(garantia.fecha_instalacion)
        )));
        doc.push(elements::Paragraph::new(format!(
            "Válida hasta: {}",
            FechaCorta(garantia.fecha_vencimiento)
        )));
        doc.push(elements::Break::new(2));

        doc.push(elements::Paragraph::new(
            "La garantía cubre defectos de fábrica y de instalación. No cubre \
             daños por manipulación de terceros, humedad ni cortes en el sistema \
             eléctrico del vehículo.",
        ));

        Self::renderizar(doc)
    }
}
