//! Sample data
//!
//! The reference data set loaded into a fresh store when
//! `seed_sample_data` is enabled.

use super::models::{Client, ClientStatus, Document, DocumentStatus, Task};
use chrono::{DateTime, Utc};

fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn client(
    id: u64,
    name: &str,
    contact: &str,
    email: &str,
    phone: &str,
    location: &str,
    status: ClientStatus,
    projects: u32,
) -> Client {
    Client {
        id,
        name: name.to_string(),
        contact: contact.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        location: location.to_string(),
        status,
        projects,
    }
}

/// The eight sample clients
#[rustfmt::skip]
pub fn sample_clients() -> Vec<Client> {
    use ClientStatus::*;

    vec![
        client(1, "Construcciones Modernas S.L.", "Carlos Martínez", "carlos@construccionesmodernas.es", "+34 612 345 678", "Barcelona", Active, 5),
        client(2, "Reformas Integrales Martínez", "Ana Martínez", "ana@reformasmartinez.com", "+34 623 456 789", "Madrid", Active, 3),
        client(3, "Grupo Constructor Ibérico", "Javier Santos", "jsantos@grupoiberico.es", "+34 634 567 890", "Valencia", Active, 2),
        client(4, "InnovaHogar Barcelona", "Marta Puig", "mpuig@innovahogar.cat", "+34 645 678 901", "Barcelona", Pending, 1),
        client(5, "Constructora López y Asociados", "Roberto López", "rlopez@clopez.es", "+34 656 789 012", "Sevilla", Completed, 4),
        client(6, "Edificaciones Modernas S.A.", "Elena Gomez", "egomez@edificacionesmodernas.com", "+34 667 890 123", "Málaga", Active, 2),
        client(7, "Construcciones Durán", "Miguel Durán", "mduran@construccionesduran.es", "+34 678 901 234", "Bilbao", Pending, 1),
        client(8, "Architech Solutions", "Paula Vega", "pvega@architech.com", "+34 689 012 345", "Madrid", Active, 3),
    ]
}

#[allow(clippy::too_many_arguments)]
fn document(
    id: u64,
    title: &str,
    description: &str,
    category: &str,
    client: &str,
    status: DocumentStatus,
    created_at: &str,
    updated_at: &str,
    file_size: &str,
    file_type: &str,
) -> Document {
    Document {
        id,
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        client: client.to_string(),
        status,
        created_at: timestamp(created_at),
        updated_at: timestamp(updated_at),
        file_size: file_size.to_string(),
        file_type: file_type.to_string(),
        file_name: None,
        file: None,
    }
}

/// The five sample documents
#[rustfmt::skip]
pub fn sample_documents() -> Vec<Document> {
    use DocumentStatus::*;

    vec![
        document(1, "Building Permit Application", "Official building permit application for the Valencia project", "Permits", "Costa del Sol Development", Approved, "2023-07-10T08:30:00Z", "2023-07-15T14:45:00Z", "1.2 MB", "pdf"),
        document(2, "Technical Audit Report", "Energy efficiency audit for Barcelona renovation", "Audits", "Barcelona Properties Ltd", InReview, "2023-08-05T10:15:00Z", "2023-08-05T10:15:00Z", "3.5 MB", "pdf"),
        document(3, "Service Contract", "Legal service contract for Madrid office construction", "Contracts", "Madrid Business Center", Draft, "2023-08-20T09:00:00Z", "2023-08-22T16:30:00Z", "850 KB", "docx"),
        document(4, "Project Quote", "Detailed quote for residential complex renovation", "Quotes", "Alicante Residentials", Pending, "2023-09-01T11:45:00Z", "2023-09-01T11:45:00Z", "1.8 MB", "xlsx"),
        document(5, "Architectural Plans", "Complete architectural plans for the Seville project", "Plans", "Andalucia Construction Group", Approved, "2023-09-15T13:20:00Z", "2023-09-20T09:10:00Z", "5.2 MB", "dwg"),
    ]
}

fn task(
    id: u64,
    name: &str,
    category: &str,
    description: &str,
    cost: f64,
    labor: f64,
    has_subsidy: bool,
) -> Task {
    Task {
        id,
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        cost,
        labor,
        has_subsidy,
    }
}

/// The renovation task catalogue
#[rustfmt::skip]
pub fn renovation_tasks() -> Vec<Task> {
    vec![
        task(1, "Thermal Insulation - Exterior Walls", "Insulation", "Installation of SATE thermal insulation system for exterior facades", 75.50, 3.5, true),
        task(2, "Double Glazed Windows", "Carpentry", "Replacement of single glazed windows with double glazed, low-emission", 320.00, 2.0, true),
        task(3, "Aerothermal Heat Pump", "Heating", "Installation of high-efficiency aerothermal heat pump system", 6500.00, 16.0, true),
        task(4, "Solar Photovoltaic Panels", "Renewable Energy", "Installation of photovoltaic solar panels for electricity generation", 8200.00, 24.0, true),
        task(5, "LED Lighting Replacement", "Electrical", "Complete replacement of lighting fixtures with LED technology", 18.50, 0.5, false),
        task(6, "Smart Home System Installation", "Automation", "Installation of smart thermostats, lighting and energy monitoring", 1200.00, 8.0, false),
        task(7, "Underfloor Heating", "Heating", "Installation of water-based underfloor heating system", 85.00, 4.5, false),
        task(8, "Roof Insulation", "Insulation", "Thermal insulation for pitched or flat roofs", 45.00, 2.5, true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ids_are_unique_and_ordered() {
        let ids: Vec<u64> = sample_clients().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        let ids: Vec<u64> = sample_documents().iter().map(|d| d.id).collect();
        assert_eq!(ids, (1..=5).collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_document_timestamps_are_ordered() {
        for doc in sample_documents() {
            assert!(doc.updated_at >= doc.created_at, "document {}", doc.id);
        }
        assert_eq!(
            sample_documents()[0].created_at.to_rfc3339(),
            "2023-07-10T08:30:00+00:00"
        );
    }
}
