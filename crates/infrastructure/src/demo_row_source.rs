use async_trait::async_trait;
use auberge_application::RowSource;
use auberge_core::AppResult;
use serde_json::{Map, Value, json};
use tracing::info;

/// Deterministic demo row source for tabular surfaces.
///
/// Supplies fixture rows for the built-in `rooms`, `reservations`, and
/// `guests` data sources. The generator lives entirely outside the tabular
/// engine; the engine only ever sees the rows it is handed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoRowSource;

impl DemoRowSource {
    /// Creates the demo row source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RowSource for DemoRowSource {
    async fn fetch_rows(&self, data_source: &str) -> AppResult<Vec<Map<String, Value>>> {
        let rows = match data_source {
            "rooms" => rooms(),
            "reservations" => reservations(),
            "guests" => guests(),
            other => {
                info!(data_source = other, "unknown demo data source, serving no rows");
                Vec::new()
            }
        };

        info!(data_source, count = rows.len(), "served demo rows");
        Ok(rows)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        // The fixture literals below are all objects.
        _ => Map::new(),
    }
}

fn rooms() -> Vec<Map<String, Value>> {
    let categories = ["single", "double", "suite"];
    let statuses = ["available", "occupied", "maintenance"];

    (1..=12u64)
        .map(|index| {
            object(json!({
                "id": index,
                "number": format!("{:03}", 100 + index),
                "category": categories[(index as usize - 1) % categories.len()],
                "price_per_night": 80 + (index % 4) * 35,
                "status": statuses[(index as usize - 1) % statuses.len()],
                "updated_at": format!("2026-08-{:02}", 10 + index),
            }))
        })
        .collect()
}

fn reservations() -> Vec<Map<String, Value>> {
    let statuses = ["confirmed", "pending", "cancelled"];

    (1..=9u64)
        .map(|index| {
            object(json!({
                "id": index,
                "label": format!("Réservation #{index}"),
                "status": statuses[(index as usize - 1) % statuses.len()],
                "created_at": format!("2026-07-{:02}", 20 + index),
            }))
        })
        .collect()
}

fn guests() -> Vec<Map<String, Value>> {
    let names = ["Martin Leclerc", "Sofia Rossi", "Anna Schmidt", "Paul Morel"];

    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            object(json!({
                "id": index as u64 + 1,
                "full_name": name,
                "email": format!("guest{}@example.com", index + 1),
                "vip": index % 2 == 0,
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use auberge_application::RowSource;

    use super::DemoRowSource;

    #[tokio::test]
    async fn known_sources_serve_rows_with_row_identities() {
        let source = DemoRowSource::new();

        for name in ["rooms", "reservations", "guests"] {
            let rows = source.fetch_rows(name).await;
            let rows = match rows {
                Ok(rows) => rows,
                Err(error) => panic!("fetching '{name}' failed: {error}"),
            };
            assert!(!rows.is_empty());
            assert!(rows.iter().all(|row| row.contains_key("id")));
        }
    }

    #[tokio::test]
    async fn unknown_sources_serve_no_rows() {
        let source = DemoRowSource::new();
        let rows = source.fetch_rows("spa").await;
        assert_eq!(rows.ok().map(|rows| rows.len()), Some(0));
    }
}
