use std::cmp::Ordering;
use std::collections::BTreeSet;

use auberge_core::{AppError, AppResult};
use auberge_domain::{BadgeVariant, ColumnDescriptor, ColumnKind, ComponentConfig};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Sort direction for the single active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSort {
    key: String,
    direction: SortDirection,
}

impl TableSort {
    /// Returns the sorted column key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the sort direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// One derived page of filtered, sorted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    rows: Vec<Map<String, Value>>,
    page: usize,
    total_pages: usize,
    total_rows: usize,
}

impl TablePage {
    /// Returns the rows on this page, in display order.
    #[must_use]
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Returns the clamped one-based page number.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the total page count for the filtered row set.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns the filtered row count across all pages.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }
}

/// Rendered content for one table cell, keyed by column kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Plain text content.
    Text(String),
    /// Badge with a display label and visual variant.
    Badge {
        /// Literal cell value shown inside the badge.
        label: String,
        /// Resolved visual variant.
        variant: BadgeVariant,
    },
    /// Binary glyph for boolean cells.
    Glyph(bool),
    /// Suppressed cell handled by a dedicated actions renderer.
    Actions,
}

/// Search, sort, pagination, and selection state over arbitrary row shapes.
///
/// The state holds no rows: every derivation is a pure pass over the row
/// slice supplied by the caller, cheap enough to recompute on each input
/// change.
#[derive(Debug, Clone)]
pub struct TableState {
    columns: Vec<ColumnDescriptor>,
    page_size: usize,
    search: String,
    sort: Option<TableSort>,
    requested_page: usize,
    selected: BTreeSet<String>,
}

impl TableState {
    /// Creates tabular state over the given column descriptors.
    pub fn new(columns: Vec<ColumnDescriptor>, page_size: usize) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::Validation(
                "table page size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            columns,
            page_size,
            search: String::new(),
            sort: None,
            requested_page: 1,
            selected: BTreeSet::new(),
        })
    }

    /// Creates tabular state from a merged component configuration.
    pub fn from_config(config: &ComponentConfig) -> AppResult<Self> {
        Self::new(config.columns().to_vec(), config.page_size())
    }

    /// Returns the column descriptors driving this state.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the pagination window size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the current search query.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Sets the search query and resets pagination to the first page.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.requested_page = 1;
    }

    /// Returns the active sort, if any.
    #[must_use]
    pub fn sort(&self) -> Option<&TableSort> {
        self.sort.as_ref()
    }

    /// Toggles sorting on a column.
    ///
    /// Repeated toggles on the same column flip the direction; a different
    /// column starts ascending.
    pub fn toggle_sort(&mut self, key: impl Into<String>) {
        let key = key.into();
        let direction = match &self.sort {
            Some(sort) if sort.key == key && sort.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(TableSort { key, direction });
    }

    /// Requests a page; the value clamps into range at derivation time.
    pub fn set_page(&mut self, page: usize) {
        self.requested_page = page;
    }

    /// Derives the current page from the supplied rows.
    ///
    /// Applies search, then the active sort (stable, so equal values keep
    /// input order), then clamps the requested page into
    /// `[1, total_pages]` and windows the result.
    #[must_use]
    pub fn page(&self, rows: &[Map<String, Value>]) -> TablePage {
        let filtered = self.filtered_sorted(rows);
        let total_rows = filtered.len();
        let total_pages = total_rows.div_ceil(self.page_size).max(1);
        let page = self.requested_page.clamp(1, total_pages);

        let start = (page - 1) * self.page_size;
        let rows = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        TablePage {
            rows,
            page,
            total_pages,
            total_rows,
        }
    }

    /// Returns the identifiers of the currently selected rows.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Returns whether the row with this identifier is selected.
    #[must_use]
    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selected.contains(row_id)
    }

    /// Toggles one row's selection, independent of select-all state.
    pub fn toggle_row(&mut self, row_id: impl Into<String>) {
        let row_id = row_id.into();
        if !self.selected.remove(&row_id) {
            self.selected.insert(row_id);
        }
    }

    /// Returns whether every row on the current page is selected.
    ///
    /// This is the derived checked state of the page-level select-all
    /// affordance; an empty page is never fully selected.
    #[must_use]
    pub fn page_fully_selected(&self, rows: &[Map<String, Value>]) -> bool {
        let ids = self.current_page_ids(rows);
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// Toggles select-all for the current page only.
    ///
    /// Selections on other pages are left untouched.
    pub fn toggle_select_all(&mut self, rows: &[Map<String, Value>]) {
        let ids = self.current_page_ids(rows);
        if !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id)) {
            for id in ids {
                self.selected.remove(&id);
            }
        } else {
            self.selected.extend(ids);
        }
    }

    /// Renders one cell of a row according to the column kind.
    ///
    /// Unknown value shapes degrade to the generic text path rather than
    /// failing the surface.
    #[must_use]
    pub fn render_cell(&self, column: &ColumnDescriptor, row: &Map<String, Value>) -> CellContent {
        let value = row.get(column.key().as_str());
        match column.kind() {
            ColumnKind::Actions => CellContent::Actions,
            ColumnKind::Badge => {
                let label = value.map(stringify).unwrap_or_default();
                let variant = column
                    .badge_variants()
                    .get(&label)
                    .copied()
                    .unwrap_or_else(|| heuristic_variant(&label));
                CellContent::Badge { label, variant }
            }
            ColumnKind::Boolean => match value {
                Some(Value::Bool(flag)) => CellContent::Glyph(*flag),
                _ => CellContent::Text(value.map(stringify).unwrap_or_default()),
            },
            ColumnKind::Number => match value {
                Some(Value::Number(number)) => CellContent::Text(group_thousands(number)),
                _ => CellContent::Text(value.map(stringify).unwrap_or_default()),
            },
            ColumnKind::Date => {
                let raw = value.map(stringify).unwrap_or_default();
                CellContent::Text(format_date(&raw).unwrap_or(raw))
            }
            ColumnKind::Text => CellContent::Text(value.map(stringify).unwrap_or_default()),
        }
    }

    fn filtered_sorted(&self, rows: &[Map<String, Value>]) -> Vec<Map<String, Value>> {
        let needle = self.search.trim().to_lowercase();
        let mut filtered: Vec<Map<String, Value>> = rows
            .iter()
            .filter(|row| row_matches(row, &needle))
            .cloned()
            .collect();

        if let Some(sort) = &self.sort {
            filtered.sort_by(|left, right| {
                let ordering = compare_values(left.get(&sort.key), right.get(&sort.key));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        filtered
    }

    fn current_page_ids(&self, rows: &[Map<String, Value>]) -> Vec<String> {
        self.page(rows)
            .rows()
            .iter()
            .filter_map(row_identity)
            .collect()
    }
}

/// Returns the stable identity of a row, when it carries an `id` field.
#[must_use]
pub fn row_identity(row: &Map<String, Value>) -> Option<String> {
    row.get("id").map(stringify)
}

fn row_matches(row: &Map<String, Value>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    row.values()
        .any(|value| stringify(value).to_lowercase().contains(needle))
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&right.as_f64().unwrap_or(0.0)),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (Some(Value::Bool(left)), Some(Value::Bool(right))) => left.cmp(right),
        (Some(left), Some(right)) => stringify(left).cmp(&stringify(right)),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_date(raw: &str) -> Option<String> {
    let date = raw
        .parse::<NaiveDate>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))?;
    Some(date.format("%d/%m/%Y").to_string())
}

fn group_thousands(number: &serde_json::Number) -> String {
    let rendered = number.to_string();
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest.to_owned()),
        None => ("", rendered),
    };
    let (integral, fraction) = match unsigned.split_once('.') {
        Some((integral, fraction)) => (integral.to_owned(), Some(fraction.to_owned())),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    for (index, digit) in integral.chars().enumerate() {
        let remaining = integral.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

fn heuristic_variant(label: &str) -> BadgeVariant {
    match label.to_lowercase().as_str() {
        "active" | "available" | "confirmed" | "paid" | "libre" | "confirmée" => {
            BadgeVariant::Success
        }
        "pending" | "reserved" | "maintenance" | "en attente" => BadgeVariant::Warning,
        "cancelled" | "occupied" | "unpaid" | "overdue" | "annulée" | "occupée" => {
            BadgeVariant::Destructive
        }
        "draft" | "archived" => BadgeVariant::Outline,
        _ => BadgeVariant::Default,
    }
}
