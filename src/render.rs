// src/render.rs
//! Plain-text rendering of the dashboard for terminal output

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::dashboard::DashboardState;
use crate::filters::{available_levels, available_role_categories, FilterState};
use crate::table::{Column, SortDirection, TablePage, TableView, TableViewModel};

pub const TITLE: &str = "US Entry-Level & New-Grad Tech Roles";

const SKELETON_ROWS: usize = 5;

fn column_width(column: Column) -> usize {
    match column {
        Column::Company => 20,
        Column::Title => 34,
        Column::Role => 14,
        Column::Level => 12,
        Column::Location => 24,
        Column::Remote => 6,
        Column::Posted => 12,
        Column::Apply => 0,
    }
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    format!("{:<width$}", truncate(text, width), width = width)
}

pub fn render_header(state: &DashboardState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    if let Some(updated) = state.last_updated() {
        let _ = writeln!(out, "Last updated: {}", updated.format("%Y-%m-%d"));
    }
    let _ = writeln!(out, "{} total jobs", state.total_jobs());
    out
}

pub fn render_filter_panel(filters: &FilterState, state: &DashboardState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Filters{}", if filters.is_active() { " (active)" } else { "" });
    let _ = writeln!(
        out,
        "  Remote only:       {}",
        if filters.remote_only { "yes" } else { "no" }
    );
    let _ = writeln!(out, "  Location contains: {}", display_or_dash(&filters.location));
    let _ = writeln!(out, "  Posted within:     {}", filters.posted_within.label());
    let _ = writeln!(out, "  Search:            {}", display_or_dash(&filters.search));

    let roles = available_role_categories(state.jobs());
    if !roles.is_empty() {
        let _ = writeln!(out, "  Roles in feed:     {}", roles.join(", "));
    }
    let levels = available_levels(state.jobs());
    if !levels.is_empty() {
        let _ = writeln!(out, "  Levels in feed:    {}", levels.join(", "));
    }
    out
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

pub fn render_table(view: &TableView) -> String {
    match view {
        TableView::Loading => render_loading(),
        TableView::Empty => render_empty(),
        TableView::Page(page) => render_page(page),
    }
}

fn render_loading() -> String {
    let widths = [20, 30, 10, 10, 20];
    let mut out = String::new();
    for _ in 0..SKELETON_ROWS {
        let cells: Vec<String> = widths.iter().map(|w| "░".repeat(*w)).collect();
        let _ = writeln!(out, "{}", cells.join("  "));
    }
    out
}

fn render_empty() -> String {
    "No jobs found\nTry adjusting your filters to see more results.\n".to_string()
}

fn render_page(page: &TablePage) -> String {
    let mut out = String::new();

    let header: Vec<String> = Column::ALL
        .iter()
        .map(|column| {
            let marker = match column.sort_column() {
                Some(sort) if sort == page.sort.column => match page.sort.direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                },
                _ => "",
            };
            pad(&format!("{}{}", column.header(), marker), column_width(*column))
        })
        .collect();
    let header_line = header.join(" ");
    let _ = writeln!(out, "{}", header_line.trim_end());
    let _ = writeln!(out, "{}", "-".repeat(header_line.trim_end().chars().count()));

    for row in &page.rows {
        let cells: Vec<String> = Column::ALL
            .iter()
            .map(|column| pad(&row.cell(*column), column_width(*column)))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" ").trim_end());
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Show {} per page · Showing {} to {} of {} results · {} Page {} of {} {}",
        page.page_size,
        page.first_row,
        page.last_row,
        page.total_rows,
        if page.can_previous { "[prev]" } else { "[----]" },
        page.page_index + 1,
        page.page_count,
        if page.can_next { "[next]" } else { "[----]" },
    );
    out
}

/// Full screen: header, filter panel, counts and the table
pub fn render_dashboard(
    state: &DashboardState,
    table: &mut TableViewModel,
    now: DateTime<Utc>,
) -> String {
    let filtered = state.filtered_jobs_at(now);
    let view = table.view(&filtered, state.is_loading(), now);

    let mut out = String::new();
    out.push_str(&render_header(state));
    out.push('\n');
    out.push_str(&render_filter_panel(state.filters(), state));
    out.push('\n');
    let _ = writeln!(out, "Showing {} of {} jobs", filtered.len(), state.total_jobs());
    out.push('\n');
    out.push_str(&render_table(&view));
    out
}
