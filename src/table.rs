// src/table.rs
//! Table view-model: column definitions, single-column sorting and pagination
//! over an already-filtered job list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::filters::is_remote;
use crate::time_utils::{format_relative_at, parse_instant};
use crate::types::Job;

/// Every column the table shows, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Company,
    Title,
    Role,
    Level,
    Location,
    Remote,
    Posted,
    Apply,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Company,
        Column::Title,
        Column::Role,
        Column::Level,
        Column::Location,
        Column::Remote,
        Column::Posted,
        Column::Apply,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Company => "Company",
            Column::Title => "Title",
            Column::Role => "Role",
            Column::Level => "Level",
            Column::Location => "Location",
            Column::Remote => "Remote",
            Column::Posted => "Posted",
            Column::Apply => "Apply",
        }
    }

    /// Sort key for this column; `None` for display-only columns
    pub fn sort_column(self) -> Option<SortColumn> {
        match self {
            Column::Company => Some(SortColumn::Company),
            Column::Title => Some(SortColumn::Title),
            Column::Role => Some(SortColumn::Role),
            Column::Level => Some(SortColumn::Level),
            Column::Location => Some(SortColumn::Location),
            Column::Posted => Some(SortColumn::Posted),
            Column::Remote | Column::Apply => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Company,
    Title,
    Role,
    Level,
    Location,
    Posted,
}

impl SortColumn {
    /// Direction used when this column becomes the active sort
    pub fn initial_direction(self) -> SortDirection {
        match self {
            SortColumn::Posted => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    fn compare(self, a: &Job, b: &Job) -> Ordering {
        match self {
            SortColumn::Company => a.company.cmp(&b.company),
            SortColumn::Title => a.title.cmp(&b.title),
            SortColumn::Role => a.role_category_str().cmp(b.role_category_str()),
            SortColumn::Level => a.level_str().cmp(b.level_str()),
            SortColumn::Location => a.location.cmp(&b.location),
            SortColumn::Posted => parse_instant(&a.posted_date).cmp(&parse_instant(&b.posted_date)),
        }
    }
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company" => Ok(SortColumn::Company),
            "title" => Ok(SortColumn::Title),
            "role" | "role_category" => Ok(SortColumn::Role),
            "level" => Ok(SortColumn::Level),
            "location" => Ok(SortColumn::Location),
            "posted" | "posted_date" | "date" => Ok(SortColumn::Posted),
            other => anyhow::bail!(
                "Unknown sort column: {}. Use company, title, role, level, location or posted",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Posted,
            direction: SortDirection::Descending,
        }
    }
}

/// Selectable rows-per-page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PageSize {
    Ten,
    #[default]
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const OPTIONS: [PageSize; 3] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<usize> for PageSize {
    type Error = anyhow::Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::OPTIONS
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| anyhow::anyhow!("Unsupported page size: {}. Use 10, 25 or 50", value))
    }
}

impl FromStr for PageSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Page size must be a number, got: {}", s))?;
        Self::try_from(value)
    }
}

/// Render-ready projection of one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRow {
    pub company: String,
    pub title: String,
    pub role: String,
    pub level: String,
    pub location: String,
    pub remote: bool,
    pub posted: String,
    pub apply_url: String,
}

impl JobRow {
    pub fn from_job(job: &Job, now: DateTime<Utc>) -> Self {
        Self {
            company: job.company.clone(),
            title: job.title.clone(),
            role: job.role_category_str().to_string(),
            level: job.level_str().to_string(),
            location: job.location.clone(),
            remote: is_remote(&job.location),
            posted: format_relative_at(&job.posted_date, now),
            apply_url: job.url.clone(),
        }
    }

    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Company => self.company.clone(),
            Column::Title => self.title.clone(),
            Column::Role => self.role.clone(),
            Column::Level => self.level.clone(),
            Column::Location => self.location.clone(),
            Column::Remote => (if self.remote { "✓" } else { "—" }).to_string(),
            Column::Posted => self.posted.clone(),
            Column::Apply => self.apply_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePage {
    pub rows: Vec<JobRow>,
    pub sort: SortState,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    /// 1-based index of the first row on this page
    pub first_row: usize,
    /// 1-based index of the last row on this page
    pub last_row: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableView {
    Loading,
    Empty,
    Page(TablePage),
}

/// Sort and page state for the job table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableViewModel {
    sort: SortState,
    page_size: PageSize,
    page_index: usize,
}

pub fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

impl TableViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Same column flips direction; another column replaces the sort
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = if self.sort.column == column {
            SortState {
                column,
                direction: self.sort.direction.flipped(),
            }
        } else {
            SortState {
                column,
                direction: column.initial_direction(),
            }
        };
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Change rows per page, keeping the current first row in view
    pub fn set_page_size(&mut self, page_size: PageSize) {
        let first_row = self.page_index * self.page_size.get();
        self.page_size = page_size;
        self.page_index = first_row / page_size.get();
    }

    /// Jump to a page; out-of-range indexes are clamped on the next sync
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    pub fn page_count(&self, rows: usize) -> usize {
        page_count(rows, self.page_size.get())
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, rows: usize) -> bool {
        self.page_index + 1 < self.page_count(rows)
    }

    pub fn previous_page(&mut self) {
        if self.can_previous() {
            self.page_index -= 1;
        }
    }

    pub fn next_page(&mut self, rows: usize) {
        if self.can_next(rows) {
            self.page_index += 1;
        }
    }

    /// Reset to the first page when the row set no longer reaches the current one
    pub fn sync_rows(&mut self, rows: usize) {
        if self.page_index >= self.page_count(rows) {
            self.page_index = 0;
        }
    }

    /// Fresh sorted copy of `jobs`; ties keep their incoming order
    pub fn sorted_jobs(&self, jobs: &[Job]) -> Vec<Job> {
        let SortState { column, direction } = self.sort;
        let mut sorted = jobs.to_vec();
        sorted.sort_by(|a, b| match direction {
            SortDirection::Ascending => column.compare(a, b),
            SortDirection::Descending => column.compare(b, a),
        });
        sorted
    }

    /// Build the current view over the filtered jobs
    pub fn view(&mut self, jobs: &[Job], loading: bool, now: DateTime<Utc>) -> TableView {
        if loading {
            return TableView::Loading;
        }
        if jobs.is_empty() {
            self.sync_rows(0);
            return TableView::Empty;
        }

        self.sync_rows(jobs.len());
        TableView::Page(self.page(jobs, now))
    }

    fn page(&self, jobs: &[Job], now: DateTime<Utc>) -> TablePage {
        let total_rows = jobs.len();
        let page_size = self.page_size.get();
        let start = self.page_index * page_size;
        let end = (start + page_size).min(total_rows);

        let rows = self
            .sorted_jobs(jobs)
            .iter()
            .skip(start)
            .take(page_size)
            .map(|job| JobRow::from_job(job, now))
            .collect();

        TablePage {
            rows,
            sort: self.sort,
            page_index: self.page_index,
            page_count: self.page_count(total_rows),
            page_size,
            total_rows,
            first_row: start + 1,
            last_row: end,
            can_previous: self.can_previous(),
            can_next: self.can_next(total_rows),
        }
    }
}
