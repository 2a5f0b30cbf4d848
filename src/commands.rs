// src/commands.rs
//! Interactive session commands, one per stdin line

use anyhow::Result;

use crate::filters::{FilterState, PostedWithin};
use crate::table::{PageSize, SortColumn, TableViewModel};

pub const HELP: &str = "\
Commands:
  n, next                  next page
  p, prev                  previous page
  sort <column>            sort by company|title|role|level|location|posted (repeat to flip)
  size <10|25|50>          rows per page
  remote                   toggle remote-only
  location [text]          location contains (empty clears)
  within <all|7|14|30|60>  posted within N days
  search [text]            company or title contains (empty clears)
  clear                    clear all filters
  help                     show this help
  q, quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextPage,
    PreviousPage,
    Sort(SortColumn),
    PageSize(PageSize),
    ToggleRemote,
    Location(String),
    PostedWithin(PostedWithin),
    Search(String),
    ClearFilters,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "n" | "next" => Command::NextPage,
            "p" | "prev" | "previous" => Command::PreviousPage,
            "sort" => Command::Sort(rest.parse()?),
            "size" => Command::PageSize(rest.parse()?),
            "remote" => Command::ToggleRemote,
            "location" | "loc" => Command::Location(rest.to_string()),
            "within" => Command::PostedWithin(rest.parse()?),
            "search" | "/" => Command::Search(rest.to_string()),
            "clear" => Command::ClearFilters,
            "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            "" => anyhow::bail!("Empty command. Type 'help' for the list of commands"),
            other => anyhow::bail!("Unknown command: {}. Type 'help' for the list of commands", other),
        };
        Ok(command)
    }

    /// Apply to the session. Filters come back as a new value; sort and page
    /// state live in the table view-model. `rows` is the current filtered count.
    pub fn apply(&self, filters: &FilterState, table: &mut TableViewModel, rows: usize) -> FilterState {
        match self {
            Command::NextPage => table.next_page(rows),
            Command::PreviousPage => table.previous_page(),
            Command::Sort(column) => table.toggle_sort(*column),
            Command::PageSize(size) => table.set_page_size(*size),
            Command::ToggleRemote => return filters.with_remote_only(!filters.remote_only),
            Command::Location(location) => return filters.with_location(location.clone()),
            Command::PostedWithin(window) => return filters.with_posted_within(*window),
            Command::Search(search) => return filters.with_search(search.clone()),
            Command::ClearFilters => return filters.cleared(),
            Command::Help | Command::Quit => {}
        }
        filters.clone()
    }
}
