use std::fmt;

use crate::models::SearchResultDto;

pub const SEARCH_FAILED: &str = "Failed to search. Please try again.";

// Display shape on the client side, mapped back from the wire names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
}

impl From<SearchResultDto> for SearchResult {
    fn from(dto: SearchResultDto) -> Self {
        Self {
            id: dto.id,
            title: dto.name,
            description: dto.desc,
            category: dto.kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub debounced_query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_count: u64,
    pub diagnostic: Option<f64>, // filled in after the first render only
}

/// What the screen should show for a given state.
#[derive(Debug, PartialEq)]
pub struct View<'a> {
    pub spinner: bool,
    pub error: Option<&'a str>,
    pub body: ViewBody<'a>,
    pub search_count: u64,
    pub diagnostic: Option<f64>,
}

#[derive(Debug, PartialEq)]
pub enum ViewBody<'a> {
    Prompt,
    NoResults(&'a str),
    Results(&'a [SearchResult]),
    // loading with nothing to show yet
    Blank,
}

impl SearchState {
    pub fn view(&self) -> View<'_> {
        let body = if self.debounced_query.trim().is_empty() {
            ViewBody::Prompt
        } else if !self.results.is_empty() {
            ViewBody::Results(&self.results)
        } else if !self.loading {
            ViewBody::NoResults(&self.debounced_query)
        } else {
            ViewBody::Blank
        };

        View {
            spinner: self.loading,
            error: self.error.as_deref(),
            body,
            search_count: self.search_count,
            diagnostic: self.diagnostic,
        }
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostic {
            Some(calc) => writeln!(f, "Searches: {} | Calc: {:.2}", self.search_count, calc)?,
            None => writeln!(f, "Searches: {} | Calc: --", self.search_count)?,
        }
        if self.spinner {
            writeln!(f, "[searching...]")?;
        }
        if let Some(error) = self.error {
            writeln!(f, "! {error}")?;
        }

        match &self.body {
            ViewBody::Prompt => writeln!(f, "Start typing to search for courses..."),
            ViewBody::NoResults(query) => writeln!(f, "No results found for \"{query}\""),
            ViewBody::Results(results) => {
                for result in results.iter() {
                    writeln!(f, "- {} [{}]", result.title, result.category)?;
                    writeln!(f, "    {}", result.description)?;
                }
                Ok(())
            }
            ViewBody::Blank => Ok(()),
        }
    }
}
