use tracing::debug;

use crate::filters::{FilterOptions, FilterState};
use crate::models::{Lead, LeadsResponse};
use crate::sort::{collator, SortField, SortState};

// --- Row derivation ---

fn matches_query(lead: &Lead, folded_query: &str) -> bool {
    [
        &lead.full_name,
        &lead.title,
        &lead.company_name,
        &lead.company_industry,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(folded_query))
}

/// Positions into `leads` of the rows that survive search and filters, in display order.
pub fn derive_indices(
    leads: &[Lead],
    query: &str,
    filters: &FilterState,
    sort: &SortState,
) -> Vec<usize> {
    let folded_query = query.to_lowercase();

    let mut indices: Vec<usize> = leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| folded_query.is_empty() || matches_query(lead, &folded_query))
        .filter(|(_, lead)| filters.matches(lead))
        .map(|(i, _)| i)
        .collect();

    // sort_by is stable, so an unset sort keeps dataset order
    if !sort.is_unset() {
        let mut collator = collator();
        indices.sort_by(|&a, &b| sort.compare(&mut collator, &leads[a], &leads[b]));
    }
    indices
}

// --- Table view controller ---

/// Why the table currently has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The dataset itself is empty.
    NoLeads,
    /// Active filters hide every row; clearing them is the way out.
    Filtered,
    /// No filter is active, only the search query hides every row.
    Searched,
}

#[derive(Debug, Clone, Default)]
struct SearchBar {
    visible: bool,
    focused: bool,
    query: String,
}

/// Owns the interactive state of one dashboard and the rows it currently shows.
#[derive(Debug, Clone)]
pub struct LeadsDashboard {
    data: LeadsResponse,
    company_name: String,
    options: FilterOptions,
    search: SearchBar,
    filters: FilterState,
    sort: SortState,
    visible: Vec<usize>,
}

impl LeadsDashboard {
    pub fn new(data: LeadsResponse, company_name: impl Into<String>) -> Self {
        let options = FilterOptions::from_leads(&data.leads);
        let visible = (0..data.leads.len()).collect();
        Self {
            data,
            company_name: company_name.into(),
            options,
            search: SearchBar::default(),
            filters: FilterState::default(),
            sort: SortState::default(),
            visible,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn total_leads(&self) -> u64 {
        self.data.total_leads
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn visible_rows(&self) -> Vec<&Lead> {
        self.visible.iter().map(|&i| &self.data.leads[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn lead_count_label(&self) -> String {
        let n = self.visible.len();
        format!("{} lead{}", n, if n == 1 { "" } else { "s" })
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    // --- Search ---

    pub fn search_query(&self) -> &str {
        &self.search.query
    }

    pub fn is_search_visible(&self) -> bool {
        self.search.visible
    }

    pub fn is_search_focused(&self) -> bool {
        self.search.visible && self.search.focused
    }

    /// Header toggle. Opening focuses the query field; closing keeps the query.
    pub fn toggle_search(&mut self) {
        let opening = !self.search.visible;
        self.search.visible = opening;
        self.search.focused = opening;
        debug!(visible = opening, "search toggled");
    }

    pub fn blur_search(&mut self) {
        self.search.focused = false;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search.query = query.into();
        self.recompute();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.query.push(c);
        self.recompute();
    }

    pub fn pop_search_char(&mut self) {
        if self.search.query.pop().is_some() {
            self.recompute();
        }
    }

    /// Explicit clear control: empties the query, leaves the bar open.
    pub fn clear_search_query(&mut self) {
        if !self.search.query.is_empty() {
            self.search.query.clear();
            self.recompute();
        }
    }

    /// Cancel key while focused: clears the query and closes the bar together.
    pub fn cancel_search(&mut self) {
        self.search = SearchBar::default();
        self.recompute();
    }

    // --- Filters ---

    pub fn toggle_industry(&mut self, industry: &str) {
        self.filters.toggle_industry(industry);
        self.recompute();
    }

    pub fn toggle_size(&mut self, size: &str) {
        self.filters.toggle_size(size);
        self.recompute();
    }

    pub fn toggle_worked_at_customer(&mut self) {
        self.filters.toggle_worked_at_customer();
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    /// Replace the whole filter selection in one update.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if !self.visible.is_empty() {
            None
        } else if self.data.leads.is_empty() {
            Some(EmptyReason::NoLeads)
        } else if self.filters.active_count() > 0 {
            Some(EmptyReason::Filtered)
        } else {
            Some(EmptyReason::Searched)
        }
    }

    // --- Sort ---

    pub fn activate_sort(&mut self, field: SortField) {
        self.sort.activate(field);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = derive_indices(&self.data.leads, &self.search.query, &self.filters, &self.sort);
        debug!(
            visible = self.visible.len(),
            filters = self.filters.active_count(),
            sort = ?self.sort.field(),
            direction = ?self.sort.direction(),
            "rows recomputed"
        );
    }
}
