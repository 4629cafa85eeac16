use std::collections::BTreeSet;

use crate::models::Lead;

/// How many industry chips the filter panel previews.
pub const INDUSTRY_PREVIEW: usize = 8;

/// Worked-at-customer signal. There is no "require false" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalFilter {
    #[default]
    Unconstrained,
    RequireTrue,
}

impl SignalFilter {
    pub fn toggled(self) -> Self {
        match self {
            SignalFilter::Unconstrained => SignalFilter::RequireTrue,
            SignalFilter::RequireTrue => SignalFilter::Unconstrained,
        }
    }

    pub fn is_engaged(self) -> bool {
        self == SignalFilter::RequireTrue
    }

    pub fn matches(self, lead: &Lead) -> bool {
        match self {
            SignalFilter::Unconstrained => true,
            SignalFilter::RequireTrue => lead.is_worked_at_customer,
        }
    }
}

/// Active filter selection. An empty set means "no constraint" for its category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub industries: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub worked_at_customer: SignalFilter,
}

impl FilterState {
    pub fn toggle_industry(&mut self, industry: &str) {
        toggle(&mut self.industries, industry);
    }

    pub fn toggle_size(&mut self, size: &str) {
        toggle(&mut self.sizes, size);
    }

    pub fn toggle_worked_at_customer(&mut self) {
        self.worked_at_customer = self.worked_at_customer.toggled();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn active_count(&self) -> usize {
        self.industries.len() + self.sizes.len() + usize::from(self.worked_at_customer.is_engaged())
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        (self.industries.is_empty() || self.industries.contains(&lead.company_industry))
            && (self.sizes.is_empty() || self.sizes.contains(&lead.company_size))
            && self.worked_at_customer.matches(lead)
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Chip values for the filter panel, taken from the full dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub industries: Vec<String>,
    pub sizes: Vec<String>,
}

impl FilterOptions {
    pub fn from_leads(leads: &[Lead]) -> Self {
        Self {
            industries: unique_non_empty(leads.iter().map(|l| l.company_industry.as_str())),
            sizes: unique_non_empty(leads.iter().map(|l| l.company_size.as_str())),
        }
    }

    pub fn industry_preview(&self) -> &[String] {
        &self.industries[..self.industries.len().min(INDUSTRY_PREVIEW)]
    }
}

fn unique_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(industry: &str, size: &str, worked: bool) -> Lead {
        Lead {
            company_industry: industry.to_string(),
            company_size: size.to_string(),
            is_worked_at_customer: worked,
            ..Default::default()
        }
    }

    #[test]
    fn test_options_sorted_unique_non_empty() {
        let leads = vec![
            lead("SaaS", "11-50", false),
            lead("Fintech", "1-10", false),
            lead("", "", false),
            lead("SaaS", "201-500", false),
            lead("saas", "1-10", false),
        ];
        let options = FilterOptions::from_leads(&leads);
        assert_eq!(options.industries, vec!["Fintech", "SaaS", "saas"]);
        assert_eq!(options.sizes, vec!["1-10", "11-50", "201-500"]);
    }

    #[test]
    fn test_options_keep_whitespace_variants() {
        let leads = vec![lead("SaaS", "", false), lead(" SaaS", "", false)];
        let options = FilterOptions::from_leads(&leads);
        assert_eq!(options.industries, vec![" SaaS", "SaaS"]);
    }

    #[test]
    fn test_options_empty_dataset() {
        let options = FilterOptions::from_leads(&[]);
        assert!(options.industries.is_empty());
        assert!(options.sizes.is_empty());
        assert!(options.industry_preview().is_empty());
    }

    #[test]
    fn test_industry_preview_is_capped() {
        let leads: Vec<Lead> = (0..12).map(|i| lead(&format!("Industry {:02}", i), "", false)).collect();
        let options = FilterOptions::from_leads(&leads);
        assert_eq!(options.industries.len(), 12);
        assert_eq!(options.industry_preview().len(), INDUSTRY_PREVIEW);
        assert_eq!(options.industry_preview()[0], "Industry 00");
    }

    #[test]
    fn test_toggle_inserts_then_removes() {
        let mut filters = FilterState::default();
        filters.toggle_industry("SaaS");
        filters.toggle_industry("Fintech");
        assert_eq!(filters.active_count(), 2);
        filters.toggle_industry("SaaS");
        assert_eq!(filters.industries.iter().collect::<Vec<_>>(), vec!["Fintech"]);
    }

    #[test]
    fn test_signal_is_tri_state_toggle() {
        let mut filters = FilterState::default();
        assert_eq!(filters.worked_at_customer, SignalFilter::Unconstrained);
        filters.toggle_worked_at_customer();
        assert_eq!(filters.worked_at_customer, SignalFilter::RequireTrue);
        assert_eq!(filters.active_count(), 1);
        filters.toggle_worked_at_customer();
        assert_eq!(filters.worked_at_customer, SignalFilter::Unconstrained);
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn test_empty_selection_matches_everything() {
        let filters = FilterState::default();
        assert!(filters.matches(&lead("SaaS", "1-10", false)));
        assert!(filters.matches(&lead("", "", true)));
    }

    #[test]
    fn test_categories_and_together() {
        let mut filters = FilterState::default();
        filters.toggle_industry("SaaS");
        filters.toggle_size("1-10");
        filters.toggle_worked_at_customer();

        assert!(filters.matches(&lead("SaaS", "1-10", true)));
        assert!(!filters.matches(&lead("SaaS", "1-10", false)));
        assert!(!filters.matches(&lead("SaaS", "11-50", true)));
        assert!(!filters.matches(&lead("Fintech", "1-10", true)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut filters = FilterState::default();
        filters.toggle_industry("SaaS");
        filters.toggle_size("1-10");
        filters.toggle_worked_at_customer();
        filters.clear();
        assert_eq!(filters.active_count(), 0);
        assert_eq!(filters, FilterState::default());
    }
}
