use std::cmp::Ordering;

use clap::ValueEnum;
use feruca::{Collator, Locale, Tailoring};

use crate::models::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SortField {
    #[value(name = "full_name", alias = "name")]
    FullName,
    #[value(name = "title")]
    Title,
    #[value(name = "company_name", alias = "company")]
    CompanyName,
    #[value(name = "company_industry", alias = "industry")]
    CompanyIndustry,
    #[value(name = "company_size", alias = "size")]
    CompanySize,
}

impl SortField {
    /// Sortable columns in the order the table shows them.
    pub const COLUMNS: [SortField; 5] = [
        SortField::FullName,
        SortField::CompanyName,
        SortField::Title,
        SortField::CompanyIndustry,
        SortField::CompanySize,
    ];

    pub fn value<'a>(&self, lead: &'a Lead) -> &'a str {
        match self {
            SortField::FullName => &lead.full_name,
            SortField::Title => &lead.title,
            SortField::CompanyName => &lead.company_name,
            SortField::CompanyIndustry => &lead.company_industry,
            SortField::CompanySize => &lead.company_size,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::FullName => "Name",
            SortField::Title => "Title",
            SortField::CompanyName => "Company",
            SortField::CompanyIndustry => "Industry",
            SortField::CompanySize => "Size",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active sort column, or none. Cycles unset -> asc -> desc -> unset per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<(SortField, SortDirection)>,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { active: Some((field, direction)) }
    }

    pub fn field(&self) -> Option<SortField> {
        self.active.map(|(field, _)| field)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, direction)| direction)
    }

    pub fn is_unset(&self) -> bool {
        self.active.is_none()
    }

    /// Direction shown on `field`'s header, `None` when another column (or none) is sorted.
    pub fn direction_for(&self, field: SortField) -> Option<SortDirection> {
        match self.active {
            Some((active, direction)) if active == field => Some(direction),
            _ => None,
        }
    }

    /// Advance the cycle for `field`. A different column always starts at ascending.
    pub fn activate(&mut self, field: SortField) {
        self.active = match self.active {
            Some((active, SortDirection::Asc)) if active == field => {
                Some((field, SortDirection::Desc))
            }
            Some((active, SortDirection::Desc)) if active == field => None,
            _ => Some((field, SortDirection::Asc)),
        };
    }

    pub fn compare(&self, collator: &mut Collator, a: &Lead, b: &Lead) -> Ordering {
        let Some((field, direction)) = self.active else {
            return Ordering::Equal;
        };
        let ordering = collator.collate(field.value(a), field.value(b));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Unicode collation with the CLDR root tailoring, which is what a browser's
/// `localeCompare` uses when no locale is given. Spaces and punctuation keep
/// their weight, and identical-looking strings fall back to code point order.
pub fn collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Lead {
        Lead {
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cycle_returns_to_unset_after_three_activations() {
        let mut sort = SortState::default();
        assert!(sort.is_unset());

        sort.activate(SortField::FullName);
        assert_eq!(sort, SortState::new(SortField::FullName, SortDirection::Asc));

        sort.activate(SortField::FullName);
        assert_eq!(sort, SortState::new(SortField::FullName, SortDirection::Desc));

        sort.activate(SortField::FullName);
        assert!(sort.is_unset());
        assert_eq!(sort.field(), None);
        assert_eq!(sort.direction(), None);
    }

    #[test]
    fn test_switching_column_starts_at_ascending() {
        let mut sort = SortState::new(SortField::FullName, SortDirection::Desc);
        sort.activate(SortField::CompanySize);
        assert_eq!(sort.field(), Some(SortField::CompanySize));
        assert_eq!(sort.direction(), Some(SortDirection::Asc));
        assert_eq!(sort.direction_for(SortField::FullName), None);
    }

    fn collate_sorted<'a>(mut values: Vec<&'a str>) -> Vec<&'a str> {
        let mut collator = collator();
        values.sort_by(|a, b| collator.collate(a, b));
        values
    }

    #[test]
    fn test_collation_is_case_insensitive_first() {
        assert_eq!(collate_sorted(vec!["Bob", "alice", "Carol"]), vec!["alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_collation_lower_case_wins_ties() {
        let mut collator = collator();
        assert_eq!(collator.collate("a", "A"), Ordering::Less);
        assert_eq!(collator.collate("Ab", "ab"), Ordering::Greater);
        assert_eq!(collator.collate("same", "same"), Ordering::Equal);
        assert_eq!(collator.collate("", "a"), Ordering::Less);
    }

    #[test]
    fn test_collation_sorts_accents_with_base_letter() {
        assert_eq!(collate_sorted(vec!["Zoe", "Émile", "Oscar"]), vec!["Émile", "Oscar", "Zoe"]);
        assert_eq!(
            collate_sorted(vec!["Zoë", "Émile", "Zoe", "Emile"]),
            vec!["Emile", "Émile", "Zoe", "Zoë"]
        );
        assert_eq!(collate_sorted(vec!["Øyvind", "Nils", "Åsa"]), vec!["Åsa", "Nils", "Øyvind"]);
    }

    #[test]
    fn test_compare_respects_direction() {
        let bob = named("Bob");
        let alice = named("alice");

        let mut collator = collator();

        let asc = SortState::new(SortField::FullName, SortDirection::Asc);
        assert_eq!(asc.compare(&mut collator, &alice, &bob), Ordering::Less);

        let desc = SortState::new(SortField::FullName, SortDirection::Desc);
        assert_eq!(desc.compare(&mut collator, &alice, &bob), Ordering::Greater);

        assert_eq!(SortState::default().compare(&mut collator, &alice, &bob), Ordering::Equal);
    }

    #[test]
    fn test_field_values() {
        let lead = Lead {
            full_name: "Amy Li".to_string(),
            title: "VP Sales".to_string(),
            company_name: "Acme".to_string(),
            company_industry: "SaaS".to_string(),
            company_size: "11-50".to_string(),
            ..Default::default()
        };
        let values: Vec<&str> = SortField::COLUMNS.iter().map(|f| f.value(&lead)).collect();
        assert_eq!(values, vec!["Amy Li", "Acme", "VP Sales", "SaaS", "11-50"]);
    }
}
