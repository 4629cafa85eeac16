use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub linkedin_slug: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_domain: String,
    #[serde(default)]
    pub company_industry: String,
    #[serde(default)]
    pub company_size: String, // "1-10", "11-50", "201-500", ...
    #[serde(default)]
    pub is_worked_at_customer: bool,
    #[serde(default)]
    pub worked_at_customer_company: Option<String>, // only set when is_worked_at_customer
}

impl Lead {
    pub fn profile_url(&self) -> Option<&str> {
        Some(self.linkedin_url.as_str()).filter(|url| !url.is_empty())
    }

    /// Tooltip text for the signal badge, if the lead carries one.
    pub fn signal_tooltip(&self) -> Option<String> {
        if !self.is_worked_at_customer {
            return None;
        }
        self.worked_at_customer_company
            .as_deref()
            .filter(|company| !company.is_empty())
            .map(|company| format!("Worked at {}", company))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub total_leads: u64, // server count, informational only
}

/// Rendering identity of a row: the LinkedIn slug when present, else its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey<'a> {
    Slug(&'a str),
    Index(usize),
}

pub fn row_key(index: usize, lead: &Lead) -> RowKey<'_> {
    if lead.linkedin_slug.is_empty() {
        RowKey::Index(index)
    } else {
        RowKey::Slug(&lead.linkedin_slug)
    }
}
