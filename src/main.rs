mod api;
mod config;
mod filters;
mod models;
mod sort;
mod tui;
mod view;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use api::{display_name, load_dashboard, DashboardPage, FileLeadSource, HttpLeadSource, LeadSource};
use config::Config;
use filters::{FilterState, SignalFilter, INDUSTRY_PREVIEW};
use sort::{SortDirection, SortField, SortState};
use view::{EmptyReason, LeadsDashboard};

#[derive(Parser)]
#[command(name = "leads")]
#[command(about = "Lead intelligence dashboard - search, filter, and sort GTM leads")]
struct Cli {
    /// Base URL of the leads API (overrides LEADS_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Load leads from a saved JSON response instead of the API
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Display name for the dashboard (defaults to the slug, title-cased)
    #[arg(long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard
    Show {
        /// Company slug
        slug: String,
    },

    /// Print leads as a table
    List(ListArgs),

    /// Show available filter values
    Filters {
        /// Company slug
        slug: String,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Company slug
    slug: String,

    /// Case-insensitive text search over name, title, company, and industry
    #[arg(short, long, default_value = "")]
    search: String,

    /// Keep only these industries (repeatable)
    #[arg(short, long)]
    industry: Vec<String>,

    /// Keep only these company sizes (repeatable)
    #[arg(long)]
    size: Vec<String>,

    /// Keep only leads who worked at a customer
    #[arg(short, long)]
    worked_at_customer: bool,

    /// Sort column
    #[arg(long, value_enum)]
    sort: Option<SortField>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl ListArgs {
    /// Flags select values; repeating one selects it once.
    fn filters(&self) -> FilterState {
        FilterState {
            industries: self.industry.iter().cloned().collect(),
            sizes: self.size.iter().cloned().collect(),
            worked_at_customer: if self.worked_at_customer {
                SignalFilter::RequireTrue
            } else {
                SignalFilter::Unconstrained
            },
        }
    }

    fn sort_state(&self) -> SortState {
        match self.sort {
            Some(field) => {
                let direction = if self.desc { SortDirection::Desc } else { SortDirection::Asc };
                SortState::new(field, direction)
            }
            None => SortState::default(),
        }
    }

    fn apply(&self, dashboard: &mut LeadsDashboard) {
        dashboard.set_search_query(self.search.as_str());
        dashboard.set_filters(self.filters());
        dashboard.set_sort(self.sort_state());
    }
}

impl Commands {
    fn slug(&self) -> &str {
        match self {
            Commands::Show { slug } | Commands::List(ListArgs { slug, .. }) | Commands::Filters { slug } => slug,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn lead_source(cli: &Cli) -> Result<Box<dyn LeadSource>> {
    if let Some(path) = &cli.file {
        return Ok(Box::new(FileLeadSource::new(path)));
    }
    let config = Config::load(cli.api_url.as_deref())?;
    Ok(Box::new(HttpLeadSource::new(config.api_url()?)))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let slug = cli.command.slug();
    let source = lead_source(&cli)?;
    let name = cli.name.clone().unwrap_or_else(|| display_name(slug));

    let mut dashboard = match load_dashboard(source.as_ref(), slug, &name) {
        DashboardPage::Ready(dashboard) => dashboard,
        DashboardPage::NotFound { slug } => {
            println!("404 - Not Found");
            println!("The dashboard you are looking for does not exist.");
            bail!("dashboard '{}' not found", slug);
        }
    };

    match cli.command {
        Commands::Show { .. } => {
            tui::run_dashboard(dashboard)?;
        }

        Commands::List(args) => {
            args.apply(&mut dashboard);
            print_leads(&dashboard);
        }

        Commands::Filters { .. } => {
            let options = dashboard.options();
            println!("Industries ({}, first {} shown as chips):", options.industries.len(), INDUSTRY_PREVIEW);
            for industry in &options.industries {
                println!("  {}", industry);
            }
            println!("\nCompany sizes ({}):", options.sizes.len());
            for size in &options.sizes {
                println!("  {}", size);
            }
        }
    }

    Ok(())
}

fn print_leads(dashboard: &LeadsDashboard) {
    println!("{}", dashboard.company_name());
    let rows = dashboard.visible_rows();
    if rows.is_empty() {
        match dashboard.empty_reason() {
            Some(EmptyReason::Filtered) => println!("No leads match your filters."),
            Some(EmptyReason::Searched) => println!("No leads match \"{}\".", dashboard.search_query()),
            Some(EmptyReason::NoLeads) | None => println!("No leads found."),
        }
        return;
    }

    println!(
        "{:<24} {:<20} {:<20} {:<26} {:<18} {:<10} {:<8}",
        "NAME", "DOMAIN", "COMPANY", "TITLE", "INDUSTRY", "SIZE", "SIGNAL"
    );
    println!("{}", "-".repeat(132));
    for lead in rows {
        println!(
            "{:<24} {:<20} {:<20} {:<26} {:<18} {:<10} {:<8}",
            truncate(&lead.full_name, 22),
            truncate(&lead.company_domain, 18),
            truncate(&lead.company_name, 18),
            truncate(&lead.title, 24),
            truncate(&lead.company_industry, 16),
            truncate(&lead.company_size, 10),
            if lead.is_worked_at_customer { "customer" } else { "" }
        );
    }
    let mut footer = format!("{} of {} total", dashboard.lead_count_label(), dashboard.total_leads());
    if dashboard.active_filter_count() > 0 {
        footer.push_str(&format!(" ({} filters active)", dashboard.active_filter_count()));
    }
    println!("\n{}", footer);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
