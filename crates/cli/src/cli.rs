//! Argument parsing.

use clap::{Args, Parser, Subcommand};
use modelcat_client::CatalogQuery;

/// Query a remote model catalog through a local response cache.
#[derive(Parser, Debug)]
#[command(name = "modelcat")]
#[command(version)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch the catalog, serving from cache when policy allows
    Fetch {
        #[command(flatten)]
        filters: Filters,

        /// Print the full response as JSON instead of a model listing
        #[arg(long)]
        json: bool,
    },

    /// Drop the cached entry for one filter combination
    Invalidate {
        #[command(flatten)]
        filters: Filters,
    },

    /// Drop every cached entry
    Clear,

    /// Show effective configuration and cached keys
    Status,
}

/// Catalog filters, sent in this order.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Subscription plan, e.g. "Pro+"
    #[arg(long)]
    pub plan: Option<String>,

    /// Match mode for --q, e.g. "exact"
    #[arg(long)]
    pub mode: Option<String>,

    /// Restrict to one provider
    #[arg(long)]
    pub provider: Option<String>,

    /// Free-text search term
    #[arg(long)]
    pub q: Option<String>,
}

impl From<Filters> for CatalogQuery {
    fn from(filters: Filters) -> Self {
        CatalogQuery { plan: filters.plan, mode: filters.mode, provider: filters.provider, q: filters.q }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_with_filters() {
        let cli = Cli::parse_from(["modelcat", "fetch", "--plan", "Pro+", "--provider", "openai", "--json"]);
        let Command::Fetch { filters, json } = cli.command else {
            panic!("expected fetch");
        };
        assert!(json);
        assert_eq!(filters.plan.as_deref(), Some("Pro+"));
        assert_eq!(filters.provider.as_deref(), Some("openai"));
        assert_eq!(filters.mode, None);
        assert!(!cli.log_json);
    }

    #[test]
    fn test_parse_global_log_json() {
        let cli = Cli::parse_from(["modelcat", "clear", "--log-json"]);
        assert!(cli.log_json);
        assert_eq!(cli.command, Command::Clear);
    }

    #[test]
    fn test_filters_into_query() {
        let filters =
            Filters { plan: Some("Pro+".into()), mode: Some("exact".into()), q: Some("gpt".into()), ..Default::default() };
        let query = CatalogQuery::from(filters);
        assert_eq!(query.plan.as_deref(), Some("Pro+"));
        assert_eq!(query.mode.as_deref(), Some("exact"));
        assert_eq!(query.provider, None);
        assert_eq!(query.q.as_deref(), Some("gpt"));
    }

    #[test]
    fn test_invalidate_requires_no_filters() {
        let cli = Cli::parse_from(["modelcat", "invalidate"]);
        assert_eq!(cli.command, Command::Invalidate { filters: Filters::default() });
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["modelcat", "purge"]).is_err());
    }
}
