use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{install_dir, load_config, Config, OutputFormat};
use core_types::parse_report_date;
use event_context::{DefinitionTable, EventContextBuilder, NormalizationTable};
use events::EventContext;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the event flags tool.
fn main() -> Result<()> {
    // A missing .env file is normal; it only carries optional overrides.
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the context.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let output = handle_flags(cli)?;
    println!("{output}");

    Ok(())
}

/// The `RUST_LOG` directives when given and valid, otherwise warnings and above so
/// calendar problems are visible.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Flags calendar-driven market events (opex, triple witching, month/quarter end,
/// scheduled macro releases) for a report date and its trailing window.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The report date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// How many days before the report date to scan. Overrides the config file.
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Path to the manual event calendar. Overrides the config file.
    #[arg(long)]
    calendar: Option<PathBuf>,

    /// Path to a TOML configuration file (default: ./config.toml, if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format. Overrides the config file.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Resolves settings, builds the context, and renders it.
fn handle_flags(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    let report_date = match cli.date.as_deref() {
        Some(raw) => parse_report_date(raw)?,
        None => Local::now().date_naive(),
    };
    let lookback_days = cli.lookback_days.unwrap_or(config.context.lookback_days);
    let calendar_path = cli
        .calendar
        .unwrap_or_else(|| config.calendar.resolve_path(install_dir().as_deref()));
    let format = cli.format.unwrap_or(config.output.format);

    let (normalization, definitions) = tables_from_config(&config)?;
    let builder = EventContextBuilder::from_source(&calendar_path, &normalization, definitions);

    tracing::info!(
        %report_date,
        lookback_days,
        calendar = %calendar_path.display(),
        calendar_loaded = builder.calendar_loaded(),
        "Building event context."
    );
    let context = builder.build(report_date, lookback_days);

    match format {
        OutputFormat::Json => Ok(context.to_json_pretty()?),
        OutputFormat::Table => Ok(render_table(&context)),
    }
}

/// Layers the configured aliases and definitions over the built-in tables.
fn tables_from_config(config: &Config) -> Result<(NormalizationTable, DefinitionTable)> {
    let mut normalization = NormalizationTable::default();
    for (alias, canonical) in &config.aliases {
        normalization = normalization
            .with_alias(alias, canonical)
            .with_context(|| format!("Invalid alias '{alias}'"))?;
    }

    let mut definitions = DefinitionTable::default();
    for (tag, text) in &config.definitions {
        definitions = definitions
            .with_definition(tag, text)
            .with_context(|| format!("Invalid definition for '{tag}'"))?;
    }

    Ok((normalization, definitions))
}

/// Renders one row per flagged event: when it applies and what it means.
fn render_table(context: &EventContext) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Event", "When", "Note"]);

    for (tag, note) in &context.notes {
        let when = match (context.has_today(tag), context.has_recent(tag)) {
            (true, true) => "today, recent",
            (true, false) => "today",
            _ => "recent",
        };
        table.add_row(vec![tag.to_string(), when.to_string(), note.clone()]);
    }

    let calendar_state = if context.source.calendar_loaded {
        "loaded"
    } else {
        "unavailable"
    };
    format!(
        "As of {} (calendar {}: {})\n{table}",
        format_date(context.as_of),
        calendar_state,
        context.source.calendar_path
    )
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%a)").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::EventTag;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn cli_parses_all_overrides() {
        let cli = Cli::try_parse_from([
            "event-flags",
            "--date",
            "2025-12-22",
            "--lookback-days",
            "3",
            "--calendar",
            "cal.json",
            "--format",
            "table",
        ])
        .unwrap();
        assert_eq!(cli.date.as_deref(), Some("2025-12-22"));
        assert_eq!(cli.lookback_days, Some(3));
        assert_eq!(cli.format, Some(OutputFormat::Table));
    }

    #[test]
    fn negative_lookback_is_rejected_by_the_cli() {
        assert!(Cli::try_parse_from(["event-flags", "--lookback-days", "-1"]).is_err());
    }

    #[test]
    fn config_tables_extend_the_defaults() {
        let mut config = Config::default();
        config
            .aliases
            .insert("FED_DECISION".to_string(), "FOMC".to_string());
        config
            .definitions
            .insert("CPI".to_string(), "Inflation print.".to_string());

        let (normalization, definitions) = tables_from_config(&config).unwrap();
        assert_eq!(normalization.normalize("FED_DECISION"), EventTag::Fomc);
        assert_eq!(normalization.normalize("FOMC_MEETING"), EventTag::Fomc);
        assert_eq!(definitions.explain(&EventTag::from("CPI")), "Inflation print.");
    }

    #[test]
    fn warnings_are_shown_without_rust_log() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            log_filter(Some("debug".to_string())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn table_lists_every_note() {
        let builder = EventContextBuilder::new(
            event_context::EventCalendar::empty(),
            false,
            "missing.json",
            DefinitionTable::default(),
        );
        let context = builder.build(NaiveDate::from_ymd_opt(2025, 12, 22).unwrap(), 7);
        let rendered = render_table(&context);

        assert!(rendered.starts_with("As of 2025-12-22 (Mon)"));
        assert!(rendered.contains("unavailable"));
        assert!(rendered.contains("TRIPLE_WITCHING"));
        assert!(rendered.contains("recent"));
    }
}
