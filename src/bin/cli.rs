//! confs-push CLI
//!
//! Fetches a topic's conference list and announces the new ones.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use confs_push::{
    error::{AppError, Result},
    models::{Conference, Config},
    pipeline::{self, DispatchOptions, DispatchReport},
    publish::{
        CountryFlags, FeedPublisher, FeedRenderer, Formatter, SlackPublisher, TeamsPublisher,
    },
    services::{ConferenceSource, PreviewFetcher},
    storage::{LocalStateFile, StateStore},
    utils::{self, http},
};
use reqwest::Client;

/// confs-push - Announce upcoming tech conferences
#[derive(Parser, Debug)]
#[command(
    name = "confs-push",
    version,
    about = "Push upcoming tech conferences to Slack, Microsoft Teams or Atom"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "confs-push.toml")]
    config: PathBuf,

    /// Countries to skip, repeatable or comma separated
    #[arg(
        short = 'C',
        long,
        env = "COUNTRIES_BLACKLIST",
        value_delimiter = ','
    )]
    countries_blacklist: Vec<String>,

    /// Only announce conferences whose call for papers is over
    #[arg(long)]
    cfp_finished: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send new conferences to a Slack incoming webhook
    Slack {
        /// Conference topic, e.g. rust or data-science
        topic: Option<String>,

        #[arg(long, env = "SLACK_URL")]
        slack_url: Option<String>,

        #[arg(short = 'k', long, env = "SLACK_CHANNEL")]
        slack_channel: Option<String>,

        /// Announced-conference state (default: state.file from config)
        #[arg(short, long)]
        state_file: Option<PathBuf>,
    },

    /// Send new conferences to a Microsoft Teams incoming webhook
    Msteams {
        /// Conference topic, e.g. rust or data-science
        topic: Option<String>,

        #[arg(long, env = "MSTEAMS_URL")]
        msteams_url: Option<String>,

        /// Announced-conference state (default: state.file from config)
        #[arg(short, long)]
        state_file: Option<PathBuf>,
    },

    /// Print an Atom feed of upcoming conferences to stdout
    Atom {
        /// Conference topic, e.g. rust or data-science
        topic: Option<String>,

        /// Only include conferences not in this state file, then record them
        #[arg(short, long)]
        state_file: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging. `RUST_LOG` wins over `level`.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Everything a publishing command needs besides its destination.
struct Session {
    config: Config,
    client: Client,
    flags: CountryFlags,
    options: DispatchOptions,
}

impl Session {
    fn new(config: Config, cli_blacklist: Vec<String>, cli_cfp_finished: bool) -> Result<Self> {
        let mut countries_blacklist = config.filters.countries_blacklist.clone();
        for country in cli_blacklist {
            let country = country.trim();
            if !country.is_empty() && !countries_blacklist.iter().any(|c| c == country) {
                countries_blacklist.push(country.to_string());
            }
        }

        let options = DispatchOptions {
            today: utils::today(),
            cfp_finished: cli_cfp_finished || config.filters.cfp_finished,
            countries_blacklist,
        };

        Ok(Self {
            client: http::create_client(&config.http)?,
            flags: CountryFlags::new(),
            options,
            config,
        })
    }

    async fn fetch(&self, topic: &str) -> Result<Vec<Conference>> {
        let year = utils::year_of(&self.options.today)?;
        let source = ConferenceSource::new(self.client.clone(), &self.config.feed.base_url);
        let conferences = source.fetch(year, topic).await?;
        log::info!("Fetched {} {} conferences for {}", conferences.len(), topic, year);
        Ok(conferences)
    }

    fn previews(&self) -> PreviewFetcher {
        PreviewFetcher::new(self.client.clone(), self.config.preview.clone())
    }

    fn state(&self, state_file: Option<PathBuf>) -> LocalStateFile {
        LocalStateFile::new(state_file.unwrap_or_else(|| self.config.state.file.clone()))
    }
}

fn require_webhook(url: Option<String>, destination: &str) -> Result<String> {
    url.filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::validation(format!("Please provide {destination} webhook url")))
}

fn log_report(destination: &str, report: &DispatchReport) {
    log::info!(
        "{}: {} fetched, {} eligible, {} already announced, {} published",
        destination,
        report.fetched,
        report.eligible,
        report.already_announced,
        report.published
    );
}

/// Check the config file itself, not the defaults that replace it when it
/// fails to load.
fn validate_config(config: &Config, load_error: Option<AppError>) -> Result<()> {
    if let Some(e) = load_error {
        return Err(e);
    }
    config.validate()
}

/// Write the fatal error to `out`, independent of the log filter.
fn report_failure(out: &mut impl Write, error: &AppError) {
    // Nothing sensible left to do if stderr itself is gone.
    let _ = writeln!(out, "Error: {error}");
}

async fn run(cli: Cli, config: Config, config_error: Option<AppError>) -> Result<()> {
    match cli.command {
        Command::Slack {
            topic,
            slack_url,
            slack_channel,
            state_file,
        } => {
            let topic = utils::validate_topic(topic.as_deref())?;
            let webhook_url = require_webhook(slack_url, "slack")?;

            let session = Session::new(config, cli.countries_blacklist, cli.cfp_finished)?;
            let fetched = session.fetch(&topic).await?;

            let store = session.state(state_file);
            let publisher = SlackPublisher::new(
                session.client.clone(),
                webhook_url,
                slack_channel,
                Formatter::new(&session.flags),
            );

            let report =
                pipeline::run_dispatch(fetched, &session.options, &store, &publisher).await?;
            log_report("slack", &report);
        }

        Command::Msteams {
            topic,
            msteams_url,
            state_file,
        } => {
            let topic = utils::validate_topic(topic.as_deref())?;
            let webhook_url = require_webhook(msteams_url, "msteams")?;

            let session = Session::new(config, cli.countries_blacklist, cli.cfp_finished)?;
            let fetched = session.fetch(&topic).await?;

            let store = session.state(state_file);
            let previews = session.previews();
            let publisher = TeamsPublisher::new(
                session.client.clone(),
                webhook_url,
                Formatter::new(&session.flags),
                &previews,
            );

            let report =
                pipeline::run_dispatch(fetched, &session.options, &store, &publisher).await?;
            log_report("msteams", &report);
        }

        Command::Atom { topic, state_file } => {
            let topic = utils::validate_topic(topic.as_deref())?;

            let session = Session::new(config, cli.countries_blacklist, cli.cfp_finished)?;
            let fetched = session.fetch(&topic).await?;

            let store = state_file.map(LocalStateFile::new);
            let previews = session.previews();
            let publisher = FeedPublisher::new(
                FeedRenderer::new(Formatter::new(&session.flags), &session.config.feed),
                &previews,
                topic,
                io::stdout(),
            );

            let report = pipeline::run_batch_dispatch(
                fetched,
                &session.options,
                store.as_ref().map(|s| s as &dyn StateStore),
                &publisher,
            )
            .await?;
            log_report("atom", &report);
        }

        Command::Validate => {
            log::info!("Validating configuration {}...", cli.config.display());
            validate_config(&config, config_error)?;
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(cli.verbose, &config.logging.level);

    match &config_error {
        Some(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        ),
        None => log::info!("Loaded configuration from {}", cli.config.display()),
    }

    match run(cli, config, config_error).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            report_failure(&mut io::stderr(), &e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_reports_load_error() {
        let load_error = Config::load("/definitely/not/here.toml").unwrap_err();

        let err = validate_config(&Config::default(), Some(load_error)).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_validate_config_reports_unparseable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = \"zero\"\n").unwrap();
        let load_error = Config::load(&path).unwrap_err();

        let err = validate_config(&Config::default(), Some(load_error)).unwrap_err();
        assert!(matches!(err, AppError::Toml(_)));
    }

    #[test]
    fn test_validate_config_checks_loaded_values() {
        assert!(validate_config(&Config::default(), None).is_ok());

        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(matches!(
            validate_config(&config, None),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_report_failure_writes_message() {
        let mut out = Vec::new();
        report_failure(&mut out, &AppError::validation("Invalid conference topic"));

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Invalid conference topic\n"
        );
    }

    #[test]
    fn test_atom_subcommand_parses() {
        let cli = Cli::try_parse_from(["confs-push", "atom", "golang", "-s", "state.json"]).unwrap();
        match cli.command {
            Command::Atom { topic, state_file } => {
                assert_eq!(topic.as_deref(), Some("golang"));
                assert_eq!(state_file, Some(PathBuf::from("state.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
