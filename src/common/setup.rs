use clap::{Arg, ArgMatches, Command, ValueEnum, builder::EnumValueParser};
use env_logger::{Builder, Env};
use serde::Deserialize;
use std::io::Write;

use crate::error::{BayesNetError, Result};
use crate::expr::Assignment;

/// How query answers and marginals are printed
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines
    #[serde(rename = "text")]
    Text,

    /// A single JSON document on stdout
    #[serde(rename = "json")]
    Json,
}

/// These options define the inputs from the user.
#[derive(Deserialize, Clone, Debug)]
pub struct CommandLineOptions {
    pub scenario: String,
    /// Query strings such as `P(R|W,C)`, answered in order
    pub queries: Vec<String>,
    /// Evidence terms such as `W` or `~C`, applied before any query
    pub evidence: Vec<String>,
    pub format: OutputFormat,
}

impl CommandLineOptions {
    /// Evidence terms as assignments; `~ID` means false
    pub fn evidence_assignments(&self) -> Result<Vec<Assignment>> {
        self.evidence.iter().map(|term| parse_evidence(term)).collect()
    }
}

/// Parses `ID` or `~ID`
pub fn parse_evidence(term: &str) -> Result<Assignment> {
    let term = term.trim();
    let (id, value) = match term.strip_prefix('~') {
        Some(rest) => (rest.trim(), false),
        None => (term, true),
    };
    if id.is_empty() {
        return Err(BayesNetError::InvalidArgument(format!(
            "'{}' is not a valid evidence term",
            term
        )));
    }
    Ok(Assignment::new(id, value))
}

pub fn init_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);
            writeln!(
                buf,
                "{} [{}:{}] {}",
                record.level(),
                file,
                line,
                record.args()
            )
        })
        .init();
}

fn command() -> Command {
    Command::new("BAYESNET")
        .version("0.1")
        .about("Exact inference over boolean Bayesian networks.")
        .arg(
            Arg::new("scenario")
                .long("scenario")
                .value_name("STRING")
                .help("Sets the network to load")
                .default_value("sprinkler"),
        )
        .arg(
            Arg::new("query")
                .long("query")
                .short('q')
                .value_name("EXPR")
                .help("A query such as 'P(R|W,C)'; may be repeated")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("evidence")
                .long("evidence")
                .short('e')
                .value_name("[~]ID")
                .help("Observed value of a variable, '~' for false; may be repeated")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(EnumValueParser::<OutputFormat>::new())
                .help("Output format: 'text' or 'json'")
                .default_value("text"),
        )
}

fn options_from_matches(matches: &ArgMatches) -> CommandLineOptions {
    let scenario = matches
        .get_one::<String>("scenario")
        .cloned()
        .unwrap_or_else(|| "sprinkler".to_string());
    let strings = |name: &str| -> Vec<String> {
        matches
            .get_many::<String>(name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };
    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or(OutputFormat::Text);

    CommandLineOptions {
        scenario,
        queries: strings("query"),
        evidence: strings("evidence"),
        format,
    }
}

/// Parse options from an explicit argument list; the first item is the program name
pub fn parse_options_from<I, T>(args: I) -> Result<CommandLineOptions>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command()
        .try_get_matches_from(args)
        .map_err(|e| BayesNetError::InvalidArgument(e.to_string()))?;
    Ok(options_from_matches(&matches))
}

/// Initialise logging and read the process arguments. Exits on bad arguments.
pub fn parse_configuration_options() -> CommandLineOptions {
    init_logging();
    let matches = command().get_matches();
    options_from_matches(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = parse_options_from(["bayesnet"]).unwrap();
        assert_eq!(options.scenario, "sprinkler");
        assert!(options.queries.is_empty());
        assert!(options.evidence.is_empty());
        assert_eq!(options.format, OutputFormat::Text);
    }

    #[test]
    fn test_repeated_arguments() {
        let options = parse_options_from([
            "bayesnet",
            "--scenario",
            "disease",
            "-q",
            "P(D|T)",
            "--query",
            "P(T)",
            "-e",
            "~T",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(options.scenario, "disease");
        assert_eq!(options.queries, vec!["P(D|T)", "P(T)"]);
        assert_eq!(
            options.evidence_assignments().unwrap(),
            vec![Assignment::new("T", false)]
        );
        assert_eq!(options.format, OutputFormat::Json);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_options_from(["bayesnet", "--format", "xml"]).is_err());
        assert!(parse_evidence("~").is_err());
        assert!(parse_evidence(" ").is_err());
        assert_eq!(parse_evidence("W").unwrap(), Assignment::new("W", true));
    }
}
