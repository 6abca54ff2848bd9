use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use veracity_common::{AnalysisRequest, Config};
use veracity_engine::Analyzer;

#[derive(Parser)]
#[command(name = "veracity", about = "Content credibility scoring engine")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one piece of content and print the full result
    Analyze(AnalyzeArgs),
    /// Score JSON-lines requests (one AnalysisRequest per line)
    Batch {
        /// Input file; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print lexical and risk signals only (no classifier, no network)
    Signals(TextArgs),
    /// Print the trust tier for a source domain or URL
    Trust { source: String },
}

#[derive(Args)]
struct TextArgs {
    /// Content text; read from --file or stdin when omitted
    #[arg(long)]
    text: Option<String>,

    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: TextArgs,

    #[arg(long)]
    title: Option<String>,

    /// Outlet or domain, e.g. reuters.com
    #[arg(long)]
    source: Option<String>,

    #[arg(long)]
    url: Option<String>,
}

#[derive(Serialize)]
struct SignalsOutput {
    lexical: veracity_common::LexicalSignals,
    risk: veracity_common::RiskPatternResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("veracity=info")),
        );
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = Config::from_env()?;
    config.log_redacted();

    let analyzer = Analyzer::from_config(&config)?;

    match cli.command {
        Command::Analyze(args) => {
            let text = read_text(&args.input)?;
            let mut request = AnalysisRequest::new(text);
            request.title = args.title;
            request.source = args.source;
            request.url = args.url;

            let result = analyzer.analyze(&request).await?;
            print_json(&result, cli.pretty)?;
        }
        Command::Batch { file } => {
            let entries = parse_batch(open_batch_input(file.as_ref())?)?;
            let requests: Vec<AnalysisRequest> = entries
                .iter()
                .filter_map(|entry| entry.request.as_ref().ok().cloned())
                .collect();
            info!(
                lines = entries.len(),
                valid = requests.len(),
                "Analyzing batch"
            );

            let mut outcomes = analyzer.analyze_many(&requests).await.into_iter();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for entry in &entries {
                let value = match &entry.request {
                    Ok(_) => match outcomes.next().context("Batch result missing")? {
                        Ok(result) => serde_json::to_value(&result)?,
                        Err(e) => batch_error(entry.line, &e.to_string()),
                    },
                    Err(message) => batch_error(entry.line, message),
                };
                serde_json::to_writer(&mut out, &value)?;
                writeln!(out)?;
            }
        }
        Command::Signals(args) => {
            let text = read_text(&args)?;
            let (lexical, risk) = analyzer.signals(&text);
            print_json(&SignalsOutput { lexical, risk }, cli.pretty)?;
        }
        Command::Trust { source } => {
            println!("{}", analyzer.trust_tier(&source));
        }
    }

    Ok(())
}

fn read_text(args: &TextArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read text from stdin")?;
    Ok(buf)
}

/// One non-blank batch input line. `line` is the 1-based line number in the
/// input, used as the `request` key of error output.
#[derive(Debug)]
struct BatchEntry {
    line: usize,
    request: std::result::Result<AnalysisRequest, String>,
}

fn open_batch_input(file: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(io::BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::BufReader::new(io::stdin())),
    };
    Ok(reader)
}

/// Blank lines are skipped; a line that is not a valid request becomes an
/// entry carrying its parse error so the rest of the batch still runs.
fn parse_batch<R: BufRead>(reader: R) -> Result<Vec<BatchEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read batch input")?;
        if line.trim().is_empty() {
            continue;
        }
        let request = serde_json::from_str::<AnalysisRequest>(&line)
            .map_err(|e| format!("Invalid request: {e}"));
        entries.push(BatchEntry {
            line: idx + 1,
            request,
        });
    }
    Ok(entries)
}

fn batch_error(line: usize, message: &str) -> serde_json::Value {
    serde_json::json!({ "request": line, "error": message })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_lines_become_entries_numbered_by_input_line() {
        let input = "{\"text\":\"Good news today.\"}\n\
                     {\"title\":\"no text field\"}\n\
                     \n\
                     not json\n\
                     {\"text\":\"\"}\n";
        let entries = parse_batch(input.as_bytes()).unwrap();

        let lines: Vec<usize> = entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2, 4, 5]);

        assert_eq!(
            entries[0].request.as_ref().unwrap().text,
            "Good news today."
        );
        assert!(entries[1]
            .request
            .as_ref()
            .is_err_and(|m| m.starts_with("Invalid request") && m.contains("text")));
        assert!(entries[2].request.is_err());
        // Parses fine; rejected later by validation.
        assert!(entries[3].request.as_ref().is_ok_and(|r| r.text.is_empty()));
    }

    #[test]
    fn batch_error_uses_request_line() {
        let value = batch_error(5, "Invalid input: text must not be empty");
        assert_eq!(value["request"], 5);
        assert_eq!(value["error"], "Invalid input: text must not be empty");
    }

    #[tokio::test]
    async fn one_bad_line_does_not_drop_the_batch() {
        let analyzer = veracity_engine::testing::stub_analyzer(
            0.2,
            veracity_common::FactCheckVerdict::NoResult,
        );
        let entries =
            parse_batch("{\"text\":\"Rain tomorrow.\"}\n{oops\n{\"text\":\"\"}\n".as_bytes())
                .unwrap();
        let requests: Vec<AnalysisRequest> = entries
            .iter()
            .filter_map(|e| e.request.as_ref().ok().cloned())
            .collect();
        let outcomes = analyzer.analyze_many(&requests).await;

        assert_eq!(entries.len(), 3);
        assert_eq!(requests.len(), 2);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].as_ref().is_err_and(|e| e.is_input_error()));
        assert_eq!(entries[2].line, 3);
    }
}
