use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use smolder_core::{ChangeSet, FileScore, OutputFormat, SmolderConfig};
use smolder_github::GithubClient;
use smolder_hotspots::{classify, score};

#[derive(Parser)]
#[command(
    name = "smolder",
    version,
    about = "Predict bug-prone files from pull request history",
    long_about = "Smolder mines a repository's merged and closed pull requests, keeps the ones\n\
                   whose titles read like bugfixes, and weights each by how recent it is\n\
                   relative to the repository's lifetime. Files touched by many recent fixes\n\
                   rise to the top — they are where the next defect is most likely to live.\n\n\
                   Examples:\n  \
                     smolder scan rails/rails              Rank the ten most fix-prone files\n  \
                     smolder scan myorg/api --base main    Scan PRs opened against main\n  \
                     smolder scan myorg/api --format json  Machine-readable output\n  \
                     smolder doctor                        Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .smolder.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable table (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Rank a repository's bug-prone files from its pull request history
    #[command(long_about = "Rank a repository's bug-prone files from its pull request history.\n\n\
        Fetches every pull request against the base branch, classifies bugfixes by\n\
        title keywords, weights each by recency relative to repository age, and\n\
        prints the ten highest-scoring files. Requires GITHUB_TOKEN.\n\n\
        Examples:\n  smolder scan rails/rails\n  smolder scan myorg/api --base main --verbose")]
    Scan {
        /// Repository to scan (format: owner/repo)
        repo: String,

        /// Base branch the pull requests were opened against
        #[arg(long)]
        base: Option<String>,

        /// GitHub token (overrides GITHUB_TOKEN and the config file)
        #[arg(
            long,
            long_help = "GitHub personal access token.\n\nPrecedence: this flag, then the GITHUB_TOKEN env var,\nthen [github] token in .smolder.toml."
        )]
        github_token: Option<String>,
    },
    /// Create a default .smolder.toml configuration file
    #[command(long_about = "Create a default .smolder.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .smolder.toml already exists.")]
    Init,
    /// Check your smolder setup and environment
    #[command(long_about = "Check your smolder setup and environment.\n\n\
        Runs diagnostics for the config file, GitHub token, and API endpoint.\n\
        Use --format json for machine-readable output.")]
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");

    println!("smolder v{version} — find the files your bugfixes keep coming back to\n");

    println!("Quick start:");
    println!("  export GITHUB_TOKEN=...       A token with repo read access");
    println!("  smolder scan owner/repo       Rank the ten most fix-prone files");
    println!("  smolder init                  Create a .smolder.toml config file\n");

    println!("All commands:");
    println!("  scan      Rank bug-prone files from pull request history");
    println!("  doctor    Check your setup and environment");
    println!("  init      Create default configuration\n");

    println!("Run 'smolder <command> --help' for details.");
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

fn run_doctor(config: &SmolderConfig, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    let config_path = std::path::Path::new(".smolder.toml");
    if config_path.exists() {
        checks.push(CheckResult::pass("config_file", ".smolder.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".smolder.toml not found",
            "run 'smolder init' to create a default config",
        ));
    }

    // 2. GitHub token
    if std::env::var("GITHUB_TOKEN").is_ok() {
        checks.push(CheckResult::pass("github_token", "GITHUB_TOKEN set"));
    } else if config.github.token.is_some() {
        checks.push(CheckResult::pass(
            "github_token",
            "token set in .smolder.toml",
        ));
    } else {
        checks.push(CheckResult::fail(
            "github_token",
            "GITHUB_TOKEN not set",
            "export GITHUB_TOKEN=... (needed for scan)",
        ));
    }

    // 3. Endpoint and base branch in effect
    checks.push(CheckResult::info(
        "api_base",
        config.github.api_base.clone(),
    ));
    checks.push(CheckResult::info(
        "base_branch",
        config.scan.base_branch.clone(),
    ));

    match format {
        OutputFormat::Json => {
            let version = env!("CARGO_PKG_VERSION");
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            let version = env!("CARGO_PKG_VERSION");
            println!("smolder v{version} — Environment Check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<14} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

async fn run_scan(
    repo_ref: &str,
    base: Option<String>,
    github_token: Option<String>,
    config: &SmolderConfig,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    // One capture of `now` for the whole run: every weight derives from it.
    let now = Utc::now();

    let (owner, repo) = smolder_github::parse_repo_reference(repo_ref)?;

    let token = github_token
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .or_else(|| config.github.token.clone());
    let client = GithubClient::new(token.as_deref(), Some(config.github.api_base.as_str()))?;

    eprintln!("Fetching repository metadata for {owner}/{repo} ...");
    let repository_created_at = client.repository_created_at(&owner, &repo).await?;

    let base = base.unwrap_or_else(|| config.scan.base_branch.clone());
    eprintln!("Listing pull requests against '{base}' ...");
    let requests = client.list_change_requests(&owner, &repo, &base).await?;
    eprintln!("Fetched {} pull requests.", requests.len());

    let bugfixes = classify::filter_bugfixes(requests);
    eprintln!("Found {} bugfix pull requests.", bugfixes.len());

    let progress = if std::io::stderr().is_terminal() {
        let pb = indicatif::ProgressBar::new(bugfixes.len() as u64);
        pb.set_style(
            indicatif::ProgressStyle::with_template(
                "{spinner:.cyan} fetching touched files {bar:30} {pos}/{len}",
            )
            .unwrap(),
        );
        pb
    } else {
        indicatif::ProgressBar::hidden()
    };

    let mut change_sets: Vec<ChangeSet> = Vec::with_capacity(bugfixes.len());
    for request in bugfixes {
        if verbose {
            progress.println(format!("{} - {}", request.created_at, request.title));
        }
        let files = client.touched_files(&owner, &repo, request.number).await?;
        change_sets.push(ChangeSet { request, files });
        progress.inc(1);
    }
    progress.finish_and_clear();

    let hotspots = score::rank_hotspots(now, repository_created_at, &change_sets)?;

    render(format, &owner, &repo, change_sets.len(), &hotspots)
}

fn render(
    format: OutputFormat,
    owner: &str,
    repo: &str,
    bugfix_count: usize,
    hotspots: &[FileScore],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "repository": format!("{owner}/{repo}"),
                "bugfixCount": bugfix_count,
                "hotspots": hotspots,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Bugfix Hotspots — {owner}/{repo}\n");
            if hotspots.is_empty() {
                println!("No bugfix hotspots found.");
            } else {
                println!("| Rank | File | Score |");
                println!("|------|------|-------|");
                for (i, entry) in hotspots.iter().enumerate() {
                    println!("| {} | `{}` | {:.2} |", i + 1, entry.path, entry.score);
                }
            }
        }
        OutputFormat::Text => {
            if hotspots.is_empty() {
                println!("No bugfix hotspots found.");
            } else {
                println!("Hotspots (top {}):", hotspots.len());
                println!("{:-<72}", "");
                for (i, entry) in hotspots.iter().enumerate() {
                    println!("{:>2}. {:<52} score={:.2}", i + 1, entry.path, entry.score);
                }
            }
        }
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# smolder configuration
# See: https://github.com/smolder-cli/smolder

[github]
# Base URL for API requests (override for GitHub Enterprise)
# api_base = "https://api.github.com"
# Personal access token; the GITHUB_TOKEN env var takes precedence
# token = "ghp_..."

[scan]
# Base branch pull requests were opened against
# base_branch = "master"
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SmolderConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".smolder.toml");
            if default_path.exists() {
                SmolderConfig::from_file(default_path)?
            } else {
                SmolderConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
    }

    match cli.command {
        None => {
            print_welcome();
            Ok(())
        }
        Some(Command::Scan {
            ref repo,
            ref base,
            ref github_token,
        }) => {
            run_scan(
                repo,
                base.clone(),
                github_token.clone(),
                &config,
                cli.format,
                cli.verbose,
            )
            .await
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".smolder.toml");
            if path.exists() {
                miette::bail!(".smolder.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .smolder.toml with default configuration");
            Ok(())
        }
        Some(Command::Doctor) => run_doctor(&config, cli.format, use_color),
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "smolder", &mut std::io::stdout());
            Ok(())
        }
    }
}
