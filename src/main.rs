use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use codeatlas::analysis::{AnalysisClient, AnalysisReport};
use codeatlas::app::{run_tui, AnalysisRequest};
use codeatlas::config::Config;
use codeatlas::explorer::Explorer;
use codeatlas::github::{get_stored_token, RepoIdentity, INVALID_URL_MESSAGE};
use codeatlas::logging;
use codeatlas::tree::{GraphBuilder, TreePath};
use codeatlas::ui::{App, DataOrigin};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "codeatlas",
    about = "Explore a GitHub repository's file tree as an interactive graph",
    version
)]
struct Args {
    /// GitHub repository URL to analyze (e.g. https://github.com/owner/repo)
    #[arg(conflicts_with_all = ["file_list", "local", "report"])]
    repo_url: Option<String>,

    /// Newline-delimited list of repository paths ("-" reads stdin)
    #[arg(long, value_name = "PATH", conflicts_with_all = ["local", "report"])]
    file_list: Option<PathBuf>,

    /// Explore a checkout on disk
    #[arg(long, value_name = "DIR", conflicts_with = "report")]
    local: Option<PathBuf>,

    /// Load a previously saved analysis report
    #[arg(long, value_name = "JSON")]
    report: Option<PathBuf>,

    /// Save the analysis report as JSON once it arrives
    #[arg(long, value_name = "JSON")]
    save_report: Option<PathBuf>,

    /// List files through the GitHub API instead of the analysis service
    #[arg(long)]
    github: bool,

    /// Analysis service base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Print one level of the tree and exit (no TUI)
    #[arg(short, long)]
    check: bool,

    /// Level to print with --check, e.g. src/components
    #[arg(long, value_name = "PATH", default_value = "")]
    path: String,

    /// Log file (defaults to the platform data directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Save the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

/// What to show first.
enum Startup {
    /// Data is already here (file list, saved report)
    Ready(AnalysisReport, DataOrigin),
    /// Data has to be fetched or scanned
    Fetch(AnalysisRequest),
    Sample,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load();
    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    if args.github {
        config.use_github = true;
    }

    if args.write_config {
        let path = config.save()?;
        println!("  Wrote {}", path.display());
        return Ok(());
    }

    if let Err(e) = logging::init_logging(&config.log, args.log_file.clone()) {
        eprintln!("  Warning: logging disabled ({:#})", e);
    }

    let palette = config.palette().context("Failed to load palette")?;
    let explorer = Explorer::new(GraphBuilder::new(palette), config.layout);

    let (startup, repo) = resolve_startup(&args, &config)?;

    if args.check {
        return run_check(explorer, startup, repo.as_ref(), &args).await;
    }

    let mut app = App::new(explorer).with_repo(repo);
    match startup {
        Startup::Ready(report, origin) => {
            if let Some(path) = &args.save_report {
                report.save(path)?;
            }
            app.apply_report(report, origin);
            run_tui(app, None, None).await
        }
        Startup::Fetch(request) => run_tui(app, Some(request), args.save_report.clone()).await,
        Startup::Sample => run_tui(app, None, None).await,
    }
}

fn resolve_startup(args: &Args, config: &Config) -> Result<(Startup, Option<RepoIdentity>)> {
    if let Some(path) = &args.file_list {
        let text = read_file_list(path)?;
        let report = AnalysisReport::from_file_structure(text);
        return Ok((Startup::Ready(report, DataOrigin::FileList), None));
    }
    if let Some(path) = &args.report {
        let report = AnalysisReport::load(path)?;
        return Ok((Startup::Ready(report, DataOrigin::SavedReport), None));
    }
    if let Some(dir) = &args.local {
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }
        return Ok((Startup::Fetch(AnalysisRequest::Local(dir.clone())), None));
    }
    let Some(url) = args.repo_url.as_deref() else {
        return Ok((Startup::Sample, None));
    };

    let identity = RepoIdentity::from_url(url).ok_or_else(|| anyhow!(INVALID_URL_MESSAGE))?;
    let request = if config.use_github {
        AnalysisRequest::GitHub {
            identity: identity.clone(),
            token: get_stored_token(),
        }
    } else {
        AnalysisRequest::Service {
            client: AnalysisClient::new(&config.api_url)
                .with_session(config.session_cookie.clone())
                .with_timeout(config.request_timeout()),
            repo_url: url.trim().to_string(),
        }
    };
    Ok((Startup::Fetch(request), Some(identity)))
}

fn read_file_list(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin())
            .context("Failed to read file list from stdin");
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file list {}", path.display()))
}

async fn run_check(
    mut explorer: Explorer,
    startup: Startup,
    repo: Option<&RepoIdentity>,
    args: &Args,
) -> Result<()> {
    let report = match startup {
        Startup::Ready(report, _) => report,
        Startup::Fetch(request) => {
            eprintln!("  Analyzing {}...", request.origin().label());
            request.run().await?
        }
        Startup::Sample => AnalysisReport::default(),
    };
    if let Some(path) = &args.save_report {
        report.save(path)?;
    }

    explorer.load(report.node_source());
    let target = TreePath::parse(&args.path);
    for segment in target.segments() {
        if !explorer.navigate_into(segment) {
            bail!("No directory '{}' under {}", segment, explorer.path());
        }
    }
    if let Some(error) = explorer.error() {
        bail!("{}", error);
    }

    print_level(&explorer, repo);
    Ok(())
}

fn print_level(explorer: &Explorer, repo: Option<&RepoIdentity>) {
    let source = explorer.source();
    let title = match repo {
        _ if source.is_sample() => "sample data".to_string(),
        Some(r) => format!("{} ({} files)", r.full_name, source.file_count()),
        None => format!("{} files", source.file_count()),
    };

    let crumbs: Vec<&str> = explorer
        .navigator()
        .breadcrumbs()
        .iter()
        .map(|c| c.label.as_str())
        .collect();

    let graph = explorer.graph();
    println!();
    println!("  codeatlas · {}", title);
    println!("  {}", crumbs.join(" › "));
    println!();
    for node in &graph.nodes {
        let hub = if graph.hub().is_some_and(|h| h.id == node.id) {
            "  (hub)"
        } else {
            ""
        };
        println!("  {:<9} {}{}", node.kind.label(), node.name, hub);
    }
    println!();
    println!(
        "  {} directories, {} files, {} links",
        graph.directories().count(),
        graph.files().count(),
        graph.links.len()
    );
    println!();
}
