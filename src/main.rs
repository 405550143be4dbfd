use anyhow::Context;
use clap::Parser;
use html::debug::outline_from_dom;
use mimalloc::MiMalloc;
use mobilize::MobilizeRewriteFilter;
use rewriter::{
    AssetTable, RequestContext, RewriteDriver, RewriteOptions, StaticAssetManager, Statistics,
};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(
    name = "mobilizer",
    about = "Rewrite a desktop HTML page into a mobile layout driven by data-mobile-role",
    version
)]
struct Cli {
    /// HTML document to rewrite; reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML options file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User-Agent of the simulated request.
    #[arg(long)]
    user_agent: Option<String>,

    /// Turn mobilization on regardless of the options file.
    #[arg(long)]
    enable: bool,

    /// Mobilize for every user agent, not only mobile ones.
    #[arg(long)]
    all_agents: bool,

    /// Inline the stylesheet and script instead of linking them.
    #[arg(long)]
    inline_assets: bool,

    /// Insert the layout spacer at the top of the body.
    #[arg(long)]
    spacer: bool,

    /// Print an outline of the rewritten tree (at most N lines) instead of HTML.
    #[arg(long, value_name = "N")]
    outline: Option<usize>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn load_options(cli: &Cli) -> anyhow::Result<RewriteOptions> {
    let mut options = match &cli.config {
        Some(path) => RewriteOptions::from_path(path)?,
        None => RewriteOptions::default(),
    };
    let mobilize = &mut options.mobilize;
    mobilize.enabled |= cli.enable;
    mobilize.mobilize_all_user_agents |= cli.all_agents;
    mobilize.inline_assets |= cli.inline_assets;
    mobilize.add_spacer |= cli.spacer;
    Ok(options)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
    }
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = Arc::new(load_options(&cli)?);
    let input = read_input(cli.input.as_deref())?;

    let stats = Statistics::new();
    MobilizeRewriteFilter::init_stats(&stats);
    let request = RequestContext {
        user_agent: cli.user_agent.clone(),
    };

    let mut driver = RewriteDriver::new(options, request);
    let assets: Arc<dyn StaticAssetManager> =
        Arc::new(AssetTable::new(driver.options().static_asset_base.clone()));
    let mobilizer = MobilizeRewriteFilter::new(driver.options(), &stats, assets);
    driver.add_filter(Box::new(mobilizer));
    let rendered = driver.rewrite(&input).context("rewriting document")?;

    let output = match cli.outline {
        Some(cap) => {
            let mut lines = outline_from_dom(driver.dom(), cap).join("\n");
            lines.push('\n');
            lines
        }
        None => rendered,
    };
    write_output(cli.output.as_deref(), &output)?;

    for (name, value) in stats.snapshot() {
        log::info!(target: "mobilizer", "{name} = {value}");
    }
    Ok(())
}
