/* src/cli/core/src/main.rs */

mod check;
mod config;
mod inspect;
mod serve;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use localeroute::{ParamValue, RoutingEngine};
use tracing_subscriber::EnvFilter;

use config::{find_config, load_engine};

#[derive(Parser)]
#[command(name = "localeroute", about = "Locale routing CLI", version)]
struct Cli {
  /// Path to localeroute.toml or localeroute.json (auto-detected if omitted)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Validate the routing config and report unreachable pathnames
  Check,
  /// Show the routing decision for one request
  Route {
    /// URL or path, e.g. https://example.com/de/about?x=1
    url: String,
    /// Raw Cookie header
    #[arg(long)]
    cookie: Option<String>,
    /// Accept-Language header
    #[arg(short, long)]
    accept_language: Option<String>,
    /// Print the full outcome as JSON
    #[arg(long)]
    json: bool,
  },
  /// List hreflang alternates for an internal pathname
  Links {
    /// Internal template, e.g. /blog/[slug]
    internal: String,
    /// Template parameter, repeatable (slug=hello, rest=a/b)
    #[arg(short, long = "param", value_parser = inspect::parse_param)]
    params: Vec<(String, ParamValue)>,
    #[arg(long, default_value = "localhost")]
    host: String,
    #[arg(long, default_value = "http")]
    scheme: String,
  },
  /// Serve a preview app that echoes the resolved locale for every request
  Serve {
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    addr: String,
  },
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("localeroute=info,localeroute_axum=info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Resolve config path (explicit or auto-detected) and build the engine
fn resolve_engine(explicit: Option<PathBuf>) -> Result<(PathBuf, RoutingEngine)> {
  let path = match explicit {
    Some(p) => p,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_config(&cwd)?
    }
  };
  let engine = load_engine(&path)?;
  tracing::debug!(path = %path.display(), "loaded routing config");
  Ok((path, engine))
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let (path, engine) = match resolve_engine(cli.config) {
    Ok(resolved) => resolved,
    Err(err) => {
      ui::fail(&format!("{err:#}"));
      std::process::exit(1);
    }
  };

  match cli.command {
    Command::Check => check::run_check(&engine, &path),
    Command::Route { url, cookie, accept_language, json } => {
      inspect::run_route(&engine, inspect::RouteArgs { url, cookie, accept_language, json })?;
    }
    Command::Links { internal, params, host, scheme } => {
      inspect::run_links(&engine, &internal, params, &host, &scheme)?;
    }
    Command::Serve { addr } => serve::run_serve(engine, &addr).await?,
  }
  Ok(())
}
