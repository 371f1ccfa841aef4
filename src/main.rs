//! vellum - request-scoped HTML document assembler.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{
    fs,
    io::{self, Write},
};
use vellum::{
    PageCache, Request, ResourcePipeline, TransientStore,
    cli::{Cli, Commands, TransientAction},
    config::SiteConfig,
    document::{Diagnostics, DocumentAssembler, RenderOutcome},
    log,
    serve::{resolve_content, serve_site},
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match &cli.command {
        Commands::Render {
            url,
            body,
            method,
            route,
        } => render(&config, url, body.as_deref(), method, route.as_deref()),
        Commands::Serve { interface, port } => {
            if let Some(interface) = interface {
                config.serve.interface = interface.clone();
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
            serve_site(&config)
        }
        Commands::Purge { url, all } => purge(&config, url.as_deref(), *all),
        Commands::Transient { action } => transient(&config, action),
        Commands::Compress { path } => {
            let artifact = ResourcePipeline::new(&config).compress(path)?;
            println!("{}", artifact.display());
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.config_path = config_path.canonicalize().unwrap_or(config_path);
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Render one request to stdout.
fn render(
    config: &SiteConfig,
    url: &str,
    body: Option<&std::path::Path>,
    method: &str,
    route: Option<&str>,
) -> Result<()> {
    let request = Request::with_method(method, url);

    let body_file = match body {
        Some(path) => path.to_path_buf(),
        None => match resolve_content(config, &request.path) {
            Some(path) => path,
            None => bail!("No content page for `{}`", request.path),
        },
    };
    let body = fs::read_to_string(&body_file)
        .with_context(|| format!("Failed to read {}", body_file.display()))?;

    let diagnostics = Diagnostics::new().with_route(route.unwrap_or(&request.path).to_owned());
    let key = request.cache_key().into_owned();

    let mut assembler = DocumentAssembler::new(config, request);
    assembler.apply_page_config()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = assembler.render(&body, &diagnostics, &mut out)?;
    out.flush()?;

    match outcome {
        RenderOutcome::Cached => log!("cache"; "served `{key}` from cache"),
        RenderOutcome::Built(warnings) if !warnings.is_empty() => {
            log!("render"; "`{key}` built with {} warning(s)", warnings.len());
        }
        RenderOutcome::Built(_) => {}
    }
    Ok(())
}

fn purge(config: &SiteConfig, url: Option<&str>, all: bool) -> Result<()> {
    let cache = PageCache::new(config.paths().root_path(&config.paths.cache));

    if all {
        let count = cache.purge_all()?;
        log!("cache"; "purged {count} pages");
        return Ok(());
    }

    let Some(url) = url else {
        bail!("Nothing to purge: pass a request target or --all");
    };
    let request = Request::parse(url);
    let key = request.cache_key();
    cache.purge(&key)?;
    log!("cache"; "purged `{key}`");
    Ok(())
}

fn transient(config: &SiteConfig, action: &TransientAction) -> Result<()> {
    let store = TransientStore::new(config.paths().root_path(&config.paths.transients));

    match action {
        TransientAction::Get { name } => match store.get::<serde_json::Value>(name)? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => log!("transient"; "`{name}` is not set or has expired"),
        },
        TransientAction::Set { name, value, ttl } => {
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.clone()));
            store.set(name, &value, *ttl)?;
            log!("transient"; "stored `{name}` for {ttl}s");
        }
        TransientAction::Delete { name } => {
            if store.delete(name)? {
                log!("transient"; "deleted `{name}`");
            } else {
                log!("transient"; "`{name}` was not set");
            }
        }
    }
    Ok(())
}
