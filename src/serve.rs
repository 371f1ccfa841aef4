//! Development server.
//!
//! A `tiny_http` server that renders every page request through a fresh
//! `DocumentAssembler`, the way a production front controller would:
//!
//! - `/about` → `<content>/about.html` or `<content>/about/index.html`
//! - any other existing file under the root is served as-is (styles,
//!   scripts, favicons)
//! - everything else is a 404
//!
//! The server blocks until Ctrl+C is received.

use crate::{
    config::SiteConfig,
    document::{Diagnostics, DocumentAssembler},
    log,
    request::Request as PageRequest,
};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

// ============================================================================
// Constants
// ============================================================================

/// Not-found page (embedded at compile time)
const NOT_FOUND_TEMPLATE: &str = include_str!("embed/serve/not_found.html");

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Bind, install the Ctrl+C handler and serve until shutdown.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let interface: std::net::IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => continue,
            Err(e) => {
                return Err(anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    Err(anyhow!("No port attempts made (max_retries = 0)"))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Page body file for a request path, if one exists.
///
/// `/` and `/docs/` look for `index.html`; `/about` tries `about.html`
/// first and then `about/index.html`.
pub fn resolve_content(config: &SiteConfig, path: &str) -> Option<PathBuf> {
    let content = config.paths().root_path(&config.paths.content);
    let rel = path.trim_matches('/');
    if rel.split('/').any(|part| part == "..") {
        return None;
    }

    let candidates = if rel.is_empty() {
        vec![content.join("index.html")]
    } else {
        vec![
            content.join(format!("{rel}.html")),
            content.join(rel).join("index.html"),
        ]
    };
    candidates.into_iter().find(|p| p.is_file())
}

/// Handle a single HTTP request.
///
/// Resolution order:
/// 1. Content page → render through the assembler
/// 2. Existing file under the root → serve file
/// 3. Nothing found → 404
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    let page_request = PageRequest::with_method(request.method().as_str(), request.url());
    log!("serve"; "{} {}", page_request.method, request.url());

    if let Some(body_file) = resolve_content(config, &page_request.path) {
        return serve_page(request, page_request, &body_file, config);
    }

    let rel = page_request.path.trim_start_matches('/');
    if !rel.is_empty() && !rel.split('/').any(|part| part == "..") {
        let local_path = config.paths().root_path(rel);
        if local_path.is_file() {
            return serve_file(request, &local_path);
        }
    }

    serve_not_found(request, &page_request.path)
}

/// Render a content page with the `[page]` setup.
fn serve_page(
    request: Request,
    page_request: PageRequest,
    body_file: &Path,
    config: &SiteConfig,
) -> Result<()> {
    let body = fs::read_to_string(body_file)
        .with_context(|| format!("Failed to read {}", body_file.display()))?;
    let diagnostics = Diagnostics::new().with_route(page_request.path.clone());

    let mut assembler = DocumentAssembler::new(config, page_request);
    let mut out = Vec::new();
    let rendered = assembler
        .apply_page_config()
        .and_then(|()| assembler.render(&body, &diagnostics, &mut out));

    match rendered {
        Ok(_) => serve_html(request, out),
        Err(err) => {
            log!("error"; "{err}");
            let response = Response::from_string(format!("500 Internal Server Error\n\n{err}"))
                .with_status_code(StatusCode(500))
                .with_header(content_type_header("text/plain; charset=utf-8")?);
            request.respond(response)?;
            Ok(())
        }
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn content_type_header(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("Invalid header value `{value}`"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type_header(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

/// Serve rendered HTML.
fn serve_html(request: Request, content: Vec<u8>) -> Result<()> {
    let response =
        Response::from_data(content).with_header(content_type_header("text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request, path: &str) -> Result<()> {
    #[allow(clippy::literal_string_with_formatting_args)]
    let page = NOT_FOUND_TEMPLATE.replace("{path}", &crate::utils::template::escape_html(path));
    let length = page.len();
    let response = Response::new(
        StatusCode(404),
        vec![content_type_header("text/html; charset=utf-8")?],
        Cursor::new(page),
        Some(length),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
