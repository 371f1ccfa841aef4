//! Request-scoped diagnostics and the debug overlay.
//!
//! A `Diagnostics` value is created when the request starts and handed to
//! the render call; nothing here is global. Callers record controller
//! dispatches and database calls as they happen, and the overlay is
//! rendered from that record after the document when debug mode is on.

use crate::config::SiteConfig;
use crate::request::Request;
use crate::utils::template::escape_html;
use std::time::{Duration, Instant};

const OVERLAY_STYLE: &str = include_str!("../embed/diagnostics/overlay.css");
const OVERLAY_SCRIPT: &str = include_str!("../embed/diagnostics/overlay.js");

/// One database call observed during the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCall {
    pub query: String,
    pub params: Vec<String>,
    pub affected_rows: Option<u64>,
    /// `file:line` of the call site
    pub location: String,
}

/// One controller method dispatched during the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerCall {
    pub controller: String,
    pub method: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostics {
    started: Instant,
    pub status: u16,
    pub route_name: String,
    pub controllers: Vec<ControllerCall>,
    pub queries: Vec<DbCall>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Start the request clock.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            status: 200,
            route_name: String::new(),
            controllers: Vec::new(),
            queries: Vec::new(),
        }
    }

    pub fn with_route(mut self, name: impl Into<String>) -> Self {
        self.route_name = name.into();
        self
    }

    pub fn record_controller(&mut self, controller: impl Into<String>, method: impl Into<String>) {
        self.controllers.push(ControllerCall {
            controller: controller.into(),
            method: method.into(),
        });
    }

    pub fn record_query(&mut self, call: DbCall) {
        self.queries.push(call);
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Overlay markup: method, status, route, controllers, elapsed time,
    /// database calls and the flattened site configuration.
    pub fn render_overlay(&self, request: &Request, config: &SiteConfig) -> String {
        let route_type = if self.route_name.contains('/') { "" } else { "@" };
        let status_class = self.status / 100;
        let controllers: String = self
            .controllers
            .iter()
            .map(|c| format!("{}:{}<br>", escape_html(&c.controller), escape_html(&c.method)))
            .collect();

        format!(
            "<style>{OVERLAY_STYLE}</style>\
             <div id=\"vellumDiagnostics\">\
             <div class=\"barBegin\">\
             <div>{method}</div>\
             <div class=\"statusCode_{status_class}00\">{status}</div>\
             <div class=\"info-item\">\
             <span class=\"routeType\">{route_type}</span><span>{route}</span>\
             <div class=\"infoBox\"><table><tr><td>Used Controller</td><td>{controllers}</td></tr></table></div>\
             </div>\
             <div>{elapsed}</div>\
             <div class=\"dbRequests info-item\">DB {count}\
             <div class=\"infoBox\"><div>DB Requests</div><div>{db_table}</div></div>\
             </div>\
             </div>\
             <div class=\"barEnd\">\
             <div class=\"barVersion info-item\">vellum v{version}\
             <div class=\"infoBox\">{config_table}</div>\
             </div>\
             <div class=\"barClose\">x</div>\
             </div>\
             </div>\
             <script>{OVERLAY_SCRIPT}</script>",
            method = escape_html(&request.method),
            status = self.status,
            route = escape_html(&self.route_name),
            elapsed = format_elapsed(self.elapsed()),
            count = self.queries.len(),
            db_table = db_table(&self.queries),
            version = env!("CARGO_PKG_VERSION"),
            config_table = config_table(&config.flatten()),
        )
    }
}

/// `N ms` below one second, `N.NN s` otherwise.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0} ms", secs * 1000.0)
    } else {
        format!("{secs:.2} s")
    }
}

fn db_table(queries: &[DbCall]) -> String {
    let rows: String = queries
        .iter()
        .enumerate()
        .map(|(index, call)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                index + 1,
                escape_html(&call.query),
                escape_html(&call.params.join(", ")),
                call.affected_rows.map(|n| n.to_string()).unwrap_or_default(),
                escape_html(&call.location),
            )
        })
        .collect();

    format!(
        "<table><thead><tr><th>Order</th><th>Query</th><th>Params</th>\
         <th>Affected Rows</th><th>File</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn config_table(entries: &[(String, String)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(name, value)| {
            format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(name), escape_html(value))
        })
        .collect();

    format!("<table><thead><tr><th>Name</th><th>Value</th></tr></thead><tbody>{rows}</tbody></table>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(42)), "42 ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50 s");
        assert_eq!(format_elapsed(Duration::from_secs(3)), "3.00 s");
    }

    #[test]
    fn test_overlay_contents() {
        let mut diagnostics = Diagnostics::new().with_route("home");
        diagnostics.record_controller("PageController", "index");
        diagnostics.record_query(DbCall {
            query: "SELECT * FROM users WHERE id < ?".into(),
            params: vec!["10".into()],
            affected_rows: Some(3),
            location: "src/users.rs:12".into(),
        });

        let overlay = diagnostics.render_overlay(&Request::parse("/"), &SiteConfig::default());

        assert!(overlay.contains("<div>GET</div>"));
        assert!(overlay.contains("<div class=\"statusCode_200\">200</div>"));
        assert!(overlay.contains("<span class=\"routeType\">@</span><span>home</span>"));
        assert!(overlay.contains("PageController:index<br>"));
        assert!(overlay.contains("DB 1"));
        assert!(overlay.contains("SELECT * FROM users WHERE id &lt; ?"));
        assert!(overlay.contains("<td>3</td><td>src/users.rs:12</td>"));
        assert!(overlay.contains("<td>site.app_name</td><td>vellum</td>"));
    }

    #[test]
    fn test_overlay_path_route_and_error_status() {
        let mut diagnostics = Diagnostics::new().with_route("/missing");
        diagnostics.status = 404;

        let overlay = diagnostics.render_overlay(&Request::parse("/missing"), &SiteConfig::default());

        assert!(overlay.contains("<span class=\"routeType\"></span><span>/missing</span>"));
        assert!(overlay.contains("statusCode_400"));
        assert!(overlay.contains("DB 0"));
    }
}
