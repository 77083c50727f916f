/// HTTP endpoint serving dashboard data
///
/// Provides a small JSON API the browser front end draws its charts from.
/// Every data route accepts the same filter query parameters and
/// recomputes its answer from the immutable dataset on each request.
///
/// Endpoints:
/// - GET /health          - Service health check
/// - GET /counties        - County registry
/// - GET /events          - Filtered, classified events
/// - GET /summary         - Headline metrics
/// - GET /trends          - Mann-Kendall results on annual series
/// - GET /return-periods  - Weibull return levels of annual peak damage
/// - GET /dashboard       - Everything above in one response
/// - GET /export.csv      - CSV snapshot of the filtered view
/// - GET /export.json     - JSON snapshot of the filtered view
///
/// Filter parameters: `county`, `severity`, `from_year`, `to_year`,
/// `from`, `to` (YYYY-MM-DD). Dates take precedence over years.

use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::analysis::filter::EventFilter;
use crate::counties::COUNTY_REGISTRY;
use crate::dashboard::Dashboard;
use crate::export::{default_file_name, render, ExportFormat};

// ---------------------------------------------------------------------------
// Response type
// ---------------------------------------------------------------------------

/// Transport-independent response, converted to a tiny_http response by
/// the server loop.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Suggested download name for export routes.
    pub attachment: Option<String>,
}

impl EndpointResponse {
    fn json(status: u16, value: serde_json::Value) -> Self {
        let body = serde_json::to_string_pretty(&value)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {}\"}}", e));
        Self {
            status,
            content_type: "application/json",
            body,
            attachment: None,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Splits `/path?query` into the path and decoded key/value pairs.
fn split_url(url: &str) -> (&str, Vec<(String, String)>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect();
    (path, params)
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// Builds an `EventFilter` from query parameters.
///
/// "All Counties" / "All Severities" (the selector defaults) and empty
/// values mean no restriction.
pub fn parse_filter(params: &[(String, String)]) -> Result<EventFilter, String> {
    let mut filter = EventFilter::all();
    let mut from_year: Option<i32> = None;
    let mut to_year: Option<i32> = None;
    let mut from_date: Option<NaiveDate> = None;
    let mut to_date: Option<NaiveDate> = None;

    for (key, value) in params {
        let value = value.trim();
        if value.is_empty() || value.to_ascii_lowercase().starts_with("all ") {
            continue;
        }
        match key.as_str() {
            "county" => filter.county = Some(value.parse()?),
            "severity" => filter.severity = Some(value.parse()?),
            "from_year" => from_year = Some(parse_year(value)?),
            "to_year" => to_year = Some(parse_year(value)?),
            "from" => from_date = Some(parse_date(value)?),
            "to" => to_date = Some(parse_date(value)?),
            other => return Err(format!("unknown query parameter '{}'", other)),
        }
    }

    filter.from = from_date.or_else(|| from_year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)));
    filter.to = to_date.or_else(|| to_year.and_then(|y| NaiveDate::from_ymd_opt(y, 12, 31)));

    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(format!("empty date range: {} is after {}", from, to));
        }
    }

    Ok(filter)
}

/// Years must fit the calendar range `NaiveDate` can represent.
fn parse_year(value: &str) -> Result<i32, String> {
    let year: i32 = value
        .parse()
        .map_err(|_| format!("invalid year '{}'", value))?;
    match (NaiveDate::from_ymd_opt(year, 1, 1), NaiveDate::from_ymd_opt(year, 12, 31)) {
        (Some(_), Some(_)) => Ok(year),
        _ => Err(format!("year out of range: {}", year)),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| format!("invalid date '{}'", value))
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one GET request.
pub fn handle_request(dashboard: &Dashboard, url: &str) -> EndpointResponse {
    let (path, params) = split_url(url);

    match path {
        "/health" => return handle_health(dashboard),
        "/counties" => return EndpointResponse::json(200, json!(COUNTY_REGISTRY)),
        _ => {}
    }

    let filter = match parse_filter(&params) {
        Ok(filter) => filter,
        Err(e) => return EndpointResponse::error(400, e),
    };

    match path {
        "/events" => {
            let events = dashboard.select(&filter);
            EndpointResponse::json(200, json!({ "count": events.len(), "events": events }))
        }
        "/summary" => {
            let view = dashboard.view(&filter);
            EndpointResponse::json(200, json!(view.summary))
        }
        "/trends" => {
            let view = dashboard.view(&filter);
            EndpointResponse::json(200, json!({ "annual": view.annual, "trends": view.trends }))
        }
        "/return-periods" => {
            let view = dashboard.view(&filter);
            EndpointResponse::json(200, json!(view.return_periods))
        }
        "/dashboard" => EndpointResponse::json(200, json!(dashboard.view(&filter))),
        "/export.csv" => handle_export(dashboard, &filter, ExportFormat::Csv),
        "/export.json" => handle_export(dashboard, &filter, ExportFormat::Json),
        _ => EndpointResponse::json(
            404,
            json!({
                "error": "Not found",
                "available_endpoints": [
                    "/health", "/counties", "/events", "/summary", "/trends",
                    "/return-periods", "/dashboard", "/export.csv", "/export.json"
                ]
            }),
        ),
    }
}

/// Handle /health endpoint
fn handle_health(dashboard: &Dashboard) -> EndpointResponse {
    EndpointResponse::json(
        200,
        json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "events_loaded": dashboard.events().len(),
            "records_rejected": dashboard.rejected().len(),
        }),
    )
}

fn handle_export(dashboard: &Dashboard, filter: &EventFilter, format: ExportFormat) -> EndpointResponse {
    let events = dashboard.select(filter);
    match render(&events, format) {
        Ok(body) => EndpointResponse {
            status: 200,
            content_type: format.mime_type(),
            body,
            attachment: Some(default_file_name(format, Local::now().date_naive())),
        },
        Err(e) => EndpointResponse::error(500, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server; requests are served one at a time.
pub fn start_endpoint_server(dashboard: &Dashboard) -> Result<(), String> {
    let endpoint = &dashboard.config().endpoint;
    let addr = format!("{}:{}", endpoint.bind_address, endpoint.port);
    let server = tiny_http::Server::http(&addr)
        .map_err(|e| format!("Failed to start HTTP server on {}: {}", addr, e))?;

    println!("📡 HTTP endpoint listening on http://{}", addr);
    println!("   GET /dashboard?county=Tulsa&from_year=2015&to_year=2025");
    println!("   GET /export.csv | /export.json - Download filtered records");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let response = if *request.method() == tiny_http::Method::Get {
            handle_request(dashboard, request.url())
        } else {
            EndpointResponse::error(405, "Only GET is supported")
        };
        log::debug!("{} {} -> {}", request.method(), request.url(), response.status);

        if let Err(e) = request.respond(to_http_response(response)) {
            log::warn!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with the routed body and headers
fn to_http_response(response: EndpointResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut http = tiny_http::Response::from_data(response.body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(response.status));

    if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Type"[..], response.content_type.as_bytes()) {
        http = http.with_header(header);
    }
    if let Some(name) = response.attachment {
        let value = format!("attachment; filename=\"{}\"", name);
        if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Disposition"[..], value.as_bytes()) {
            http = http.with_header(header);
        }
    }
    http
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
