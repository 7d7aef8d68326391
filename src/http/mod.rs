//! Collector client
//!
//! Fetches the raw capture list. The access key is passed through as a single
//! header and never inspected.

use crate::config::{Config, Source};
use crate::error::{CrumbsError, Result};
use crate::record::{parse_records, RawRecord};
use crate::utils::UrlUtils;
use reqwest::{Client, ClientBuilder};
use url::Url;

/// HTTP client for the capture collector
pub struct CollectorClient {
    client: Client,
    endpoint: Url,
    config: Config,
}

impl CollectorClient {
    /// Create a client for the remote source in `config`
    pub fn new(config: Config) -> Result<Self> {
        let endpoint = match &config.source.source {
            Some(Source::Remote(url)) => UrlUtils::validate_url(url)?,
            _ => {
                return Err(CrumbsError::Config(
                    "No collector URL configured".to_string(),
                ))
            }
        };

        let mut builder = ClientBuilder::new()
            .timeout(config.source.timeout)
            .connect_timeout(config.source.connect_timeout);

        if !config.source.verify_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(CrumbsError::Http)?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and decode the capture list
    pub async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        let source = &self.config.source;
        let mut request = self.client.get(self.endpoint.clone());

        if let Some(key) = &source.key {
            request = request.header(source.key_header.as_str(), key);
        }

        if let Some(user_agent) = &source.user_agent {
            request = request.header("User-Agent", user_agent);
        }

        let request = request.build().map_err(CrumbsError::Http)?;

        if self.config.output.verbose && !self.config.output.silent {
            write_verbose_request_headers(&request, &source.key_header);
        }

        let response = self
            .client
            .execute(request)
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Collector {} answered {}", self.endpoint, status);
            return Err(CrumbsError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let records = parse_records(&body)?;
        log::info!(
            "Fetched {} captures from {}",
            records.len(),
            self.endpoint
        );
        Ok(records)
    }
}

fn transport_error(err: reqwest::Error) -> CrumbsError {
    if err.is_timeout() {
        CrumbsError::Timeout
    } else {
        CrumbsError::Http(err)
    }
}

fn write_verbose_request_headers(request: &reqwest::Request, key_header: &str) {
    let url = request.url();
    eprintln!("> {} {}", request.method(), request_path(url));

    if let Some(host) = url.host_str() {
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        eprintln!("> Host: {}", host);
    }

    for (name, value) in request.headers().iter() {
        if name.as_str().eq_ignore_ascii_case(key_header) {
            eprintln!("> {}: <redacted>", name);
            continue;
        }
        let value = value.to_str().unwrap_or("<non-utf8>");
        eprintln!("> {}: {}", name, value);
    }
    eprintln!(">");
}

fn request_path(url: &Url) -> String {
    match url[url::Position::BeforePath..].trim() {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}
