use crate::error::TransportError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Blocking request/response exchange with a remote provider.
///
/// Implementations return the raw response body whatever the HTTP status is;
/// deciding what the body means is the caller's job.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&'static str, String)],
    ) -> Result<Vec<u8>, TransportError>;
}

pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&'static str, String)],
    ) -> Result<Vec<u8>, TransportError> {
        debug!(target = "transport", url = %url, bytes = body.len(), "POST");

        let mut req = self.http.post(url).body(body);
        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }

        let resp = req.send().map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        debug!(target = "transport", %status, bytes = bytes.len(), "response received");

        Ok(bytes.to_vec())
    }
}
