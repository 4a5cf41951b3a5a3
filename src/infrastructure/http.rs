//! HTTP transport backed by a blocking `ureq` agent

use std::io;
use std::time::Duration;

use tracing::{debug, instrument};
use ureq::Agent;

use crate::infrastructure::traits::{ApiRequest, ApiResponse, HttpTransport, Method, RequestBody};

/// Boundary marker for multipart bodies.
const MULTIPART_BOUNDARY: &str = "blokctl-boundary-5d1b7f3a9c2e";

/// Real transport. One agent per process, requests are sent one at a time.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl HttpTransport for UreqTransport {
    #[instrument(level = "debug", skip_all, fields(method = ?request.method, url = %request.url))]
    fn send(&self, request: &ApiRequest) -> io::Result<ApiResponse> {
        let response = match request.method {
            Method::Get => {
                let mut builder = self.agent.get(&request.url);
                for (k, v) in &request.query {
                    builder = builder.query(k, v);
                }
                for (k, v) in &request.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = self.agent.post(&request.url);
                for (k, v) in &request.query {
                    builder = builder.query(k, v);
                }
                for (k, v) in &request.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                match &request.body {
                    RequestBody::Empty => builder.send_empty(),
                    RequestBody::Json(value) => builder.send_json(value),
                    RequestBody::Multipart { .. } => {
                        let (content_type, body) = encode_multipart(&request.body)
                            .ok_or_else(|| io::Error::other("multipart body expected"))?;
                        builder
                            .header("Content-Type", content_type.as_str())
                            .send(&body[..])
                    }
                }
            }
        }
        .map_err(io::Error::other)?;

        let status = response.status();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(io::Error::other)?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// Encode a single-file multipart form. Returns `(content type, body)`, or
/// `None` when the body is not multipart.
pub fn encode_multipart(body: &RequestBody) -> Option<(String, Vec<u8>)> {
    let RequestBody::Multipart {
        field,
        filename,
        content_type,
        bytes,
    } = body
    else {
        return None;
    };

    let mut out = Vec::with_capacity(bytes.len() + 256);
    out.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{}\"\r\nContent-Type: {content_type}\r\n\r\n",
            filename.replace('"', "%22")
        )
        .as_bytes(),
    );
    out.extend_from_slice(bytes);
    out.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Some((
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        out,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_file_part_when_encoding_then_wraps_bytes_in_boundaries() {
        let body = RequestBody::Multipart {
            field: "file".into(),
            filename: "cat.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: b"JPEGDATA".to_vec(),
        };

        let (content_type, encoded) = encode_multipart(&body).unwrap();
        let text = String::from_utf8(encoded).unwrap();

        assert_eq!(
            content_type,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
        );
        assert!(text.starts_with(&format!("--{MULTIPART_BOUNDARY}\r\n")));
        assert!(text.contains("name=\"file\"; filename=\"cat.jpg\""));
        assert!(text.contains("Content-Type: image/jpeg\r\n\r\nJPEGDATA\r\n"));
        assert!(text.ends_with(&format!("--{MULTIPART_BOUNDARY}--\r\n")));
    }

    #[test]
    fn given_json_body_when_encoding_multipart_then_none() {
        assert!(encode_multipart(&RequestBody::Empty).is_none());
    }
}
