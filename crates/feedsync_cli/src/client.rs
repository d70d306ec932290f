//! Blocking `reqwest` implementation of the engine's HTTP client.

use feedsync_engine::{FormValue, HttpBody, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// HTTP client backed by `reqwest::blocking`.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn build(&self, request: HttpRequest) -> Result<reqwest::blocking::RequestBuilder, String> {
        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let builder = match request.body {
            HttpBody::Json(bytes) => builder.header(CONTENT_TYPE, "application/json").body(bytes),
            HttpBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    form = match part.value {
                        FormValue::Text(text) => form.text(part.name, text),
                        FormValue::File(file) => {
                            let file_part = Part::bytes(file.bytes)
                                .file_name(file.file_name)
                                .mime_str(&file.content_type)
                                .map_err(|e| e.to_string())?;
                            form.part(part.name, file_part)
                        }
                    };
                }
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let response = self.build(request)?.send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| e.to_string())?.to_vec();
        Ok(HttpResponse { status, body })
    }

    fn is_healthy(&self) -> bool {
        true
    }
}
