use std::fs::File;

use regex::Captures;

use super::{cap, strip_quotes};
use crate::context::ExecutionContext;
use crate::value::RuntimeError;

const BODY_PREVIEW_LIMIT: usize = 500;

fn request_error(err: ureq::Error) -> RuntimeError {
    match err {
        ureq::Error::Status(code, response) => RuntimeError::new(format!(
            "HTTP Error {}: {}",
            code,
            response.status_text()
        )),
        ureq::Error::Transport(transport) => {
            RuntimeError::new(format!("URL Error: {}", transport))
        }
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() > BODY_PREVIEW_LIMIT {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < BODY_PREVIEW_LIMIT)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

impl ExecutionContext {
    fn emit_body(&mut self, content_type: &str, body: &str) {
        let looks_like_json =
            content_type.contains("application/json") || body.trim_start().starts_with('{');
        if looks_like_json {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
                let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string());
                self.emit("Response (JSON):");
                self.emit(truncate_body(&pretty));
                return;
            }
        }
        self.emit("Response (text):");
        self.emit(truncate_body(body));
    }

    pub(crate) fn http_get(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let url = cap(caps, 1).to_string();
        self.emit(format!("Making GET request to: {}", url));

        let response = self.http_agent.get(&url).call().map_err(request_error)?;
        let status = response.status();
        let content_type = response
            .header("Content-Type")
            .unwrap_or("unknown")
            .to_string();
        let body = response
            .into_string()
            .map_err(|e| RuntimeError::new(format!("Failed to read response: {}", e)))?;

        self.emit(format!("Status: {}", status));
        self.emit(format!("Content-Type: {}", content_type));
        self.emit(format!("Response length: {} characters", body.chars().count()));
        self.emit_body(&content_type, &body);
        Ok(format!("http_get(\"{}\")", url))
    }

    pub(crate) fn http_post(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let url = cap(caps, 1).to_string();
        let data_str = cap(caps, 2);

        // Form data arrives as "key=value, key=value".
        let mut form: Vec<(String, String)> = Vec::new();
        for pair in data_str.split(',') {
            if let Some((key, value)) = pair.split_once('=') {
                form.push((key.trim().to_string(), strip_quotes(value).to_string()));
            }
        }

        self.emit(format!("Making POST request to: {}", url));
        let shown: Vec<String> = form.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        self.emit(format!("Data: {{{}}}", shown.join(", ")));

        let pairs: Vec<(&str, &str)> = form
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let response = self
            .http_agent
            .post(&url)
            .send_form(&pairs)
            .map_err(request_error)?;
        let status = response.status();
        let content_type = response
            .header("Content-Type")
            .unwrap_or("unknown")
            .to_string();
        let body = response
            .into_string()
            .map_err(|e| RuntimeError::new(format!("Failed to read response: {}", e)))?;

        self.emit(format!("Status: {}", status));
        self.emit(format!("Content-Type: {}", content_type));
        self.emit_body(&content_type, &body);
        Ok(format!("http_post(\"{}\")", url))
    }

    pub(crate) fn download_file(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let url = cap(caps, 1).to_string();
        let filename = cap(caps, 2).to_string();

        self.emit(format!("Downloading from: {}", url));
        self.emit(format!("Saving to: {}", filename));

        let response = self.http_agent.get(&url).call().map_err(request_error)?;
        let mut reader = response.into_reader();
        let mut file = File::create(&filename)
            .map_err(|e| RuntimeError::new(format!("Failed to create '{}': {}", filename, e)))?;
        let bytes = std::io::copy(&mut reader, &mut file)
            .map_err(|e| RuntimeError::new(format!("Download failed: {}", e)))?;

        self.emit("Download completed successfully!");
        self.emit(format!("File size: {} bytes", bytes));
        Ok(format!("download(\"{}\", \"{}\")", url, filename))
    }

    pub(crate) fn check_url(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let url = cap(caps, 1).to_string();
        self.emit(format!("Checking URL: {}", url));

        match self.http_agent.get(&url).call() {
            Ok(response) => {
                let status = response.status();
                if status == 200 {
                    self.emit(format!("URL is accessible (Status: {})", status));
                } else {
                    self.emit(format!("URL responded with status: {}", status));
                }
                Ok(format!("http_check(\"{}\")", url))
            }
            Err(err) => {
                Err(RuntimeError::new(format!("URL not accessible - {}", request_error(err).message)))
            }
        }
    }

    pub(crate) fn get_url_status(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let url = cap(caps, 1).to_string();
        self.emit(format!("Getting status of: {}", url));

        let response = self.http_agent.get(&url).call().map_err(request_error)?;
        self.emit(format!("Status Code: {}", response.status()));
        self.emit(format!(
            "Content-Type: {}",
            response.header("Content-Type").unwrap_or("unknown")
        ));
        self.emit(format!(
            "Content-Length: {}",
            response.header("Content-Length").unwrap_or("unknown")
        ));
        self.emit(format!(
            "Server: {}",
            response.header("Server").unwrap_or("unknown")
        ));
        Ok(format!("http_status(\"{}\")", url))
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_body;

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(600);
        let shown = truncate_body(&body);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.len(), 503);
        assert_eq!(truncate_body("short"), "short");
    }
}
