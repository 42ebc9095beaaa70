use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeadReport {
    pub(crate) status: u16,
    pub(crate) content_type: Option<String>,
    pub(crate) content_length: Option<u64>,
}

impl HeadReport {
    pub(crate) fn is_audio(&self) -> bool {
        match self.content_type.as_deref() {
            Some(kind) => {
                let kind = kind.trim().to_ascii_lowercase();
                kind.starts_with("audio/") || kind == "application/octet-stream"
            }
            None => true,
        }
    }
}

fn should_retry_http_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

pub(crate) fn head_with_retries(
    url: &str,
    connect_timeout: Duration,
    read_timeout: Duration,
    attempts: usize,
    retry_delay: Duration,
) -> Result<HeadReport, String> {
    let attempts = attempts.max(1);

    for attempt in 1..=attempts {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .timeout_write(read_timeout)
            .build();

        match agent.head(url).call() {
            Ok(response) => {
                return Ok(HeadReport {
                    status: response.status(),
                    content_type: response.header("Content-Type").map(str::to_string),
                    content_length: response
                        .header("Content-Length")
                        .and_then(|value| value.trim().parse::<u64>().ok()),
                });
            }
            Err(ureq::Error::Status(status, _)) => {
                let status_error = format!("HTTP status {status}");

                if should_retry_http_status(status) && attempt < attempts {
                    tracing::debug!(url, status, attempt, "retrying audio probe");
                    thread::sleep(retry_delay);
                    continue;
                }

                if should_retry_http_status(status) {
                    return Err(format!(
                        "request failed after {attempts} attempt(s): {status_error}"
                    ));
                }

                return Err(format!("request failed: {status_error}"));
            }
            Err(ureq::Error::Transport(err)) => {
                let transport_error = format!("transport error: {err}");
                if attempt < attempts {
                    tracing::debug!(url, attempt, error = %err, "retrying audio probe");
                    thread::sleep(retry_delay);
                    continue;
                }
                return Err(format!(
                    "request failed after {attempts} attempt(s): {transport_error}"
                ));
            }
        }
    }

    Err("request failed: exhausted attempts without a concrete error".to_string())
}
