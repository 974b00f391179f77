use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

pub struct FetchResult {
    pub url: String,           // final URL after redirects
    pub requested_url: String, // what we asked for
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
    pub duration_ms: u128,
}

#[derive(Debug, Error)]
pub enum NetError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Blocking GET. Implementations are called from worker threads.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<FetchResult, NetError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .user_agent("formkit/0.1")
            .build();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<FetchResult, NetError> {
        let start = Instant::now();
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(NetError::Status {
                    url: url.to_string(),
                    status,
                });
            }
            Err(err) => {
                return Err(NetError::Transport {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
        };
        let status = response.status();
        let final_url = response.get_url().to_string();
        let content_type = Some(response.content_type().to_string()).filter(|c| !c.is_empty());
        let body = response.into_string().map_err(|source| NetError::Body {
            url: url.to_string(),
            source,
        })?;
        log::debug!(target: "net", "GET {url} -> {status} ({} bytes)", body.len());
        Ok(FetchResult {
            url: final_url,
            requested_url: url.to_string(),
            status,
            content_type,
            body,
            duration_ms: start.elapsed().as_millis(),
        })
    }
}

/// Runs `job` on a worker thread and hands its output back through the
/// returned channel. A job whose `cancel` flag is raised before it starts is
/// skipped and the sender dropped; once started, its output is always sent
/// and the receiver decides whether it is still wanted.
pub fn spawn_job<T, F>(cancel: Arc<AtomicBool>, job: F) -> mpsc::Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if cancel.load(Ordering::Relaxed) {
            return;
        }
        let output = job();
        if tx.send(output).is_err() {
            log::trace!(target: "net", "job finished after its receiver was dropped");
        }
    });
    rx
}

/// Runs `transport.get(url)` on a worker thread; see [`spawn_job`].
pub fn spawn_fetch(
    transport: Arc<dyn Transport>,
    url: String,
    cancel: Arc<AtomicBool>,
) -> mpsc::Receiver<Result<FetchResult, NetError>> {
    spawn_job(cancel, move || transport.get(&url))
}

/// Appends `key=value` to `url`, joining with `?` or `&` as needed. The value
/// is form-urlencoded.
pub fn with_query_param(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    let key: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
    let value: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{url}{separator}{key}={value}")
}
