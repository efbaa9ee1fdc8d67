use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::{debug, info};
use wingetup_core::{DownloadTask, FetchError, Fetcher};
use wingetup_security::{sha256_matches, StreamingSha256};

const CHUNK_SIZE: usize = 64 * 1024;

pub struct HttpFetcher {
    client: Client,
    expected_sha256: Option<String>,
}

impl HttpFetcher {
    pub fn new(expected_sha256: Option<String>) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(format!("wingetup/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(None)
            .build()?;
        Ok(Self {
            client,
            expected_sha256,
        })
    }
}

impl HttpFetcher {
    fn write_body(
        &self,
        response: Response,
        task: &mut DownloadTask,
        destination: &Path,
        url: &str,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<(), FetchError> {
        let mut file = create_destination(destination)?;
        let mut hasher = self.expected_sha256.as_ref().map(|_| StreamingSha256::new());
        stream_body(response, &mut file, destination, url, |chunk| {
            if let Some(hasher) = hasher.as_mut() {
                hasher.update(chunk);
            }
            task.record_chunk(chunk.len() as u64);
            on_progress(task.bytes_transferred, task.bytes_total);
        })?;

        if let (Some(expected), Some(hasher)) = (&self.expected_sha256, hasher) {
            let actual = hasher.finish_hex();
            if !sha256_matches(expected, &actual) {
                return Err(FetchError::ChecksumMismatch {
                    path: task.destination_path.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
            debug!(sha256 = %actual, "artifact checksum verified");
        }
        Ok(())
    }
}

impl Fetcher for HttpFetcher {
    fn download(
        &self,
        task: &mut DownloadTask,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<(), FetchError> {
        let url = task.source_url.clone();
        info!(url = %url, destination = %task.destination_path.display(), "downloading artifact");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| network_error(&url, &err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url,
                code: status.as_u16(),
            });
        }

        task.set_total(response.content_length());
        debug!(total = ?task.bytes_total, "response accepted");
        on_progress(task.bytes_transferred, task.bytes_total);

        // A failed transfer leaves the partial file in place for inspection.
        let destination = task.destination_path.clone();
        self.write_body(response, task, &destination, &url, on_progress)?;

        info!(bytes = task.bytes_transferred, "download finished");
        Ok(())
    }
}

fn create_destination(path: &Path) -> Result<File, FetchError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| write_error(path, source))?;
    }
    File::create(path).map_err(|source| write_error(path, source))
}

fn stream_body<R, W, OnChunk>(
    mut body: R,
    out: &mut W,
    destination: &Path,
    url: &str,
    mut on_chunk: OnChunk,
) -> Result<(), FetchError>
where
    R: Read,
    W: Write,
    OnChunk: FnMut(&[u8]),
{
    let mut buffer = vec![0_u8; CHUNK_SIZE];
    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(FetchError::NetworkUnreachable {
                    url: url.to_string(),
                    reason: format!("transfer interrupted: {err}"),
                })
            }
        };
        out.write_all(&buffer[..read])
            .map_err(|source| write_error(destination, source))?;
        on_chunk(&buffer[..read]);
    }
    out.flush().map_err(|source| write_error(destination, source))
}

fn network_error(url: &str, err: &reqwest::Error) -> FetchError {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    FetchError::NetworkUnreachable {
        url: url.to_string(),
        reason,
    }
}

fn write_error(path: &Path, source: io::Error) -> FetchError {
    FetchError::WriteError {
        path: path.to_path_buf(),
        source,
    }
}
