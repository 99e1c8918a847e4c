//! Mock server infrastructure for recording and replaying catalog traffic.
//!
//! In record mode requests are proxied to the real service and the
//! exchanges are written to a file when the client is dropped.
//! In replay mode a previously written file is served instead.

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use httpmock::{MockServer, RecordingID};
use tracing::{debug, warn};

use crate::config::{CatalogClientConfig, CatalogMockMode};

/// Guard to keep a `MockServer` running until the `CatalogClient` is dropped.
#[allow(dead_code)] // https://github.com/rust-lang/rust/issues/122833
pub(crate) enum MockGuard {
    Record(MockRecorder),
    Replay(MockServer),
}

impl MockGuard {
    pub(crate) fn new(config: &CatalogClientConfig) -> Option<Self> {
        match &config.mock_mode {
            CatalogMockMode::None => None,
            CatalogMockMode::Record(path) => {
                let server = MockServer::start();
                let recording = start_recording(&server, &config.service_url);

                debug!(?path, server = server.base_url(), "mock server recording");
                Some(MockGuard::Record(MockRecorder {
                    path: path.to_path_buf(),
                    server,
                    recording,
                }))
            },
            CatalogMockMode::Replay(path) => {
                let server = MockServer::start();
                server.playback(path);
                debug!(?path, server = server.base_url(), "mock server replaying");

                Some(MockGuard::Replay(server))
            },
        }
    }

    pub(crate) fn url(&self) -> String {
        match self {
            MockGuard::Record(recorder) => recorder.server.base_url().to_string(),
            MockGuard::Replay(server) => server.base_url().to_string(),
        }
    }
}

fn start_recording(server: &MockServer, service_url: &str) -> RecordingID {
    server.forward_to(service_url, |rule| {
        rule.filter(|when| {
            when.any_request();
        });
    });
    server.record(|rule| {
        rule.filter(|when| {
            when.any_request();
        });
    })
}

impl Debug for MockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let url = self.url();
        let mode = match self {
            MockGuard::Record(_) => "MockGuard::Record",
            MockGuard::Replay(_) => "MockGuard::Replay",
        };
        write!(f, "{mode} url={url}")
    }
}

/// In addition to keeping a `MockServer` running, also write any recorded
/// requests to a file when dropped.
pub(crate) struct MockRecorder {
    pub(crate) path: PathBuf,
    pub(crate) server: MockServer,
    pub(crate) recording: RecordingID,
}

impl MockRecorder {
    fn save(&self) -> Result<(), String> {
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| format!("recording path {} has no file name", self.path.display()))?;

        // `record_save` appends a timestamp, so we rename after write.
        // The file name keeps parallel recorders from racing each other.
        let tempfile = self
            .server
            .record_save(&self.recording, format!("httpmock_{file_name}"))
            .map_err(|e| format!("failed to save mock recording: {e}"))?;
        debug!(
            src = %tempfile.as_path().display(),
            dest = %self.path.as_path().display(),
            "renaming recorded mock file"
        );
        fs::rename(&tempfile, &self.path)
            .map_err(|e| format!("failed to rename recorded mock file: {e}"))
    }
}

impl Drop for MockRecorder {
    fn drop(&mut self) {
        match self.save() {
            Ok(()) => debug!(path = ?self.path, "saved mock recording"),
            Err(err) => warn!(path = ?self.path, "{err}"),
        }
    }
}
