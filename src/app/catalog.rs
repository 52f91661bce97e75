use tracing::{info, warn};

use crate::app::gateway::CommandGateway;
use crate::domain::{CatalogSnapshot, DomainError, DownloadProgress};
use crate::domain::event::DownloadStart;
use crate::ports::RenderSurface;

/// Reconciles the backend's model catalog and download progress into a
/// re-renderable selection state.
///
/// A refresh replaces the rendered selector wholesale; the catalog is
/// small, so a full rebuild is correctness-preserving and cheap. At most
/// one download is modeled as in flight; a second start overwrites the
/// displayed progress of the first, which assumes the backend serializes
/// downloads.
pub struct CatalogSync {
    snapshot: CatalogSnapshot,
    download: Option<DownloadProgress>,
}

impl CatalogSync {
    pub fn new() -> Self {
        Self {
            snapshot: CatalogSnapshot::default(),
            download: None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn download(&self) -> Option<&DownloadProgress> {
        self.download.as_ref()
    }

    /// Fetch the full catalog snapshot and rebuild the selector.
    pub async fn refresh<S: RenderSurface>(&mut self, gateway: &CommandGateway, surface: &S) {
        match gateway.get_models_status().await {
            Ok(snapshot) => {
                if !snapshot.selection_is_valid() {
                    warn!(
                        selected = ?snapshot.selected_id,
                        "Selected model is not in the catalog; treating as no selection"
                    );
                }
                info!(models = snapshot.entries.len(), "Model catalog refreshed");
                surface.set_model_selector(&snapshot);
                self.snapshot = snapshot;
            }
            Err(err) => {
                warn!(error = %err, "Catalog refresh failed");
                surface.set_download_notice(&err.to_string());
            }
        }
    }

    /// `model-download-start` arrived.
    pub fn download_started<S: RenderSurface>(&mut self, start: DownloadStart, surface: &S) {
        let progress = DownloadProgress {
            id: start.id,
            received_bytes: 0,
            total_bytes: start.total_bytes,
        };
        surface.set_download_notice(&progress.label());
        self.download = Some(progress);
    }

    /// `model-download-progress` arrived.
    pub fn download_progressed<S: RenderSurface>(
        &mut self,
        progress: DownloadProgress,
        surface: &S,
    ) {
        if let Some(current) = &self.download {
            if current.id != progress.id {
                warn!(
                    was = %current.id,
                    now = %progress.id,
                    "Progress for a different download; displaying the newest"
                );
            }
        }
        surface.set_download_notice(&progress.label());
        self.download = Some(progress);
    }

    /// `model-download-complete` arrived: clear the progress line and pull
    /// a fresh snapshot so the newly installed entry shows up.
    pub async fn download_completed<S: RenderSurface>(
        &mut self,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        self.download = None;
        surface.set_download_notice("");
        self.refresh(gateway, surface).await;
    }

    /// `model-download-error` arrived: show the message verbatim.
    pub fn download_failed<S: RenderSurface>(&mut self, message: &str, surface: &S) {
        self.download = None;
        surface.set_download_notice(message);
    }

    /// User picked an entry in the selector.
    pub async fn select<S: RenderSurface>(
        &mut self,
        id: &str,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        if self.snapshot.get(id).is_none() {
            surface.set_download_notice(&DomainError::UnknownModel(id.to_string()).to_string());
            return;
        }
        match gateway.select_model(id).await {
            Ok(()) => self.refresh(gateway, surface).await,
            Err(err) => {
                warn!(model = id, error = %err, "Selecting model failed");
                surface.set_download_notice(&err.to_string());
            }
        }
    }

    /// User asked to download an entry.
    ///
    /// Unknown ids and already-installed entries are rejected before any
    /// command is issued.
    pub async fn request_download<S: RenderSurface>(
        &mut self,
        id: &str,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        let Some(entry) = self.snapshot.get(id) else {
            surface.set_download_notice(&DomainError::UnknownModel(id.to_string()).to_string());
            return;
        };
        if entry.installed {
            surface.set_download_notice(&DomainError::ModelInstalled(id.to_string()).to_string());
            return;
        }
        if let Err(err) = gateway.download_model(id).await {
            warn!(model = id, error = %err, "Download request failed");
            surface.set_download_notice(&err.to_string());
        }
    }
}

impl Default for CatalogSync {
    fn default() -> Self {
        Self::new()
    }
}
