use crate::models::FileDescriptor;
use crate::portal::i18n::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

/// Something the page learned while being assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalEvent {
    ListingLoaded(Vec<FileDescriptor>),
    ListingFailed,
    QueryChanged(String),
}

/// Everything the renderer needs: the last fetched listing, the search
/// query, the active language and whether the listing is usable.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalState {
    files: Vec<FileDescriptor>,
    query: String,
    language: Language,
    status: LoadStatus,
}

impl PortalState {
    pub fn new(language: Language) -> Self {
        Self {
            files: Vec::new(),
            query: String::new(),
            language,
            status: LoadStatus::Loading,
        }
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn apply(mut self, event: PortalEvent) -> Self {
        match event {
            PortalEvent::ListingLoaded(files) => {
                self.files = files;
                self.status = LoadStatus::Ready;
            }
            PortalEvent::ListingFailed => self.status = LoadStatus::Failed,
            PortalEvent::QueryChanged(query) => self.query = query,
        }
        self
    }

    /// Files matching the current query, case-insensitively, in listing order.
    pub fn visible(&self) -> Vec<&FileDescriptor> {
        let needle = self.query.trim().to_lowercase();
        self.files
            .iter()
            .filter(|file| needle.is_empty() || file.name.to_lowercase().contains(&needle))
            .collect()
    }
}
