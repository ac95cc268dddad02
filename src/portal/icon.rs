use crate::utils::validation::split_extension;

/// Decorative file category, picked from the extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Archive,
    Document,
}

impl FileKind {
    pub fn classify(filename: &str) -> Self {
        let ext = split_extension(filename).1.map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "svg" | "heic") => FileKind::Image,
            Some("pdf") => FileKind::Pdf,
            Some("zip" | "rar" | "7z" | "tar" | "gz" | "tgz" | "bz2" | "xz") => FileKind::Archive,
            _ => FileKind::Document,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            FileKind::Image => "🖼️",
            FileKind::Pdf => "📕",
            FileKind::Archive => "🗜️",
            FileKind::Document => "📄",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Archive => "archive",
            FileKind::Document => "document",
        }
    }
}
