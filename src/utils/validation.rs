/// Characters allowed to survive in a stored filename, besides ASCII alphanumerics
const ALLOWED_PUNCTUATION: &[char] = &['.', '_', '-'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Strips any directory components, accepting both `/` and `\` as separators.
pub fn base_name(filename: &str) -> &str {
    filename
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
}

/// Sanitizes filename to prevent path traversal and injection attacks.
///
/// Directory components are removed first, then every character outside
/// `[A-Za-z0-9._-]` is dropped. A result that is empty, `.` or `..` cannot
/// name a file inside the storage directory and is rejected.
pub fn sanitize_filename(filename: &str) -> Result<String, ValidationError> {
    let name = base_name(filename);

    if name.len() != filename.len() {
        tracing::warn!("Path components stripped from upload name: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(c))
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return Err(ValidationError {
            code: "INVALID_FILENAME",
            message: format!("Filename '{}' has no usable characters", filename),
        });
    }

    Ok(sanitized)
}

/// Splits a filename into stem and extension at the last dot.
pub fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (filename, None),
    }
}

/// Name used when `filename` already exists: `{stem}_{timestamp}.{ext}`.
pub fn disambiguate_filename(filename: &str, unix_timestamp: i64) -> String {
    match split_extension(filename) {
        (stem, Some(ext)) => format!("{}_{}.{}", stem, unix_timestamp, ext),
        (stem, None) => format!("{}_{}", stem, unix_timestamp),
    }
}
