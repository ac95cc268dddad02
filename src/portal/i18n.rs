use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

pub const BASE_LANGUAGE: Language = Language::En;

const EN: &[(&str, &str)] = &[
    ("logo", "Kakomon Portal"),
    ("upload_btn", "+ Upload New"),
    ("hero_title", "Find Past Tests"),
    ("hero_desc", "Access the collection of past exams and practice materials."),
    ("search_placeholder", "Search for subjects, years, or professors..."),
    ("upload_title", "Upload File"),
    ("upload_desc", "Share your past exams with others."),
    ("upload_area", "Click to browse or drag file here"),
    ("upload_note", "Supported: PDF, Images, ZIP"),
    ("uploading", "Uploading..."),
    ("upload_success", "Uploaded!"),
    ("upload_error", "Error uploading"),
    ("loading", "Loading files..."),
    ("load_failed", "Failed to load files"),
    ("no_files", "No files found"),
    ("language", "Language"),
];

const JA: &[(&str, &str)] = &[
    ("logo", "過去問ポータル"),
    ("upload_btn", "+ 新規アップロード"),
    ("hero_title", "過去問を探す"),
    ("hero_desc", "過去の試験問題や演習資料を閲覧できます。"),
    ("search_placeholder", "科目名・年度・教員名で検索..."),
    ("upload_title", "ファイルをアップロード"),
    ("upload_desc", "過去問をみんなと共有しましょう。"),
    ("upload_area", "クリックして選択、またはここにドラッグ"),
    ("upload_note", "対応形式: PDF、画像、ZIP"),
    ("uploading", "アップロード中..."),
    ("upload_success", "アップロードしました！"),
    ("upload_error", "アップロードに失敗しました"),
    ("loading", "読み込み中..."),
    ("load_failed", "ファイルの読み込みに失敗しました"),
    ("no_files", "ファイルが見つかりません"),
    ("language", "言語"),
];

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Name of the language in that language, for the switcher.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "日本語",
        }
    }

    /// Resolves a two-letter code or a full locale tag such as `ja-JP`.
    pub fn from_code(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == primary)
    }

    /// Picks the best supported language from an `Accept-Language` header.
    pub fn negotiate(accept_language: &str) -> Option<Self> {
        let mut ranges: Vec<(&str, f32)> = accept_language
            .split(',')
            .filter_map(|range| {
                let mut parts = range.split(';');
                let tag = parts.next()?.trim();
                let quality = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                    .unwrap_or(1.0);
                (!tag.is_empty() && tag != "*" && quality > 0.0).then_some((tag, quality))
            })
            .collect();

        // Stable sort keeps header order among equal weights.
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranges.into_iter().find_map(|(tag, _)| Self::from_code(tag))
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::En => EN,
            Language::Ja => JA,
        }
    }

    /// Looks `key` up in this language, falling back to the base language.
    pub fn translate(self, key: &str) -> Option<&'static str> {
        let lookup = |table: &'static [(&'static str, &'static str)]| {
            table.iter().find(|(k, _)| *k == key).map(|(_, text)| *text)
        };
        lookup(self.table()).or_else(|| lookup(BASE_LANGUAGE.table()))
    }

    /// The complete string table, with base-language entries filling any gaps.
    pub fn strings(self) -> BTreeMap<&'static str, &'static str> {
        let mut strings: BTreeMap<_, _> = BASE_LANGUAGE.table().iter().copied().collect();
        strings.extend(self.table().iter().copied());
        strings
    }
}
