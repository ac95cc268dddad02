use crate::models::FileDescriptor;
use crate::portal::icon::FileKind;
use crate::portal::i18n::Language;
use crate::portal::state::{LoadStatus, PortalState};
use askama::Template;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Public prefix under which stored files are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub href: String,
    pub kind: &'static str,
    pub glyph: &'static str,
    pub date: String,
    pub size: String,
}

impl Card {
    pub fn from_descriptor(file: &FileDescriptor) -> Self {
        let kind = FileKind::classify(&file.name);
        Self {
            name: file.name.clone(),
            href: download_href(&file.name),
            kind: kind.as_str(),
            glyph: kind.glyph(),
            date: file.date(),
            size: human_size(file.size),
        }
    }
}

/// What the file grid shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grid {
    Cards(Vec<Card>),
    /// Translation key of the message shown instead of cards.
    Placeholder(&'static str),
}

pub fn grid(state: &PortalState) -> Grid {
    match state.status() {
        LoadStatus::Loading => Grid::Placeholder("loading"),
        LoadStatus::Failed => Grid::Placeholder("load_failed"),
        LoadStatus::Ready => {
            let cards: Vec<Card> = state
                .visible()
                .into_iter()
                .map(Card::from_descriptor)
                .collect();
            if cards.is_empty() {
                Grid::Placeholder("no_files")
            } else {
                Grid::Cards(cards)
            }
        }
    }
}

pub fn download_href(name: &str) -> String {
    format!("{}/{}", UPLOADS_PREFIX, utf8_percent_encode(name, PATH_SEGMENT))
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

pub struct LanguageOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub lang: &'static str,
    pub language: Language,
    pub languages: Vec<LanguageOption>,
    pub query: String,
    pub cards: Vec<Card>,
    pub placeholder: Option<&'static str>,
}

impl IndexPage {
    pub fn new(state: &PortalState) -> Self {
        let language = state.language();
        let (cards, placeholder) = match grid(state) {
            Grid::Cards(cards) => (cards, None),
            Grid::Placeholder(key) => (Vec::new(), Some(key)),
        };

        Self {
            lang: language.code(),
            language,
            languages: Language::ALL
                .into_iter()
                .map(|l| LanguageOption {
                    code: l.code(),
                    label: l.native_name(),
                    selected: l == language,
                })
                .collect(),
            query: state.query().to_string(),
            cards,
            placeholder,
        }
    }

    fn t(&self, key: &str) -> &'static str {
        self.language.translate(key).unwrap_or_default()
    }
}

pub fn render_page(state: &PortalState) -> askama::Result<String> {
    IndexPage::new(state).render()
}
