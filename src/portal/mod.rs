//! First paint of the portal page: the listing state with search filtering,
//! file-type glyphs and the language tables. The tables are also published
//! for the browser script, which takes over after the first paint.

pub mod i18n;
pub mod icon;
pub mod render;
pub mod state;
