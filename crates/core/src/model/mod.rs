//! Data shapes exchanged with the tag reader and the catalogue client.
//!
//! Both collaborators live outside this crate. A catalogue client hands over a
//! decoded [`Release`]; a tag reader hands over one [`FileTags`] record per
//! local file, collected in a [`TagSet`] in file order.

mod types;

pub use types::*;

/// Tag getters a local file record must expose for matching.
///
/// Missing tags are reported as the empty string.
pub trait FileTags {
    fn album(&self) -> &str;
    fn album_artist(&self) -> &str;
    fn label(&self) -> &str;
    fn catalogue_num(&self) -> &str;
    fn media_format(&self) -> &str;
    /// Track artist.
    fn artist(&self) -> &str;
    /// Track title.
    fn title(&self) -> &str;
}
