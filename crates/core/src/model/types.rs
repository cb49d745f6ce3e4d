//! Release, track and tag record types.

use serde::{Deserialize, Serialize};

use super::FileTags;

/// One entry of an artist credit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistCredit {
    /// MusicBrainz artist ID (MBID).
    #[serde(default)]
    pub id: String,
    /// Credited artist name.
    pub name: String,
    /// Phrase joining this artist to the next one (e.g. " & ", " feat. ").
    #[serde(default)]
    pub join_phrase: String,
}

impl ArtistCredit {
    /// Create a credit with no ID and no join phrase.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            join_phrase: String::new(),
        }
    }

    /// Set the join phrase.
    pub fn with_join_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.join_phrase = phrase.into();
        self
    }

    /// Set the MusicBrainz artist ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Flatten a credit list into its display string, e.g. "Sonny & Cher".
pub fn credit_string(credits: &[ArtistCredit]) -> String {
    credits
        .iter()
        .map(|c| format!("{}{}", c.name, c.join_phrase))
        .collect()
}

/// Release group of a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseGroup {
    /// Release group MBID.
    #[serde(default)]
    pub id: String,
    /// First release date of the group (YYYY-MM-DD or partial).
    #[serde(default)]
    pub first_release_date: String,
}

/// A track on a medium.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    /// Track position on its medium (1-indexed).
    pub position: u32,
    /// Track title.
    pub title: String,
    /// Recording MBID.
    #[serde(default)]
    pub id: String,
    /// Track artist credit.
    #[serde(default)]
    pub artists: Vec<ArtistCredit>,
}

/// A medium (disc, vinyl side set, digital media) of a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medium {
    /// Medium position within the release (1-indexed).
    #[serde(default)]
    pub position: u32,
    /// Media format, e.g. "CD" or "Digital Media".
    #[serde(default)]
    pub format: String,
    /// Tracks on this medium.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// A catalogue release (album) as decoded by a catalogue client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// Release MBID.
    #[serde(default)]
    pub id: String,
    /// Release title.
    pub title: String,
    /// Release artist credit.
    #[serde(default)]
    pub artists: Vec<ArtistCredit>,
    /// Label name.
    #[serde(default)]
    pub label: String,
    /// Label MBID.
    #[serde(default)]
    pub label_id: String,
    /// Catalogue number.
    #[serde(default)]
    pub catalogue_num: String,
    /// Release date (YYYY-MM-DD or partial).
    #[serde(default)]
    pub date: String,
    /// Disambiguation comment.
    #[serde(default)]
    pub disambiguation: String,
    #[serde(default)]
    pub release_group: ReleaseGroup,
    #[serde(default)]
    pub media: Vec<Medium>,
}

impl Release {
    /// All tracks of all media, in order.
    pub fn tracks(&self) -> Vec<&Track> {
        self.media.iter().flat_map(|m| m.tracks.iter()).collect()
    }

    /// Number of tracks across all media.
    pub fn track_count(&self) -> usize {
        self.media.iter().map(|m| m.tracks.len()).sum()
    }

    /// Format of the first medium, or "" without media.
    pub fn media_format(&self) -> &str {
        self.media.first().map(|m| m.format.as_str()).unwrap_or("")
    }

    /// Flattened release artist credit.
    pub fn artist_credit(&self) -> String {
        credit_string(&self.artists)
    }
}

/// Plain tag values read from one local file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagRecord {
    pub album: String,
    pub album_artist: String,
    pub label: String,
    pub catalogue_num: String,
    pub media_format: String,
    pub artist: String,
    pub title: String,
}

impl FileTags for TagRecord {
    fn album(&self) -> &str {
        &self.album
    }

    fn album_artist(&self) -> &str {
        &self.album_artist
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn catalogue_num(&self) -> &str {
        &self.catalogue_num
    }

    fn media_format(&self) -> &str {
        &self.media_format
    }

    fn artist(&self) -> &str {
        &self.artist
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Ordered snapshot of the tags of every file in a local directory.
///
/// Index `i` is compared against track `i` of the candidate release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TagSet<T = TagRecord> {
    files: Vec<T>,
}

impl<T> Default for TagSet<T> {
    fn default() -> Self {
        Self { files: Vec::new() }
    }
}

impl<T: FileTags> TagSet<T> {
    pub fn new(files: Vec<T>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.files.get(index)
    }

    /// The record release-level fields are read from.
    pub fn first(&self) -> Option<&T> {
        self.files.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.files.iter()
    }
}

impl<T: FileTags> From<Vec<T>> for TagSet<T> {
    fn from(files: Vec<T>) -> Self {
        Self::new(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_disc_release() -> Release {
        Release {
            title: "Double".to_string(),
            media: vec![
                Medium {
                    position: 1,
                    format: "CD".to_string(),
                    tracks: vec![
                        Track {
                            position: 1,
                            title: "One".to_string(),
                            ..Default::default()
                        },
                        Track {
                            position: 2,
                            title: "Two".to_string(),
                            ..Default::default()
                        },
                    ],
                },
                Medium {
                    position: 2,
                    format: "Vinyl".to_string(),
                    tracks: vec![Track {
                        position: 1,
                        title: "Three".to_string(),
                        ..Default::default()
                    }],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_credit_string_uses_join_phrases() {
        let credits = vec![
            ArtistCredit::named("Sonny").with_join_phrase(" & "),
            ArtistCredit::named("Cher"),
        ];
        assert_eq!(credit_string(&credits), "Sonny & Cher");
        assert_eq!(credit_string(&[]), "");
    }

    #[test]
    fn test_tracks_are_flattened_across_media() {
        let release = two_disc_release();
        let titles: Vec<&str> = release.tracks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(release.track_count(), 3);
    }

    #[test]
    fn test_media_format_is_first_medium() {
        assert_eq!(two_disc_release().media_format(), "CD");
        assert_eq!(Release::default().media_format(), "");
    }

    #[test]
    fn test_release_deserialize_with_defaults() {
        let json = r#"{"title": "Tallahassee", "artists": [{"name": "The Mountain Goats"}]}"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.title, "Tallahassee");
        assert_eq!(release.artist_credit(), "The Mountain Goats");
        assert!(release.media.is_empty());
        assert_eq!(release.release_group, ReleaseGroup::default());
    }

    #[test]
    fn test_tagset_deserializes_from_array() {
        let json = r#"[{"album": "A", "title": "x"}, {"album": "A", "title": "y"}]"#;
        let tags: TagSet = serde_json::from_str(json).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get(1).unwrap().title(), "y");
        assert_eq!(tags.first().unwrap().album_artist(), "");
    }
}
