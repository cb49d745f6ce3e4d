//! Testing utilities shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust
//! use shelver_core::matcher::{score, FieldWeights};
//! use shelver_core::testing::fixtures;
//!
//! let release = fixtures::hex_enduction_hour();
//! let tags = fixtures::tags_for(&release);
//! let (score, _) = score(&FieldWeights::new(), &release, &tags);
//! assert_eq!(score, 100.0);
//! ```

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::model::{
        credit_string, ArtistCredit, Medium, Release, ReleaseGroup, TagRecord, TagSet, Track,
    };

    /// Path format used throughout the docs.
    pub const CANONICAL_PATH_FORMAT: &str =
        "/albums/{{ artistCredit .Release.Artists }}/{{ .Release.Title }}/{{ .TrackNum }}";

    /// Titles shared by both sides of the label mismatch fixture.
    pub const MISMATCH_TRACK_TITLES: [&str; 5] = [
        "The Classical",
        "Hip Priest",
        "Who Makes the Nazis?",
        "Deer Park",
        "Iceland",
    ];

    /// Create an artist credit with an ID.
    pub fn artist(name: &str, id: &str) -> ArtistCredit {
        ArtistCredit::named(name).with_id(id)
    }

    /// Create a track with a recording ID derived from the title.
    pub fn track(position: u32, title: &str, artists: &[ArtistCredit]) -> Track {
        Track {
            position,
            title: title.to_string(),
            id: format!("rec-{}", slug(title)),
            artists: artists.to_vec(),
        }
    }

    /// The Fall, Hex Enduction Hour (Kamera, 1982), fully populated.
    pub fn hex_enduction_hour() -> Release {
        let fall = vec![artist("The Fall", "d5da1841-9bc8-4813-9f89-11098090148e")];
        let titles = [
            "The Classical",
            "Jawbone and the Air-Rifle",
            "Hip Priest",
            "Fortress / Deer Park",
            "Mere Pseud Mag. Ed.",
            "Winter (Hostel-Maxi)",
            "Winter 2",
            "Just Step S'ways",
            "Who Makes the Nazis?",
            "Iceland",
            "And This Day",
        ];

        Release {
            id: "rel-hex-enduction-hour".to_string(),
            title: "Hex Enduction Hour".to_string(),
            artists: fall.clone(),
            label: "Kamera Records".to_string(),
            label_id: "lbl-kamera".to_string(),
            catalogue_num: "KAM 005".to_string(),
            date: "1982-03-08".to_string(),
            disambiguation: String::new(),
            release_group: ReleaseGroup {
                id: "rg-hex-enduction-hour".to_string(),
                first_release_date: "1982-03-08".to_string(),
            },
            media: vec![
                Medium {
                    position: 1,
                    format: "12\" Vinyl".to_string(),
                    tracks: titles[..5]
                        .iter()
                        .enumerate()
                        .map(|(i, t)| track(i as u32 + 1, t, &fall))
                        .collect(),
                },
                Medium {
                    position: 2,
                    format: "12\" Vinyl".to_string(),
                    tracks: titles[5..]
                        .iter()
                        .enumerate()
                        .map(|(i, t)| track(i as u32 + 1, t, &fall))
                        .collect(),
                },
            ],
        }
    }

    /// Tags that agree with `release` on every compared field.
    pub fn tags_for(release: &Release) -> TagSet {
        TagSet::new(
            release
                .tracks()
                .iter()
                .map(|t| TagRecord {
                    album: release.title.clone(),
                    album_artist: release.artist_credit(),
                    label: release.label.clone(),
                    catalogue_num: release.catalogue_num.clone(),
                    media_format: release.media_format().to_string(),
                    artist: credit_string(&t.artists),
                    title: t.title.clone(),
                })
                .collect(),
        )
    }

    /// Release side of the label mismatch fixture: five title-only tracks,
    /// label "Kamera Records", catalogue number "KAM 005".
    pub fn label_mismatch_release() -> Release {
        Release {
            label: "Kamera Records".to_string(),
            catalogue_num: "KAM 005".to_string(),
            media: vec![Medium {
                position: 1,
                tracks: MISMATCH_TRACK_TITLES
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Track {
                        position: i as u32 + 1,
                        title: t.to_string(),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Tag side of the label mismatch fixture: same tracks, tagged with label
    /// "Rough Trade" and catalogue number "ROUGH 18".
    pub fn label_mismatch_tags() -> TagSet {
        TagSet::new(
            MISMATCH_TRACK_TITLES
                .iter()
                .map(|t| TagRecord {
                    label: "Rough Trade".to_string(),
                    catalogue_num: "ROUGH 18".to_string(),
                    title: t.to_string(),
                    ..Default::default()
                })
                .collect(),
        )
    }

    fn slug(s: &str) -> String {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
            .collect::<String>()
            .to_ascii_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_hex_enduction_hour_shape() {
            let release = hex_enduction_hour();
            assert_eq!(release.track_count(), 11);
            assert_eq!(release.tracks()[3].id, "rec-fortress-deer-park");
            assert_eq!(release.media[1].tracks[0].position, 1);
        }

        #[test]
        fn test_tags_for_matches_track_count() {
            let release = hex_enduction_hour();
            let tags = tags_for(&release);
            assert_eq!(tags.len(), 11);
            assert_eq!(tags.get(0).map(|t| t.artist.as_str()), Some("The Fall"));
        }
    }
}
