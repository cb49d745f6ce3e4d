//! Weighted diff score of a tag set against a release.

use tracing::debug;

use super::types::FieldWeights;
use crate::diff::{diff_field, DiffRecord};
use crate::model::{credit_string, FileTags, Release, TagSet};

pub const FIELD_RELEASE: &str = "release";
pub const FIELD_ARTIST: &str = "artist";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_CATALOGUE_NUM: &str = "catalogue num";
pub const FIELD_MEDIA_FORMAT: &str = "media format";

/// Separator between artist and title in track fields.
const TRACK_SEPARATOR: &str = " – ";

/// Score `tags` against `release`.
///
/// Every field is diffed; each contributes `weight * chars(remote)` to the
/// total and `weight * distance` to the error. The score is
/// `100 - error * 100 / total`, or 0 when the total is 0. Tracks are compared
/// by position; a track missing on either side is compared with "".
pub fn score<T: FileTags>(
    weights: &FieldWeights,
    release: &Release,
    tags: &TagSet<T>,
) -> (f64, Vec<DiffRecord>) {
    let mut tally = Tally::new(weights);

    let (album, album_artist, label, catalogue_num, media_format) = match tags.first() {
        Some(t) => (
            t.album(),
            t.album_artist(),
            t.label(),
            t.catalogue_num(),
            t.media_format(),
        ),
        None => ("", "", "", "", ""),
    };

    tally.add(FIELD_RELEASE, album, &release.title);
    tally.add(FIELD_ARTIST, album_artist, &release.artist_credit());
    tally.add(FIELD_LABEL, label, &release.label);
    tally.add(FIELD_CATALOGUE_NUM, catalogue_num, &release.catalogue_num);
    tally.add(FIELD_MEDIA_FORMAT, media_format, release.media_format());

    let tracks = release.tracks();
    let n = tags.len().max(tracks.len());
    for i in 0..n {
        let local = tags
            .get(i)
            .map(|t| track_line(t.artist(), t.title()))
            .unwrap_or_default();
        let remote = tracks
            .get(i)
            .map(|t| track_line(&credit_string(&t.artists), &t.title))
            .unwrap_or_default();
        tally.add(&format!("track {}", i + 1), &local, &remote);
    }

    tally.finish()
}

/// "{artist} – {title}" with empty parts left out.
fn track_line(artist: &str, title: &str) -> String {
    [artist, title]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(TRACK_SEPARATOR)
}

struct Tally<'w> {
    weights: &'w FieldWeights,
    chars: f64,
    dist: f64,
    diffs: Vec<DiffRecord>,
}

impl<'w> Tally<'w> {
    fn new(weights: &'w FieldWeights) -> Self {
        Self {
            weights,
            chars: 0.0,
            dist: 0.0,
            diffs: Vec::new(),
        }
    }

    fn add(&mut self, field: &str, local: &str, remote: &str) {
        let record = diff_field(field, local, remote);
        let weight = self.weights.weight(field);
        if weight != 0.0 {
            self.chars += weight * remote.chars().count() as f64;
            self.dist += weight * record.distance as f64;
        }
        if !record.equal {
            debug!(
                field,
                local,
                remote,
                distance = record.distance,
                weight,
                "Field differs"
            );
        }
        self.diffs.push(record);
    }

    fn finish(self) -> (f64, Vec<DiffRecord>) {
        let score = if self.chars == 0.0 {
            0.0
        } else {
            100.0 - self.dist * 100.0 / self.chars
        };
        (score, self.diffs)
    }
}
