//! Parse-time validation of compiled templates.
//!
//! A template is rendered against a small set of synthetic releases that
//! differ in exactly one respect each. If two releases, or two tracks of one
//! release, render to the same path, files would collide on disk and the
//! template is rejected.

use super::error::{FormatError, RenderError};
use super::render::PathData;
use super::template::Template;
use crate::model::{ArtistCredit, Medium, Release, ReleaseGroup, Track};

const CANARY_EXT: &str = ".flac";

/// Check that `template` separates releases and tracks, and that it does not
/// produce empty path segments when identifiers are missing.
pub(crate) fn validate(template: &Template) -> Result<(), FormatError> {
    let a = canary_release(
        "Quartz Meridian",
        "Halcyon Drift",
        "art-halcyon-drift-7f1c",
        "rel-quartz-meridian-2b9e",
    );
    let b = canary_release(
        "Velvet Orchard",
        "Obsidian Lantern",
        "art-obsidian-lantern-c04d",
        "rel-velvet-orchard-91aa",
    );

    let no_track = Track::default();
    let path_a = render(template, PathData::new(&a, &no_track, 0, CANARY_EXT))?;
    let path_b = render(template, PathData::new(&b, &no_track, 0, CANARY_EXT))?;
    if path_a == path_b {
        return Err(FormatError::ambiguous(format!(
            "different releases both render to {:?}",
            path_a
        )));
    }

    let tracks = a.tracks();
    let path_1 = render(template, PathData::new(&a, tracks[0], 1, CANARY_EXT))?;
    let path_2 = render(template, PathData::new(&a, tracks[1], 2, CANARY_EXT))?;
    if path_1 == path_2 {
        return Err(FormatError::ambiguous(format!(
            "different tracks both render to {:?}",
            path_1
        )));
    }

    let blank = without_ids(&a);
    for release in [&a, &blank] {
        for (i, track) in release.tracks().into_iter().enumerate() {
            let path = render(template, PathData::new(release, track, i + 1, CANARY_EXT))?;
            if path.contains("//") || path.ends_with('/') {
                return Err(FormatError::bad_data(format!(
                    "renders an empty path segment: {:?}",
                    path
                )));
            }
        }
    }

    Ok(())
}

fn render(template: &Template, data: PathData<'_>) -> Result<String, FormatError> {
    template
        .render(&data)
        .map_err(|e: RenderError| FormatError::invalid(e.to_string()))
}

fn canary_release(title: &str, artist: &str, artist_id: &str, id: &str) -> Release {
    let artists = vec![ArtistCredit::named(artist).with_id(artist_id)];
    let track = |title: &str, id: &str| Track {
        position: 1,
        title: title.to_string(),
        id: id.to_string(),
        artists: artists.clone(),
    };

    Release {
        id: id.to_string(),
        title: title.to_string(),
        artists: artists.clone(),
        label: "Tessellate Sound".to_string(),
        label_id: "lbl-tessellate-5e20".to_string(),
        catalogue_num: "TSS 041".to_string(),
        date: "2004-06-21".to_string(),
        disambiguation: String::new(),
        release_group: ReleaseGroup {
            id: "rg-canary-0d3a".to_string(),
            first_release_date: "2004-06-21".to_string(),
        },
        media: vec![
            Medium {
                position: 1,
                format: "CD".to_string(),
                tracks: vec![track("Cinder Waltz", "rec-cinder-waltz-44b1")],
            },
            Medium {
                position: 2,
                format: "CD".to_string(),
                tracks: vec![track("Marigold Static", "rec-marigold-static-e87f")],
            },
        ],
    }
}

/// Copy of `release` with every identifier cleared.
fn without_ids(release: &Release) -> Release {
    fn clear(credits: &[ArtistCredit]) -> Vec<ArtistCredit> {
        credits
            .iter()
            .map(|c| ArtistCredit {
                id: String::new(),
                ..c.clone()
            })
            .collect()
    }

    let mut blank = release.clone();
    blank.id.clear();
    blank.label_id.clear();
    blank.release_group.id.clear();
    blank.artists = clear(&release.artists);
    for medium in &mut blank.media {
        for track in &mut medium.tracks {
            track.id.clear();
            track.artists = clear(&track.artists);
        }
    }
    blank
}
