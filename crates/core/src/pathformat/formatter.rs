//! The validated path formatter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use super::error::FormatError;
use super::render::PathData;
use super::template::Template;
use super::validate::validate;
use crate::metrics::{PATHS_RENDERED, TEMPLATE_VALIDATIONS};
use crate::model::Release;

/// Turns release and track data into destination paths.
///
/// A formatter starts unparsed. [`parse`](Self::parse) compiles and validates
/// a format; only then does [`execute`](Self::execute) produce paths.
///
/// ```
/// use shelver_core::pathformat::PathFormatter;
///
/// let mut pf = PathFormatter::new();
/// pf.parse("/albums/{{ artistCredit .Release.Artists }}/{{ .Release.Title }}/{{ .TrackNum }}")
///     .unwrap();
/// assert_eq!(pf.root(), "/albums");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathFormatter {
    template: Option<Template>,
}

impl PathFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and validate `src`. On error the formatter is left unparsed.
    pub fn parse(&mut self, src: &str) -> Result<(), FormatError> {
        self.template = None;

        let result = Template::compile(src).and_then(|template| {
            validate(&template)?;
            Ok(template)
        });

        match result {
            Ok(template) => {
                info!(format = %template.source(), root = %template.root(), "Path format accepted");
                TEMPLATE_VALIDATIONS.with_label_values(&["ok"]).inc();
                self.template = Some(template);
                Ok(())
            }
            Err(e) => {
                warn!(format = %src, error = %e, "Path format rejected");
                TEMPLATE_VALIDATIONS.with_label_values(&[e.kind()]).inc();
                Err(e)
            }
        }
    }

    /// Render the path for one track.
    pub fn execute(&self, data: &PathData<'_>) -> Result<String, FormatError> {
        let template = self.template.as_ref().ok_or(FormatError::NotParsed)?;
        let path = template.render(data)?;
        debug!(track_num = data.track_num, path = %path, "Rendered path");
        PATHS_RENDERED.inc();
        Ok(path)
    }

    /// Render paths for every track of `release`, numbered from 1 across media.
    pub fn destinations(&self, release: &Release, ext: &str) -> Result<Vec<String>, FormatError> {
        release
            .tracks()
            .into_iter()
            .enumerate()
            .map(|(i, track)| self.execute(&PathData::new(release, track, i + 1, ext)))
            .collect()
    }

    /// Literal directory prefix of the format; empty when unparsed.
    pub fn root(&self) -> &str {
        self.template.as_ref().map(Template::root).unwrap_or("")
    }

    /// Source of the parsed format; empty when unparsed.
    pub fn source(&self) -> &str {
        self.template.as_ref().map(Template::source).unwrap_or("")
    }

    pub fn is_parsed(&self) -> bool {
        self.template.is_some()
    }
}

impl FromStr for PathFormatter {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pf = PathFormatter::new();
        pf.parse(s)?;
        Ok(pf)
    }
}

impl fmt::Display for PathFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

impl Serialize for PathFormatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.source())
    }
}

impl<'de> Deserialize<'de> for PathFormatter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let src = String::deserialize(deserializer)?;
        src.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArtistCredit, Medium, Track};

    const CANONICAL: &str =
        "/albums/{{ artistCredit .Release.Artists }}/{{ .Release.Title }}/{{ .TrackNum }}";

    fn release(title: &str, artist: &str) -> Release {
        Release {
            id: format!("rel-{}", title),
            title: title.to_string(),
            artists: vec![ArtistCredit::named(artist)],
            media: vec![
                Medium {
                    position: 1,
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
                    ..Default::default()
                },
                Medium {
                    position: 2,
                    tracks: vec![Track {
                        position: 1,
                        title: "Three".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_unparsed_formatter() {
        let pf = PathFormatter::new();
        assert!(!pf.is_parsed());
        assert_eq!(pf.root(), "");
        let r = release("A", "B");
        let tracks = r.tracks();
        let err = pf
            .execute(&PathData::new(&r, tracks[0], 1, ".flac"))
            .unwrap_err();
        assert_eq!(err, FormatError::NotParsed);
    }

    #[test]
    fn test_invalid_formats() {
        for src in ["", " ", "🤤"] {
            let mut pf = PathFormatter::new();
            let err = pf.parse(src).unwrap_err();
            assert!(matches!(err, FormatError::InvalidFormat { .. }), "{:?}", src);
        }
    }

    #[test]
    fn test_failed_parse_resets_formatter() {
        let mut pf = PathFormatter::new();
        pf.parse(CANONICAL).unwrap();
        assert!(pf.is_parsed());

        assert!(pf.parse("/m/{{ .Track.Title }}").is_err());
        assert!(!pf.is_parsed());
        assert_eq!(pf.root(), "");
    }

    #[test]
    fn test_execute_canonical() {
        let pf: PathFormatter = CANONICAL.parse().unwrap();
        assert_eq!(pf.root(), "/albums");

        let a = release("Hex Enduction Hour", "The Fall");
        let b = release("Grotesque", "The Fall");
        let ta = a.tracks();
        let tb = b.tracks();

        let pa = pf.execute(&PathData::new(&a, ta[0], 1, ".flac")).unwrap();
        let pb = pf.execute(&PathData::new(&b, tb[0], 1, ".flac")).unwrap();
        assert_eq!(pa, "/albums/The Fall/Hex Enduction Hour/1");
        assert_ne!(pa, pb);
        assert!(!pa.contains("//"));
    }

    #[test]
    fn test_destinations_number_across_media() {
        let pf: PathFormatter = "/m/{{ .Release.Title }}/{{ pad0 2 .TrackNum }} {{ .Track.Title }}{{ .Ext }}"
            .parse()
            .unwrap();
        let paths = pf.destinations(&release("Album", "Artist"), ".mp3").unwrap();
        assert_eq!(
            paths,
            vec![
                "/m/Album/01 One.mp3",
                "/m/Album/02 Two.mp3",
                "/m/Album/03 Three.mp3",
            ]
        );
    }

    #[test]
    fn test_serde_as_source_string() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            path_format: PathFormatter,
        }

        let w: Wrapper = serde_json::from_value(serde_json::json!({
            "path_format": format!("  {}  ", CANONICAL),
        }))
        .unwrap();
        assert!(w.path_format.is_parsed());
        assert_eq!(w.path_format.source(), CANONICAL);

        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["path_format"], CANONICAL);

        let bad = serde_json::from_value::<Wrapper>(serde_json::json!({
            "path_format": "/m/{{ .Release.Title }}",
        }));
        assert!(bad.is_err());
    }
}
