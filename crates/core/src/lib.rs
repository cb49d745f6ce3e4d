pub mod config;
pub mod diff;
pub mod matcher;
pub mod metrics;
pub mod model;
pub mod pathformat;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, MatchingConfig,
    SanitizedConfig,
};
pub use diff::{diff, diff_field, Diff, DiffRecord, Edit, EditKind};
pub use matcher::{
    check_track_count, score, Decision, FieldWeights, MatchError, MatchResult, Matcher,
};
pub use model::{ArtistCredit, FileTags, Medium, Release, ReleaseGroup, TagRecord, TagSet, Track};
pub use pathformat::{FormatError, PathData, PathFormatter, RenderError, Template};
