//! Evaluation of compiled templates.

use std::borrow::Cow;

use super::error::RenderError;
use super::template::{Command, Field, Node, Operand, Pipeline, Template};
use crate::model::{ArtistCredit, Release, Track};

/// Data a path is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct PathData<'a> {
    pub release: &'a Release,
    pub track: &'a Track,
    /// 1-based position of the track across all media.
    pub track_num: usize,
    /// File extension including the leading dot, e.g. ".flac".
    pub ext: &'a str,
}

impl<'a> PathData<'a> {
    pub fn new(release: &'a Release, track: &'a Track, track_num: usize, ext: &'a str) -> Self {
        Self {
            release,
            track,
            track_num,
            ext,
        }
    }
}

/// A value flowing through a pipeline.
#[derive(Debug, Clone)]
pub(crate) enum Value<'a> {
    Str(Cow<'a, str>),
    Int(i64),
    Strings(Vec<String>),
    Credits(&'a [ArtistCredit]),
    Tracks(Vec<&'a Track>),
    Release(&'a Release),
    Track(&'a Track),
}

impl<'a> Value<'a> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Strings(_) => "list of strings",
            Value::Credits(_) => "artist credit",
            Value::Tracks(_) => "list of tracks",
            Value::Release(_) => "release",
            Value::Track(_) => "track",
        }
    }

    pub(crate) fn type_error(&self, func: &'static str, expected: &'static str) -> RenderError {
        RenderError::ArgumentType {
            func,
            expected,
            got: self.kind(),
        }
    }

    /// Strings pass through; integers are formatted.
    pub(crate) fn expect_str(self, func: &'static str) -> Result<Cow<'a, str>, RenderError> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Int(n) => Ok(Cow::Owned(n.to_string())),
            other => Err(other.type_error(func, "string")),
        }
    }

    pub(crate) fn expect_int(self, func: &'static str) -> Result<i64, RenderError> {
        match self {
            Value::Int(n) => Ok(n),
            other => Err(other.type_error(func, "int")),
        }
    }

    pub(crate) fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Int(n) => *n != 0,
            Value::Strings(items) => !items.is_empty(),
            Value::Credits(credits) => !credits.is_empty(),
            Value::Tracks(tracks) => !tracks.is_empty(),
            Value::Release(_) | Value::Track(_) => true,
        }
    }

    pub(crate) fn to_text(&self) -> Result<Cow<'_, str>, RenderError> {
        match self {
            Value::Str(s) => Ok(Cow::Borrowed(s.as_ref())),
            Value::Int(n) => Ok(Cow::Owned(n.to_string())),
            other => Err(RenderError::NotPrintable { kind: other.kind() }),
        }
    }
}

impl Template {
    /// Render this template. Does not check whether the template was
    /// validated; callers go through `PathFormatter`.
    pub fn render(&self, data: &PathData<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        write_nodes(&self.nodes, data, &mut out)?;
        Ok(out)
    }
}

fn write_nodes<'a>(
    nodes: &[Node],
    data: &PathData<'a>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(pipeline) => {
                let value = eval_pipeline(pipeline, data)?;
                out.push_str(&value.to_text()?);
            }
            Node::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if eval_pipeline(cond, data)?.is_truthy() {
                    then
                } else {
                    otherwise
                };
                write_nodes(branch, data, out)?;
            }
        }
    }
    Ok(())
}

fn eval_pipeline<'a>(pipeline: &Pipeline, data: &PathData<'a>) -> Result<Value<'a>, RenderError> {
    let mut piped: Option<Value<'a>> = None;
    for command in &pipeline.commands {
        let value = match command {
            Command::Operand(operand) => eval_operand(operand, data)?,
            Command::Call { func, args } => {
                let mut values = args
                    .iter()
                    .map(|arg| eval_operand(arg, data))
                    .collect::<Result<Vec<_>, _>>()?;
                values.extend(piped.take());
                func.call(values)?
            }
        };
        piped = Some(value);
    }
    // The compiler never produces an empty pipeline.
    Ok(piped.unwrap_or(Value::Str(Cow::Borrowed(""))))
}

fn eval_operand<'a>(operand: &Operand, data: &PathData<'a>) -> Result<Value<'a>, RenderError> {
    match operand {
        Operand::Field(field) => Ok(field_value(*field, data)),
        Operand::Str(s) => Ok(Value::Str(Cow::Owned(s.clone()))),
        Operand::Int(n) => Ok(Value::Int(*n)),
        Operand::Pipeline(inner) => eval_pipeline(inner, data),
    }
}

fn field_value<'a>(field: Field, data: &PathData<'a>) -> Value<'a> {
    let release = data.release;
    let track = data.track;

    match field {
        Field::Release => Value::Release(release),
        Field::ReleaseId => text(&release.id),
        Field::ReleaseTitle => text(&release.title),
        Field::ReleaseArtists => Value::Credits(&release.artists),
        Field::ReleaseLabel => text(&release.label),
        Field::ReleaseLabelId => text(&release.label_id),
        Field::ReleaseCatalogueNum => text(&release.catalogue_num),
        Field::ReleaseMediaFormat => text(release.media_format()),
        Field::ReleaseDate => text(&release.date),
        Field::ReleaseDisambiguation => text(&release.disambiguation),
        Field::ReleaseGroupId => text(&release.release_group.id),
        Field::ReleaseGroupFirstReleaseDate => text(&release.release_group.first_release_date),
        Field::Track => Value::Track(track),
        Field::TrackId => text(&track.id),
        Field::TrackTitle => text(&track.title),
        Field::TrackPosition => Value::Int(i64::from(track.position)),
        Field::TrackArtists => Value::Credits(&track.artists),
        Field::TrackNum => Value::Int(data.track_num as i64),
        Field::Ext => text(data.ext),
    }
}

fn text(s: &str) -> Value<'_> {
    Value::Str(Cow::Borrowed(s))
}
