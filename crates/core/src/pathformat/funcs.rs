//! The closed set of functions callable from a path format.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::error::RenderError;
use super::render::Value;
use crate::model::credit_string;

/// Widest zero padding `pad0` accepts.
pub const MAX_PAD_WIDTH: i64 = 32;

/// A template function, resolved by name at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Join,
    Pad0,
    FlatTracks,
    ArtistCredit,
    ArtistNames,
    ArtistMbids,
    Len,
    Sort,
    SafePath,
    Year,
}

static FUNCS: Lazy<HashMap<&'static str, Func>> = Lazy::new(|| {
    [
        Func::Join,
        Func::Pad0,
        Func::FlatTracks,
        Func::ArtistCredit,
        Func::ArtistNames,
        Func::ArtistMbids,
        Func::Len,
        Func::Sort,
        Func::SafePath,
        Func::Year,
    ]
    .into_iter()
    .map(|f| (f.name(), f))
    .collect()
});

impl Func {
    pub fn lookup(name: &str) -> Option<Func> {
        FUNCS.get(name).copied()
    }

    /// Name as written in templates.
    pub fn name(self) -> &'static str {
        match self {
            Func::Join => "join",
            Func::Pad0 => "pad0",
            Func::FlatTracks => "flatTracks",
            Func::ArtistCredit => "artistCredit",
            Func::ArtistNames => "artistNames",
            Func::ArtistMbids => "artistMBIDs",
            Func::Len => "len",
            Func::Sort => "sort",
            Func::SafePath => "safepath",
            Func::Year => "year",
        }
    }

    /// Number of arguments, counting a piped-in value.
    pub fn arity(self) -> usize {
        match self {
            Func::Join | Func::Pad0 => 2,
            _ => 1,
        }
    }

    pub(crate) fn call<'a>(self, mut args: Vec<Value<'a>>) -> Result<Value<'a>, RenderError> {
        debug_assert_eq!(args.len(), self.arity());
        let name = self.name();
        let last = args.pop().unwrap_or(Value::Int(0));

        match self {
            Func::Join => {
                let delim = args.pop().unwrap_or(Value::Int(0));
                let delim = delim.expect_str(name)?;
                match last {
                    Value::Strings(items) => Ok(Value::Str(Cow::Owned(items.join(delim.as_ref())))),
                    other => Err(other.type_error(name, "list of strings")),
                }
            }
            Func::Pad0 => {
                let width = args.pop().unwrap_or(Value::Int(0));
                let width = width.expect_int(name)?;
                if !(0..=MAX_PAD_WIDTH).contains(&width) {
                    return Err(RenderError::ArgumentRange {
                        func: name,
                        value: width,
                        min: 0,
                        max: MAX_PAD_WIDTH,
                    });
                }
                let width = width as usize;
                let n = last.expect_int(name)?;
                Ok(Value::Str(Cow::Owned(format!("{:0width$}", n, width = width))))
            }
            Func::FlatTracks => match last {
                Value::Release(release) => Ok(Value::Tracks(release.tracks())),
                other => Err(other.type_error(name, "release")),
            },
            Func::ArtistCredit => match last {
                Value::Credits(credits) => Ok(Value::Str(Cow::Owned(credit_string(credits)))),
                other => Err(other.type_error(name, "artist credit")),
            },
            Func::ArtistNames => match last {
                Value::Credits(credits) => Ok(Value::Strings(
                    credits.iter().map(|c| c.name.clone()).collect(),
                )),
                other => Err(other.type_error(name, "artist credit")),
            },
            Func::ArtistMbids => match last {
                Value::Credits(credits) => Ok(Value::Strings(
                    credits.iter().map(|c| c.id.clone()).collect(),
                )),
                other => Err(other.type_error(name, "artist credit")),
            },
            Func::Len => match last {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::Strings(items) => Ok(Value::Int(items.len() as i64)),
                Value::Credits(credits) => Ok(Value::Int(credits.len() as i64)),
                Value::Tracks(tracks) => Ok(Value::Int(tracks.len() as i64)),
                other => Err(other.type_error(name, "string or list")),
            },
            Func::Sort => match last {
                Value::Strings(mut items) => {
                    items.sort();
                    Ok(Value::Strings(items))
                }
                other => Err(other.type_error(name, "list of strings")),
            },
            Func::SafePath => {
                let s = last.expect_str(name)?;
                Ok(Value::Str(Cow::Owned(safe_path(&s))))
            }
            Func::Year => {
                let s = last.expect_str(name)?;
                Ok(Value::Str(Cow::Owned(year(&s).to_string())))
            }
        }
    }
}

/// Make a value usable as a single path segment.
pub fn safe_path(s: &str) -> String {
    let replaced: String = s
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    replaced.trim().trim_start_matches('.').trim().to_string()
}

/// Leading four-digit year of a date like "1982-03-08", or "".
fn year(date: &str) -> &str {
    match date.get(..4) {
        Some(y) if y.chars().all(|c| c.is_ascii_digit()) => y,
        _ => "",
    }
}
