//! Path format compiler.
//!
//! A path format is literal text with `{{ ... }}` actions:
//!
//! ```text
//! /music/{{ artistCredit .Release.Artists | safepath }}/{{ .Release.Title }}/{{ pad0 2 .TrackNum }} {{ .Track.Title }}{{ .Ext }}
//! ```
//!
//! Actions hold a pipeline of commands separated by `|`; the value of each
//! command is passed as the last argument of the next one. Operands are field
//! paths, string and integer literals, or parenthesised pipelines.
//! `{{ if pipeline }}`, `{{ else }}` and `{{ end }}` render a branch
//! depending on whether the pipeline value is non-empty.
//!
//! Fields and functions are resolved while compiling, so a compiled
//! [`Template`] never meets an unknown name at render time.

use super::error::FormatError;
use super::funcs::Func;

/// A field of the data a path is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Release,
    ReleaseId,
    ReleaseTitle,
    ReleaseArtists,
    ReleaseLabel,
    ReleaseLabelId,
    ReleaseCatalogueNum,
    ReleaseMediaFormat,
    ReleaseDate,
    ReleaseDisambiguation,
    ReleaseGroupId,
    ReleaseGroupFirstReleaseDate,
    Track,
    TrackId,
    TrackTitle,
    TrackPosition,
    TrackArtists,
    TrackNum,
    Ext,
}

impl Field {
    /// Resolve a dotted path such as `.Release.Title`.
    pub fn resolve(path: &[&str]) -> Option<Field> {
        let field = match path {
            ["Release"] => Field::Release,
            ["Release", "ID"] => Field::ReleaseId,
            ["Release", "Title"] => Field::ReleaseTitle,
            ["Release", "Artists"] => Field::ReleaseArtists,
            ["Release", "Label"] => Field::ReleaseLabel,
            ["Release", "LabelID"] => Field::ReleaseLabelId,
            ["Release", "CatalogueNum"] => Field::ReleaseCatalogueNum,
            ["Release", "MediaFormat"] => Field::ReleaseMediaFormat,
            ["Release", "Date"] => Field::ReleaseDate,
            ["Release", "Disambiguation"] => Field::ReleaseDisambiguation,
            ["Release", "ReleaseGroup", "ID"] => Field::ReleaseGroupId,
            ["Release", "ReleaseGroup", "FirstReleaseDate"] => Field::ReleaseGroupFirstReleaseDate,
            ["Track"] => Field::Track,
            ["Track", "ID"] => Field::TrackId,
            ["Track", "Title"] => Field::TrackTitle,
            ["Track", "Position"] => Field::TrackPosition,
            ["Track", "Artists"] => Field::TrackArtists,
            ["TrackNum"] => Field::TrackNum,
            ["Ext"] => Field::Ext,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Field(Field),
    Str(String),
    Int(i64),
    Pipeline(Box<Pipeline>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Call { func: Func, args: Vec<Operand> },
    Operand(Operand),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pipeline {
    pub(crate) commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
    If {
        cond: Pipeline,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// A compiled path format. Not yet checked for ambiguity; see
/// [`PathFormatter`](super::PathFormatter) for the validated entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    pub(crate) nodes: Vec<Node>,
}

impl Template {
    /// Compile a path format.
    pub fn compile(src: &str) -> Result<Template, FormatError> {
        let source = src.trim();
        if source.is_empty() {
            return Err(FormatError::invalid("format is empty"));
        }

        let items = lex(source)?;
        let mut parser = Parser {
            items: items.into_iter(),
        };
        let (nodes, end) = parser.parse_list()?;
        match end {
            ListEnd::Eof => {}
            ListEnd::Else => return Err(FormatError::invalid("unexpected {{ else }}")),
            ListEnd::End => return Err(FormatError::invalid("unexpected {{ end }}")),
        }

        let has_actions = nodes.iter().any(|n| !matches!(n, Node::Text(_)));
        if !has_actions && !source.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(FormatError::invalid("format contains no path"));
        }

        Ok(Template {
            source: source.to_string(),
            nodes,
        })
    }

    /// The (trimmed) source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Longest literal directory prefix before the first action.
    ///
    /// `/music/albums/{{ .Release.Title }}` has root `/music/albums`.
    pub fn root(&self) -> &str {
        let literal = match self.nodes.first() {
            Some(Node::Text(text)) => text.as_str(),
            _ => return "",
        };
        match literal.rfind('/') {
            Some(0) => "/",
            Some(i) => &literal[..i],
            None => "",
        }
    }
}

// ----------------------------------------------------------------------------
// Lexing
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Field(Vec<String>),
    Ident(String),
    Str(String),
    Int(i64),
    Pipe,
    LParen,
    RParen,
}

#[derive(Debug)]
enum Item {
    Text(String),
    Action(Vec<Token>),
}

fn lex(src: &str) -> Result<Vec<Item>, FormatError> {
    let mut items = Vec::new();
    let mut rest = src;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            items.push(text_item(&rest[..open])?);
        }
        let (tokens, consumed) = lex_action(&rest[open + 2..])?;
        items.push(Item::Action(tokens));
        rest = &rest[open + 2 + consumed..];
    }
    if !rest.is_empty() {
        items.push(text_item(rest)?);
    }

    Ok(items)
}

fn text_item(text: &str) -> Result<Item, FormatError> {
    if text.contains("}}") {
        return Err(FormatError::invalid("unexpected }} outside of an action"));
    }
    Ok(Item::Text(text.to_string()))
}

/// Tokenize one action body. Returns the tokens and the number of bytes
/// consumed, including the closing `}}`.
fn lex_action(src: &str) -> Result<(Vec<Token>, usize), FormatError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '}' if src[i..].starts_with("}}") => return Ok((tokens, i + 2)),
            c if c.is_whitespace() => {}
            '|' => tokens.push(Token::Pipe),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '"' => {
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => s.push('\n'),
                            Some((_, 't')) => s.push('\t'),
                            Some((_, '"')) => s.push('"'),
                            Some((_, '\\')) => s.push('\\'),
                            Some((_, other)) => {
                                return Err(FormatError::invalid(format!(
                                    "unknown escape \\{} in string",
                                    other
                                )))
                            }
                            None => return Err(FormatError::invalid("unterminated string")),
                        },
                        Some((_, ch)) => s.push(ch),
                        None => return Err(FormatError::invalid("unterminated string")),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '.' => {
                let mut path = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                        path.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Field(
                    path.split('.').map(str::to_string).collect(),
                ));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut digits = String::from(c);
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_digit() {
                        digits.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = digits
                    .parse()
                    .map_err(|_| FormatError::invalid(format!("bad number {:?}", digits)))?;
                tokens.push(Token::Int(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => {
                return Err(FormatError::invalid(format!(
                    "unexpected character {:?} in action",
                    other
                )))
            }
        }
    }

    Err(FormatError::invalid("unclosed action"))
}

// ----------------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------------

enum ListEnd {
    Eof,
    Else,
    End,
}

struct Parser {
    items: std::vec::IntoIter<Item>,
}

impl Parser {
    fn parse_list(&mut self) -> Result<(Vec<Node>, ListEnd), FormatError> {
        let mut nodes = Vec::new();

        while let Some(item) = self.items.next() {
            let tokens = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action(tokens) => tokens,
            };

            match tokens.first() {
                None => return Err(FormatError::invalid("empty action")),
                Some(Token::Ident(kw)) if kw == "else" || kw == "end" => {
                    if tokens.len() > 1 {
                        return Err(FormatError::invalid(format!("unexpected tokens after {}", kw)));
                    }
                    let end = if kw == "else" { ListEnd::Else } else { ListEnd::End };
                    return Ok((nodes, end));
                }
                Some(Token::Ident(kw)) if kw == "if" => {
                    let cond = parse_pipeline(&tokens[1..])?;
                    let (then, end) = self.parse_list()?;
                    let otherwise = match end {
                        ListEnd::End => Vec::new(),
                        ListEnd::Else => match self.parse_list()? {
                            (otherwise, ListEnd::End) => otherwise,
                            (_, ListEnd::Else) => {
                                return Err(FormatError::invalid("second {{ else }} in if"))
                            }
                            (_, ListEnd::Eof) => return Err(FormatError::invalid("unclosed if")),
                        },
                        ListEnd::Eof => return Err(FormatError::invalid("unclosed if")),
                    };
                    nodes.push(Node::If {
                        cond,
                        then,
                        otherwise,
                    });
                }
                Some(_) => nodes.push(Node::Action(parse_pipeline(&tokens)?)),
            }
        }

        Ok((nodes, ListEnd::Eof))
    }
}

fn parse_pipeline(tokens: &[Token]) -> Result<Pipeline, FormatError> {
    let mut stream = TokenStream { tokens, pos: 0 };
    let pipeline = stream.pipeline()?;
    if let Some(tok) = stream.peek() {
        return Err(FormatError::invalid(format!("unexpected {:?}", tok)));
    }
    Ok(pipeline)
}

struct TokenStream<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> TokenStream<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn pipeline(&mut self) -> Result<Pipeline, FormatError> {
        let mut commands = vec![self.command(false)?];
        while self.peek() == Some(&Token::Pipe) {
            self.next();
            commands.push(self.command(true)?);
        }
        Ok(Pipeline { commands })
    }

    fn command(&mut self, piped: bool) -> Result<Command, FormatError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let func = Func::lookup(name)
                    .ok_or_else(|| FormatError::invalid(format!("unknown function {:?}", name)))?;
                self.next();
                let mut args = Vec::new();
                while let Some(tok) = self.peek() {
                    if matches!(tok, Token::Pipe | Token::RParen) {
                        break;
                    }
                    args.push(self.operand()?);
                }
                let given = args.len() + usize::from(piped);
                if given != func.arity() {
                    return Err(FormatError::invalid(format!(
                        "{} takes {} argument(s), got {}",
                        func.name(),
                        func.arity(),
                        given
                    )));
                }
                Ok(Command::Call { func, args })
            }
            Some(_) if piped => Err(FormatError::invalid(
                "only functions can follow | in a pipeline",
            )),
            Some(_) => Ok(Command::Operand(self.operand()?)),
            None => Err(FormatError::invalid("missing command")),
        }
    }

    fn operand(&mut self) -> Result<Operand, FormatError> {
        match self.next() {
            Some(Token::Field(path)) => {
                let parts: Vec<&str> = path.iter().map(String::as_str).collect();
                Field::resolve(&parts)
                    .map(Operand::Field)
                    .ok_or_else(|| FormatError::invalid(format!("unknown field .{}", path.join("."))))
            }
            Some(Token::Str(s)) => Ok(Operand::Str(s.clone())),
            Some(Token::Int(n)) => Ok(Operand::Int(*n)),
            Some(Token::LParen) => {
                let inner = self.pipeline()?;
                match self.next() {
                    Some(Token::RParen) => Ok(Operand::Pipeline(Box::new(inner))),
                    _ => Err(FormatError::invalid("unclosed (")),
                }
            }
            Some(Token::Ident(name)) => Err(FormatError::invalid(format!(
                "function {} used as an argument must be in parentheses",
                name
            ))),
            Some(tok) => Err(FormatError::invalid(format!("unexpected {:?}", tok))),
            None => Err(FormatError::invalid("missing operand")),
        }
    }
}
