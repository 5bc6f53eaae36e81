use crate::ast::{Script, ScriptLine};
use crate::lexer::{Tok, TokKind};

/// A row that could not become a [`ScriptLine`]. The row is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub row: usize,
    pub msg: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedScript {
    pub script: Script,
    pub errors: Vec<ParseError>,
}

pub struct Parser<'a> {
    toks: &'a [Tok],
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub fn new(toks: &'a [Tok]) -> Self {
        Self { toks, cursor: 0 }
    }

    fn peek(&self) -> Option<&'a TokKind> {
        self.toks.get(self.cursor).map(|t| &t.tok)
    }

    fn bump(&mut self) -> Option<&'a Tok> {
        let tok = self.toks.get(self.cursor);
        self.cursor += 1;
        tok
    }

    /// Collect the fields of the next row, `None` at end of input.
    fn row(&mut self) -> Option<(usize, Vec<&'a str>)> {
        if matches!(self.peek(), None | Some(TokKind::Eof)) {
            return None;
        }
        let mut fields = Vec::new();
        let mut row = 0;
        while let Some(tok) = self.bump() {
            row = tok.row;
            match &tok.tok {
                TokKind::Field(f) => fields.push(f.as_str()),
                TokKind::RowEnd => break,
                TokKind::Eof => {
                    self.cursor -= 1;
                    break;
                }
            }
        }
        Some((row, fields))
    }

    pub fn parse(mut self) -> ParsedScript {
        let mut out = ParsedScript::default();

        // header
        if self.row().is_none() {
            return out;
        }

        while let Some((row, fields)) = self.row() {
            if fields.iter().all(|f| f.trim().is_empty()) && fields.len() < 2 {
                continue;
            }
            if fields.len() < 2 {
                out.errors.push(ParseError {
                    row,
                    msg: format!("expected at least 2 fields, found {}", fields.len()),
                });
                continue;
            }
            out.script.lines.push(ScriptLine {
                speaker: fields[0].trim().to_string(),
                text: fields[1].to_string(),
                command: fields.get(2).map(|c| c.trim().to_string()).unwrap_or_default(),
                row,
            });
        }
        out
    }
}
