use std::str::Chars;
use std::iter::Peekable;

pub const DELIMITER: char = ',';
const QUOTE: char = '"';

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Field(String),
    RowEnd,
    Eof,
}

/// A token plus the 1-based source row it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Tok {
    pub tok: TokKind,
    pub row: usize,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    row: usize,
    tokens: Vec<Tok>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        // a leading BOM would otherwise end up in the first header field
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Lexer { chars: src.chars().peekable(), row: 1, tokens: Vec::new() }
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn push(&mut self, tok: TokKind, row: usize) {
        self.tokens.push(Tok { tok, row });
    }

    fn at_field_end(&mut self) -> bool {
        matches!(self.peek(), None | Some(&DELIMITER) | Some(&'\n') | Some(&'\r'))
    }

    pub fn run(mut self) -> Vec<Tok> {
        while self.peek().is_some() {
            self.row_tokens();
        }
        let row = self.row;
        self.push(TokKind::Eof, row);
        self.tokens
    }

    fn row_tokens(&mut self) {
        let start = self.row;
        loop {
            let field = self.field();
            self.push(TokKind::Field(field), start);
            match self.advance() {
                Some(DELIMITER) => continue,
                Some('\r') => {
                    if self.peek() == Some(&'\n') {
                        self.advance();
                    }
                    break;
                }
                _ => break,
            }
        }
        self.push(TokKind::RowEnd, start);
        self.row += 1;
    }

    fn field(&mut self) -> String {
        let mut content = String::new();
        while let Some(&c) = self.peek() {
            if c != ' ' && c != '\t' {
                break;
            }
            content.push(c);
            self.advance();
        }
        // blanks before an opening quote are padding, not content
        if self.peek() == Some(&QUOTE) {
            return self.quoted();
        }
        while !self.at_field_end() {
            if let Some(c) = self.advance() {
                content.push(c);
            }
        }
        content
    }

    // Delimiters and newlines inside quotes are kept verbatim, `""` is a literal quote.
    fn quoted(&mut self) -> String {
        let start = self.row;
        self.advance();
        let mut content = String::new();
        let mut closed = false;
        while let Some(c) = self.advance() {
            match c {
                QUOTE if self.peek() == Some(&QUOTE) => {
                    self.advance();
                    content.push(QUOTE);
                }
                QUOTE => {
                    closed = true;
                    break;
                }
                '\n' => {
                    self.row += 1;
                    content.push(c);
                }
                _ => content.push(c),
            }
        }
        if !closed {
            log::warn!("Unterminated quoted field starting at row {}", start);
        }
        // anything between the closing quote and the delimiter is kept as written
        while !self.at_field_end() {
            if let Some(c) = self.advance() {
                content.push(c);
            }
        }
        content
    }
}
