pub mod ast;
pub mod command;
pub mod lexer;
pub mod parser;

pub use ast::{LineKind, Script, ScriptLine};
pub use command::{Command, CommandSet, JumpLine};
pub use parser::{ParseError, ParsedScript, Parser};

/// Lex and parse a whole script resource in one go.
pub fn parse_source(src: &str) -> ParsedScript {
    let tokens = lexer::Lexer::new(src).run();
    Parser::new(&tokens).parse()
}
