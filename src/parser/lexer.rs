use std::borrow::Cow;

use logos::{Lexer as LogosLexer, Logos};
use thiserror::Error;

use super::error::{ParseError, ParseResult};
use super::span::{Location, Span};

#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid character")]
    InvalidCharacter,
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Raw scanner classes. Keywords and punctuation are mapped in [`Lexer::next_token`]
/// so that identifiers spelled with unicode escapes can still become keywords.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\x0C]+")]
enum RawToken {
    #[regex(r"//[^\n\r]*", logos::skip)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    #[token("/**", doc_comment)]
    DocComment,

    #[regex(r"([a-zA-Z_$\x{80}-\x{10FFFF}]|\\u+[0-9a-fA-F]{4})([a-zA-Z0-9_$\x{80}-\x{10FFFF}]|\\u+[0-9a-fA-F]{4})*")]
    Word,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[lLfFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[fFdD]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"0[bB][01_]+[lL]?")]
    Number,

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    Str,
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    Char,

    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    #[token(";")]
    #[token(",")]
    #[token(".")]
    #[token("...")]
    #[token("@")]
    #[token("::")]
    #[token("=")]
    #[token("==")]
    #[token("!")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token("<<")]
    #[token("<<=")]
    #[token(">")]
    #[token("+")]
    #[token("++")]
    #[token("+=")]
    #[token("-")]
    #[token("--")]
    #[token("-=")]
    #[token("->")]
    #[token("*")]
    #[token("*=")]
    #[token("/")]
    #[token("/=")]
    #[token("%")]
    #[token("%=")]
    #[token("&")]
    #[token("&&")]
    #[token("&=")]
    #[token("|")]
    #[token("||")]
    #[token("|=")]
    #[token("^")]
    #[token("^=")]
    #[token("~")]
    #[token("?")]
    #[token(":")]
    Punct,
}

fn block_comment(lex: &mut LogosLexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn doc_comment(lex: &mut LogosLexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    // `/**/` is an empty plain comment
    if lex.remainder().starts_with('/') {
        lex.bump(1);
        return Ok(());
    }
    block_comment(lex)
}

/// Token kinds produced by [`Lexer`]
///
/// There is deliberately no `>>`, `>>>` or `>=`: consecutive `>` always lex as
/// separate [`Token::Gt`] tokens so nested generic argument lists close cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Keywords
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    If,
    Implements,
    Import,
    InstanceOf,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,
    True,
    False,
    Null,

    Identifier,

    // Literals
    StringLiteral,
    CharLiteral,
    NumberLiteral,

    // Separators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    DoubleColon,

    // Operators
    Assign,
    Eq,
    Bang,
    Ne,
    Lt,
    Le,
    LShift,
    LShiftAssign,
    Gt,
    Plus,
    Inc,
    AddAssign,
    Minus,
    Dec,
    SubAssign,
    Arrow,
    Star,
    MulAssign,
    Slash,
    DivAssign,
    Percent,
    ModAssign,
    Amp,
    AndAnd,
    AndAssign,
    Pipe,
    PipePipe,
    OrAssign,
    Caret,
    XorAssign,
    Tilde,
    Question,
    Colon,

    /// `/** ... */` comment, full text including delimiters
    JavaDoc,
    /// Content of a balanced `{ ... }` block, see [`Lexer::capture_block`]
    CodeBlock,
    /// End of input sentinel
    Eof,
}

impl Token {
    /// Keyword for an identifier spelling, if it is one
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word {
            "abstract" => Token::Abstract,
            "assert" => Token::Assert,
            "boolean" => Token::Boolean,
            "break" => Token::Break,
            "byte" => Token::Byte,
            "case" => Token::Case,
            "catch" => Token::Catch,
            "char" => Token::Char,
            "class" => Token::Class,
            "continue" => Token::Continue,
            "default" => Token::Default,
            "do" => Token::Do,
            "double" => Token::Double,
            "else" => Token::Else,
            "enum" => Token::Enum,
            "extends" => Token::Extends,
            "final" => Token::Final,
            "finally" => Token::Finally,
            "float" => Token::Float,
            "for" => Token::For,
            "if" => Token::If,
            "implements" => Token::Implements,
            "import" => Token::Import,
            "instanceof" => Token::InstanceOf,
            "int" => Token::Int,
            "interface" => Token::Interface,
            "long" => Token::Long,
            "native" => Token::Native,
            "new" => Token::New,
            "package" => Token::Package,
            "private" => Token::Private,
            "protected" => Token::Protected,
            "public" => Token::Public,
            "return" => Token::Return,
            "short" => Token::Short,
            "static" => Token::Static,
            "strictfp" => Token::Strictfp,
            "super" => Token::Super,
            "switch" => Token::Switch,
            "synchronized" => Token::Synchronized,
            "this" => Token::This,
            "throw" => Token::Throw,
            "throws" => Token::Throws,
            "transient" => Token::Transient,
            "try" => Token::Try,
            "void" => Token::Void,
            "volatile" => Token::Volatile,
            "while" => Token::While,
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            _ => return None,
        };
        Some(token)
    }

    fn punctuation(text: &str) -> Option<Token> {
        let token = match text {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "{" => Token::LBrace,
            "}" => Token::RBrace,
            "[" => Token::LBracket,
            "]" => Token::RBracket,
            ";" => Token::Semicolon,
            "," => Token::Comma,
            "." => Token::Dot,
            "..." => Token::Ellipsis,
            "@" => Token::At,
            "::" => Token::DoubleColon,
            "=" => Token::Assign,
            "==" => Token::Eq,
            "!" => Token::Bang,
            "!=" => Token::Ne,
            "<" => Token::Lt,
            "<=" => Token::Le,
            "<<" => Token::LShift,
            "<<=" => Token::LShiftAssign,
            ">" => Token::Gt,
            "+" => Token::Plus,
            "++" => Token::Inc,
            "+=" => Token::AddAssign,
            "-" => Token::Minus,
            "--" => Token::Dec,
            "-=" => Token::SubAssign,
            "->" => Token::Arrow,
            "*" => Token::Star,
            "*=" => Token::MulAssign,
            "/" => Token::Slash,
            "/=" => Token::DivAssign,
            "%" => Token::Percent,
            "%=" => Token::ModAssign,
            "&" => Token::Amp,
            "&&" => Token::AndAnd,
            "&=" => Token::AndAssign,
            "|" => Token::Pipe,
            "||" => Token::PipePipe,
            "|=" => Token::OrAssign,
            "^" => Token::Caret,
            "^=" => Token::XorAssign,
            "~" => Token::Tilde,
            "?" => Token::Question,
            ":" => Token::Colon,
            _ => return None,
        };
        Some(token)
    }

    /// Check if this token is a modifier keyword
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Token::Public
                | Token::Protected
                | Token::Private
                | Token::Abstract
                | Token::Final
                | Token::Native
                | Token::Synchronized
                | Token::Transient
                | Token::Volatile
                | Token::Static
                | Token::Strictfp
        )
    }

    /// Check if this token is a primitive type (or `void`)
    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Token::Boolean
                | Token::Byte
                | Token::Short
                | Token::Int
                | Token::Long
                | Token::Char
                | Token::Float
                | Token::Double
                | Token::Void
        )
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::StringLiteral
                | Token::CharLiteral
                | Token::NumberLiteral
                | Token::True
                | Token::False
                | Token::Null
        )
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier => "identifier".to_string(),
            Token::StringLiteral => "string literal".to_string(),
            Token::CharLiteral => "character literal".to_string(),
            Token::NumberLiteral => "number".to_string(),
            Token::JavaDoc => "doc comment".to_string(),
            Token::CodeBlock => "code block".to_string(),
            Token::Eof => "end of input".to_string(),
            other => format!("{:?}", other),
        }
    }
}

/// Lexical token with location information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalToken {
    pub token: Token,
    /// Token text; identifiers are unicode-unescaped, everything else verbatim
    pub text: String,
    pub span: Span,
}

impl LexicalToken {
    pub fn new(token: Token, text: String, span: Span) -> Self {
        Self { token, text, span }
    }

    pub fn token_type(&self) -> Token {
        self.token
    }

    pub fn lexeme(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> Location {
        self.span.start
    }

    pub fn is(&self, token_type: Token) -> bool {
        self.token == token_type
    }
}

/// Pull lexer over one compilation unit.
///
/// Besides ordinary tokens it supports [`Lexer::capture_block`], which the parser
/// calls right after a body-opening `{` to receive the whole balanced block as
/// one opaque token.
pub struct Lexer<'a> {
    source: &'a str,
    inner: LogosLexer<'a, RawToken>,
    position: Location,
    current_text: String,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut inner = RawToken::lexer(source);
        let mut position = Location::start();
        if source.starts_with('\u{FEFF}') {
            let bom = '\u{FEFF}'.len_utf8();
            inner.bump(bom);
            position.offset = bom;
        }
        Self {
            source,
            inner,
            position,
            current_text: String::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset just past the last consumed token
    pub fn offset(&self) -> usize {
        self.source.len() - self.inner.remainder().len()
    }

    /// Text of the most recently returned token
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    fn location_at(&mut self, offset: usize) -> Location {
        if offset > self.position.offset {
            let skipped = &self.source[self.position.offset..offset];
            self.position.advance_str(skipped);
        }
        self.position
    }

    /// Get the next token; returns [`Token::Eof`] for every call once input is exhausted
    pub fn next_token(&mut self) -> ParseResult<LexicalToken> {
        loop {
            let raw = match self.inner.next() {
                Some(raw) => raw,
                None => {
                    let end = self.source.len();
                    let location = self.location_at(end);
                    self.current_text.clear();
                    return Ok(LexicalToken::new(Token::Eof, String::new(), Span::new(location, end..end)));
                }
            };
            let bytes = self.inner.span();
            let slice = self.inner.slice();
            let location = self.location_at(bytes.start);

            let (token, text) = match raw {
                Err(kind) => {
                    return Err(ParseError::lexical(format!("{} '{}'", kind, slice.escape_debug()), location));
                }
                Ok(RawToken::LineComment) | Ok(RawToken::BlockComment) => continue,
                Ok(RawToken::DocComment) if slice == "/**/" => continue,
                Ok(RawToken::DocComment) => (Token::JavaDoc, slice.to_string()),
                Ok(RawToken::Word) => {
                    let word = decode_unicode_escapes(slice);
                    let token = Token::keyword(&word).unwrap_or(Token::Identifier);
                    (token, word.into_owned())
                }
                Ok(RawToken::Number) => (Token::NumberLiteral, slice.to_string()),
                Ok(RawToken::Str) => (Token::StringLiteral, slice.to_string()),
                Ok(RawToken::Char) => (Token::CharLiteral, slice.to_string()),
                Ok(RawToken::Punct) => match Token::punctuation(slice) {
                    Some(token) => (token, slice.to_string()),
                    None => return Err(ParseError::lexical(format!("unknown operator '{}'", slice), location)),
                },
            };

            self.current_text.clear();
            self.current_text.push_str(&text);
            return Ok(LexicalToken::new(token, text, Span::new(location, bytes)));
        }
    }

    /// Capture the remainder of a block whose opening `{` was the last token returned.
    ///
    /// Returns a [`Token::CodeBlock`] whose text is the verbatim content between the
    /// braces. Braces inside string/char literals and comments do not count.
    pub fn capture_block(&mut self) -> ParseResult<LexicalToken> {
        let start = self.offset();
        let rest = self.inner.remainder();
        let bytes = rest.as_bytes();
        let mut depth = 1usize;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = rest[..i].to_string();
                        self.inner.bump(i + 1);
                        let location = self.location_at(start);
                        self.current_text.clear();
                        self.current_text.push_str(&body);
                        return Ok(LexicalToken::new(
                            Token::CodeBlock,
                            body,
                            Span::new(location, start..start + i + 1),
                        ));
                    }
                }
                b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                    i = match find(bytes, i + 3, b"\"\"\"") {
                        Some(end) => end + 2,
                        None => bytes.len(),
                    };
                }
                b'"' | b'\'' => i = skip_quoted(bytes, i),
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    i = find(bytes, i, b"\n").unwrap_or(bytes.len());
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => match find(bytes, i + 2, b"*/") {
                    Some(end) => i = end + 1,
                    None => {
                        let location = self.location_at(start + i);
                        return Err(ParseError::lexical(LexErrorKind::UnterminatedComment.to_string(), location));
                    }
                },
                _ => {}
            }
            i += 1;
        }
        let location = self.location_at(self.source.len());
        Err(ParseError::unexpected_end_of_input("'}' closing code block", location))
    }

    /// Lex the whole input, excluding the end-of-input sentinel
    pub fn tokenize(mut self) -> ParseResult<Vec<LexicalToken>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.is(Token::Eof) {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = ParseResult<LexicalToken>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.is(Token::Eof) => None,
            other => Some(other),
        }
    }
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Index of the closing quote of the literal opened at `start`
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Decode `\uXXXX` escapes (any number of `u`s), pairing surrogates
pub fn decode_unicode_escapes(text: &str) -> Cow<'_, str> {
    if !text.contains("\\u") {
        return Cow::Borrowed(text);
    }
    let mut units: Vec<u16> = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch == '\\' {
            let rest = &text[idx + 1..];
            let us = rest.chars().take_while(|c| *c == 'u').count();
            let hex = rest.get(us..us + 4);
            if us > 0 {
                if let Some(value) = hex.and_then(|h| u16::from_str_radix(h, 16).ok()) {
                    units.push(value);
                    for _ in 0..us + 4 {
                        chars.next();
                    }
                    continue;
                }
            }
        }
        flush_units(&mut units, &mut out);
        out.push(ch);
    }
    flush_units(&mut units, &mut out);
    Cow::Owned(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .expect("Failed to tokenize")
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_lexer_keywords() {
        assert_eq!(
            kinds("public class Test extends Object implements Interface"),
            vec![
                Token::Public,
                Token::Class,
                Token::Identifier,
                Token::Extends,
                Token::Identifier,
                Token::Implements,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn test_lexer_literals() {
        assert_eq!(
            kinds(r#"42 "hello" 'a' true false null 0x1F 3.5e10f .5 10L"#),
            vec![
                Token::NumberLiteral,
                Token::StringLiteral,
                Token::CharLiteral,
                Token::True,
                Token::False,
                Token::Null,
                Token::NumberLiteral,
                Token::NumberLiteral,
                Token::NumberLiteral,
                Token::NumberLiteral,
            ]
        );
    }

    #[test]
    fn test_shift_like_sequences_stay_split() {
        assert_eq!(
            kinds("List<List<X>>"),
            vec![
                Token::Identifier,
                Token::Lt,
                Token::Identifier,
                Token::Lt,
                Token::Identifier,
                Token::Gt,
                Token::Gt,
            ]
        );
        assert_eq!(kinds(">>>"), vec![Token::Gt, Token::Gt, Token::Gt]);
        assert_eq!(kinds("<<"), vec![Token::LShift]);
    }

    #[test]
    fn test_comments_skipped_and_docs_kept() {
        assert!(kinds("// a comment \"\n/* block ' */ /**/").is_empty());
        let tokens = Lexer::new("/** doc */ int").tokenize().unwrap();
        assert_eq!(tokens[0].token, Token::JavaDoc);
        assert_eq!(tokens[0].text, "/** doc */");
        assert_eq!(tokens[1].token, Token::Int);
    }

    #[test]
    fn test_unicode_escaped_keyword() {
        let tokens = Lexer::new(r"class A\uu0062").tokenize().unwrap();
        assert_eq!(tokens[0].token, Token::Class);
        assert_eq!(tokens[1].token, Token::Identifier);
        assert_eq!(tokens[1].text, "Ab");
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("int\n  x;").tokenize().unwrap();
        assert_eq!(tokens[1].location().line, 2);
        assert_eq!(tokens[1].location().column, 3);
    }

    #[test]
    fn test_capture_block_skips_literal_braces() {
        let source = r#"{ String s = "}"; char c = '{'; /* } */ // }
            if (x) { y(); } } int"#;
        let mut lexer = Lexer::new(source);
        assert_eq!(lexer.next_token().unwrap().token, Token::LBrace);
        let block = lexer.capture_block().unwrap();
        assert_eq!(block.token, Token::CodeBlock);
        assert!(block.text.contains("if (x) { y(); }"));
        assert!(block.text.ends_with(' '));
        assert_eq!(lexer.next_token().unwrap().token, Token::Int);
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let mut lexer = Lexer::new("{ never closed");
        lexer.next_token().unwrap();
        assert!(lexer.capture_block().is_err());
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().unwrap().token, Token::Identifier);
        assert_eq!(lexer.current_text(), "x");
        assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
        assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
    }
}
