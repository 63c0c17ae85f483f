// ABOUTME: Lexer turning source text into a token stream for the parser

use crate::token::{keyword_kind, Token, TokenKind};

/// Tokenizes a complete source string.
///
/// Unknown characters are reported to stderr and skipped (see the failure
/// semantics for lex errors) rather than aborting tokenization, so the
/// lexer always terminates and always ends with an `Eof` token.
pub struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    src: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            src,
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn make(&self, kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Token {
        Token::new(kind, lexeme, line, column)
    }

    fn next_token(&mut self) -> Token {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }

        let line = self.line;
        let column = self.column;

        let c = match self.advance() {
            Some(c) => c,
            None => return self.make(TokenKind::Eof, "", line, column),
        };

        match c {
            '\n' => self.make(TokenKind::Newline, "\n", line, column),
            '0'..='9' => self.lex_number(c, line, column),
            '"' | '\'' => self.lex_string(c, line, column),
            c if c.is_alphabetic() || c == '_' => self.lex_identifier(c, line, column),

            '+' => self.lex_plus(line, column),
            '-' => self.lex_minus(line, column),
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    self.make(TokenKind::StarStar, "**", line, column)
                } else if self.peek() == Some('=') {
                    self.advance();
                    self.make(TokenKind::StarEq, "*=", line, column)
                } else {
                    self.make(TokenKind::Star, "*", line, column)
                }
            }
            '/' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make(TokenKind::SlashEq, "/=", line, column)
                } else {
                    self.make(TokenKind::Slash, "/", line, column)
                }
            }
            '%' => self.make(TokenKind::Percent, "%", line, column),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make(TokenKind::EqEq, "==", line, column)
                } else if self.peek() == Some('>') {
                    self.advance();
                    self.make(TokenKind::FatArrow, "=>", line, column)
                } else {
                    self.make(TokenKind::Eq, "=", line, column)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make(TokenKind::BangEq, "!=", line, column)
                } else {
                    self.lex_unknown(c, line, column)
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make(TokenKind::LtEq, "<=", line, column)
                } else {
                    self.make(TokenKind::Lt, "<", line, column)
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make(TokenKind::GtEq, ">=", line, column)
                } else {
                    self.make(TokenKind::Gt, ">", line, column)
                }
            }
            '&' => self.make(TokenKind::Amp, "&", line, column),
            '|' => self.make(TokenKind::Pipe, "|", line, column),
            '^' => self.make(TokenKind::Caret, "^", line, column),
            '~' => self.make(TokenKind::Tilde, "~", line, column),
            '(' => self.make(TokenKind::LParen, "(", line, column),
            ')' => self.make(TokenKind::RParen, ")", line, column),
            '{' => self.make(TokenKind::LBrace, "{", line, column),
            '}' => self.make(TokenKind::RBrace, "}", line, column),
            '[' => self.make(TokenKind::LBracket, "[", line, column),
            ']' => self.make(TokenKind::RBracket, "]", line, column),
            ',' => self.make(TokenKind::Comma, ",", line, column),
            ':' => self.make(TokenKind::Colon, ":", line, column),
            '.' => self.make(TokenKind::Dot, ".", line, column),

            other => self.lex_unknown(other, line, column),
        }
    }

    fn lex_plus(&mut self, line: usize, column: usize) -> Token {
        match self.peek() {
            Some('+') => {
                self.advance();
                self.make(TokenKind::PlusPlus, "++", line, column)
            }
            Some('=') => {
                self.advance();
                self.make(TokenKind::PlusEq, "+=", line, column)
            }
            _ => self.make(TokenKind::Plus, "+", line, column),
        }
    }

    fn lex_minus(&mut self, line: usize, column: usize) -> Token {
        match self.peek() {
            Some('-') => {
                self.advance();
                self.make(TokenKind::MinusMinus, "--", line, column)
            }
            Some('=') => {
                self.advance();
                self.make(TokenKind::MinusEq, "-=", line, column)
            }
            _ => self.make(TokenKind::Minus, "-", line, column),
        }
    }

    fn lex_number(&mut self, first: char, line: usize, column: usize) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
            lexeme.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    lexeme.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let value: f64 = lexeme.parse().unwrap_or(0.0);
        self.make(TokenKind::Number(value), lexeme, line, column)
    }

    fn lex_string(&mut self, quote: char, line: usize, column: usize) -> Token {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => break,
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some(other) => value.push(other),
                    None => break,
                },
                Some(c) => value.push(c),
            }
        }
        self.make(TokenKind::String(value.clone()), value, line, column)
    }

    fn lex_identifier(&mut self, first: char, line: usize, column: usize) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = keyword_kind(&lexeme).unwrap_or_else(|| TokenKind::Identifier(lexeme.clone()));
        self.make(kind, lexeme, line, column)
    }

    fn lex_unknown(&mut self, c: char, line: usize, column: usize) -> Token {
        eprintln!(
            "lex error: unexpected character '{}' at {}:{}:{} (skipped)",
            c, source_name(self.src), line, column
        );
        self.next_token()
    }
}

fn source_name(_src: &str) -> &'static str {
    "<source>"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_numbers_and_operators() {
        let ks = kinds("1 + 2.5 * 3");
        assert_eq!(
            ks,
            vec![
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Number(2.5),
                TokenKind::Star,
                TokenKind::Number(3.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_keywords_vs_identifiers() {
        let ks = kinds("let x = fn");
        assert_eq!(
            ks,
            vec![
                TokenKind::Let,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Eq,
                TokenKind::Fn,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_multi_char_operators_greedily() {
        let ks = kinds("a += 1 ** 2 == b");
        assert_eq!(
            ks,
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::PlusEq,
                TokenKind::Number(1.0),
                TokenKind::StarStar,
                TokenKind::Number(2.0),
                TokenKind::EqEq,
                TokenKind::Identifier("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes_are_decoded() {
        let ks = kinds(r#""a\nb\tc\\d""#);
        assert_eq!(ks, vec![TokenKind::String("a\nb\tc\\d".to_string()), TokenKind::Eof]);
    }

    #[test]
    fn line_comment_is_discarded() {
        let ks = kinds("1 # comment\n2");
        assert_eq!(
            ks,
            vec![
                TokenKind::Number(1.0),
                TokenKind::Newline,
                TokenKind::Number(2.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenization_always_terminates_with_eof() {
        for src in ["", "   ", "@@@", "let x = 1\n\n\n"] {
            let tokens = Lexer::new(src).tokenize();
            assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        }
    }
}
