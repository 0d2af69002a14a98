//! Lexical scanner for NLex source text.
//!
//! [`tokenize`] makes one left-to-right pass and returns the token
//! sequence together with the lexical errors it hit along the way. The
//! scanner never aborts: unterminated strings and stray characters are
//! recorded as [`LexError`] entries and scanning resumes at the next
//! character.

use serde_json::json;

use crate::error::LexError;

/// Structural keywords, classified as [`Token::Keyword`].
const KEYWORDS: [&str; 10] = [
    "operacion",
    "nombre",
    "valor1",
    "valor2",
    "ConfiguracionesLex",
    "ConfiguracionesParser",
    "fondo",
    "fuente",
    "forma",
    "tipoFuente",
];

/// Operation names, classified as [`Token::Operation`]. `inverso` is
/// not in this list: it scans as an identifier and is recognized by the
/// resolver instead.
const OPERATIONS: [&str; 10] = [
    "suma",
    "resta",
    "multiplicacion",
    "division",
    "potencia",
    "raiz",
    "seno",
    "coseno",
    "tangente",
    "mod",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Structural keyword (`operacion`, `valor1`, `fondo`, ...)
    Keyword(String),
    /// Fixed operation name (`suma`, `resta`, ...)
    Operation(String),
    /// Any other word -- block names such as `Operaciones` and function
    /// names such as `imprimir` arrive as identifiers
    Ident(String),
    /// Quoted string literal (content without quotes, kept verbatim --
    /// no escape processing)
    Str(String),
    /// Numeric literal (digits and dots, no sign, no exponent)
    Number(f64),
    // Punctuation
    Assign,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    LParen,
    RParen,
}

impl Token {
    /// Wire name of the token kind, as reported in JSON token dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Keyword(_) => "KEYWORD",
            Token::Operation(_) => "OPERATION",
            Token::Ident(_) => "IDENTIFIER",
            Token::Str(_) => "STRING",
            Token::Number(_) => "NUMBER",
            Token::Assign => "ASSIGN",
            Token::LBrace => "LBRACE",
            Token::RBrace => "RBRACE",
            Token::LBracket => "LBRACKET",
            Token::RBracket => "RBRACKET",
            Token::Colon => "COLON",
            Token::Comma => "COMMA",
            Token::LParen => "LPAREN",
            Token::RParen => "RPAREN",
        }
    }

    /// The token's lexeme. Numbers use their `f64` display form; string
    /// literals yield their content without quotes.
    pub fn lexeme(&self) -> String {
        match self {
            Token::Keyword(word)
            | Token::Operation(word)
            | Token::Ident(word)
            | Token::Str(word) => word.clone(),
            Token::Number(value) => value.to_string(),
            Token::Assign => "=".to_owned(),
            Token::LBrace => "{".to_owned(),
            Token::RBrace => "}".to_owned(),
            Token::LBracket => "[".to_owned(),
            Token::RBracket => "]".to_owned(),
            Token::Colon => ":".to_owned(),
            Token::Comma => ",".to_owned(),
            Token::LParen => "(".to_owned(),
            Token::RParen => ")".to_owned(),
        }
    }
}

/// A token together with its recorded source position.
///
/// Positions follow the scanner cursor: symbols record their own
/// position, while words, numbers and strings record the position
/// immediately after their lexeme. The first character of a line is
/// column 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}

impl Spanned {
    /// JSON record for token reports: `{kind, value, line, column}`.
    /// `value` is a JSON number for `Number` tokens and the lexeme
    /// string otherwise.
    pub fn to_json_value(&self) -> serde_json::Value {
        let value = match &self.token {
            Token::Number(n) => json!(n),
            other => json!(other.lexeme()),
        };
        json!({
            "kind": self.token.kind(),
            "value": value,
            "line": self.line,
            "column": self.column,
        })
    }
}

/// Output of one scanner pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexResult {
    pub tokens: Vec<Spanned>,
    pub errors: Vec<LexError>,
}

/// Tokenize NLex source text.
pub fn tokenize(source: &str) -> LexResult {
    let mut scanner = Scanner {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    scanner.run();
    LexResult {
        tokens: scanner.tokens,
        errors: scanner.errors,
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Spanned>,
    errors: Vec<LexError>,
}

impl Scanner {
    fn cur(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if self.cur() == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
        self.pos += 1;
        self.column += 1;
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(Spanned {
            token,
            line: self.line,
            column: self.column,
        });
    }

    fn run(&mut self) {
        while let Some(c) = self.cur() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && (self.peek() == Some('/') || self.peek() == Some('*')) {
                self.skip_comment();
            } else if c.is_ascii_alphabetic() {
                self.lex_word();
            } else if c.is_ascii_digit() || c == '.' {
                self.lex_number();
            } else if c == '"' {
                self.lex_string();
            } else {
                self.lex_symbol(c);
            }
        }
    }

    /// `//` runs to the end of the line, `/* ... */` through the
    /// closing delimiter. A block comment left open consumes the rest
    /// of the input without raising an error.
    fn skip_comment(&mut self) {
        if self.peek() == Some('/') {
            while let Some(c) = self.cur() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
        } else {
            self.advance();
            self.advance();
            while let Some(c) = self.cur() {
                if c == '*' && self.peek() == Some('/') {
                    break;
                }
                self.advance();
            }
            self.advance();
            self.advance();
        }
    }

    /// A word is an ASCII letter followed by letters and digits, so
    /// `valor1` and `valor2` scan as single keyword tokens.
    fn lex_word(&mut self) {
        let mut word = String::new();
        while let Some(c) = self.cur() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            word.push(c);
            self.advance();
        }
        let token = if KEYWORDS.contains(&word.as_str()) {
            Token::Keyword(word)
        } else if OPERATIONS.contains(&word.as_str()) {
            Token::Operation(word)
        } else {
            Token::Ident(word)
        };
        self.push(token);
    }

    /// Collect a run of digits and dots and parse it as `f64`. A run
    /// that does not parse (`1.2.3`, a lone `.`) is recorded whole as
    /// an invalid symbol and produces no token.
    fn lex_number(&mut self) {
        let mut run = String::new();
        while let Some(c) = self.cur() {
            if !c.is_ascii_digit() && c != '.' {
                break;
            }
            run.push(c);
            self.advance();
        }
        match run.parse::<f64>() {
            Ok(value) => self.push(Token::Number(value)),
            Err(_) => {
                self.errors
                    .push(LexError::invalid_symbol(run, self.line, self.column));
            }
        }
    }

    /// Strings collect characters verbatim, newlines included. Hitting
    /// end of input first records an unclosed-string error located at
    /// the opening quote, carrying the partial content; no token is
    /// produced.
    fn lex_string(&mut self) {
        let start_line = self.line;
        let start_column = self.column;
        self.advance();
        let mut text = String::new();
        loop {
            match self.cur() {
                Some('"') => {
                    self.advance();
                    self.push(Token::Str(text));
                    return;
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    self.errors
                        .push(LexError::unclosed_string(text, start_line, start_column));
                    return;
                }
            }
        }
    }

    fn lex_symbol(&mut self, c: char) {
        let token = match c {
            '=' => Some(Token::Assign),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        match token {
            Some(token) => self.push(token),
            None => {
                self.errors.push(LexError::invalid_symbol(
                    c.to_string(),
                    self.line,
                    self.column,
                ));
            }
        }
        self.advance();
    }
}

// ──────────────────────────────────────────────
