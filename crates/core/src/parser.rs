//! Recursive-descent parser for the NLex token stream.
//!
//! [`parse`] is infallible: it always returns a (possibly partial)
//! [`Ast`] next to the accumulated syntactic errors. Block and function
//! names are recognized by word value, never by token kind, so a quoted
//! string is accepted anywhere a bare word is expected.
//!
//! When a construct aborts, the parser resynchronizes by skipping to
//! the next closing bracket at the current depth or to the next word
//! that can start a top-level construct. That bounds the error cascade
//! of one broken construct while guaranteeing forward progress.

use std::collections::BTreeMap;

use crate::ast::{Arg, Ast, Instruction, Operand, Operation};
use crate::error::SyntaxError;
use crate::lexer::{Spanned, Token};

/// Function names accepted by the top-level dispatch.
const FUNCTIONS: [&str; 6] = [
    "imprimir",
    "conteo",
    "promedio",
    "max",
    "min",
    "generarReporte",
];

fn starts_construct(word: &str) -> bool {
    word == "Operaciones"
        || word == "ConfiguracionesLex"
        || word == "ConfiguracionesParser"
        || FUNCTIONS.contains(&word)
}

/// Parse a token sequence into an AST plus accumulated syntactic
/// errors.
pub fn parse(tokens: &[Spanned]) -> (Ast, Vec<SyntaxError>) {
    let mut parser = Parser::new(tokens);
    parser.run();
    (parser.ast, parser.errors)
}

#[derive(Clone, Copy)]
enum ConfigKind {
    Lex,
    Parser,
}

impl ConfigKind {
    fn block_name(self) -> &'static str {
        match self {
            ConfigKind::Lex => "ConfiguracionesLex",
            ConfigKind::Parser => "ConfiguracionesParser",
        }
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    ast: Ast,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser {
            tokens,
            pos: 0,
            ast: Ast::default(),
            errors: Vec::new(),
        }
    }

    fn cur(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn is(&self, token: &Token) -> bool {
        self.cur().map(|s| &s.token) == Some(token)
    }

    /// The value of the current token when it is word-like (keyword,
    /// operation, identifier or string).
    fn word_value(&self) -> Option<&'a str> {
        match self.cur().map(|s| &s.token) {
            Some(Token::Keyword(w))
            | Some(Token::Operation(w))
            | Some(Token::Ident(w))
            | Some(Token::Str(w)) => Some(w),
            _ => None,
        }
    }

    /// Record a syntactic error at the current token. At end of input
    /// the error anchors to the last token's position with an empty
    /// value.
    fn error_here(&mut self, message: impl Into<String>) {
        let err = match self.cur() {
            Some(spanned) => SyntaxError::new(
                message,
                spanned.line,
                spanned.column,
                spanned.token.lexeme(),
            ),
            None => {
                let (line, column) = self
                    .tokens
                    .last()
                    .map(|s| (s.line, s.column))
                    .unwrap_or((0, 0));
                SyntaxError::new(message, line, column, "")
            }
        };
        self.errors.push(err);
    }

    // -- Top-level dispatch -------------------------------------

    fn run(&mut self) {
        while !self.at_end() {
            let completed = match self.word_value() {
                Some("Operaciones") => self.parse_operations_block(),
                Some("ConfiguracionesLex") => self.parse_config_block(ConfigKind::Lex),
                Some("ConfiguracionesParser") => self.parse_config_block(ConfigKind::Parser),
                Some(word) if FUNCTIONS.contains(&word) => self.parse_function_call(word),
                _ => {
                    let value = self.cur().map(|s| s.token.lexeme()).unwrap_or_default();
                    self.error_here(format!("unexpected token: {}", value));
                    self.advance();
                    true
                }
            };
            if !completed {
                self.recover_to_next_construct();
            }
        }
    }

    /// Skip tokens until a closing bracket at the original depth is
    /// consumed, a word that can start a top-level construct appears at
    /// depth 0 (left unconsumed), or the input ends.
    fn recover_to_next_construct(&mut self) {
        let mut depth: i32 = 0;
        while let Some(spanned) = self.cur() {
            match &spanned.token {
                Token::LBrace | Token::LBracket | Token::LParen => {
                    depth += 1;
                    self.advance();
                }
                Token::RBrace | Token::RBracket | Token::RParen => {
                    if depth <= 0 {
                        // Consume the closer that ends the broken construct
                        self.advance();
                        return;
                    }
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    if depth == 0 && self.word_value().is_some_and(starts_construct) {
                        return;
                    }
                    self.advance();
                }
            }
        }
    }

    // -- Configuration blocks -----------------------------------

    /// `Name '=' '[' (Key ':' STRING (',' Key ':' STRING)*)? ']'`
    ///
    /// Configuration values are strings only. On failure the partially
    /// built map is discarded; on success it replaces the AST's map for
    /// this kind wholesale.
    fn parse_config_block(&mut self, kind: ConfigKind) -> bool {
        self.advance();

        if !self.is(&Token::Assign) {
            self.error_here(format!("expected '=' after '{}'", kind.block_name()));
            return false;
        }
        self.advance();

        if !self.is(&Token::LBracket) {
            self.error_here("expected '[' after '='");
            return false;
        }
        self.advance();

        let mut config = BTreeMap::new();
        let mut expecting_key = true;
        while !self.is(&Token::RBracket) && !self.at_end() {
            if expecting_key {
                let Some(key) = self.word_value() else {
                    self.error_here("expected a configuration key");
                    break;
                };
                let key = key.to_owned();
                self.advance();

                if !self.is(&Token::Colon) {
                    self.error_here("expected ':' after the key");
                    break;
                }
                self.advance();

                let value = match self.cur().map(|s| &s.token) {
                    Some(Token::Str(value)) => value.clone(),
                    _ => {
                        self.error_here("expected a configuration value");
                        break;
                    }
                };
                self.advance();
                config.insert(key, value);
                expecting_key = false;
            } else if self.is(&Token::Comma) {
                self.advance();
                expecting_key = true;
            } else {
                self.error_here("expected ',' or ']'");
                break;
            }
        }

        if !self.is(&Token::RBracket) {
            self.error_here("expected ']' to close the configuration block");
            return false;
        }
        self.advance();

        match kind {
            ConfigKind::Lex => self.ast.lex_config = config,
            ConfigKind::Parser => self.ast.parser_config = config,
        }
        true
    }

    // -- Operations ---------------------------------------------

    /// `Operaciones '=' '[' (Operation (',' Operation)*)? ']'`
    ///
    /// Operations parsed before a later failure stay in the AST.
    fn parse_operations_block(&mut self) -> bool {
        self.advance();

        if !self.is(&Token::Assign) {
            self.error_here("expected '=' after 'Operaciones'");
            return false;
        }
        self.advance();

        if !self.is(&Token::LBracket) {
            self.error_here("expected '[' after '='");
            return false;
        }
        self.advance();

        let mut expecting_operation = true;
        while !self.is(&Token::RBracket) && !self.at_end() {
            if expecting_operation {
                match self.parse_operation() {
                    Some(operation) => {
                        self.ast.operations.push(operation);
                        expecting_operation = false;
                    }
                    None => break,
                }
            } else if self.is(&Token::Comma) {
                self.advance();
                expecting_operation = true;
            } else {
                self.error_here("expected ',' or ']'");
                break;
            }
        }

        if !self.is(&Token::RBracket) {
            self.error_here("expected ']' to close the operations block");
            return false;
        }
        self.advance();
        true
    }

    /// `'{' Key ':' Value (',' Key ':' Value)* '}'` -- at least one
    /// pair. A trailing comma before `}` is an error (the comma
    /// promises another pair).
    fn parse_operation(&mut self) -> Option<Operation> {
        if !self.is(&Token::LBrace) {
            self.error_here("expected '{' to start an operation");
            return None;
        }
        self.advance();

        let mut operation = Operation::default();
        let mut expecting_key = true;
        let mut closed = false;
        while !self.at_end() && !closed {
            if expecting_key {
                let Some(key) = self.word_value() else {
                    self.error_here("expected an operation key");
                    break;
                };
                let key = key.to_owned();
                self.advance();

                if !self.is(&Token::Colon) {
                    self.error_here("expected ':' after the key");
                    break;
                }
                self.advance();

                match self.parse_operand_value() {
                    Some(value) => {
                        operation.entries.insert(key, value);
                    }
                    None => {
                        self.error_here("invalid operation value");
                        break;
                    }
                }
                expecting_key = false;
            } else if self.is(&Token::Comma) {
                self.advance();
                expecting_key = true;
            } else if self.is(&Token::RBrace) {
                self.advance();
                closed = true;
            } else {
                self.error_here("expected ',' or '}'");
                break;
            }
        }

        if !closed {
            self.error_here("expected '}' to close the operation");
            return None;
        }
        Some(operation)
    }

    /// NUMBER, STRING, or a bracketed nested operation -- the only
    /// recursive production. Anything else yields `None` and the caller
    /// reports the error at the offending token.
    fn parse_operand_value(&mut self) -> Option<Operand> {
        match self.cur().map(|s| &s.token) {
            Some(Token::Number(value)) => {
                let value = *value;
                self.advance();
                Some(Operand::Number(value))
            }
            Some(Token::Str(text)) => {
                let text = text.clone();
                self.advance();
                Some(Operand::Text(text))
            }
            Some(Token::LBracket) => {
                self.advance();
                let nested = self.parse_operation();
                if !self.is(&Token::RBracket) {
                    self.error_here("expected ']' to close the nested operation");
                    return None;
                }
                self.advance();
                nested.map(|operation| Operand::Nested(Box::new(operation)))
            }
            _ => None,
        }
    }

    // -- Function calls -----------------------------------------

    /// `FnName '(' (Arg (',' Arg)*)? ')'` with string or number
    /// arguments. The instruction is appended only once the closing
    /// `)` is reached.
    fn parse_function_call(&mut self, name: &str) -> bool {
        let function_name = name.to_owned();
        self.advance();

        if !self.is(&Token::LParen) {
            self.error_here(format!("expected '(' after '{}'", function_name));
            return false;
        }
        self.advance();

        let mut arguments = Vec::new();
        let mut expecting_arg = true;
        while !self.is(&Token::RParen) && !self.at_end() {
            if expecting_arg {
                let arg = match self.cur().map(|s| &s.token) {
                    Some(Token::Str(text)) => Arg::Str(text.clone()),
                    Some(Token::Number(value)) => Arg::Number(*value),
                    _ => {
                        self.error_here("expected a string or number argument");
                        break;
                    }
                };
                self.advance();
                arguments.push(arg);
                expecting_arg = false;
            } else if self.is(&Token::Comma) {
                self.advance();
                expecting_arg = true;
            } else {
                self.error_here("expected ',' or ')'");
                break;
            }
        }

        if !self.is(&Token::RParen) {
            self.error_here("expected ')' to close the function call");
            return false;
        }
        self.advance();

        self.ast.instructions.push(Instruction {
            function_name,
            arguments,
        });
        true
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
