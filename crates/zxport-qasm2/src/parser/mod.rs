//! Parser for `OpenQASM` 2.0.

mod expression;
mod lowering;
mod statement;

pub use lowering::build_ir;

use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use tracing::{debug, info, instrument};
use zxport_ir::Circuit;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult, Position};
use crate::lexer::{IntValue, SpannedToken, Token, tokenize};

/// Deepest expression the parser accepts, counting open parentheses and
/// negations as well as the height of the resulting expression tree.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

/// Options controlling how OpenQASM text is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Require the `OPENQASM 2.0;` header as the first statement.
    pub rigorous: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::rigorous()
    }
}

impl ImportOptions {
    /// Header required.
    pub fn rigorous() -> Self {
        Self { rigorous: true }
    }

    /// Header optional.
    pub fn relaxed() -> Self {
        Self { rigorous: false }
    }

    /// Set whether the header is required.
    #[must_use]
    pub fn with_rigorous(mut self, rigorous: bool) -> Self {
        self.rigorous = rigorous;
        self
    }
}

/// Parse a QASM2 source string into a Circuit, requiring the header.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    import_from_text(source, true)
}

/// Parse QASM2 text into a Circuit.
///
/// With `rigorous` set the text must start with `OPENQASM 2.0;`; otherwise
/// the header may be omitted.
#[instrument(skip(source), fields(bytes = source.len()))]
pub fn import_from_text(source: &str, rigorous: bool) -> ParseResult<Circuit> {
    let program = parse_program(source, rigorous)?;
    debug!(
        statements = program.statements.len(),
        header = program.version.is_some(),
        "parsed program"
    );

    let circuit = build_ir(&program)?;
    info!(
        qubits = circuit.num_qubits(),
        clbits = circuit.num_clbits(),
        ops = circuit.num_ops(),
        "imported OpenQASM 2.0 circuit"
    );
    Ok(circuit)
}

/// Parse QASM2 text using the given options.
pub fn import(source: &str, options: &ImportOptions) -> ParseResult<Circuit> {
    import_from_text(source, options.rigorous)
}

/// Read a QASM2 file and parse it into a Circuit.
///
/// Read failures are reported as [`ParseError::Io`], separately from syntax
/// errors in the file contents.
pub fn import_from_file(path: impl AsRef<Path>, rigorous: bool) -> ParseResult<Circuit> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading OpenQASM file");
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_from_text(&source, rigorous)
}

/// Parse a QASM2 source string into an AST Program.
pub fn parse_program(source: &str, rigorous: bool) -> ParseResult<Program> {
    let mut parser = Parser::new(source, rigorous)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    rigorous: bool,
    /// Declared register names, quantum and classical together.
    pub(super) registers: FxHashSet<String>,
    /// Declared gate macros: name -> (parameters, qubits).
    pub(super) macros: FxHashMap<String, (usize, usize)>,
    /// Open parentheses and negations around the current expression token.
    pub(super) nesting: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str, rigorous: bool) -> ParseResult<Self> {
        let tokens = tokenize(source).collect::<ParseResult<Vec<_>>>()?;
        Ok(Self {
            tokens,
            pos: 0,
            rigorous,
            registers: FxHashSet::default(),
            macros: FxHashMap::default(),
            nesting: 0,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Position of the current token, or of the last token at end of input.
    pub(super) fn current_position(&self) -> Position {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.position)
            .unwrap_or_default()
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Error for the current token not matching `expected`.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                position: self.current_position(),
                expected: expected.to_string(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        if self.check(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        let version = if self.check(&Token::OpenQasm) {
            Some(self.parse_version()?)
        } else if self.rigorous {
            return Err(ParseError::MissingHeader {
                position: self.current_position(),
                found: self
                    .peek()
                    .map_or_else(|| "end of input".to_string(), |t| format!("'{t}'")),
            });
        } else {
            None
        };

        let mut statements = Vec::new();
        while !self.is_eof() {
            if self.check(&Token::Include) {
                self.parse_include()?;
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    /// Parse the `OPENQASM <version>;` header.
    #[allow(clippy::float_cmp)]
    fn parse_version(&mut self) -> ParseResult<String> {
        self.expect(Token::OpenQasm)?;
        let position = self.current_position();
        match self.advance() {
            Some(Token::FloatLiteral(v)) if v == 2.0 => {}
            Some(Token::IntLiteral(IntValue::Exact(2))) => {}
            Some(other) => {
                return Err(ParseError::InvalidVersion {
                    position,
                    version: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        }
        self.expect(Token::Semicolon)?;
        Ok("2.0".to_string())
    }

    /// Parse and discard an `include "file";` statement.
    fn parse_include(&mut self) -> ParseResult<()> {
        self.expect(Token::Include)?;
        match self.peek() {
            Some(Token::StringLiteral(path)) => {
                debug!(path = %path, "ignoring include");
                self.pos += 1;
            }
            _ => return Err(self.unexpected("string literal")),
        }
        self.expect(Token::Semicolon)
    }

    /// Parse identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Identifier(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse an integer literal.
    pub(super) fn parse_int_literal(&mut self) -> ParseResult<u64> {
        let position = self.current_position();
        match self.peek() {
            Some(Token::IntLiteral(IntValue::Exact(v))) => {
                let v = *v;
                self.pos += 1;
                Ok(v)
            }
            Some(Token::IntLiteral(IntValue::Overflow(digits))) => {
                Err(ParseError::IntegerTooLarge {
                    literal: digits.clone(),
                    position,
                })
            }
            _ => Err(self.unexpected("integer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StatementKind;
    use zxport_ir::QubitId;

    #[test]
    fn test_parse_bell_state() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0], q[1];
            measure q -> c;
        "#;

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_parse_multiple_registers() {
        let source = r"
            OPENQASM 2.0;
            qreg a[2];
            qreg b[2];
            creg c[4];
            h a[0];
            cx a[0], b[1];
        ";

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.instructions()[1].qubits, vec![QubitId(0), QubitId(3)]);
    }

    #[test]
    fn test_missing_header_rigorous() {
        let err = import_from_text("qreg q[1];\nx q[0];", true).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingHeader { position, .. } if position == Position::new(1, 1)
        ));
    }

    #[test]
    fn test_missing_header_relaxed() {
        let circuit = import_from_text("qreg q[1];\nx q[0];", false).unwrap();
        assert_eq!(circuit.num_ops(), 1);
    }

    #[test]
    fn test_relaxed_still_validates_header() {
        let err = import_from_text("OPENQASM 3.0;\nqreg q[1];", false).unwrap_err();
        assert!(matches!(err, ParseError::InvalidVersion { ref version, .. } if version == "3.0"));
    }

    #[test]
    fn test_integer_version_accepted() {
        let program = parse_program("OPENQASM 2;\nqreg q[1];", true).unwrap();
        assert_eq!(program.version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_include_anywhere() {
        let source = r#"
            OPENQASM 2.0;
            qreg q[1];
            include "qelib1.inc";
            x q[0];
        "#;
        let program = parse_program(source, true).unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_header_must_come_first() {
        let err = parse_program("qreg q[1];\nOPENQASM 2.0;", false).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_statement_positions() {
        let program = parse_program("OPENQASM 2.0;\nqreg q[1];\n  x q[0];", true).unwrap();
        assert_eq!(program.statements[1].position, Position::new(3, 3));
        assert!(matches!(program.statements[1].kind, StatementKind::Gate(_)));
    }

    #[test]
    fn test_parse_error_undefined() {
        let source = r"
            OPENQASM 2.0;
            qreg q[1];
            h undefined[0];
        ";

        assert!(matches!(
            parse(source),
            Err(ParseError::UnresolvedRegister { ref name, .. }) if name == "undefined"
        ));
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(
            parse("OPENQASM 2.0;\nqreg q[1];\nx q[0]"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_import_options() {
        assert!(ImportOptions::default().rigorous);
        assert!(!ImportOptions::relaxed().rigorous);
        assert!(ImportOptions::relaxed().with_rigorous(true).rigorous);
        assert!(import("qreg q[1];", &ImportOptions::relaxed()).is_ok());
    }
}
