//! Statement parsing for QASM2.

use super::Parser;
use crate::ast::{GateCall, GateMacro, Operand, Statement, StatementKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;
use crate::semantics;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let position = self.current_position();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        let kind = match token {
            Token::Qreg | Token::Creg => self.parse_register_decl()?,
            Token::Gate => self.parse_gate_def()?,
            Token::Measure => self.parse_measure()?,
            Token::Reset => self.parse_reset()?,
            Token::Barrier => self.parse_barrier()?,
            Token::Identifier(_) => StatementKind::Gate(self.parse_gate_call(None)?),
            _ => return Err(self.unexpected("statement")),
        };

        Ok(Statement { kind, position })
    }

    /// Look up parameter and qubit counts of a built-in gate or declared macro.
    fn gate_arity(&self, name: &str) -> Option<(usize, usize)> {
        semantics::lookup(name)
            .map(|sig| (sig.num_params(), sig.num_qubits()))
            .or_else(|| self.macros.get(name).copied())
    }

    /// Parse `qreg name[size];` or `creg name[size];`.
    fn parse_register_decl(&mut self) -> ParseResult<StatementKind> {
        let quantum = self.check(&Token::Qreg);
        self.advance();

        let position = self.current_position();
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_int_literal()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;

        let Some(size) = u32::try_from(size).ok().filter(|&s| s > 0) else {
            return Err(ParseError::InvalidRegisterSize {
                name,
                size,
                position,
            });
        };
        if !self.registers.insert(name.clone()) {
            return Err(ParseError::DuplicateDeclaration { name, position });
        }

        Ok(if quantum {
            StatementKind::QregDecl { name, size }
        } else {
            StatementKind::CregDecl { name, size }
        })
    }

    /// Parse gate definition.
    fn parse_gate_def(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Gate)?;
        let position = self.current_position();
        let name = self.parse_identifier()?;
        if semantics::is_builtin(&name) || self.macros.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration { name, position });
        }

        // Parse parameters
        let params = if self.consume(&Token::LParen) {
            let p = if self.check(&Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        // Parse qubits
        let qubits = self.parse_identifier_list()?;

        let formals: Vec<&String> = params.iter().chain(&qubits).collect();
        for (i, formal) in formals.iter().enumerate() {
            if formals[..i].contains(formal) {
                return Err(ParseError::DuplicateDeclaration {
                    name: (*formal).clone(),
                    position,
                });
            }
        }

        // Parse body
        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while !self.consume(&Token::RBrace) {
            match self.peek() {
                Some(Token::Identifier(_)) => body.push(self.parse_gate_call(Some(qubits.as_slice()))?),
                _ => return Err(self.unexpected("gate call or '}'")),
            }
        }

        self.macros
            .insert(name.clone(), (params.len(), qubits.len()));

        Ok(StatementKind::GateDef(GateMacro {
            name,
            params,
            qubits,
            body,
        }))
    }

    /// Parse a gate call. Inside a gate body `formals` lists the qubit names
    /// operands may refer to.
    fn parse_gate_call(&mut self, formals: Option<&[String]>) -> ParseResult<GateCall> {
        let position = self.current_position();
        let name = self.parse_identifier()?;
        let Some((num_params, num_qubits)) = self.gate_arity(&name) else {
            return Err(ParseError::UnknownGate { name, position });
        };

        // Parse parameters
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        // Parse qubits
        let mut qubits = vec![self.parse_operand(formals)?];
        while self.consume(&Token::Comma) {
            qubits.push(self.parse_operand(formals)?);
        }
        self.expect(Token::Semicolon)?;

        if params.len() != num_params {
            return Err(ParseError::WrongParameterCount {
                gate: name,
                expected: num_params,
                got: params.len(),
                position,
            });
        }
        if qubits.len() != num_qubits {
            return Err(ParseError::WrongQubitCount {
                gate: name,
                expected: num_qubits,
                got: qubits.len(),
                position,
            });
        }

        Ok(GateCall {
            name,
            params,
            qubits,
        })
    }

    /// Parse measure statement.
    fn parse_measure(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_operand(None)?;
        self.expect(Token::Arrow)?;
        let clbit = self.parse_operand(None)?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Measure { qubit, clbit })
    }

    /// Parse reset statement.
    fn parse_reset(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Reset)?;
        let qubit = self.parse_operand(None)?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Reset(qubit))
    }

    /// Parse barrier statement.
    fn parse_barrier(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Barrier)?;
        let mut qubits = vec![self.parse_operand(None)?];
        while self.consume(&Token::Comma) {
            qubits.push(self.parse_operand(None)?);
        }
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Barrier(qubits))
    }

    /// Parse a single operand: `name` or `name[index]`.
    ///
    /// Inside a gate body only bare formal qubit names are allowed.
    fn parse_operand(&mut self, formals: Option<&[String]>) -> ParseResult<Operand> {
        let position = self.current_position();
        let register = self.parse_identifier()?;

        if let Some(formals) = formals {
            if !formals.contains(&register) {
                return Err(ParseError::UnresolvedRegister {
                    name: register,
                    position,
                });
            }
            if self.check(&Token::LBracket) {
                return Err(self.unexpected("',' or ';' after formal qubit"));
            }
            return Ok(Operand::Register(register));
        }

        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            Ok(Operand::Indexed { register, index })
        } else {
            Ok(Operand::Register(register))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Operand, StatementKind};
    use crate::error::ParseError;
    use crate::parser::parse_program;

    fn parse_err(source: &str) -> ParseError {
        parse_program(source, false).unwrap_err()
    }

    #[test]
    fn test_register_declarations() {
        let program = parse_program("qreg q[3];\ncreg c[2];", false).unwrap();
        assert_eq!(
            program.statements[0].kind,
            StatementKind::QregDecl {
                name: "q".into(),
                size: 3
            }
        );
        assert_eq!(
            program.statements[1].kind,
            StatementKind::CregDecl {
                name: "c".into(),
                size: 2
            }
        );
    }

    #[test]
    fn test_zero_size_register() {
        assert!(matches!(
            parse_err("qreg q[0];"),
            ParseError::InvalidRegisterSize { size: 0, .. }
        ));
    }

    #[test]
    fn test_duplicate_register_across_kinds() {
        assert!(matches!(
            parse_err("qreg q[1];\ncreg q[1];"),
            ParseError::DuplicateDeclaration { ref name, .. } if name == "q"
        ));
    }

    #[test]
    fn test_gate_definition() {
        let source = "gate majority(theta) a, b, c { cx c, b; crz(theta/2) a, c; }";
        let program = parse_program(source, false).unwrap();
        let StatementKind::GateDef(ref def) = program.statements[0].kind else {
            panic!("expected gate definition");
        };
        assert_eq!(def.name, "majority");
        assert_eq!(def.params, vec!["theta"]);
        assert_eq!(def.qubits, vec!["a", "b", "c"]);
        assert_eq!(def.body.len(), 2);
        assert_eq!(def.body[0].qubits, vec![Operand::register("c"), Operand::register("b")]);
    }

    #[test]
    fn test_gate_definition_without_params() {
        let program = parse_program("gate g() a { x a; }\ngate k a { g a; }", false).unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_gate_name_collisions() {
        assert!(matches!(
            parse_err("gate cx a, b { x a; }"),
            ParseError::DuplicateDeclaration { ref name, .. } if name == "cx"
        ));
        assert!(matches!(
            parse_err("gate g a { x a; }\ngate g a { y a; }"),
            ParseError::DuplicateDeclaration { ref name, .. } if name == "g"
        ));
        assert!(matches!(
            parse_err("gate g(a) a { x a; }"),
            ParseError::DuplicateDeclaration { ref name, .. } if name == "a"
        ));
    }

    #[test]
    fn test_gate_body_operands() {
        assert!(matches!(
            parse_err("gate g a { x b; }"),
            ParseError::UnresolvedRegister { ref name, .. } if name == "b"
        ));
        assert!(matches!(
            parse_err("gate g a { x a[0]; }"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_recursive_gate_rejected() {
        assert!(matches!(
            parse_err("gate g a { g a; }"),
            ParseError::UnknownGate { ref name, .. } if name == "g"
        ));
    }

    #[test]
    fn test_unknown_gate() {
        assert!(matches!(
            parse_err("qreg q[1];\nfoo q[0];"),
            ParseError::UnknownGate { ref name, position } if name == "foo" && position.line == 2
        ));
        assert!(matches!(
            parse_err("qreg q[2];\nCX q[0], q[1];"),
            ParseError::UnknownGate { .. }
        ));
    }

    #[test]
    fn test_arity_errors() {
        assert!(matches!(
            parse_err("qreg q[2];\ncx q[0];"),
            ParseError::WrongQubitCount { expected: 2, got: 1, .. }
        ));
        assert!(matches!(
            parse_err("qreg q[1];\nrx q[0];"),
            ParseError::WrongParameterCount { expected: 1, got: 0, .. }
        ));
        assert!(matches!(
            parse_err("qreg q[1];\nh(0.5) q[0];"),
            ParseError::WrongParameterCount { expected: 0, got: 1, .. }
        ));
        assert!(matches!(
            parse_err("gate g(t) a, b { crx(t) a, b; }\nqreg q[2];\ng q[0], q[1];"),
            ParseError::WrongParameterCount { expected: 1, got: 0, .. }
        ));
    }

    #[test]
    fn test_measure_reset_barrier() {
        let source = "qreg q[2];\ncreg c[2];\nmeasure q[1] -> c[0];\nreset q;\nbarrier q[0], q[1];";
        let program = parse_program(source, false).unwrap();
        assert_eq!(
            program.statements[2].kind,
            StatementKind::Measure {
                qubit: Operand::indexed("q", 1),
                clbit: Operand::indexed("c", 0),
            }
        );
        assert_eq!(
            program.statements[3].kind,
            StatementKind::Reset(Operand::register("q"))
        );
        assert!(matches!(
            program.statements[4].kind,
            StatementKind::Barrier(ref ops) if ops.len() == 2
        ));
    }

    #[test]
    fn test_measure_requires_arrow() {
        assert!(matches!(
            parse_err("qreg q[1];\ncreg c[1];\nmeasure q[0] c[0];"),
            ParseError::UnexpectedToken { .. }
        ));
    }
}
