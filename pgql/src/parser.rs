//! Recursive-descent parser: `Lexer::tokenize` → `TokenParser::parse_query`.
//! Accepts exactly the grammar in the component design: one or more MATCH
//! clauses, an optional WHERE, and a RETURN.

use crate::ast::*;
use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, NumberLit, Token, TokenType};

pub fn parse(input: &str) -> Result<Query> {
    let mut lexer = Lexer::new(input);
    let tokens = lexer.tokenize()?;
    let mut parser = TokenParser::new(tokens);
    let query = parser.parse_query()?;
    parser.expect_eof()?;
    Ok(query)
}

struct TokenParser {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenParser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    fn parse_query(&mut self) -> Result<Query> {
        let mut matches = Vec::new();
        self.consume(&TokenType::Match, "expected MATCH")?;
        matches.push(self.parse_match_clause()?);
        while self.match_token(&TokenType::Match) {
            matches.push(self.parse_match_clause()?);
        }

        let where_clause = if self.match_token(&TokenType::Where) {
            Some(self.parse_where()?)
        } else {
            None
        };

        self.consume(&TokenType::Return, "expected RETURN")?;
        let return_clause = self.parse_return()?;

        Ok(Query {
            matches,
            where_clause,
            return_clause,
        })
    }

    fn parse_match_clause(&mut self) -> Result<MatchClause> {
        let mut nodes = vec![self.parse_node()?];
        let mut edges = Vec::new();
        while self.check(&TokenType::Dash) {
            edges.push(self.parse_edge()?);
            nodes.push(self.parse_node()?);
        }
        Ok(MatchClause { nodes, edges })
    }

    fn parse_node(&mut self) -> Result<NodePattern> {
        self.consume(&TokenType::LeftParen, "expected '(' to start a node pattern")?;
        let variable = self.parse_identifier("expected a node variable name")?;
        self.consume(&TokenType::RightParen, "expected ')' to close a node pattern")?;
        Ok(NodePattern { variable })
    }

    fn parse_edge(&mut self) -> Result<EdgePattern> {
        self.consume(&TokenType::Dash, "expected '-' to start an edge pattern")?;
        self.consume(&TokenType::LeftBracket, "expected '[' in an edge pattern")?;
        let variable = if let TokenType::Identifier(_) = &self.peek().token_type {
            Some(self.parse_identifier("expected an edge variable name")?)
        } else {
            None
        };
        self.consume(&TokenType::RightBracket, "expected ']' in an edge pattern")?;
        self.consume(&TokenType::Arrow, "expected '->' after an edge pattern")?;
        Ok(EdgePattern { variable })
    }

    fn parse_where(&mut self) -> Result<WhereClause> {
        let mut conditions = vec![self.parse_condition()?];
        while self.match_token(&TokenType::And) {
            conditions.push(self.parse_condition()?);
        }
        Ok(WhereClause { conditions })
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        let lhs = self.parse_operand()?;
        let op = self.parse_op()?;
        let rhs = self.parse_operand()?;
        Ok(Condition { lhs, op, rhs })
    }

    fn parse_op(&mut self) -> Result<Op> {
        let op = match &self.peek().token_type {
            TokenType::Eq => Op::Eq,
            TokenType::Ne => Op::Ne,
            TokenType::Lt => Op::Lt,
            TokenType::Le => Op::Le,
            TokenType::Gt => Op::Gt,
            TokenType::Ge => Op::Ge,
            _ => {
                return Err(self.error("expected a comparison operator (== <> < <= > >=)"));
            }
        };
        self.advance();
        Ok(op)
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        match &self.peek().token_type {
            TokenType::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(Operand::Literal(Literal::String(s)))
            }
            TokenType::Number(n) => {
                let lit = match n {
                    NumberLit::Int(i) => Literal::Int(*i),
                    NumberLit::Float(f) => Literal::Float(*f),
                };
                self.advance();
                Ok(Operand::Literal(lit))
            }
            TokenType::Boolean(b) => {
                let b = *b;
                self.advance();
                Ok(Operand::Literal(Literal::Bool(b)))
            }
            TokenType::Identifier(_) => {
                let variable = self.parse_identifier("expected an identifier")?;
                if self.match_token(&TokenType::Dot) {
                    let key = self.parse_identifier("expected an attribute name after '.'")?;
                    Ok(Operand::Attribute { variable, key })
                } else {
                    Ok(Operand::Var(variable))
                }
            }
            _ => Err(self.error("expected a variable, attribute access, or literal")),
        }
    }

    fn parse_return(&mut self) -> Result<ReturnClause> {
        let mut items = vec![self.parse_return_item()?];
        while self.match_token(&TokenType::Comma) {
            items.push(self.parse_return_item()?);
        }
        Ok(ReturnClause { items })
    }

    fn parse_return_item(&mut self) -> Result<ReturnItem> {
        let variable = self.parse_identifier("expected a return variable name")?;
        if self.match_token(&TokenType::Dot) {
            let key = self.parse_identifier("expected an attribute name after '.'")?;
            let text = format!("{variable}.{key}");
            Ok(ReturnItem {
                expr: ReturnExpr::Attribute { variable, key },
                text,
            })
        } else {
            let text = variable.clone();
            Ok(ReturnItem {
                expr: ReturnExpr::Var(variable),
                text,
            })
        }
    }

    fn parse_identifier(&mut self, message: &str) -> Result<String> {
        match &self.peek().token_type {
            TokenType::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(message)),
        }
    }

    fn expect_eof(&mut self) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }

    // Helpers, mirroring the classic hand-written TokenParser shape.
    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        &self.tokens[self.position - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn check(&self, token_type: &TokenType) -> bool {
        !self.is_at_end() && std::mem::discriminant(&self.peek().token_type) == std::mem::discriminant(token_type)
    }

    fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, token_type: &TokenType, message: &str) -> Result<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn error(&self, message: &str) -> crate::error::Error {
        let token = self.peek();
        crate::error::Error::Parse(ParseError {
            line: token.line,
            column: token.column,
            message: message.to_string(),
        })
    }
}
