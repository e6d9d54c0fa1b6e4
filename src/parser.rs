use std::mem;

use crate::ast::AstNode;
use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

pub type PartialParseResult = Result<AstNode, SyntaxError>;

/// Recursive descent parser over a lexed token slice.
///
/// The cursor only moves forward. Each `parse_statement` call consumes one
/// statement including its `;`, or fails and leaves the cursor wherever the
/// error was found.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Look-ahead bound, the `;` ending the statement being parsed.
    statement_end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            statement_end: tokens.len(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        let index = self.pos + offset;
        if index < self.statement_end {
            self.tokens.get(index)
        } else {
            None
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn advance(&mut self) -> Result<&'a Token, SyntaxError> {
        let token = self.peek().ok_or(SyntaxError::UnexpectedEndOfInput)?;
        self.pos += 1;
        Ok(token)
    }

    fn find_statement_end(&self) -> usize {
        self.tokens[self.pos..]
            .iter()
            .position(|token| token.kind == TokenKind::Semicolon)
            .map_or(self.tokens.len(), |offset| self.pos + offset)
    }

    /// Parse statements until the tokens run out.
    pub fn parse_program(&mut self) -> Result<Vec<AstNode>, SyntaxError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    pub fn parse_statement(&mut self) -> PartialParseResult {
        let bound = self.find_statement_end();
        let outer_end = mem::replace(&mut self.statement_end, bound);
        let statement = self.parse_statement_body();
        self.statement_end = outer_end;
        let statement = statement?;

        match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Semicolon => {
                self.pos += 1;
                Ok(statement)
            }
            _ => Err(SyntaxError::MissingSemicolon),
        }
    }

    fn parse_statement_body(&mut self) -> PartialParseResult {
        let statement_start = self.pos;
        match self.peek_kind() {
            Some(TokenKind::Int) | Some(TokenKind::Char) | Some(TokenKind::Void) => {
                self.parse_declaration()
            }
            _ => {
                let statement = self.parse_expression()?;
                match statement.token.kind {
                    TokenKind::Assign => self.validate_assignment(statement_start, self.pos)?,
                    TokenKind::FuncCall => (),
                    _ => return Err(SyntaxError::DanglingExpression),
                }
                Ok(statement)
            }
        }
    }

    /// `expression := arithmetic ( '=' arithmetic )*`, folded to the left.
    pub fn parse_expression(&mut self) -> PartialParseResult {
        let mut lhs = self.parse_arithmetic()?;

        while self.peek_kind() == Some(TokenKind::Assign) {
            let operator = self.advance()?.clone();
            let rhs = self.parse_arithmetic()?;
            lhs = AstNode::binary(operator, lhs, rhs);
        }

        Ok(lhs)
    }

    /// All arithmetic operators share one precedence tier, folded to the left.
    pub fn parse_arithmetic(&mut self) -> PartialParseResult {
        let mut lhs = self.parse_factor()?;

        while self.peek_kind().map_or(false, TokenKind::is_arithmetic) {
            let operator = self.advance()?.clone();
            let rhs = self.parse_factor()?;
            lhs = AstNode::binary(operator, lhs, rhs);
        }

        Ok(lhs)
    }

    pub fn parse_factor(&mut self) -> PartialParseResult {
        let token = match self.peek() {
            Some(token) => token,
            // the statement terminator is no factor either
            None => {
                return Err(self
                    .tokens
                    .get(self.pos)
                    .map_or(SyntaxError::UnexpectedEndOfInput, |token| {
                        SyntaxError::UnsupportedFactor(token.to_string())
                    }))
            }
        };
        match token.kind {
            TokenKind::Integer | TokenKind::Character | TokenKind::String => {
                self.pos += 1;
                Ok(AstNode::leaf(token.clone()))
            }
            TokenKind::Identifier => {
                if self.peek_at(1).map(|next| next.kind) == Some(TokenKind::LParens) {
                    self.parse_func_call()
                } else {
                    self.pos += 1;
                    Ok(AstNode::leaf(token.clone()))
                }
            }
            _ => Err(SyntaxError::UnsupportedFactor(token.to_string())),
        }
    }

    /// `IDENTIFIER '(' ( arithmetic ( ',' arithmetic )* )? ')'`
    fn parse_func_call(&mut self) -> PartialParseResult {
        let name = self.advance()?;
        self.advance()?; // (

        let mut arguments = Vec::new();
        // arguments must be separated by commas
        let mut expecting_argument = true;

        loop {
            match self.peek_kind() {
                None => return Err(SyntaxError::UnclosedFuncCall),
                Some(TokenKind::RParens) => break,
                Some(TokenKind::Comma) => {
                    self.pos += 1;
                    expecting_argument = true;
                }
                Some(_) => {
                    if !expecting_argument {
                        return Err(SyntaxError::NonCommaSeparatedArgs);
                    }
                    arguments.push(self.parse_arithmetic()?);
                    expecting_argument = false;
                }
            }
        }
        self.pos += 1; // )

        Ok(AstNode::func_call(name, arguments))
    }

    fn parse_declaration(&mut self) -> PartialParseResult {
        // the name check looks past the statement bound, so `int ;` sees the `;`
        match self.tokens.get(self.pos + 1).map(|token| token.kind) {
            None => Err(SyntaxError::DanglingDeclaration),
            Some(TokenKind::Identifier) => {
                let has_parens = self.tokens[self.pos..self.statement_end]
                    .iter()
                    .any(|token| token.kind == TokenKind::LParens);
                if has_parens {
                    self.parse_func_declaration()
                } else {
                    self.parse_variable_declaration()
                }
            }
            Some(_) => Err(SyntaxError::BadDeclaration),
        }
    }

    /// Takes exactly the type and the name; whatever follows is left for
    /// the statement terminator check.
    fn parse_variable_declaration(&mut self) -> PartialParseResult {
        let declared_type = self.advance()?.clone();
        let name = self.advance()?.clone();
        Ok(AstNode::variable_declaration(name, declared_type))
    }

    fn parse_func_declaration(&mut self) -> PartialParseResult {
        let return_type = self.advance()?.clone();
        let name = self.advance()?.clone();

        if self.peek_kind() != Some(TokenKind::LParens) {
            return Err(SyntaxError::DanglingFuncDeclaration);
        }
        self.pos += 1;

        let mut parameter_types = Vec::new();
        let mut expecting_parameter = true;

        loop {
            match self.peek_kind() {
                None => return Err(SyntaxError::UnclosedFuncDeclaration),
                Some(TokenKind::RParens) => break,
                Some(TokenKind::Comma) => {
                    self.pos += 1;
                    expecting_parameter = true;
                }
                Some(_) if !expecting_parameter => {
                    return Err(SyntaxError::NonCommaSeparatedArgs);
                }
                Some(TokenKind::Int) | Some(TokenKind::Char) => {
                    parameter_types.push(self.advance()?.clone());
                    // parameter names are not kept
                    if self.peek_kind() == Some(TokenKind::Identifier) {
                        self.pos += 1;
                    }
                    expecting_parameter = false;
                }
                Some(_) => return Err(SyntaxError::FuncDeclarationParamMissingType),
            }
        }
        self.pos += 1; // )

        Ok(AstNode::func_declaration(name, return_type, parameter_types))
    }

    /// Checks the tokens in `start..end` left of the first `=`: a single
    /// identifier assigns, a longer span must be `<type> ... <identifier>`.
    fn validate_assignment(&self, start: usize, end: usize) -> Result<(), SyntaxError> {
        let statement = &self.tokens[start..end];
        let lhs_length = statement
            .iter()
            .position(|token| token.kind == TokenKind::Assign)
            .unwrap_or_else(|| statement.len());

        if lhs_length > 1 {
            if !statement[0].kind.is_type() {
                return Err(SyntaxError::DefinitionWithoutType);
            }
            if statement[lhs_length - 1].kind != TokenKind::Identifier {
                return Err(SyntaxError::DefinitionWithoutName);
            }
        } else if statement[0].kind != TokenKind::Identifier {
            return Err(SyntaxError::BadAssignment);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::lexer::lex;
    use crate::token::{Literal, ARITHMETIC_OPERATORS, COMPOUND_OPERATORS, SINGLE_OPERATORS};
    use pretty_assertions::assert_eq;

    fn op(kind: TokenKind, text: &str) -> Token {
        Token::text(kind, text)
    }

    fn semicolon() -> Token {
        op(TokenKind::Semicolon, ";")
    }

    fn expect_binary(node: &AstNode) -> (&AstNode, &AstNode) {
        match &node.kind {
            NodeKind::BinaryOperation { lhs, rhs } => (lhs, rhs),
            other => panic!("expected a binary operation, got {:?}", other),
        }
    }

    fn expect_call(node: &AstNode) -> &[AstNode] {
        match &node.kind {
            NodeKind::FuncCall { arguments } => arguments,
            other => panic!("expected a function call, got {:?}", other),
        }
    }

    fn parse_statement(tokens: &[Token]) -> PartialParseResult {
        Parser::new(tokens).parse_statement()
    }

    fn parse_source(source: &str) -> Result<Vec<AstNode>, SyntaxError> {
        let tokens = lex(source).unwrap();
        Parser::new(&tokens).parse_program()
    }

    #[test]
    fn every_arithmetic_operator_folds() {
        let operators = COMPOUND_OPERATORS.iter().chain(SINGLE_OPERATORS.iter());
        let mut seen = 0;
        for (text, kind) in operators {
            if !kind.is_arithmetic() {
                continue;
            }
            seen += 1;
            let tokens = vec![Token::identifier("a"), op(*kind, text), Token::integer(5)];
            let res = Parser::new(&tokens).parse_expression().unwrap();
            let (lhs, rhs) = expect_binary(&res);

            assert_eq!(res.token, tokens[1]);
            assert_eq!(lhs.token, tokens[0]);
            assert_eq!(rhs.token, tokens[2]);
        }
        assert_eq!(seen, ARITHMETIC_OPERATORS.len());
    }

    #[test]
    fn arithmetic_is_flat_and_left_associative() {
        let tokens = lex("a + b * c ;").unwrap();
        let res = Parser::new(&tokens).parse_expression().unwrap();
        assert_eq!(res.to_string(), "(* (+ a b) c)");
    }

    #[test]
    fn assignment() {
        let tokens = vec![
            Token::identifier("a"),
            op(TokenKind::Assign, "="),
            Token::integer(5),
        ];
        let res = Parser::new(&tokens).parse_expression().unwrap();
        let (lhs, rhs) = expect_binary(&res);

        assert_eq!(res.token, tokens[1]);
        assert_eq!(lhs.token, tokens[0]);
        assert_eq!(rhs.token, tokens[2]);
    }

    #[test]
    fn assignment_chain_leans_left() {
        let tokens = lex("a = b = c ;").unwrap();
        let res = Parser::new(&tokens).parse_expression().unwrap();
        assert_eq!(res.to_string(), "(= (= a b) c)");
    }

    #[test]
    fn func_call_arity() {
        for count in 0..4 {
            let mut tokens = vec![
                Token::identifier("my_func_name"),
                op(TokenKind::LParens, "("),
            ];
            for index in 0..count {
                tokens.push(Token::integer(index));
                if index < count - 1 {
                    tokens.push(op(TokenKind::Comma, ","));
                }
            }
            tokens.push(op(TokenKind::RParens, ")"));

            let mut parser = Parser::new(&tokens);
            let res = parser.parse_expression().unwrap();
            let arguments = expect_call(&res);

            assert_eq!(
                res.token,
                Token::new(TokenKind::FuncCall, Literal::Text("my_func_name".to_string()))
            );
            assert_eq!(arguments.len(), count as usize);
            for (index, argument) in arguments.iter().enumerate() {
                // arguments sit after the name and paren, every other token
                assert_eq!(argument.token, tokens[2 + 2 * index]);
            }
            assert!(parser.is_at_end());
        }
    }

    #[test]
    fn func_call_with_expression_argument() {
        let tokens = lex("my_func_name(1 + 1) ;").unwrap();
        let res = Parser::new(&tokens).parse_expression().unwrap();
        let arguments = expect_call(&res);

        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].token, op(TokenKind::Add, "+"));
        assert_eq!(res.to_string(), "(call my_func_name (+ 1 1))");
    }

    #[test]
    fn func_call_missing_comma() {
        let tokens = vec![
            Token::identifier("my_func_name"),
            op(TokenKind::LParens, "("),
            Token::integer(1),
            Token::integer(1),
            op(TokenKind::RParens, ")"),
        ];
        let err = Parser::new(&tokens).parse_expression().unwrap_err();
        assert_eq!(err.to_string(), "unexpected two arguments in a row");
    }

    #[test]
    fn func_call_unclosed() {
        let tokens = lex("f(1, 2 ;").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::UnclosedFuncCall));
    }

    #[test]
    fn unsupported_factor() {
        let tokens = lex("a = ( 1 ) ;").unwrap();
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(err.to_string(), "unsupported factor token: (");
    }

    #[test]
    fn declaration_without_identifier() {
        // declarations are tried before assignments
        let tokens = vec![
            op(TokenKind::Int, "int"),
            op(TokenKind::Assign, "="),
            Token::integer(1),
            semicolon(),
        ];
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected declaration");
    }

    #[test]
    fn type_without_name() {
        let tokens = vec![op(TokenKind::Char, "char"), semicolon()];
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected declaration");

        let tokens = lex("int ;").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::BadDeclaration));

        // a type keyword closing the whole input has nothing after it at all
        let tokens = vec![op(TokenKind::Void, "void")];
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::DanglingDeclaration));
    }

    #[test]
    fn assignment_without_lvalue() {
        let tokens = vec![
            Token::integer(1),
            op(TokenKind::Assign, "="),
            Token::integer(1),
            semicolon(),
        ];
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(err.to_string(), "assignment without lvalue in lhs");
    }

    #[test]
    fn definition_checks_span_left_of_assign() {
        let tokens = lex("a + b = 1 ;").unwrap();
        assert_eq!(
            parse_statement(&tokens).unwrap_err().to_string(),
            "missing a type at variable definition"
        );

        let span = vec![
            op(TokenKind::Int, "int"),
            Token::integer(3),
            op(TokenKind::Assign, "="),
            Token::integer(1),
        ];
        assert_eq!(
            Parser::new(&span).validate_assignment(0, span.len()),
            Err(SyntaxError::DefinitionWithoutName)
        );
        let span = vec![
            op(TokenKind::Int, "int"),
            Token::identifier("x"),
            op(TokenKind::Assign, "="),
            Token::integer(1),
        ];
        assert_eq!(Parser::new(&span).validate_assignment(0, span.len()), Ok(()));
    }

    #[test]
    fn variable_declaration_takes_type_and_name() {
        let tokens = lex("char letter ;").unwrap();
        let statement = parse_statement(&tokens).unwrap();
        assert_eq!(statement.token, Token::identifier("letter"));
        assert_eq!(
            statement.kind,
            NodeKind::VariableDeclaration {
                declared_type: op(TokenKind::Char, "char")
            }
        );
    }

    #[test]
    fn declaration_with_initializer_leaves_remainder() {
        let tokens = lex("int x = 5 ;").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::MissingSemicolon));
    }

    #[test]
    fn func_declaration() {
        let return_type = op(TokenKind::Int, "int");
        let first_param = op(TokenKind::Int, "int");
        let second_param = op(TokenKind::Char, "char");
        let tokens = vec![
            return_type.clone(),
            Token::identifier("my_func"),
            op(TokenKind::LParens, "("),
            first_param.clone(),
            Token::identifier("first_param_name"),
            op(TokenKind::Comma, ","),
            second_param.clone(),
            Token::identifier("second_param_name"),
            op(TokenKind::RParens, ")"),
            semicolon(),
        ];

        let mut parser = Parser::new(&tokens);
        let statement = parser.parse_statement().unwrap();

        assert_eq!(statement.token, Token::identifier("my_func"));
        assert_eq!(
            statement.kind,
            NodeKind::FuncDeclaration {
                return_type,
                parameter_types: vec![first_param, second_param],
            }
        );
        assert!(parser.is_at_end());
    }

    #[test]
    fn func_declaration_without_parameter_names() {
        let tokens = lex("void my_func(int, char) ;").unwrap();
        let statement = parse_statement(&tokens).unwrap();
        assert_eq!(statement.to_string(), "(fn void my_func (int char))");
    }

    #[test]
    fn func_declaration_parameter_without_type() {
        let tokens = lex("int my_func(int, my_second_param) ;").unwrap();
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(err.to_string(), "Expected parameter type in function declaration");

        let tokens = lex("int my_func(void) ;").unwrap();
        assert_eq!(
            parse_statement(&tokens),
            Err(SyntaxError::FuncDeclarationParamMissingType)
        );
    }

    #[test]
    fn func_declaration_errors() {
        let tokens = lex("int my_func(int a char b) ;").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::NonCommaSeparatedArgs));

        let tokens = lex("int x = f(1) ;").unwrap();
        assert_eq!(
            parse_statement(&tokens).unwrap_err().to_string(),
            "Expected opening parentheses in function declaration"
        );

        let tokens = lex("int my_func(int ;").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::UnclosedFuncDeclaration));
    }

    #[test]
    fn parens_in_later_statements_do_not_count() {
        let statements = parse_source("int x;\nf(x);\n").unwrap();
        let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["(var int x)", "(call f x)"]);
    }

    #[test]
    fn dangling_expression() {
        let tokens = lex("a + 1 ;").unwrap();
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected an assignment or function call when making a dangling expression"
        );
    }

    #[test]
    fn missing_semicolon() {
        let tokens = vec![
            Token::identifier("a"),
            op(TokenKind::Assign, "="),
            Token::integer(5),
        ];
        let err = parse_statement(&tokens).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing an expected semicolon at the end of the statement"
        );

        let tokens = lex("a = 5 6 ;").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::MissingSemicolon));
    }

    #[test]
    fn statements_advance_the_cursor() {
        let mut program = lex("a = 5;\nmy_func_name(1);\n").unwrap();
        program.push(semicolon());

        let mut parser = Parser::new(&program);
        assert_eq!(parser.parse_statement().unwrap().to_string(), "(= a 5)");
        assert_eq!(parser.position(), 4);
        assert_eq!(
            parser.parse_statement().unwrap().to_string(),
            "(call my_func_name 1)"
        );
        assert_eq!(parser.position(), 9);
        assert_eq!(
            parser.parse_statement(),
            Err(SyntaxError::UnsupportedFactor(";".to_string()))
        );
    }

    #[test]
    fn empty_statement_at_end() {
        assert_eq!(parse_statement(&[]), Err(SyntaxError::UnexpectedEndOfInput));
        assert_eq!(
            Parser::new(&[op(TokenKind::Add, "+")]).parse_arithmetic(),
            Err(SyntaxError::UnsupportedFactor("+".to_string()))
        );
        let tokens = lex("a = ;").unwrap();
        assert_eq!(
            parse_statement(&tokens),
            Err(SyntaxError::UnsupportedFactor(";".to_string()))
        );
        let tokens = lex("a = 1 +").unwrap();
        assert_eq!(parse_statement(&tokens), Err(SyntaxError::UnexpectedEndOfInput));
    }

    #[test]
    fn program() {
        let source = "int counter;\nint add(int, int);\ncounter = add(counter, 'a' + 1);\nlog_line(\"done\");\n";
        let statements = parse_source(source).unwrap();
        let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "(var int counter)",
                "(fn int add (int int))",
                "(= counter (call add counter (+ 'a' 1)))",
                "(call log_line \"done\")",
            ]
        );
    }
}
