use std::fmt;

use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone)]
pub enum NodeKind {
    /// Literal or bare identifier.
    Leaf,
    FuncCall {
        arguments: Vec<AstNode>,
    },
    /// Arithmetic, comparison, logical operators and assignment.
    BinaryOperation {
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    VariableDeclaration {
        declared_type: Token,
    },
    FuncDeclaration {
        return_type: Token,
        parameter_types: Vec<Token>,
    },
    /// Not produced by the grammar yet.
    Block {
        statements: Vec<AstNode>,
    },
}

/// A node of the syntax tree. `token` is the operator, identifier or literal
/// the node stands for.
#[derive(Debug, PartialEq, Clone)]
pub struct AstNode {
    pub token: Token,
    pub kind: NodeKind,
}

impl AstNode {
    pub fn leaf(token: Token) -> Self {
        Self {
            token,
            kind: NodeKind::Leaf,
        }
    }

    /// The node token is `FUNC_CALL` carrying the callee name.
    pub fn func_call(name: &Token, arguments: Vec<AstNode>) -> Self {
        let token = Token::new(TokenKind::FuncCall, name.value.clone()).at(name.position);
        Self {
            token,
            kind: NodeKind::FuncCall { arguments },
        }
    }

    pub fn binary(operator: Token, lhs: AstNode, rhs: AstNode) -> Self {
        Self {
            token: operator,
            kind: NodeKind::BinaryOperation {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        }
    }

    pub fn variable_declaration(name: Token, declared_type: Token) -> Self {
        Self {
            token: name,
            kind: NodeKind::VariableDeclaration { declared_type },
        }
    }

    pub fn func_declaration(name: Token, return_type: Token, parameter_types: Vec<Token>) -> Self {
        Self {
            token: name,
            kind: NodeKind::FuncDeclaration {
                return_type,
                parameter_types,
            },
        }
    }

    pub fn block(token: Token, statements: Vec<AstNode>) -> Self {
        Self {
            token,
            kind: NodeKind::Block { statements },
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

/// S-expression dump, e.g. `(= a (+ b 1))`.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Leaf => match self.token.kind {
                TokenKind::String => write!(f, "\"{}\"", self.token),
                TokenKind::Character => write!(f, "'{}'", self.token),
                _ => write!(f, "{}", self.token),
            },
            NodeKind::FuncCall { arguments } => {
                write!(f, "(call {}", self.token)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            NodeKind::BinaryOperation { lhs, rhs } => {
                write!(f, "({} {} {})", self.token, lhs, rhs)
            }
            NodeKind::VariableDeclaration { declared_type } => {
                write!(f, "(var {} {})", declared_type, self.token)
            }
            NodeKind::FuncDeclaration {
                return_type,
                parameter_types,
            } => {
                write!(f, "(fn {} {} (", return_type, self.token)?;
                for (index, parameter) in parameter_types.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, "))")
            }
            NodeKind::Block { statements } => {
                write!(f, "(block")?;
                write_list(f, statements)?;
                write!(f, ")")
            }
        }
    }
}
