/// Every failure the lexer, scope matcher and parser can raise. The display
/// text of each variant is stable and matched on by callers.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum SyntaxError {
    #[error("unclosed string literal")]
    UnclosedString,
    #[error("unclosed char literal")]
    UnclosedChar,
    #[error("integer literal out of range: {0}")]
    IntegerOutOfRange(String),

    #[error("Expected scope close suffix")]
    UnclosedScope,
    #[error("unexpected scope close suffix without a matching prefix")]
    UnopenedScope,

    #[error("unexpected two arguments in a row")]
    NonCommaSeparatedArgs,
    #[error("unclosed function call")]
    UnclosedFuncCall,
    #[error("unclosed function declaration")]
    UnclosedFuncDeclaration,
    #[error("unsupported factor token: {0}")]
    UnsupportedFactor(String),
    #[error("missing an expected semicolon at the end of the statement")]
    MissingSemicolon,
    #[error("missing a type at variable definition")]
    DefinitionWithoutType,
    #[error("missing a variable name at variable definition")]
    DefinitionWithoutName,
    #[error("assignment without lvalue in lhs")]
    BadAssignment,
    #[error("Expected an assignment or function call when making a dangling expression")]
    DanglingExpression,
    #[error("Expected variable / function name declaration")]
    DanglingDeclaration,
    #[error("Unexpected declaration")]
    BadDeclaration,
    #[error("Expected opening parentheses in function declaration")]
    DanglingFuncDeclaration,
    #[error("Expected parameter type in function declaration")]
    FuncDeclarationParamMissingType,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
