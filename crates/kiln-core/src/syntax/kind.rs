//! Node kinds for the kiln syntax tree
//!
//! The set is closed: every token the lexer produces and every node the
//! parser builds has exactly one `SyntaxKind`. Rules subscribe to kinds, so
//! the discriminant is `Copy + Hash` and cheap to key maps with.

use std::fmt;

/// Discriminant for every token and node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    // Tokens
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Operator,
    Unknown,
    Eof,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftSquare,
    RightSquare,
    LeftAngle,
    RightAngle,
    Comma,
    Colon,
    Semicolon,
    Period,
    Equal,
    Arrow,
    QuestionMark,
    ExclamationMark,
    At,

    // Keywords
    IfKw,
    ElseKw,
    GuardKw,
    ForKw,
    InKw,
    WhileKw,
    RepeatKw,
    SwitchKw,
    CaseKw,
    DefaultKw,
    ReturnKw,
    BreakKw,
    ContinueKw,
    FallthroughKw,
    ThrowKw,
    DoKw,
    CatchKw,
    DeferKw,
    FuncKw,
    InitKw,
    LetKw,
    VarKw,
    ImportKw,
    StructKw,
    ClassKw,
    EnumKw,
    ProtocolKw,
    ExtensionKw,
    TypealiasKw,
    WhereKw,
    ThrowsKw,
    TryKw,
    TrueKw,
    FalseKw,
    NilKw,
    SelfKw,

    // Nodes
    SourceFile,
    CodeBlock,
    MemberBlock,
    ImportDecl,
    FunctionDecl,
    InitializerDecl,
    VariableDecl,
    PatternBinding,
    TypeAnnotation,
    InitializerClause,
    StructDecl,
    ClassDecl,
    EnumDecl,
    ProtocolDecl,
    ExtensionDecl,
    EnumCaseDecl,
    TypealiasDecl,
    Attribute,
    Modifier,
    InheritanceClause,
    GenericParameterClause,
    GenericArgumentClause,
    ParameterClause,
    Parameter,
    ReturnClause,
    Type,
    IfStmt,
    ElseClause,
    GuardStmt,
    ForInStmt,
    WhileStmt,
    RepeatWhileStmt,
    SwitchStmt,
    SwitchCase,
    SwitchCaseLabel,
    SwitchDefaultLabel,
    CaseItem,
    DoStmt,
    CatchClause,
    DeferStmt,
    ReturnStmt,
    ThrowStmt,
    BreakStmt,
    ContinueStmt,
    FallthroughStmt,
    ExpressionStmt,
    ConditionList,
    SequenceExpr,
    TupleExpr,
    ArrayExpr,
    ClosureExpr,
}

impl SyntaxKind {
    /// Every kind a leaf can carry, in declaration order
    pub const TOKENS: &'static [SyntaxKind] = &[
        SyntaxKind::Identifier,
        SyntaxKind::IntegerLiteral,
        SyntaxKind::FloatLiteral,
        SyntaxKind::StringLiteral,
        SyntaxKind::Operator,
        SyntaxKind::Unknown,
        SyntaxKind::Eof,
        SyntaxKind::LeftParen,
        SyntaxKind::RightParen,
        SyntaxKind::LeftBrace,
        SyntaxKind::RightBrace,
        SyntaxKind::LeftSquare,
        SyntaxKind::RightSquare,
        SyntaxKind::LeftAngle,
        SyntaxKind::RightAngle,
        SyntaxKind::Comma,
        SyntaxKind::Colon,
        SyntaxKind::Semicolon,
        SyntaxKind::Period,
        SyntaxKind::Equal,
        SyntaxKind::Arrow,
        SyntaxKind::QuestionMark,
        SyntaxKind::ExclamationMark,
        SyntaxKind::At,
        SyntaxKind::IfKw,
        SyntaxKind::ElseKw,
        SyntaxKind::GuardKw,
        SyntaxKind::ForKw,
        SyntaxKind::InKw,
        SyntaxKind::WhileKw,
        SyntaxKind::RepeatKw,
        SyntaxKind::SwitchKw,
        SyntaxKind::CaseKw,
        SyntaxKind::DefaultKw,
        SyntaxKind::ReturnKw,
        SyntaxKind::BreakKw,
        SyntaxKind::ContinueKw,
        SyntaxKind::FallthroughKw,
        SyntaxKind::ThrowKw,
        SyntaxKind::DoKw,
        SyntaxKind::CatchKw,
        SyntaxKind::DeferKw,
        SyntaxKind::FuncKw,
        SyntaxKind::InitKw,
        SyntaxKind::LetKw,
        SyntaxKind::VarKw,
        SyntaxKind::ImportKw,
        SyntaxKind::StructKw,
        SyntaxKind::ClassKw,
        SyntaxKind::EnumKw,
        SyntaxKind::ProtocolKw,
        SyntaxKind::ExtensionKw,
        SyntaxKind::TypealiasKw,
        SyntaxKind::WhereKw,
        SyntaxKind::ThrowsKw,
        SyntaxKind::TryKw,
        SyntaxKind::TrueKw,
        SyntaxKind::FalseKw,
        SyntaxKind::NilKw,
        SyntaxKind::SelfKw,
    ];

    /// Look up the keyword kind for an identifier-shaped word
    pub fn from_keyword(word: &str) -> Option<SyntaxKind> {
        let kind = match word {
            "if" => SyntaxKind::IfKw,
            "else" => SyntaxKind::ElseKw,
            "guard" => SyntaxKind::GuardKw,
            "for" => SyntaxKind::ForKw,
            "in" => SyntaxKind::InKw,
            "while" => SyntaxKind::WhileKw,
            "repeat" => SyntaxKind::RepeatKw,
            "switch" => SyntaxKind::SwitchKw,
            "case" => SyntaxKind::CaseKw,
            "default" => SyntaxKind::DefaultKw,
            "return" => SyntaxKind::ReturnKw,
            "break" => SyntaxKind::BreakKw,
            "continue" => SyntaxKind::ContinueKw,
            "fallthrough" => SyntaxKind::FallthroughKw,
            "throw" => SyntaxKind::ThrowKw,
            "do" => SyntaxKind::DoKw,
            "catch" => SyntaxKind::CatchKw,
            "defer" => SyntaxKind::DeferKw,
            "func" => SyntaxKind::FuncKw,
            "init" => SyntaxKind::InitKw,
            "let" => SyntaxKind::LetKw,
            "var" => SyntaxKind::VarKw,
            "import" => SyntaxKind::ImportKw,
            "struct" => SyntaxKind::StructKw,
            "class" => SyntaxKind::ClassKw,
            "enum" => SyntaxKind::EnumKw,
            "protocol" => SyntaxKind::ProtocolKw,
            "extension" => SyntaxKind::ExtensionKw,
            "typealias" => SyntaxKind::TypealiasKw,
            "where" => SyntaxKind::WhereKw,
            "throws" => SyntaxKind::ThrowsKw,
            "try" => SyntaxKind::TryKw,
            "true" => SyntaxKind::TrueKw,
            "false" => SyntaxKind::FalseKw,
            "nil" => SyntaxKind::NilKw,
            "self" => SyntaxKind::SelfKw,
            _ => return None,
        };
        Some(kind)
    }

    /// True for kinds that only ever appear on leaves
    pub fn is_token(self) -> bool {
        self <= SyntaxKind::SelfKw
    }

    pub fn is_keyword(self) -> bool {
        (SyntaxKind::IfKw..=SyntaxKind::SelfKw).contains(&self)
    }

    /// `{`, `(`, `[` or generic `<`
    pub fn is_opening_delimiter(self) -> bool {
        matches!(
            self,
            SyntaxKind::LeftBrace
                | SyntaxKind::LeftParen
                | SyntaxKind::LeftSquare
                | SyntaxKind::LeftAngle
        )
    }

    /// `}`, `)`, `]` or generic `>`
    pub fn is_closing_delimiter(self) -> bool {
        matches!(
            self,
            SyntaxKind::RightBrace
                | SyntaxKind::RightParen
                | SyntaxKind::RightSquare
                | SyntaxKind::RightAngle
        )
    }

    /// Statement nodes whose leading keyword opens an indentation scope
    pub fn is_control_flow(self) -> bool {
        matches!(
            self,
            SyntaxKind::IfStmt
                | SyntaxKind::ForInStmt
                | SyntaxKind::GuardStmt
                | SyntaxKind::WhileStmt
                | SyntaxKind::SwitchStmt
        )
    }

    /// Nodes that hold a sequence of statements or declarations
    pub fn is_statement_container(self) -> bool {
        matches!(
            self,
            SyntaxKind::SourceFile
                | SyntaxKind::CodeBlock
                | SyntaxKind::MemberBlock
                | SyntaxKind::ClosureExpr
                | SyntaxKind::SwitchCase
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_tokens() {
        for kind in SyntaxKind::TOKENS {
            assert!(kind.is_token(), "{kind} should be a token kind");
        }
        assert!(!SyntaxKind::SourceFile.is_token());
        assert!(!SyntaxKind::IfStmt.is_token());
    }

    #[test]
    fn test_from_keyword() {
        assert_eq!(SyntaxKind::from_keyword("guard"), Some(SyntaxKind::GuardKw));
        assert_eq!(SyntaxKind::from_keyword("self"), Some(SyntaxKind::SelfKw));
        assert_eq!(SyntaxKind::from_keyword("guarded"), None);
        assert!(SyntaxKind::GuardKw.is_keyword());
        assert!(!SyntaxKind::Identifier.is_keyword());
    }

    #[test]
    fn test_delimiters() {
        assert!(SyntaxKind::LeftAngle.is_opening_delimiter());
        assert!(SyntaxKind::RightSquare.is_closing_delimiter());
        assert!(!SyntaxKind::Operator.is_opening_delimiter());
    }
}
