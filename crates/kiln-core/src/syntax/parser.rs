//! Recursive-descent parser
//!
//! Builds a lossless [`SyntaxTree`] for the supported subset of the language:
//! declarations, control flow and statements are structured, expressions are
//! kept as flat [`SyntaxKind::SequenceExpr`] runs of tokens and bracket
//! groups. A bracket without its partner is an error, so every parsed tree
//! has balanced delimiters.

use biome_text_size::TextRange;
use thiserror::Error;

use super::kind::SyntaxKind;
use super::lexer::{LexedToken, lex_with_trivia};
use super::tree::{Leaf, NodeId, SyntaxTree};

/// Parse failure with the range of the offending token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Parse a source file
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    let (tokens, errors) = lex_with_trivia(source);
    if let Some(error) = errors.into_iter().next() {
        return Err(ParseError {
            message: error.message,
            range: error.range,
        });
    }
    Parser::new(tokens).parse_source_file()
}

type PResult<T> = Result<T, ParseError>;

/// Where a list of items lives; decides what ends it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Items {
    TopLevel,
    Block,
    Members,
    CaseBody,
}

/// Tokens that end a [`SyntaxKind::SequenceExpr`] besides closers and `;`
#[derive(Debug, Clone, Copy, Default)]
struct Stops {
    comma: bool,
    colon: bool,
    brace: bool,
    newline: bool,
    else_kw: bool,
    in_kw: bool,
    where_kw: bool,
}

impl Stops {
    const STATEMENT: Stops = Stops {
        newline: true,
        ..Stops::NONE
    };
    const NONE: Stops = Stops {
        comma: false,
        colon: false,
        brace: false,
        newline: false,
        else_kw: false,
        in_kw: false,
        where_kw: false,
    };
    const ELEMENT: Stops = Stops {
        comma: true,
        ..Stops::NONE
    };
    const CONDITION: Stops = Stops {
        comma: true,
        brace: true,
        ..Stops::NONE
    };
}

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "internal",
    "fileprivate",
    "open",
    "static",
    "final",
    "override",
    "mutating",
    "nonmutating",
    "lazy",
    "weak",
    "unowned",
    "convenience",
    "required",
    "indirect",
    "dynamic",
    "optional",
    "nonisolated",
];

struct Parser {
    tokens: Vec<LexedToken>,
    pos: usize,
    tree: SyntaxTree,
}

impl Parser {
    fn new(tokens: Vec<LexedToken>) -> Self {
        Self {
            tokens,
            pos: 0,
            tree: SyntaxTree::new(),
        }
    }

    fn parse_source_file(mut self) -> PResult<SyntaxTree> {
        let mut children = Vec::new();
        self.parse_items(Items::TopLevel, &mut children)?;
        children.push(self.expect(SyntaxKind::Eof, "end of file")?);
        let root = self.node(SyntaxKind::SourceFile, children);
        self.tree.set_root(root);
        Ok(self.tree)
    }

    // Token cursor

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map_or(SyntaxKind::Eof, |token| token.kind)
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn nth_text(&self, n: usize) -> &str {
        self.tokens
            .get(self.pos + n)
            .map_or("", |token| token.text.as_str())
    }

    fn current_text(&self) -> &str {
        self.nth_text(0)
    }

    fn at_operator(&self, text: &str) -> bool {
        self.at(SyntaxKind::Operator) && self.current_text() == text
    }

    /// The current token starts a new line
    fn at_line_start(&self) -> bool {
        self.pos == 0
            || self
                .tokens
                .get(self.pos)
                .is_some_and(|token| token.leading.contains_newlines())
    }

    /// No trivia between the previous token and the current one
    fn is_adjacent(&self) -> bool {
        let previous_trailing = self
            .pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .is_some_and(|token| !token.trailing.is_empty());
        let leading = self
            .tokens
            .get(self.pos)
            .is_some_and(|token| !token.leading.is_empty());
        !previous_trailing && !leading
    }

    fn bump(&mut self) -> NodeId {
        let kind = self.current();
        self.bump_as(kind)
    }

    fn bump_as(&mut self, kind: SyntaxKind) -> NodeId {
        let token = &mut self.tokens[self.pos];
        let leaf = Leaf {
            text: std::mem::take(&mut token.text),
            leading: std::mem::take(&mut token.leading),
            trailing: std::mem::take(&mut token.trailing),
            range: Some(token.range),
        };
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        self.tree.alloc_leaf(kind, leaf)
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> PResult<NodeId> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        let found = if token.kind == SyntaxKind::Eof {
            "end of file".to_string()
        } else {
            format!("'{}'", token.text)
        };
        ParseError {
            message: format!("{}, found {found}", message.into()),
            range: token.range,
        }
    }

    fn node(&mut self, kind: SyntaxKind, children: Vec<NodeId>) -> NodeId {
        self.tree.alloc_node(kind, children)
    }

    // Items

    fn parse_items(&mut self, context: Items, children: &mut Vec<NodeId>) -> PResult<()> {
        loop {
            match self.current() {
                SyntaxKind::Eof => return Ok(()),
                SyntaxKind::RightBrace if context == Items::TopLevel => {
                    return Err(self.error("unexpected closing brace"));
                }
                SyntaxKind::RightBrace => return Ok(()),
                SyntaxKind::CaseKw | SyntaxKind::DefaultKw if context == Items::CaseBody => {
                    return Ok(());
                }
                SyntaxKind::At if context == Items::CaseBody && self.nth_text(1) == "unknown" => {
                    return Ok(());
                }
                SyntaxKind::Semicolon => children.push(self.bump()),
                _ => {
                    let item = self.parse_item(context)?;
                    children.push(item);
                }
            }
        }
    }

    fn parse_item(&mut self, context: Items) -> PResult<NodeId> {
        let mut prefix = Vec::new();
        loop {
            if self.at(SyntaxKind::At) {
                prefix.push(self.parse_attribute()?);
            } else if self.at_modifier() {
                prefix.push(self.parse_modifier()?);
            } else {
                break;
            }
        }

        let item = match self.current() {
            SyntaxKind::ImportKw => self.parse_import(prefix)?,
            SyntaxKind::FuncKw => self.parse_function(prefix)?,
            SyntaxKind::InitKw => self.parse_initializer(prefix)?,
            SyntaxKind::LetKw | SyntaxKind::VarKw => self.parse_variable(prefix)?,
            SyntaxKind::StructKw => self.parse_type_decl(prefix, SyntaxKind::StructDecl)?,
            SyntaxKind::ClassKw => self.parse_type_decl(prefix, SyntaxKind::ClassDecl)?,
            SyntaxKind::EnumKw => self.parse_type_decl(prefix, SyntaxKind::EnumDecl)?,
            SyntaxKind::ProtocolKw => self.parse_type_decl(prefix, SyntaxKind::ProtocolDecl)?,
            SyntaxKind::ExtensionKw => self.parse_type_decl(prefix, SyntaxKind::ExtensionDecl)?,
            SyntaxKind::TypealiasKw => self.parse_typealias(prefix)?,
            SyntaxKind::CaseKw if context == Items::Members => self.parse_enum_case(prefix)?,
            _ if !prefix.is_empty() => return Err(self.error("expected declaration")),
            _ => self.parse_statement()?,
        };
        Ok(item)
    }

    fn at_modifier(&self) -> bool {
        let declaration_follows = |kind: SyntaxKind, text: &str| {
            matches!(
                kind,
                SyntaxKind::FuncKw
                    | SyntaxKind::InitKw
                    | SyntaxKind::LetKw
                    | SyntaxKind::VarKw
                    | SyntaxKind::StructKw
                    | SyntaxKind::ClassKw
                    | SyntaxKind::EnumKw
                    | SyntaxKind::ProtocolKw
                    | SyntaxKind::ExtensionKw
                    | SyntaxKind::TypealiasKw
                    | SyntaxKind::ImportKw
                    | SyntaxKind::CaseKw
            ) || (kind == SyntaxKind::Identifier && MODIFIERS.contains(&text))
        };

        match self.current() {
            SyntaxKind::Identifier if MODIFIERS.contains(&self.current_text()) => {
                let setter_scope = self.nth(1) == SyntaxKind::LeftParen
                    && self.nth_text(2) == "set"
                    && self.nth(3) == SyntaxKind::RightParen;
                setter_scope || declaration_follows(self.nth(1), self.nth_text(1))
            }
            SyntaxKind::ClassKw => {
                matches!(self.nth(1), SyntaxKind::FuncKw | SyntaxKind::VarKw | SyntaxKind::LetKw)
                    || (self.nth(1) == SyntaxKind::Identifier && MODIFIERS.contains(&self.nth_text(1)))
            }
            _ => false,
        }
    }

    /// `private`, `static`, `private(set)`
    fn parse_modifier(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        if self.at(SyntaxKind::LeftParen) {
            children.push(self.parse_group(SyntaxKind::TupleExpr, SyntaxKind::RightParen, ")")?);
        }
        Ok(self.node(SyntaxKind::Modifier, children))
    }

    /// `@name` or `@name(arguments)`
    fn parse_attribute(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.expect(SyntaxKind::Identifier, "attribute name")?);
        if self.at(SyntaxKind::LeftParen) && self.is_adjacent() {
            children.push(self.parse_group(SyntaxKind::TupleExpr, SyntaxKind::RightParen, ")")?);
        }
        Ok(self.node(SyntaxKind::Attribute, children))
    }

    fn parse_import(&mut self, mut children: Vec<NodeId>) -> PResult<NodeId> {
        children.push(self.bump());
        children.push(self.expect(SyntaxKind::Identifier, "module name")?);
        while self.at(SyntaxKind::Period) {
            children.push(self.bump());
            children.push(self.expect(SyntaxKind::Identifier, "module name")?);
        }
        Ok(self.node(SyntaxKind::ImportDecl, children))
    }

    fn parse_function(&mut self, mut children: Vec<NodeId>) -> PResult<NodeId> {
        children.push(self.bump());
        if self.at(SyntaxKind::Identifier) || self.at(SyntaxKind::Operator) {
            children.push(self.bump());
        } else {
            return Err(self.error("expected function name"));
        }
        if self.at_operator("<") {
            children.push(self.parse_generic_parameters()?);
        }
        children.push(self.parse_parameter_clause()?);
        self.parse_effects(&mut children);
        if self.at(SyntaxKind::Arrow) {
            let arrow = self.bump();
            let ty = self.parse_type()?;
            children.push(self.node(SyntaxKind::ReturnClause, vec![arrow, ty]));
        }
        self.parse_where_clause(&mut children)?;
        if self.at(SyntaxKind::LeftBrace) {
            children.push(self.parse_code_block()?);
        }
        Ok(self.node(SyntaxKind::FunctionDecl, children))
    }

    fn parse_initializer(&mut self, mut children: Vec<NodeId>) -> PResult<NodeId> {
        children.push(self.bump());
        if (self.at(SyntaxKind::QuestionMark) || self.at(SyntaxKind::ExclamationMark)) && self.is_adjacent() {
            children.push(self.bump());
        }
        if self.at_operator("<") {
            children.push(self.parse_generic_parameters()?);
        }
        children.push(self.parse_parameter_clause()?);
        self.parse_effects(&mut children);
        self.parse_where_clause(&mut children)?;
        if self.at(SyntaxKind::LeftBrace) {
            children.push(self.parse_code_block()?);
        }
        Ok(self.node(SyntaxKind::InitializerDecl, children))
    }

    /// `throws`, `rethrows`, `async`
    fn parse_effects(&mut self, children: &mut Vec<NodeId>) {
        while self.at(SyntaxKind::ThrowsKw)
            || (self.at(SyntaxKind::Identifier) && matches!(self.current_text(), "async" | "rethrows"))
        {
            children.push(self.bump());
        }
    }

    fn parse_where_clause(&mut self, children: &mut Vec<NodeId>) -> PResult<()> {
        if self.at(SyntaxKind::WhereKw) {
            children.push(self.bump());
            children.push(self.parse_sequence(Stops {
                brace: true,
                ..Stops::NONE
            })?);
        }
        Ok(())
    }

    fn parse_generic_parameters(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump_as(SyntaxKind::LeftAngle)];
        loop {
            if self.at_operator(">") {
                children.push(self.bump_as(SyntaxKind::RightAngle));
                break;
            }
            match self.current() {
                SyntaxKind::Identifier => children.push(self.bump()),
                SyntaxKind::Comma => children.push(self.bump()),
                SyntaxKind::Colon => {
                    children.push(self.bump());
                    children.push(self.parse_type()?);
                }
                _ => return Err(self.error("expected '>'")),
            }
        }
        Ok(self.node(SyntaxKind::GenericParameterClause, children))
    }

    fn parse_parameter_clause(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.expect(SyntaxKind::LeftParen, "'('")?];
        loop {
            match self.current() {
                SyntaxKind::RightParen => {
                    children.push(self.bump());
                    break;
                }
                SyntaxKind::Comma => children.push(self.bump()),
                _ => children.push(self.parse_parameter()?),
            }
        }
        Ok(self.node(SyntaxKind::ParameterClause, children))
    }

    /// `label name: Type = default`
    fn parse_parameter(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        while self.at(SyntaxKind::Identifier) || self.current().is_keyword() {
            children.push(self.bump());
        }
        if children.is_empty() {
            return Err(self.error("expected parameter name"));
        }
        children.push(self.expect(SyntaxKind::Colon, "':'")?);
        children.push(self.parse_type()?);
        if self.at(SyntaxKind::Equal) {
            children.push(self.bump());
            children.push(self.parse_sequence(Stops::ELEMENT)?);
        }
        Ok(self.node(SyntaxKind::Parameter, children))
    }

    fn parse_variable(&mut self, mut children: Vec<NodeId>) -> PResult<NodeId> {
        children.push(self.bump());
        loop {
            children.push(self.parse_pattern_binding()?);
            if self.at(SyntaxKind::Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        Ok(self.node(SyntaxKind::VariableDecl, children))
    }

    fn parse_pattern_binding(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        match self.current() {
            SyntaxKind::Identifier => children.push(self.bump()),
            SyntaxKind::LeftParen => {
                children.push(self.parse_group(SyntaxKind::TupleExpr, SyntaxKind::RightParen, ")")?)
            }
            _ => return Err(self.error("expected pattern")),
        }
        if self.at(SyntaxKind::Colon) {
            let colon = self.bump();
            let ty = self.parse_type()?;
            children.push(self.node(SyntaxKind::TypeAnnotation, vec![colon, ty]));
        }
        if self.at(SyntaxKind::Equal) {
            let equal = self.bump();
            let value = self.parse_sequence(Stops {
                comma: true,
                newline: true,
                ..Stops::NONE
            })?;
            children.push(self.node(SyntaxKind::InitializerClause, vec![equal, value]));
        } else if self.at(SyntaxKind::LeftBrace) {
            children.push(self.parse_code_block()?);
        }
        Ok(self.node(SyntaxKind::PatternBinding, children))
    }

    fn parse_type_decl(&mut self, mut children: Vec<NodeId>, kind: SyntaxKind) -> PResult<NodeId> {
        children.push(self.bump());
        if kind == SyntaxKind::ExtensionDecl {
            children.push(self.parse_type()?);
        } else {
            children.push(self.expect(SyntaxKind::Identifier, "type name")?);
            if self.at_operator("<") && self.is_adjacent() {
                children.push(self.parse_generic_parameters()?);
            }
        }
        if self.at(SyntaxKind::Colon) {
            let mut clause = vec![self.bump()];
            loop {
                clause.push(self.parse_type()?);
                if self.at(SyntaxKind::Comma) {
                    clause.push(self.bump());
                } else {
                    break;
                }
            }
            children.push(self.node(SyntaxKind::InheritanceClause, clause));
        }
        self.parse_where_clause(&mut children)?;
        children.push(self.parse_member_block()?);
        Ok(self.node(kind, children))
    }

    fn parse_member_block(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.expect(SyntaxKind::LeftBrace, "'{'")?];
        self.parse_items(Items::Members, &mut children)?;
        children.push(self.expect(SyntaxKind::RightBrace, "'}'")?);
        Ok(self.node(SyntaxKind::MemberBlock, children))
    }

    fn parse_enum_case(&mut self, mut children: Vec<NodeId>) -> PResult<NodeId> {
        children.push(self.bump());
        loop {
            let element = self.parse_sequence(Stops {
                comma: true,
                newline: true,
                ..Stops::NONE
            })?;
            children.push(self.node(SyntaxKind::CaseItem, vec![element]));
            if self.at(SyntaxKind::Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        Ok(self.node(SyntaxKind::EnumCaseDecl, children))
    }

    fn parse_typealias(&mut self, mut children: Vec<NodeId>) -> PResult<NodeId> {
        children.push(self.bump());
        children.push(self.expect(SyntaxKind::Identifier, "type name")?);
        if self.at_operator("<") && self.is_adjacent() {
            children.push(self.parse_generic_parameters()?);
        }
        children.push(self.expect(SyntaxKind::Equal, "'='")?);
        children.push(self.parse_type()?);
        Ok(self.node(SyntaxKind::TypealiasDecl, children))
    }

    // Types

    fn parse_type(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        match self.current() {
            SyntaxKind::LeftParen => {
                children.push(self.bump());
                loop {
                    match self.current() {
                        SyntaxKind::RightParen => {
                            children.push(self.bump());
                            break;
                        }
                        SyntaxKind::Comma => children.push(self.bump()),
                        SyntaxKind::Identifier if self.nth(1) == SyntaxKind::Colon => {
                            children.push(self.bump());
                            children.push(self.bump());
                        }
                        _ => children.push(self.parse_type()?),
                    }
                }
                self.parse_effects(&mut children);
                if self.at(SyntaxKind::Arrow) {
                    children.push(self.bump());
                    children.push(self.parse_type()?);
                }
            }
            SyntaxKind::LeftSquare => {
                children.push(self.bump());
                children.push(self.parse_type()?);
                if self.at(SyntaxKind::Colon) {
                    children.push(self.bump());
                    children.push(self.parse_type()?);
                }
                children.push(self.expect(SyntaxKind::RightSquare, "']'")?);
            }
            SyntaxKind::Identifier | SyntaxKind::SelfKw => {
                while self.at(SyntaxKind::Identifier)
                    && matches!(self.current_text(), "some" | "any" | "inout")
                    && self.nth(1) == SyntaxKind::Identifier
                {
                    children.push(self.bump());
                }
                children.push(self.bump());
                self.parse_generic_arguments(&mut children)?;
                while self.at(SyntaxKind::Period) && self.nth(1) == SyntaxKind::Identifier {
                    children.push(self.bump());
                    children.push(self.bump());
                    self.parse_generic_arguments(&mut children)?;
                }
            }
            _ => return Err(self.error("expected type")),
        }

        while ((self.at(SyntaxKind::QuestionMark) || self.at(SyntaxKind::ExclamationMark))
            && self.is_adjacent())
            || self.at_operator("...")
        {
            children.push(self.bump());
        }
        Ok(self.node(SyntaxKind::Type, children))
    }

    fn parse_generic_arguments(&mut self, children: &mut Vec<NodeId>) -> PResult<()> {
        if !(self.at_operator("<") && self.is_adjacent()) {
            return Ok(());
        }
        let mut clause = vec![self.bump_as(SyntaxKind::LeftAngle)];
        loop {
            if self.at_operator(">") {
                clause.push(self.bump_as(SyntaxKind::RightAngle));
                break;
            }
            if self.at(SyntaxKind::Comma) {
                clause.push(self.bump());
                continue;
            }
            clause.push(self.parse_type()?);
            if !(self.at_operator(">") || self.at(SyntaxKind::Comma)) {
                return Err(self.error("expected '>'"));
            }
        }
        children.push(self.node(SyntaxKind::GenericArgumentClause, clause));
        Ok(())
    }

    // Statements

    fn parse_statement(&mut self) -> PResult<NodeId> {
        match self.current() {
            SyntaxKind::IfKw => self.parse_if(),
            SyntaxKind::GuardKw => self.parse_guard(),
            SyntaxKind::ForKw => self.parse_for_in(),
            SyntaxKind::WhileKw => self.parse_while(),
            SyntaxKind::RepeatKw => self.parse_repeat_while(),
            SyntaxKind::SwitchKw => self.parse_switch(),
            SyntaxKind::DoKw => self.parse_do(),
            SyntaxKind::DeferKw => {
                let keyword = self.bump();
                let body = self.parse_code_block()?;
                Ok(self.node(SyntaxKind::DeferStmt, vec![keyword, body]))
            }
            SyntaxKind::ReturnKw => {
                let mut children = vec![self.bump()];
                if self.at_expression_on_same_line() {
                    children.push(self.parse_sequence(Stops::STATEMENT)?);
                }
                Ok(self.node(SyntaxKind::ReturnStmt, children))
            }
            SyntaxKind::ThrowKw => {
                let keyword = self.bump();
                let value = self.parse_sequence(Stops::STATEMENT)?;
                Ok(self.node(SyntaxKind::ThrowStmt, vec![keyword, value]))
            }
            SyntaxKind::BreakKw | SyntaxKind::ContinueKw => {
                let kind = if self.at(SyntaxKind::BreakKw) {
                    SyntaxKind::BreakStmt
                } else {
                    SyntaxKind::ContinueStmt
                };
                let mut children = vec![self.bump()];
                if self.at(SyntaxKind::Identifier) && !self.at_line_start() {
                    children.push(self.bump());
                }
                Ok(self.node(kind, children))
            }
            SyntaxKind::FallthroughKw => {
                let keyword = self.bump();
                Ok(self.node(SyntaxKind::FallthroughStmt, vec![keyword]))
            }
            _ => {
                let expr = self.parse_sequence(Stops::STATEMENT)?;
                Ok(self.node(SyntaxKind::ExpressionStmt, vec![expr]))
            }
        }
    }

    fn at_expression_on_same_line(&self) -> bool {
        !self.at_line_start()
            && !matches!(
                self.current(),
                SyntaxKind::RightBrace
                    | SyntaxKind::RightParen
                    | SyntaxKind::RightSquare
                    | SyntaxKind::Semicolon
                    | SyntaxKind::Eof
            )
    }

    fn parse_code_block(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.expect(SyntaxKind::LeftBrace, "'{'")?];
        self.parse_items(Items::Block, &mut children)?;
        children.push(self.expect(SyntaxKind::RightBrace, "'}'")?);
        Ok(self.node(SyntaxKind::CodeBlock, children))
    }

    fn parse_conditions(&mut self, stops: Stops) -> PResult<NodeId> {
        let mut children = Vec::new();
        loop {
            children.push(self.parse_sequence(stops)?);
            if self.at(SyntaxKind::Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        Ok(self.node(SyntaxKind::ConditionList, children))
    }

    fn parse_if(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_conditions(Stops::CONDITION)?);
        children.push(self.parse_code_block()?);
        if self.at(SyntaxKind::ElseKw) {
            let keyword = self.bump();
            let body = if self.at(SyntaxKind::IfKw) {
                self.parse_if()?
            } else {
                self.parse_code_block()?
            };
            children.push(self.node(SyntaxKind::ElseClause, vec![keyword, body]));
        }
        Ok(self.node(SyntaxKind::IfStmt, children))
    }

    fn parse_guard(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_conditions(Stops {
            comma: true,
            else_kw: true,
            ..Stops::NONE
        })?);
        children.push(self.expect(SyntaxKind::ElseKw, "'else'")?);
        children.push(self.parse_code_block()?);
        Ok(self.node(SyntaxKind::GuardStmt, children))
    }

    fn parse_for_in(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_sequence(Stops {
            in_kw: true,
            ..Stops::NONE
        })?);
        children.push(self.expect(SyntaxKind::InKw, "'in'")?);
        children.push(self.parse_sequence(Stops {
            brace: true,
            where_kw: true,
            ..Stops::NONE
        })?);
        if self.at(SyntaxKind::WhereKw) {
            children.push(self.bump());
            children.push(self.parse_sequence(Stops {
                brace: true,
                ..Stops::NONE
            })?);
        }
        children.push(self.parse_code_block()?);
        Ok(self.node(SyntaxKind::ForInStmt, children))
    }

    fn parse_while(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_conditions(Stops::CONDITION)?);
        children.push(self.parse_code_block()?);
        Ok(self.node(SyntaxKind::WhileStmt, children))
    }

    fn parse_repeat_while(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_code_block()?);
        children.push(self.expect(SyntaxKind::WhileKw, "'while'")?);
        children.push(self.parse_sequence(Stops::STATEMENT)?);
        Ok(self.node(SyntaxKind::RepeatWhileStmt, children))
    }

    fn parse_switch(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_sequence(Stops {
            brace: true,
            ..Stops::NONE
        })?);
        children.push(self.expect(SyntaxKind::LeftBrace, "'{'")?);
        loop {
            match self.current() {
                SyntaxKind::RightBrace => {
                    children.push(self.bump());
                    break;
                }
                SyntaxKind::CaseKw | SyntaxKind::DefaultKw | SyntaxKind::At => {
                    children.push(self.parse_switch_case()?);
                }
                _ => return Err(self.error("expected 'case' or 'default'")),
            }
        }
        Ok(self.node(SyntaxKind::SwitchStmt, children))
    }

    fn parse_switch_case(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        if self.at(SyntaxKind::At) {
            children.push(self.parse_attribute()?);
        }
        let label = match self.current() {
            SyntaxKind::CaseKw => {
                let mut label = vec![self.bump()];
                loop {
                    let pattern = self.parse_sequence(Stops {
                        comma: true,
                        colon: true,
                        ..Stops::NONE
                    })?;
                    label.push(self.node(SyntaxKind::CaseItem, vec![pattern]));
                    if self.at(SyntaxKind::Comma) {
                        label.push(self.bump());
                    } else {
                        break;
                    }
                }
                label.push(self.expect(SyntaxKind::Colon, "':'")?);
                self.node(SyntaxKind::SwitchCaseLabel, label)
            }
            SyntaxKind::DefaultKw => {
                let keyword = self.bump();
                let colon = self.expect(SyntaxKind::Colon, "':'")?;
                self.node(SyntaxKind::SwitchDefaultLabel, vec![keyword, colon])
            }
            _ => return Err(self.error("expected 'case' or 'default'")),
        };
        children.push(label);
        self.parse_items(Items::CaseBody, &mut children)?;
        Ok(self.node(SyntaxKind::SwitchCase, children))
    }

    fn parse_do(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        children.push(self.parse_code_block()?);
        while self.at(SyntaxKind::CatchKw) {
            let mut clause = vec![self.bump()];
            if !self.at(SyntaxKind::LeftBrace) {
                clause.push(self.parse_sequence(Stops {
                    brace: true,
                    ..Stops::NONE
                })?);
            }
            clause.push(self.parse_code_block()?);
            children.push(self.node(SyntaxKind::CatchClause, clause));
        }
        Ok(self.node(SyntaxKind::DoStmt, children))
    }

    // Expressions

    fn parse_sequence(&mut self, stops: Stops) -> PResult<NodeId> {
        let mut items = Vec::new();
        loop {
            let kind = self.current();
            let stop = match kind {
                SyntaxKind::Eof
                | SyntaxKind::Semicolon
                | SyntaxKind::RightParen
                | SyntaxKind::RightSquare
                | SyntaxKind::RightBrace => true,
                SyntaxKind::Comma => stops.comma,
                SyntaxKind::Colon => stops.colon,
                SyntaxKind::LeftBrace => stops.brace,
                SyntaxKind::ElseKw => stops.else_kw,
                SyntaxKind::InKw => stops.in_kw,
                SyntaxKind::WhereKw => stops.where_kw,
                _ => false,
            };
            let line_ends = stops.newline
                && !items.is_empty()
                && self.at_line_start()
                && !matches!(
                    kind,
                    SyntaxKind::Period | SyntaxKind::Operator | SyntaxKind::QuestionMark
                );
            if stop || line_ends {
                break;
            }

            let item = match kind {
                SyntaxKind::LeftParen => {
                    self.parse_group(SyntaxKind::TupleExpr, SyntaxKind::RightParen, ")")?
                }
                SyntaxKind::LeftSquare => {
                    self.parse_group(SyntaxKind::ArrayExpr, SyntaxKind::RightSquare, "]")?
                }
                SyntaxKind::LeftBrace => self.parse_closure()?,
                _ => self.bump(),
            };
            items.push(item);
        }

        if items.is_empty() {
            return Err(self.error("expected expression"));
        }
        Ok(self.node(SyntaxKind::SequenceExpr, items))
    }

    /// `( a, b )` or `[ a, b ]` with comma-separated elements
    fn parse_group(&mut self, kind: SyntaxKind, close: SyntaxKind, close_text: &str) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        loop {
            if self.at(close) {
                children.push(self.bump());
                break;
            }
            if self.at(SyntaxKind::Comma) {
                children.push(self.bump());
                continue;
            }
            if self.at(SyntaxKind::Eof) {
                return Err(self.error(format!("expected '{close_text}'")));
            }
            children.push(self.parse_sequence(Stops::ELEMENT)?);
        }
        Ok(self.node(kind, children))
    }

    fn parse_closure(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.bump()];
        self.parse_items(Items::Block, &mut children)?;
        children.push(self.expect(SyntaxKind::RightBrace, "'}'")?);
        Ok(self.node(SyntaxKind::ClosureExpr, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> SyntaxTree {
        match parse(source) {
            Ok(tree) => tree,
            Err(error) => panic!("parse failed: {error} at {:?}", error.range),
        }
    }

    #[test]
    fn test_round_trip() {
        let source = r#"import Foundation

/// A point.
public struct Point<T>: Equatable, Hashable {
  var x: T
  private(set) var y: [String: Int] = [:]

  static func make(from other: Point<T>, scale: Double = 1.0) throws -> Point<T>? {
    guard scale > 0 else { return nil }
    return other
  }
}

enum Shape {
  case circle(Double), square
  indirect case nested(Shape)
}

func run(values: [Int]) {
  for value in values where value > 1 {
    if value % 2 == 0 {
      print("even \(value)") ; continue
    } else if value == 3 {
      break
    } else {
      fallthroughHelper()
    }
  }
  switch values.count {
  case 0, 1:
    print("few")
    fallthrough
  default:
    break
  }
  let doubled = values.map { $0 * 2 }
  repeat {
    x += 1
  } while x < 10
  do {
    try risky()
  } catch let error as MyError {
    print(error)
  }
  defer { cleanup() }
}
"#;
        let tree = parse_ok(source);
        assert_eq!(tree.to_string(), source);
    }

    #[test]
    fn test_if_statement_shape() {
        let tree = parse_ok("if x { return 1 }");
        insta::assert_snapshot!(tree.debug_dump(tree.root()), @r###"
        SourceFile
          IfStmt
            IfKw "if"
            ConditionList
              SequenceExpr
                Identifier "x"
            CodeBlock
              LeftBrace "{"
              ReturnStmt
                ReturnKw "return"
                SequenceExpr
                  IntegerLiteral "1"
              RightBrace "}"
          Eof ""
        "###);
    }

    #[test]
    fn test_switch_labels() {
        let tree = parse_ok("switch x {\ncase 1:\n  a()\ndefault:\n  b()\n}\n");
        let switch = tree.children(tree.root())[0];
        assert_eq!(tree.kind(switch), SyntaxKind::SwitchStmt);
        let cases: Vec<_> = tree
            .children(switch)
            .iter()
            .filter(|&&child| tree.kind(child) == SyntaxKind::SwitchCase)
            .map(|&case| tree.kind(tree.children(case)[0]))
            .collect();
        assert_eq!(
            cases,
            vec![SyntaxKind::SwitchCaseLabel, SyntaxKind::SwitchDefaultLabel]
        );
    }

    #[test]
    fn test_generic_angles_become_delimiters() {
        let tree = parse_ok("let x: Array<Set<Int>> = []\nlet y = a < b\n");
        let kinds: Vec<_> = tree
            .leaves(tree.root())
            .map(|leaf| tree.kind(leaf))
            .filter(|kind| {
                matches!(
                    kind,
                    SyntaxKind::LeftAngle | SyntaxKind::RightAngle | SyntaxKind::Operator
                )
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::LeftAngle,
                SyntaxKind::LeftAngle,
                SyntaxKind::RightAngle,
                SyntaxKind::RightAngle,
                SyntaxKind::Operator,
            ]
        );
    }

    #[test]
    fn test_statements_split_on_newlines() {
        let tree = parse_ok("a = 1\nb = 2\n  .c\n");
        let statements: Vec<_> = tree
            .children(tree.root())
            .iter()
            .filter(|&&child| tree.kind(child) == SyntaxKind::ExpressionStmt)
            .map(|&stmt| tree.text(stmt).trim().to_string())
            .collect();
        assert_eq!(statements, vec!["a = 1", "b = 2\n  .c"]);
    }

    #[test]
    fn test_semicolons_belong_to_container() {
        let tree = parse_ok("a(); b()");
        let kinds: Vec<_> = tree
            .children(tree.root())
            .iter()
            .map(|&child| tree.kind(child))
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ExpressionStmt,
                SyntaxKind::Semicolon,
                SyntaxKind::ExpressionStmt,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn test_missing_brace_is_error() {
        let error = parse("func f() {\n  return 1\n").unwrap_err();
        assert_eq!(error.message, "expected '}', found end of file");
    }

    #[test]
    fn test_stray_closer_is_error() {
        let error = parse("a)\n").unwrap_err();
        assert_eq!(error.message, "expected expression, found ')'");
        assert!(parse("}\n").is_err());
    }

    #[test]
    fn test_lex_error_surfaces() {
        let error = parse("/* open").unwrap_err();
        assert_eq!(error.message, "unterminated block comment");
    }
}
