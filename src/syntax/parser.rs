//! Recursive descent parser for C# declarations
//!
//! Parses the outline of a file: usings, namespaces, type declarations and
//! method signatures. Bodies, fields, properties, constructors and anything
//! else are skipped by balanced-delimiter scanning, so arbitrary statement
//! and expression syntax inside them never has to be understood.
#![allow(clippy::result_large_err)]

use crate::diagnostics::error_codes::syntax;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Span};
use crate::syntax::ast::*;
use crate::syntax::lexer::{Lexer, Token, TokenKind};
use crate::syntax::span::SourceFile;

/// Keywords naming built-in types
pub const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "nint", "nuint",
    "long", "ulong", "object", "short", "ushort", "string", "void", "dynamic",
];

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "async", "abstract", "virtual",
    "override", "sealed", "readonly", "unsafe", "extern", "new", "partial", "volatile", "const",
    "required", "file", "ref", "fixed",
];

enum NamespaceItem {
    Using(UsingDirective),
    Member(NamespaceMember),
}

/// Parser over a pre-lexed token stream
pub struct Parser<'a> {
    source: &'a SourceFile,
    tokens: Vec<Token>,
    pos: usize,
    errors: DiagnosticBag,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>, source: &'a SourceFile) -> Self {
        Self {
            source,
            tokens: lexer.tokenize(),
            pos: 0,
            errors: DiagnosticBag::new(),
        }
    }

    /// Parse a complete file
    pub fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, DiagnosticBag> {
        // Unterminated strings are reported even inside skipped bodies
        for token in &self.tokens {
            if token.kind == TokenKind::UnterminatedString {
                self.errors.push(
                    Diagnostic::error(syntax::UNTERMINATED_LITERAL)
                        .message("Unterminated string literal")
                        .span(token.span.clone())
                        .build(),
                );
            }
        }

        let mut usings = Vec::new();
        let mut members = Vec::new();
        self.parse_namespace_body(&mut usings, &mut members, false);

        if self.errors.has_errors() {
            return Err(std::mem::take(&mut self.errors));
        }

        Ok(CompilationUnit {
            path: self.source.path().to_path_buf(),
            span: self.source.span(0, self.source.content().len()),
            usings,
            members,
        })
    }

    /// Parse exactly one type and nothing after it
    pub fn parse_standalone_type(&mut self) -> Result<TypeSyntax, DiagnosticBag> {
        let parsed = self.parse_type().and_then(|ty| {
            if self.is_eof() {
                Ok(ty)
            } else {
                Err(self.error_unexpected("end of type"))
            }
        });
        parsed.map_err(|diag| {
            self.errors.push(diag);
            std::mem::take(&mut self.errors)
        })
    }

    fn parse_namespace_body(
        &mut self,
        usings: &mut Vec<UsingDirective>,
        members: &mut Vec<NamespaceMember>,
        braced: bool,
    ) {
        loop {
            if self.is_eof() {
                return;
            }
            if self.check(&TokenKind::RBrace) {
                if braced {
                    return;
                }
                let diag = self.error_unexpected("declaration");
                self.errors.push(diag);
                self.advance();
                continue;
            }

            if self.skip_error_token() {
                continue;
            }

            let before = self.pos;
            match self.parse_namespace_member() {
                Ok(Some(NamespaceItem::Using(using))) => usings.push(using),
                Ok(Some(NamespaceItem::Member(member))) => members.push(member),
                Ok(None) => {}
                Err(diag) => {
                    self.errors.push(diag);
                    self.recover(before);
                }
            }
            if self.pos == before {
                self.advance();
            }
        }
    }

    fn parse_namespace_member(&mut self) -> Result<Option<NamespaceItem>, Diagnostic> {
        let start = self.current_span();

        if self.check_ident("global") && self.peek_at(1).kind.is_ident("using") {
            self.advance();
            return self
                .parse_using(start, true)
                .map(|using| Some(NamespaceItem::Using(using)));
        }
        if self.check_ident("using")
            && !matches!(self.peek_at(1).kind, TokenKind::LParen)
            && !self.peek_at(1).kind.is_ident("var")
        {
            return self
                .parse_using(start, false)
                .map(|using| Some(NamespaceItem::Using(using)));
        }
        if self.eat(&TokenKind::Semi) {
            return Ok(None);
        }

        let attributes = self.parse_attribute_lists()?;
        if self.check_ident("namespace") {
            return self
                .parse_namespace(start)
                .map(|ns| Some(NamespaceItem::Member(NamespaceMember::Namespace(ns))));
        }

        let modifiers = self.parse_modifiers();
        if self.at_type_keyword() {
            let decl = self.parse_type_decl(start, attributes, modifiers)?;
            return Ok(Some(NamespaceItem::Member(NamespaceMember::Type(decl))));
        }

        // Top-level statements, delegates, extern aliases
        self.skip_member();
        Ok(None)
    }

    fn parse_using(&mut self, start: Span, global: bool) -> Result<UsingDirective, Diagnostic> {
        self.expect(&TokenKind::Ident("using".into()), "`using`")?;

        let kind = if self.eat_ident("static") {
            UsingKind::Static(self.parse_type()?.to_string())
        } else if matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1).kind, TokenKind::Eq)
        {
            let (alias, _) = self.expect_ident()?;
            self.advance();
            UsingKind::Alias {
                alias,
                target: self.parse_type()?.to_string(),
            }
        } else {
            UsingKind::Namespace(self.parse_qualified_name()?)
        };

        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(UsingDirective {
            span: self.span_from(&start),
            global,
            kind,
        })
    }

    fn parse_namespace(&mut self, start: Span) -> Result<NamespaceDecl, Diagnostic> {
        self.advance();
        let name = self.parse_qualified_name()?;
        let mut usings = Vec::new();
        let mut members = Vec::new();

        let file_scoped = self.eat(&TokenKind::Semi);
        if file_scoped {
            self.parse_namespace_body(&mut usings, &mut members, false);
        } else {
            self.expect(&TokenKind::LBrace, "`{`")?;
            self.parse_namespace_body(&mut usings, &mut members, true);
            self.expect_closing_brace(&start)?;
            self.eat(&TokenKind::Semi);
        }

        Ok(NamespaceDecl {
            span: self.span_from(&start),
            name,
            file_scoped,
            usings,
            members,
        })
    }

    fn at_type_keyword(&self) -> bool {
        match self.peek().kind.ident() {
            Some("class" | "struct" | "interface" | "enum") => true,
            Some("record") => matches!(self.peek_at(1).kind, TokenKind::Ident(_)),
            _ => false,
        }
    }

    fn parse_type_decl(
        &mut self,
        start: Span,
        attributes: Vec<AttributeList>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDecl, Diagnostic> {
        let keyword = self.advance();
        let kind = match keyword.kind.ident() {
            Some("class") => TypeKind::Class,
            Some("struct") => TypeKind::Struct,
            Some("interface") => TypeKind::Interface,
            Some("enum") => TypeKind::Enum,
            _ => {
                if self.eat_ident("struct") {
                    TypeKind::RecordStruct
                } else {
                    self.eat_ident("class");
                    TypeKind::Record
                }
            }
        };

        let (name, name_span) = self.expect_ident()?;
        let type_parameters = if self.check(&TokenKind::Lt) {
            self.parse_type_parameter_list()?
        } else {
            Vec::new()
        };
        if self.check(&TokenKind::LParen) {
            self.skip_balanced();
        }

        // Base list and constraints
        while !matches!(
            self.peek().kind,
            TokenKind::LBrace | TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        ) {
            if matches!(self.peek().kind, TokenKind::LParen | TokenKind::LBracket) {
                self.skip_balanced();
            } else {
                self.advance();
            }
        }

        let mut members = Vec::new();
        if !self.eat(&TokenKind::Semi) {
            if kind == TypeKind::Enum {
                if !self.check(&TokenKind::LBrace) {
                    return Err(self.error_unexpected("`{`"));
                }
                self.skip_balanced();
            } else {
                self.expect(&TokenKind::LBrace, "`{`")?;
                self.parse_type_body(&mut members);
                self.expect_closing_brace(&start)?;
            }
            self.eat(&TokenKind::Semi);
        }

        Ok(TypeDecl {
            span: self.span_from(&start),
            kind,
            name,
            name_span,
            type_parameters,
            attributes,
            modifiers,
            members,
        })
    }

    fn parse_type_body(&mut self, members: &mut Vec<TypeMember>) {
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.skip_error_token() {
                continue;
            }

            let before = self.pos;
            match self.parse_type_member() {
                Ok(Some(member)) => members.push(member),
                Ok(None) => {}
                Err(diag) => {
                    self.errors.push(diag);
                    self.recover(before);
                }
            }
            if self.pos == before {
                self.advance();
            }
        }
    }

    fn parse_type_member(&mut self) -> Result<Option<TypeMember>, Diagnostic> {
        let start = self.current_span();
        if self.eat(&TokenKind::Semi) {
            return Ok(None);
        }

        let attributes = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if self.at_type_keyword() {
            return self
                .parse_type_decl(start, attributes, modifiers)
                .map(|decl| Some(TypeMember::Type(decl)));
        }

        let skipped_kind = matches!(
            self.peek().kind.ident(),
            Some("delegate" | "event" | "operator" | "implicit" | "explicit")
        ) || self.check(&TokenKind::Tilde)
            || (matches!(self.peek().kind, TokenKind::Ident(_))
                && matches!(self.peek_at(1).kind, TokenKind::LParen));
        if skipped_kind {
            self.skip_member();
            return Ok(None);
        }

        let save = self.pos;
        let return_type = match self.parse_type() {
            Ok(ty) => ty,
            Err(_) => {
                self.pos = save;
                self.skip_member();
                return Ok(None);
            }
        };

        if !matches!(self.peek().kind, TokenKind::Ident(_))
            || self.check_ident("operator")
            || self.check_ident("this")
        {
            self.skip_member();
            return Ok(None);
        }

        let (mut name, mut name_span) = self.expect_ident()?;
        let mut type_parameters = Vec::new();
        loop {
            if self.check(&TokenKind::Lt) {
                type_parameters = self.parse_type_parameter_list()?;
            }
            // Explicit interface implementation: `IRepo<T>.Load`
            if self.check(&TokenKind::Dot) && matches!(self.peek_at(1).kind, TokenKind::Ident(_)) {
                self.advance();
                let (next, next_span) = self.expect_ident()?;
                name = next;
                name_span = next_span;
                type_parameters.clear();
                continue;
            }
            break;
        }

        if !self.check(&TokenKind::LParen) {
            // Field or property
            self.skip_member();
            return Ok(None);
        }
        self.skip_balanced();

        // Constraints
        while !matches!(
            self.peek().kind,
            TokenKind::LBrace | TokenKind::FatArrow | TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        ) {
            if matches!(self.peek().kind, TokenKind::LParen | TokenKind::LBracket) {
                self.skip_balanced();
            } else {
                self.advance();
            }
        }

        let body = if self.check(&TokenKind::LBrace) {
            self.skip_balanced();
            MethodBody::Block
        } else if self.eat(&TokenKind::FatArrow) {
            self.skip_to_semicolon();
            MethodBody::Expression
        } else if self.eat(&TokenKind::Semi) {
            MethodBody::None
        } else {
            return Err(self.error_unexpected("method body"));
        };

        Ok(Some(TypeMember::Method(MethodDecl {
            span: self.span_from(&start),
            attributes,
            modifiers,
            return_type,
            name,
            name_span,
            type_parameters,
            body,
        })))
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while let Some(keyword) = self.peek().kind.ident() {
            if !MODIFIERS.contains(&keyword) {
                break;
            }
            // `new()` or `partial(` are not modifiers
            if matches!(self.peek_at(1).kind, TokenKind::LParen) {
                break;
            }
            let token = self.advance();
            if let TokenKind::Ident(keyword) = token.kind {
                modifiers.push(Modifier {
                    keyword,
                    span: token.span,
                });
            }
        }
        modifiers
    }

    fn parse_type_parameter_list(&mut self) -> Result<Vec<String>, Diagnostic> {
        self.expect(&TokenKind::Lt, "`<`")?;
        let mut params = Vec::new();
        loop {
            self.parse_attribute_lists()?;
            if self.check_ident("in") || self.check_ident("out") {
                if matches!(self.peek_at(1).kind, TokenKind::Ident(_)) {
                    self.advance();
                }
            }
            let (name, _) = self.expect_ident()?;
            params.push(name);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Gt, "`>`")?;
        Ok(params)
    }

    fn parse_attribute_lists(&mut self) -> Result<Vec<AttributeList>, Diagnostic> {
        let mut lists = Vec::new();
        while self.check(&TokenKind::LBracket) {
            lists.push(self.parse_attribute_list()?);
        }
        Ok(lists)
    }

    fn parse_attribute_list(&mut self) -> Result<AttributeList, Diagnostic> {
        let start = self.current_span();
        self.expect(&TokenKind::LBracket, "`[`")?;

        let target = if matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1).kind, TokenKind::Colon)
        {
            let (target, _) = self.expect_ident()?;
            self.advance();
            Some(target)
        } else {
            None
        };

        let mut attributes = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            attributes.push(self.parse_attribute()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket, "`]`")?;

        Ok(AttributeList {
            span: self.span_from(&start),
            target,
            attributes,
        })
    }

    fn parse_attribute(&mut self) -> Result<Attribute, Diagnostic> {
        let start = self.current_span();
        if matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1).kind, TokenKind::ColonColon)
        {
            self.advance();
            self.advance();
        }

        let mut name = vec![self.expect_ident()?.0];
        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push(self.expect_ident()?.0);
        }
        if self.check(&TokenKind::Lt) {
            self.parse_type_arguments();
        }

        let mut arguments = Vec::new();
        if self.eat(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) {
                arguments.push(self.parse_attribute_argument()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen, "`)`")?;
        }

        Ok(Attribute {
            span: self.span_from(&start),
            name,
            arguments,
        })
    }

    fn parse_attribute_argument(&mut self) -> Result<AttributeArgument, Diagnostic> {
        let start = self.current_span();
        let name = if matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1).kind, TokenKind::Colon | TokenKind::Eq)
        {
            let (name, _) = self.expect_ident()?;
            self.advance();
            Some(name)
        } else {
            None
        };

        let first = self.pos;
        while !matches!(
            self.peek().kind,
            TokenKind::Comma
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Semi
                | TokenKind::Eof
        ) {
            if matches!(
                self.peek().kind,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
            ) {
                self.skip_balanced();
            } else {
                self.advance();
            }
        }
        if self.pos == first {
            return Err(self.error_unexpected("attribute argument"));
        }

        let kinds: Vec<&TokenKind> = self.tokens[first..self.pos].iter().map(|t| &t.kind).collect();
        let value = match kinds.as_slice() {
            [TokenKind::IntLit(v)] => AttributeValue::Int(*v),
            [TokenKind::Minus, TokenKind::IntLit(v)] => AttributeValue::Int(v.wrapping_neg()),
            [TokenKind::StringLit(s)] => AttributeValue::Str(s.clone()),
            [TokenKind::Ident(b)] if b == "true" || b == "false" => AttributeValue::Bool(b == "true"),
            _ => {
                let from = self.tokens[first].span.start;
                let to = self.tokens[self.pos - 1].span.end;
                AttributeValue::Other(self.source.content()[from..to].to_string())
            }
        };

        Ok(AttributeArgument {
            span: self.span_from(&start),
            name,
            value,
        })
    }

    fn parse_qualified_name(&mut self) -> Result<String, Diagnostic> {
        let mut name = self.expect_ident()?.0;
        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?.0);
        }
        Ok(name)
    }

    /// Parse a type in declaration position
    pub(crate) fn parse_type(&mut self) -> Result<TypeSyntax, Diagnostic> {
        let start = self.current_span();
        let mut ty = if self.check(&TokenKind::LParen) {
            self.parse_tuple_type(&start)?
        } else {
            match self.peek().kind.ident() {
                Some(keyword) if PREDEFINED_TYPES.contains(&keyword) => {
                    let token = self.advance();
                    TypeSyntax::Predefined {
                        keyword: token.kind.ident().unwrap_or_default().to_string(),
                        span: token.span,
                    }
                }
                Some(_) => self.parse_named_type(&start)?,
                None => return Err(self.error_unexpected("type")),
            }
        };

        loop {
            if self.eat(&TokenKind::Question) {
                ty = TypeSyntax::Nullable {
                    inner: Box::new(ty),
                    span: self.span_from(&start),
                };
            } else if self.eat(&TokenKind::Star) {
                ty = TypeSyntax::Pointer {
                    inner: Box::new(ty),
                    span: self.span_from(&start),
                };
            } else if self.check(&TokenKind::LBracket)
                && matches!(self.peek_at(1).kind, TokenKind::RBracket | TokenKind::Comma)
            {
                self.advance();
                let mut rank = 1;
                while self.eat(&TokenKind::Comma) {
                    rank += 1;
                }
                self.expect(&TokenKind::RBracket, "`]`")?;
                ty = TypeSyntax::Array {
                    element: Box::new(ty),
                    rank,
                    span: self.span_from(&start),
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_named_type(&mut self, start: &Span) -> Result<TypeSyntax, Diagnostic> {
        let alias = if matches!(self.peek_at(1).kind, TokenKind::ColonColon) {
            let (alias, _) = self.expect_ident()?;
            self.advance();
            Some(alias)
        } else {
            None
        };

        let mut segments = Vec::new();
        loop {
            let (name, _) = self.expect_ident()?;
            let type_arguments = if self.check(&TokenKind::Lt) {
                self.parse_type_arguments()
            } else {
                Vec::new()
            };
            segments.push(NameSegment {
                name,
                type_arguments,
            });
            if self.check(&TokenKind::Dot) && matches!(self.peek_at(1).kind, TokenKind::Ident(_)) {
                self.advance();
                continue;
            }
            break;
        }

        Ok(TypeSyntax::Named {
            alias,
            segments,
            span: self.span_from(start),
        })
    }

    /// `<A, B<C>>`; rewinds and yields nothing if the brackets do not hold a
    /// type list
    fn parse_type_arguments(&mut self) -> Vec<TypeSyntax> {
        let save = self.pos;
        self.advance();

        let mut args = Vec::new();
        loop {
            match self.parse_type() {
                Ok(ty) => args.push(ty),
                Err(_) => break,
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        if !args.is_empty() && self.eat(&TokenKind::Gt) {
            return args;
        }
        self.pos = save;
        Vec::new()
    }

    fn parse_tuple_type(&mut self, start: &Span) -> Result<TypeSyntax, Diagnostic> {
        self.advance();
        let mut elements = Vec::new();
        loop {
            let ty = self.parse_type()?;
            let name = match self.peek().kind.ident() {
                Some(name) => {
                    let name = name.to_string();
                    self.advance();
                    Some(name)
                }
                None => None,
            };
            elements.push(TupleElement { ty, name });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "`)`")?;
        Ok(TypeSyntax::Tuple {
            elements,
            span: self.span_from(start),
        })
    }

    // Skipping

    /// Skip a member we do not model: up to and including its `;`, or
    /// through its body block (plus a trailing `= initializer;`)
    fn skip_member(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => {
                    self.skip_balanced();
                    if !self.check(&TokenKind::Eq) {
                        return;
                    }
                }
                TokenKind::LParen | TokenKind::LBracket => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_to_semicolon(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip from an opening `(`, `[` or `{` through its matching closer
    fn skip_balanced(&mut self) {
        let open = self.current_span();
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::Eof => {
                    self.errors.push(
                        Diagnostic::error(syntax::MISSING_DELIMITER)
                            .message("Unclosed delimiter")
                            .span(open)
                            .build(),
                    );
                    return;
                }
                _ => {}
            }
        }
    }

    /// Report an unrecognized token at declaration level and step over it
    fn skip_error_token(&mut self) -> bool {
        if !matches!(self.peek().kind, TokenKind::Error(_)) {
            return false;
        }
        let diag = self.error_unexpected("declaration");
        self.errors.push(diag);
        self.advance();
        true
    }

    fn recover(&mut self, before: usize) {
        if self.pos == before {
            self.advance();
        }
        self.skip_member();
    }

    // Helper methods

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn is_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn current_span(&self) -> Span {
        self.peek().span.clone()
    }

    fn span_from(&self, start: &Span) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(prev) if prev.span.end >= start.start => start.merge(&prev.span),
            _ => start.clone(),
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn check_ident(&self, text: &str) -> bool {
        self.peek().kind.is_ident(text)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, text: &str) -> bool {
        if self.check_ident(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, Diagnostic> {
        let matches = match kind {
            TokenKind::Ident(text) => self.check_ident(text),
            _ => self.check(kind),
        };
        if matches {
            Ok(self.advance())
        } else {
            Err(self.error_unexpected(what))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), Diagnostic> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            let token = self.advance();
            Ok((name, token.span))
        } else {
            Err(self.error_unexpected("identifier"))
        }
    }

    fn expect_closing_brace(&mut self, open: &Span) -> Result<(), Diagnostic> {
        if self.eat(&TokenKind::RBrace) {
            return Ok(());
        }
        Err(Diagnostic::error(syntax::MISSING_DELIMITER)
            .message("Expected `}` to close this declaration")
            .span(open.clone())
            .build())
    }

    fn error_unexpected(&self, expected: &str) -> Diagnostic {
        let token = self.peek();
        let (code, found) = match &token.kind {
            TokenKind::Eof => (syntax::UNEXPECTED_EOF, "end of file".to_string()),
            TokenKind::UnterminatedString => (
                syntax::UNTERMINATED_LITERAL,
                "unterminated string literal".to_string(),
            ),
            TokenKind::Error(text) => (syntax::UNEXPECTED_TOKEN, format!("character `{}`", text)),
            other => (syntax::UNEXPECTED_TOKEN, describe(other)),
        };
        Diagnostic::error(code)
            .message(format!("Expected {}, found {}", expected, found))
            .span(token.span.clone())
            .build()
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("`{}`", name),
        TokenKind::IntLit(v) => format!("integer `{}`", v),
        TokenKind::RealLit(v) => format!("number `{}`", v),
        TokenKind::StringLit(_) => "string literal".to_string(),
        TokenKind::CharLit(_) => "character literal".to_string(),
        other => format!("{:?}", other),
    }
}
