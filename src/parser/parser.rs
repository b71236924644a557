//! Recursive descent parser emitting definition records through a [`Builder`].
//!
//! Tokens are pulled from the lexer on demand into a small lookahead buffer.
//! The parser never looks past a `{` that opens a method body, initializer or
//! nested expression block: those are handed to [`Lexer::capture_block`] and
//! reported verbatim.

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::trace;

use super::builder::Builder;
use super::defs::{
    AnnotationDef, AnnotationValueDef, BoundKind, ClassDef, ClassKind, ExportsDef, FieldDef,
    ImportDef, InitializerDef, MethodDef, ModuleDef, OpensDef, PackageDef, ProvidesDef,
    RequiresDef, TypeArgDef, TypeDef, TypeVariableDef, UsesDef, WildcardTypeDef,
};
use super::error::{ParseError, ParseResult};
use super::javadoc::parse_javadoc;
use super::lexer::{Lexer, LexicalToken, Token};
use super::span::Span;

/// Modifier keywords and annotations preceding a declaration
#[derive(Debug, Default)]
struct Modifiers {
    names: Vec<String>,
    annotations: Vec<AnnotationDef>,
}

impl Modifiers {
    fn is_empty(&self) -> bool {
        self.names.is_empty() && self.annotations.is_empty()
    }
}

/// Parser for one compilation unit
pub struct Parser<'a, 'b> {
    lexer: Lexer<'a>,
    builder: &'b mut dyn Builder,
    lookahead: VecDeque<LexicalToken>,
}

impl<'a, 'b> Parser<'a, 'b> {
    pub fn new(lexer: Lexer<'a>, builder: &'b mut dyn Builder) -> Self {
        Self {
            lexer,
            builder,
            lookahead: VecDeque::new(),
        }
    }

    /// Lex and parse `source`, reporting to `builder`
    pub fn parse_source(source: &str, builder: &mut dyn Builder) -> ParseResult<()> {
        Parser::new(Lexer::new(source), builder).parse()
    }

    /// Parse the whole compilation unit
    pub fn parse(mut self) -> ParseResult<()> {
        let mut modifiers = self.parse_modifiers()?;
        if self.check(Token::Package)? {
            self.emit_annotations(&modifiers.annotations);
            self.parse_package_decl()?;
            modifiers = Modifiers::default();
        }

        if modifiers.is_empty() {
            loop {
                if self.check(Token::Import)? {
                    self.parse_import_decl()?;
                } else if !self.match_token(Token::Semicolon)? {
                    break;
                }
            }
            modifiers = self.parse_modifiers()?;
        }

        if modifiers.names.is_empty() && self.is_module_start()? {
            self.emit_annotations(&modifiers.annotations);
            self.parse_module_decl()?;
            if !self.check(Token::Eof)? {
                return Err(self.unexpected("end of input after module declaration"));
            }
            return Ok(());
        }

        loop {
            if modifiers.is_empty() {
                if self.check(Token::Eof)? {
                    break;
                }
                if self.match_token(Token::Semicolon)? {
                    modifiers = self.parse_modifiers()?;
                    continue;
                }
            }
            self.parse_type_decl(modifiers)?;
            modifiers = self.parse_modifiers()?;
        }
        Ok(())
    }

    // Token helpers

    fn fill(&mut self, n: usize) -> ParseResult<()> {
        while self.lookahead.len() <= n {
            let token = self.lexer.next_token()?;
            if token.is(Token::JavaDoc) {
                let doc = parse_javadoc(&token.text, token.location().line);
                self.builder.add_javadoc(doc.comment);
                for tag in doc.tags {
                    self.builder.add_javadoc_tag(tag);
                }
                continue;
            }
            self.lookahead.push_back(token);
        }
        Ok(())
    }

    fn peek(&mut self) -> ParseResult<&LexicalToken> {
        self.fill(0)?;
        Ok(&self.lookahead[0])
    }

    fn peek_kind(&mut self, n: usize) -> ParseResult<Token> {
        self.fill(n)?;
        Ok(self.lookahead[n].token)
    }

    fn check(&mut self, token_type: Token) -> ParseResult<bool> {
        Ok(self.peek_kind(0)? == token_type)
    }

    /// Check for a contextual keyword, which lexes as an identifier
    fn check_word(&mut self, n: usize, word: &str) -> ParseResult<bool> {
        self.fill(n)?;
        let token = &self.lookahead[n];
        Ok(token.is(Token::Identifier) && token.text == word)
    }

    fn advance(&mut self) -> ParseResult<LexicalToken> {
        self.fill(0)?;
        match self.lookahead.pop_front() {
            Some(token) => Ok(token),
            None => Err(self.unexpected("token")),
        }
    }

    fn match_token(&mut self, token_type: Token) -> ParseResult<bool> {
        if self.check(token_type)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume(&mut self, token_type: Token, expected: &str) -> ParseResult<LexicalToken> {
        if self.check(token_type)? {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn consume_word(&mut self, word: &str) -> ParseResult<LexicalToken> {
        if self.check_word(0, word)? {
            self.advance()
        } else {
            Err(self.unexpected(&format!("'{}'", word)))
        }
    }

    fn unexpected(&mut self, expected: &str) -> ParseError {
        if let Err(err) = self.fill(0) {
            return err;
        }
        let token = &self.lookahead[0];
        if token.is(Token::Eof) {
            ParseError::unexpected_end_of_input(expected, token.location())
        } else {
            ParseError::unexpected_token(expected, &format!("'{}'", token.text), token.location())
        }
    }

    fn current_line(&mut self) -> ParseResult<usize> {
        Ok(self.peek()?.location().line)
    }

    fn parse_identifier(&mut self) -> ParseResult<String> {
        Ok(self.consume(Token::Identifier, "identifier")?.text)
    }

    fn parse_qualified_name(&mut self) -> ParseResult<String> {
        let mut name = self.parse_identifier()?;
        while self.check(Token::Dot)? && self.peek_kind(1)? == Token::Identifier {
            self.advance()?;
            name.push('.');
            name.push_str(&self.parse_identifier()?);
        }
        Ok(name)
    }

    /// Consume `{` and return the verbatim block content up to the matching `}`
    fn consume_block(&mut self) -> ParseResult<String> {
        let open = self.consume(Token::LBrace, "'{'")?;
        if !self.lookahead.is_empty() {
            return Err(ParseError::invalid_syntax(
                "block opened after lookahead was buffered",
                open.location(),
            ));
        }
        Ok(self.lexer.capture_block()?.text)
    }

    fn emit_annotations(&mut self, annotations: &[AnnotationDef]) {
        for annotation in annotations {
            self.builder.add_annotation(annotation.clone());
        }
    }

    // Compilation unit

    fn parse_package_decl(&mut self) -> ParseResult<()> {
        let line = self.consume(Token::Package, "'package'")?.location().line;
        let name = self.parse_qualified_name()?;
        self.consume(Token::Semicolon, "';' after package name")?;
        self.builder.add_package(PackageDef { name, line });
        Ok(())
    }

    fn parse_import_decl(&mut self) -> ParseResult<()> {
        let line = self.consume(Token::Import, "'import'")?.location().line;
        let is_static = self.match_token(Token::Static)?;
        let name = self.parse_qualified_name()?;
        let mut is_wildcard = false;
        if self.match_token(Token::Dot)? {
            self.consume(Token::Star, "'*' after '.' in import")?;
            is_wildcard = true;
        }
        self.consume(Token::Semicolon, "';' after import")?;
        self.builder.add_import(ImportDef {
            name,
            is_static,
            is_wildcard,
            line,
        });
        Ok(())
    }

    fn parse_modifiers(&mut self) -> ParseResult<Modifiers> {
        let mut modifiers = Modifiers::default();
        loop {
            let kind = self.peek_kind(0)?;
            if kind == Token::At {
                if self.peek_kind(1)? == Token::Interface {
                    break;
                }
                let annotation = self.parse_annotation()?;
                modifiers.annotations.push(annotation);
            } else if kind.is_modifier() || kind == Token::Default {
                modifiers.names.push(self.advance()?.text);
            } else if self.check_word(0, "sealed")? && self.is_declaration_keyword(1)? {
                modifiers.names.push(self.advance()?.text);
            } else if self.check_word(0, "non")?
                && self.peek_kind(1)? == Token::Minus
                && self.check_word(2, "sealed")?
            {
                self.advance()?;
                self.advance()?;
                self.advance()?;
                modifiers.names.push("non-sealed".to_string());
            } else {
                break;
            }
        }
        Ok(modifiers)
    }

    fn is_declaration_keyword(&mut self, n: usize) -> ParseResult<bool> {
        let kind = self.peek_kind(n)?;
        Ok(kind.is_modifier() || matches!(kind, Token::Class | Token::Interface | Token::At))
    }

    fn is_module_start(&mut self) -> ParseResult<bool> {
        if self.check_word(0, "module")? {
            return Ok(self.peek_kind(1)? == Token::Identifier);
        }
        Ok(self.check_word(0, "open")? && self.check_word(1, "module")?)
    }

    // Annotations

    fn parse_annotation(&mut self) -> ParseResult<AnnotationDef> {
        let line = self.consume(Token::At, "'@'")?.location().line;
        let name = self.parse_qualified_name()?;
        let mut values = IndexMap::new();
        if self.match_token(Token::LParen)? {
            if !self.check(Token::RParen)? {
                if self.check(Token::Identifier)? && self.peek_kind(1)? == Token::Assign {
                    loop {
                        let key = self.parse_identifier()?;
                        self.consume(Token::Assign, "'='")?;
                        let value = self.parse_annotation_value()?;
                        values.insert(key, value);
                        if !self.match_token(Token::Comma)? {
                            break;
                        }
                    }
                } else {
                    let value = self.parse_annotation_value()?;
                    values.insert("value".to_string(), value);
                }
            }
            self.consume(Token::RParen, "')' after annotation values")?;
        }
        Ok(AnnotationDef {
            type_def: TypeDef::new(name),
            values,
            line,
        })
    }

    fn parse_annotation_value(&mut self) -> ParseResult<AnnotationValueDef> {
        if self.check(Token::At)? {
            return Ok(AnnotationValueDef::Annotation(Box::new(self.parse_annotation()?)));
        }
        if self.match_token(Token::LBrace)? {
            let mut elements = Vec::new();
            while !self.check(Token::RBrace)? {
                elements.push(self.parse_annotation_value()?);
                if !self.match_token(Token::Comma)? {
                    break;
                }
            }
            self.consume(Token::RBrace, "'}' closing annotation array")?;
            return Ok(AnnotationValueDef::Array(elements));
        }
        if let Some(type_def) = self.parse_class_literal()? {
            return Ok(AnnotationValueDef::Type(type_def));
        }
        if self.peek_kind(0)?.is_literal() && self.is_value_end(1)? {
            return Ok(AnnotationValueDef::Constant(self.advance()?.text));
        }
        let text = self.capture_expression(&[Token::Comma])?;
        Ok(AnnotationValueDef::Expression(text))
    }

    fn is_value_end(&mut self, n: usize) -> ParseResult<bool> {
        Ok(matches!(
            self.peek_kind(n)?,
            Token::Comma | Token::RParen | Token::RBrace
        ))
    }

    /// `a.b.C[].class` ending an annotation value
    fn parse_class_literal(&mut self) -> ParseResult<Option<TypeDef>> {
        let first = self.peek_kind(0)?;
        if first != Token::Identifier && !first.is_primitive_type() {
            return Ok(None);
        }
        let mut n = 1;
        loop {
            match (self.peek_kind(n)?, self.peek_kind(n + 1)?) {
                (Token::Dot, Token::Identifier) if first == Token::Identifier => n += 2,
                (Token::LBracket, Token::RBracket) => n += 2,
                _ => break,
            }
        }
        if self.peek_kind(n)? != Token::Dot
            || self.peek_kind(n + 1)? != Token::Class
            || !self.is_value_end(n + 2)?
        {
            return Ok(None);
        }
        let mut name = String::new();
        let mut dimensions = 0;
        for _ in 0..n {
            let token = self.advance()?;
            match token.token {
                Token::LBracket => dimensions += 1,
                Token::RBracket => {}
                _ => name.push_str(&token.text),
            }
        }
        self.advance()?;
        self.advance()?;
        Ok(Some(TypeDef::new(name).with_dimensions(dimensions)))
    }

    // Types

    fn skip_type_annotations(&mut self) -> ParseResult<()> {
        while self.check(Token::At)? && self.peek_kind(1)? != Token::Interface {
            self.parse_annotation()?;
        }
        Ok(())
    }

    fn parse_type(&mut self) -> ParseResult<TypeDef> {
        self.skip_type_annotations()?;
        let kind = self.peek_kind(0)?;
        let mut type_def = if kind.is_primitive_type() {
            TypeDef::new(self.advance()?.text)
        } else {
            let mut name = self.parse_identifier()?;
            let mut args = Vec::new();
            if self.check(Token::Lt)? {
                args = self.parse_type_arguments()?;
            }
            while self.check(Token::Dot)?
                && matches!(self.peek_kind(1)?, Token::Identifier | Token::At)
            {
                self.advance()?;
                self.skip_type_annotations()?;
                name.push('.');
                name.push_str(&self.parse_identifier()?);
                if self.check(Token::Lt)? {
                    args = self.parse_type_arguments()?;
                } else {
                    args.clear();
                }
            }
            TypeDef::new(name).with_args(args)
        };
        type_def.dimensions = self.parse_dimensions()?;
        Ok(type_def)
    }

    fn parse_dimensions(&mut self) -> ParseResult<usize> {
        let mut dimensions = 0;
        while self.check(Token::LBracket)? && self.peek_kind(1)? == Token::RBracket {
            self.advance()?;
            self.advance()?;
            dimensions += 1;
        }
        Ok(dimensions)
    }

    fn parse_type_arguments(&mut self) -> ParseResult<Vec<TypeArgDef>> {
        self.consume(Token::Lt, "'<'")?;
        let mut args = Vec::new();
        if self.match_token(Token::Gt)? {
            return Ok(args);
        }
        loop {
            self.skip_type_annotations()?;
            if self.match_token(Token::Question)? {
                let wildcard = if self.match_token(Token::Extends)? {
                    WildcardTypeDef::bounded(BoundKind::Extends, self.parse_type()?)
                } else if self.match_token(Token::Super)? {
                    WildcardTypeDef::bounded(BoundKind::Super, self.parse_type()?)
                } else {
                    WildcardTypeDef::unbounded()
                };
                args.push(TypeArgDef::Wildcard(wildcard));
            } else {
                args.push(TypeArgDef::Type(self.parse_type()?));
            }
            if !self.match_token(Token::Comma)? {
                break;
            }
        }
        self.consume(Token::Gt, "'>' closing type arguments")?;
        Ok(args)
    }

    fn parse_type_parameters(&mut self) -> ParseResult<Vec<TypeVariableDef>> {
        self.consume(Token::Lt, "'<'")?;
        let mut params = Vec::new();
        loop {
            self.skip_type_annotations()?;
            let mut param = TypeVariableDef::new(self.parse_identifier()?);
            if self.match_token(Token::Extends)? {
                param.bounds.push(self.parse_type()?);
                while self.match_token(Token::Amp)? {
                    param.bounds.push(self.parse_type()?);
                }
            }
            params.push(param);
            if !self.match_token(Token::Comma)? {
                break;
            }
        }
        self.consume(Token::Gt, "'>' closing type parameters")?;
        Ok(params)
    }

    fn parse_type_list(&mut self) -> ParseResult<Vec<TypeDef>> {
        let mut types = vec![self.parse_type()?];
        while self.match_token(Token::Comma)? {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    // Type declarations

    fn parse_type_decl(&mut self, modifiers: Modifiers) -> ParseResult<()> {
        let kind = match self.peek_kind(0)? {
            Token::Class => ClassKind::Class,
            Token::Interface => ClassKind::Interface,
            Token::Enum => ClassKind::Enum,
            Token::At if self.peek_kind(1)? == Token::Interface => {
                self.advance()?;
                ClassKind::Annotation
            }
            _ => return Err(self.unexpected("class, interface, enum or @interface")),
        };
        let line = self.advance()?.location().line;
        let name = self.parse_identifier()?;

        let mut def = ClassDef::new(name, kind, line);
        def.modifiers = modifiers.names;
        if self.check(Token::Lt)? {
            def.type_parameters = self.parse_type_parameters()?;
        }
        if self.match_token(Token::Extends)? {
            def.extends = if kind == ClassKind::Interface {
                self.parse_type_list()?
            } else {
                vec![self.parse_type()?]
            };
        }
        if self.match_token(Token::Implements)? {
            def.implements = self.parse_type_list()?;
        }
        if self.check_word(0, "permits")? {
            self.advance()?;
            self.parse_type_list()?;
        }

        trace!(name = %def.name, kind = def.kind.keyword(), line, "type declaration");
        let class_name = def.name.clone();
        self.emit_annotations(&modifiers.annotations);
        self.builder.begin_class(def);
        self.parse_class_body(kind, &class_name)?;
        self.builder.end_class();
        Ok(())
    }

    fn parse_class_body(&mut self, kind: ClassKind, class_name: &str) -> ParseResult<()> {
        self.consume(Token::LBrace, "'{' opening class body")?;
        if kind == ClassKind::Enum {
            self.parse_enum_constants(class_name)?;
        }
        loop {
            if self.match_token(Token::RBrace)? {
                return Ok(());
            }
            if self.match_token(Token::Semicolon)? {
                continue;
            }
            if self.check(Token::Eof)? {
                return Err(self.unexpected("'}' closing class body"));
            }
            self.parse_member()?;
        }
    }

    fn parse_enum_constants(&mut self, enum_name: &str) -> ParseResult<()> {
        loop {
            if self.match_token(Token::Semicolon)? || self.check(Token::RBrace)? {
                return Ok(());
            }
            let modifiers = self.parse_modifiers()?;
            let token = self.consume(Token::Identifier, "enum constant")?;
            let line = token.location().line;

            let mut args = Vec::new();
            if self.match_token(Token::LParen)? {
                while !self.check(Token::RParen)? {
                    args.push(self.capture_expression(&[Token::Comma])?);
                    if !self.match_token(Token::Comma)? {
                        break;
                    }
                }
                self.consume(Token::RParen, "')' after enum constant arguments")?;
            }

            let mut field = FieldDef::new(token.text.clone(), TypeDef::new(enum_name), line);
            field.enum_constant = true;
            field.args = args;
            self.emit_annotations(&modifiers.annotations);
            self.builder.begin_field(field);

            if self.check(Token::LBrace)? {
                let mut body = ClassDef::new(token.text, ClassKind::Class, line);
                body.extends = vec![TypeDef::new(enum_name)];
                body.enum_constant_body = true;
                let body_name = body.name.clone();
                self.builder.begin_class(body);
                self.parse_class_body(ClassKind::Class, &body_name)?;
                self.builder.end_class();
            }
            self.builder.end_field();

            if !self.match_token(Token::Comma)? {
                if self.match_token(Token::Semicolon)? || self.check(Token::RBrace)? {
                    return Ok(());
                }
                return Err(self.unexpected("',' or ';' after enum constant"));
            }
        }
    }

    fn parse_member(&mut self) -> ParseResult<()> {
        if self.check(Token::LBrace)? {
            return self.parse_initializer(false);
        }
        if self.check(Token::Static)? && self.peek_kind(1)? == Token::LBrace {
            self.advance()?;
            return self.parse_initializer(true);
        }

        let modifiers = self.parse_modifiers()?;
        match self.peek_kind(0)? {
            Token::Class | Token::Interface | Token::Enum => return self.parse_type_decl(modifiers),
            Token::At if self.peek_kind(1)? == Token::Interface => {
                return self.parse_type_decl(modifiers)
            }
            _ => {}
        }

        let line = self.current_line()?;
        let type_parameters = if self.check(Token::Lt)? {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        if self.check(Token::Identifier)? && self.peek_kind(1)? == Token::LParen {
            let name = self.parse_identifier()?;
            let mut def = MethodDef::new(name, line);
            def.constructor = true;
            def.modifiers = modifiers.names;
            def.type_parameters = type_parameters;
            self.emit_annotations(&modifiers.annotations);
            self.builder.begin_constructor();
            return self.parse_method_rest(def);
        }

        let type_def = self.parse_type()?;
        let name = self.parse_identifier()?;
        if self.check(Token::LParen)? {
            let mut def = MethodDef::new(name, line);
            def.return_type = Some(type_def);
            def.modifiers = modifiers.names;
            def.type_parameters = type_parameters;
            self.emit_annotations(&modifiers.annotations);
            self.builder.begin_method();
            return self.parse_method_rest(def);
        }

        if !type_parameters.is_empty() {
            return Err(self.unexpected("'(' after generic method name"));
        }
        self.parse_field_declarators(modifiers, type_def, name, line)
    }

    fn parse_initializer(&mut self, is_static: bool) -> ParseResult<()> {
        let line = self.current_line()?;
        let body = self.consume_block()?;
        self.builder.add_initializer(InitializerDef {
            is_static,
            body,
            line,
        });
        Ok(())
    }

    /// Parameters through body, after `begin_method`/`begin_constructor`
    fn parse_method_rest(&mut self, mut def: MethodDef) -> ParseResult<()> {
        self.consume(Token::LParen, "'('")?;
        self.parse_parameters()?;
        self.consume(Token::RParen, "')' after parameters")?;

        let legacy_dimensions = self.parse_dimensions()?;
        if legacy_dimensions > 0 {
            match def.return_type.as_mut() {
                Some(return_type) => return_type.dimensions += legacy_dimensions,
                None => {
                    return Err(ParseError::invalid_syntax(
                        "array dimensions after constructor parameters",
                        self.peek()?.location(),
                    ))
                }
            }
        }
        if self.match_token(Token::Throws)? {
            def.exceptions = self.parse_type_list()?;
        }
        if self.match_token(Token::Default)? {
            def.default_value = Some(self.capture_expression(&[Token::Semicolon])?);
        }
        if self.check(Token::LBrace)? {
            def.body = Some(self.consume_block()?);
        } else {
            self.consume(Token::Semicolon, "method body or ';'")?;
        }

        if def.constructor {
            self.builder.end_constructor(def);
        } else {
            self.builder.end_method(def);
        }
        Ok(())
    }

    fn parse_parameters(&mut self) -> ParseResult<()> {
        if self.check(Token::RParen)? {
            return Ok(());
        }
        loop {
            let modifiers = self.parse_modifiers()?;
            let line = self.current_line()?;
            let mut type_def = self.parse_type()?;
            self.skip_type_annotations()?;
            let varargs = self.match_token(Token::Ellipsis)?;

            // receiver parameter: `Foo this` or `Outer Outer.this`
            if self.match_token(Token::This)? {
                if !self.match_token(Token::Comma)? {
                    return Ok(());
                }
                continue;
            }
            if self.check(Token::Identifier)?
                && self.peek_kind(1)? == Token::Dot
                && self.peek_kind(2)? == Token::This
            {
                self.advance()?;
                self.advance()?;
                self.advance()?;
                if !self.match_token(Token::Comma)? {
                    return Ok(());
                }
                continue;
            }

            let name_token = self.consume(Token::Identifier, "parameter name")?;
            type_def.dimensions += self.parse_dimensions()?;
            let more = self.check(Token::Comma)?;
            if varargs && more {
                return Err(ParseError::invalid_syntax(
                    format!("varargs parameter '{}' must be the last parameter", name_token.text),
                    name_token.location(),
                ));
            }

            let mut param = FieldDef::new(name_token.text, type_def, line);
            param.modifiers = modifiers.names;
            param.varargs = varargs;
            self.emit_annotations(&modifiers.annotations);
            self.builder.add_parameter(param);

            if !self.match_token(Token::Comma)? {
                return Ok(());
            }
        }
    }

    /// `T a = 1, b[];`: one field per declarator, dimensions summed per name
    fn parse_field_declarators(
        &mut self,
        modifiers: Modifiers,
        base: TypeDef,
        first_name: String,
        line: usize,
    ) -> ParseResult<()> {
        let mut name = first_name;
        loop {
            let mut type_def = base.clone();
            type_def.dimensions += self.parse_dimensions()?;
            let initializer = if self.match_token(Token::Assign)? {
                Some(self.capture_expression(&[Token::Comma, Token::Semicolon])?)
            } else {
                None
            };

            let mut field = FieldDef::new(name, type_def, line);
            field.modifiers = modifiers.names.clone();
            field.initializer = initializer;
            self.emit_annotations(&modifiers.annotations);
            self.builder.begin_field(field);
            self.builder.end_field();

            if self.match_token(Token::Comma)? {
                name = self.parse_identifier()?;
                continue;
            }
            self.consume(Token::Semicolon, "';' after field declaration")?;
            return Ok(());
        }
    }

    // Expressions

    /// Capture verbatim source text of an expression.
    ///
    /// Stops before any of `terminators` at nesting depth zero, or before an
    /// unmatched closing bracket. Nested `{...}` blocks are captured whole.
    fn capture_expression(&mut self, terminators: &[Token]) -> ParseResult<String> {
        let first = self.peek()?.span.clone();
        let start = first.bytes.start;
        let mut end = start;
        let mut depth = 0usize;
        loop {
            let kind = self.peek_kind(0)?;
            match kind {
                Token::Eof => return Err(self.unexpected("end of expression")),
                _ if depth == 0 && terminators.contains(&kind) => break,
                Token::RParen | Token::RBracket | Token::RBrace if depth == 0 => break,
                Token::LParen | Token::LBracket => depth += 1,
                Token::RParen | Token::RBracket => depth -= 1,
                Token::LBrace => {
                    self.consume_block()?;
                    end = self.lexer.offset();
                    continue;
                }
                Token::Lt => {
                    if let Some(count) = self.type_arguments_ahead()? {
                        for _ in 0..count {
                            end = self.advance()?.span.bytes.end;
                        }
                        continue;
                    }
                }
                _ => {}
            }
            end = self.advance()?.span.bytes.end;
        }
        if end == start {
            return Err(self.unexpected("expression"));
        }
        Ok(Span::new(first.start, start..end)
            .source_text(self.lexer.source())
            .to_string())
    }

    /// Number of tokens forming a type argument list starting at the current `<`
    fn type_arguments_ahead(&mut self) -> ParseResult<Option<usize>> {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let kind = self.peek_kind(n)?;
            n += 1;
            match kind {
                Token::Lt => depth += 1,
                Token::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Some(n));
                    }
                }
                Token::Identifier
                | Token::Dot
                | Token::Comma
                | Token::Question
                | Token::Extends
                | Token::Super
                | Token::LBracket
                | Token::RBracket
                | Token::Amp
                | Token::At => {}
                other if other.is_primitive_type() => {}
                _ => return Ok(None),
            }
        }
    }

    // Modules

    fn parse_module_decl(&mut self) -> ParseResult<()> {
        let line = self.current_line()?;
        let open = self.check_word(0, "open")?;
        if open {
            self.advance()?;
        }
        self.consume_word("module")?;
        let name = self.parse_qualified_name()?;
        self.consume(Token::LBrace, "'{' opening module body")?;
        self.builder.set_module(ModuleDef { name, open, line });

        while !self.match_token(Token::RBrace)? {
            let token = self.consume(Token::Identifier, "module directive")?;
            let line = token.location().line;
            match token.text.as_str() {
                "requires" => {
                    let mut modifiers = Vec::new();
                    loop {
                        if self.check(Token::Static)? {
                            modifiers.push(self.advance()?.text);
                        } else if self.check_word(0, "transitive")?
                            && self.peek_kind(1)? != Token::Semicolon
                            && self.peek_kind(1)? != Token::Dot
                        {
                            modifiers.push(self.advance()?.text);
                        } else {
                            break;
                        }
                    }
                    let name = self.parse_qualified_name()?;
                    self.builder.add_requires(RequiresDef {
                        name,
                        modifiers,
                        line,
                    });
                }
                "exports" => {
                    let source = self.parse_qualified_name()?;
                    let targets = self.parse_module_targets()?;
                    self.builder.add_exports(ExportsDef {
                        source,
                        targets,
                        line,
                    });
                }
                "opens" => {
                    let source = self.parse_qualified_name()?;
                    let targets = self.parse_module_targets()?;
                    self.builder.add_opens(OpensDef {
                        source,
                        targets,
                        line,
                    });
                }
                "uses" => {
                    let service = self.parse_type()?;
                    self.builder.add_uses(UsesDef { service, line });
                }
                "provides" => {
                    let service = self.parse_type()?;
                    self.consume_word("with")?;
                    let implementations = self.parse_type_list()?;
                    self.builder.add_provides(ProvidesDef {
                        service,
                        implementations,
                        line,
                    });
                }
                other => {
                    return Err(ParseError::unexpected_token(
                        "module directive",
                        &format!("'{}'", other),
                        token.location(),
                    ))
                }
            }
            self.consume(Token::Semicolon, "';' after module directive")?;
        }
        Ok(())
    }

    fn parse_module_targets(&mut self) -> ParseResult<Vec<String>> {
        let mut targets = Vec::new();
        if self.check_word(0, "to")? {
            self.advance()?;
            targets.push(self.parse_qualified_name()?);
            while self.match_token(Token::Comma)? {
                targets.push(self.parse_qualified_name()?);
            }
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::builder::{BuilderEvent, EventRecorder};

    fn events(source: &str) -> Vec<BuilderEvent> {
        let mut recorder = EventRecorder::new();
        Parser::parse_source(source, &mut recorder).expect("Failed to parse");
        recorder.into_events()
    }

    #[test]
    fn test_field_initializer_keeps_generic_commas() {
        let events = events("class A { Map<K, V> m = new HashMap<K, V>(), n; }");
        let fields: Vec<&FieldDef> = events
            .iter()
            .filter_map(|e| match e {
                BuilderEvent::BeginField(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].initializer.as_deref(), Some("new HashMap<K, V>()"));
        assert_eq!(fields[1].name, "n");
        assert_eq!(fields[1].initializer, None);
    }

    #[test]
    fn test_comparison_is_not_type_arguments() {
        let events = events("class A { boolean b = x < y, c = true; }");
        let inits: Vec<Option<String>> = events
            .iter()
            .filter_map(|e| match e {
                BuilderEvent::BeginField(f) => Some(f.initializer.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(inits, vec![Some("x < y".to_string()), Some("true".to_string())]);
    }

    #[test]
    fn test_method_body_is_captured() {
        let events = events("class A { int f() { if (a) { return 1; } return \"}\".length(); } }");
        let body = events.iter().find_map(|e| match e {
            BuilderEvent::EndMethod(m) => m.body.clone(),
            _ => None,
        });
        assert_eq!(body.as_deref(), Some(" if (a) { return 1; } return \"}\".length(); "));
    }

    #[test]
    fn test_varargs_must_be_last() {
        let mut recorder = EventRecorder::new();
        let err = Parser::parse_source("class A { void f(int... a, int b) {} }", &mut recorder)
            .unwrap_err();
        assert!(err.message().contains("last parameter"));
    }
}
