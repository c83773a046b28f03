//! Library units: entity, architecture, package, package body and
//! configuration.

use crate::body::BodyMode;
use crate::parser::{PResult, VhdlParser};
use crate::token::{Token, VhdlToken};
use hdlio_ast::{
    Architecture, Configuration, DesignUnit, DesignUnitKind, Entity, InterfaceContext, Package,
    PackageBody, SourceText,
};
use hdlio_common::Construct;
use hdlio_diagnostics::DiagnosticCode;
use hdlio_source::Span;

impl<'src> VhdlParser<'src> {
    /// Parses the library unit starting at the cursor.
    pub(crate) fn parse_unit(&mut self) -> PResult<DesignUnit> {
        match self.current() {
            VhdlToken::Entity => self.parse_entity(),
            VhdlToken::Architecture => self.parse_architecture(),
            VhdlToken::Package if self.peek_kind(1) == VhdlToken::Body => {
                self.parse_package_body()
            }
            VhdlToken::Package => self.parse_package(),
            VhdlToken::Configuration => self.parse_configuration(),
            _ => Err(self.expected("design unit")),
        }
    }

    /// The name a unit at the cursor will have, for diagnostics raised
    /// before the name is parsed.
    pub(crate) fn peek_unit_name(&self) -> Option<String> {
        let n = if self.at(VhdlToken::Package) && self.peek_kind(1) == VhdlToken::Body {
            2
        } else {
            1
        };
        let token = self.token_at(self.peek_index(n));
        token
            .kind
            .is_identifier()
            .then(|| self.text(token).to_string())
    }

    /// `entity E is [generic (...);] [port (...);] {item} [begin {stmt}]
    /// end [entity] [E];`
    fn parse_entity(&mut self) -> PResult<DesignUnit> {
        let kw = self.expect(VhdlToken::Entity, "'entity'")?;
        let name = self.expect_ident("entity name")?;
        self.expect(VhdlToken::Is, "'is'")?;

        let generics = if self.at(VhdlToken::Generic) {
            self.parse_generic_clause(InterfaceContext::EntityGenerics)?
        } else {
            Vec::new()
        };
        let (ports, groups) = if self.at(VhdlToken::Port) {
            self.parse_port_clause(InterfaceContext::EntityPorts)?
        } else {
            (Vec::new(), Vec::new())
        };
        if !self.at(VhdlToken::End) {
            self.scan_body(BodyMode::Entity)?;
        }
        let end = self.parse_unit_end(&[VhdlToken::Entity], &name)?;

        let entity = Entity::new(name.text.clone(), generics, ports, groups)?;
        Ok(self.unit(kw, end, name, DesignUnitKind::Entity(entity)))
    }

    /// `architecture A of E is {item} begin {stmt} end [architecture] [A];`
    fn parse_architecture(&mut self) -> PResult<DesignUnit> {
        let kw = self.expect(VhdlToken::Architecture, "'architecture'")?;
        let name = self.expect_ident("architecture name")?;
        self.expect(VhdlToken::Of, "'of'")?;
        let entity_name = self.expect_ident("entity name")?;
        self.expect(VhdlToken::Is, "'is'")?;
        let declared_items = self.scan_body(BodyMode::Architecture)?;
        let end = self.parse_unit_end(&[VhdlToken::Architecture], &name)?;
        let arch = Architecture {
            entity_name: entity_name.text,
            declared_items,
        };
        Ok(self.unit(kw, end, name, DesignUnitKind::Architecture(arch)))
    }

    /// `package P is [generic (...); [generic map (...);]] {item}
    /// end [package] [P];` or `package P is new G [generic map (...)];`
    fn parse_package(&mut self) -> PResult<DesignUnit> {
        let kw = self.expect(VhdlToken::Package, "'package'")?;
        let name = self.expect_ident("package name")?;
        self.expect(VhdlToken::Is, "'is'")?;

        if self.at(VhdlToken::New) {
            self.skip_to_semicolon()?;
            let end = self.prev_span();
            let pkg = Package {
                generics: Vec::new(),
                declared_items: Vec::new(),
            };
            return Ok(self.unit_with_span(kw, end, name, DesignUnitKind::Package(pkg)));
        }

        let generics = if self.at(VhdlToken::Generic) {
            self.require(Construct::PackageGenerics, self.current_token());
            let generics = self.parse_generic_clause(InterfaceContext::EntityGenerics)?;
            if self.at(VhdlToken::Generic) {
                // generic map aspect
                self.skip_to_semicolon()?;
            }
            generics
        } else {
            Vec::new()
        };
        let declared_items = self.scan_body(BodyMode::Package)?;
        let end = self.parse_unit_end(&[VhdlToken::Package], &name)?;
        let pkg = Package {
            generics,
            declared_items,
        };
        Ok(self.unit(kw, end, name, DesignUnitKind::Package(pkg)))
    }

    /// `package body P is {item} end [package body] [P];`
    fn parse_package_body(&mut self) -> PResult<DesignUnit> {
        let kw = self.expect(VhdlToken::Package, "'package'")?;
        self.expect(VhdlToken::Body, "'body'")?;
        let name = self.expect_ident("package name")?;
        self.expect(VhdlToken::Is, "'is'")?;
        let declared_items = self.scan_body(BodyMode::Package)?;
        let end = self.parse_unit_end(&[VhdlToken::Package, VhdlToken::Body], &name)?;
        let body = PackageBody { declared_items };
        Ok(self.unit(kw, end, name, DesignUnitKind::PackageBody(body)))
    }

    /// `configuration C of E is {item} end [configuration] [C];`
    fn parse_configuration(&mut self) -> PResult<DesignUnit> {
        let kw = self.expect(VhdlToken::Configuration, "'configuration'")?;
        let name = self.expect_ident("configuration name")?;
        self.expect(VhdlToken::Of, "'of'")?;
        let entity_name = self.expect_ident("entity name")?;
        self.expect(VhdlToken::Is, "'is'")?;
        self.scan_body(BodyMode::Configuration)?;
        let end = self.parse_unit_end(&[VhdlToken::Configuration], &name)?;
        let config = Configuration {
            entity_name: entity_name.text,
        };
        Ok(self.unit(kw, end, name, DesignUnitKind::Configuration(config)))
    }

    /// `end [keywords] [label] ;`, returning the `;` token.
    fn parse_unit_end(&mut self, keywords: &[VhdlToken], name: &SourceText) -> PResult<Token> {
        self.expect(VhdlToken::End, "'end'")?;
        if let Some((&first, rest)) = keywords.split_first() {
            if self.eat(first) {
                for &kw in rest {
                    self.expect(kw, "keyword")?;
                }
            }
        }
        self.check_end_label(name)?;
        self.expect(VhdlToken::Semicolon, "';'")
    }

    /// Consumes an optional end label, warning if it names something else.
    pub(crate) fn check_end_label(&mut self, name: &SourceText) -> PResult<()> {
        if !self.current().is_identifier() {
            return Ok(());
        }
        let label = self.current_token();
        let text = self.text(label);
        let matches = if text.starts_with('\\') {
            text == name.text
        } else {
            text.eq_ignore_ascii_case(&name.text)
        };
        if !matches {
            self.warn(
                DiagnosticCode::END_LABEL_MISMATCH,
                format!("end label '{text}' does not match '{}'", name.text),
                label,
            );
        }
        self.advance();
        Ok(())
    }

    /// Consumes through the next `;` outside parentheses.
    pub(crate) fn skip_to_semicolon(&mut self) -> PResult<()> {
        let mut depth = 0usize;
        loop {
            self.check_lexical()?;
            match self.current() {
                VhdlToken::Eof => return Err(self.expected("';'")),
                VhdlToken::LeftParen => depth += 1,
                VhdlToken::RightParen => depth = depth.saturating_sub(1),
                VhdlToken::Semicolon if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn unit(&self, kw: Token, end: Token, name: SourceText, kind: DesignUnitKind) -> DesignUnit {
        self.unit_with_span(kw, end.span, name, kind)
    }

    fn unit_with_span(
        &self,
        kw: Token,
        end: Span,
        name: SourceText,
        kind: DesignUnitKind,
    ) -> DesignUnit {
        DesignUnit {
            name: name.text,
            source_path: self.path().to_path_buf(),
            span: kw.span.merge(end),
            location: kw.location,
            kind,
        }
    }
}
