//! Opaque scanning of declarative parts and statement bodies.
//!
//! Bodies are not parsed into statements. The scanner only tracks which
//! compound constructs are open so it can find the `end` that closes the
//! design unit, and records the names declared at the top level of a
//! declarative part. Component declarations are the exception: they are
//! parsed in full because they carry an interface.

use crate::parser::{PResult, VhdlParser};
use crate::token::VhdlToken;
use hdlio_ast::{DeclKind, DeclaredItem, Entity, InterfaceContext, SourceText};
use hdlio_common::Construct;

/// A compound construct that needs a matching `end`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Frame {
    Process,
    If,
    Case,
    Loop,
    Record,
    Block,
    Component,
    Generate,
    Units,
    Protected,
    Subprogram,
    For,
    View,
    Package,
}

impl Frame {
    fn closed_by(self, kw: VhdlToken) -> bool {
        matches!(
            (self, kw),
            (Frame::Process, VhdlToken::Process)
                | (Frame::If, VhdlToken::If)
                | (Frame::Case, VhdlToken::Case)
                | (Frame::Loop, VhdlToken::Loop)
                | (Frame::Record, VhdlToken::Record)
                | (Frame::Block, VhdlToken::Block)
                | (Frame::Component, VhdlToken::Component)
                | (Frame::Generate, VhdlToken::Generate)
                | (Frame::Units, VhdlToken::Units)
                | (Frame::Protected, VhdlToken::Protected)
                | (Frame::Subprogram, VhdlToken::Function | VhdlToken::Procedure)
                | (Frame::For, VhdlToken::For)
                | (Frame::View, VhdlToken::View)
                | (Frame::Package, VhdlToken::Package)
        )
    }

    /// Frames that may be closed by a bare `end [label] ;`.
    fn allows_bare_end(self) -> bool {
        matches!(self, Frame::Subprogram | Frame::Package)
    }

    fn keyword(self) -> &'static str {
        match self {
            Frame::Process => "process",
            Frame::If => "if",
            Frame::Case => "case",
            Frame::Loop => "loop",
            Frame::Record => "record",
            Frame::Block => "block",
            Frame::Component => "component",
            Frame::Generate => "generate",
            Frame::Units => "units",
            Frame::Protected => "protected",
            Frame::Subprogram => "function",
            Frame::For => "for",
            Frame::View => "view",
            Frame::Package => "package",
        }
    }
}

fn is_closer(kind: VhdlToken) -> bool {
    matches!(
        kind,
        VhdlToken::Process
            | VhdlToken::If
            | VhdlToken::Case
            | VhdlToken::Loop
            | VhdlToken::Record
            | VhdlToken::Block
            | VhdlToken::Component
            | VhdlToken::Generate
            | VhdlToken::Units
            | VhdlToken::Protected
            | VhdlToken::Function
            | VhdlToken::Procedure
            | VhdlToken::For
            | VhdlToken::View
            | VhdlToken::Package
    )
}

/// What kind of unit body is being scanned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum BodyMode {
    /// Entity declarative part and statements; nothing is recorded.
    Entity,
    /// Architecture: items are recorded up to the top-level `begin`.
    Architecture,
    /// Package or package body: every top-level item is recorded.
    Package,
    /// Configuration: `for` opens a block configuration.
    Configuration,
}

/// Outcome of one scanner step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Step {
    Continue,
    /// At an `end` with no construct open; not consumed.
    UnitEnd,
}

/// Open constructs, innermost last.
#[derive(Debug)]
pub(crate) struct Nesting {
    frames: Vec<Frame>,
    configuration: bool,
}

impl Nesting {
    pub(crate) fn new(mode: BodyMode) -> Self {
        Self {
            frames: Vec::new(),
            configuration: mode == BodyMode::Configuration,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn top(&self) -> Option<Frame> {
        self.frames.last().copied()
    }
}

impl<'src> VhdlParser<'src> {
    /// Scans a unit body up to (not including) the `end` that closes the
    /// unit, returning the recorded top-level declarations.
    pub(crate) fn scan_body(&mut self, mode: BodyMode) -> PResult<Vec<DeclaredItem>> {
        let mut nesting = Nesting::new(mode);
        let mut items = Vec::new();
        let mut declaring = matches!(mode, BodyMode::Architecture | BodyMode::Package);
        loop {
            if nesting.is_empty() && declaring {
                if mode == BodyMode::Architecture && self.at(VhdlToken::Begin) {
                    declaring = false;
                    self.advance();
                    continue;
                }
                if self.at_declaration_start() {
                    if self.at(VhdlToken::Component) {
                        items.push(self.parse_component_declaration()?);
                        continue;
                    }
                    self.record_declaration(&mut items)?;
                }
            }
            if self.step(&mut nesting)? == Step::UnitEnd {
                return Ok(items);
            }
        }
    }

    fn at_declaration_start(&self) -> bool {
        matches!(
            self.prev_kind(),
            Some(VhdlToken::Semicolon | VhdlToken::Is | VhdlToken::Shared)
        )
    }

    /// Records the names introduced by the declaration at the cursor.
    ///
    /// Object declarations consume their identifier list; every other kind
    /// is only peeked at so the nesting logic still sees its keywords.
    fn record_declaration(&mut self, items: &mut Vec<DeclaredItem>) -> PResult<()> {
        let kind = match self.current() {
            VhdlToken::Constant => DeclKind::Constant,
            VhdlToken::Signal => DeclKind::Signal,
            VhdlToken::Variable => DeclKind::Variable,
            VhdlToken::File => DeclKind::File,
            VhdlToken::Type => DeclKind::Type,
            VhdlToken::Subtype => DeclKind::Subtype,
            VhdlToken::Alias => DeclKind::Alias,
            VhdlToken::Attribute => {
                // declarations only, not `attribute a of x : class is ...`
                if self.peek_kind(2) == VhdlToken::Colon {
                    self.record_peeked(items, DeclKind::Attribute, 1);
                }
                return Ok(());
            }
            VhdlToken::Function => {
                self.record_peeked(items, DeclKind::Function, 1);
                return Ok(());
            }
            VhdlToken::Procedure => {
                self.record_peeked(items, DeclKind::Procedure, 1);
                return Ok(());
            }
            VhdlToken::Pure | VhdlToken::Impure => {
                let kind = match self.peek_kind(1) {
                    VhdlToken::Procedure => DeclKind::Procedure,
                    _ => DeclKind::Function,
                };
                self.record_peeked(items, kind, 2);
                return Ok(());
            }
            VhdlToken::Package => {
                if self.peek_kind(2) == VhdlToken::Is && self.peek_kind(3) == VhdlToken::New {
                    self.record_peeked(items, DeclKind::PackageInstance, 1);
                }
                return Ok(());
            }
            _ => return Ok(()),
        };

        let keyword = self.current_text();
        self.advance();
        let object = matches!(
            kind,
            DeclKind::Constant | DeclKind::Signal | DeclKind::Variable | DeclKind::File
        );
        let first = self.declared_name(&format!("name after '{keyword}'"))?;
        items.push(declared(kind, first));
        while object && self.eat(VhdlToken::Comma) {
            let name = self.declared_name("name after ','")?;
            items.push(declared(kind, name));
        }
        Ok(())
    }

    /// Records the name `n` significant tokens ahead without consuming.
    fn record_peeked(&self, items: &mut Vec<DeclaredItem>, kind: DeclKind, n: usize) {
        let token = self.token_at(self.peek_index(n));
        if token.kind.is_identifier() || token.kind == VhdlToken::StringLiteral {
            items.push(declared(kind, self.source_text(token)));
        }
    }

    fn declared_name(&mut self, what: &str) -> PResult<SourceText> {
        match self.current() {
            VhdlToken::CharLiteral | VhdlToken::StringLiteral => {
                let token = self.current_token();
                self.advance();
                Ok(self.source_text(token))
            }
            _ => self.expect_ident(what),
        }
    }

    /// `component C [is] [generic (...);] [port (...);] end component [C];`
    fn parse_component_declaration(&mut self) -> PResult<DeclaredItem> {
        self.expect(VhdlToken::Component, "'component'")?;
        let name = self.expect_ident("component name")?;
        self.eat(VhdlToken::Is);
        let generics = if self.at(VhdlToken::Generic) {
            self.parse_generic_clause(InterfaceContext::ComponentGenerics)?
        } else {
            Vec::new()
        };
        let (ports, groups) = if self.at(VhdlToken::Port) {
            self.parse_port_clause(InterfaceContext::ComponentPorts)?
        } else {
            (Vec::new(), Vec::new())
        };
        self.expect(VhdlToken::End, "'end component'")?;
        self.expect(VhdlToken::Component, "'component' after 'end'")?;
        self.check_end_label(&name)?;
        self.expect(VhdlToken::Semicolon, "';'")?;

        let entity = Entity::new(name.text.clone(), generics, ports, groups)?;
        Ok(DeclaredItem {
            kind: DeclKind::Component,
            name: name.text,
            component: Some(entity),
            span: name.span,
        })
    }

    /// Consumes at least one token, tracking open constructs.
    ///
    /// An `entity`, `architecture` or `configuration` keyword that starts a
    /// statement cannot appear inside a body, so it means the enclosing
    /// unit lacks its `end`.
    pub(crate) fn step(&mut self, nesting: &mut Nesting) -> PResult<Step> {
        self.check_lexical()?;
        let kind = self.current();
        if self.at_foreign_unit() {
            return Err(match nesting.top() {
                Some(frame) => self.expected(&format!("'end {}'", frame.keyword())),
                None => self.error_here(format!("missing 'end' for '{}'", self.context)),
            });
        }
        match kind {
            VhdlToken::Eof => {
                let what = nesting
                    .top()
                    .map_or("'end'".to_string(), |f| format!("'end {}'", f.keyword()));
                return Err(self.expected(&what));
            }
            VhdlToken::End => return self.step_end(nesting),
            VhdlToken::Process | VhdlToken::Loop | VhdlToken::Record | VhdlToken::Units => {
                nesting.frames.push(match kind {
                    VhdlToken::Process => Frame::Process,
                    VhdlToken::Loop => Frame::Loop,
                    VhdlToken::Record => Frame::Record,
                    _ => Frame::Units,
                });
            }
            VhdlToken::Block => nesting.frames.push(Frame::Block),
            VhdlToken::Protected => {
                self.open_protected(nesting);
                return Ok(Step::Continue);
            }
            VhdlToken::Is if self.protected_word_ahead() => {
                self.advance();
                self.open_protected(nesting);
                return Ok(Step::Continue);
            }
            VhdlToken::If => {
                return Ok(self.open_by_lookahead(nesting, VhdlToken::Then, Frame::If));
            }
            VhdlToken::Case => {
                return Ok(self.open_by_lookahead(nesting, VhdlToken::Is, Frame::Case));
            }
            VhdlToken::For if nesting.configuration => nesting.frames.push(Frame::For),
            VhdlToken::For => {
                // for-generate opens a frame here; a for-loop opens one at
                // `loop`; a configuration specification opens nothing
                if let Some(idx) = self.find_ahead(&[VhdlToken::Generate, VhdlToken::Loop]) {
                    if self.token_at(idx).kind == VhdlToken::Generate {
                        nesting.frames.push(Frame::Generate);
                        self.advance_to(idx);
                    }
                }
            }
            VhdlToken::Elsif | VhdlToken::Else if nesting.top() == Some(Frame::Generate) => {
                // alternative of an if-generate: skip its `generate`
                if let Some(idx) = self.find_ahead(&[VhdlToken::Generate, VhdlToken::Then]) {
                    if self.token_at(idx).kind == VhdlToken::Generate {
                        self.advance_to(idx);
                    }
                }
            }
            VhdlToken::Generate => nesting.frames.push(Frame::Generate),
            VhdlToken::Component => {
                if self.prev_kind() != Some(VhdlToken::Colon) {
                    nesting.frames.push(Frame::Component);
                }
            }
            VhdlToken::Function | VhdlToken::Procedure => {
                let entity_class = matches!(
                    self.prev_kind(),
                    Some(VhdlToken::Colon | VhdlToken::Comma)
                );
                if !entity_class && self.opens_subprogram_body() {
                    nesting.frames.push(Frame::Subprogram);
                }
            }
            VhdlToken::View => {
                if self.peek_kind(1).is_identifier() && self.peek_kind(2) == VhdlToken::Of {
                    nesting.frames.push(Frame::View);
                }
            }
            VhdlToken::Package => {
                let opens = self.peek_kind(1) == VhdlToken::Body
                    || (self.peek_kind(2) == VhdlToken::Is && self.peek_kind(3) != VhdlToken::New);
                if opens {
                    nesting.frames.push(Frame::Package);
                }
            }
            _ => {}
        }
        self.advance();
        Ok(Step::Continue)
    }

    fn step_end(&mut self, nesting: &mut Nesting) -> PResult<Step> {
        let Some(top) = nesting.top() else {
            return Ok(Step::UnitEnd);
        };
        let next = self.peek_kind(1);
        if top == Frame::Protected && self.word_ahead(1, "protected") {
            nesting.frames.pop();
            self.advance();
            self.advance();
            self.eat(VhdlToken::Body);
        } else if is_closer(next) {
            if top.closed_by(next) {
                nesting.frames.pop();
                self.advance();
                self.advance();
                if matches!(next, VhdlToken::Protected | VhdlToken::Package) {
                    self.eat(VhdlToken::Body);
                }
            } else if next == VhdlToken::For {
                // `end for` of a configuration specification
                self.advance();
                self.advance();
            } else {
                self.advance();
                return Err(self.error_here(format!(
                    "expected 'end {}', found 'end {}'",
                    top.keyword(),
                    self.current_text().to_ascii_lowercase()
                )));
            }
        } else if top.allows_bare_end() {
            nesting.frames.pop();
            self.advance();
        } else if top == Frame::Generate {
            // `end [label];` closing a generate alternative body
            self.advance();
        } else {
            return Err(self.expected(&format!("'end {}'", top.keyword())));
        }
        Ok(Step::Continue)
    }

    /// `protected [body]` at the cursor, reserved or not.
    fn open_protected(&mut self, nesting: &mut Nesting) {
        self.require(Construct::ProtectedType, self.current_token());
        nesting.frames.push(Frame::Protected);
        self.advance();
        self.eat(VhdlToken::Body);
    }

    /// `is protected` where the revision does not reserve `protected`. An
    /// object named `protected` is followed by `;` instead.
    fn protected_word_ahead(&self) -> bool {
        self.word_ahead(1, "protected") && self.peek_kind(2) != VhdlToken::Semicolon
    }

    /// The identifier `n` significant tokens ahead spells `word`.
    fn word_ahead(&self, n: usize, word: &str) -> bool {
        let token = self.token_at(self.peek_index(n));
        token.kind == VhdlToken::Identifier && self.text(token).eq_ignore_ascii_case(word)
    }

    /// A library-unit keyword, other than `package`, at the start of a
    /// statement.
    fn at_foreign_unit(&self) -> bool {
        matches!(
            self.current(),
            VhdlToken::Entity | VhdlToken::Architecture | VhdlToken::Configuration
        ) && matches!(
            self.prev_kind(),
            None | Some(VhdlToken::Semicolon | VhdlToken::Begin)
        )
    }

    /// Opens `frame` if `then_kw` comes first, or a generate frame if
    /// `generate` does, skipping to that `generate`.
    fn open_by_lookahead(
        &mut self,
        nesting: &mut Nesting,
        then_kw: VhdlToken,
        frame: Frame,
    ) -> Step {
        match self.find_ahead(&[then_kw, VhdlToken::Generate]) {
            Some(idx) if self.token_at(idx).kind == VhdlToken::Generate => {
                nesting.frames.push(Frame::Generate);
                self.advance_to(idx);
            }
            Some(_) => nesting.frames.push(frame),
            None => {}
        }
        self.advance();
        Step::Continue
    }

    /// Index of the first of `kinds` ahead of the cursor at parenthesis
    /// depth zero, stopping at `;` or end of file.
    fn find_ahead(&self, kinds: &[VhdlToken]) -> Option<usize> {
        let mut depth = 0usize;
        let mut n = 1;
        loop {
            let idx = self.peek_index(n);
            let kind = self.token_at(idx).kind;
            match kind {
                VhdlToken::Eof | VhdlToken::Semicolon if depth == 0 => return None,
                VhdlToken::Eof => return None,
                VhdlToken::LeftParen => depth += 1,
                VhdlToken::RightParen => depth = depth.saturating_sub(1),
                k if depth == 0 && kinds.contains(&k) => return Some(idx),
                _ => {}
            }
            n += 1;
        }
    }

    /// A subprogram keyword starts a body if `is` follows the signature
    /// and the declaration is not an instantiation (`is new`).
    fn opens_subprogram_body(&self) -> bool {
        match self.find_ahead(&[VhdlToken::Is]) {
            Some(idx) => self.kind_after(idx) != VhdlToken::New,
            None => false,
        }
    }
}

fn declared(kind: DeclKind, name: SourceText) -> DeclaredItem {
    DeclaredItem {
        kind,
        name: name.text,
        component: None,
        span: name.span,
    }
}
