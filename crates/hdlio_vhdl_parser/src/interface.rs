//! Generic and port clauses.
//!
//! Interface items are read into raw [`InterfaceItem`] records: names,
//! the word in mode position, and the subtype, constraint and default as
//! source text. The trivia between items is replayed as
//! [`GroupingEvent`]s so the port grouping engine sees the comment and
//! blank-line layout of the clause.

use crate::parser::{PResult, VhdlParser};
use crate::token::{Token, VhdlToken};
use hdlio_ast::{
    build_generics, build_ports, group_ports, Generic, GenericClass, GroupingEvent,
    InterfaceContext, InterfaceItem, Port, PortGroup, SourceText,
};
use hdlio_common::Construct;

/// The items of one parenthesized interface list plus its layout.
pub(crate) struct InterfaceList {
    pub items: Vec<InterfaceItem>,
    pub events: Vec<GroupingEvent>,
}

/// Token index range `[start, end)` of one item and its name count.
struct ItemRange {
    start: usize,
    end: usize,
    names: usize,
}

impl<'src> VhdlParser<'src> {
    /// `generic ( ... ) ;`
    pub(crate) fn parse_generic_clause(
        &mut self,
        context: InterfaceContext,
    ) -> PResult<Vec<Generic>> {
        self.expect(VhdlToken::Generic, "'generic'")?;
        let list = self.parse_interface_list(context)?;
        self.expect(VhdlToken::Semicolon, "';' after generic clause")?;
        build_generics(&list.items).map_err(|e| self.construction_error(e))
    }

    /// `port ( ... ) ;`, returning the ports and their groups.
    pub(crate) fn parse_port_clause(
        &mut self,
        context: InterfaceContext,
    ) -> PResult<(Vec<Port>, Vec<PortGroup>)> {
        self.expect(VhdlToken::Port, "'port'")?;
        let list = self.parse_interface_list(context)?;
        self.expect(VhdlToken::Semicolon, "';' after port clause")?;
        let ports = build_ports(&list.items, context).map_err(|e| self.construction_error(e))?;
        let groups = group_ports(ports.len(), list.events)?;
        Ok((ports, groups))
    }

    fn parse_interface_list(&mut self, context: InterfaceContext) -> PResult<InterfaceList> {
        let open = self.pos;
        self.expect(VhdlToken::LeftParen, "'('")?;
        let mut items = Vec::new();
        let mut ranges = Vec::new();
        loop {
            let start = self.pos;
            let item = self.parse_interface_item(context)?;
            let end = self.prev_index().map_or(start, |i| i + 1);
            ranges.push(ItemRange {
                start,
                end,
                names: item.names.len(),
            });
            items.push(item);

            if self.at(VhdlToken::Semicolon) {
                let semi = self.current_token();
                self.advance();
                if self.at(VhdlToken::RightParen) {
                    self.require(Construct::InterfaceTrailingSemicolon, semi);
                    break;
                }
            } else if self.at(VhdlToken::RightParen) {
                break;
            } else {
                return Err(self.expected("';' or ')' after interface declaration"));
            }
        }
        let close = self.pos;
        self.advance();

        let events = if context.is_port_list() {
            self.grouping_events(open + 1, close, &ranges)
        } else {
            Vec::new()
        };
        Ok(InterfaceList { items, events })
    }

    /// Replays the trivia of `[from, to)` that lies outside every item.
    fn grouping_events(&self, from: usize, to: usize, ranges: &[ItemRange]) -> Vec<GroupingEvent> {
        let mut events = Vec::new();
        let mut pending = ranges.iter().peekable();
        let mut idx = from;
        while idx < to {
            if let Some(range) = pending.peek() {
                if idx >= range.start {
                    events.push(GroupingEvent::Ports(range.names));
                    idx = range.end.max(idx + 1);
                    pending.next();
                    continue;
                }
            }
            let token = self.token_at(idx);
            match token.kind {
                VhdlToken::Comment => {
                    events.push(GroupingEvent::Comment(self.text(token).to_string()))
                }
                VhdlToken::TrailingComment => {
                    events.push(GroupingEvent::TrailingComment(self.text(token).to_string()))
                }
                VhdlToken::BlankLine => events.push(GroupingEvent::BlankLine),
                _ => {}
            }
            idx += 1;
        }
        events
    }

    fn parse_interface_item(&mut self, context: InterfaceContext) -> PResult<InterfaceItem> {
        self.check_lexical()?;
        let generics = !context.is_port_list();
        match self.current() {
            VhdlToken::Type if generics => self.parse_generic_type(),
            VhdlToken::Package if generics => self.parse_generic_package(),
            VhdlToken::Function | VhdlToken::Procedure | VhdlToken::Pure | VhdlToken::Impure
                if generics =>
            {
                self.parse_generic_subprogram()
            }
            _ => self.parse_object_item(context),
        }
    }

    /// `[class] names : [mode] subtype [constraint] [:= default]`
    fn parse_object_item(&mut self, context: InterfaceContext) -> PResult<InterfaceItem> {
        let first = self.current_token();
        if matches!(
            self.current(),
            VhdlToken::Constant | VhdlToken::Signal | VhdlToken::Variable | VhdlToken::File
        ) {
            self.advance();
        }

        let mut names = vec![self.expect_ident("interface name")?];
        while self.eat(VhdlToken::Comma) {
            names.push(self.expect_ident("interface name after ','")?);
        }
        if !self.at(VhdlToken::Colon) {
            let last = names.last().map_or("", |n| n.text.as_str());
            return Err(self.expected(&format!("':' after '{last}'")));
        }
        self.advance();

        let mode = self.parse_mode_word(context);

        let mark_start = self.current_token();
        self.parse_type_mark()?;
        let subtype = self.text_between(mark_start, self.token_at(self.pos_before()));

        let constraint = if self.at(VhdlToken::LeftParen) || self.at(VhdlToken::Range) {
            let start = self.current_token();
            if self.at(VhdlToken::Range) {
                self.scan_to_item_end(true)?;
            } else {
                while self.at(VhdlToken::LeftParen) {
                    self.skip_parenthesized()?;
                }
            }
            Some(self.text_between(start, self.token_at(self.pos_before())))
        } else {
            None
        };

        if self.at(VhdlToken::Keyword) && self.current_text().eq_ignore_ascii_case("bus") {
            self.advance();
        }

        let default = if self.eat(VhdlToken::ColonEquals) {
            if self.at_item_end() {
                return Err(self.expected("default expression after ':='"));
            }
            let start = self.current_token();
            self.scan_to_item_end(false)?;
            Some(self.text_between(start, self.token_at(self.pos_before())))
        } else {
            None
        };

        if !self.at_item_end() {
            return Err(self.expected("';' or ')' after interface declaration"));
        }

        Ok(InterfaceItem {
            names,
            mode,
            class: GenericClass::Constant,
            subtype,
            constraint,
            default,
            span: first.span.merge(self.prev_span()),
        })
    }

    /// Reads the word in mode position, if there is one.
    ///
    /// In port lists an identifier directly followed by another name is
    /// taken as a misspelled mode so the builder can report it.
    fn parse_mode_word(&mut self, context: InterfaceContext) -> Option<SourceText> {
        let token = self.current_token();
        let is_mode = token.kind.is_mode()
            || (context.is_port_list()
                && (token.kind == VhdlToken::View
                    || (token.kind.is_identifier() && self.peek_kind(1).is_identifier())));
        if is_mode {
            self.advance();
            Some(self.source_text(token))
        } else {
            None
        }
    }

    /// `name { . name }`
    fn parse_type_mark(&mut self) -> PResult<()> {
        self.expect_ident("subtype indication")?;
        while self.at(VhdlToken::Dot) {
            self.advance();
            self.expect_ident("name after '.'")?;
        }
        Ok(())
    }

    /// `type T [is private]`
    fn parse_generic_type(&mut self) -> PResult<InterfaceItem> {
        let kw = self.current_token();
        self.require(Construct::GenericTypes, kw);
        self.advance();
        let name = self.expect_ident("generic type name")?;
        if !self.at_item_end() {
            self.scan_to_item_end(false)?;
        }
        Ok(self.generic_item(name, GenericClass::Type, String::new(), None, kw))
    }

    /// `package P is new lib.pkg generic map ( ... )`
    fn parse_generic_package(&mut self) -> PResult<InterfaceItem> {
        let kw = self.current_token();
        self.require(Construct::GenericTypes, kw);
        self.advance();
        let name = self.expect_ident("generic package name")?;
        self.expect(VhdlToken::Is, "'is'")?;
        self.expect(VhdlToken::New, "'new'")?;
        let start = self.current_token();
        self.scan_to_item_end(false)?;
        let subtype = self.text_between(start, self.token_at(self.pos_before()));
        Ok(self.generic_item(name, GenericClass::Package, subtype, None, kw))
    }

    /// `[pure|impure] function F [params] return T [is <>|is name]`
    fn parse_generic_subprogram(&mut self) -> PResult<InterfaceItem> {
        let kw = self.current_token();
        self.require(Construct::GenericTypes, kw);
        if matches!(self.current(), VhdlToken::Pure | VhdlToken::Impure) {
            self.advance();
        }
        if !matches!(self.current(), VhdlToken::Function | VhdlToken::Procedure) {
            return Err(self.expected("'function' or 'procedure'"));
        }
        self.advance();
        let name = if self.at(VhdlToken::StringLiteral) {
            let token = self.current_token();
            self.advance();
            self.source_text(token)
        } else {
            self.expect_ident("subprogram name")?
        };

        let sig_start = self.current_token();
        let mut sig_end = None;
        let mut depth = 0usize;
        loop {
            self.check_lexical()?;
            match self.current() {
                VhdlToken::Eof => return Err(self.expected("')'")),
                VhdlToken::LeftParen => depth += 1,
                VhdlToken::RightParen if depth == 0 => break,
                VhdlToken::RightParen => depth -= 1,
                VhdlToken::Semicolon if depth == 0 => break,
                VhdlToken::Is if depth == 0 => break,
                _ => {}
            }
            sig_end = Some(self.pos);
            self.advance();
        }
        let subtype = sig_end
            .map(|end| self.text_between(sig_start, self.token_at(end)))
            .unwrap_or_default();
        let default = if self.eat(VhdlToken::Is) {
            let start = self.current_token();
            self.scan_to_item_end(false)?;
            Some(self.text_between(start, self.token_at(self.pos_before())))
        } else {
            None
        };
        Ok(self.generic_item(name, GenericClass::Subprogram, subtype, default, kw))
    }

    fn generic_item(
        &self,
        name: SourceText,
        class: GenericClass,
        subtype: String,
        default: Option<String>,
        first: Token,
    ) -> InterfaceItem {
        InterfaceItem {
            names: vec![name],
            mode: None,
            class,
            subtype,
            constraint: None,
            default,
            span: first.span.merge(self.prev_span()),
        }
    }

    /// At the `;` or `)` that ends an interface item.
    fn at_item_end(&self) -> bool {
        matches!(self.current(), VhdlToken::Semicolon | VhdlToken::RightParen)
    }

    /// Index of the last consumed token (or the current one at the start).
    fn pos_before(&self) -> usize {
        self.prev_index().unwrap_or(self.pos)
    }

    /// Consumes a balanced `( ... )` group.
    pub(crate) fn skip_parenthesized(&mut self) -> PResult<()> {
        self.expect(VhdlToken::LeftParen, "'('")?;
        let mut depth = 1usize;
        while depth > 0 {
            self.check_lexical()?;
            match self.current() {
                VhdlToken::Eof => return Err(self.expected("')'")),
                VhdlToken::LeftParen => depth += 1,
                VhdlToken::RightParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    /// Consumes tokens up to the `;` or `)` ending the item, optionally
    /// stopping early at a top-level `:=`.
    fn scan_to_item_end(&mut self, stop_at_assign: bool) -> PResult<()> {
        let mut depth = 0usize;
        loop {
            self.check_lexical()?;
            match self.current() {
                VhdlToken::Eof => return Err(self.expected("')'")),
                VhdlToken::LeftParen => depth += 1,
                VhdlToken::RightParen if depth == 0 => return Ok(()),
                VhdlToken::RightParen => depth -= 1,
                VhdlToken::Semicolon if depth == 0 => return Ok(()),
                VhdlToken::ColonEquals if depth == 0 && stop_at_assign => return Ok(()),
                _ => {}
            }
            self.advance();
        }
    }
}
