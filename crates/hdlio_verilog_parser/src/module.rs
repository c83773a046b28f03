//! Module headers, port lists and the opaque module body.
//!
//! A module's interface comes either from an ANSI header
//! (`module m (input wire [7:0] a, output b);`) or from a plain name list
//! plus direction declarations in the body (`module m (a, b); input a;`).
//! Parameters come from the `#( ... )` list, or from body `parameter`
//! declarations when there is none. Everything else in the body is
//! skipped.
//!
//! Each comma-separated declarator becomes one [`InterfaceItem`]. A
//! declarator without a type inherits the previous one's direction and
//! type, as in `input [3:0] a, b`.

use crate::parser::{Failure, PResult, SyntaxError, VerilogParser};
use crate::token::{Token, VerilogToken};
use hdlio_ast::{
    build_generics, build_ports, group_ports, DesignUnit, DesignUnitKind, Entity, GenericClass,
    GroupingEvent, InterfaceContext, InterfaceItem, SourceText,
};
use hdlio_common::Construct;
use hdlio_diagnostics::DiagnosticCode;
use hdlio_source::Location;
use std::collections::HashMap;

/// `[type words] [packed dims] name [unpacked dims] [= default]`
struct Declarator {
    name: SourceText,
    /// `None` when no type tokens precede the name.
    subtype: Option<String>,
    constraint: Option<String>,
    default: Option<String>,
    first: Token,
    /// Token index range `[start, end)` for grouping.
    start: usize,
    end: usize,
}

/// Direction and type shared by consecutive declarators.
#[derive(Clone)]
struct Shared {
    mode: Option<SourceText>,
    subtype: String,
    constraint: Option<String>,
    class: GenericClass,
}

enum PortHeader {
    Ansi(Vec<InterfaceItem>, Vec<GroupingEvent>),
    Names(Vec<SourceText>, Vec<GroupingEvent>),
}

#[derive(Default)]
struct ModuleBody {
    directions: HashMap<String, InterfaceItem>,
    parameters: Vec<InterfaceItem>,
}

impl<'src> VerilogParser<'src> {
    /// `module|macromodule [lifetime] NAME [#(...)] [(...)] ; ... endmodule [: NAME]`
    pub(crate) fn parse_module(&mut self) -> PResult<DesignUnit> {
        let kw = self.current_token();
        self.advance();
        if self.at(VerilogToken::Keyword) && matches!(self.current_text(), "automatic" | "static") {
            self.advance();
        }
        let name = self.expect_ident("module name")?;
        while self.at(VerilogToken::Keyword) && self.current_text() == "import" {
            self.skip_to_semicolon()?;
        }

        let generics = if self.at(VerilogToken::Hash) {
            let hash = self.current_token();
            self.require(Construct::ParameterPortList, hash);
            self.advance();
            Some(self.parse_parameter_port_list()?)
        } else {
            None
        };
        let header = if self.at(VerilogToken::LeftParen) {
            Some(self.parse_port_header()?)
        } else {
            None
        };
        self.expect(VerilogToken::Semicolon, "';' after module header")?;

        let names_only = matches!(header, Some(PortHeader::Names(..)));
        let body = self.scan_module_body(names_only, generics.is_none())?;
        let end = self.expect(VerilogToken::Endmodule, "'endmodule'")?;
        let mut last = end;
        if self.at(VerilogToken::Colon) {
            self.advance();
            let label = self.current_token();
            let text = self.expect_ident("module name after ':'")?;
            if text.text != name.text {
                self.warn(
                    DiagnosticCode::END_LABEL_MISMATCH,
                    format!("end label '{}' does not match '{}'", text.text, name.text),
                    label,
                );
            }
            last = label;
        }

        let items = generics.unwrap_or(body.parameters);
        let generics = build_generics(&items).map_err(|e| self.construction_error(e))?;
        let (port_items, events) = match header {
            None => (Vec::new(), Vec::new()),
            Some(PortHeader::Ansi(items, events)) => (items, events),
            Some(PortHeader::Names(names, events)) => {
                (self.resolve_port_names(names, body.directions)?, events)
            }
        };
        let ports = build_ports(&port_items, InterfaceContext::EntityPorts)
            .map_err(|e| self.construction_error(e))?;
        let groups = group_ports(ports.len(), events)?;
        let entity = Entity::new(name.text.clone(), generics, ports, groups)?;

        Ok(DesignUnit {
            name: name.text,
            source_path: self.path().to_path_buf(),
            span: kw.span.merge(last.span),
            location: kw.location,
            kind: DesignUnitKind::Module(entity),
        })
    }

    /// `( [parameter|localparam] [type] decl {, decl} )` after the `#`.
    fn parse_parameter_port_list(&mut self) -> PResult<Vec<InterfaceItem>> {
        self.expect(VerilogToken::LeftParen, "'(' after '#'")?;
        let mut items = Vec::new();
        let mut shared: Option<Shared> = None;
        let mut local = false;
        while !self.at(VerilogToken::RightParen) {
            if self.eat(VerilogToken::Parameter) {
                local = false;
                shared = None;
            } else if self.eat(VerilogToken::Localparam) {
                local = true;
                shared = None;
            }
            let class = if self.eat(VerilogToken::Type) {
                GenericClass::Type
            } else {
                shared.as_ref().map_or(GenericClass::Constant, |s| s.class)
            };
            let decl = self.parse_declarator()?;
            let next = self.inherit(&decl, None, class, shared.as_ref());
            if !local {
                items.push(generic_item(&decl, &next));
            }
            shared = Some(next);
            if !self.eat(VerilogToken::Comma) {
                break;
            }
        }
        self.expect(VerilogToken::RightParen, "',' or ')' in parameter list")?;
        Ok(items)
    }

    /// Chooses between an ANSI declaration list and a plain name list.
    fn parse_port_header(&mut self) -> PResult<PortHeader> {
        let open = self.pos;
        self.expect(VerilogToken::LeftParen, "'('")?;
        let first = self.current_token();
        let ansi = first.kind.is_direction()
            || first.kind == VerilogToken::Keyword
            || (first.kind.is_identifier()
                && matches!(
                    self.peek_kind(1),
                    VerilogToken::Identifier | VerilogToken::EscapedIdentifier | VerilogToken::Dot
                ));
        if ansi {
            self.require(Construct::AnsiPortList, first);
        }

        let mut declarators = Vec::new();
        let mut items = Vec::new();
        let mut shared: Option<Shared> = None;
        while !self.at(VerilogToken::RightParen) {
            let mode = if ansi && self.current().is_direction() {
                let token = self.current_token();
                self.advance();
                Some(direction_text(self.source_text(token)))
            } else {
                None
            };
            let decl = self.parse_declarator()?;
            if ansi {
                // the first port defaults to inout
                let mode = match (mode, &shared) {
                    (None, None) => Some(SourceText::new("inout", decl.name.span, decl.name.location)),
                    (mode, _) => mode,
                };
                let next = self.inherit(&decl, mode, GenericClass::Constant, shared.as_ref());
                items.push(port_item(&decl, &next));
                shared = Some(next);
            } else if decl.subtype.is_some() || decl.default.is_some() {
                return Err(self.error_at(decl.first, "expected a port name"));
            }
            declarators.push(decl);
            if !self.eat(VerilogToken::Comma) {
                break;
            }
        }
        let close = self.pos;
        self.expect(VerilogToken::RightParen, "',' or ')' in port list")?;

        let events = self.grouping_events(open + 1, close, &declarators);
        if ansi {
            Ok(PortHeader::Ansi(items, events))
        } else {
            let names = declarators.into_iter().map(|d| d.name).collect();
            Ok(PortHeader::Names(names, events))
        }
    }

    /// Reads one declarator, stopping before the `,`, `)` or `;` that ends
    /// it.
    fn parse_declarator(&mut self) -> PResult<Declarator> {
        let start = self.pos;
        let first = self.current_token();
        let mut tokens: Vec<Token> = Vec::new();
        let mut depth = 0usize;
        loop {
            self.check_lexical()?;
            let kind = self.current();
            match kind {
                VerilogToken::Eof => return Err(self.expected("')'")),
                VerilogToken::LeftParen | VerilogToken::LeftBracket | VerilogToken::LeftBrace => {
                    depth += 1
                }
                VerilogToken::RightParen | VerilogToken::RightBracket | VerilogToken::RightBrace
                    if depth > 0 =>
                {
                    depth -= 1
                }
                VerilogToken::Comma | VerilogToken::RightParen | VerilogToken::Semicolon
                | VerilogToken::Equals
                    if depth == 0 =>
                {
                    break
                }
                k if depth == 0 && k.is_direction() && !tokens.is_empty() => {
                    return Err(self.expected("',' or ')'"));
                }
                _ => {}
            }
            tokens.push(self.current_token());
            self.advance();
        }

        // the name is the last identifier outside trailing `[...]` groups
        let mut idx = tokens.len();
        let mut brackets = 0usize;
        while idx > 0 {
            let kind = tokens[idx - 1].kind;
            match kind {
                VerilogToken::RightBracket => brackets += 1,
                VerilogToken::LeftBracket => brackets = brackets.saturating_sub(1),
                _ if brackets == 0 => break,
                _ => {}
            }
            idx -= 1;
        }
        let Some(name_idx) = idx.checked_sub(1).filter(|&i| tokens[i].kind.is_identifier()) else {
            let at = tokens.last().copied().unwrap_or_else(|| self.current_token());
            return Err(self.error_at(at, format!("expected a name, found '{}'", self.text(at))));
        };
        let name = self.source_text(tokens[name_idx]);

        let type_tokens = &tokens[..name_idx];
        let dims = type_tokens
            .iter()
            .position(|t| t.kind == VerilogToken::LeftBracket)
            .unwrap_or(type_tokens.len());
        let subtype = (dims > 0).then(|| self.text_between(type_tokens[0], type_tokens[dims - 1]));
        let constraint = (dims < type_tokens.len())
            .then(|| self.text_between(type_tokens[dims], type_tokens[type_tokens.len() - 1]));
        let subtype = match (subtype, &constraint) {
            (None, Some(_)) => Some(String::new()),
            (s, _) => s,
        };

        let default = if self.eat(VerilogToken::Equals) {
            let value_start = self.current_token();
            let mut value_end = None;
            let mut depth = 0usize;
            loop {
                self.check_lexical()?;
                match self.current() {
                    VerilogToken::Eof => return Err(self.expected("')'")),
                    VerilogToken::LeftParen | VerilogToken::LeftBracket | VerilogToken::LeftBrace => {
                        depth += 1
                    }
                    VerilogToken::RightParen | VerilogToken::RightBracket | VerilogToken::RightBrace
                        if depth > 0 =>
                    {
                        depth -= 1
                    }
                    VerilogToken::Comma | VerilogToken::RightParen | VerilogToken::Semicolon
                        if depth == 0 =>
                    {
                        break
                    }
                    _ => {}
                }
                value_end = Some(self.current_token());
                self.advance();
            }
            match value_end {
                Some(last) => Some(self.text_between(value_start, last)),
                None => return Err(self.expected("default value")),
            }
        } else {
            None
        };

        let end = self.prev_index().map_or(start, |i| i + 1);
        Ok(Declarator {
            name,
            subtype,
            constraint,
            default,
            first,
            start,
            end,
        })
    }

    /// Direction and type for `decl`. Without an explicit direction it
    /// inherits the previous declarator's, and its type too when it has
    /// none of its own.
    fn inherit(
        &self,
        decl: &Declarator,
        mode: Option<SourceText>,
        class: GenericClass,
        previous: Option<&Shared>,
    ) -> Shared {
        match (mode, previous) {
            (None, Some(prev)) => {
                let mode = prev
                    .mode
                    .as_ref()
                    .map(|m| SourceText::new(m.text.clone(), decl.name.span, decl.name.location));
                match &decl.subtype {
                    None => Shared {
                        mode,
                        subtype: prev.subtype.clone(),
                        constraint: prev.constraint.clone(),
                        class,
                    },
                    Some(subtype) => Shared {
                        mode,
                        subtype: subtype.clone(),
                        constraint: decl.constraint.clone(),
                        class,
                    },
                }
            }
            (mode, _) => Shared {
                mode,
                subtype: decl.subtype.clone().unwrap_or_default(),
                constraint: decl.constraint.clone(),
                class,
            },
        }
    }

    /// Replays the trivia of `[from, to)` outside every declarator.
    fn grouping_events(&self, from: usize, to: usize, decls: &[Declarator]) -> Vec<GroupingEvent> {
        let mut events = Vec::new();
        let mut pending = decls.iter().peekable();
        let mut idx = from;
        while idx < to {
            if let Some(decl) = pending.peek() {
                if idx >= decl.start {
                    events.push(GroupingEvent::Ports(1));
                    idx = decl.end.max(idx + 1);
                    pending.next();
                    continue;
                }
            }
            let token = self.token_at(idx);
            match token.kind {
                VerilogToken::Comment => {
                    events.push(GroupingEvent::Comment(self.text(token).to_string()))
                }
                VerilogToken::TrailingComment => {
                    events.push(GroupingEvent::TrailingComment(self.text(token).to_string()))
                }
                VerilogToken::BlankLine => events.push(GroupingEvent::BlankLine),
                _ => {}
            }
            idx += 1;
        }
        events
    }

    /// Skips the module items up to `endmodule`, collecting body direction
    /// declarations and parameters when asked to.
    fn scan_module_body(&mut self, directions: bool, parameters: bool) -> PResult<ModuleBody> {
        let mut body = ModuleBody::default();
        loop {
            self.check_lexical()?;
            let kind = self.current();
            let item_start = matches!(
                self.prev_kind(),
                Some(VerilogToken::Semicolon | VerilogToken::Endfunction | VerilogToken::Endtask)
            );
            match kind {
                VerilogToken::Eof => return Err(self.expected("'endmodule'")),
                VerilogToken::Endmodule => return Ok(body),
                VerilogToken::Function
                | VerilogToken::Task
                | VerilogToken::Module
                | VerilogToken::Macromodule
                | VerilogToken::Class => self.skip_block(kind)?,
                k if k.is_direction() && item_start && directions => {
                    let token = self.current_token();
                    self.advance();
                    let mode = direction_text(self.source_text(token));
                    for item in self.parse_body_declaration(Some(mode), GenericClass::Constant)? {
                        let key = item.names.first().map(|n| n.text.clone()).unwrap_or_default();
                        body.directions.insert(key, item);
                    }
                }
                VerilogToken::Parameter if item_start && parameters => {
                    self.advance();
                    let class = if self.eat(VerilogToken::Type) {
                        GenericClass::Type
                    } else {
                        GenericClass::Constant
                    };
                    let items = self.parse_body_declaration(None, class)?;
                    body.parameters.extend(items);
                }
                _ => self.advance(),
            }
        }
    }

    /// `decl {, decl} ;` after a direction or `parameter` keyword.
    fn parse_body_declaration(
        &mut self,
        mode: Option<SourceText>,
        class: GenericClass,
    ) -> PResult<Vec<InterfaceItem>> {
        let is_port = mode.is_some();
        let mut mode = mode;
        let mut items = Vec::new();
        let mut shared: Option<Shared> = None;
        loop {
            let decl = self.parse_declarator()?;
            let next = self.inherit(&decl, mode.take(), class, shared.as_ref());
            items.push(if is_port {
                port_item(&decl, &next)
            } else {
                generic_item(&decl, &next)
            });
            shared = Some(next);
            if !self.eat(VerilogToken::Comma) {
                break;
            }
        }
        self.expect(VerilogToken::Semicolon, "';'")?;
        Ok(items)
    }

    /// Orders body direction declarations by the header name list.
    fn resolve_port_names(
        &self,
        names: Vec<SourceText>,
        mut declared: HashMap<String, InterfaceItem>,
    ) -> PResult<Vec<InterfaceItem>> {
        let mut items = Vec::with_capacity(names.len());
        for name in names {
            let Some(mut item) = declared.remove(&name.text) else {
                return Err(Failure::Syntax(SyntaxError {
                    code: DiagnosticCode::SYNTAX,
                    message: format!("port '{}' has no direction declaration", name.text),
                    span: name.span,
                    location: name.location,
                }));
            };
            item.names = vec![name];
            items.push(item);
        }
        if let Some((extra, item)) = declared.into_iter().min_by_key(|(_, item)| item.span.start) {
            return Err(Failure::Syntax(SyntaxError {
                code: DiagnosticCode::SYNTAX,
                message: format!("'{extra}' is declared as a port but not in the port list"),
                span: item.span,
                location: item.names.first().map_or(Location::START, |n| n.location),
            }));
        }
        Ok(items)
    }

    fn skip_to_semicolon(&mut self) -> PResult<()> {
        while !self.at(VerilogToken::Semicolon) {
            if self.at(VerilogToken::Eof) {
                return Err(self.expected("';'"));
            }
            self.advance();
        }
        self.advance();
        Ok(())
    }
}

/// Maps `input`/`output`/`inout` to the direction words the builder knows.
fn direction_text(keyword: SourceText) -> SourceText {
    let word = match keyword.text.as_str() {
        "input" => "in",
        "output" => "out",
        other => other,
    };
    SourceText::new(word, keyword.span, keyword.location)
}

fn port_item(decl: &Declarator, shared: &Shared) -> InterfaceItem {
    InterfaceItem {
        names: vec![decl.name.clone()],
        mode: shared.mode.clone(),
        class: GenericClass::Constant,
        subtype: shared.subtype.clone(),
        constraint: shared.constraint.clone(),
        default: decl.default.clone(),
        span: decl.first.span.merge(decl.name.span),
    }
}

/// Verilog parameter types keep their packed range in the type text.
fn generic_item(decl: &Declarator, shared: &Shared) -> InterfaceItem {
    let subtype = match &shared.constraint {
        Some(range) => format!("{} {range}", shared.subtype).trim().to_string(),
        None => shared.subtype.clone(),
    };
    InterfaceItem {
        names: vec![decl.name.clone()],
        mode: None,
        class: shared.class,
        subtype,
        constraint: None,
        default: decl.default.clone(),
        span: decl.first.span.merge(decl.name.span),
    }
}
