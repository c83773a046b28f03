//! Comment- and blank-line-driven partitioning of a port list.
//!
//! The dialect parser replays the port clause as a sequence of
//! [`GroupingEvent`]s: comments and blank lines that sit between interface
//! items, and one `Ports(n)` per item (where `n` is the length of its
//! identifier list). The engine walks the events once:
//!
//! - a comment closes the current group if it already holds a port and
//!   becomes the pending label,
//! - a blank line not preceded by a comment since the last port closes the
//!   current group and drops any pending label,
//! - ports join the current group, which takes the pending label if it has
//!   no name yet.

use crate::entity::{check_partition, PortGroup};
use hdlio_common::{HdlResult, InternalError};

/// One signal from the port clause, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupingEvent {
    /// A comment alone on its line; the text is trimmed.
    Comment(String),
    /// A comment that follows code on the same line.
    ///
    /// Labels the current group only while that group has no ports (as in
    /// `port ( -- Clock signals`); otherwise it annotates a port and is
    /// ignored.
    TrailingComment(String),
    /// One or more fully blank lines.
    BlankLine,
    /// An interface item declaring this many ports.
    Ports(usize),
}

struct OpenGroup {
    name: Option<String>,
    start: usize,
    len: usize,
}

impl OpenGroup {
    fn at(start: usize) -> Self {
        Self {
            name: None,
            start,
            len: 0,
        }
    }
}

struct Grouper {
    groups: Vec<PortGroup>,
    current: OpenGroup,
    pending_label: Option<String>,
    comment_since_last_port: bool,
    next_index: usize,
}

impl Grouper {
    fn new() -> Self {
        Self {
            groups: Vec::new(),
            current: OpenGroup::at(0),
            pending_label: None,
            comment_since_last_port: false,
            next_index: 0,
        }
    }

    /// Closes the current group if it has members and opens a fresh one.
    fn close(&mut self) {
        if self.current.len == 0 {
            return;
        }
        let done = std::mem::replace(&mut self.current, OpenGroup::at(self.next_index));
        self.groups.push(PortGroup {
            name: done.name,
            start: done.start,
            len: done.len,
        });
    }

    fn comment(&mut self, text: String) {
        self.close();
        self.pending_label = Some(text);
        self.comment_since_last_port = true;
    }

    fn blank_line(&mut self) {
        if self.comment_since_last_port {
            return;
        }
        self.close();
        self.pending_label = None;
    }

    fn ports(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if self.current.name.is_none() {
            if let Some(label) = self.pending_label.take() {
                self.current.name = Some(label);
            }
        }
        self.current.len += count;
        self.next_index += count;
        self.comment_since_last_port = false;
    }

    fn apply(&mut self, event: GroupingEvent) {
        match event {
            GroupingEvent::Comment(text) => self.comment(text),
            GroupingEvent::TrailingComment(text) if self.current.len == 0 => self.comment(text),
            GroupingEvent::TrailingComment(_) => {}
            GroupingEvent::BlankLine => self.blank_line(),
            GroupingEvent::Ports(n) => self.ports(n),
        }
    }
}

/// Partitions `port_count` ports into groups using `events`.
///
/// Fails with an [`InternalError`] if the `Ports` events do not add up to
/// `port_count` or the result is not a partition; either means the caller
/// replayed the port clause incorrectly.
pub fn group_ports(
    port_count: usize,
    events: impl IntoIterator<Item = GroupingEvent>,
) -> HdlResult<Vec<PortGroup>> {
    let mut grouper = Grouper::new();
    for event in events {
        grouper.apply(event);
    }
    grouper.close();

    if grouper.next_index != port_count {
        return Err(InternalError::new(format!(
            "grouping saw {} ports but the clause declared {port_count}",
            grouper.next_index
        )));
    }
    check_partition(&grouper.groups, port_count)?;
    Ok(grouper.groups)
}
