//! Terminal writer abstraction: batches primitive draw operations so one
//! render pass queues every write and flushes once. spec.md §6 "Terminal"
//! names three color pairs (header, selected-row, error); `Command::Style`
//! carries the same three plus a fourth (cursor-column) the highlight
//! policy in `highlight.rs` already distinguishes.
//!
//! Builds a list of draw commands, then flushes them through `queue!` in
//! one pass rather than issuing a syscall per cell.

use crate::highlight::Highlight;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    Color,
};
use std::io::Write;

#[derive(Debug)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    ClearAll,
    Print(String),
    Style(Highlight),
    StyleError,
    ResetStyle,
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }

    pub fn print(&mut self, s: impl Into<String>) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn style(&mut self, highlight: Highlight) {
        self.cmds.push(Command::Style(highlight));
    }

    /// Queue the error color pair (spec.md §6 color pair 3) for the text
    /// printed until the next `reset_style`.
    pub fn style_error_text(&mut self) {
        self.cmds.push(Command::StyleError);
    }

    pub fn reset_style(&mut self) {
        self.cmds.push(Command::ResetStyle);
    }

    pub fn flush(self, out: &mut impl Write) -> Result<()> {
        for cmd in self.cmds {
            match cmd {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Style(highlight) => apply_style(out, highlight)?,
                Command::StyleError => style_error(out)?,
                Command::ResetStyle => queue!(out, ResetColor, SetAttribute(Attribute::Reset))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// The three named color pairs from spec.md §6 (header, selected-row,
/// error) plus the cursor-column accent `highlight.rs` needs for its
/// fourth, compositional rule.
fn apply_style(out: &mut impl Write, highlight: Highlight) -> Result<()> {
    match highlight {
        Highlight::Header | Highlight::CursorHeaderColumn => {
            queue!(out, SetAttribute(Attribute::Reverse), SetAttribute(Attribute::Bold))?;
        }
        Highlight::SelectedRow => {
            queue!(out, SetBackgroundColor(Color::DarkBlue), SetForegroundColor(Color::White))?;
        }
        Highlight::CursorColumn => {
            queue!(out, SetAttribute(Attribute::Underline))?;
        }
    }
    Ok(())
}

/// The error color pair (spec.md §6 color pair 3), applied directly rather
/// than through a `Highlight` variant since errors aren't part of the
/// per-cell highlight composition in `highlight.rs`. Queued via
/// `Writer::style_error_text`/`Command::StyleError`.
fn style_error(out: &mut impl Write) -> Result<()> {
    queue!(out, SetForegroundColor(Color::Red), SetAttribute(Attribute::Bold))?;
    Ok(())
}
