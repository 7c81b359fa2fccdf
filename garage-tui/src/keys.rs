//! Keybinding definitions for the TUI.
//!
//! Only normal mode goes through [`map_key`]. While the filter input or an add
//! form has focus, printable keys are text and are routed by the page.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    ToggleRow,
    TogglePage,
    Sort,
    PrevColumn,
    NextColumn,
    ToggleColumn,
    Filter,
    NewItem,
    DeleteSelected,
    DeleteRow,
    ExportSelected,
    ExportAll,
    Document,
    Refresh,
    OpenHelp,
    Confirm,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::Filter),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('d') => Some(Action::DeleteSelected),
        KeyCode::Char('x') | KeyCode::Delete => Some(Action::DeleteRow),
        KeyCode::Char('e') => Some(Action::ExportSelected),
        KeyCode::Char('E') => Some(Action::ExportAll),
        KeyCode::Char('i') => Some(Action::Document),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('s') => Some(Action::Sort),
        KeyCode::Char('[') => Some(Action::PrevColumn),
        KeyCode::Char(']') => Some(Action::NextColumn),
        KeyCode::Char('v') => Some(Action::ToggleColumn),
        KeyCode::Char(' ') => Some(Action::ToggleRow),
        KeyCode::Char('a') => Some(Action::TogglePage),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char(c @ '1'..='8') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Help text listing the normal-mode bindings.
pub const HELP: &str = "\
Tab/1-8 switch view · j/k move · h/l page
space toggle row · a toggle page · s sort focused column · [ ] focus column
v hide/show column · / filter · n add · d delete selected · x delete row
e export selected · E export all · i document · r refresh · q quit";
