use crate::todo::models::{Priority, PriorityFilter};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn handle_normal_mode_key(key_event: KeyEvent) -> NormalModeAction {
        match key_event.code {
            KeyCode::Char('q') => NormalModeAction::Quit,
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                NormalModeAction::Quit
            }
            KeyCode::Esc => NormalModeAction::ClearSelection,
            KeyCode::Up | KeyCode::Char('k') => NormalModeAction::MoveCursorUp,
            KeyCode::Down | KeyCode::Char('j') => NormalModeAction::MoveCursorDown,
            KeyCode::Tab | KeyCode::BackTab => NormalModeAction::SwitchFocus,
            KeyCode::Enter => NormalModeAction::ActivateList,
            KeyCode::Char('n') => NormalModeAction::StartNewList,
            KeyCode::Char('a') => NormalModeAction::StartNewItem,
            KeyCode::Char('p') => NormalModeAction::CyclePriority,
            KeyCode::Char('f') => NormalModeAction::CycleFilter,
            KeyCode::Char('0') => NormalModeAction::SetFilter(PriorityFilter::All),
            KeyCode::Char('1') => NormalModeAction::SetFilter(PriorityFilter::Only(Priority::Urgent)),
            KeyCode::Char('2') => NormalModeAction::SetFilter(PriorityFilter::Only(Priority::Medium)),
            KeyCode::Char('3') => NormalModeAction::SetFilter(PriorityFilter::Only(Priority::Low)),
            KeyCode::Char(' ') => NormalModeAction::ToggleItemSelection,
            KeyCode::Char('d') | KeyCode::Delete => NormalModeAction::DeleteItem,
            KeyCode::Char('c') => NormalModeAction::CompleteSelected,
            KeyCode::Char('C') => NormalModeAction::CompleteAll,
            KeyCode::Char('?') => NormalModeAction::ToggleHelpMode,
            _ => NormalModeAction::None,
        }
    }

    pub fn handle_help_mode_key(key_event: KeyEvent) -> HelpModeAction {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => {
                HelpModeAction::ExitHelpMode
            }
            _ => HelpModeAction::None,
        }
    }

    pub fn handle_input_mode_key(key_event: KeyEvent) -> InputModeAction {
        match key_event.code {
            KeyCode::Esc => InputModeAction::Cancel,
            KeyCode::Enter => InputModeAction::Submit,
            KeyCode::Tab => InputModeAction::CyclePriority,
            KeyCode::Backspace => InputModeAction::Backspace,
            KeyCode::Delete => InputModeAction::Delete,
            KeyCode::Left => InputModeAction::MoveCursorLeft,
            KeyCode::Right => InputModeAction::MoveCursorRight,
            KeyCode::Home => InputModeAction::MoveCursorHome,
            KeyCode::End => InputModeAction::MoveCursorEnd,
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                InputModeAction::Cancel
            }
            KeyCode::Char(c) => InputModeAction::InsertChar(c),
            _ => InputModeAction::None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NormalModeAction {
    None,
    Quit,
    ClearSelection,
    MoveCursorUp,
    MoveCursorDown,
    SwitchFocus,
    ActivateList,
    StartNewList,
    StartNewItem,
    CyclePriority,
    CycleFilter,
    SetFilter(PriorityFilter),
    ToggleItemSelection,
    DeleteItem,
    CompleteSelected,
    CompleteAll,
    ToggleHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum HelpModeAction {
    None,
    ExitHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum InputModeAction {
    None,
    Cancel,
    Submit,
    CyclePriority,
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    InsertChar(char),
}

pub trait KeyEventHandler {
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()>;
}
