use crate::todo::models::{Counts, Item, ItemId, Priority, PriorityFilter};
use crate::todo::storage::Storage;
use crate::todo::store::ListStore;
use crate::todo::view;
use crate::tui::edit::InputLine;
use crate::tui::handlers::{
    HelpModeAction, InputModeAction, KeyEventHandler, KeyHandler, NormalModeAction,
};
use crate::tui::state::{Focus, InputMode};
use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use log::{debug, info};

/// Controller between key events, the list store and storage.
///
/// Every accepted mutation of the list collection is followed by an explicit
/// `persist()`; a failed write is returned to the event loop.
#[derive(Debug)]
pub struct App<S: Storage> {
    pub store: ListStore,
    storage: S,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub list_input: InputLine,
    pub item_input: InputLine,
    pub pending_priority: Priority,
    pub list_cursor: usize,
    pub item_cursor: usize,
    pub help_mode: bool,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(store: ListStore, storage: S, default_priority: Priority) -> Self {
        Self {
            store,
            storage,
            focus: Focus::default(),
            input_mode: InputMode::Normal,
            list_input: InputLine::new(),
            item_input: InputLine::new(),
            pending_priority: default_priority,
            list_cursor: 0,
            item_cursor: 0,
            help_mode: false,
            should_quit: false,
        }
    }

    pub fn load(storage: S, default_priority: Priority) -> Result<Self> {
        let lists = storage.load().context("Failed to load saved lists")?;
        Ok(Self::new(ListStore::new(lists), storage, default_priority))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<()> {
        self.storage
            .save(self.store.lists())
            .context("Failed to save lists")
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        match self.store.active_list() {
            Some(list) => view::filtered_items(list, self.store.filter()),
            None => Vec::new(),
        }
    }

    pub fn counts(&self) -> Counts {
        self.store.active_list().map(view::counts).unwrap_or_default()
    }

    pub fn current_item_id(&self) -> Option<ItemId> {
        self.visible_items().get(self.item_cursor).map(|item| item.id)
    }

    fn clamp_cursors(&mut self) {
        let lists = self.store.lists().len();
        self.list_cursor = self.list_cursor.min(lists.saturating_sub(1));
        let items = self.visible_items().len();
        self.item_cursor = self.item_cursor.min(items.saturating_sub(1));
    }

    fn handle_normal_mode_key(&mut self, key_event: KeyEvent) -> Result<()> {
        match KeyHandler::handle_normal_mode_key(key_event) {
            NormalModeAction::None => {}
            NormalModeAction::Quit => self.should_quit = true,
            NormalModeAction::ClearSelection => self.store.clear_selection(),
            NormalModeAction::MoveCursorUp => self.move_cursor_up(),
            NormalModeAction::MoveCursorDown => self.move_cursor_down(),
            NormalModeAction::SwitchFocus => self.focus = self.focus.toggle(),
            NormalModeAction::ActivateList => self.activate_list_under_cursor(),
            NormalModeAction::StartNewList => {
                self.list_input.clear();
                self.input_mode = InputMode::NewList;
            }
            NormalModeAction::StartNewItem => {
                if self.store.active_list().is_some() {
                    self.item_input.clear();
                    self.input_mode = InputMode::NewItem;
                }
            }
            NormalModeAction::CyclePriority => {
                self.pending_priority = self.pending_priority.next();
            }
            NormalModeAction::CycleFilter => self.set_filter(self.store.filter().next()),
            NormalModeAction::SetFilter(filter) => self.set_filter(filter),
            NormalModeAction::ToggleItemSelection => self.toggle_current_selection(),
            NormalModeAction::DeleteItem => self.delete_current_item()?,
            NormalModeAction::CompleteSelected => self.complete_selected()?,
            NormalModeAction::CompleteAll => self.complete_all()?,
            NormalModeAction::ToggleHelpMode => self.help_mode = true,
        }
        Ok(())
    }

    fn handle_help_mode_key(&mut self, key_event: KeyEvent) -> Result<()> {
        if KeyHandler::handle_help_mode_key(key_event) == HelpModeAction::ExitHelpMode {
            self.help_mode = false;
        }
        Ok(())
    }

    fn handle_input_mode_key(&mut self, key_event: KeyEvent) -> Result<()> {
        let action = KeyHandler::handle_input_mode_key(key_event);
        let line = match self.input_mode {
            InputMode::NewList => &mut self.list_input,
            _ => &mut self.item_input,
        };

        match action {
            InputModeAction::None => {}
            InputModeAction::Cancel => {
                line.clear();
                self.input_mode = InputMode::Normal;
            }
            InputModeAction::Submit => self.submit_input()?,
            InputModeAction::CyclePriority => {
                if self.input_mode == InputMode::NewItem {
                    self.pending_priority = self.pending_priority.next();
                }
            }
            InputModeAction::Backspace => line.backspace(),
            InputModeAction::Delete => line.delete(),
            InputModeAction::MoveCursorLeft => line.move_cursor_left(),
            InputModeAction::MoveCursorRight => line.move_cursor_right(),
            InputModeAction::MoveCursorHome => line.move_cursor_home(),
            InputModeAction::MoveCursorEnd => line.move_cursor_end(),
            InputModeAction::InsertChar(c) => line.insert_char(c),
        }
        Ok(())
    }

    fn submit_input(&mut self) -> Result<()> {
        match self.input_mode {
            InputMode::NewList => {
                if self.store.create_list(self.list_input.text()) {
                    self.list_input.clear();
                    self.input_mode = InputMode::Normal;
                    self.list_cursor = 0;
                    self.item_cursor = 0;
                    self.focus = Focus::Items;
                    self.persist()?;
                }
            }
            InputMode::NewItem => {
                // The form stays open for the next entry.
                if self.store.add_item(self.item_input.text(), self.pending_priority) {
                    self.item_input.clear();
                    self.item_cursor = 0;
                    self.persist()?;
                }
            }
            InputMode::Normal => {}
        }
        Ok(())
    }

    fn move_cursor_up(&mut self) {
        match self.focus {
            Focus::Lists => self.list_cursor = self.list_cursor.saturating_sub(1),
            Focus::Items => self.item_cursor = self.item_cursor.saturating_sub(1),
        }
    }

    fn move_cursor_down(&mut self) {
        match self.focus {
            Focus::Lists => self.list_cursor += 1,
            Focus::Items => self.item_cursor += 1,
        }
        self.clamp_cursors();
    }

    fn activate_list_under_cursor(&mut self) {
        if self.focus != Focus::Lists {
            return;
        }
        let Some(id) = self.store.lists().get(self.list_cursor).map(|list| list.id) else {
            return;
        };
        if self.store.select_list(id) {
            debug!("activated list {}", id);
            self.item_cursor = 0;
        }
        self.focus = Focus::Items;
    }

    fn set_filter(&mut self, filter: PriorityFilter) {
        self.store.set_filter(filter);
        self.clamp_cursors();
    }

    fn toggle_current_selection(&mut self) {
        if let Some(id) = self.current_item_id() {
            self.store.toggle_select(id);
        }
    }

    fn delete_current_item(&mut self) -> Result<()> {
        let Some(id) = self.current_item_id() else {
            return Ok(());
        };
        if self.store.delete_item(id) {
            self.clamp_cursors();
            self.persist()?;
        }
        Ok(())
    }

    fn complete_selected(&mut self) -> Result<()> {
        if self.store.selection().is_empty() {
            return Ok(());
        }
        if self.store.complete_current_selection() {
            self.clamp_cursors();
            self.persist()?;
        }
        Ok(())
    }

    fn complete_all(&mut self) -> Result<()> {
        if self.counts().total == 0 {
            return Ok(());
        }
        if self.store.complete_all() {
            info!("completed every item of the active list");
            self.item_cursor = 0;
            self.persist()?;
        }
        Ok(())
    }
}

impl<S: Storage> KeyEventHandler for App<S> {
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.help_mode {
            self.handle_help_mode_key(key_event)
        } else if self.input_mode.is_editing() {
            self.handle_input_mode_key(key_event)
        } else {
            self.handle_normal_mode_key(key_event)
        }
    }
}
