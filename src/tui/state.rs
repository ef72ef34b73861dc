/// Pane receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Lists,
    #[default]
    Items,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Lists => Self::Items,
            Self::Items => Self::Lists,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    NewList,
    NewItem,
}

impl InputMode {
    pub fn is_editing(self) -> bool {
        self != Self::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_toggle() {
        assert_eq!(Focus::Items.toggle(), Focus::Lists);
        assert_eq!(Focus::Lists.toggle().toggle(), Focus::Lists);
    }

    #[test]
    fn test_input_mode_editing() {
        assert!(!InputMode::Normal.is_editing());
        assert!(InputMode::NewList.is_editing());
        assert!(InputMode::NewItem.is_editing());
    }
}
