use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Longest interval entry the prompt accepts.
pub const PROMPT_MAX_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Control
    Quit,           // 'q', Esc or Ctrl+C
    ToggleHelp,     // 'h' - Show/hide the banner
    ChangeInterval, // 't' - Prompt for a new interval

    // Sorting
    SortIn,    // 'i'
    SortOut,   // 'o'
    SortDelta, // 'd'

    // Display modes
    ToggleMetric, // 'm' - Switch third column between Δ and SUM

    // Unknown/unhandled
    Unknown,
}

impl InputEvent {
    pub fn from_key_event(key_event: KeyEvent) -> Self {
        if key_event.kind != KeyEventKind::Press {
            return Self::Unknown;
        }
        if is_interrupt(&key_event) {
            return Self::Quit;
        }

        match key_event.code {
            KeyCode::Esc => Self::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => Self::Quit,
                'h' => Self::ToggleHelp,
                'i' => Self::SortIn,
                'o' => Self::SortOut,
                'd' => Self::SortDelta,
                'm' => Self::ToggleMetric,
                't' => Self::ChangeInterval,
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }
}

/// Keys understood while the interval prompt is open.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptInput {
    Char(char),
    Backspace,
    Submit,
    Cancel,
    Interrupt,
    Ignored,
}

impl PromptInput {
    pub fn from_key_event(key_event: KeyEvent) -> Self {
        if key_event.kind != KeyEventKind::Press {
            return Self::Ignored;
        }
        if is_interrupt(&key_event) {
            return Self::Interrupt;
        }

        match key_event.code {
            KeyCode::Enter => Self::Submit,
            KeyCode::Esc => Self::Cancel,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Char(c) if !c.is_control() => Self::Char(c),
            _ => Self::Ignored,
        }
    }

    /// Applies the key to the prompt buffer. Returns false once the buffer
    /// is full or the key is not an edit.
    pub fn edit(&self, buffer: &mut String) -> bool {
        match self {
            Self::Char(c) if buffer.chars().count() < PROMPT_MAX_LEN => {
                buffer.push(*c);
                true
            }
            Self::Backspace => buffer.pop().is_some(),
            _ => false,
        }
    }
}

fn is_interrupt(key_event: &KeyEvent) -> bool {
    key_event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
