/// The one-line command entry above the columns.
///
/// `placeholder` doubles as the status line: command results and log
/// messages land there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Minibuffer {
    text: String,
    placeholder: String,
    focused: bool,
}

impl Minibuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, msg: impl Into<String>) {
        self.placeholder = msg.into();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Focusing the entry clears the previous message.
    pub fn focus(&mut self) {
        self.focused = true;
        self.placeholder.clear();
    }

    /// Take the typed command and hand focus back to the edit windows.
    pub fn submit(&mut self) -> String {
        self.focused = false;
        std::mem::take(&mut self.text)
    }

    /// `C-g`: drop focus; typed text is kept.
    pub fn cancel(&mut self) {
        self.focused = false;
    }
}
