/// State transitions requested by components and applied by their owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Dialog
    OpenDialog,
    /// A dismissal gesture asked the host to close the dialog
    CloseDialog,

    // Background list
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,

    // App control
    Quit,
    None,
}
