/// What the confirmation dialog shows: whether it is open and the current toggle values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfirmationView {
    pub open: bool,
    pub print_title: bool,
    pub show_metadata: bool,
    pub hr_page_breaks: bool,
}
