use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const STATUS_ENTER_ADD: &str =
    "New task: Tab moves between fields, ←/→ picks a category, Enter saves, Esc cancels";
pub(crate) const STATUS_ENTER_EDIT: &str =
    "Editing task: Tab moves between fields, Enter saves, Esc cancels";
pub(crate) const STATUS_SEARCH: &str = "Type to search titles and descriptions • Enter keeps • Esc restores";
pub(crate) const STATUS_TITLE_REQUIRED: &str = "Task title cannot be empty";
pub(crate) const STATUS_VIEW_DETAILS: &str = "Viewing task details • Enter/Esc to close";
pub(crate) const STATUS_HELP: &str = "Keyboard reference • Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion: arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_FILTERS_CLEARED: &str = "Cleared category filter and search";
