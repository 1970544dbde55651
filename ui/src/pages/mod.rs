//! Portal pages.

mod assessments;
mod assign_modal;
mod dashboard;
mod notes;
mod paged;
mod score;
mod users;

pub use assessments::{
    AssessmentFilters, AssessmentsPage, DOWNLOAD_REPORT_LABEL, REPORT_FAILED_MESSAGE,
    VIEW_VALUES_LABEL, parse_date_range,
};
pub use assign_modal::{AssignModal, ASSIGN_WINDOW_TITLE, PRODUCT_PLACEHOLDER, SUBMIT_LABEL};
pub use dashboard::{
    DEFAULT_WELCOME_MESSAGE, DashboardEvent, DashboardPage, VIEW_COMPLETED_LABEL, WELCOME_HEADING,
};
pub use notes::{AssessmentNotesWindow, UserNotesPanel};
pub use paged::{PagedFetch, PagedResponse, Reload};
pub use score::{CLOSE_LABEL, NO_SCORE_MESSAGE, OVERALL_SCORE_LABEL, ScoreWindow};
pub use users::{NOTES_LABEL, USERS_PAGE_SIZE, UsersEvent, UsersPage, VIEW_ASSESSMENTS_LABEL};
