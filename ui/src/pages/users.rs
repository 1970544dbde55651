//! Users list: debounced search, server-paged table and per-user actions.

use chrono::Utc;
use egui::{Color32, TextEdit, Ui};
use portal_business::AuthSession;
use portal_business::debounce::Debounced;
use portal_business::modal::ModalController;
use portal_business::portal::{PartnerPortalApi, PartnerUser, UsersPage as UsersResponse};
use portal_business::table::{
    ColumnDescriptor, DEFAULT_PAGE_SIZE, PaginatedTable, TableError, TableProps,
};
use ustr::Ustr;

use super::notes::UserNotesPanel;
use super::paged::PagedFetch;
use crate::widgets::{cells, paginated_table};

pub const USERS_PAGE_SIZE: usize = DEFAULT_PAGE_SIZE;
pub const VIEW_ASSESSMENTS_LABEL: &str = "View Assessments";
pub const NOTES_LABEL: &str = "Notes";

/// Navigation requested from a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersEvent {
    ViewAssessments { user_id: String },
}

fn user_columns() -> Vec<ColumnDescriptor<PartnerUser>> {
    vec![
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("phone", "Phone"),
        ColumnDescriptor::new("totalProducts.total", "Assigned"),
        ColumnDescriptor::new("completionPercentage", "Completion"),
        ColumnDescriptor::new("createdOn", "Joined"),
        ColumnDescriptor::fixed("actions", "Actions"),
    ]
}

pub struct UsersPage {
    table: PaginatedTable<PartnerUser>,
    search_input: String,
    search: Debounced<String>,
    query: String,
    users: Vec<PartnerUser>,
    fetch: PagedFetch<UsersResponse>,
    notes: Option<UserNotesPanel>,
}

impl UsersPage {
    /// Creates the page and subscribes it to new assignments.
    pub fn new(modal: &mut ModalController) -> Result<Self, TableError> {
        let table = PaginatedTable::new(user_columns())?.with_empty_message("No users found");

        Ok(Self {
            table,
            search_input: String::new(),
            search: Debounced::search(),
            query: String::new(),
            users: Vec::new(),
            fetch: PagedFetch::new("users", USERS_PAGE_SIZE, modal),
            notes: None,
        })
    }

    /// Stops listening for new assignments.
    pub fn detach(&mut self, modal: &mut ModalController) {
        self.fetch.detach(modal);
    }

    pub fn users(&self) -> &[PartnerUser] {
        &self.users
    }

    pub fn page(&self) -> u32 {
        self.fetch.page()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_busy()
    }

    pub fn notes_panel(&self) -> Option<&UserNotesPanel> {
        self.notes.as_ref()
    }

    fn search_bar(&mut self, ui: &mut Ui) {
        let now = Utc::now();
        ui.horizontal(|ui| {
            ui.label("Search");
            let response = ui.add(
                TextEdit::singleline(&mut self.search_input)
                    .hint_text("Name, phone or email")
                    .desired_width(260.0),
            );
            if response.changed() {
                self.search.set(self.search_input.trim().to_owned(), now);
            }
            if self.fetch.is_busy() {
                ui.spinner();
            }
        });

        if let Some(query) = self.search.poll(now) {
            log::debug!("Search settled on {query:?}");
            self.query = query;
            self.fetch.restart();
        } else if let Some(remaining) = self.search.remaining(now) {
            ui.ctx()
                .request_repaint_after(remaining.to_std().unwrap_or_default());
        }
    }

    /// Draws the page. Returns a navigation request from the row actions.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        api: &PartnerPortalApi,
        session: &AuthSession,
    ) -> Option<UsersEvent> {
        self.fetch.sync(session);
        if let Some(users) = self.fetch.poll() {
            self.users = users;
        }

        ui.heading("Users");
        self.search_bar(ui);
        if let Some(error) = self.fetch.error() {
            ui.colored_label(Color32::RED, error);
        }
        ui.add_space(8.0);

        let mut requested = None;
        let mut event = None;
        let mut open_notes = None;
        let props = TableProps::server(&self.users, self.fetch.pagination(), |page| {
            requested = Some(page);
        })
        .with_collection_key(self.fetch.collection_key());

        let result = paginated_table(ui, "users_table", &mut self.table, props, |ui, user, field| {
            match user_cell(ui, user, field) {
                Some(RowAction::ViewAssessments) => {
                    event = Some(UsersEvent::ViewAssessments {
                        user_id: user.id.clone(),
                    });
                }
                Some(RowAction::Notes) => open_notes = Some(UserNotesPanel::new(user)),
                None => {}
            }
        });
        if let Err(err) = result {
            log::error!("Users table misconfigured: {err}");
            ui.colored_label(Color32::RED, err.to_string());
        }

        if let Some(page) = requested {
            self.fetch.request_page(page);
        }
        if open_notes.is_some() {
            self.notes = open_notes;
        }
        if let Some(panel) = &mut self.notes
            && !panel.show(ui.ctx(), api, session)
        {
            self.notes = None;
        }

        let query = self.query.clone();
        let api = api.clone();
        self.fetch.fetch_if_stale(ui.ctx(), move |partner_id, page| async move {
            api.users(&partner_id, &query, page, USERS_PAGE_SIZE).await
        });
        event
    }
}

enum RowAction {
    ViewAssessments,
    Notes,
}

fn user_cell(ui: &mut Ui, user: &PartnerUser, field: Ustr) -> Option<RowAction> {
    match field.as_str() {
        "name" => cells::avatar_cell(ui, &user.initials(), &user.name),
        "phone" => cells::text_cell(ui, &user.phone),
        "totalProducts.total" => cells::text_cell(ui, &user.total_products.total.to_string()),
        "completionPercentage" => cells::progress_cell(ui, user.completion_percentage()),
        "createdOn" => cells::date_cell(ui, user.created_on),
        "actions" => {
            let mut action = None;
            ui.horizontal(|ui| {
                if ui.small_button(VIEW_ASSESSMENTS_LABEL).clicked() {
                    action = Some(RowAction::ViewAssessments);
                }
                if ui.small_button(NOTES_LABEL).clicked() {
                    action = Some(RowAction::Notes);
                }
            });
            return action;
        }
        _ => {}
    }
    None
}
