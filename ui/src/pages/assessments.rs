//! Assigned assessments: status counts, filters, server-paged table and
//! per-assignment actions.

use chrono::NaiveDate;
use egui::{Button, Color32, ComboBox, Context, OpenUrl, TextEdit, Ui};
use portal_business::modal::ModalController;
use portal_business::portal::{
    ApiResult, AssessmentCounts, AssessmentStatus, AssignedProduct, AssignedProductsPage,
    AssignedProductsQuery, PartnerPortalApi,
};
use portal_business::table::{
    ColumnDescriptor, DEFAULT_PAGE_SIZE, PaginatedTable, SortDirection, SortState, TableError,
    TableProps,
};
use portal_business::AuthSession;
use ustr::Ustr;

use super::notes::AssessmentNotesWindow;
use super::paged::PagedFetch;
use super::score::ScoreWindow;
use crate::tasks::Inbox;
use crate::widgets::cards::card_row;
use crate::widgets::cells::{self, NOT_AVAILABLE};
use crate::widgets::paginated_table;

pub const ASSESSMENTS_PAGE_SIZE: usize = DEFAULT_PAGE_SIZE;
pub const ALL_STATUSES_LABEL: &str = "All statuses";
pub const APPLY_LABEL: &str = "Apply";
pub const CLEAR_LABEL: &str = "Clear";
pub const VIEW_VALUES_LABEL: &str = "View Values";
pub const DOWNLOAD_REPORT_LABEL: &str = "Download Report";
pub const REPORT_FAILED_MESSAGE: &str = "Failed to download report. Please try again.";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_INPUT_WIDTH: f32 = 110.0;

fn assessment_columns() -> Vec<ColumnDescriptor<AssignedProduct>> {
    vec![
        ColumnDescriptor::new("userId", "User"),
        ColumnDescriptor::new("assessmentName", "Assessment"),
        ColumnDescriptor::new("status", "Status"),
        ColumnDescriptor::new("created", "Assigned On"),
        ColumnDescriptor::new("updated", "Last Updated"),
        ColumnDescriptor::fixed("actions", "Actions"),
    ]
}

/// Server-side filters as last applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentFilters {
    pub status: Option<AssessmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub user_id: Option<String>,
}

impl AssessmentFilters {
    fn query(&self, partner_id: &str, page: u32) -> AssignedProductsQuery {
        AssignedProductsQuery {
            status: self.status,
            date_from: self.date_from.map(|date| date.format(DATE_FORMAT).to_string()),
            date_to: self.date_to.map(|date| date.format(DATE_FORMAT).to_string()),
            user_id: self.user_id.clone(),
            ..AssignedProductsQuery::new(partner_id, page, ASSESSMENTS_PAGE_SIZE)
        }
    }
}

/// Reads the date range typed into the filter bar.
pub fn parse_date_range(
    from: &str,
    to: &str,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
    let parse = |label: &str, text: &str| -> Result<Option<NaiveDate>, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|err| {
                log::debug!("Rejecting {label} {text:?}: {err}");
                format!("{label} must look like YYYY-MM-DD")
            })
    };
    let from = parse("Start date", from)?;
    let to = parse("End date", to)?;
    if let (Some(start), Some(end)) = (from, to)
        && start > end
    {
        return Err("Start date must not be after end date".to_owned());
    }
    Ok((from, to))
}

#[derive(Debug)]
enum PageMsg {
    Counts {
        partner_id: String,
        reply: ApiResult<AssessmentCounts>,
    },
    ReportLink(ApiResult<String>),
}

pub struct AssessmentsPage {
    table: PaginatedTable<AssignedProduct>,
    status_input: Option<AssessmentStatus>,
    date_from_input: String,
    date_to_input: String,
    name_filter: String,
    filters: AssessmentFilters,
    filter_error: Option<String>,
    rows: Vec<AssignedProduct>,
    visible: Vec<AssignedProduct>,
    fetch: PagedFetch<AssignedProductsPage>,
    counts: Option<Result<AssessmentCounts, String>>,
    counts_stale: bool,
    report_error: Option<String>,
    last_report_link: Option<String>,
    inbox: Inbox<PageMsg>,
    notes: Option<AssessmentNotesWindow>,
    score: Option<ScoreWindow>,
}

impl AssessmentsPage {
    /// Creates the page and subscribes it to new assignments.
    pub fn new(modal: &mut ModalController) -> Result<Self, TableError> {
        let table = PaginatedTable::new(assessment_columns())?
            .with_initial_sort(SortState::new("created", SortDirection::Descending))
            .with_empty_message("No assessments found");

        Ok(Self {
            table,
            status_input: None,
            date_from_input: String::new(),
            date_to_input: String::new(),
            name_filter: String::new(),
            filters: AssessmentFilters::default(),
            filter_error: None,
            rows: Vec::new(),
            visible: Vec::new(),
            fetch: PagedFetch::new("assessments", ASSESSMENTS_PAGE_SIZE, modal),
            counts: None,
            counts_stale: true,
            report_error: None,
            last_report_link: None,
            inbox: Inbox::new(),
            notes: None,
            score: None,
        })
    }

    /// Stops listening for new assignments.
    pub fn detach(&mut self, modal: &mut ModalController) {
        self.fetch.detach(modal);
    }

    /// Shows only the assignments of `user_id`.
    pub fn filter_by_user(&mut self, user_id: impl Into<String>) {
        self.filters.user_id = Some(user_id.into());
        self.fetch.restart();
    }

    /// Shows only assignments in `status`, as if picked in the filter bar.
    pub fn filter_by_status(&mut self, status: AssessmentStatus) {
        self.status_input = Some(status);
        self.filters.status = Some(status);
        self.fetch.restart();
    }

    pub fn filters(&self) -> &AssessmentFilters {
        &self.filters
    }

    /// Rows left after the client-side name filter.
    pub fn visible(&self) -> &[AssignedProduct] {
        &self.visible
    }

    pub fn page(&self) -> u32 {
        self.fetch.page()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_busy()
    }

    /// Status counts, once loaded.
    pub fn counts(&self) -> Option<AssessmentCounts> {
        self.counts.as_ref().and_then(|counts| counts.as_ref().ok().copied())
    }

    /// Link of the last report opened from this page.
    pub fn last_report_link(&self) -> Option<&str> {
        self.last_report_link.as_deref()
    }

    pub fn score_window(&self) -> Option<&ScoreWindow> {
        self.score.as_ref()
    }

    fn refilter(&mut self) {
        let needle = self.name_filter.trim();
        self.visible = self
            .rows
            .iter()
            .filter(|row| row.matches_user_name(needle))
            .cloned()
            .collect();
    }

    fn poll(&mut self, ctx: &Context) {
        if let Some(rows) = self.fetch.poll() {
            self.rows = rows;
            self.refilter();
        }
        for msg in self.inbox.drain() {
            match msg {
                PageMsg::Counts { partner_id, reply } => {
                    if self.fetch.partner_id() != Some(partner_id.as_str()) {
                        log::debug!("Dropping counts for former partner {partner_id}");
                        continue;
                    }
                    self.counts = Some(reply.map_err(|err| {
                        log::warn!("Fetching assessment counts failed: {err}");
                        err.user_message()
                    }));
                }
                PageMsg::ReportLink(Ok(link)) => {
                    log::info!("Opening consultation report");
                    ctx.open_url(OpenUrl::new_tab(&link));
                    self.report_error = None;
                    self.last_report_link = Some(link);
                }
                PageMsg::ReportLink(Err(err)) => {
                    log::warn!("Resolving report link failed: {err}");
                    self.report_error = Some(REPORT_FAILED_MESSAGE.to_owned());
                }
            }
        }
    }

    fn load_counts(&mut self, ctx: &Context, api: &PartnerPortalApi) {
        self.counts_stale = false;
        let Some(partner_id) = self.fetch.partner_id().map(str::to_owned) else {
            return;
        };
        let api = api.clone();
        self.inbox.spawn(ctx, async move {
            let reply = api.assessment_counts(&partner_id).await;
            PageMsg::Counts { partner_id, reply }
        });
    }

    fn open_report(&mut self, ctx: &Context, api: &PartnerPortalApi, report_id: String) {
        let Some(partner_id) = self.fetch.partner_id().map(str::to_owned) else {
            return;
        };
        let api = api.clone();
        log::info!("Resolving report {report_id}");
        self.inbox.spawn(ctx, async move {
            PageMsg::ReportLink(api.consultation_report_link(&partner_id, &report_id).await)
        });
    }

    fn count_cards(&self, ui: &mut Ui) {
        let value = |pick: fn(&AssessmentCounts) -> u32| match &self.counts {
            Some(Ok(counts)) => Some(pick(counts).to_string()),
            Some(Err(_)) => Some(NOT_AVAILABLE.to_owned()),
            None => None,
        };
        card_row(
            ui,
            &[
                ("Total Assessments", value(|c| c.total)),
                ("Assigned", value(|c| c.assigned)),
                ("In Process", value(|c| c.in_process)),
                ("Completed", value(|c| c.completed)),
            ],
        );
    }

    fn apply_filters(&mut self) {
        match parse_date_range(&self.date_from_input, &self.date_to_input) {
            Ok((date_from, date_to)) => {
                self.filter_error = None;
                self.filters.status = self.status_input;
                self.filters.date_from = date_from;
                self.filters.date_to = date_to;
                self.fetch.restart();
            }
            Err(message) => self.filter_error = Some(message),
        }
    }

    fn clear_filters(&mut self) {
        self.status_input = None;
        self.date_from_input.clear();
        self.date_to_input.clear();
        self.name_filter.clear();
        self.filter_error = None;
        self.filters = AssessmentFilters::default();
        self.refilter();
        self.fetch.restart();
    }

    fn filter_bar(&mut self, ui: &mut Ui) {
        let mut apply = false;
        let mut clear = false;

        ui.horizontal_wrapped(|ui| {
            let selected = self.status_input.map_or(ALL_STATUSES_LABEL, AssessmentStatus::as_str);
            ComboBox::from_id_salt("status_filter")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.status_input, None, ALL_STATUSES_LABEL);
                    for status in AssessmentStatus::ALL {
                        ui.selectable_value(&mut self.status_input, Some(status), status.as_str());
                    }
                });

            ui.label("From");
            ui.add(
                TextEdit::singleline(&mut self.date_from_input)
                    .hint_text("YYYY-MM-DD")
                    .desired_width(DATE_INPUT_WIDTH),
            );
            ui.label("To");
            ui.add(
                TextEdit::singleline(&mut self.date_to_input)
                    .hint_text("YYYY-MM-DD")
                    .desired_width(DATE_INPUT_WIDTH),
            );

            apply = ui.button(APPLY_LABEL).clicked();
            clear = ui.button(CLEAR_LABEL).clicked();
        });

        ui.horizontal(|ui| {
            ui.label("User name");
            let response = ui.add(
                TextEdit::singleline(&mut self.name_filter)
                    .hint_text("Filter this page by name")
                    .desired_width(220.0),
            );
            if response.changed() {
                self.refilter();
            }
            if let Some(user_id) = self.filters.user_id.clone() {
                ui.label(format!("User: {user_id}"));
                if ui.small_button("✖").on_hover_text("Show all users").clicked() {
                    self.filters.user_id = None;
                    self.fetch.restart();
                }
            }
            if self.fetch.is_busy() {
                ui.spinner();
            }
        });

        if let Some(error) = &self.filter_error {
            ui.colored_label(Color32::RED, error);
        }
        if apply {
            self.apply_filters();
        }
        if clear {
            self.clear_filters();
        }
    }

    pub fn show(&mut self, ui: &mut Ui, api: &PartnerPortalApi, session: &AuthSession) {
        if self.fetch.sync(session).is_some() {
            self.counts_stale = true;
        }
        self.poll(ui.ctx());
        if self.counts_stale {
            self.load_counts(ui.ctx(), api);
        }

        ui.heading("Assessments");
        self.count_cards(ui);
        ui.add_space(8.0);
        self.filter_bar(ui);
        if let Some(error) = self.fetch.error() {
            ui.colored_label(Color32::RED, error);
        }
        if let Some(error) = &self.report_error {
            ui.colored_label(Color32::RED, error);
        }
        ui.add_space(8.0);

        let mut requested = None;
        let mut action = None;
        let props = TableProps::server(&self.visible, self.fetch.pagination(), |page| {
            requested = Some(page);
        })
        .with_collection_key(self.fetch.collection_key());

        let result = paginated_table(
            ui,
            "assessments_table",
            &mut self.table,
            props,
            |ui, row, field| {
                if let Some(picked) = assessment_cell(ui, row, field) {
                    action = Some((picked, row.clone()));
                }
            },
        );
        if let Err(err) = result {
            log::error!("Assessments table misconfigured: {err}");
            ui.colored_label(Color32::RED, err.to_string());
        }

        if let Some(page) = requested {
            self.fetch.request_page(page);
        }
        match action {
            Some((RowAction::Notes, row)) => self.notes = Some(AssessmentNotesWindow::new(&row)),
            Some((RowAction::Values, row)) => self.score = Some(ScoreWindow::new(&row)),
            Some((RowAction::Report(report_id), _)) => self.open_report(ui.ctx(), api, report_id),
            None => {}
        }
        if let Some(window) = &mut self.notes
            && !window.show(ui.ctx(), api, session)
        {
            self.notes = None;
        }
        if let Some(window) = &self.score
            && !window.show(ui.ctx())
        {
            self.score = None;
        }

        let filters = self.filters.clone();
        let api = api.clone();
        self.fetch.fetch_if_stale(ui.ctx(), move |partner_id, page| async move {
            let query = filters.query(&partner_id, page);
            log::debug!("Assessments query {query:?}");
            api.assigned_products(&query).await
        });
    }
}

enum RowAction {
    Notes,
    Values,
    Report(String),
}

fn assessment_cell(ui: &mut Ui, row: &AssignedProduct, field: Ustr) -> Option<RowAction> {
    match field.as_str() {
        "userId" => cells::text_cell(ui, row.display_user()),
        "assessmentName" => cells::text_cell(ui, row.display_assessment()),
        "status" => cells::status_cell(ui, row.status),
        "created" => cells::date_cell(ui, row.created),
        "updated" => cells::date_cell(ui, row.updated),
        "actions" => {
            let mut action = None;
            ui.horizontal(|ui| {
                if ui.small_button("Notes").clicked() {
                    action = Some(RowAction::Notes);
                }
                if row.is_completed() && ui.small_button(VIEW_VALUES_LABEL).clicked() {
                    action = Some(RowAction::Values);
                }
                match row.report_id() {
                    Some(report_id) => {
                        if ui.small_button(DOWNLOAD_REPORT_LABEL).clicked() {
                            action = Some(RowAction::Report(report_id.to_owned()));
                        }
                    }
                    None => {
                        ui.add_enabled(false, Button::new(DOWNLOAD_REPORT_LABEL).small())
                            .on_disabled_hover_text("Report is ready once the assessment is completed");
                    }
                }
            });
            return action;
        }
        _ => {}
    }
    None
}
