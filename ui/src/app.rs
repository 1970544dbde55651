use portal_business::modal::ModalController;
use portal_business::portal::AssessmentStatus;
use portal_business::table::TableError;
use portal_business::{AuthSession, BusinessConfig, PartnerPortalApi};

use crate::layout::{NavAction, Route, with_navbar};
use crate::pages::{
    AssessmentsPage, AssignModal, DashboardEvent, DashboardPage, UsersEvent, UsersPage,
};

pub const SIGNED_OUT_HEADING: &str = "Signed out";

pub struct PortalApp {
    api: PartnerPortalApi,
    session: AuthSession,
    modal: ModalController,
    route: Route,
    dashboard: DashboardPage,
    users: UsersPage,
    assessments: AssessmentsPage,
    assign: AssignModal,
}

impl PortalApp {
    /// Called once before the first frame.
    pub fn new(config: BusinessConfig, session: AuthSession) -> Result<Self, TableError> {
        let api = PartnerPortalApi::new(config, session.token().map(str::to_owned));
        let mut modal = ModalController::new();
        let users = UsersPage::new(&mut modal)?;
        let assessments = AssessmentsPage::new(&mut modal)?;

        Ok(Self {
            api,
            session,
            modal,
            route: Route::default(),
            dashboard: DashboardPage::new(),
            users,
            assessments,
            assign: AssignModal::new(),
        })
    }

    /// Starts on `route` instead of the dashboard.
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn dashboard(&self) -> &DashboardPage {
        &self.dashboard
    }

    pub fn users(&self) -> &UsersPage {
        &self.users
    }

    pub fn assessments(&self) -> &AssessmentsPage {
        &self.assessments
    }

    pub fn assign(&self) -> &AssignModal {
        &self.assign
    }

    fn handle_nav(&mut self, action: NavAction) {
        log::debug!("Navigation {action:?}");
        match action {
            NavAction::Navigate(route) => {
                if route == Route::Dashboard {
                    self.dashboard.reload();
                }
                self.route = route;
            }
            NavAction::OpenAssign => {
                self.assign.reset();
                self.modal.open_assign();
            }
            NavAction::ChangePartner(index) => {
                self.session.change_partner(index);
            }
            NavAction::SignOut => {
                self.modal.close_assign();
                self.users.detach(&mut self.modal);
                self.assessments.detach(&mut self.modal);
                self.session.sign_out();
            }
        }
    }

    fn handle_page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Users(UsersEvent::ViewAssessments { user_id }) => {
                self.assessments.filter_by_user(user_id);
            }
            PageEvent::Dashboard(DashboardEvent::ViewCompleted) => {
                self.assessments.filter_by_status(AssessmentStatus::Completed);
            }
        }
        self.route = Route::Assessments;
    }
}

/// Navigation requested from inside a page.
enum PageEvent {
    Users(UsersEvent),
    Dashboard(DashboardEvent),
}

impl eframe::App for PortalApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.session.is_authenticated() {
                ui.vertical_centered(|ui| {
                    ui.heading(SIGNED_OUT_HEADING);
                    ui.label("Restart the portal with a valid PORTAL_TOKEN to sign in again.");
                });
                return;
            }

            let route = self.route;
            let (nav, event) = with_navbar(ui, route, &self.session, |ui| match route {
                Route::Dashboard => self
                    .dashboard
                    .show(ui, &self.api, &self.session)
                    .map(PageEvent::Dashboard),
                Route::Users => self
                    .users
                    .show(ui, &self.api, &self.session)
                    .map(PageEvent::Users),
                Route::Assessments => {
                    self.assessments.show(ui, &self.api, &self.session);
                    None
                }
            });

            if let Some(action) = nav {
                self.handle_nav(action);
            }
            if let Some(event) = event {
                self.handle_page_event(event);
            }
        });

        if self.session.is_authenticated() {
            self.assign
                .show(ctx, &self.api, &self.session, &mut self.modal);
        }
    }
}
