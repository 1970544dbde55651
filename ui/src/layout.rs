//! Navigation bar shared by every signed-in page.

use egui::{Align, ComboBox, Layout, Ui};
use portal_business::AuthSession;

pub const ASSIGN_BUTTON_LABEL: &str = "+ Assign Assessment";
pub const SIGN_OUT_LABEL: &str = "Sign out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Users,
    Assessments,
}

impl Route {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Users, Self::Assessments];

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::Assessments => "Assessments",
        }
    }
}

/// What the user asked for from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Navigate(Route),
    OpenAssign,
    ChangePartner(usize),
    SignOut,
}

/// Renders the navigation bar for `route`.
pub fn navbar(ui: &mut Ui, route: Route, session: &AuthSession) -> Option<NavAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Partner Portal");
        ui.separator();

        let mut target = route;
        for candidate in Route::ALL {
            ui.selectable_value(&mut target, candidate, candidate.title());
        }
        if target != route {
            action = Some(NavAction::Navigate(target));
        }

        ui.separator();
        if ui.button(ASSIGN_BUTTON_LABEL).clicked() {
            action = Some(NavAction::OpenAssign);
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button(SIGN_OUT_LABEL).clicked() {
                action = Some(NavAction::SignOut);
            }
            ui.label(session.user_name());

            let selected = session.selected_index();
            let mut chosen = selected;
            let current = session
                .current_partner()
                .map_or("No partner", |partner| partner.name.as_str());
            ComboBox::from_id_salt("partner_select")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (index, partner) in session.partners().iter().enumerate() {
                        ui.selectable_value(&mut chosen, index, partner.name.as_str());
                    }
                });
            if chosen != selected {
                action = Some(NavAction::ChangePartner(chosen));
            }
        });
    });
    ui.separator();

    action
}

/// Navigation bar followed by `content`.
pub fn with_navbar<R>(
    ui: &mut Ui,
    route: Route,
    session: &AuthSession,
    content: impl FnOnce(&mut Ui) -> R,
) -> (Option<NavAction>, R) {
    let action = navbar(ui, route, session);
    let inner = content(ui);
    (action, inner)
}
