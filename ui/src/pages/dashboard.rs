//! Partner dashboard: welcome banner, headline metrics, trends, the
//! assessment mix and recently completed assessments.

use egui::{Color32, ComboBox, Context, Frame, Grid, ProgressBar, RichText, ScrollArea, Ui};
use portal_business::AuthSession;
use portal_business::portal::{
    ActivityEntry, ApiResult, AssessmentStats, AssessmentStatus, AssignedProductsPage, AssignedProductsQuery,
    DistributionEntry, PartnerPortalApi, TrendPoint, TrendType, UserStats, distribution,
    trend_scale,
};

use crate::tasks::Inbox;
use crate::widgets::cards::card_row;
use crate::widgets::cells::{self, NOT_AVAILABLE};

pub const WELCOME_HEADING: &str = "Welcome to your Partner Dashboard";
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Track, manage, and analyze all your assessments in one place.";
pub const VIEW_COMPLETED_LABEL: &str = "View all completed assessments →";
pub const NO_DISTRIBUTION_MESSAGE: &str = "No assessment data available.";
pub const NO_TRENDS_MESSAGE: &str = "No data available";
pub const NO_ACTIVITY_MESSAGE: &str = "No recent activity";

/// Assignments sampled for the distribution panel.
pub const DISTRIBUTION_SAMPLE: usize = 100;

const TREND_BAR_WIDTH: f32 = 220.0;

type Loaded<T> = Option<Result<T, String>>;

/// Navigation requested from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    ViewCompleted,
}

#[derive(Debug)]
enum DashboardMsg {
    Stats(ApiResult<AssessmentStats>),
    Users(ApiResult<UserStats>),
    Trends(TrendType, ApiResult<Vec<TrendPoint>>),
    Activity(ApiResult<Vec<ActivityEntry>>),
    Distribution(ApiResult<AssignedProductsPage>),
}

#[derive(Default)]
pub struct DashboardPage {
    partner_id: Option<String>,
    generation: u64,
    stale: bool,
    trends_stale: bool,
    trend: TrendType,
    stats: Loaded<AssessmentStats>,
    user_stats: Loaded<UserStats>,
    trends: Loaded<Vec<TrendPoint>>,
    activity: Loaded<Vec<ActivityEntry>>,
    distribution: Loaded<Vec<DistributionEntry>>,
    inbox: Inbox<(u64, DashboardMsg)>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            stale: true,
            trends_stale: true,
            ..Self::default()
        }
    }

    /// Refetches every panel on the next frame.
    pub fn reload(&mut self) {
        self.stale = true;
        self.trends_stale = true;
    }

    pub fn stats(&self) -> Option<&AssessmentStats> {
        self.stats.as_ref().and_then(|stats| stats.as_ref().ok())
    }

    pub fn trend(&self) -> TrendType {
        self.trend
    }

    pub fn trends(&self) -> Option<&[TrendPoint]> {
        self.trends
            .as_ref()
            .and_then(|points| points.as_deref().ok())
    }

    pub fn activity(&self) -> Option<&[ActivityEntry]> {
        self.activity
            .as_ref()
            .and_then(|entries| entries.as_deref().ok())
    }

    pub fn distribution(&self) -> Option<&[DistributionEntry]> {
        self.distribution
            .as_ref()
            .and_then(|entries| entries.as_deref().ok())
    }

    pub fn is_loading(&self) -> bool {
        self.inbox.is_busy()
    }

    fn sync(&mut self, session: &AuthSession) {
        let partner_id = session.current_partner().map(|partner| partner.id.clone());
        if partner_id != self.partner_id {
            self.partner_id = partner_id;
            self.generation += 1;
            self.stats = None;
            self.user_stats = None;
            self.trends = None;
            self.activity = None;
            self.distribution = None;
            self.reload();
        }
    }

    fn poll(&mut self) {
        for (generation, msg) in self.inbox.drain() {
            if generation != self.generation {
                log::debug!("Dropping dashboard reply {generation}, now at {}", self.generation);
                continue;
            }
            match msg {
                DashboardMsg::Stats(reply) => self.stats = Some(settle("stats", reply)),
                DashboardMsg::Users(reply) => self.user_stats = Some(settle("user stats", reply)),
                DashboardMsg::Trends(trend, reply) => {
                    if trend == self.trend {
                        self.trends = Some(settle("trends", reply));
                    }
                }
                DashboardMsg::Activity(reply) => {
                    self.activity = Some(settle("recent activity", reply));
                }
                DashboardMsg::Distribution(reply) => {
                    self.distribution = Some(
                        settle("distribution", reply)
                            .map(|page| distribution(&page.assessments)),
                    );
                }
            }
        }
    }

    fn load(&mut self, ctx: &Context, api: &PartnerPortalApi) {
        self.stale = false;
        let Some(partner_id) = self.partner_id.clone() else {
            return;
        };
        log::info!("Loading dashboard for partner {partner_id}");
        let generation = self.generation;

        let (api_, partner) = (api.clone(), partner_id.clone());
        self.inbox.spawn(ctx, async move {
            (generation, DashboardMsg::Stats(api_.assessment_stats(&partner).await))
        });
        let (api_, partner) = (api.clone(), partner_id.clone());
        self.inbox.spawn(ctx, async move {
            (generation, DashboardMsg::Users(api_.user_stats(&partner).await))
        });
        let (api_, partner) = (api.clone(), partner_id.clone());
        self.inbox.spawn(ctx, async move {
            (generation, DashboardMsg::Activity(api_.recent_activity(&partner).await))
        });
        let api_ = api.clone();
        let query = AssignedProductsQuery::new(partner_id, 1, DISTRIBUTION_SAMPLE);
        self.inbox.spawn(ctx, async move {
            (generation, DashboardMsg::Distribution(api_.assigned_products(&query).await))
        });
    }

    fn load_trends(&mut self, ctx: &Context, api: &PartnerPortalApi) {
        self.trends_stale = false;
        let Some(partner_id) = self.partner_id.clone() else {
            return;
        };
        let (generation, trend, api) = (self.generation, self.trend, api.clone());
        self.inbox.spawn(ctx, async move {
            let reply = api.assessment_trends(&partner_id, trend).await;
            (generation, DashboardMsg::Trends(trend, reply))
        });
    }

    /// Draws the page. Returns a navigation request from the activity panel.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        api: &PartnerPortalApi,
        session: &AuthSession,
    ) -> Option<DashboardEvent> {
        self.sync(session);
        self.poll();
        if self.stale {
            self.load(ui.ctx(), api);
        }
        if self.trends_stale {
            self.load_trends(ui.ctx(), api);
        }

        let message = session
            .current_partner()
            .and_then(|partner| partner.custom_message.as_deref())
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(DEFAULT_WELCOME_MESSAGE);
        ui.heading(WELCOME_HEADING);
        ui.label(message);
        ui.add_space(8.0);

        self.metrics(ui);
        ui.add_space(8.0);

        let mut event = None;
        ScrollArea::vertical().show(ui, |ui| {
            panel(ui, "Assessment Trends", |ui| self.trends_panel(ui));
            panel(ui, "Assessment Distribution", |ui| self.distribution_panel(ui));
            panel(ui, "Recent Activity", |ui| event = self.activity_panel(ui));
        });
        event
    }

    fn metrics(&self, ui: &mut Ui) {
        let stat = |pick: fn(&AssessmentStats) -> String| loaded_value(&self.stats, pick);
        card_row(
            ui,
            &[
                ("Assigned Assessments", stat(|s| s.total_assigned.to_string())),
                ("In-Process Assessments", stat(|s| s.total_in_process.to_string())),
                ("Completed Assessments", stat(|s| s.total_completed.to_string())),
                ("Completion Rate", stat(|s| format!("{}%", s.completion_percent()))),
                (
                    "Active Users",
                    loaded_value(&self.user_stats, |u| {
                        format!("{} of {}", u.active_users, u.total_users)
                    }),
                ),
            ],
        );
    }

    fn trends_panel(&mut self, ui: &mut Ui) {
        let before = self.trend;
        ComboBox::from_id_salt("trend_type")
            .selected_text(self.trend.label())
            .show_ui(ui, |ui| {
                for trend in TrendType::ALL {
                    ui.selectable_value(&mut self.trend, trend, trend.label());
                }
            });
        if self.trend != before {
            log::debug!("Trend switched to {}", self.trend);
            self.trends = None;
            self.trends_stale = true;
        }

        match &self.trends {
            None => {
                ui.weak("Loading chart data...");
            }
            Some(Err(error)) => {
                ui.colored_label(Color32::RED, error);
            }
            Some(Ok(points)) if points.is_empty() => {
                ui.weak(NO_TRENDS_MESSAGE);
            }
            Some(Ok(points)) => {
                let scale = trend_scale(points) as f32;
                Grid::new("trend_rows").striped(true).show(ui, |ui| {
                    for point in points {
                        ui.label(point.date.as_str());
                        ui.add(
                            ProgressBar::new(point.pending as f32 / scale)
                                .desired_width(TREND_BAR_WIDTH)
                                .text(format!("Assigned {}", point.pending)),
                        );
                        ui.add(
                            ProgressBar::new(point.completed as f32 / scale)
                                .desired_width(TREND_BAR_WIDTH)
                                .text(format!("Completed {}", point.completed)),
                        );
                        ui.end_row();
                    }
                });
            }
        }
    }

    fn distribution_panel(&self, ui: &mut Ui) {
        match &self.distribution {
            None => {
                ui.spinner();
            }
            Some(Err(error)) => {
                ui.colored_label(Color32::RED, error);
            }
            Some(Ok(entries)) if entries.is_empty() => {
                ui.weak(NO_DISTRIBUTION_MESSAGE);
            }
            Some(Ok(entries)) => {
                for entry in entries {
                    ui.horizontal(|ui| {
                        ui.label(entry.name.as_str());
                        cells::progress_cell(ui, entry.percentage);
                        ui.weak(entry.count.to_string());
                    });
                }
            }
        }
    }

    fn activity_panel(&self, ui: &mut Ui) -> Option<DashboardEvent> {
        match &self.activity {
            None => {
                ui.spinner();
            }
            Some(Err(error)) => {
                ui.colored_label(Color32::RED, error);
            }
            Some(Ok(entries)) if entries.is_empty() => {
                ui.weak(NO_ACTIVITY_MESSAGE);
            }
            Some(Ok(entries)) => {
                for entry in entries {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(entry.title()).strong());
                        cells::status_cell(ui, AssessmentStatus::Completed);
                        cells::date_cell(ui, entry.updated_on);
                    });
                }
            }
        }
        ui.button(VIEW_COMPLETED_LABEL)
            .clicked()
            .then_some(DashboardEvent::ViewCompleted)
    }
}

fn settle<T>(what: &str, reply: ApiResult<T>) -> Result<T, String> {
    reply.map_err(|err| {
        log::warn!("Loading dashboard {what} failed: {err}");
        err.user_message()
    })
}

fn loaded_value<T>(slot: &Loaded<T>, show: impl Fn(&T) -> String) -> Option<String> {
    match slot {
        Some(Ok(value)) => Some(show(value)),
        Some(Err(_)) => Some(NOT_AVAILABLE.to_owned()),
        None => None,
    }
}

fn panel(ui: &mut Ui, title: &str, content: impl FnOnce(&mut Ui)) {
    Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).strong());
        content(ui);
    });
    ui.add_space(8.0);
}
