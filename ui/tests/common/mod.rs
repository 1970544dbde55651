#![allow(dead_code)]

use std::time::Duration;

use egui_kittest::Harness;
use portal_business::portal::Partner;
use portal_business::{AuthSession, BusinessConfig};
use portal_ui::PortalApp;
use portal_ui::layout::Route;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PREFIX: &str = "/v3/partnerPortal";
pub const REPORT_LINK: &str = "https://reports.example.com/rep-1.pdf";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn session() -> AuthSession {
    AuthSession::new(
        "test-token",
        "Asha",
        vec![Partner {
            id: "p1".to_owned(),
            name: "Acme Clinic".to_owned(),
            custom_message: Some("Screening week starts Monday".to_owned()),
        }],
    )
}

pub fn user(index: usize) -> Value {
    json!({
        "id": format!("u{index}"),
        "name": format!("Member {index:02}"),
        "phone": format!("9198765432{index:02}"),
        "totalProducts": { "total": 2, "assigned": 1, "started": 0, "completed": 1 }
    })
}

/// `{data: {users, pagination}}` for one page of a 25 user collection.
pub fn users_body(page: usize) -> Value {
    let first = (page - 1) * 10 + 1;
    let last = (page * 10).min(25);
    let users: Vec<Value> = (first..=last).map(user).collect();
    json!({
        "data": {
            "users": users,
            "pagination": { "page": page, "pages": 3, "totalUsers": 25, "limit": 10 }
        }
    })
}

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, PortalApp>,
}

impl<'a> TestCtx<'a> {
    /// App on the users page, where most tests start.
    pub async fn new_app() -> Self {
        Self::new_app_on(Route::Users).await
    }

    pub async fn new_app_on(route: Route) -> Self {
        init_logger();
        let mock_server = MockServer::start().await;
        mount_portal(&mock_server).await;

        let app = PortalApp::new(BusinessConfig::new(mock_server.uri()), session())
            .expect("static columns are valid")
            .with_route(route);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, PortalApp> {
        &mut self.harness
    }

    pub fn harness(&self) -> &Harness<'a, PortalApp> {
        &self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Runs frames until spawned requests had time to come back.
    pub async fn settle(&mut self) {
        self.harness.step();
        tokio::time::sleep(Duration::from_millis(200)).await;
        for _ in 0..10 {
            self.harness.step();
        }
    }
}

async fn mount_portal(server: &MockServer) {
    for page in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("{PREFIX}/users")))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_body(page)))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/assigned-products")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "assessments": [{
                    "_id": "a1",
                    "userId": "u1",
                    "userName": "Member 01",
                    "assessmentName": "Hearing Check",
                    "status": "COMPLETED",
                    "created": "2024-01-02T00:00:00Z",
                    "userProductId": "up1",
                    "consultationReport": "rep-1",
                    "score": 72,
                    "values": { "shortTermMemory": 80, "focus": 64 }
                }],
                "pagination": { "page": 1, "pages": 1, "total": 1, "limit": 10 }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/consultation-report/rep-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "reportLink": REPORT_LINK }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/assessment-counts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "total": 9, "assigned": 4, "inProcess": 2, "completed": 3 }
        })))
        .mount(server)
        .await;

    mount_dashboard(server).await;

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/available-products")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "_id": "prod1", "name": "Hearing Check" },
                { "_id": "prod2", "name": "Vision Screening" }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_dashboard(server: &MockServer) {
    let endpoints = [
        (
            "assessment-stats",
            json!({ "totalAssigned": 5, "totalInProcess": 3, "totalCompleted": 2, "completionRate": 20 }),
        ),
        ("user-stats", json!({ "totalUsers": 25, "activeUsers": 12 })),
        (
            "assessment-trends",
            json!([{ "date": "Jan 2024", "pending": 4, "inProcess": 1, "completed": 2 }]),
        ),
        (
            "recent-activity",
            json!([{
                "userName": "Member 01",
                "assessmentType": "Hearing Check",
                "updatedOn": "2024-01-05T00:00:00Z"
            }]),
        ),
    ];
    for (endpoint, data) in endpoints {
        Mock::given(method("GET"))
            .and(path(format!("{PREFIX}/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(server)
            .await;
    }
}
