//! Client for the `/v3/partnerPortal` REST endpoints.
//!
//! Successful responses wrap their payload as `{ "data": ... }`; failures
//! carry a `message` that is surfaced to the user as-is.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use super::stats::{
    ActivityEntry, AssessmentCounts, AssessmentStats, ReportLink, TrendPoint, TrendType, UserStats,
};
use super::types::{
    AssessmentStatus, AssignedProductsPage, NewNote, NewUser, Note, PartnerUser, Product,
    UserNotesResponse, UsersPage,
};
use crate::config::BusinessConfig;
use crate::http::{Client, HttpError, RequestBuilder, Response};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// Text suitable for an inline error label.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Http(_) => "Could not reach the server. Please try again later.".to_owned(),
            Self::Decode { .. } | Self::Encode(_) => {
                "Something went wrong. Please try again later.".to_owned()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `/users` answers with either a page object or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum UsersPayload {
    Page(UsersPage),
    List(Vec<PartnerUser>),
}

/// Filters for the assigned-products listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignedProductsQuery {
    pub partner_id: String,
    pub status: Option<AssessmentStatus>,
    /// `YYYY-MM-DD`
    pub date_from: Option<String>,
    /// `YYYY-MM-DD`
    pub date_to: Option<String>,
    pub user_id: Option<String>,
    pub page: u32,
    pub limit: usize,
}

impl AssignedProductsQuery {
    pub fn new(partner_id: impl Into<String>, page: u32, limit: usize) -> Self {
        Self {
            partner_id: partner_id.into(),
            page,
            limit,
            ..Self::default()
        }
    }
}

/// Authenticated partner portal client.
#[derive(Debug, Clone)]
pub struct PartnerPortalApi {
    config: BusinessConfig,
    token: Option<String>,
}

impl PartnerPortalApi {
    pub fn new(config: BusinessConfig, token: Option<String>) -> Self {
        Self { config, token }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    fn get(&self, path: &str) -> RequestBuilder {
        Client::get(self.config.endpoint(path)).bearer(self.token.as_deref())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        Client::post(self.config.endpoint(path)).bearer(self.token.as_deref())
    }

    fn put(&self, path: &str) -> RequestBuilder {
        Client::put(self.config.endpoint(path)).bearer(self.token.as_deref())
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        Client::delete(self.config.endpoint(path)).bearer(self.token.as_deref())
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "An error occurred".to_owned());
        log::warn!("API returned status {}: {message}", response.status);
        Err(ApiError::Status {
            status: response.status,
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder, what: &'static str) -> ApiResult<T> {
        let response = Self::send(request).await?;
        response
            .json::<Envelope<T>>()
            .map(|envelope| envelope.data)
            .map_err(|source| ApiError::Decode { what, source })
    }

    fn with_json<B: serde::Serialize>(request: RequestBuilder, body: &B) -> ApiResult<RequestBuilder> {
        request.json(body).map_err(ApiError::Encode)
    }

    /// GET `/users`
    pub async fn users(
        &self,
        partner_id: &str,
        search: &str,
        page: u32,
        limit: usize,
    ) -> ApiResult<UsersPage> {
        let search = search.trim();
        let request = self
            .get("/users")
            .query("partnerId", partner_id)
            .query("page", page)
            .query("limit", limit)
            .query_opt("search", (!search.is_empty()).then_some(search));

        match Self::fetch::<UsersPayload>(request, "users").await? {
            UsersPayload::Page(page) => Ok(page),
            UsersPayload::List(users) => Ok(UsersPage {
                users,
                pagination: None,
            }),
        }
    }

    /// GET `/assigned-products`
    pub async fn assigned_products(
        &self,
        query: &AssignedProductsQuery,
    ) -> ApiResult<AssignedProductsPage> {
        let request = self
            .get("/assigned-products")
            .query("partnerId", &query.partner_id)
            .query_opt("status", query.status.map(AssessmentStatus::as_str))
            .query_opt("dateFrom", query.date_from.as_deref())
            .query_opt("dateTo", query.date_to.as_deref())
            .query_opt("userId", query.user_id.as_deref())
            .query("page", query.page)
            .query("limit", query.limit);

        Self::fetch(request, "assigned products").await
    }

    /// GET `/assessment-stats`
    pub async fn assessment_stats(&self, partner_id: &str) -> ApiResult<AssessmentStats> {
        let request = self.get("/assessment-stats").query("partnerId", partner_id);
        let stats: Option<AssessmentStats> = Self::fetch(request, "assessment stats").await?;
        Ok(stats.unwrap_or_default())
    }

    /// GET `/assessment-counts`
    pub async fn assessment_counts(&self, partner_id: &str) -> ApiResult<AssessmentCounts> {
        let request = self.get("/assessment-counts").query("partnerId", partner_id);
        let counts: Option<AssessmentCounts> = Self::fetch(request, "assessment counts").await?;
        Ok(counts.unwrap_or_default())
    }

    /// GET `/assessment-trends`
    pub async fn assessment_trends(
        &self,
        partner_id: &str,
        trend: TrendType,
    ) -> ApiResult<Vec<TrendPoint>> {
        let request = self
            .get("/assessment-trends")
            .query("partnerId", partner_id)
            .query("trendType", trend.as_str());
        let points: Option<Vec<TrendPoint>> = Self::fetch(request, "assessment trends").await?;
        Ok(points.unwrap_or_default())
    }

    /// GET `/user-stats`
    pub async fn user_stats(&self, partner_id: &str) -> ApiResult<UserStats> {
        let request = self.get("/user-stats").query("partnerId", partner_id);
        let stats: Option<UserStats> = Self::fetch(request, "user stats").await?;
        Ok(stats.unwrap_or_default())
    }

    /// GET `/recent-activity`
    pub async fn recent_activity(&self, partner_id: &str) -> ApiResult<Vec<ActivityEntry>> {
        let request = self.get("/recent-activity").query("partnerId", partner_id);
        let activity: Option<Vec<ActivityEntry>> = Self::fetch(request, "recent activity").await?;
        Ok(activity.unwrap_or_default())
    }

    /// GET `/consultation-report/{report_id}`, resolving a report id to its link.
    pub async fn consultation_report_link(
        &self,
        partner_id: &str,
        report_id: &str,
    ) -> ApiResult<String> {
        let request = self
            .get(&format!("/consultation-report/{report_id}"))
            .query("partnerId", partner_id);
        let link: ReportLink = Self::fetch(request, "consultation report").await?;
        Ok(link.report_link)
    }

    /// GET `/search-user`, returning the first match.
    pub async fn search_user(&self, phone: &str) -> ApiResult<Option<PartnerUser>> {
        let request = self.get("/search-user").query("search", phone);
        let users: Option<Vec<PartnerUser>> = Self::fetch(request, "user search").await?;
        Ok(users.and_then(|users| users.into_iter().next()))
    }

    /// GET `/available-products`
    pub async fn available_products(&self, partner_id: &str) -> ApiResult<Vec<Product>> {
        let request = self.get("/available-products").query("partnerId", partner_id);
        let products: Option<Vec<Product>> = Self::fetch(request, "available products").await?;
        Ok(products.unwrap_or_default())
    }

    /// POST `/create-user`
    pub async fn create_user(&self, user: &NewUser) -> ApiResult<PartnerUser> {
        let request = Self::with_json(self.post("/create-user"), user)?;
        Self::fetch(request, "created user").await
    }

    /// POST `/assign-product-to-user`
    pub async fn assign_product(
        &self,
        partner_id: &str,
        product_id: &str,
        user_id: &str,
    ) -> ApiResult<()> {
        let body = json!({
            "partnerId": partner_id,
            "productId": product_id,
            "userId": user_id,
        });
        let request = Self::with_json(self.post("/assign-product-to-user"), &body)?;
        Self::send(request).await.map(|_| ())
    }

    /// GET `/assessment/{user_product_id}/notes`
    pub async fn assessment_notes(
        &self,
        partner_id: &str,
        user_product_id: &str,
    ) -> ApiResult<Vec<Note>> {
        let request = self
            .get(&format!("/assessment/{user_product_id}/notes"))
            .query("partnerId", partner_id);
        let notes: Option<Vec<Note>> = Self::fetch(request, "assessment notes").await?;
        Ok(notes.unwrap_or_default())
    }

    /// GET `/user/{user_id}/assessment-notes`
    pub async fn user_assessment_notes(
        &self,
        partner_id: &str,
        user_id: &str,
    ) -> ApiResult<UserNotesResponse> {
        let request = self
            .get(&format!("/user/{user_id}/assessment-notes"))
            .query("partnerId", partner_id);
        let notes: Option<UserNotesResponse> = Self::fetch(request, "user notes").await?;
        Ok(notes.unwrap_or_default())
    }

    /// POST `/assessment-notes`
    pub async fn create_assessment_note(&self, note: &NewNote) -> ApiResult<()> {
        let request = Self::with_json(self.post("/assessment-notes"), note)?;
        Self::send(request).await.map(|_| ())
    }

    /// PUT `/assessment-notes/{note_id}`
    pub async fn update_assessment_note(
        &self,
        note_id: &str,
        partner_id: &str,
        content: &str,
        updated_by: &str,
    ) -> ApiResult<()> {
        let body = json!({
            "partnerId": partner_id,
            "content": content,
            "updatedBy": updated_by,
        });
        let request = Self::with_json(self.put(&format!("/assessment-notes/{note_id}")), &body)?;
        Self::send(request).await.map(|_| ())
    }

    /// DELETE `/assessment-notes/{note_id}`
    pub async fn delete_assessment_note(&self, note_id: &str, partner_id: &str) -> ApiResult<()> {
        let request = self
            .delete(&format!("/assessment-notes/{note_id}"))
            .query("partnerId", partner_id);
        Self::send(request).await.map(|_| ())
    }
}
