//! Wire types of the partner portal API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::table::{CellValue, PaginationState, TableRow};

fn timestamp_cell(value: Option<&DateTime<Utc>>) -> Option<CellValue> {
    value.map(|at| CellValue::Text(at.to_rfc3339()))
}

/// Organisation the signed-in account acts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Greeting shown on the dashboard banner.
    #[serde(default, rename = "customMessage", skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotals {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub assigned: u32,
    #[serde(default)]
    pub started: u32,
    #[serde(default)]
    pub completed: u32,
}

/// Backend records carry `_id`, some endpoints also (or only) send `id`.
#[derive(Debug, Default, Deserialize)]
struct RecordId {
    #[serde(rename = "_id")]
    primary: Option<String>,
    id: Option<String>,
}

impl RecordId {
    fn resolve(self, what: &str) -> Result<String, String> {
        self.primary
            .or(self.id)
            .ok_or_else(|| format!("{what} has neither `_id` nor `id`"))
    }
}

/// A user registered under a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PartnerUserWire")]
pub struct PartnerUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_products: ProductTotals,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartnerUserWire {
    #[serde(flatten)]
    id: RecordId,
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    total_products: ProductTotals,
}

impl TryFrom<PartnerUserWire> for PartnerUser {
    type Error = String;

    fn try_from(wire: PartnerUserWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id.resolve("user")?,
            name: wire.name,
            phone: wire.phone,
            email: wire.email,
            created_on: wire.created_on,
            last_activity: wire.last_activity,
            total_products: wire.total_products,
        })
    }
}

impl PartnerUser {
    /// Share of assigned products completed, rounded to a whole percent.
    pub fn completion_percentage(&self) -> u32 {
        let ProductTotals {
            total, completed, ..
        } = self.total_products;
        if total == 0 {
            return 0;
        }
        (f64::from(completed) / f64::from(total) * 100.0).round() as u32
    }

    /// First letter of each word of the name, for the avatar bubble.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

impl TableRow for PartnerUser {
    fn cell(&self, field: &str) -> Option<CellValue> {
        match field {
            "name" => Some(self.name.as_str().into()),
            "phone" => Some(self.phone.as_str().into()),
            "email" => self.email.as_deref().map(CellValue::from),
            "totalProducts.total" => Some(self.total_products.total.into()),
            "completionPercentage" => Some(self.completion_percentage().into()),
            "createdOn" => timestamp_cell(self.created_on.as_ref()),
            "lastActivity" => timestamp_cell(self.last_activity.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentStatus {
    #[serde(rename = "ASSIGNED")]
    Assigned,
    #[serde(rename = "IN-PROCESS")]
    InProcess,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl AssessmentStatus {
    pub const ALL: [Self; 3] = [Self::Assigned, Self::InProcess, Self::Completed];

    /// Value used on the wire and in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "ASSIGNED",
            Self::InProcess => "IN-PROCESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assessment assigned to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AssignedProductWire")]
pub struct AssignedProduct {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub assessment_name: Option<String>,
    pub assessment_type: Option<String>,
    pub status: AssessmentStatus,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub user_product_id: Option<String>,
    /// Id of the consultation report, resolved to a link on demand.
    pub consultation_report: Option<String>,
    pub score: Option<f64>,
    /// Per-measure results, keyed by camelCase measure name.
    pub values: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignedProductWire {
    #[serde(flatten)]
    id: RecordId,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    assessment_name: Option<String>,
    #[serde(default)]
    assessment_type: Option<String>,
    status: AssessmentStatus,
    #[serde(default)]
    created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_on: Option<DateTime<Utc>>,
    #[serde(default)]
    updated: Option<DateTime<Utc>>,
    #[serde(default)]
    user_product_id: Option<String>,
    #[serde(default)]
    consultation_report: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    values: Option<BTreeMap<String, f64>>,
}

impl TryFrom<AssignedProductWire> for AssignedProduct {
    type Error = String;

    fn try_from(wire: AssignedProductWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id.resolve("assessment")?,
            user_id: wire.user_id,
            user_name: wire.user_name,
            assessment_name: wire.assessment_name,
            assessment_type: wire.assessment_type,
            status: wire.status,
            created: wire.created_on.or(wire.created),
            updated: wire.updated_on.or(wire.updated),
            user_product_id: wire.user_product_id,
            consultation_report: wire.consultation_report,
            score: wire.score,
            values: wire.values.unwrap_or_default(),
        })
    }
}

impl AssignedProduct {
    pub fn display_user(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }

    pub fn display_assessment(&self) -> &str {
        self.assessment_type
            .as_deref()
            .or(self.assessment_name.as_deref())
            .unwrap_or_default()
    }

    /// Case-insensitive substring match on the user's name.
    pub fn matches_user_name(&self, needle: &str) -> bool {
        let needle = needle.trim();
        needle.is_empty()
            || self
                .user_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase()))
    }

    /// Id notes for this assignment are filed under.
    pub fn notes_key(&self) -> &str {
        self.user_product_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == AssessmentStatus::Completed
    }

    /// Report id, only for completed assessments.
    pub fn report_id(&self) -> Option<&str> {
        self.consultation_report
            .as_deref()
            .filter(|id| self.is_completed() && !id.trim().is_empty())
    }

    /// Measures in display form, e.g. `shortTermMemory` as "Short Term Memory".
    pub fn value_rows(&self) -> Vec<(String, f64)> {
        self.values
            .iter()
            .map(|(key, value)| (measure_label(key), *value))
            .collect()
    }
}

/// Splits a camelCase key into capitalised words.
pub fn measure_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}

impl TableRow for AssignedProduct {
    fn cell(&self, field: &str) -> Option<CellValue> {
        match field {
            "userId" => Some(self.display_user().into()),
            "assessmentName" => Some(self.display_assessment().into()),
            "status" => Some(self.status.as_str().into()),
            "created" => timestamp_cell(self.created.as_ref()),
            "updated" => timestamp_cell(self.updated.as_ref()),
            _ => None,
        }
    }
}

/// An assessment the partner can hand out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductWire")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct ProductWire {
    #[serde(flatten)]
    id: RecordId,
    name: String,
}

impl TryFrom<ProductWire> for Product {
    type Error = String;

    fn try_from(wire: ProductWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id.resolve("product")?,
            name: wire.name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NoteWire")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteWire {
    #[serde(flatten)]
    id: RecordId,
    content: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated: Option<DateTime<Utc>>,
}

impl TryFrom<NoteWire> for Note {
    type Error = String;

    fn try_from(wire: NoteWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id.resolve("note")?,
            content: wire.content,
            created_at: wire.created_at.or(wire.created),
            updated_at: wire.updated_at.or(wire.updated),
        })
    }
}

impl Note {
    /// Edited after creation.
    pub fn was_updated(&self) -> bool {
        matches!((self.created_at, self.updated_at), (Some(created), Some(updated)) if updated != created)
    }
}

/// An assignment together with the notes written on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AssessmentWithNotesWire")]
pub struct AssessmentWithNotes {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_product_id: Option<String>,
    pub product_name: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub notes: Vec<Note>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentWithNotesWire {
    #[serde(flatten)]
    id: RecordId,
    #[serde(default)]
    user_product_id: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    notes: Vec<Note>,
}

impl TryFrom<AssessmentWithNotesWire> for AssessmentWithNotes {
    type Error = String;

    fn try_from(wire: AssessmentWithNotesWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id.resolve("assessment")?,
            user_product_id: wire.user_product_id,
            product_name: wire.product_name,
            created: wire.created.or(wire.created_at),
            notes: wire.notes,
        })
    }
}

/// Every note about one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotesResponse {
    #[serde(default)]
    pub assessments: Vec<AssessmentWithNotes>,
    #[serde(default)]
    pub general_notes: Vec<Note>,
}

/// Page metadata as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPagination {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
    #[serde(default, alias = "totalUsers")]
    pub total: usize,
    #[serde(default)]
    pub limit: usize,
}

fn first_page() -> u32 {
    1
}

impl ServerPagination {
    /// Table pagination state; `fallback_limit` stands in for a missing limit.
    pub fn to_state(self, fallback_limit: usize) -> PaginationState {
        let page_size = if self.limit == 0 {
            fallback_limit
        } else {
            self.limit
        };
        PaginationState {
            current_page: self.page,
            total_pages: self.pages,
            total_items: self.total,
            page_size,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UsersPage {
    #[serde(default)]
    pub users: Vec<PartnerUser>,
    pub pagination: Option<ServerPagination>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedProductsPage {
    #[serde(default)]
    pub assessments: Vec<AssignedProduct>,
    pub pagination: Option<ServerPagination>,
}

/// Fields for registering someone who has no account yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub partner_id: String,
}

/// A note to file on a user, or on one of their assessments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub partner_id: String,
    pub user_id: String,
    /// `None` files the note on the user rather than an assessment.
    pub user_product_id: Option<String>,
    pub content: String,
    pub created_by: String,
}
