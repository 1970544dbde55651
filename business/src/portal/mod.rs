//! Partner portal backend: wire types and the REST client.

mod api;
mod stats;
mod types;

pub use api::{ApiError, ApiResult, AssignedProductsQuery, PartnerPortalApi};
pub use stats::{
    ActivityEntry, AssessmentCounts, AssessmentStats, DistributionEntry, ReportLink, TrendPoint,
    TrendType, UserStats, distribution, trend_scale,
};
pub use types::{
    AssessmentStatus, AssessmentWithNotes, AssignedProduct, AssignedProductsPage, NewNote,
    NewUser, Note, Partner, PartnerUser, Product, ProductTotals, ServerPagination,
    UserNotesResponse, UsersPage, measure_label,
};
