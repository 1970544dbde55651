//! Headless core of the partner portal: the paginated table model, portal
//! domain types, the REST client and the small controllers pages share.

pub mod config;
pub mod debounce;
pub mod http;
pub mod lookup;
pub mod modal;
pub mod notes;
pub mod portal;
pub mod session;
pub mod table;

pub use config::{BusinessConfig, RawConfig};
pub use portal::{ApiError, PartnerPortalApi};
pub use session::AuthSession;
