//! Reusable widgets shared by the portal pages.

pub mod cards;
pub mod cells;
pub mod table;

pub use table::paginated_table;
