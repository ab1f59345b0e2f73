//! `focuslock-store`: persistence for assignments and milestones.
//!
//! Two backends implement [`PlannerStore`]:
//!
//! | Backend           | Used when                                   |
//! |-------------------|---------------------------------------------|
//! | [`SupabaseStore`] | `supabase.url` / `supabase.key` configured  |
//! | [`SqliteStore`]   | otherwise (local file, or in-memory tests)  |

pub mod db;
pub mod error;
pub mod sqlite;
pub mod store;
pub mod supabase;

pub use error::StoreError;
pub use sqlite::SqliteStore;
pub use store::PlannerStore;
pub use supabase::SupabaseStore;
