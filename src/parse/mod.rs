pub mod blame;
pub mod conflict;
pub mod diff;
pub mod info;
pub mod list;
pub mod lock;
pub mod log;
pub mod models;
pub mod status;
pub mod version;
