//! ### 指令集合

pub mod branch;
pub mod conflicts;
pub mod history;
pub mod utils;
pub mod working_copy;
