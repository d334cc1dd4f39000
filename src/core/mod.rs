pub mod app;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod path;
pub mod process_tree;
pub mod result;
pub mod svn;
pub mod utils;
pub mod xml;
