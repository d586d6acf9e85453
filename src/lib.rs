pub mod config;
pub mod dates;
pub mod error;
pub mod ordering;
pub mod page;
pub mod pipeline;
pub mod scan;
pub mod state;
pub mod visibility;
pub mod web;
pub mod zone;
pub mod tasks {
    pub mod refresh;
}
