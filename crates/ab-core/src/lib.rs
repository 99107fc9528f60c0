//! anon-board/crates/ab-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the anonymous board.

pub mod error;
pub mod models;
pub mod outcome;
pub mod service;
pub mod traits;
pub mod views;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use outcome::*;
pub use service::BoardService;
pub use traits::*;
pub use views::*;
