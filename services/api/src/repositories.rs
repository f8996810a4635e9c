//! Repositories for database operations
//!
//! Each repository owns a clone of the shared pool. Methods return
//! `anyhow::Result`; outcomes the handlers must tell apart (missing rows,
//! uniqueness conflicts) come back as `Option`, `bool` or a dedicated enum
//! rather than as errors.

pub mod event;
pub mod matching;
pub mod rating;
pub mod skill;
pub mod user;

pub use event::EventRepository;
pub use matching::MatchRepository;
pub use rating::RatingRepository;
pub use skill::SkillRepository;
pub use user::UserRepository;
