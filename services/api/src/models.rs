//! API models for request and response payloads
//!
//! Response types serialize with camelCase keys; request types are the raw
//! wire shape and implement [`crate::validation::Validate`] to produce the
//! checked commands the handlers work with.

pub mod event;
pub mod matching;
pub mod rating;
pub mod recommend;
pub mod skill;
pub mod user;
