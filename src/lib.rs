//! Anime catalog client with backend-availability fallback.
//!
//! [`api::AnimeClient`] talks to the streaming backend and, when it cannot be
//! reached, answers from [`mock::MockProvider`]. [`hooks`] wraps each client
//! call in a stateful fetch container for views.

pub mod api;
pub mod config;
pub mod error;
pub mod hooks;
pub mod mock;
