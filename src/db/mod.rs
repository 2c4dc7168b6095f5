// SPDX-License-Identifier: MIT

//! Database layer (SQLite via sqlx).

pub mod activities;

pub use activities::ActivityStore;
