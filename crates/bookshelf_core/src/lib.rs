//! `bookshelf_core`
//!
//! Core library for the platform-independent logic of Bookshelf. This library aims to provide a
//! crate that can be used by any front end (desktop, mobile, web) to keep a personal reading log
//! without implementing the same logic twice.

pub mod database;

pub mod report;
