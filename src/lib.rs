//! `mailindex` — bulk ingestion of email files into a ZincSearch index.
//!
//! This crate walks a directory tree of plain-text emails (Enron maildir
//! layout and friends), parses the headers it cares about and submits one
//! document per email through a pool of concurrent workers. A small HTTP
//! API exposes search and listing over the resulting index.

pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod parser;
pub mod search;
pub mod server;
pub mod sink;
