#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
pub mod app;
pub mod asset;
pub mod bullets;
pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod graph;
pub mod journal;
pub mod model;
pub mod namespace;
pub mod patterns;
pub mod pipeline;
pub mod report;
