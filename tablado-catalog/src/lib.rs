//! Group catalog, fuzzy catalog matching, and title parsing.
//!
//! The catalog is the ground truth for group names. Titles are parsed by an
//! ordered cascade of recognizers, each of which consults the catalog through
//! [`matcher::find_best_match`].

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod title_parser;

pub use catalog::{Catalog, CatalogEntry};
pub use error::CatalogError;
pub use matcher::{CatalogMatch, DEFAULT_THRESHOLD, find_best_match};
pub use title_parser::{ParseOutcome, Recognition, Recognizer, TitleParser, is_excluded};
