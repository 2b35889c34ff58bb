//! AI Contract Analyzer API Library
//!
//! This library provides the core functionality for the contract analyzer
//! service: document text extraction, prompt construction, the Gemini model
//! client, the response extraction-and-repair pipeline, and HTTP handlers.
//!
//! # Modules
//!
//! - `analysis`: The `ContractAnalysis` data model and defaulting pass.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `extractor`: PDF/DOCX text extraction.
//! - `gemini_client`: Gemini API client.
//! - `handlers`: HTTP request handlers.
//! - `presenter`: Grouped dashboard view of an analysis.
//! - `prompt`: Analysis prompt construction.
//! - `response_parser`: Extraction and repair of model output.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod gemini_client;
pub mod handlers;
pub mod presenter;
pub mod prompt;
pub mod response_parser;
