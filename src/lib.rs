//! Skriv - AI Video Content Production
//!
//! A CLI production studio that turns source material into a complete
//! YouTube video package.
//!
//! The name "Skriv" comes from the Norwegian/Scandinavian word for "write."
//!
//! # Overview
//!
//! Skriv drives an external generative provider through a six-stage
//! pipeline:
//!
//! 1. Generate title candidates with trend scores and select one
//! 2. Generate a sectioned video script
//! 3. Generate SEO metadata (description, hashtags, tags)
//! 4. Generate per-section image prompts
//! 5. Generate a thumbnail image
//! 6. Synthesize narration audio
//!
//! The committed outputs are packaged into a ZIP archive with fixed entry
//! names and a slugified filename.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings, stage option enumerations, prompt templates
//! - `gemini` - Provider HTTP client and API key handling
//! - `provider` - Generation gateway (one operation per content kind)
//! - `session` - Production session state and stage entities
//! - `pipeline` - Stage state machine with preconditions and request fencing
//! - `audio` - PCM buffers and WAV encoding
//! - `packager` - Archive assembly
//!
//! # Example
//!
//! ```rust,no_run
//! use skriv::config::{ProductionDefaults, Settings};
//! use skriv::pipeline::Pipeline;
//! use skriv::provider::FakeGenerator;
//! use skriv::session::ProductionSession;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let defaults = ProductionDefaults::default();
//!     let mut session = ProductionSession::new(&defaults);
//!     session.source.input = "A short history of the silk road".to_string();
//!
//!     let mut pipeline = Pipeline::new(Arc::new(FakeGenerator::new()), session);
//!     pipeline.generate_titles().await?;
//!     pipeline.select_title(0)?;
//!     pipeline.generate_script().await?;
//!
//!     let package = skriv::packager::package(pipeline.session())?;
//!     println!("{} ({} bytes)", package.filename, package.bytes.len());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod packager;
pub mod pipeline;
pub mod provider;
pub mod session;

pub use error::{Result, SkrivError};
