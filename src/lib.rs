//! # Hugo Postgen
//!
//! Batch blog post generator. Give it a CSV of titles and it produces one
//! Hugo page bundle per title: front matter, an article in markdown, and the
//! images the article refers to.
//!
//! # Architecture: Five-Stage Pipeline
//!
//! Every title flows strictly forward through five stages. No stage reads
//! back from a later one:
//!
//! ```text
//! 1. Idea      title        →  ArticleIdea     (topic, keywords, angle, image style)
//! 2. Plan      ArticleIdea  →  Plan            (outline + ordered image specs)
//! 3. Article   Plan         →  markdown        (literal placement markers)
//! 4. Images    Plan         →  ImageFileMap    (one JPEG per spec, placeholder on failure)
//! 5. Bundle    all of above →  <slug>-<ts>/    (index.md + images)
//! ```
//!
//! Stages 1–4 call a generation service through the [`genai::TextModel`] and
//! [`genai::ImageModel`] traits; stage 5 is pure filesystem work.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading: stock defaults, merge, validation, documented template |
//! | [`types`] | Data passed between stages (`ArticleIdea`, `Plan`, `ImageFileMap`) |
//! | [`naming`] | Slugs, bundle directory names, image file names |
//! | [`prompts`] | Prompt templates for the three text stages |
//! | [`genai`] | Model traits, error taxonomy, Gemini/Imagen REST client |
//! | [`idea`] | Stage 1 — title → article idea |
//! | [`plan`] | Stage 2 — idea → outline and image plan, validated |
//! | [`article`] | Stage 3 — plan → markdown, marker presence enforced |
//! | [`imaging`] | JPEG normalization and placeholder rendering |
//! | [`images`] | Stage 4 — image generation with quota backoff and fallback |
//! | [`bundle`] | Stage 5 — page bundle assembly and marker substitution |
//! | [`pipeline`] | Per-title driver, stage delays, run summary |
//! | [`titles`] | CSV title list loading |
//! | [`pacing`] | Blocking waits behind a trait |
//! | [`spinner`] | Console spinner guard |
//! | [`output`] | Console formatting for the run header, progress and summary |
//!
//! # Design Decisions
//!
//! ## Failures Are Per Title
//!
//! A failing stage ends its title, never the run. The run summary records the
//! last stage each failed title reached. Images are the exception: a failed
//! image becomes a placeholder so the title still gets a complete bundle.
//!
//! ## Quota Errors Are the Only Retry
//!
//! The image service throttles aggressively. Quota exhaustion is retried with
//! exponential backoff; anything else (a safety refusal, a bad request) would
//! fail the same way again, so it falls back to a placeholder immediately.
//! Text stages are never retried.
//!
//! ## Markers Are Checked, Not Trusted
//!
//! The article model is asked to place every image marker verbatim. That is
//! verified after generation and the article is regenerated if any marker is
//! missing, so a bundle never ships with an image that nothing references.

pub mod article;
pub mod bundle;
pub mod config;
pub mod genai;
pub mod idea;
pub mod images;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pacing;
pub mod pipeline;
pub mod plan;
pub mod prompts;
pub mod spinner;
pub mod titles;
pub mod types;
