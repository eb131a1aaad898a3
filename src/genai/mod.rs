//! Generative model access.
//!
//! The pipeline talks to the generation service only through two traits:
//!
//! | Trait | Used by | Production implementation |
//! |---|---|---|
//! | [`TextModel`] | idea, plan, article | [`GeminiClient`] → `models/{model}:generateContent` |
//! | [`ImageModel`] | image producer | [`GeminiClient`] → `models/{model}:predict` |
//!
//! Keeping the seam this narrow lets every stage be tested with in-memory
//! mocks and keeps HTTP details out of the pipeline.

pub mod backend;
pub mod gemini;
pub mod reply;

pub use backend::{GenAiError, ImageModel, TextModel};
pub use gemini::GeminiClient;
pub use reply::{parse_json_reply, strip_code_fences};
