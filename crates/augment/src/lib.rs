pub mod backend;
pub mod error;
pub mod overlay;
pub mod parser;

pub use backend::{
    generated_text, CompletionBackend, HttpCompletionClient, MockCompletion, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
pub use error::AugmentError;
pub use overlay::{
    apply_overlay, build_prompt, parse_completion, Augmenter, CompletionFields, PromptLabels,
    DEFAULT_TIMEOUT,
};
pub use parser::AugmentedParser;
