//! Tag generation pipeline: input normalization, prompt construction, the
//! model call, and validation of what the model sends back.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use tagsmith::llm::CompletionClientBuilder;
//! use tagsmith::tagger::TagGeneratorBuilder;
//! use tagsmith::RawInput;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CompletionClientBuilder::new().build()?;
//!
//! let generator = TagGeneratorBuilder::new(Arc::new(client))
//!     .model("openai/gpt-oss-20b")
//!     .build();
//!
//! let tags = generator
//!     .generate_tags(&RawInput::from("Quarterly revenue report for 2024"))
//!     .await?;
//!
//! for tag in &tags {
//!     println!("{}: {}", tag.name(), tag.value());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The stages are also usable on their own, which is how the tests exercise
//! them:
//!
//! ```
//! use tagsmith::tagger::{PromptTemplate, normalize_input, parse_tags};
//! use tagsmith::RawInput;
//!
//! let text = normalize_input(&RawInput::from(serde_json::json!({"title": "Notes"})));
//! let prompt = PromptTemplate::default().render(&text);
//! assert!(prompt.contains("\"title\": \"Notes\""));
//!
//! let tags = parse_tags(r#"[{"name": "Category", "value": " notes "}]"#, 20).unwrap();
//! assert_eq!(tags.as_slice()[0].value(), "notes");
//! ```

mod error;
mod generator;
mod input;
mod prompt;
mod validator;

pub use error::TaggingError;
pub use generator::{DEFAULT_MODEL, TagGenerator, TagGeneratorBuilder};
pub use input::normalize_input;
pub use prompt::{ELLIPSIS, MAX_INPUT_CHARS, PromptTemplate, SYSTEM_PROMPT};
pub use validator::{parse_tags, validate_tags};
