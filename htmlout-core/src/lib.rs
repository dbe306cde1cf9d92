//! HTML Out-Transformer Core
//!
//! Converts a stream of data-model tokens (arrays, objects, properties,
//! primitives) into a stream of HTML markup tokens: ordered lists for
//! arrays, definition lists for objects. Performs no text I/O; parsing
//! the source and writing HTML text belong to the caller.
//!
//! # Architecture
//!
//! - **name.rs** - Qualified names (local name, prefix, namespace URI)
//! - **value.rs** - Opaque primitive values
//! - **token.rs** - DataToken (input) and MarkupToken (output) grammars
//! - **transform.rs** - Frame-stack state machine and pull iterator
//! - **streaming.rs** - Ring buffer and push-mode transformer
//! - **error.rs** - TransformError and malformed-input codes
//!
//! # Example
//!
//! ```
//! use htmlout_core::{DataToken, HtmlOutTransformer, MarkupToken};
//!
//! let input = vec![DataToken::array(), DataToken::primitive("a"), DataToken::ArrayEnd];
//! let output = HtmlOutTransformer::new().transform_to_vec(input).unwrap();
//!
//! assert_eq!(output[0], MarkupToken::element("div"));
//! assert_eq!(output[2], MarkupToken::element("li"));
//! ```

pub mod error;
pub mod name;
pub mod streaming;
pub mod token;
pub mod transform;
pub mod value;

pub use error::{MalformedKind, TransformError};
pub use name::QName;
pub use streaming::{FeedResult, StreamingTransformer, TokenRing};
pub use token::{DataToken, MarkupToken};
pub use transform::{HtmlOutTransformer, Transform, MAX_TOKENS_PER_STEP};
pub use value::Value;
