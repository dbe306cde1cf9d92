//! Tokens - the input and output grammars of the transformer.
//!
//! Both grammars are SAX-style: structure is represented by begin/end
//! pairs, with no accumulation.
//!
//! Data tokens (input), for `{"key": [1, null]}`:
//! ```text
//! ObjectBegin(None)
//! Property("key")
//! ArrayBegin(None)
//! Primitive(1)
//! Primitive(null)
//! ArrayEnd
//! ObjectEnd
//! ```
//!
//! Markup tokens (output) for a named container:
//! ```text
//! ElementBegin("dl")
//! Attribute("title")
//! Primitive("Yada")       // name: Some(Yada)
//! ...
//! ElementEnd
//! ```

use crate::name::QName;
use crate::value::Value;

/// Input grammar token.
#[derive(Debug, Clone, PartialEq)]
pub enum DataToken {
    /// Array start. The name is present only for named arrays.
    ArrayBegin(Option<QName>),

    /// Array end
    ArrayEnd,

    /// Object start. The name is present only for named objects.
    ObjectBegin(Option<QName>),

    /// Object end
    ObjectEnd,

    /// Property key. The next token(s) are the value:
    /// - Scalar: one `Primitive`
    /// - Container: `ArrayBegin`/`ObjectBegin` ... matching end
    Property(QName),

    /// Primitive value
    Primitive(Value),
}

impl DataToken {
    /// Anonymous array start.
    pub fn array() -> Self {
        DataToken::ArrayBegin(None)
    }

    /// Named array start.
    pub fn named_array(name: impl Into<QName>) -> Self {
        DataToken::ArrayBegin(Some(name.into()))
    }

    /// Anonymous object start.
    pub fn object() -> Self {
        DataToken::ObjectBegin(None)
    }

    /// Named object start.
    pub fn named_object(name: impl Into<QName>) -> Self {
        DataToken::ObjectBegin(Some(name.into()))
    }

    pub fn property(name: impl Into<QName>) -> Self {
        DataToken::Property(name.into())
    }

    pub fn primitive(value: impl Into<Value>) -> Self {
        DataToken::Primitive(value.into())
    }

    /// Check if this opens a container (has a matching end).
    pub fn is_container_begin(&self) -> bool {
        matches!(self, DataToken::ArrayBegin(_) | DataToken::ObjectBegin(_))
    }

    /// Check if this closes a container.
    pub fn is_container_end(&self) -> bool {
        matches!(self, DataToken::ArrayEnd | DataToken::ObjectEnd)
    }

    /// Check if this starts a value (can follow `Property` or be an array item).
    pub fn is_value_start(&self) -> bool {
        matches!(
            self,
            DataToken::ArrayBegin(_) | DataToken::ObjectBegin(_) | DataToken::Primitive(_)
        )
    }

    /// The name carried by this token, if any.
    pub fn name(&self) -> Option<&QName> {
        match self {
            DataToken::ArrayBegin(name) | DataToken::ObjectBegin(name) => name.as_ref(),
            DataToken::Property(name) => Some(name),
            DataToken::ArrayEnd | DataToken::ObjectEnd | DataToken::Primitive(_) => None,
        }
    }
}

/// Output grammar token.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupToken {
    /// Element start: `<name`
    ElementBegin(QName),

    /// Element end: `</name>`
    ElementEnd,

    /// Attribute key. Always followed by exactly one `Primitive`
    /// carrying the attribute value.
    Attribute(QName),

    /// Text content or attribute value.
    ///
    /// `name` is set when the value was rendered from a qualified name
    /// (container title, property label). `value` then holds the local
    /// name as a string; prefix and namespace ride on `name`.
    Primitive { value: Value, name: Option<QName> },
}

impl MarkupToken {
    /// Unqualified element start.
    pub fn element(local_name: &str) -> Self {
        MarkupToken::ElementBegin(QName::new(local_name))
    }

    /// Unqualified attribute key.
    pub fn attribute(local_name: &str) -> Self {
        MarkupToken::Attribute(QName::new(local_name))
    }

    /// Pass-through primitive.
    pub fn primitive(value: impl Into<Value>) -> Self {
        MarkupToken::Primitive {
            value: value.into(),
            name: None,
        }
    }

    /// Primitive rendered from a qualified name.
    pub fn name_primitive(name: QName) -> Self {
        MarkupToken::Primitive {
            value: Value::String(name.local_name().to_owned()),
            name: Some(name),
        }
    }

    pub fn is_element_begin(&self) -> bool {
        matches!(self, MarkupToken::ElementBegin(_))
    }

    pub fn is_element_end(&self) -> bool {
        matches!(self, MarkupToken::ElementEnd)
    }
}
