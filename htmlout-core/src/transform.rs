//! Structural transformer: data tokens in, HTML markup tokens out.
//!
//! Arrays become ordered lists, objects become definition lists:
//!
//! ```text
//! [1, {"key": "value"}]
//!
//! <div>
//!   <ol>
//!     <li>1</li>
//!     <li><dl><dt>key</dt><dd>value</dd></dl></li>
//!   </ol>
//! </div>
//! ```
//!
//! # Architecture
//!
//! ```text
//! DataToken iterator      Machine              TokenRing        Consumer
//!        │                   │                     │                │
//!        │◀──next()──────────│                     │◀──next()───────│
//!        │──token───────────▶│──emit(0..=4)───────▶│                │
//!        │                   │                     │──token────────▶│
//! ```
//!
//! The machine keeps an explicit frame stack, one frame per open
//! container, so nesting depth is bounded by memory rather than by the
//! call stack. Each input token is validated against the top frame before
//! anything is emitted for it.

use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::error::{MalformedKind, TransformError};
use crate::name::QName;
use crate::streaming::TokenRing;
use crate::token::{DataToken, MarkupToken};

const WRAPPER: &str = "div";
const ARRAY: &str = "ol";
const ARRAY_ITEM: &str = "li";
const OBJECT: &str = "dl";
const PROPERTY_TERM: &str = "dt";
const PROPERTY_VALUE: &str = "dd";
const TITLE: &str = "title";

/// Upper bound on markup tokens emitted for a single data token.
///
/// Reached by a named container begin: `li`/`div`, `ol`/`dl`, `title`,
/// the title value. A property also emits four: `dt`, label, end, `dd`.
pub const MAX_TOKENS_PER_STEP: usize = 4;

/// One open container and the closing work it still owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Inside `<ol>`. Each item opens its own `<li>`, closed when the
    /// item completes.
    Array,
    /// Inside `<dl>`. `awaiting_value` is set between a property and the
    /// completion of its value, while the `<dd>` is open.
    Object { awaiting_value: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing emitted yet.
    Idle,
    /// Wrapper `div` emitted.
    Open,
    /// Input exhausted, wrapper closed (if it was opened).
    Done,
    /// Malformed input seen. Sticky.
    Failed(TransformError),
}

/// The state machine shared by the pull iterator and the push transformer.
#[derive(Debug)]
pub(crate) struct Machine {
    stack: Vec<Frame>,
    state: State,
    /// Number of data tokens consumed.
    index: usize,
    max_depth: usize,
}

impl Machine {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::new(),
            state: State::Idle,
            index: 0,
            max_depth: 0,
        }
    }

    /// Current nesting depth.
    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True once `finish` succeeded or an error was reported.
    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self.state, State::Done | State::Failed(_))
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// The error that stopped the machine, if any.
    #[inline]
    pub(crate) fn error(&self) -> Option<TransformError> {
        match self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Process one data token.
    ///
    /// `out` must have room for `MAX_TOKENS_PER_STEP` tokens. Nothing is
    /// emitted for a token that fails validation.
    pub(crate) fn step(&mut self, token: DataToken, out: &mut TokenRing) -> Result<(), TransformError> {
        if let State::Failed(err) = self.state {
            return Err(err);
        }
        debug_assert!(self.state != State::Done, "step after finish");
        debug_assert!(out.space() >= MAX_TOKENS_PER_STEP);

        let index = self.index;
        if let Err(kind) = self.validate(&token) {
            return Err(self.fail(index, kind));
        }
        self.index += 1;

        if self.state == State::Idle {
            out.push(MarkupToken::element(WRAPPER));
            self.state = State::Open;
        }

        match token {
            DataToken::ArrayBegin(name) => {
                self.open_item(out);
                out.push(MarkupToken::element(ARRAY));
                push_title(name, out);
                self.push_frame(Frame::Array);
            }
            DataToken::ObjectBegin(name) => {
                self.open_item(out);
                out.push(MarkupToken::element(OBJECT));
                push_title(name, out);
                self.push_frame(Frame::Object { awaiting_value: false });
            }
            DataToken::ArrayEnd | DataToken::ObjectEnd => {
                self.pop_frame();
                out.push(MarkupToken::ElementEnd);
                self.close_item(out);
            }
            DataToken::Property(name) => {
                if let Some(Frame::Object { awaiting_value }) = self.stack.last_mut() {
                    *awaiting_value = true;
                }
                out.push(MarkupToken::element(PROPERTY_TERM));
                out.push(MarkupToken::name_primitive(name));
                out.push(MarkupToken::ElementEnd);
                out.push(MarkupToken::element(PROPERTY_VALUE));
            }
            DataToken::Primitive(value) => {
                self.open_item(out);
                out.push(MarkupToken::primitive(value));
                self.close_item(out);
            }
        }
        Ok(())
    }

    /// Signal end of input. Closes the wrapper if one was opened.
    ///
    /// `out` must have room for one token.
    pub(crate) fn finish(&mut self, out: &mut TokenRing) -> Result<(), TransformError> {
        match self.state {
            State::Failed(err) => return Err(err),
            State::Done => return Ok(()),
            State::Idle | State::Open => {}
        }
        if !self.stack.is_empty() {
            return Err(self.fail(self.index, MalformedKind::UnclosedContainer));
        }
        if self.state == State::Open {
            out.push(MarkupToken::ElementEnd);
        }
        self.state = State::Done;
        debug!(tokens = self.index, max_depth = self.max_depth, "transform finished");
        Ok(())
    }

    /// Check the token against the innermost open container.
    fn validate(&self, token: &DataToken) -> Result<(), MalformedKind> {
        let top = self.stack.last().copied();
        match token {
            DataToken::ArrayBegin(_) | DataToken::ObjectBegin(_) | DataToken::Primitive(_) => match top {
                Some(Frame::Object { awaiting_value: false }) => Err(MalformedKind::ValueWithoutProperty),
                _ => Ok(()),
            },
            DataToken::ArrayEnd => match top {
                Some(Frame::Array) => Ok(()),
                _ => Err(MalformedKind::UnmatchedArrayEnd),
            },
            DataToken::ObjectEnd => match top {
                Some(Frame::Object { awaiting_value: false }) => Ok(()),
                Some(Frame::Object { awaiting_value: true }) => Err(MalformedKind::MissingPropertyValue),
                _ => Err(MalformedKind::UnmatchedObjectEnd),
            },
            DataToken::Property(_) => match top {
                Some(Frame::Object { awaiting_value: false }) => Ok(()),
                Some(Frame::Object { awaiting_value: true }) => Err(MalformedKind::MissingPropertyValue),
                _ => Err(MalformedKind::PropertyOutsideObject),
            },
        }
    }

    /// A value is starting: give it an `<li>` if it is an array item.
    fn open_item(&mut self, out: &mut TokenRing) {
        if let Some(Frame::Array) = self.stack.last() {
            out.push(MarkupToken::element(ARRAY_ITEM));
        }
    }

    /// A value completed: close the `<li>` or `<dd>` around it.
    fn close_item(&mut self, out: &mut TokenRing) {
        match self.stack.last_mut() {
            Some(Frame::Array) => out.push(MarkupToken::ElementEnd),
            Some(Frame::Object { awaiting_value }) => {
                *awaiting_value = false;
                out.push(MarkupToken::ElementEnd);
            }
            None => {}
        }
    }

    fn push_frame(&mut self, frame: Frame) {
        self.stack.push(frame);
        self.max_depth = self.max_depth.max(self.stack.len());
        trace!(depth = self.stack.len(), ?frame, "push frame");
    }

    fn pop_frame(&mut self) {
        let frame = self.stack.pop();
        trace!(depth = self.stack.len(), ?frame, "pop frame");
    }

    fn fail(&mut self, index: usize, kind: MalformedKind) -> TransformError {
        let err = TransformError::MalformedInput { index, kind };
        debug!(index, code = kind as u8, "malformed input: {}", kind);
        self.state = State::Failed(err);
        err
    }
}

/// Optional container name becomes a `title` attribute.
fn push_title(name: Option<QName>, out: &mut TokenRing) {
    if let Some(name) = name {
        out.push(MarkupToken::attribute(TITLE));
        out.push(MarkupToken::name_primitive(name));
    }
}

/// Converts data tokens to HTML markup tokens.
///
/// Stateless: every call gets its own lazy sequence with a private frame
/// stack, so one transformer can serve any number of concurrent calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOutTransformer;

impl HtmlOutTransformer {
    pub fn new() -> Self {
        HtmlOutTransformer
    }

    /// Lazily transform `input`.
    ///
    /// The returned iterator pulls from `input` only as far as needed for
    /// the next markup token. Malformed input yields one `Err` as the last
    /// item.
    pub fn transform<I>(&self, input: I) -> Transform<I::IntoIter>
    where
        I: IntoIterator<Item = DataToken>,
    {
        Transform {
            input: input.into_iter(),
            machine: Machine::new(),
            pending: TokenRing::new(MAX_TOKENS_PER_STEP),
        }
    }

    /// Like [`transform`](Self::transform), for callers whose input may be
    /// absent. `None` fails here, before any output is produced.
    pub fn try_transform<I>(&self, input: Option<I>) -> Result<Transform<I::IntoIter>, TransformError>
    where
        I: IntoIterator<Item = DataToken>,
    {
        match input {
            Some(input) => Ok(self.transform(input)),
            None => Err(TransformError::InvalidArgument { param: "input" }),
        }
    }

    /// Transform `input` and collect the whole output.
    pub fn transform_to_vec<I>(&self, input: I) -> Result<Vec<MarkupToken>, TransformError>
    where
        I: IntoIterator<Item = DataToken>,
    {
        self.transform(input).collect()
    }
}

/// Lazy, single-pass markup token sequence returned by
/// [`HtmlOutTransformer::transform`].
#[derive(Debug)]
pub struct Transform<I> {
    input: I,
    machine: Machine,
    /// Tokens emitted for the current data token, not yet handed out.
    pending: TokenRing,
}

impl<I> Transform<I> {
    /// Current container nesting depth.
    pub fn depth(&self) -> usize {
        self.machine.depth()
    }
}

impl<I> Iterator for Transform<I>
where
    I: Iterator<Item = DataToken>,
{
    type Item = Result<MarkupToken, TransformError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop() {
                return Some(Ok(token));
            }
            if self.machine.is_terminal() {
                return None;
            }
            // pending is empty here, so it has room for a full step
            let result = match self.input.next() {
                Some(token) => self.machine.step(token, &mut self.pending),
                None => self.machine.finish(&mut self.pending),
            };
            if let Err(err) = result {
                return Some(Err(err));
            }
        }
    }
}

impl<I> FusedIterator for Transform<I> where I: Iterator<Item = DataToken> {}
