//! foobc-util - Shared compiler infrastructure.
//!
//! This crate provides the pieces every pipeline phase needs: source
//! location tracking ([`Span`]) and diagnostic reporting ([`Handler`],
//! [`Diagnostic`], [`Level`]).

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::Span;
