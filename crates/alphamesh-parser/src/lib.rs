//! Reader for the line-oriented vector output of the tracing step.
//!
//! See [`postscript`] for the accepted command set.

pub mod command;
pub mod postscript;

pub use command::{Command, PageBox};
pub use postscript::{Trace, parse, parse_document};
