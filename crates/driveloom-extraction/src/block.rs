//! The structured document produced by extraction (`spec.md` §4.B).

use driveloom_core::types::Location;

/// One unit of extracted text tied to a structural position in its source
/// file. The chunker (`driveloom-chunking`) consumes a sequence of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub text: String,
    pub location: Location,
}

impl Block {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self { text: text.into(), location }
    }
}

/// An ordered sequence of blocks extracted from one file.
pub type Document = Vec<Block>;
