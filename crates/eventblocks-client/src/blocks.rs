//! Block insertion targets.
//!
//! Rendered events become blocks: one top-level block per event, placed
//! before the block that triggered the command, with optional child blocks
//! nested under it. [`BlockSink`] is the insertion seam; [`OutlineSink`]
//! writes a markdown outline and [`MemorySink`] keeps blocks in memory.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;

use thiserror::Error;
use tracing::trace;

/// Identifier of a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockId(String);

impl BlockId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors inserting a block.
#[derive(Debug, Error)]
pub enum InsertError {
    /// Writing the block failed.
    #[error("failed to write block: {0}")]
    Io(#[from] std::io::Error),

    /// The parent block does not exist in this sink.
    #[error("unknown parent block {0}")]
    UnknownParent(BlockId),
}

/// Receives blocks in document order.
pub trait BlockSink {
    /// Inserts a top-level block before `anchor` and returns its id.
    ///
    /// Successive calls with the same anchor keep their call order.
    fn insert_block(&mut self, anchor: &BlockId, content: &str) -> Result<BlockId, InsertError>;

    /// Appends a child block under `parent` and returns its id.
    fn insert_child(&mut self, parent: &BlockId, content: &str) -> Result<BlockId, InsertError>;
}

/// Writes blocks as a markdown outline.
///
/// ```text
/// - main line
///   property:: value
///   - child
/// ```
#[derive(Debug)]
pub struct OutlineSink<W: Write> {
    writer: W,
    inserted: HashSet<BlockId>,
}

impl<W: Write> OutlineSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            inserted: HashSet::new(),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_bullet(&mut self, indent: &str, content: &str) -> Result<BlockId, InsertError> {
        let continuation = format!("\n{indent}  ");
        writeln!(
            self.writer,
            "{indent}- {}",
            content.replace('\n', &continuation)
        )?;
        self.writer.flush()?;

        let id = BlockId::generate();
        self.inserted.insert(id.clone());
        Ok(id)
    }
}

impl<W: Write> BlockSink for OutlineSink<W> {
    fn insert_block(&mut self, anchor: &BlockId, content: &str) -> Result<BlockId, InsertError> {
        trace!(anchor = %anchor, "Writing block");
        self.write_bullet("", content)
    }

    fn insert_child(&mut self, parent: &BlockId, content: &str) -> Result<BlockId, InsertError> {
        if !self.inserted.contains(parent) {
            return Err(InsertError::UnknownParent(parent.clone()));
        }
        self.write_bullet("  ", content)
    }
}

/// A block held by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Id returned by the insert call.
    pub id: BlockId,
    /// Set on child blocks.
    pub parent: Option<BlockId>,
    /// Set on top-level blocks.
    pub anchor: Option<BlockId>,
    /// Block text as inserted.
    pub content: String,
}

/// Keeps inserted blocks in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemorySink {
    blocks: Vec<Block>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every block in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the content of the top-level blocks.
    pub fn top_level(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter(|b| b.parent.is_none())
            .map(|b| b.content.as_str())
            .collect()
    }

    /// Returns the content of the children of `parent`.
    pub fn children_of(&self, parent: &BlockId) -> Vec<&str> {
        self.blocks
            .iter()
            .filter(|b| b.parent.as_ref() == Some(parent))
            .map(|b| b.content.as_str())
            .collect()
    }
}

impl BlockSink for MemorySink {
    fn insert_block(&mut self, anchor: &BlockId, content: &str) -> Result<BlockId, InsertError> {
        let id = BlockId::generate();
        self.blocks.push(Block {
            id: id.clone(),
            parent: None,
            anchor: Some(anchor.clone()),
            content: content.to_string(),
        });
        Ok(id)
    }

    fn insert_child(&mut self, parent: &BlockId, content: &str) -> Result<BlockId, InsertError> {
        if !self.blocks.iter().any(|b| &b.id == parent) {
            return Err(InsertError::UnknownParent(parent.clone()));
        }

        let id = BlockId::generate();
        self.blocks.push(Block {
            id: id.clone(),
            parent: Some(parent.clone()),
            anchor: None,
            content: content.to_string(),
        });
        Ok(id)
    }
}
