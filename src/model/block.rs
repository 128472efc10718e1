use crate::types::BlockId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An atomic run of plain text. Annotations and links are not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub plain_text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
        }
    }
}

/// Concatenates runs in order.
pub fn concat_runs(runs: &[TextRun]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}

/// The kind of a block, as reported by the `type` field.
///
/// The remote vocabulary is open-ended; anything without dedicated rendering
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Paragraph,
    /// Declared heading level, unclamped.
    Heading(u8),
    BulletedListItem,
    NumberedListItem,
    Code,
    Other(String),
}

impl BlockKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "paragraph" => Self::Paragraph,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "code" => Self::Code,
            other => other
                .strip_prefix("heading_")
                .and_then(|level| level.parse::<u8>().ok())
                .map(Self::Heading)
                .unwrap_or_else(|| Self::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Self::Paragraph => Cow::Borrowed("paragraph"),
            Self::Heading(level) => Cow::Owned(format!("heading_{}", level)),
            Self::BulletedListItem => Cow::Borrowed("bulleted_list_item"),
            Self::NumberedListItem => Cow::Borrowed("numbered_list_item"),
            Self::Code => Cow::Borrowed("code"),
            Self::Other(kind) => Cow::Borrowed(kind),
        }
    }
}

impl From<String> for BlockKind {
    fn from(kind: String) -> Self {
        Self::parse(&kind)
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().into_owned()
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Kind-specific payload.
///
/// `rich_text` is `None` when the payload carries no text at all (dividers,
/// images, unknown kinds) and `Some` for every text-bearing kind, even when
/// the run list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<Vec<TextRun>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// One node of a page's content tree, as fetched. Children are never stored
/// here; they are listed on demand while walking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub has_children: bool,
    pub content: BlockContent,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            has_children: false,
            content: BlockContent::default(),
        }
    }

    /// A text-bearing block holding a single run.
    pub fn text(id: BlockId, kind: BlockKind, text: impl Into<String>) -> Self {
        Self::new(id, kind).with_runs(vec![TextRun::new(text)])
    }

    /// A code block.
    pub fn code(id: BlockId, language: impl Into<String>, source: impl Into<String>) -> Self {
        let mut block = Self::text(id, BlockKind::Code, source);
        block.content.language = Some(language.into());
        block
    }

    pub fn with_runs(mut self, runs: Vec<TextRun>) -> Self {
        self.content.rich_text = Some(runs);
        self
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Concatenated text, or `None` when the block carries no non-empty run list.
    pub fn plain_text(&self) -> Option<String> {
        match &self.content.rich_text {
            Some(runs) if !runs.is_empty() => Some(concat_runs(runs)),
            _ => None,
        }
    }

    /// Whether rendering this block can produce a text line.
    pub fn is_text_bearing(&self) -> bool {
        self.content
            .rich_text
            .as_ref()
            .is_some_and(|runs| !runs.is_empty())
    }
}
