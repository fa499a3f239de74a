use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::memory::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointLink {
    pub from: Position,
    pub to: Position,
}

/// Ordered `current -> next` checkpoint coordinates. The first entry's key is where every
/// run starts counting from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CheckpointLink>", into = "Vec<CheckpointLink>")]
pub struct CheckpointMap {
    links: IndexMap<Position, Position>,
}

impl Default for CheckpointMap {
    /// Route out of the starting cavern towards the first metroid.
    fn default() -> Self {
        Self::new([
            (Position::new(0x50, 0x70), Position::new(0x88, 0x60)),
            (Position::new(0x88, 0x60), Position::new(0x30, 0x40)),
            (Position::new(0x30, 0x40), Position::new(0x78, 0x90)),
            (Position::new(0x78, 0x90), Position::new(0x20, 0x88)),
        ])
    }
}

impl CheckpointMap {
    pub fn new(links: impl IntoIterator<Item = (Position, Position)>) -> Self {
        Self {
            links: links.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            links: IndexMap::new(),
        }
    }

    pub fn origin(&self) -> Option<Position> {
        self.links.first().map(|(from, _)| *from)
    }

    pub fn next_after(&self, checkpoint: &Position) -> Option<Position> {
        self.links.get(checkpoint).copied()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl From<Vec<CheckpointLink>> for CheckpointMap {
    fn from(links: Vec<CheckpointLink>) -> Self {
        Self::new(links.into_iter().map(|link| (link.from, link.to)))
    }
}

impl From<CheckpointMap> for Vec<CheckpointLink> {
    fn from(map: CheckpointMap) -> Self {
        map.links
            .into_iter()
            .map(|(from, to)| CheckpointLink { from, to })
            .collect()
    }
}
