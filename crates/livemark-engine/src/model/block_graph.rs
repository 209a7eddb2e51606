use serde::Serialize;

use super::doc_model::{Block, BlockId};

/// A block seen as a node in a doubly-linked list of its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockNode {
    pub id: BlockId,
    pub index: usize,
    pub from: usize,
    pub to: usize,
    pub previous_id: Option<BlockId>,
    pub next_id: Option<BlockId>,
}

/// Projects sorted blocks into linked nodes.
pub fn build_block_graph(blocks: &[Block]) -> Vec<BlockNode> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| BlockNode {
            id: block.id.clone(),
            index,
            from: block.from,
            to: block.to,
            previous_id: index
                .checked_sub(1)
                .and_then(|p| blocks.get(p))
                .map(|b| b.id.clone()),
            next_id: blocks.get(index + 1).map(|b| b.id.clone()),
        })
        .collect()
}
