// src/api/tree.rs
//! Recursive block-tree fetching.

use super::{collect_all, NotionApi, NotionTransport};
use crate::error::Result;
use crate::model::Block;
use std::future::Future;
use std::pin::Pin;

/// Fetches all children of `id`, then the children of every child that has
/// any, down to `depth` levels (1 = direct children only; 0 behaves like 1).
///
/// Requests run one after another, depth-first; children are attached to
/// their parent once the subtree below it is complete.
pub fn fetch_block_tree<'a, T: NotionTransport>(
    api: &'a NotionApi<T>,
    id: &'a str,
    depth: usize,
) -> Pin<Box<dyn Future<Output = Result<Vec<Block>>> + 'a>> {
    Box::pin(async move {
        let mut blocks = collect_all(
            |cursor: Option<String>| async move { api.block_children_page(id, cursor.as_deref()).await },
            None,
            false,
        )
        .await?;

        expand_children(api, &mut blocks, depth.saturating_sub(1)).await?;

        log::debug!("Fetched {} blocks under {}", blocks.len(), id);
        Ok(blocks)
    })
}

/// Fills in the children of every block that reports some, `levels` levels
/// further down. Used on top-level blocks fetched page by page.
pub async fn expand_children<T: NotionTransport>(
    api: &NotionApi<T>,
    blocks: &mut [Block],
    levels: usize,
) -> Result<()> {
    if levels == 0 {
        return Ok(());
    }
    for block in blocks.iter_mut().filter(|block| block.has_children) {
        if let Some(child_id) = block.id.clone() {
            block.children = fetch_block_tree(api, &child_id, levels).await?;
        }
    }
    Ok(())
}
