// Dweve TMDL - Tabular Model Definition Language Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Indentation tree construction.
//!
//! Single left-to-right pass over the segmented lines with an ancestor
//! stack: a line at depth *d* becomes a child of the nearest preceding line
//! at depth *d − 1*. Sibling order is preserved exactly as authored.
//!
//! Blank lines carry no depth of their own; a blank run attaches as a
//! sibling wherever the next content line lands, so separators between
//! siblings stay between those siblings. Blank runs at the end of input
//! attach to the root.

use crate::error::{TmdlError, TmdlResult};
use crate::lex::segment::Segment;

/// A node of the raw indentation tree.
#[derive(Debug, Clone)]
pub(crate) struct TreeNode {
    pub seg: Segment,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(seg: Segment) -> Self {
        Self {
            seg,
            children: Vec::new(),
        }
    }

    /// Verbatim text of this node and its whole subtree, in source order.
    pub fn flatten_raw(&self) -> String {
        let mut out = self.seg.raw.clone();
        for child in &self.children {
            out.push('\n');
            out.push_str(&child.flatten_raw());
        }
        out
    }
}

/// Build the ordered tree from segmented lines.
pub(crate) fn build(segments: Vec<Segment>) -> TmdlResult<Vec<TreeNode>> {
    let mut roots: Vec<TreeNode> = Vec::new();
    let mut stack: Vec<TreeNode> = Vec::new();
    let mut pending_blanks: Vec<Segment> = Vec::new();

    fn close_to(depth: usize, stack: &mut Vec<TreeNode>, roots: &mut Vec<TreeNode>) {
        while stack.len() > depth {
            let node = stack.pop().expect("stack is non-empty");
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }
    }

    for seg in segments {
        if seg.blank {
            pending_blanks.push(seg);
            continue;
        }
        let depth = seg.depth;
        if depth > stack.len() {
            return Err(TmdlError::indentation(
                format!(
                    "line at depth {} skips levels (parent is at depth {})",
                    depth,
                    stack.len().saturating_sub(1)
                ),
                seg.line,
            ));
        }
        close_to(depth, &mut stack, &mut roots);
        for blank in pending_blanks.drain(..) {
            match stack.last_mut() {
                Some(parent) => parent.children.push(TreeNode::leaf(blank)),
                None => roots.push(TreeNode::leaf(blank)),
            }
        }
        stack.push(TreeNode::leaf(seg));
    }

    close_to(0, &mut stack, &mut roots);
    for blank in pending_blanks {
        roots.push(TreeNode::leaf(blank));
    }
    Ok(roots)
}
