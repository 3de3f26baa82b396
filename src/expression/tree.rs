//! Arena-backed operand tree.
//!
//! Nodes are stored in creation order and linked by index: each node knows
//! its parent and its ordered operands. Execution always goes through
//! [`ExprTree::lower`], which emits the same instruction stream the flat
//! compiler produces.

use smallvec::SmallVec;

use crate::expression::bytecode::{Op, Program};
use crate::expression::lexer::Token;
use crate::expression::ops::ValueType;
use crate::foundation::error::{DrawError, DrawResult};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct NodeIdx(pub u32);

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TreeNode {
    pub token: Token,
    pub value_type: ValueType,
    pub parent: Option<NodeIdx>,
    /// Operands in push order.
    pub children: SmallVec<[NodeIdx; 3]>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExprTree {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) root: NodeIdx,
}

impl ExprTree {
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIdx) -> Option<&TreeNode> {
        self.nodes.get(idx.0 as usize)
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.node(idx).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.node(idx).and_then(|n| n.parent)
    }

    /// Node indices in evaluation (post-) order.
    pub fn postorder(&self) -> DrawResult<Vec<NodeIdx>> {
        let limit = 2 * self.nodes.len() + 1;
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut work: Vec<(NodeIdx, bool)> = vec![(self.root, false)];
        let mut steps = 0usize;

        while let Some((idx, expanded)) = work.pop() {
            steps += 1;
            if steps > limit {
                return Err(DrawError::balance("expression tree contains a cycle"));
            }
            let node = self.checked_node(idx)?;
            if expanded {
                out.push(idx);
                continue;
            }
            if node.children.len() != node.token.arity as usize {
                return Err(DrawError::arity(format!(
                    "\"{}\" takes {} operands but its tree node has {}",
                    node.token.text,
                    node.token.arity,
                    node.children.len()
                )));
            }
            work.push((idx, true));
            for &c in node.children.iter().rev() {
                work.push((c, false));
            }
        }

        Ok(out)
    }

    /// Flatten into the postfix instruction stream.
    pub fn lower(&self) -> DrawResult<Program> {
        let order = self.postorder()?;
        let mut ops = Vec::with_capacity(order.len());
        for idx in order {
            ops.push(Op::from_token(&self.checked_node(idx)?.token)?);
        }
        let result_type = self.checked_node(self.root)?.value_type;
        Ok(Program::new(ops, result_type))
    }

    /// Render back to normalized postfix text.
    pub fn to_postfix(&self) -> DrawResult<String> {
        let order = self.postorder()?;
        let mut out = String::new();
        for (i, idx) in order.into_iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&self.checked_node(idx)?.token.text);
        }
        Ok(out)
    }

    fn checked_node(&self, idx: NodeIdx) -> DrawResult<&TreeNode> {
        self.node(idx).ok_or_else(|| {
            DrawError::balance(format!("tree node index {} out of range", idx.0))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/tree.rs"]
mod tests;
