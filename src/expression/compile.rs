use smallvec::SmallVec;

use crate::expression::bytecode::{Op, Program};
use crate::expression::lexer::{Token, lex};
use crate::expression::ops::ValueType;
use crate::expression::tree::{ExprTree, NodeIdx, TreeNode};
use crate::foundation::error::{DrawError, DrawResult};

/// Compile into the flat postfix instruction stream.
pub fn compile_flat(src: &str) -> DrawResult<Program> {
    let tokens = lex(src)?;
    let mut pending: Vec<ValueType> = Vec::with_capacity(tokens.len());
    let mut ops = Vec::with_capacity(tokens.len());

    for token in &tokens {
        let base = operand_base(token, pending.len())?;
        check_operands(token, &pending[base..])?;
        pending.truncate(base);
        pending.push(token.op.result_type());
        ops.push(Op::from_token(token)?);
    }

    finish(pending.len(), tokens.len())?;
    Ok(Program::new(ops, pending[0]))
}

/// Compile into an arena tree whose nodes own their operand indices.
pub fn compile_tree(src: &str) -> DrawResult<ExprTree> {
    let tokens = lex(src)?;
    let mut nodes: Vec<TreeNode> = Vec::with_capacity(tokens.len());
    let mut pending: Vec<NodeIdx> = Vec::with_capacity(tokens.len());
    let token_count = tokens.len();

    for token in tokens {
        let base = operand_base(&token, pending.len())?;
        let children: SmallVec<[NodeIdx; 3]> = pending[base..].iter().copied().collect();
        let types: SmallVec<[ValueType; 3]> = children
            .iter()
            .map(|c| nodes[c.0 as usize].value_type)
            .collect();
        check_operands(&token, &types)?;

        let idx = NodeIdx(u32::try_from(nodes.len()).map_err(|_| {
            DrawError::config("expression has too many tokens")
        })?);
        for c in &children {
            nodes[c.0 as usize].parent = Some(idx);
        }
        pending.truncate(base);
        pending.push(idx);
        nodes.push(TreeNode {
            value_type: token.op.result_type(),
            token,
            parent: None,
            children,
        });
    }

    finish(pending.len(), token_count)?;
    Ok(ExprTree {
        nodes,
        root: pending[0],
    })
}

fn operand_base(token: &Token, available: usize) -> DrawResult<usize> {
    let k = token.arity as usize;
    available.checked_sub(k).ok_or_else(|| {
        DrawError::arity(format!(
            "malformed expression: \"{}\" at token {} needs {} operands, {} available",
            token.text, token.index, k, available
        ))
    })
}

fn check_operands(token: &Token, found: &[ValueType]) -> DrawResult<()> {
    let want = token.op.operand_types();
    for (i, (w, f)) in want.iter().zip(found).enumerate() {
        if w != f {
            return Err(DrawError::type_mismatch(format!(
                "operand {} of \"{}\" at token {} must be {:?}, got {:?}",
                i + 1,
                token.text,
                token.index,
                w,
                f
            )));
        }
    }
    Ok(())
}

fn finish(pending: usize, tokens: usize) -> DrawResult<()> {
    match pending {
        1 => Ok(()),
        0 => Err(DrawError::balance(format!(
            "malformed expression: no result ({tokens} tokens)"
        ))),
        n => Err(DrawError::balance(format!(
            "malformed expression: {n} values left unconsumed"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/compile.rs"]
mod tests;
