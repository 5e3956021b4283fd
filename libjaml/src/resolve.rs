//! Phase 4: Anchor/alias resolver
//!
//! Two fixed-point passes over the element list. The first expands every
//! non-merge alias by copying the anchored scalar or subtree in place,
//! rebasing copied indents onto the alias site. The second expands `<<`
//! merge keys: the anchored mapping's children are unioned with the
//! mapping's own children, which win on key collision.
//!
//! Working on the flat list keeps both passes free of pointer rewrites: an
//! anchor expansion is a range-copy and a merge is a range-splice.

use crate::element::{entry_end, subtree_end, Element};
use crate::error::{ParseError, Result};

/// Iteration cap for both passes; exceeding it means the document aliases
/// or merges into itself.
const EXPANSION_LIMIT: usize = 1000;

pub(crate) fn resolve(elements: &mut Vec<Element>) -> Result<()> {
    expand_aliases(elements)?;
    expand_merges(elements)
}

// ----------------------------------------------------------------------
// Pass 1: alias expansion
// ----------------------------------------------------------------------

fn expand_aliases(elements: &mut Vec<Element>) -> Result<()> {
    let mut rounds = 0;
    loop {
        let Some(idx) = elements
            .iter()
            .position(|e| e.alias.starts_with('*') && e.key != "<<")
        else {
            return Ok(());
        };
        let name = elements[idx].alias[1..].to_string();
        let line = elements[idx].line;
        rounds += 1;
        if rounds > EXPANSION_LIMIT {
            return Err(ParseError::AliasRecursive(name, line));
        }

        let Some(a_idx) = elements.iter().position(|e| e.anchor == name) else {
            return Err(ParseError::AnchorNotFound(name, line));
        };

        match anchor_body(elements, a_idx) {
            AnchorBody::Scalar => {
                let (value, literal, tag) = {
                    let a = &elements[a_idx];
                    (a.value.clone(), a.literal, a.tag.clone())
                };
                let e = &mut elements[idx];
                e.value = value;
                e.literal = literal;
                e.tag = tag;
                e.alias.clear();
            }
            AnchorBody::Subtree(start, end) => {
                let scope = &elements[start..end];
                if scope.iter().any(|e| e.alias == format!("*{}", name)) {
                    return Err(ParseError::AliasRecursive(name, line));
                }
                let delta = elements[idx].indent as isize - elements[a_idx].indent as isize;
                let mut copy: Vec<Element> = scope.to_vec();
                for e in &mut copy {
                    e.indent = (e.indent as isize + delta) as usize;
                    e.anchor.clear();
                    if e.alias.starts_with('&') {
                        e.alias.clear();
                    }
                }
                let e = &mut elements[idx];
                e.alias.clear();
                e.value.clear();
                elements.splice(idx + 1..idx + 1, copy);
            }
        }
    }
}

enum AnchorBody {
    Scalar,
    /// Opener..past-closer range of the anchored subtree.
    Subtree(usize, usize),
}

/// Decide whether the anchor at `a_idx` carries a scalar or heads a
/// subtree, and locate the subtree range.
fn anchor_body(elements: &[Element], a_idx: usize) -> AnchorBody {
    let a = &elements[a_idx];
    if a.is_opener() {
        return AnchorBody::Subtree(a_idx, subtree_end(elements, a_idx));
    }
    if a.value.is_empty()
        && a_idx + 1 < elements.len()
        && elements[a_idx + 1].is_opener()
        && elements[a_idx + 1].indent == a.indent
    {
        return AnchorBody::Subtree(a_idx + 1, subtree_end(elements, a_idx + 1));
    }
    AnchorBody::Scalar
}

// ----------------------------------------------------------------------
// Pass 2: merge expansion
// ----------------------------------------------------------------------

fn expand_merges(elements: &mut Vec<Element>) -> Result<()> {
    let mut rounds = 0;
    loop {
        let Some(idx) = elements.iter().position(|e| e.key == "<<") else {
            return Ok(());
        };
        let line = elements[idx].line;
        rounds += 1;
        if rounds > EXPANSION_LIMIT {
            return Err(ParseError::AliasRecursive("<<".to_string(), line));
        }
        if !elements[idx].alias.starts_with('*') {
            return Err(ParseError::MergeInvalid(line));
        }
        let name = elements[idx].alias[1..].to_string();
        let Some(a_idx) = elements.iter().position(|e| e.anchor == name) else {
            return Err(ParseError::AnchorNotFound(name, line));
        };
        let (a_open, a_end) = match anchor_body(elements, a_idx) {
            AnchorBody::Scalar => return Err(ParseError::MergeSingleValue(line)),
            AnchorBody::Subtree(start, end) => (start, end),
        };
        if elements[a_open].value != "{" {
            return Err(ParseError::MergeSingleValue(line));
        }

        // The merge parent is the nearest preceding element with strictly
        // smaller indent: the opener of the containing mapping.
        let m_indent = elements[idx].indent;
        let Some(p_idx) = (0..idx).rev().find(|&i| elements[i].indent < m_indent) else {
            return Err(ParseError::MergeInvalid(line));
        };
        if elements[p_idx].value != "{" {
            return Err(ParseError::MergeInvalid(line));
        }
        let p_close = subtree_end(elements, p_idx) - 1;

        // Anchor children, rebased onto the parent's children indent.
        let delta = m_indent as isize - (elements[a_open].indent + 1) as isize;
        let mut merged: Vec<Vec<Element>> = group_entries(&elements[a_open + 1..a_end - 1]);
        for entry in &mut merged {
            for e in entry.iter_mut() {
                e.indent = (e.indent as isize + delta) as usize;
                e.anchor.clear();
                if e.alias.starts_with('&') {
                    e.alias.clear();
                }
            }
        }

        // Existing children become overrides; the merge key itself drops.
        let mut overrides: Vec<Vec<Element>> = Vec::new();
        {
            let mut i = p_idx + 1;
            while i < p_close {
                let end = entry_end(elements, i).min(p_close);
                if i != idx {
                    overrides.push(elements[i..end].to_vec());
                }
                i = end;
            }
        }
        elements.drain(p_idx + 1..p_close);

        // Union: overrides replace matching anchor entries wholesale;
        // the rest append after them in source order.
        for over in overrides {
            let key = &over[0].key;
            match merged
                .iter()
                .position(|entry| !key.is_empty() && entry[0].key == *key)
            {
                Some(pos) => merged[pos] = over,
                None => merged.push(over),
            }
        }

        let flat: Vec<Element> = merged.into_iter().flatten().collect();
        elements.splice(p_idx + 1..p_idx + 1, flat);
    }
}

/// Split a run of sibling elements into entries (a scalar, or an owner
/// element with its container subtree).
fn group_entries(slice: &[Element]) -> Vec<Vec<Element>> {
    let mut entries = Vec::new();
    let mut i = 0;
    while i < slice.len() {
        let end = entry_end(slice, i);
        entries.push(slice[i..end].to_vec());
        i = end;
    }
    entries
}
