//! Process tree building logic
//!
//! Nodes live in an index arena: children are stored as positions into the
//! sample vector, never as references, and the preorder walk uses an
//! explicit stack so deep chains cannot overflow.

use std::collections::HashMap;

use super::ProcessSample;

/// Orders `samples` by a preorder walk of the parent/child forest and sets
/// each sample's `tree_depth`.
///
/// Samples are first sorted by `(parent_id, id)`, so siblings are visited in
/// id order. A sample whose parent is absent, zero or itself becomes a
/// top-level node at depth 0. Members of a parent cycle are never reached
/// from a top-level node; they are emitted afterwards as extra top-level
/// nodes so no sample is lost.
pub fn build_tree(mut samples: Vec<ProcessSample>) -> Vec<ProcessSample> {
    samples.sort_by(|a, b| (a.parent_id, a.id).cmp(&(b.parent_id, b.id)));

    let count = samples.len();
    let index: HashMap<u32, usize> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        match index.get(&sample.parent_id) {
            Some(&parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    let mut visited = vec![false; count];
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(count);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let leftovers = 0..count;
    for start in roots.into_iter().chain(leftovers) {
        if visited[start] {
            continue;
        }
        stack.push((start, 0));
        while let Some((node, depth)) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            order.push((node, depth));
            for &child in children[node].iter().rev() {
                if !visited[child] {
                    stack.push((child, depth + 1));
                }
            }
        }
    }

    let mut slots: Vec<Option<ProcessSample>> = samples.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|(node, depth)| {
            slots[node].take().map(|mut sample| {
                sample.tree_depth = depth;
                sample
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(tree: &[ProcessSample]) -> Vec<(u32, usize)> {
        tree.iter().map(|s| (s.id, s.tree_depth)).collect()
    }

    #[test]
    fn test_missing_parent_becomes_top_level() {
        let input = vec![
            ProcessSample::stub(1, 0, "init"),
            ProcessSample::stub(2, 1, "a"),
            ProcessSample::stub(3, 1, "b"),
            ProcessSample::stub(4, 99, "orphan"),
        ];
        let tree = build_tree(input);
        assert_eq!(shape(&tree), vec![(1, 0), (2, 1), (3, 1), (4, 0)]);
    }

    #[test]
    fn test_depth_is_parent_depth_plus_one() {
        let input = vec![
            ProcessSample::stub(40, 30, "d"),
            ProcessSample::stub(10, 0, "a"),
            ProcessSample::stub(30, 20, "c"),
            ProcessSample::stub(20, 10, "b"),
            ProcessSample::stub(50, 10, "e"),
        ];
        let tree = build_tree(input);
        assert_eq!(
            shape(&tree),
            vec![(10, 0), (20, 1), (30, 2), (40, 3), (50, 1)]
        );

        let depth_of: HashMap<u32, usize> = tree.iter().map(|s| (s.id, s.tree_depth)).collect();
        for sample in &tree {
            if let Some(parent_depth) = depth_of.get(&sample.parent_id) {
                assert_eq!(sample.tree_depth, parent_depth + 1, "pid {}", sample.id);
            }
        }
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let tree = build_tree(vec![
            ProcessSample::stub(4, 4, "loop"),
            ProcessSample::stub(5, 4, "child"),
        ]);
        assert_eq!(shape(&tree), vec![(4, 0), (5, 1)]);
    }

    #[test]
    fn test_parent_cycle_keeps_every_node() {
        let tree = build_tree(vec![
            ProcessSample::stub(7, 8, "a"),
            ProcessSample::stub(8, 7, "b"),
            ProcessSample::stub(9, 0, "c"),
        ]);
        assert_eq!(tree.len(), 3);
        let mut ids: Vec<u32> = tree.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![7, 8, 9], "no node lost or duplicated");
        assert_eq!(tree[0].id, 9, "acyclic roots come first");
        assert_eq!(tree[1].tree_depth, 0);
        assert_eq!(tree[2].tree_depth, 1);
    }

    #[test]
    fn test_siblings_follow_id_order_regardless_of_input() {
        let tree = build_tree(vec![
            ProcessSample::stub(9, 1, "z"),
            ProcessSample::stub(3, 1, "y"),
            ProcessSample::stub(1, 0, "root"),
            ProcessSample::stub(6, 1, "x"),
        ]);
        assert_eq!(shape(&tree), vec![(1, 0), (3, 1), (6, 1), (9, 1)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::new()).is_empty());
    }
}
