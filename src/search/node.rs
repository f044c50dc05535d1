//! Search-tree nodes with shared parent links

use std::rc::Rc;

/// An entry in a search tree.
///
/// Children hold an `Rc` to their parent, so siblings share one ancestor
/// chain and a node lives as long as a frontier entry or a path needs it.
/// Parents are never mutated, which rules out reference cycles.
#[derive(Debug)]
pub struct Node<S, A> {
    pub state: S,
    pub parent: Option<Rc<Node<S, A>>>,
    pub action: Option<A>,
    /// Path cost g
    pub path_cost: u32,
    /// Heuristic estimate h
    pub heuristic: u32,
    pub depth: usize,
}

impl<S: Clone, A: Copy> Node<S, A> {
    pub fn root(state: S, heuristic: u32) -> Rc<Self> {
        Rc::new(Node {
            state,
            parent: None,
            action: None,
            path_cost: 0,
            heuristic,
            depth: 0,
        })
    }

    pub fn child(
        parent: &Rc<Self>,
        action: A,
        state: S,
        step_cost: u32,
        heuristic: u32,
    ) -> Rc<Self> {
        Rc::new(Node {
            state,
            parent: Some(Rc::clone(parent)),
            action: Some(action),
            path_cost: parent.path_cost + step_cost,
            heuristic,
            depth: parent.depth + 1,
        })
    }

    /// f = g + h
    pub fn f(&self) -> u32 {
        self.path_cost + self.heuristic
    }

    /// States from the root down to this node, inclusive.
    pub fn path(&self) -> Vec<S> {
        let mut states = vec![self.state.clone()];
        let mut current = self.parent.as_deref();
        while let Some(node) = current {
            states.push(node.state.clone());
            current = node.parent.as_deref();
        }
        states.reverse();
        states
    }

    /// Actions from the root down to this node.
    pub fn actions(&self) -> Vec<A> {
        let mut actions = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(node) = current {
            if let Some(action) = node.action {
                actions.push(action);
            }
            current = node.parent.as_deref();
        }
        actions.reverse();
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_reconstruction_through_shared_parent() {
        let root = Node::<u8, char>::root(0, 3);
        let left = Node::child(&root, 'l', 1, 1, 2);
        let right = Node::child(&root, 'r', 2, 1, 2);
        let leaf = Node::child(&left, 'x', 3, 2, 0);

        assert_eq!(leaf.path(), vec![0, 1, 3]);
        assert_eq!(leaf.actions(), vec!['l', 'x']);
        assert_eq!(right.path(), vec![0, 2]);
        assert_eq!(leaf.path_cost, 3);
        assert_eq!(leaf.depth, 2);
        assert_eq!(leaf.f(), 3);
        assert_eq!(Rc::strong_count(&root), 3);
    }
}
