//! Rooted forest for the collapsible tree view.
//!
//! Each person without parents starts a tree; children follow the
//! `enfants` order. A person reachable through several parents is
//! duplicated under each of them. Only the ancestors on the current
//! branch are remembered, which is enough to cut cycles.

use std::collections::HashSet;

use super::node::HierarchyNode;
use super::person::Person;
use super::registry::Registry;

/// Pending subtree on the explicit traversal stack.
struct Frame<'a> {
    person: &'a Person,
    node: HierarchyNode,
    next_child: usize,
}

impl<'a> Frame<'a> {
    fn new(person: &'a Person) -> Self {
        Self {
            person,
            node: HierarchyNode::from_person(person),
            next_child: 0,
        }
    }
}

/// Build one tree per parentless person, in registry order.
///
/// Dangling child names are skipped. Returns an empty forest when no
/// person is parentless.
pub fn build_hierarchy(persons: &[Person]) -> Vec<HierarchyNode> {
    let registry = Registry::new(persons);

    let forest: Vec<HierarchyNode> = registry
        .iter()
        .filter(|person| person.parents.is_empty())
        .map(|root| build_tree(&registry, root))
        .collect();

    log::debug!(
        "hierarchy built: {} root(s), {} node(s)",
        forest.len(),
        forest.iter().map(HierarchyNode::size).sum::<usize>()
    );
    forest
}

fn build_tree<'a>(registry: &Registry<'a>, root: &'a Person) -> HierarchyNode {
    let mut on_path: HashSet<&'a str> = HashSet::new();
    on_path.insert(root.name.as_str());

    let mut stack = vec![Frame::new(root)];
    let mut finished_root = None;

    while let Some(frame) = stack.last_mut() {
        let person = frame.person;
        if let Some(child_name) = person.enfants.get(frame.next_child) {
            frame.next_child += 1;
            let Some(child) = registry.get(child_name) else {
                continue;
            };
            if on_path.insert(child.name.as_str()) {
                stack.push(Frame::new(child));
            }
            continue;
        }

        let Some(done) = stack.pop() else { break };
        on_path.remove(done.person.name.as_str());
        match stack.last_mut() {
            Some(parent) => parent.node.children.push(done.node),
            None => finished_root = Some(done.node),
        }
    }

    finished_root.unwrap_or_else(|| HierarchyNode::from_person(root))
}
