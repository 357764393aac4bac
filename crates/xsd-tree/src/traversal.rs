//! Traversal APIs for walking schema trees

use crate::node::Node;

/// Pre-order iterator over a node tree (document order)
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

/// Trait for visiting every node of a tree
pub trait Traversal {
    /// Visit a node; `path` holds the tag names of its ancestors
    fn visit(&mut self, node: &Node, path: &[String]);

    /// Called when entering a node with children
    fn enter(&mut self, _node: &Node, _path: &[String]) {}

    /// Called when leaving a node with children
    fn leave(&mut self, _node: &Node, _path: &[String]) {}

    /// Returns true if traversal should continue
    fn should_continue(&self) -> bool {
        true
    }
}

impl<'a> Descendants<'a> {
    /// Iterate the descendants of `node`, excluding `node` itself
    pub fn below(node: &'a Node) -> Self {
        Self {
            stack: node.children.iter().rev().collect(),
        }
    }
}

impl<'a> From<&'a Node> for Descendants<'a> {
    fn from(node: &'a Node) -> Self {
        Self { stack: vec![node] }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Walk the tree using a visitor
pub fn walk<T: Traversal>(node: &Node, visitor: &mut T) {
    walk_recursive(node, visitor, &mut vec![]);
}

fn walk_recursive<T: Traversal>(node: &Node, visitor: &mut T, path: &mut Vec<String>) {
    if !visitor.should_continue() {
        return;
    }

    visitor.visit(node, path);

    if !node.children.is_empty() {
        visitor.enter(node, path);
        path.push(node.name.to_string());

        for child in &node.children {
            walk_recursive(child, visitor, path);
        }

        path.pop();
        visitor.leave(node, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::QName;

    fn named(local: &str, name: &str) -> Node {
        let mut node = Node::new(QName::new(Some("xs"), local));
        node.set_attribute("name", name);
        node
    }

    /// schema
    /// ├── complexType A
    /// │   └── element a1
    /// │       └── simpleType s1
    /// └── element b
    fn sample_tree() -> Node {
        let mut simple = named("simpleType", "s1");
        simple.set_attribute("kind", "inline");
        let mut a1 = named("element", "a1");
        a1.add_child(simple);
        let mut a = named("complexType", "A");
        a.add_child(a1);
        let mut root = Node::new(QName::new(Some("xs"), "schema"));
        root.add_child(a);
        root.add_child(named("element", "b"));
        root
    }

    fn names<'a>(iter: impl Iterator<Item = &'a Node>) -> Vec<&'a str> {
        iter.map(|n| n.name_attr().unwrap_or("<root>")).collect()
    }

    #[test]
    fn test_descendants_document_order() {
        let root = sample_tree();
        assert_eq!(names(root.descendants()), ["A", "a1", "s1", "b"]);
    }

    #[test]
    fn test_self_and_descendants() {
        let root = sample_tree();
        let a = &root.children[0];
        assert_eq!(names(a.self_and_descendants()), ["A", "a1", "s1"]);
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let leaf = named("element", "leaf");
        assert_eq!(leaf.descendants().count(), 0);
        assert_eq!(leaf.self_and_descendants().count(), 1);
    }

    struct Collector {
        visited: Vec<(String, usize)>,
        entered: usize,
        left: usize,
        limit: Option<usize>,
    }

    impl Collector {
        fn new(limit: Option<usize>) -> Self {
            Self {
                visited: Vec::new(),
                entered: 0,
                left: 0,
                limit,
            }
        }
    }

    impl Traversal for Collector {
        fn visit(&mut self, node: &Node, path: &[String]) {
            self.visited.push((node.name.local.clone(), path.len()));
        }

        fn enter(&mut self, _node: &Node, _path: &[String]) {
            self.entered += 1;
        }

        fn leave(&mut self, _node: &Node, _path: &[String]) {
            self.left += 1;
        }

        fn should_continue(&self) -> bool {
            self.limit.is_none_or(|limit| self.visited.len() < limit)
        }
    }

    #[test]
    fn test_walk_visits_with_depth() {
        let root = sample_tree();
        let mut collector = Collector::new(None);
        walk(&root, &mut collector);

        let expected = [
            ("schema", 0),
            ("complexType", 1),
            ("element", 2),
            ("simpleType", 3),
            ("element", 1),
        ];
        let visited: Vec<(&str, usize)> = collector
            .visited
            .iter()
            .map(|(name, depth)| (name.as_str(), *depth))
            .collect();
        assert_eq!(visited, expected);
        assert_eq!(collector.entered, 3);
        assert_eq!(collector.left, 3);
    }

    #[test]
    fn test_walk_stops_early() {
        let root = sample_tree();
        let mut collector = Collector::new(Some(2));
        walk(&root, &mut collector);
        assert_eq!(collector.visited.len(), 2);
    }
}
