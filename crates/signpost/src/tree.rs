//! The command tree: path segments, aliases, and traversal.
//!
//! Commands live at nodes of a prefix tree keyed by path segments. Each node
//! carries the set of labels that reach it (its primary name plus any
//! aliases), its children in insertion order, an optional compiled command,
//! and optional error-reporting overrides. Nodes are owned exclusively by
//! their parent; the tree is torn down by ordinary recursive drop.

use crate::command::CommandSpec;
use crate::policy::{ArgsErrorContext, ErrorPolicy, PathErrorContext};
use crate::resolve::is_flag_shaped;

/// Joins path segments for display in configuration errors.
pub(crate) fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One node of the command tree.
pub(crate) struct Node {
    /// Labels that reach this node: primary name first, aliases after.
    pub(crate) labels: Vec<String>,
    /// Children in insertion order. Insertion order determines the order in
    /// which alternatives are listed in diagnostics.
    pub(crate) children: Vec<Node>,
    /// The command registered at this node, if any.
    pub(crate) spec: Option<CommandSpec>,
    /// Override for reporting "no command ends here".
    pub(crate) invalid_command: Option<ErrorPolicy<PathErrorContext>>,
    /// Override for reporting argument failures on this node's command.
    pub(crate) invalid_args: Option<ErrorPolicy<ArgsErrorContext>>,
}

impl Node {
    fn with_label(label: &str) -> Self {
        Self {
            labels: vec![label.to_string()],
            children: Vec::new(),
            spec: None,
            invalid_command: None,
            invalid_args: None,
        }
    }

    fn root() -> Self {
        Self {
            labels: Vec::new(),
            children: Vec::new(),
            spec: None,
            invalid_command: None,
            invalid_args: None,
        }
    }

    /// True if `segment` is this node's name or one of its aliases.
    pub(crate) fn matches(&self, segment: &str) -> bool {
        self.labels.iter().any(|label| label == segment)
    }

    /// The node's primary name (empty only for the root).
    pub(crate) fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or("")
    }
}

/// The node graph rooted at a single synthetic root.
pub(crate) struct CommandTree {
    root: Node,
}

impl CommandTree {
    pub(crate) fn new() -> Self {
        Self { root: Node::root() }
    }

    /// Walks `path` from the root, creating any missing nodes, and returns
    /// the node at the end. Idempotent on prefixes already present; new
    /// children are appended, preserving insertion order.
    pub(crate) fn insert<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Node {
        let mut cur = &mut self.root;
        for segment in path {
            let segment = segment.as_ref();
            let pos = match cur.children.iter().position(|child| child.matches(segment)) {
                Some(pos) => pos,
                None => {
                    cur.children.push(Node::with_label(segment));
                    cur.children.len() - 1
                }
            };
            cur = &mut cur.children[pos];
        }
        cur
    }

    /// Exact resolution: walks `path` without creating nodes.
    pub(crate) fn find_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Node> {
        let mut cur = &mut self.root;
        for segment in path {
            let segment = segment.as_ref();
            let pos = cur
                .children
                .iter()
                .position(|child| child.matches(segment))?;
            cur = &mut cur.children[pos];
        }
        Some(cur)
    }

    /// Greedy prefix resolution: walks while the next token matches a child
    /// label, stopping at the first flag-shaped token, the first unmatched
    /// token, or exhaustion. Returns how many tokens were consumed and the
    /// deepest node reached (which may or may not carry a command).
    pub(crate) fn resolve_prefix_mut(&mut self, tokens: &[String]) -> (usize, &mut Node) {
        let mut cur = &mut self.root;
        let mut consumed = 0;
        for token in tokens {
            if is_flag_shaped(token) {
                break;
            }
            let pos = match cur.children.iter().position(|child| child.matches(token)) {
                Some(pos) => pos,
                None => break,
            };
            cur = &mut cur.children[pos];
            consumed += 1;
        }
        (consumed, cur)
    }

    /// Adds `alias` to the label set of the node at `path`.
    ///
    /// The parent and the final segment must already exist, and the alias
    /// must not collide with any label under the same parent.
    pub(crate) fn add_alias<S: AsRef<str>>(
        &mut self,
        path: &[S],
        alias: &str,
    ) -> Result<(), crate::ConfigError> {
        let not_found = || crate::ConfigError::PathNotFound {
            path: join_path(path),
        };

        let (last, parent_path) = path.split_last().ok_or_else(not_found)?;
        let parent = self.find_mut(parent_path).ok_or_else(not_found)?;

        if parent
            .children
            .iter()
            .any(|child| child.matches(alias))
        {
            return Err(crate::ConfigError::DuplicateLabel {
                label: alias.to_string(),
            });
        }

        let child = parent
            .children
            .iter_mut()
            .find(|child| child.matches(last.as_ref()))
            .ok_or_else(not_found)?;
        child.labels.push(alias.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_insert_is_idempotent_on_prefixes() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz", "foo"]);
        tree.insert(&["bar", "qux"]);

        let bar = tree.find_mut(&["bar"]).unwrap();
        assert_eq!(bar.children.len(), 2);
        assert_eq!(bar.children[0].primary_label(), "baz");
        assert_eq!(bar.children[1].primary_label(), "qux");
    }

    #[test]
    fn test_find_mut_requires_every_segment() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz"]);

        assert!(tree.find_mut(&["bar", "baz"]).is_some());
        assert!(tree.find_mut(&["bar", "nope"]).is_none());
        assert!(tree.find_mut(&["nope"]).is_none());
    }

    #[test]
    fn test_resolve_prefix_stops_at_unmatched() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz", "foo"]);

        let (consumed, node) = tree.resolve_prefix_mut(&tokens(&["bar", "baz", "nope", "x"]));
        assert_eq!(consumed, 2);
        assert_eq!(node.primary_label(), "baz");
    }

    #[test]
    fn test_resolve_prefix_stops_at_flag() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz"]);

        let (consumed, node) = tree.resolve_prefix_mut(&tokens(&["bar", "-v", "baz"]));
        assert_eq!(consumed, 1);
        assert_eq!(node.primary_label(), "bar");
    }

    #[test]
    fn test_resolve_prefix_exhausts_tokens() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz"]);

        let (consumed, node) = tree.resolve_prefix_mut(&tokens(&["bar", "baz"]));
        assert_eq!(consumed, 2);
        assert_eq!(node.primary_label(), "baz");
    }

    #[test]
    fn test_alias_resolves_like_primary() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz"]);
        tree.add_alias(&["bar", "baz"], "b").unwrap();

        let via_alias = tree.resolve_prefix_mut(&tokens(&["bar", "b"]));
        assert_eq!(via_alias.0, 2);
        assert_eq!(via_alias.1.primary_label(), "baz");
    }

    #[test]
    fn test_alias_missing_path() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar"]);

        let err = tree.add_alias(&["bar", "baz"], "b").unwrap_err();
        assert!(matches!(err, ConfigError::PathNotFound { .. }));

        let err = tree.add_alias(&["quux"], "q").unwrap_err();
        assert!(matches!(err, ConfigError::PathNotFound { .. }));
    }

    #[test]
    fn test_alias_label_collision() {
        let mut tree = CommandTree::new();
        tree.insert(&["bar", "baz"]);
        tree.insert(&["bar", "qux"]);

        let err = tree.add_alias(&["bar", "baz"], "qux").unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateLabel {
                label: "qux".to_string()
            }
        );
    }
}
