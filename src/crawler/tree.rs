//! The in-progress result tree
//!
//! Nodes live in an id-addressed arena behind a single mutex; fetch tasks
//! refer to their discovering parent by `NodeId` rather than by an owning
//! reference, so no cycle can form through ownership. The nested `PageNode`
//! tree handed to reporters is materialized from the arena once the crawl
//! ends.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::extractor::AssetMap;

/// One successfully fetched and extracted page in the final tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageNode {
    pub url: String,
    pub title: String,
    pub assets: AssetMap,
    pub links: Vec<String>,
    pub broken: Vec<String>,
    pub children: Vec<PageNode>,
}

/// The extracted content of a page, before it joins the tree
#[derive(Debug, Clone)]
pub struct PageData {
    pub url: String,
    pub title: String,
    pub assets: AssetMap,
    pub links: Vec<String>,
}

/// Handle to a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeSlot {
    data: PageData,
    broken: Vec<String>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct TreeInner {
    nodes: Vec<NodeSlot>,
    root: Option<NodeId>,
}

/// Owns the result tree under construction
///
/// All mutation happens inside short critical sections; nothing is held
/// across a network fetch.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    inner: Mutex<TreeInner>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a page and attaches it to its discovering parent
    ///
    /// Attachment is idempotent per URL: if the parent already has a child
    /// with the same URL the new node is created but left unattached, which
    /// keeps sibling duplicate discovery from producing twin children. A
    /// parentless page becomes the session root, first success wins.
    pub fn attach(&self, data: PageData, parent: Option<NodeId>) -> NodeId {
        let mut inner = self.inner.lock().unwrap();

        let id = NodeId(inner.nodes.len());
        let url = data.url.clone();
        inner.nodes.push(NodeSlot {
            data,
            broken: Vec::new(),
            children: Vec::new(),
        });

        match parent {
            Some(parent_id) => {
                let duplicate = inner.nodes[parent_id.0]
                    .children
                    .iter()
                    .any(|child| inner.nodes[child.0].data.url == url);
                if !duplicate {
                    inner.nodes[parent_id.0].children.push(id);
                }
            }
            None => {
                if inner.root.is_none() {
                    inner.root = Some(id);
                }
            }
        }

        id
    }

    /// Records a link that was attempted from `parent` but failed to fetch
    pub fn record_broken(&self, parent: NodeId, url: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.nodes[parent.0].broken.push(url.to_string());
    }

    /// True once a root page has been attached
    pub fn has_root(&self) -> bool {
        self.inner.lock().unwrap().root.is_some()
    }

    /// Materializes the nested page tree from the arena
    ///
    /// Returns `None` if no page was ever attached. Safe to call once the
    /// crawl is done; nodes that lost an attachment race are unreachable and
    /// simply absent from the output.
    pub fn root_page(&self) -> Option<PageNode> {
        let inner = self.inner.lock().unwrap();
        inner.root.map(|id| build_page(&inner, id))
    }
}

fn build_page(inner: &TreeInner, id: NodeId) -> PageNode {
    let slot = &inner.nodes[id.0];

    PageNode {
        url: slot.data.url.clone(),
        title: slot.data.title.clone(),
        assets: slot.data.assets.clone(),
        links: slot.data.links.clone(),
        broken: slot.broken.clone(),
        children: slot
            .children
            .iter()
            .map(|child| build_page(inner, *child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> PageData {
        PageData {
            url: url.to_string(),
            title: format!("title of {url}"),
            assets: AssetMap::default(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_first_parentless_page_becomes_root() {
        let tree = TreeBuilder::new();
        assert!(!tree.has_root());

        tree.attach(page("https://a/"), None);
        assert!(tree.has_root());

        let root = tree.root_page().unwrap();
        assert_eq!(root.url, "https://a/");
    }

    #[test]
    fn test_root_assignment_is_first_success_wins() {
        let tree = TreeBuilder::new();
        tree.attach(page("https://first/"), None);
        tree.attach(page("https://second/"), None);

        assert_eq!(tree.root_page().unwrap().url, "https://first/");
    }

    #[test]
    fn test_children_attach_to_parent() {
        let tree = TreeBuilder::new();
        let root = tree.attach(page("https://a/"), None);
        tree.attach(page("https://a/x"), Some(root));
        tree.attach(page("https://a/y"), Some(root));

        let built = tree.root_page().unwrap();
        let urls: Vec<_> = built.children.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a/x", "https://a/y"]);
    }

    #[test]
    fn test_duplicate_url_attached_once() {
        let tree = TreeBuilder::new();
        let root = tree.attach(page("https://a/"), None);
        tree.attach(page("https://a/x"), Some(root));
        tree.attach(page("https://a/x"), Some(root));

        let built = tree.root_page().unwrap();
        assert_eq!(built.children.len(), 1);
    }

    #[test]
    fn test_nested_materialization() {
        let tree = TreeBuilder::new();
        let root = tree.attach(page("https://a/"), None);
        let mid = tree.attach(page("https://a/mid"), Some(root));
        tree.attach(page("https://a/mid/leaf"), Some(mid));

        let built = tree.root_page().unwrap();
        assert_eq!(built.children.len(), 1);
        assert_eq!(built.children[0].children.len(), 1);
        assert_eq!(built.children[0].children[0].url, "https://a/mid/leaf");
    }

    #[test]
    fn test_broken_links_recorded_on_parent() {
        let tree = TreeBuilder::new();
        let root = tree.attach(page("https://a/"), None);
        tree.record_broken(root, "https://a/missing");

        let built = tree.root_page().unwrap();
        assert_eq!(built.broken, vec!["https://a/missing".to_string()]);
    }

    #[test]
    fn test_empty_tree_has_no_root_page() {
        let tree = TreeBuilder::new();
        assert!(tree.root_page().is_none());
    }
}
