use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("node {child:?} is not a child of node {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// Index into a [`Document`] arena.
///
/// Ids are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

/// Tag, class list and attributes of an element node.
///
/// The class list is kept separate from `attrs` (ordered, duplicate-free);
/// `attrs` never contains a `class` key.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed DOM tree.
///
/// Nodes are never freed; detaching only unlinks them. A decoration pass is
/// one-shot and page-view scoped, so the arena lives as long as the block.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Creates a detached element. Tag names are normalised to lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
        }))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element(_))
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|data| data.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Child ids that are elements, in document order.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect()
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement(parent));
        }
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        Ok(())
    }

    /// Moves `child` under `parent` directly before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement(parent));
        }
        self.detach(child);
        let position = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::NotAChild {
                parent,
                child: reference,
            })?;
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(position, child);
        Ok(())
    }

    /// Unlinks `id` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Swaps `old` for `new` in `parent`'s child list, preserving position.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement(parent));
        }
        let position = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == old)
            .ok_or(DomError::NotAChild { parent, child: old })?;
        self.detach(new);
        self.node_mut(old).parent = None;
        self.node_mut(new).parent = Some(parent);
        self.node_mut(parent).children[position] = new;
        Ok(())
    }

    /// Concatenated text of `id` and all its descendants, document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &self.node(id).children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(data) = self.element_mut(id)
            && !data.classes.iter().any(|c| c == class)
        {
            data.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    pub fn class_list(&self, id: NodeId) -> &[String] {
        self.element(id).map(|data| &data.classes[..]).unwrap_or(&[])
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|data| data.attrs.get(name))
            .map(String::as_str)
    }

    /// Sets an attribute. `class` is routed into the class list.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(data) = self.element_mut(id) {
            if name == "class" {
                data.classes = value.split_whitespace().map(str::to_string).collect();
            } else {
                data.attrs.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(data) = self.element_mut(id) {
            data.attrs.remove(name);
        }
    }

    /// Reads one property out of the inline `style` attribute.
    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            (name.trim() == property).then(|| value.trim().to_string())
        })
    }

    /// Writes one property into the inline `style` attribute, keeping the
    /// declaration order of properties already present.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attr(id, "style")
            .unwrap_or("")
            .split(';')
            .filter_map(|decl| {
                let (name, val) = decl.split_once(':')?;
                Some((name.trim().to_string(), val.trim().to_string()))
            })
            .collect();
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some(decl) => decl.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let style = declarations
            .iter()
            .map(|(name, val)| format!("{name}: {val}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr(id, "style", &style);
    }

    /// Heading level of the element, if it is an `h1`..`h6`.
    pub fn heading_level(&self, id: NodeId) -> Option<u8> {
        let tag = self.tag(id)?;
        let mut chars = tag.chars();
        if chars.next() != Some('h') {
            return None;
        }
        match chars.next().and_then(|c| c.to_digit(10)) {
            Some(level @ 1..=6) if chars.next().is_none() => Some(level as u8),
            _ => None,
        }
    }
}
