use crate::dom::{Dom, NodeId};
use crate::element::{collect_typed, glow_element, GlowElement};
use crate::error::Result;
use crate::glow_type::GlowType;
use crate::invocation::InvocationResult;
use crate::tags;

glow_element!(
    /// Ordered children of a node, parameter or function.
    ElementCollection => ElementCollection
);

glow_element!(
    /// Top-level list of elements in a Glow message.
    RootElementCollection => RootElementCollection
);

macro_rules! element_list {
    ($name:ident) => {
        impl $name {
            /// Elements of kind `U`, in order.
            pub fn elements<U: GlowElement>(self, dom: &Dom) -> Vec<U> {
                collect_typed(dom, self.0)
            }

            /// Append a new element of kind `U`.
            pub fn add<U: GlowElement>(self, dom: &mut Dom) -> Result<U> {
                let element = U::create_default(dom);
                dom.append_child(self.0, element.id())?;
                Ok(element)
            }

            pub fn len(self, dom: &Dom) -> usize {
                dom.children(self.0).len()
            }

            pub fn is_empty(self, dom: &Dom) -> bool {
                dom.children(self.0).is_empty()
            }
        }
    };
}

element_list!(ElementCollection);
element_list!(RootElementCollection);

impl RootElementCollection {
    /// Allocate an empty message root.
    pub fn create_root(dom: &mut Dom) -> Self {
        Self::create(dom, tags::ROOT)
    }
}

/// What a decoded message root carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    Elements(RootElementCollection),
    InvocationResult(InvocationResult),
    /// A root of a kind this crate has no view for, such as stream data.
    Other(NodeId),
}

impl Root {
    /// Classify a decoded top-level element.
    pub fn classify(dom: &Dom, id: NodeId) -> Self {
        match GlowType::of(dom, id) {
            Some(GlowType::RootElementCollection) => {
                Root::Elements(RootElementCollection::from_id_unchecked(id))
            }
            Some(GlowType::InvocationResult) => {
                Root::InvocationResult(InvocationResult::from_id_unchecked(id))
            }
            _ => Root::Other(id),
        }
    }

    pub fn id(self) -> NodeId {
        match self {
            Root::Elements(root) => root.id(),
            Root::InvocationResult(result) => result.id(),
            Root::Other(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{HasChildren, HasIdentifier};
    use crate::node::Node;
    use crate::parameter::Parameter;

    #[test]
    fn test_root_lists_elements_by_kind() {
        let mut dom = Dom::new();
        let root = RootElementCollection::create_root(&mut dom);
        let node: Node = root.add(&mut dom).unwrap();
        let param: Parameter = root.add(&mut dom).unwrap();

        assert_eq!(dom.tag(root.id()), Some(tags::ROOT));
        assert_eq!(root.len(&dom), 2);
        assert_eq!(root.elements::<Node>(&dom), vec![node]);
        assert_eq!(root.elements::<Parameter>(&dom), vec![param]);
    }

    #[test]
    fn test_children_collection_is_typed() {
        let mut dom = Dom::new();
        let node = Node::create_default(&mut dom);
        let child: Node = node.add_child(&mut dom).unwrap();
        child.set_identifier(&mut dom, "child").unwrap();

        let children = node.children(&dom).unwrap();
        let collection = ElementCollection::cast(&dom, children).unwrap();
        assert_eq!(collection.elements::<Node>(&dom), vec![child]);
        assert!(!collection.is_empty(&dom));
    }

    #[test]
    fn test_classify_roots() {
        let mut dom = Dom::new();
        let elements = RootElementCollection::create_root(&mut dom);
        let result = InvocationResult::create(&mut dom, tags::ROOT);
        let node = Node::create(&mut dom, tags::ROOT);

        assert_eq!(Root::classify(&dom, elements.id()), Root::Elements(elements));
        assert_eq!(
            Root::classify(&dom, result.id()),
            Root::InvocationResult(result)
        );
        assert_eq!(Root::classify(&dom, node.id()), Root::Other(node.id()));
        assert_eq!(Root::classify(&dom, node.id()).id(), node.id());
    }
}
