use crate::dom::Dom;
use crate::element::{
    flag, glow_element, HasChildren, HasContents, HasDescription, HasIdentifier, HasNumber,
    HasPath,
};
use crate::error::Result;
use crate::tags;

glow_element!(
    /// A structural node of the provider tree, addressed by number.
    Node => Node
);

glow_element!(
    /// A node addressed by its full path.
    QualifiedNode => QualifiedNode
);

/// Node-specific fields of the contents set.
pub trait NodeContents: HasContents {
    fn is_root(self, dom: &Dom) -> bool {
        flag(self.content_value(dom, tags::node::IS_ROOT), false)
    }

    fn set_is_root(self, dom: &mut Dom, is_root: bool) -> Result<()> {
        self.set_content_value(dom, tags::node::IS_ROOT, is_root)
    }

    fn is_online(self, dom: &Dom) -> bool {
        flag(self.content_value(dom, tags::node::IS_ONLINE), true)
    }

    fn set_is_online(self, dom: &mut Dom, is_online: bool) -> Result<()> {
        self.set_content_value(dom, tags::node::IS_ONLINE, is_online)
    }
}

impl HasNumber for Node {}
impl HasContents for Node {}
impl HasIdentifier for Node {}
impl HasDescription for Node {}
impl HasChildren for Node {}
impl NodeContents for Node {}

impl HasPath for QualifiedNode {}
impl HasContents for QualifiedNode {}
impl HasIdentifier for QualifiedNode {}
impl HasDescription for QualifiedNode {}
impl HasChildren for QualifiedNode {}
impl NodeContents for QualifiedNode {}
