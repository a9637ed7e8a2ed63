use emberwire_ber::Value;

use crate::dom::{Dom, NodeId};
use crate::element::{
    collect_typed, glow_element, text, GlowElement, HasArguments, HasChildren, HasContents,
    HasDescription, HasIdentifier, HasNumber, HasPath,
};
use crate::error::Result;
use crate::glow_type::GlowType;
use crate::tags;
use crate::value::ParameterType;

glow_element!(
    /// A remotely invocable procedure.
    Function => Function
);

glow_element!(
    /// A function addressed by its full path.
    QualifiedFunction => QualifiedFunction
);

glow_element!(
    /// Name and type of one function argument or result.
    TupleItemDescription => TupleItemDescription
);

impl TupleItemDescription {
    pub fn parameter_type(self, dom: &Dom) -> ParameterType {
        dom.leaf_value(self.0, tags::tuple_item::TYPE)
            .and_then(Value::as_integer)
            .and_then(ParameterType::from_code)
            .unwrap_or_default()
    }

    pub fn set_parameter_type(self, dom: &mut Dom, kind: ParameterType) -> Result<()> {
        dom.set_leaf(self.0, tags::tuple_item::TYPE, kind.code())?;
        Ok(())
    }

    pub fn name(self, dom: &Dom) -> String {
        text(dom.leaf_value(self.0, tags::tuple_item::NAME))
    }

    pub fn set_name(self, dom: &mut Dom, name: &str) -> Result<()> {
        dom.set_leaf(self.0, tags::tuple_item::NAME, name)?;
        Ok(())
    }
}

/// Function-specific fields of the contents set: the argument and result
/// signatures.
pub trait FunctionContents: HasContents + HasArguments {
    fn result(self, dom: &Dom) -> Option<NodeId> {
        self.contents(dom)
            .and_then(|contents| dom.find_child(contents, tags::function::RESULT))
            .filter(|id| dom.is_container(*id))
    }

    fn result_mut(self, dom: &mut Dom) -> Result<NodeId> {
        let contents = self.contents_mut(dom)?;
        dom.get_or_insert_container(contents, tags::function::RESULT, GlowType::Sequence.tag())
    }

    /// Argument descriptions, in order.
    fn typed_arguments(self, dom: &Dom) -> Vec<TupleItemDescription> {
        self.arguments(dom)
            .map(|arguments| collect_typed(dom, arguments))
            .unwrap_or_default()
    }

    /// Result descriptions, in order.
    fn typed_result(self, dom: &Dom) -> Vec<TupleItemDescription> {
        self.result(dom)
            .map(|result| collect_typed(dom, result))
            .unwrap_or_default()
    }

    fn add_argument(
        self,
        dom: &mut Dom,
        name: &str,
        kind: ParameterType,
    ) -> Result<TupleItemDescription> {
        let arguments = self.arguments_mut(dom)?;
        push_item(dom, arguments, name, kind)
    }

    fn add_result(
        self,
        dom: &mut Dom,
        name: &str,
        kind: ParameterType,
    ) -> Result<TupleItemDescription> {
        let result = self.result_mut(dom)?;
        push_item(dom, result, name, kind)
    }
}

fn push_item(
    dom: &mut Dom,
    sequence: NodeId,
    name: &str,
    kind: ParameterType,
) -> Result<TupleItemDescription> {
    let item = TupleItemDescription::create_default(dom);
    item.set_parameter_type(dom, kind)?;
    item.set_name(dom, name)?;
    dom.append_child(sequence, item.id())?;
    Ok(item)
}

fn contents_arguments(dom: &Dom, contents: Option<NodeId>) -> Option<NodeId> {
    contents.and_then(|contents| dom.find_child(contents, tags::function::ARGUMENTS))
}

macro_rules! function_arguments {
    ($name:ident) => {
        impl HasArguments for $name {
            fn arguments(self, dom: &Dom) -> Option<NodeId> {
                contents_arguments(dom, self.contents(dom))
            }

            fn arguments_mut(self, dom: &mut Dom) -> Result<NodeId> {
                let contents = self.contents_mut(dom)?;
                dom.get_or_insert_container(
                    contents,
                    tags::function::ARGUMENTS,
                    GlowType::Sequence.tag(),
                )
            }
        }
    };
}

function_arguments!(Function);
function_arguments!(QualifiedFunction);

impl HasNumber for Function {}
impl HasContents for Function {}
impl HasIdentifier for Function {}
impl HasDescription for Function {}
impl HasChildren for Function {}
impl FunctionContents for Function {}

impl HasPath for QualifiedFunction {}
impl HasContents for QualifiedFunction {}
impl HasIdentifier for QualifiedFunction {}
impl HasDescription for QualifiedFunction {}
impl HasChildren for QualifiedFunction {}
impl FunctionContents for QualifiedFunction {}
