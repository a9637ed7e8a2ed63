use emberwire_ber::{Tag, Value};

use crate::dom::{Dom, NodeId};
use crate::element::{
    flag, glow_element, read_values, write_values, GlowElement, HasArguments, HasNumber,
};
use crate::error::Result;
use crate::glow_type::GlowType;
use crate::tags;
use crate::value::GlowValue;

/// Invocation id reported when none is set.
pub const NO_INVOCATION_ID: i32 = -1;

glow_element!(
    /// A request to run a function with concrete arguments.
    Invocation => Invocation
);

glow_element!(
    /// The outcome of an [`Invocation`].
    InvocationResult => InvocationResult
);

glow_element!(
    /// A command addressed to a node, parameter or function.
    Command => Command
);

/// Commands understood by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandType {
    Subscribe,
    Unsubscribe,
    GetDirectory,
    Invoke,
}

impl CommandType {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            30 => CommandType::Subscribe,
            31 => CommandType::Unsubscribe,
            32 => CommandType::GetDirectory,
            33 => CommandType::Invoke,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        match self {
            CommandType::Subscribe => 30,
            CommandType::Unsubscribe => 31,
            CommandType::GetDirectory => 32,
            CommandType::Invoke => 33,
        }
    }
}

fn invocation_id(dom: &Dom, id: NodeId, slot: Tag) -> i32 {
    dom.leaf_value(id, slot)
        .and_then(Value::as_integer)
        .and_then(|value| i32::try_from(value).ok())
        .unwrap_or(NO_INVOCATION_ID)
}

impl Invocation {
    /// Invocation id, or [`NO_INVOCATION_ID`] when unset.
    pub fn invocation_id(self, dom: &Dom) -> i32 {
        invocation_id(dom, self.0, tags::invocation::INVOCATION_ID)
    }

    pub fn set_invocation_id(self, dom: &mut Dom, id: i32) -> Result<()> {
        dom.set_leaf(self.0, tags::invocation::INVOCATION_ID, i64::from(id))?;
        Ok(())
    }

    /// Argument values, in order; non-leaf and non-scalar entries are skipped.
    pub fn typed_arguments(self, dom: &Dom) -> Vec<GlowValue> {
        read_values(dom, self.arguments(dom))
    }

    /// Replace all arguments with `values`.
    pub fn set_typed_arguments<I, V>(self, dom: &mut Dom, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<GlowValue>,
    {
        let arguments = self.arguments_mut(dom)?;
        write_values(dom, arguments, values.into_iter().map(Into::into))
    }
}

impl HasArguments for Invocation {
    fn arguments(self, dom: &Dom) -> Option<NodeId> {
        dom.find_child(self.0, tags::invocation::ARGUMENTS)
            .filter(|id| dom.is_container(*id))
    }

    fn arguments_mut(self, dom: &mut Dom) -> Result<NodeId> {
        dom.get_or_insert_container(
            self.0,
            tags::invocation::ARGUMENTS,
            GlowType::Sequence.tag(),
        )
    }
}

impl InvocationResult {
    /// Invocation id, or [`NO_INVOCATION_ID`] when unset.
    pub fn invocation_id(self, dom: &Dom) -> i32 {
        invocation_id(dom, self.0, tags::invocation_result::INVOCATION_ID)
    }

    pub fn set_invocation_id(self, dom: &mut Dom, id: i32) -> Result<()> {
        dom.set_leaf(self.0, tags::invocation_result::INVOCATION_ID, i64::from(id))?;
        Ok(())
    }

    /// Success flag; true when unset.
    pub fn success(self, dom: &Dom) -> bool {
        flag(dom.leaf_value(self.0, tags::invocation_result::SUCCESS), true)
    }

    pub fn set_success(self, dom: &mut Dom, success: bool) -> Result<()> {
        dom.set_leaf(self.0, tags::invocation_result::SUCCESS, success)?;
        Ok(())
    }

    pub fn result(self, dom: &Dom) -> Option<NodeId> {
        dom.find_child(self.0, tags::invocation_result::RESULT)
            .filter(|id| dom.is_container(*id))
    }

    pub fn result_mut(self, dom: &mut Dom) -> Result<NodeId> {
        dom.get_or_insert_container(
            self.0,
            tags::invocation_result::RESULT,
            GlowType::Sequence.tag(),
        )
    }

    /// Result values, in order; non-leaf and non-scalar entries are skipped.
    pub fn typed_result(self, dom: &Dom) -> Vec<GlowValue> {
        read_values(dom, self.result(dom))
    }

    /// Replace all result values with `values`.
    pub fn set_typed_result<I, V>(self, dom: &mut Dom, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<GlowValue>,
    {
        let result = self.result_mut(dom)?;
        write_values(dom, result, values.into_iter().map(Into::into))
    }
}

impl Command {
    pub fn command_type(self, dom: &Dom) -> Option<CommandType> {
        dom.leaf_value(self.0, tags::command::NUMBER)
            .and_then(Value::as_integer)
            .and_then(CommandType::from_code)
    }

    pub fn set_command_type(self, dom: &mut Dom, kind: CommandType) -> Result<()> {
        self.set_number(dom, kind.code())
    }

    pub fn invocation(self, dom: &Dom) -> Option<Invocation> {
        dom.find_child(self.0, tags::command::INVOCATION)
            .and_then(|id| Invocation::cast(dom, id))
    }

    /// Invocation carried by an Invoke command, created on first use.
    pub fn invocation_mut(self, dom: &mut Dom) -> Result<Invocation> {
        let id = dom.get_or_insert_container(
            self.0,
            tags::command::INVOCATION,
            GlowType::Invocation.tag(),
        )?;
        Ok(Invocation::from_id_unchecked(id))
    }
}

impl HasNumber for Command {}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn test_invocation_defaults() {
        let mut dom = Dom::new();
        let invocation = Invocation::create_default(&mut dom);
        assert_eq!(invocation.invocation_id(&dom), NO_INVOCATION_ID);
        assert!(invocation.typed_arguments(&dom).is_empty());
        assert!(invocation.arguments(&dom).is_none());
    }

    #[test]
    fn test_typed_arguments_replace_previous_values() {
        let mut dom = Dom::new();
        let invocation = Invocation::create_default(&mut dom);
        invocation.set_invocation_id(&mut dom, 7).unwrap();
        invocation
            .set_typed_arguments(&mut dom, [GlowValue::Integer(1), GlowValue::from("two")])
            .unwrap();
        invocation
            .set_typed_arguments(&mut dom, [3.5, 4.5])
            .unwrap();

        assert_eq!(invocation.invocation_id(&dom), 7);
        assert_eq!(
            invocation.typed_arguments(&dom),
            vec![GlowValue::Real(3.5), GlowValue::Real(4.5)]
        );

        let arguments = invocation.arguments(&dom).unwrap();
        for child in dom.children(arguments) {
            assert_eq!(dom.tag(*child), Some(tags::ELEMENT_DEFAULT));
        }
    }

    #[test]
    fn test_reading_skips_containers() {
        let mut dom = Dom::new();
        let invocation = Invocation::create_default(&mut dom);
        invocation.set_typed_arguments(&mut dom, [true]).unwrap();
        let arguments = invocation.arguments(&dom).unwrap();
        let nested = dom.new_container(tags::ELEMENT_DEFAULT, GlowType::Sequence.tag());
        dom.append_child(arguments, nested).unwrap();

        assert_eq!(dom.children(arguments).len(), 2);
        assert_eq!(invocation.typed_arguments(&dom), vec![GlowValue::Boolean(true)]);
    }

    #[test]
    fn test_invocation_result() {
        let mut dom = Dom::new();
        let result = InvocationResult::create(&mut dom, tags::ROOT);
        assert!(result.success(&dom));
        assert_eq!(result.invocation_id(&dom), NO_INVOCATION_ID);

        result.set_invocation_id(&mut dom, 7).unwrap();
        result.set_success(&mut dom, false).unwrap();
        result
            .set_typed_result(&mut dom, [GlowValue::Octets(Bytes::from_static(b"ok"))])
            .unwrap();

        assert!(!result.success(&dom));
        assert_eq!(result.invocation_id(&dom), 7);
        assert_eq!(
            result.typed_result(&dom),
            vec![GlowValue::Octets(Bytes::from_static(b"ok"))]
        );
    }

    #[test]
    fn test_invoke_command() {
        let mut dom = Dom::new();
        let command = Command::create_default(&mut dom);
        assert!(command.invocation(&dom).is_none());
        command.set_command_type(&mut dom, CommandType::Invoke).unwrap();

        let invocation = command.invocation_mut(&mut dom).unwrap();
        invocation.set_invocation_id(&mut dom, 1).unwrap();
        assert_eq!(command.invocation_mut(&mut dom).unwrap(), invocation);
        assert_eq!(command.invocation(&dom), Some(invocation));
        assert_eq!(command.command_type(&dom), Some(CommandType::Invoke));
        assert_eq!(command.number(&dom), Some(33));
    }
}
