use emberwire_ber::{Tag, Value};

use crate::dom::Dom;
use crate::element::{
    flag, glow_element, text, HasChildren, HasContents, HasDescription, HasIdentifier, HasNumber,
    HasPath,
};
use crate::error::Result;
use crate::tags;
use crate::value::{GlowValue, ParameterAccess, ParameterType};

glow_element!(
    /// A leaf of the provider tree holding a value.
    Parameter => Parameter
);

glow_element!(
    /// A parameter addressed by its full path.
    QualifiedParameter => QualifiedParameter
);

/// Parameter-specific fields of the contents set.
pub trait ParameterContents: HasContents {
    fn value(self, dom: &Dom) -> Option<GlowValue> {
        self.glow_value(dom, tags::parameter::VALUE)
    }

    fn set_value(self, dom: &mut Dom, value: impl Into<GlowValue>) -> Result<()> {
        self.set_glow_value(dom, tags::parameter::VALUE, value.into())
    }

    fn minimum(self, dom: &Dom) -> Option<GlowValue> {
        self.glow_value(dom, tags::parameter::MINIMUM)
    }

    fn set_minimum(self, dom: &mut Dom, minimum: impl Into<GlowValue>) -> Result<()> {
        self.set_glow_value(dom, tags::parameter::MINIMUM, minimum.into())
    }

    fn maximum(self, dom: &Dom) -> Option<GlowValue> {
        self.glow_value(dom, tags::parameter::MAXIMUM)
    }

    fn set_maximum(self, dom: &mut Dom, maximum: impl Into<GlowValue>) -> Result<()> {
        self.set_glow_value(dom, tags::parameter::MAXIMUM, maximum.into())
    }

    fn default_value(self, dom: &Dom) -> Option<GlowValue> {
        self.glow_value(dom, tags::parameter::DEFAULT)
    }

    fn set_default_value(self, dom: &mut Dom, value: impl Into<GlowValue>) -> Result<()> {
        self.set_glow_value(dom, tags::parameter::DEFAULT, value.into())
    }

    fn access(self, dom: &Dom) -> ParameterAccess {
        self.content_value(dom, tags::parameter::ACCESS)
            .and_then(Value::as_integer)
            .and_then(ParameterAccess::from_code)
            .unwrap_or_default()
    }

    fn set_access(self, dom: &mut Dom, access: ParameterAccess) -> Result<()> {
        self.set_content_value(dom, tags::parameter::ACCESS, access.code())
    }

    /// Declared type, falling back to the type of the current value.
    fn parameter_type(self, dom: &Dom) -> ParameterType {
        self.content_value(dom, tags::parameter::TYPE)
            .and_then(Value::as_integer)
            .and_then(ParameterType::from_code)
            .or_else(|| self.value(dom).map(|value| value.parameter_type()))
            .unwrap_or_default()
    }

    fn set_parameter_type(self, dom: &mut Dom, kind: ParameterType) -> Result<()> {
        self.set_content_value(dom, tags::parameter::TYPE, kind.code())
    }

    fn is_online(self, dom: &Dom) -> bool {
        flag(self.content_value(dom, tags::parameter::IS_ONLINE), true)
    }

    fn set_is_online(self, dom: &mut Dom, is_online: bool) -> Result<()> {
        self.set_content_value(dom, tags::parameter::IS_ONLINE, is_online)
    }

    fn format(self, dom: &Dom) -> String {
        text(self.content_value(dom, tags::parameter::FORMAT))
    }

    fn set_format(self, dom: &mut Dom, format: &str) -> Result<()> {
        self.set_content_value(dom, tags::parameter::FORMAT, format)
    }

    /// Enumeration entries, one per line on the wire.
    fn enumeration(self, dom: &Dom) -> Vec<String> {
        text(self.content_value(dom, tags::parameter::ENUMERATION))
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn set_enumeration<I, S>(self, dom: &mut Dom, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = entries
            .into_iter()
            .map(|entry| entry.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        self.set_content_value(dom, tags::parameter::ENUMERATION, joined)
    }

    fn factor(self, dom: &Dom) -> Option<i64> {
        self.content_value(dom, tags::parameter::FACTOR)
            .and_then(Value::as_integer)
    }

    fn set_factor(self, dom: &mut Dom, factor: i64) -> Result<()> {
        self.set_content_value(dom, tags::parameter::FACTOR, factor)
    }

    fn step(self, dom: &Dom) -> Option<i64> {
        self.content_value(dom, tags::parameter::STEP)
            .and_then(Value::as_integer)
    }

    fn set_step(self, dom: &mut Dom, step: i64) -> Result<()> {
        self.set_content_value(dom, tags::parameter::STEP, step)
    }

    fn stream_identifier(self, dom: &Dom) -> Option<i64> {
        self.content_value(dom, tags::parameter::STREAM_IDENTIFIER)
            .and_then(Value::as_integer)
    }

    fn set_stream_identifier(self, dom: &mut Dom, identifier: i64) -> Result<()> {
        self.set_content_value(dom, tags::parameter::STREAM_IDENTIFIER, identifier)
    }

    #[doc(hidden)]
    fn glow_value(self, dom: &Dom, slot: Tag) -> Option<GlowValue> {
        self.content_value(dom, slot).and_then(GlowValue::from_ber)
    }

    #[doc(hidden)]
    fn set_glow_value(self, dom: &mut Dom, slot: Tag, value: GlowValue) -> Result<()> {
        self.set_content_value(dom, slot, value)
    }
}

impl HasNumber for Parameter {}
impl HasContents for Parameter {}
impl HasIdentifier for Parameter {}
impl HasDescription for Parameter {}
impl HasChildren for Parameter {}
impl ParameterContents for Parameter {}

impl HasPath for QualifiedParameter {}
impl HasContents for QualifiedParameter {}
impl HasIdentifier for QualifiedParameter {}
impl HasDescription for QualifiedParameter {}
impl HasChildren for QualifiedParameter {}
impl ParameterContents for QualifiedParameter {}

#[cfg(test)]
mod tests {
    use emberwire_ber::RelativeOid;

    use super::*;
    use crate::element::GlowElement;

    #[test]
    fn test_defaults() {
        let mut dom = Dom::new();
        let param = Parameter::create_default(&mut dom);

        assert_eq!(param.value(&dom), None);
        assert_eq!(param.access(&dom), ParameterAccess::Read);
        assert_eq!(param.parameter_type(&dom), ParameterType::Null);
        assert!(param.is_online(&dom));
        assert!(param.enumeration(&dom).is_empty());
        assert_eq!(param.format(&dom), "");
    }

    #[test]
    fn test_value_range_and_type() {
        let mut dom = Dom::new();
        let param = Parameter::create_default(&mut dom);
        param.set_identifier(&mut dom, "gain").unwrap();
        param.set_value(&mut dom, -12.5).unwrap();
        param.set_minimum(&mut dom, -128.0).unwrap();
        param.set_maximum(&mut dom, 15.0).unwrap();
        param.set_access(&mut dom, ParameterAccess::ReadWrite).unwrap();

        assert_eq!(param.value(&dom), Some(GlowValue::Real(-12.5)));
        assert_eq!(param.minimum(&dom), Some(GlowValue::Real(-128.0)));
        assert_eq!(param.maximum(&dom), Some(GlowValue::Real(15.0)));
        assert_eq!(param.access(&dom), ParameterAccess::ReadWrite);
        assert_eq!(param.parameter_type(&dom), ParameterType::Real);

        param.set_parameter_type(&mut dom, ParameterType::Enum).unwrap();
        assert_eq!(param.parameter_type(&dom), ParameterType::Enum);

        param.set_value(&mut dom, 3).unwrap();
        assert_eq!(param.value(&dom), Some(GlowValue::Integer(3)));
    }

    #[test]
    fn test_enumeration_lines() {
        let mut dom = Dom::new();
        let param = Parameter::create_default(&mut dom);
        param
            .set_enumeration(&mut dom, ["Off", "Low", "High"])
            .unwrap();
        assert_eq!(param.enumeration(&dom), vec!["Off", "Low", "High"]);
    }

    #[test]
    fn test_qualified_parameter_shares_accessors() {
        let mut dom = Dom::new();
        let param = QualifiedParameter::create_default(&mut dom);
        param.set_path(&mut dom, RelativeOid::new(vec![1, 4])).unwrap();
        param.set_value(&mut dom, "Studio A").unwrap();
        param.set_is_online(&mut dom, false).unwrap();

        assert_eq!(param.value(&dom), Some(GlowValue::from("Studio A")));
        assert!(!param.is_online(&dom));
        assert_eq!(param.path(&dom), RelativeOid::new(vec![1, 4]));
    }
}
