//! Outer tags of the Glow DTD.
//!
//! Each element stores its fields under context tags. The constants below
//! are grouped by the element (or contents set) that owns them.

use emberwire_ber::Tag;

/// Outer tag of a complete Glow message.
pub const ROOT: Tag = Tag::application(0);

/// Outer tag of every item inside a collection or argument list.
pub const ELEMENT_DEFAULT: Tag = Tag::context(0);

/// Fields shared by every element that has a contents set.
pub mod contents {
    use super::Tag;

    pub const IDENTIFIER: Tag = Tag::context(0);
    pub const DESCRIPTION: Tag = Tag::context(1);
}

/// Top-level fields of Node, Parameter and Function.
pub mod element {
    use super::Tag;

    pub const NUMBER: Tag = Tag::context(0);
    pub const CONTENTS: Tag = Tag::context(1);
    pub const CHILDREN: Tag = Tag::context(2);
}

/// Top-level fields of the qualified (path addressed) elements.
pub mod qualified {
    use super::Tag;

    pub const PATH: Tag = Tag::context(0);
    pub const CONTENTS: Tag = Tag::context(1);
    pub const CHILDREN: Tag = Tag::context(2);
}

pub mod node {
    use super::Tag;

    pub const IS_ROOT: Tag = Tag::context(2);
    pub const IS_ONLINE: Tag = Tag::context(3);
    pub const SCHEMA_IDENTIFIERS: Tag = Tag::context(4);
}

pub mod parameter {
    use super::Tag;

    pub const VALUE: Tag = Tag::context(2);
    pub const MINIMUM: Tag = Tag::context(3);
    pub const MAXIMUM: Tag = Tag::context(4);
    pub const ACCESS: Tag = Tag::context(5);
    pub const FORMAT: Tag = Tag::context(6);
    pub const ENUMERATION: Tag = Tag::context(7);
    pub const FACTOR: Tag = Tag::context(8);
    pub const IS_ONLINE: Tag = Tag::context(9);
    pub const FORMULA: Tag = Tag::context(10);
    pub const STEP: Tag = Tag::context(11);
    pub const DEFAULT: Tag = Tag::context(12);
    pub const TYPE: Tag = Tag::context(13);
    pub const STREAM_IDENTIFIER: Tag = Tag::context(14);
}

pub mod function {
    use super::Tag;

    pub const ARGUMENTS: Tag = Tag::context(2);
    pub const RESULT: Tag = Tag::context(3);
}

pub mod command {
    use super::Tag;

    pub const NUMBER: Tag = Tag::context(0);
    pub const DIR_FIELD_MASK: Tag = Tag::context(1);
    pub const INVOCATION: Tag = Tag::context(2);
}

pub mod tuple_item {
    use super::Tag;

    pub const TYPE: Tag = Tag::context(0);
    pub const NAME: Tag = Tag::context(1);
}

pub mod invocation {
    use super::Tag;

    pub const INVOCATION_ID: Tag = Tag::context(0);
    pub const ARGUMENTS: Tag = Tag::context(1);
}

pub mod invocation_result {
    use super::Tag;

    pub const INVOCATION_ID: Tag = Tag::context(0);
    pub const SUCCESS: Tag = Tag::context(1);
    pub const RESULT: Tag = Tag::context(2);
}
