//! Ember+ object tree and Glow element views.
//!
//! The [`Dom`] owns an arena of tagged nodes that mirrors the BER structure
//! of a Glow message one to one. Decoding a payload yields a tree of leaves
//! and containers; typed handles such as [`Node`], [`Parameter`] and
//! [`Function`] then interpret containers by their type tag.
//!
//! # Example
//!
//! ```
//! use emberwire_glow::{
//!     Dom, Function, FunctionContents, GlowElement, HasIdentifier, ParameterType,
//!     RootElementCollection,
//! };
//!
//! let mut dom = Dom::new();
//! let root = RootElementCollection::create_root(&mut dom);
//! let add: Function = root.add(&mut dom).unwrap();
//! add.set_identifier(&mut dom, "add").unwrap();
//! add.add_argument(&mut dom, "a", ParameterType::Integer).unwrap();
//!
//! let bytes = dom.to_bytes(root.id()).unwrap();
//! let (decoded, decoded_root) = Dom::decode(&bytes).unwrap();
//! let root = RootElementCollection::cast(&decoded, decoded_root).unwrap();
//! let functions = root.elements::<Function>(&decoded);
//! assert_eq!(functions[0].identifier(&decoded), "add");
//! ```

pub mod codec;
pub mod collection;
pub mod dom;
pub mod element;
pub mod error;
pub mod function;
pub mod glow_type;
pub mod invocation;
pub mod node;
pub mod parameter;
pub mod snapshot;
pub mod tags;
pub mod value;

pub use codec::MAX_DEPTH;
pub use collection::{ElementCollection, Root, RootElementCollection};
pub use dom::{Dom, NodeId, NodeKind};
pub use element::{
    collect_typed, visit_typed, GlowElement, HasArguments, HasChildren, HasContents,
    HasDescription, HasIdentifier, HasNumber, HasPath,
};
pub use error::{DomError, Result};
pub use function::{Function, FunctionContents, QualifiedFunction, TupleItemDescription};
pub use glow_type::GlowType;
pub use invocation::{Command, CommandType, Invocation, InvocationResult, NO_INVOCATION_ID};
pub use node::{Node, NodeContents, QualifiedNode};
pub use parameter::{Parameter, ParameterContents, QualifiedParameter};
pub use snapshot::NodeSnapshot;
pub use value::{GlowValue, ParameterAccess, ParameterType};
