//! Value model for Overlay.
//!
//! This crate provides the dynamic value representation that the merge
//! engine operates on. Every other Overlay crate depends on `overlay-types`.
//!
//! # Key Types
//!
//! - [`Value`]: Tagged union of absent, primitive and composite values
//! - [`Object`]: Shared handle to a composite, compared by identity
//! - [`Composite`]: The closed set of composite kinds (records, sequences, maps, sets, ...)
//! - [`TypeDescriptor`] / [`Prototype`]: Nominal type identity of a composite
//! - [`Token`]: Identity-only marker value, including [`Token::DONT_MERGE`]
//! - [`Key`] / [`FieldKey`]: Map/set keys and record field names

pub mod descriptor;
pub mod key;
pub mod object;
pub mod token;
pub mod value;

pub use descriptor::{Prototype, TypeDescriptor};
pub use key::{FieldKey, Key};
pub use object::{
    Boxed, Callable, Composite, ForeignObject, HostHandle, MapObject, Object, Pattern, Record,
    Sequence, SetObject,
};
pub use token::Token;
pub use value::Value;
