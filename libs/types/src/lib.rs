//! # Type Identity Registry
//!
//! Runtime type identification for type-erased message tuples.
//!
//! Every element carried in a message tuple has two identities:
//!
//! - a **type number** ([`TypeNumber`]): a small integer assigned by the
//!   [`TypeRegistry`], used as the cheap fast-path hint
//! - a **runtime type token** ([`RuntimeType`]): the authoritative language-level
//!   identity (`TypeId`), used to reject number collisions between foreign
//!   type domains
//!
//! Both travel together as an [`RttiPair`]. The ordered sequence of element type
//! numbers is summarised by a 32-bit **type token** ([`make_type_token`]) used as
//! an O(1) pre-filter before per-element matching.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec → libs/actors → libs/network
//!     ↑                          ↓
//! Type numbers            Tuples, views, dispatch
//! Type tokens             apply / behaviors
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use types::{TypeRegistry, RuntimeType};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Vec<i32>>("Vec<i32>").unwrap();
//!
//! let rtti = registry.rtti_of::<i32>();
//! assert_eq!(rtti.runtime, RuntimeType::of::<i32>());
//!
//! let token = registry.type_token_of::<(i32, String)>();
//! assert_eq!(token, registry.type_token_of::<(i32, String)>());
//! ```

pub mod error;
pub mod identity;
pub mod registry;
pub mod token;
pub mod type_list;

pub use error::{RegistryError, Result};
pub use identity::{RttiPair, RuntimeType, TypeNumber, NO_TYPE_NUMBER};
pub use registry::{BuiltinType, TypeRegistry, FIRST_CUSTOM_TYPE_NUMBER};
pub use token::{make_type_token, TypeTokenBuilder, EMPTY_TYPE_TOKEN};
pub use type_list::TypeList;
