//! # Messaging Actors - Type-Erased Message Tuples
//!
//! ## Purpose
//!
//! Carries the arguments of a message through code that does not know their
//! concrete types, and dispatches them to statically typed handlers:
//!
//! - [`TypeErasedTuple`]: positional access, type identity, rendering,
//!   copying and serialization of a heterogeneous payload
//! - [`EmptyTuple`], [`TupleView`], [`MessageTuple`], [`Message`]: the
//!   empty tuple, a zero-copy view over local values, an owning tuple and
//!   its reference-counted copy-on-write handle
//! - [`TupleExt::apply`] / [`Behavior`]: pattern matching of a payload
//!   against handler parameter lists
//!
//! ## Architecture Role
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │ libs/types   │    │ libs/codec   │    │ libs/network         │
//! │ type numbers │───▶│ element bytes│───▶│ frames over sessions │
//! │ type tokens  │    │              │    │                      │
//! └──────┬───────┘    └──────┬───────┘    └──────────▲───────────┘
//!        │                   │                       │
//!        └──────────┬────────┘                       │
//!                   ▼                                │
//!        ┌─────────────────────┐   save / load       │
//!        │  [messaging-actors] │─────────────────────┘
//!        │  tuples, dispatch   │
//!        └─────────────────────┘
//! ```
//!
//! ## Matching
//!
//! Every element carries an [`RttiPair`](types::RttiPair): the registry type
//! number as a fast hint plus the runtime type as the authority. A handler
//! only runs when the arity matches and every element's runtime type equals
//! the corresponding parameter type. A mismatch yields `None`, never an
//! error.
//!
//! ## Example
//!
//! ```rust
//! use messaging_actors::{make_view, TupleExt, TypeErasedTuple};
//! use types::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let mut n = 42i32;
//! let mut s = "hi".to_string();
//! let view = make_view(&registry, (&mut n, &mut s));
//!
//! assert_eq!(view.size(), 2);
//! assert_eq!(
//!     view.apply(|n: &i32, s: &String| format!("{}{}", n, s)),
//!     Some("42hi".to_string())
//! );
//! assert_eq!(view.apply(|s: &String, n: &i32| s.len() + *n as usize), None);
//! ```
//!
//! ## Concurrency
//!
//! Tuples carry no synchronization. [`TypeErasedTuple::shared`] is advisory:
//! it keeps mutable dispatch away from tuples other owners can observe.
//! [`TypeErasedTuple::copy`] is the way to hand an element to another thread.

pub mod behavior;
pub mod dispatch;
pub mod element;
pub mod empty;
pub mod error;
pub mod message;
pub mod tuple;
pub mod value;
pub mod view;

pub use behavior::{Behavior, DispatchStats};
pub use dispatch::{Handler, HandlerMut, MAX_ARITY};
pub use element::Element;
pub use empty::EmptyTuple;
pub use error::{Result, TupleError};
pub use message::{Message, MessageBuilder, MessageTuple};
pub use tuple::{TupleExt, TypeErasedTuple};
pub use value::{ErasedRef, ErasedValue, TypeErasedValue};
pub use view::{make_view, IntoViewSlots, TupleView};
