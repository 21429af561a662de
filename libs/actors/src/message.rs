//! # Owning Message Tuples
//!
//! - [`MessageTuple`]: owns its elements; what a received or copied message
//!   lives in
//! - [`Message`]: reference-counted handle to a [`MessageTuple`], the unit
//!   passed between actors. Cloning a handle is cheap and marks the tuple
//!   [`shared`](TypeErasedTuple::shared); mutation through a shared handle
//!   first detaches a private copy.
//!
//! ```rust
//! use messaging_actors::{Message, MessageTuple, TupleExt, TypeErasedTuple};
//! use types::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let original = Message::new(MessageTuple::builder(&registry).push(1i32).build());
//!
//! let mut other = original.clone();
//! assert!(other.shared());
//! *other.get_mutable_as::<i32>(0).unwrap() = 2;
//!
//! assert_eq!(original.to_string(), "(1)");
//! assert_eq!(other.to_string(), "(2)");
//! ```

use crate::element::Element;
use crate::error::Result;
use crate::tuple::{check_pos, TypeErasedTuple};
use crate::value::{load_all, ErasedValue, TypeErasedValue};
use codec::{BinaryDeserializer, BinarySerializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use types::{make_type_token, RttiPair, TypeRegistry};

/// Tuple owning its elements
#[derive(Clone)]
pub struct MessageTuple {
    elements: Vec<ErasedValue>,
    token: u32,
}

impl MessageTuple {
    pub fn builder(registry: &TypeRegistry) -> MessageBuilder<'_> {
        MessageBuilder {
            registry,
            elements: Vec::new(),
        }
    }

    /// Tuple over owned values, in order
    pub fn from_values(elements: Vec<ErasedValue>) -> Self {
        let token = make_type_token(elements.iter().map(|value| &value.rtti));
        Self { elements, token }
    }

    /// Deep copy of any tuple
    pub fn copy_from<T: TypeErasedTuple + ?Sized>(tuple: &T) -> Result<Self> {
        let elements = (0..tuple.size())
            .map(|pos| tuple.copy(pos))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_values(elements))
    }

    pub fn into_values(self) -> Vec<ErasedValue> {
        self.elements
    }

    fn element(&self, pos: usize) -> Result<&ErasedValue> {
        check_pos(pos, self.elements.len())?;
        Ok(&self.elements[pos])
    }

    fn element_mut(&mut self, pos: usize) -> Result<&mut ErasedValue> {
        check_pos(pos, self.elements.len())?;
        Ok(&mut self.elements[pos])
    }
}

impl TypeErasedTuple for MessageTuple {
    fn get_mutable(&mut self, pos: usize) -> Result<&mut dyn Any> {
        Ok(self.element_mut(pos)?.get_mutable())
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Any> {
        self.elements
            .iter_mut()
            .map(|value| value.get_mutable())
            .collect()
    }

    fn load_at(&mut self, pos: usize, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        self.element_mut(pos)?.load(source)
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn type_token(&self) -> u32 {
        self.token
    }

    fn element_type(&self, pos: usize) -> Result<RttiPair> {
        Ok(self.element(pos)?.rtti)
    }

    fn get(&self, pos: usize) -> Result<&dyn Any> {
        Ok(self.element(pos)?.get())
    }

    fn stringify_at(&self, pos: usize) -> Result<String> {
        Ok(self.element(pos)?.stringify())
    }

    fn copy(&self, pos: usize) -> Result<ErasedValue> {
        Ok(self.element(pos)?.clone())
    }

    fn save_at(&self, pos: usize, sink: &mut BinarySerializer) -> Result<()> {
        self.element(pos)?.save(sink)
    }

    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        let mut targets: Vec<&mut (dyn Element + 'static)> = self
            .elements
            .iter_mut()
            .map(|value| &mut *value.value)
            .collect();
        load_all(&mut targets, source)
    }
}

impl fmt::Display for MessageTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

impl fmt::Debug for MessageTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageTuple")
            .field("type_token", &format_args!("{:#010x}", self.token))
            .field("elements", &self.elements)
            .finish()
    }
}

/// Incremental construction of a [`MessageTuple`]
pub struct MessageBuilder<'r> {
    registry: &'r TypeRegistry,
    elements: Vec<ErasedValue>,
}

impl MessageBuilder<'_> {
    /// Append one element
    pub fn push<T: Element>(mut self, value: T) -> Self {
        self.elements.push(ErasedValue::new(self.registry, value));
        self
    }

    pub fn build(self) -> MessageTuple {
        MessageTuple::from_values(self.elements)
    }
}

/// Reference-counted, copy-on-write message
#[derive(Clone)]
pub struct Message {
    data: Arc<MessageTuple>,
}

impl Message {
    pub fn new(tuple: MessageTuple) -> Self {
        Self {
            data: Arc::new(tuple),
        }
    }

    /// Read access to the underlying tuple
    pub fn tuple(&self) -> &MessageTuple {
        &self.data
    }

    /// Number of handles to the same tuple
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }

    /// Private mutable tuple, copying it first if other handles exist
    pub fn detach(&mut self) -> &mut MessageTuple {
        if Arc::strong_count(&self.data) > 1 {
            debug!(
                handles = Arc::strong_count(&self.data),
                arity = self.data.size(),
                "Detaching shared message"
            );
        }
        Arc::make_mut(&mut self.data)
    }

    /// The owned tuple, copied only if other handles exist
    pub fn into_tuple(self) -> MessageTuple {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl From<MessageTuple> for Message {
    fn from(tuple: MessageTuple) -> Self {
        Self::new(tuple)
    }
}

impl TypeErasedTuple for Message {
    fn get_mutable(&mut self, pos: usize) -> Result<&mut dyn Any> {
        check_pos(pos, self.size())?;
        self.detach().get_mutable(pos)
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Any> {
        self.detach().elements_mut()
    }

    fn load_at(&mut self, pos: usize, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        check_pos(pos, self.size())?;
        self.detach().load_at(pos, source)
    }

    fn size(&self) -> usize {
        self.data.size()
    }

    fn type_token(&self) -> u32 {
        self.data.type_token()
    }

    fn element_type(&self, pos: usize) -> Result<RttiPair> {
        self.data.element_type(pos)
    }

    fn get(&self, pos: usize) -> Result<&dyn Any> {
        self.data.get(pos)
    }

    fn stringify_at(&self, pos: usize) -> Result<String> {
        self.data.stringify_at(pos)
    }

    fn copy(&self, pos: usize) -> Result<ErasedValue> {
        self.data.copy(pos)
    }

    fn save_at(&self, pos: usize, sink: &mut BinarySerializer) -> Result<()> {
        self.data.save_at(pos, sink)
    }

    fn shared(&self) -> bool {
        Arc::strong_count(&self.data) > 1
    }

    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        self.detach().load(source)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.data, f)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("handles", &self.handle_count())
            .field("tuple", &*self.data)
            .finish()
    }
}
