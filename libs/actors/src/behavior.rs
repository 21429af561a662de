//! # Behaviors
//!
//! An actor's reaction to incoming messages: an ordered list of typed
//! handlers. [`Behavior::invoke`] tries them in registration order and runs
//! the first whose parameter list matches the tuple; a fallback, if set,
//! receives every tuple nothing else matched.
//!
//! ```rust
//! use messaging_actors::{Behavior, MessageTuple, TypeErasedTuple};
//! use types::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let mut behavior = Behavior::new()
//!     .on(|n: &i32| format!("int {}", n))
//!     .on(|s: &String| format!("text {}", s))
//!     .or_else(|tuple| format!("unexpected {}", tuple.stringify()));
//!
//! let mut msg = MessageTuple::builder(&registry).push("hi".to_string()).build();
//! assert_eq!(behavior.invoke(&mut msg).as_deref(), Some("text hi"));
//! ```

use crate::dispatch::{dispatch, dispatch_mut, Handler, HandlerMut};
use crate::tuple::TypeErasedTuple;
use std::fmt;
use tracing::{debug, trace};
use types::{RuntimeType, TypeList};

type CaseFn<R> = Box<dyn FnMut(&mut dyn TypeErasedTuple) -> Option<R> + Send>;
type FallbackFn<R> = Box<dyn FnMut(&dyn TypeErasedTuple) -> R + Send>;

struct Case<R> {
    signature: Vec<RuntimeType>,
    run: CaseFn<R>,
}

/// Dispatch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Tuples handled by a typed handler
    pub matched: u64,
    /// Tuples handled by the fallback
    pub fallback: u64,
    /// Tuples nothing handled
    pub unmatched: u64,
}

impl DispatchStats {
    pub fn total(&self) -> u64 {
        self.matched + self.fallback + self.unmatched
    }
}

/// Ordered set of message handlers producing `R`
pub struct Behavior<R> {
    cases: Vec<Case<R>>,
    fallback: Option<FallbackFn<R>>,
    stats: DispatchStats,
}

impl<R: 'static> Behavior<R> {
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            fallback: None,
            stats: DispatchStats::default(),
        }
    }

    /// Add a handler taking read-only element references
    pub fn on<Args, F>(mut self, handler: F) -> Self
    where
        Args: TypeList,
        F: Handler<Args, Output = R> + Send + 'static,
    {
        let mut handler = handler;
        self.cases.push(Case {
            signature: Args::runtime_types(),
            run: Box::new(move |tuple: &mut dyn TypeErasedTuple| {
                dispatch::<Args, F, _>(&*tuple, &mut handler)
            }),
        });
        self
    }

    /// Add a handler taking mutable element references
    ///
    /// It is skipped for shared tuples.
    pub fn on_mut<Args, F>(mut self, handler: F) -> Self
    where
        Args: TypeList,
        F: HandlerMut<Args, Output = R> + Send + 'static,
    {
        let mut handler = handler;
        self.cases.push(Case {
            signature: Args::runtime_types(),
            run: Box::new(move |tuple: &mut dyn TypeErasedTuple| {
                dispatch_mut::<Args, F, _>(tuple, &mut handler)
            }),
        });
        self
    }

    /// Handler for every tuple no typed handler matched
    pub fn or_else<F>(mut self, fallback: F) -> Self
    where
        F: FnMut(&dyn TypeErasedTuple) -> R + Send + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Run the first matching handler; `None` if nothing handled the tuple
    pub fn invoke(&mut self, tuple: &mut dyn TypeErasedTuple) -> Option<R> {
        let arity = tuple.size();
        for (index, case) in self.cases.iter_mut().enumerate() {
            if case.signature.len() != arity {
                continue;
            }
            if let Some(result) = (case.run)(&mut *tuple) {
                trace!(handler = index, arity, "Dispatched message");
                self.stats.matched += 1;
                return Some(result);
            }
        }

        match self.fallback.as_mut() {
            Some(fallback) => {
                trace!(arity, "Dispatched message to fallback");
                self.stats.fallback += 1;
                Some(fallback(&*tuple))
            }
            None => {
                debug!(
                    arity,
                    type_token = format_args!("{:#010x}", tuple.type_token()),
                    message = %tuple.stringify(),
                    "No handler matched message"
                );
                self.stats.unmatched += 1;
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.fallback.is_none()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

impl<R: 'static> Default for Behavior<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Behavior<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signatures: Vec<String> = self
            .cases
            .iter()
            .map(|case| {
                let names: Vec<&str> = case.signature.iter().map(|t| t.name()).collect();
                format!("({})", names.join(", "))
            })
            .collect();
        f.debug_struct("Behavior")
            .field("handlers", &signatures)
            .field("fallback", &self.fallback.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{make_view, EmptyTuple, Message, MessageTuple};
    use types::TypeRegistry;

    #[test]
    fn test_first_match_wins() {
        let registry = TypeRegistry::new();
        let mut behavior = Behavior::new()
            .on(|_: &i32| "first")
            .on(|_: &i32| "second")
            .on(|| "empty");

        let mut msg = MessageTuple::builder(&registry).push(1i32).build();
        assert_eq!(behavior.invoke(&mut msg), Some("first"));
        assert_eq!(behavior.invoke(&mut EmptyTuple), Some("empty"));
        assert_eq!(behavior.len(), 3);
        assert_eq!(behavior.stats().matched, 2);
    }

    #[test]
    fn test_unmatched_and_fallback() {
        let registry = TypeRegistry::new();
        let mut msg = MessageTuple::builder(&registry)
            .push(1.5f64)
            .push(true)
            .build();

        let mut strict = Behavior::new().on(|_: &f64| 1u8);
        assert_eq!(strict.invoke(&mut msg), None);
        assert_eq!(strict.stats().unmatched, 1);

        let mut lenient = Behavior::new()
            .on(|_: &f64| 1usize)
            .or_else(|tuple| tuple.size());
        assert_eq!(lenient.invoke(&mut msg), Some(2));
        assert_eq!(lenient.stats().fallback, 1);
        assert_eq!(lenient.stats().total(), 1);
    }

    #[test]
    fn test_mutable_handler_updates_view() {
        let registry = TypeRegistry::new();
        let mut hits = 0u32;
        let mut behavior = Behavior::new().on_mut(|n: &mut u32| {
            *n += 1;
            *n
        });

        for expected in 1..=3 {
            let mut view = make_view(&registry, (&mut hits,));
            assert_eq!(behavior.invoke(&mut view), Some(expected));
        }
        assert_eq!(hits, 3);
    }

    #[test]
    fn test_mutable_handler_skipped_for_shared_message() {
        let registry = TypeRegistry::new();
        let mut behavior = Behavior::new()
            .on_mut(|n: &mut i32| {
                *n = 0;
                "mutated"
            })
            .on(|_: &i32| "read");

        let mut msg = Message::new(MessageTuple::builder(&registry).push(5i32).build());
        let _other = msg.clone();
        assert_eq!(behavior.invoke(&mut msg), Some("read"));
        assert_eq!(msg.to_string(), "(5)");
    }

    #[test]
    fn test_debug_lists_signatures() {
        let behavior: Behavior<()> = Behavior::new().on(|_: &i32, _: &String| ());
        let rendered = format!("{:?}", behavior);
        assert!(rendered.contains("(i32, alloc::string::String)"));
    }
}
