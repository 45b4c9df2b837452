//! Built-in pattern catalog.
//!
//! Each pattern is an independent grammar rule implementing the
//! [`Pattern`](crate::pattern::Pattern) contract; the engine picks among
//! them by signature, shape check and priority. Hosts may extend the
//! registry with their own patterns.

pub mod content;
pub mod increment;
pub mod operator;
pub mod singleton;

pub use content::ContentPattern;
pub use increment::IncrementPattern;
pub use operator::OperatorPattern;
pub use singleton::SingletonPattern;

use crate::pattern::PatternRegistry;

/// The built-in patterns, registered in a fixed order so that priority
/// ties resolve the same way on every parse.
pub fn default_registry() -> PatternRegistry {
    let mut registry = PatternRegistry::new();
    registry.register(ContentPattern);
    registry.register(IncrementPattern);
    registry.register(OperatorPattern);
    registry.register(SingletonPattern);
    registry
}
