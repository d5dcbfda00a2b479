//! Two-way mapping between a pair of types.

use automapper_core::{MapError, Mappable};

use crate::engine::MappingEngine;
use crate::mapper::Mapper;

/// Maps `A -> B` and `B -> A` on one engine.
///
/// The two directions are independent pairs: configuring one never touches the
/// other.
///
/// ```
/// use automapper::{BidirectionalMapper, Mappable, MappingEngine};
///
/// #[derive(Clone, Default, Mappable)]
/// struct Entity { id: i64, title: String }
///
/// #[derive(Clone, Default, Mappable)]
/// struct Dto { id: i64, name: String }
///
/// let engine = MappingEngine::new();
/// let mapper = BidirectionalMapper::<Entity, Dto>::new(&engine);
/// mapper
///     .configure_forward(|m| { m.configure_mapping([("title", "name")]); })
///     .configure_reverse(|m| { m.configure_mapping([("name", "title")]); });
///
/// let dto = mapper.map_forward(&Entity { id: 1, title: "x".into() })?;
/// let back = mapper.map_reverse(&dto)?;
/// assert_eq!(back.title, "x");
/// # Ok::<(), automapper::MapError>(())
/// ```
#[derive(Debug)]
pub struct BidirectionalMapper<'e, A, B> {
    forward: Mapper<'e, A, B>,
    reverse: Mapper<'e, B, A>,
}

impl<A, B> Clone for BidirectionalMapper<'_, A, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A, B> Copy for BidirectionalMapper<'_, A, B> {}

impl<A: Mappable, B: Mappable> BidirectionalMapper<'static, A, B> {
    /// Bidirectional mapper on the global engine.
    pub fn global() -> Self {
        Self::new(MappingEngine::global())
    }
}

impl<'e, A: Mappable, B: Mappable> BidirectionalMapper<'e, A, B> {
    pub fn new(engine: &'e MappingEngine) -> Self {
        Self {
            forward: Mapper::new(engine),
            reverse: Mapper::new(engine),
        }
    }

    pub fn map_forward(&self, source: &A) -> Result<B, MapError> {
        self.forward.map(source)
    }

    pub fn map_reverse(&self, source: &B) -> Result<A, MapError> {
        self.reverse.map(source)
    }

    /// Configure the `A -> B` direction.
    pub fn configure_forward<F>(&self, configure: F) -> &Self
    where
        F: FnOnce(&Mapper<'e, A, B>),
    {
        configure(&self.forward);
        self
    }

    /// Configure the `B -> A` direction.
    pub fn configure_reverse<F>(&self, configure: F) -> &Self
    where
        F: FnOnce(&Mapper<'e, B, A>),
    {
        configure(&self.reverse);
        self
    }

    pub fn forward(&self) -> &Mapper<'e, A, B> {
        &self.forward
    }

    pub fn reverse(&self) -> &Mapper<'e, B, A> {
        &self.reverse
    }
}
