//! Progressive rendering of result lists.
//!
//! Items are turned into elements one at a time and appended to a
//! [`Container`], with a fixed pause between appends so the list fills in
//! gradually. Containers are generational: clearing one starts a new
//! generation, and a render started for an older generation stops at its next
//! append instead of writing stale elements into the new list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Pause between two appended elements when nothing else is configured.
pub const DEFAULT_PACING: Duration = Duration::from_millis(50);

/// Identifies one filling of a container, from one `clear` to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Output surface for rendered elements.
pub trait Container: Send {
    type Element;

    /// Remove every element and start a new generation, returning it.
    fn clear(&mut self) -> Generation;

    /// The generation currently being filled.
    fn generation(&self) -> Generation;

    /// Append one element to the current generation.
    fn append(&mut self, element: Self::Element);
}

/// Container handle shared between a session and whoever displays it.
pub type SharedContainer<C> = Arc<Mutex<C>>;

/// In-memory container that keeps its elements in order.
#[derive(Debug)]
pub struct ResultsPanel<E> {
    generation: Generation,
    elements: Vec<E>,
}

impl<E> Default for ResultsPanel<E> {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            elements: Vec::new(),
        }
    }
}

impl<E> ResultsPanel<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<E: Send> Container for ResultsPanel<E> {
    type Element = E;

    fn clear(&mut self) -> Generation {
        self.elements.clear();
        self.generation = self.generation.next();
        self.generation
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn append(&mut self, element: E) {
        self.elements.push(element);
    }
}

/// How a render run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every item was appended.
    Rendered(usize),
    /// There was nothing to render. The caller decides what to show.
    Empty,
    /// The container was cleared mid-run; the rest of the items were dropped.
    Superseded { appended: usize },
}

/// Appends elements one by one with a fixed pause in between.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveRenderer {
    pacing: Duration,
}

impl Default for ProgressiveRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PACING)
    }
}

impl ProgressiveRenderer {
    pub fn new(pacing: Duration) -> Self {
        Self { pacing }
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Render `items` in order into `container`.
    ///
    /// `ticket` is the generation returned when the caller cleared the
    /// container for this run. The lock is only held while appending, never
    /// across the pause.
    pub async fn render<T, C, F>(
        &self,
        items: &[T],
        container: &Mutex<C>,
        ticket: Generation,
        mut build: F,
    ) -> RenderOutcome
    where
        C: Container,
        F: FnMut(&T) -> C::Element,
    {
        if items.is_empty() {
            debug!("nothing to render");
            return RenderOutcome::Empty;
        }

        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing).await;
            }

            let mut target = container.lock().await;
            if target.generation() != ticket {
                debug!(
                    appended = index,
                    remaining = items.len() - index,
                    "container cleared, dropping stale render"
                );
                return RenderOutcome::Superseded { appended: index };
            }
            target.append(build(item));
            trace!(index, "element appended");
        }

        debug!(count = items.len(), "render complete");
        RenderOutcome::Rendered(items.len())
    }
}
