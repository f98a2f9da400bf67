//! Type-erased argument bundles
//!
//! Panels receive open-time parameters and event callbacks receive captured extra
//! arguments. Both are an immutable snapshot of arbitrary values, read back by index
//! and type.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Immutable, cheaply clonable list of arbitrary values
#[derive(Clone)]
pub struct Args {
    values: Rc<[Rc<dyn Any>]>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            values: Rc::from(Vec::new()),
        }
    }
}

impl Args {
    /// An empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new bundle with `value` appended
    pub fn with<T: Any>(self, value: T) -> Self {
        let mut values: Vec<Rc<dyn Any>> = self.values.iter().cloned().collect();
        values.push(Rc::new(value));
        Self {
            values: values.into(),
        }
    }

    /// Value at `index` if it exists and has type `T`
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// First value of type `T`
    pub fn find<T: Any>(&self) -> Option<&T> {
        self.values.iter().find_map(|v| v.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args").field("len", &self.values.len()).finish()
    }
}
