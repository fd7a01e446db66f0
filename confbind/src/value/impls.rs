//! `Bind` implementations for standard library and `chrono` types.

use std::collections::TryReserveError;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use super::{Bind, List, Node, NodeMut, Optional, Scalar, ScalarMut, Sequence};
use crate::BindResult;

impl Bind for String {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Scalar::Str(self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar(ScalarMut::Str(self))
    }
}

impl Bind for bool {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Scalar::Bool(*self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar(ScalarMut::Bool(self))
    }
}

impl Bind for DateTime<FixedOffset> {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Scalar::DateTime(self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar(ScalarMut::DateTime(self))
    }
}

impl Bind for Duration {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Scalar::Duration(*self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar(ScalarMut::Duration(self))
    }
}

impl<T: Bind + Default> Optional for Option<T> {
    fn get(&self) -> Option<&dyn Bind> {
        self.as_ref().map(|value| value as &dyn Bind)
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn write_through(
        &mut self,
        write: &mut dyn FnMut(&mut dyn Bind) -> BindResult<bool>,
    ) -> BindResult<bool> {
        if let Some(value) = self {
            return write(value);
        }
        let mut fresh = T::default();
        let written = write(&mut fresh)?;
        if written {
            *self = Some(fresh);
        }
        Ok(written)
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    fn node(&self) -> Node<'_> {
        Node::Optional(Optional::get(self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Optional(self)
    }
}

impl<T: Bind + ?Sized> Bind for Box<T> {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        (**self).node_mut()
    }
}

impl<T: Bind + ?Sized> Bind for Rc<T> {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::ReadOnly
    }
}

impl<T: Bind + ?Sized> Bind for Arc<T> {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::ReadOnly
    }
}

impl<T: Bind> Sequence for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn element(&self, index: usize) -> Option<&dyn Bind> {
        self.get(index).map(|value| value as &dyn Bind)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Bind> {
        self.get_mut(index).map(|value| value as &mut dyn Bind)
    }
}

impl<T: Bind + Default> List for Vec<T> {
    fn try_reset_len(&mut self, len: usize) -> Result<(), TryReserveError> {
        self.try_reserve_exact(len.saturating_sub(self.len()))?;
        Vec::clear(self);
        self.resize_with(len, T::default);
        Ok(())
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    fn node(&self) -> Node<'_> {
        Node::List(self)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::List(self)
    }
}

impl<T: Bind, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element(&self, index: usize) -> Option<&dyn Bind> {
        self.get(index).map(|value| value as &dyn Bind)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Bind> {
        self.get_mut(index).map(|value| value as &mut dyn Bind)
    }
}

impl<T: Bind, const N: usize> Bind for [T; N] {
    fn node(&self) -> Node<'_> {
        Node::Array(self)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Array(self)
    }
}
