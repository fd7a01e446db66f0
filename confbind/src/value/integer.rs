//! Integer destinations of every primitive width.

use std::num::ParseIntError;

use super::{Bind, Node, NodeMut, Scalar, ScalarMut};

/// A primitive integer slot.
///
/// Sources produce either decimal text or a JSON number; both are narrowed to
/// the concrete width here, so overflow surfaces as a parse failure instead of
/// wrapping.
pub trait Integer {
    /// Name of the concrete type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Current value, widened losslessly.
    fn get(&self) -> i128;

    /// Parses base-10 `raw` and stores it.
    ///
    /// # Errors
    ///
    /// Returns the parser error when `raw` is not a valid integer of this
    /// width; the slot is left unchanged.
    fn parse_assign(&mut self, raw: &str) -> Result<(), ParseIntError>;

    /// Stores `value` if it fits, returning whether it did.
    fn try_assign(&mut self, value: i128) -> bool;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Integer for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn get(&self) -> i128 {
                *self as i128
            }

            fn parse_assign(&mut self, raw: &str) -> Result<(), ParseIntError> {
                *self = raw.parse::<$ty>()?;
                Ok(())
            }

            fn try_assign(&mut self, value: i128) -> bool {
                <$ty>::try_from(value).map(|narrowed| *self = narrowed).is_ok()
            }
        }

        impl Bind for $ty {
            fn node(&self) -> Node<'_> {
                Node::Scalar(Scalar::Int(self.get()))
            }

            fn node_mut(&mut self) -> NodeMut<'_> {
                NodeMut::Scalar(ScalarMut::Int(self))
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
