use std::cmp::Ordering;

/// Element types with a built-in total order.
///
/// Integers compare with `Ord`. Floats use the IEEE 754 `totalOrder`
/// predicate, so `-0.0 < 0.0` and NaNs sort after infinity (or before
/// negative infinity when the sign bit is set).
pub trait Element: Copy {
    fn compare(&self, other: &Self) -> Ordering;
}

macro_rules! impl_element_for_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                #[inline]
                fn compare(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }
            }
        )*
    };
}

impl_element_for_ord!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char,
);

impl Element for f32 {
    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl Element for f64 {
    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}
