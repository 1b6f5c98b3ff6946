//! Leveled assertions for the internal invariants of the arithmetic engine.
//!
//! The simple level guards cheap preconditions (pivot roles, identity round-trips), the higher
//! levels re-derive expensive facts such as full tableau consistency and are only compiled in
//! when the level is raised.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const LRA_ASSERT_LEVEL_DEFINITION: u8 = LRA_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const LRA_ASSERT_LEVEL_DEFINITION: u8 = LRA_ASSERT_ADVANCED;

pub const LRA_ASSERT_SIMPLE: u8 = 1;
pub const LRA_ASSERT_MODERATE: u8 = 2;
pub const LRA_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! lra_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::LRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LRA_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! lra_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::LRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LRA_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! lra_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::LRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LRA_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! lra_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::LRA_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LRA_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
