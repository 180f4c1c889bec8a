//! Runtime side of [`tagged_union`]: the traits implemented by generated code and a few
//! generic helpers built on them.
//!
//! ```
//! use tagged_union::{match_tag, tagged_union};
//!
//! pub struct Line {
//!     pub length: f32,
//!     pub direction: f32,
//! }
//!
//! #[tagged_union]
//! pub enum Shape {
//!     Line,
//!     Number(f32),
//!     Triangle { a: f32, b: f32, c: f32 },
//! }
//!
//! let mut shape = Shape::Line(Line { length: 1.0, direction: 2.0 });
//! match_tag!(Shape, &mut shape {
//!     Line(line) => line.direction = 0.0,
//!     _ => {}
//! });
//! assert_eq!(shape.expect_line().direction, 0.0);
//! assert!(shape.as_number().is_none());
//! ```

use std::fmt::Debug;
use std::hash::Hash;

pub use tagged_union_macros::{match_tag, tagged_union};

/// An enum whose every variant carries exactly one payload, identified by a tag.
pub trait Tagged {
    type Tag: TagSet;

    /// Name of the union type.
    const NAME: &'static str;

    /// The tag of the active variant.
    fn tag(&self) -> Self::Tag;

    fn check(&self, tag: Self::Tag) -> bool {
        self.tag() == tag
    }
}

/// The closed set of tags of a [`Tagged`] type.
pub trait TagSet: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Every tag, in declared order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Ordinal of the tag, matching its position in [`TagSet::ALL`].
    fn index(self) -> usize;
}

/// `impl VariantOf<U> for P` says that `P` is the payload of exactly one variant of `U`.
///
/// `P::try_from(p.into())` gives back `p`, and [`VariantOf::cast`] only succeeds while
/// `U::tag()` is [`VariantOf::TAG`].
pub trait VariantOf<Union: Tagged>: Into<Union> + TryFrom<Union, Error = Union> {
    const TAG: Union::Tag;

    fn cast(value: &Union) -> Option<&Self>;

    fn cast_mut(value: &mut Union) -> Option<&mut Self>;
}

/// Returned when a payload is requested under a tag that is not active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("`{union}` holds `{actual}`, not `{expected}`")]
pub struct CastError {
    pub union: &'static str,
    pub expected: &'static str,
    pub actual: &'static str,
}

impl CastError {
    pub fn new<U: Tagged>(expected: U::Tag, actual: U::Tag) -> Self {
        CastError {
            union: U::NAME,
            expected: expected.name(),
            actual: actual.name(),
        }
    }
}

/// Builds the union from one of its payloads.
pub fn construct<U, V>(payload: V) -> U
where
    U: Tagged,
    V: VariantOf<U>,
{
    payload.into()
}

/// `true` iff `value` currently holds a `V`.
pub fn check<V, U>(value: &U) -> bool
where
    U: Tagged,
    V: VariantOf<U>,
{
    value.check(V::TAG)
}

pub fn cast<V, U>(value: &U) -> Result<&V, CastError>
where
    U: Tagged,
    V: VariantOf<U>,
{
    V::cast(value).ok_or_else(|| mismatch::<V, U>(value))
}

pub fn cast_mut<V, U>(value: &mut U) -> Result<&mut V, CastError>
where
    U: Tagged,
    V: VariantOf<U>,
{
    let actual = value.tag();
    V::cast_mut(value).ok_or_else(|| {
        let err = CastError::new::<U>(V::TAG, actual);
        tracing::debug!(%err, "cast_mut under inactive tag");
        err
    })
}

fn mismatch<V, U>(value: &U) -> CastError
where
    U: Tagged,
    V: VariantOf<U>,
{
    let err = CastError::new::<U>(V::TAG, value.tag());
    tracing::debug!(%err, "cast under inactive tag");
    err
}

/// Used by generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    use super::CastError;

    #[cold]
    #[track_caller]
    pub fn cast_failed(union: &'static str, expected: &'static str, actual: &'static str) -> ! {
        let err = CastError {
            union,
            expected,
            actual,
        };
        tracing::error!(union, expected, actual, "payload requested under inactive tag");
        panic!("{err}")
    }
}
