use std::fmt::{self, Formatter};

use super::ArgMatcher;

/// Equality matcher
///
/// Matches whenever `Expected: PartialEq<Arg>`, so the expected value
/// does not have to be the same type as the argument. This is what
/// lets `eq("first call")` match the owned `String` a substitute
/// forwards.
pub struct Eq<Expected>(Expected);

impl<Expected, Arg> ArgMatcher<Arg> for Eq<Expected>
where
    Expected: fmt::Debug + PartialEq<Arg>,
    Arg: ?Sized,
{
    fn matches(&self, actual: &Arg) -> bool {
        self.0 == *actual
    }
}

impl<Expected: fmt::Debug> fmt::Display for Eq<Expected> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Creates an [`Eq`](struct@Eq) matcher.
pub fn eq<Expected: fmt::Debug>(expected: Expected) -> Eq<Expected> {
    Eq(expected)
}
