use std::fmt;

use paste::paste;

use super::ArgMatcher;

/// Matcher for every argument of one invocation.
///
/// Implemented for:
/// * `()` for callables without arguments.
/// * `(AM,)` for callables with a single argument. The argument is
///   matched as-is, not wrapped in a tuple.
/// * tuples of two to six [`ArgMatcher`]s, for callables whose
///   arguments are forwarded as a tuple.
/// * [`AnyInvocation`], which accepts anything.
///
/// ```
/// use swapfn::matcher::{self, InvocationMatcher};
///
/// let single = (matcher::eq("first call"),);
/// assert!(single.matches(&"first call".to_string()).is_ok());
///
/// let pair = (matcher::eq(5), matcher::any());
/// assert!(pair.matches(&(5, "hello")).is_ok());
/// assert!(pair.matches(&(3, "hello")).is_err());
/// ```
pub trait InvocationMatcher<Args> {
    /// Returns `Ok(())` when all the arguments match.
    ///
    /// Returns `Err(String)` otherwise, detailing which arguments
    /// failed.
    fn matches(&self, args: &Args) -> Result<(), String>;

    /// Describes the expected arguments, as shown in verification
    /// reports.
    fn expectations(&self) -> String;
}

/// Accepts every invocation.
pub struct AnyInvocation;

impl<Args> InvocationMatcher<Args> for AnyInvocation {
    fn matches(&self, _: &Args) -> Result<(), String> {
        Ok(())
    }

    fn expectations(&self) -> String {
        "<any>".to_string()
    }
}

impl InvocationMatcher<()> for () {
    fn matches(&self, _: &()) -> Result<(), String> {
        Ok(())
    }

    fn expectations(&self) -> String {
        "()".to_string()
    }
}

impl<Arg: fmt::Debug, AM: ArgMatcher<Arg>> InvocationMatcher<Arg> for (AM,) {
    fn matches(&self, arg: &Arg) -> Result<(), String> {
        if self.0.matches(arg) {
            Ok(())
        } else {
            Err(format!(
                "Argument did not match.
  Expected: {}
  Actual:   {:?}",
                self.0, arg
            ))
        }
    }

    fn expectations(&self) -> String {
        format!("({})", self.0)
    }
}

// (1,2,3,..) => (true, true, true,..)
macro_rules! trues {
    (@true $v:tt) => { true };
    ($($v:tt),*) => { ($(trues!(@true $v)),*) };
}

// (a,b,c) => tuple!(b,c)
macro_rules! peel {
    ($idx:tt, $($other:tt,)+) => (tuple! { $($other,)+ })
}

// implement InvocationMatcher for tuples of ArgMatchers
macro_rules! tuple {
    ($idx:tt,) => ();
    ($($idx:tt,)+) => (
        paste! {
            impl<$([<A $idx>]: fmt::Debug),+, $([<AM $idx>]: ArgMatcher<[<A $idx>]>),+> InvocationMatcher<($([<A $idx>],)+)> for ($([<AM $idx>],)+) {
                fn matches(&self, ($([<a $idx>],)+): &($([<A $idx>],)+)) -> Result<(), String> {
                    let ($([<am $idx>],)+) = self;
                    let matches = match ($([<am $idx>].matches([<a $idx>]),)+) {
                        trues!($($idx),+) => return Ok(()),
                        ($([<m $idx>],)+) => [$([<m $idx>]),+],
                    };

                    let expected = [$([<am $idx>].to_string()),+];
                    let actual = [$(format!("{:?}", [<a $idx>])),+];

                    let mismatches: Vec<_> = matches
                        .iter()
                        .enumerate()
                        .filter(|(_, passed)| !**passed)
                        .map(|(pos, _)| format!("  Argument {}:
    Expected: {}
    Actual:   {}",
                            pos, expected[pos], actual[pos]
                        ))
                        .collect();

                    Err(format!("Arguments did not match
  Expected: [{}]
  Actual:   [{}]
{}",
                        expected.join(", "), actual.join(", "), mismatches.join("\n")
                    ))
                }

                fn expectations(&self) -> String {
                    let ($([<am $idx>],)+) = self;
                    let expected = [$([<am $idx>].to_string()),+];
                    format!("({})", expected.join(", "))
                }
            }
        }
        peel! { $($idx,)+ }
    )
}

tuple! { 5, 4, 3, 2, 1, 0, }
