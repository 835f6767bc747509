//! Internal testing utilities for the ragged-shape-inference crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Table-driven test runner.
///
/// Shape inference tests usually check one operator against a list of input
/// shapes and attribute combinations. Writing each combination as a separate
/// `#[test]` is verbose, and writing them as a plain loop stops at the first
/// failure. `TestCases` runs every case, catches panics from failing ones and
/// reports all failures together.
///
/// Conventionally the case type is a local struct named `Case` which derives
/// `Debug`, and the collection is named `cases`:
///
/// ```
/// use ragged_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     len: u64,
///     expected_rows: u64,
/// }
///
/// let cases = [
///     Case { len: 1, expected_rows: 0 },
///     Case { len: 5, expected_rows: 4 },
/// ];
///
/// cases.test_each(|case| {
///     assert_eq!(case.len - 1, case.expected_rows);
/// });
/// ```
///
/// The case and anything captured by the test closure must be unwind safe.
/// Wrap values with interior mutability in
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe), or construct them
/// inside the closure.
pub trait TestCases {
    /// Data for a single case.
    type Case;

    /// Run `test` against a reference to each case.
    ///
    /// Panics after all cases have run if any of them failed.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Run `test` against an owned clone of each case.
    fn test_each_clone(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe;
}

/// Run `test` once per item and collect debug representations of the items
/// for which it panicked.
fn collect_failures<T, F>(items: impl IntoIterator<Item = T>, test: F) -> Vec<String>
where
    T: Debug,
    F: Fn(&T) -> bool,
{
    items
        .into_iter()
        .filter_map(|item| {
            if test(&item) {
                None
            } else {
                Some(format!("{:?}", item))
            }
        })
        .collect()
}

fn report(failures: Vec<String>) {
    assert!(
        failures.is_empty(),
        "{} test cases failed: [{}]",
        failures.len(),
        failures.join(", ")
    );
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures = collect_failures(self, |case| {
            std::panic::catch_unwind(|| test(case)).is_ok()
        });
        report(failures);
    }

    fn test_each_clone(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe,
    {
        let test = &test;
        let failures = collect_failures(self, |case| {
            let owned = case.clone();
            std::panic::catch_unwind(move || test(owned)).is_ok()
        });
        report(failures);
    }
}

#[cfg(test)]
mod tests {
    use super::TestCases;

    #[derive(Clone, Debug)]
    struct Case {
        rank: usize,
    }

    #[test]
    fn test_all_cases_pass() {
        let cases = [Case { rank: 1 }, Case { rank: 2 }];
        cases.clone().test_each(|case| assert!(case.rank > 0));
        cases.test_each_clone(|case| assert!(case.rank > 0));
    }

    #[test]
    #[should_panic(expected = "1 test cases failed")]
    fn test_each_reports_failures() {
        let cases = [Case { rank: 0 }, Case { rank: 2 }];
        cases.test_each(|case| assert!(case.rank > 0));
    }

    #[test]
    #[should_panic(expected = "2 test cases failed")]
    fn test_each_clone_reports_failures() {
        let cases = [Case { rank: 0 }, Case { rank: 0 }];
        cases.test_each_clone(|case| assert!(case.rank > 0));
    }
}
