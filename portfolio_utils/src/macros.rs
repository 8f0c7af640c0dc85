/// Asserts that an expression matches a pattern. The optional guard sees the
/// bindings of the pattern by reference.
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(if $guard:expr)? $(,)?) => {
        match &$expr {
            $pat $(if $guard)? => {}
            other => ::core::panic!(
                "assertion failed: `{other:?}` does not match `{}`",
                ::core::stringify!($pat $(if $guard)?),
            ),
        }
    };
}
