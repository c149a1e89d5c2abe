/*!
Stack growth for the recursive parts of the parser and printer
*/

const RED_ZONE: usize = 100 * 1024; // 100KB
const STACK_PER_RECURSION: usize = 1024 * 1024; // 1MB

/// Run `f`, first growing the stack if less than the red zone is left
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
