//! Small crate-wide convenience macros.

/// Log a formatted debug line.
///
/// In the browser the line goes to `console.log`.  Native builds (unit tests)
/// have no console, so the line is written to stderr in debug builds and
/// dropped otherwise.
///
/// ```rust,ignore
/// debug_log!("fetch #{} issued for page {}", seq, page);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        let line = format!($($arg)*);
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::log_1(&line.into());
        }
        #[cfg(all(not(target_arch = "wasm32"), debug_assertions))]
        {
            eprintln!("{}", line);
        }
        #[cfg(all(not(target_arch = "wasm32"), not(debug_assertions)))]
        {
            let _ = line;
        }
    }};
}

/// Acquire a **mutable** borrow from a `RefCell` (or `Rc<RefCell>`).
/// If another mutable borrow is still active the call panics – the standard
/// panic message emitted by `RefCell::borrow_mut()` is preserved to keep the
/// macro zero-cost.
///
/// ```rust,ignore
/// use std::cell::RefCell;
/// let cell = RefCell::new(1);
/// {
///     let mut n = mut_borrow!(cell);
///     *n += 1;
/// }
/// assert_eq!(*cell.borrow(), 2);
/// ```
#[macro_export]
macro_rules! mut_borrow {
    ($cell:expr) => {
        $cell.borrow_mut()
    };
}
