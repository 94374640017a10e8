//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Must be reached well before a default 2 MiB thread stack is exhausted in
// an unoptimized build.
const MAX_DEPTH: usize = 128;

// Thread-local resolution state for circular dependency detection
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<Frame>,
}

#[derive(PartialEq, Eq)]
struct Frame {
    container: u64,
    name: String,
}

/// Guard for managing the thread-local resolution stack.
///
/// Each frame is keyed by container id so that one container building a
/// service never looks like a cycle to another container on the same thread.
/// The frame is popped when the guard drops, on success and error alike.
pub(crate) struct StackGuard {
    container: u64,
}

impl StackGuard {
    pub(crate) fn enter(container: u64, name: &str) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new name
            if tls
                .stack
                .iter()
                .any(|frame| frame.container == container && frame.name == name)
            {
                let mut path: Vec<String> = tls
                    .stack
                    .iter()
                    .filter(|frame| frame.container == container)
                    .map(|frame| frame.name.clone())
                    .collect();
                path.push(name.to_string());
                return Err(DiError::Circular(path));
            }

            if tls.stack.len() >= MAX_DEPTH {
                return Err(DiError::DepthExceeded(tls.stack.len()));
            }

            tls.stack.push(Frame {
                container,
                name: name.to_string(),
            });
            Ok(())
        })?;

        Ok(Self { container })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let popped = tls.borrow_mut().stack.pop();
            debug_assert!(popped.is_some_and(|frame| frame.container == self.container));
        });
    }
}

/// Number of frames on this thread's resolution stack.
#[cfg(test)]
pub(crate) fn depth() -> usize {
    RESOLUTION_TLS.with(|tls| tls.borrow().stack.len())
}
