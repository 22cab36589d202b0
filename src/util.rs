use std::cell::RefCell;

// Initial capacity of the per-thread formatting buffer.
pub(crate) const BUF_SIZE: usize = 256;
// A buffer that has grown beyond this capacity is replaced after use.
pub(crate) const MAX_CAPACITY: usize = 1024;

#[derive(Copy, Clone, Debug)]
pub(crate) enum ErrorCode {
    Render,
    Write,
    Flush,
    Poison,
}
impl ErrorCode {
    fn as_index(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Poison => "poison",
        }
    }
}

pub(crate) fn eprint_err(error_code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
    eprintln!(
        "[secure_layout][ERRCODE::{code:?}] {msg}, caused by {err:?}\n    \
         See https://docs.rs/secure_layout/latest/secure_layout/error_info/index.html#{code_lc}",
        code = error_code,
        msg = msg,
        err = err,
        code_lc = error_code.as_index(),
    );
}

pub(crate) fn io_err(s: &'static str) -> std::io::Error {
    std::io::Error::other(s)
}

const POISON: &str = "Poison";

pub(crate) fn poison_err() -> std::io::Error {
    io_err(POISON)
}

// The error code for a failed write or flush; lock poisoning gets its own.
pub(crate) fn io_error_code(err: &std::io::Error, default: ErrorCode) -> ErrorCode {
    if err.kind() == std::io::ErrorKind::Other && err.to_string() == POISON {
        ErrorCode::Poison
    } else {
        default
    }
}

// Runs f with the thread-local formatting buffer, or with a temporary buffer if
// the thread-local one is in use already.
pub(crate) fn with_buffer<F, T>(f: F) -> T
where
    F: FnOnce(&mut String) -> T,
{
    thread_local! {
        static BUFFER: RefCell<String> = RefCell::new(String::with_capacity(BUF_SIZE));
    }
    BUFFER.with(|tl_buf| match tl_buf.try_borrow_mut() {
        Ok(mut buffer) => {
            buffer.clear();
            let result = f(&mut buffer);
            if buffer.capacity() > MAX_CAPACITY {
                *buffer = String::with_capacity(BUF_SIZE);
            } else {
                buffer.clear();
            }
            result
        }
        Err(_e) => {
            // We arrive here in the rare cases of recursive logging
            // (e.g. log calls in Debug or Display implementations)
            let mut tmp_buf = String::with_capacity(BUF_SIZE);
            f(&mut tmp_buf)
        }
    })
}
