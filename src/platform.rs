//! Process environment hardening.
//!
//! Windows builds compile but the stdio guard is a no-op; the indexer is
//! developed and supported on unix.

/// Exit codes following sysexits(3) conventions.
pub const EX_USAGE: u8 = 64;
pub const EX_DATAERR: u8 = 65;
pub const EX_UNAVAILABLE: u8 = 69;
pub const EX_IOERR: u8 = 74;

/// Make sure the stdio file descriptors point to something.
///
/// The problem this prevents: a malicious parent may exec this process
/// with fds 0-2 unbound. The next file opened would then be assigned one
/// of them, and logging writes to fds 0-2 would corrupt it - a privilege
/// escalation if an underprivileged parent gets us to scribble on a file
/// it cannot access. Any stdio fd that fails fstat(2) with EBADF is
/// redirected to the null device.
///
/// Call before opening anything else.
#[cfg(unix)]
pub fn setup_stdio() -> std::io::Result<()> {
    use std::io;

    let mut devnull: libc::c_int = -1;

    for fd in 0..=2 {
        let mut sb = std::mem::MaybeUninit::<libc::stat>::uninit();
        if unsafe { libc::fstat(fd, sb.as_mut_ptr()) } == 0 {
            // already bound
            continue;
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::EBADF) {
            return Err(err);
        }

        if devnull == -1 {
            devnull = unsafe { libc::open(c"/dev/null".as_ptr().cast(), libc::O_RDWR) };
            if devnull == -1 {
                return Err(io::Error::last_os_error());
            }
        }

        // even if devnull equals fd, dup2(x, x) is a nop
        if unsafe { libc::dup2(devnull, fd) } == -1 {
            return Err(io::Error::last_os_error());
        }
    }

    // note: `devnull` stays open; it may *be* one of the stdio fds now
    Ok(())
}

#[cfg(not(unix))]
pub fn setup_stdio() -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_stdio_is_idempotent() {
        // fds are bound under the test harness; both calls are no-ops
        setup_stdio().unwrap();
        setup_stdio().unwrap();
    }
}
