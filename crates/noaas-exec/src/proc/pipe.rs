use std::{
    io,
    os::fd::{FromRawFd, OwnedFd},
};

/// Anonymous pipe `(read, write)` with close-on-exec set on both ends.
///
/// The write end is handed to a child as both stdout and stderr so the two
/// streams interleave exactly as the child wrote them.
pub(crate) fn combined_pipe() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut fds: [libc::c_int; 2] = [-1, -1];
    open_pipe(&mut fds)?;
    // SAFETY: the pipe call succeeded, so both descriptors are open and owned by nobody else.
    let pair = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
    Ok(pair)
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn open_pipe(fds: &mut [libc::c_int; 2]) -> io::Result<()> {
    // SAFETY: `fds` has room for the two descriptors written by pipe2(2).
    let rc = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
fn open_pipe(fds: &mut [libc::c_int; 2]) -> io::Result<()> {
    // SAFETY: `fds` has room for the two descriptors written by pipe(2).
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    for fd in *fds {
        // SAFETY: `fd` was just returned by pipe(2) and is open.
        let rc = unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            // SAFETY: closing descriptors we own on the error path.
            unsafe {
                libc::close(fds[0]);
                libc::close(fds[1]);
            }
            return Err(err);
        }
    }
    Ok(())
}
