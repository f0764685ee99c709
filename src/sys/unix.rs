use nix::libc;

use crate::layout::RawSockAddr;

pub type SocketHandle = std::os::fd::RawFd;

pub fn send_to(socket: SocketHandle, buf: &[u8], flags: i32, addr: &RawSockAddr) -> isize {
    // SAFETY: `buf` and `addr` are live borrows for the duration of the call
    // and the lengths passed match the memory behind the pointers.
    unsafe {
        libc::sendto(
            socket,
            buf.as_ptr().cast::<libc::c_void>(),
            buf.len(),
            flags,
            addr.as_ptr().cast::<libc::sockaddr>(),
            addr.len() as libc::socklen_t,
        )
    }
}

pub fn recv_from(
    socket: SocketHandle,
    buf: &mut [u8],
    flags: i32,
    addr: &mut RawSockAddr,
) -> isize {
    let mut addr_len = addr.len() as libc::socklen_t;
    // SAFETY: the kernel writes at most `buf.len()` bytes into `buf` and at
    // most `addr_len` bytes into `addr`, both exclusively borrowed here.
    let ret = unsafe {
        libc::recvfrom(
            socket,
            buf.as_mut_ptr().cast::<libc::c_void>(),
            buf.len(),
            flags,
            addr.as_mut_ptr().cast::<libc::sockaddr>(),
            &mut addr_len,
        )
    };
    addr.set_len(addr_len as u32);
    ret
}

pub fn last_error() -> i32 {
    nix::errno::Errno::last_raw()
}
