use windows_sys::Win32::Networking::WinSock;

use crate::layout::RawSockAddr;

pub type SocketHandle = std::os::windows::io::RawSocket;

fn buf_len(len: usize) -> i32 {
    len.min(i32::MAX as usize) as i32
}

pub fn send_to(socket: SocketHandle, buf: &[u8], flags: i32, addr: &RawSockAddr) -> isize {
    // SAFETY: `buf` and `addr` outlive the call; lengths never exceed them.
    let ret = unsafe {
        WinSock::sendto(
            socket as WinSock::SOCKET,
            buf.as_ptr(),
            buf_len(buf.len()),
            flags,
            addr.as_ptr().cast::<WinSock::SOCKADDR>(),
            addr.len() as i32,
        )
    };
    ret as isize
}

pub fn recv_from(
    socket: SocketHandle,
    buf: &mut [u8],
    flags: i32,
    addr: &mut RawSockAddr,
) -> isize {
    let mut addr_len = addr.len() as i32;
    // SAFETY: Winsock writes at most the advertised lengths into the
    // exclusively borrowed `buf` and `addr`.
    let ret = unsafe {
        WinSock::recvfrom(
            socket as WinSock::SOCKET,
            buf.as_mut_ptr(),
            buf_len(buf.len()),
            flags,
            addr.as_mut_ptr().cast::<WinSock::SOCKADDR>(),
            &mut addr_len,
        )
    };
    addr.set_len(addr_len.max(0) as u32);
    ret as isize
}

pub fn last_error() -> i32 {
    // SAFETY: reads thread-local Winsock state only.
    unsafe { WinSock::WSAGetLastError() }
}
