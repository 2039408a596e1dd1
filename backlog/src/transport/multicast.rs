use std::{
    io,
    net::{Ipv4Addr, SocketAddrV4},
};

use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::debug;

/// Convenience result type.
pub type TransportResult<T> = Result<T, TransportError>;

/// Error arising from binding to a multicast group.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not a multicast address: {0}")]
    NotMulticast(Ipv4Addr),
    #[error("io error")]
    Io(#[from] io::Error),
}

/// Join the multicast group at `group` with IP_MULTICAST_LOOP and
/// SO_REUSEADDR enabled, so several listeners (and a sender on the same
/// host) can share it.
pub fn bind_multicast_listener(group: &SocketAddrV4) -> TransportResult<UdpSocket> {
    if !group.ip().is_multicast() {
        return Err(TransportError::NotMulticast(group.ip().to_owned()));
    }
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_nonblocking(true)?;
    socket.set_reuse_address(true)?;
    socket.set_multicast_loop_v4(true)?;
    socket.join_multicast_v4(group.ip(), &Ipv4Addr::UNSPECIFIED)?;
    socket.bind(&socket2::SockAddr::from(*group))?;
    debug!("Joined multicast group {}", group);
    let std_udp_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_udp_socket)?)
}

/// A socket which sends every datagram to the multicast group at `group`.
pub async fn connect_multicast_sender(group: &SocketAddrV4) -> TransportResult<UdpSocket> {
    let socket = bind_multicast_listener(group)?;
    socket.connect(group).await?;
    Ok(socket)
}
