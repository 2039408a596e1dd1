use std::{
    net::{Ipv4Addr, SocketAddrV4},
    time::Duration,
};

use backlog::{codec::FrameEncoder, transport::connect_multicast_sender};
use bytes::{Bytes, BytesMut};
use demos::ticker::Ticker;
use tokio::time::sleep;
use tokio_util::codec::Encoder;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // the pre-configured multicast address
    let mc_addr = SocketAddrV4::new(Ipv4Addr::new(224, 0, 0, 123), 1234);
    let socket = connect_multicast_sender(&mc_addr).await.unwrap();

    let ticker = Ticker::new().unwrap();
    let mut buf = BytesMut::new();
    let mut sent = 0u64;

    loop {
        let tick = ticker.next_tick();
        FrameEncoder
            .encode(Bytes::from(tick.to_string()), &mut buf)
            .unwrap();
        socket.send(&buf.split()).await.unwrap();
        sent += 1;

        if sent % 1000 == 0 {
            info!("Sent {} ticks, last: {}", sent, tick);
        }

        sleep(Duration::from_millis(1)).await;
    }
}
