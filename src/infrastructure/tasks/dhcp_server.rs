//! DHCP Server Task
//!
//! Hands out addresses on the access point's subnet and tracks leases to
//! count attached stations.

use core::sync::atomic::{AtomicU8, Ordering};

use embassy_futures::select::{Either3, select3};
use embassy_net::{
    Ipv4Address,
    Stack,
    udp::{PacketMetadata, UdpSocket},
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Duration, Instant, Timer};
use log::{debug, info, warn};
use myrtio_strip_core::leases::LeaseTable;

use crate::{
    core::net::dhcp::{
        DHCP_ACK,
        DHCP_DISCOVER,
        DHCP_OFFER,
        DHCP_RELEASE,
        DHCP_REQUEST,
        LEASE_TIME_SECS,
        allocate_ip,
        build_dhcp_response,
        parse_dhcp_request,
    },
    config::MAX_LEASES,
    infrastructure::drivers::wifi_ap::ap_address,
};

/// DHCP server and client ports
const DHCP_SERVER_PORT: u16 = 67;
const DHCP_CLIENT_PORT: u16 = 68;

const LEASE_SWEEP: Duration = Duration::from_secs(30);

static STATIONS: AtomicU8 = AtomicU8::new(0);

/// Signaled once the access point restarted and dropped its stations.
pub(crate) static LEASE_RESET: Signal<CriticalSectionRawMutex, ()> = Signal::new();

type Leases = LeaseTable<MAX_LEASES>;

/// Stations holding an unexpired lease.
pub(crate) fn station_count() -> u8 {
    STATIONS.load(Ordering::Relaxed)
}

fn publish_stations(leases: &mut Leases) {
    let count = u8::try_from(leases.active(Instant::now().as_millis())).unwrap_or(u8::MAX);
    if STATIONS.load(Ordering::Relaxed) != count {
        info!("dhcp_server: {} station(s) attached", count);
        STATIONS.store(count, Ordering::Relaxed);
    }
}

/// DHCP server task
///
/// Listens for DHCP discover/request/release messages and responds with
/// offers/acks.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: Stack<'static>) {
    let ap_ip_address = ap_address();

    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; 1024];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; 1024];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(e) = socket.bind(DHCP_SERVER_PORT) {
        warn!("dhcp_server: failed to bind port {}: {:?}", DHCP_SERVER_PORT, e);
        return;
    }
    info!("dhcp_server: listening on port {}", DHCP_SERVER_PORT);

    let mut leases = Leases::new(u64::from(LEASE_TIME_SECS) * 1000);
    let mut packet = [0u8; 576];

    loop {
        let received = select3(
            socket.recv_from(&mut packet),
            Timer::after(LEASE_SWEEP),
            LEASE_RESET.wait(),
        )
        .await;
        let len = match received {
            Either3::First(Ok((len, _remote))) => len,
            Either3::First(Err(e)) => {
                warn!("dhcp_server: recv error: {:?}", e);
                continue;
            }
            // Expired leases only drop out of the count here.
            Either3::Second(()) => {
                publish_stations(&mut leases);
                continue;
            }
            Either3::Third(()) => {
                debug!("dhcp_server: access point restarted, dropping leases");
                leases.clear();
                publish_stations(&mut leases);
                continue;
            }
        };
        let Some(request) = parse_dhcp_request(&packet[..len]) else {
            continue;
        };

        let response_type = match request.message_type {
            DHCP_DISCOVER => DHCP_OFFER,
            DHCP_REQUEST => {
                leases.renew(request.client_mac, Instant::now().as_millis());
                publish_stations(&mut leases);
                DHCP_ACK
            }
            DHCP_RELEASE => {
                leases.release(request.client_mac);
                publish_stations(&mut leases);
                continue;
            }
            other => {
                debug!("dhcp_server: ignoring message type {}", other);
                continue;
            }
        };

        let offered_ip = allocate_ip(ap_ip_address, &request.client_mac);
        let response_len =
            build_dhcp_response(ap_ip_address, &mut packet, &request, offered_ip, response_type);

        let dest = (Ipv4Address::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(e) = socket.send_to(&packet[..response_len], dest).await {
            warn!("dhcp_server: send error: {:?}", e);
        }
    }
}
