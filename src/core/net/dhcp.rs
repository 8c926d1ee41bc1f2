//! DHCP Protocol Implementation
//!
//! Provides DHCP message parsing and response building.

use embassy_net::Ipv4Address;

/// DHCP message types
pub(crate) const DHCP_DISCOVER: u8 = 1;
pub(crate) const DHCP_OFFER: u8 = 2;
pub(crate) const DHCP_REQUEST: u8 = 3;
pub(crate) const DHCP_ACK: u8 = 5;
pub(crate) const DHCP_RELEASE: u8 = 7;

/// DHCP options
const DHCP_OPTION_MESSAGE_TYPE: u8 = 53;
const DHCP_OPTION_SERVER_ID: u8 = 54;
const DHCP_OPTION_LEASE_TIME: u8 = 51;
const DHCP_OPTION_SUBNET_MASK: u8 = 1;
const DHCP_OPTION_ROUTER: u8 = 3;
const DHCP_OPTION_DNS: u8 = 6;
const DHCP_OPTION_END: u8 = 255;

/// DHCP magic cookie
const DHCP_MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

/// Lease configuration
pub(crate) const LEASE_TIME_SECS: u32 = 300;
const SUBNET_MASK: Ipv4Address = Ipv4Address::new(255, 255, 255, 0);

/// Minimum DHCP packet size (BOOTP header + magic cookie)
const MIN_DHCP_PACKET_SIZE: usize = 240;

/// Parsed DHCP request
#[derive(Debug)]
pub(crate) struct DhcpRequest {
    /// Transaction ID
    pub xid: [u8; 4],
    /// Client MAC address
    pub client_mac: [u8; 6],
    /// Message type (DISCOVER, REQUEST, etc.)
    pub message_type: u8,
}

/// Parse a DHCP request from a raw packet
///
/// Returns `None` if the packet is invalid or not a BOOTREQUEST
pub(crate) fn parse_dhcp_request(packet: &[u8]) -> Option<DhcpRequest> {
    if packet.len() < MIN_DHCP_PACKET_SIZE || packet[0] != 1 {
        return None;
    }
    if packet[236..240] != DHCP_MAGIC_COOKIE {
        return None;
    }

    let xid = packet[4..8].try_into().ok()?;
    let client_mac = packet[28..34].try_into().ok()?;
    let message_type = find_dhcp_option(&packet[240..], DHCP_OPTION_MESSAGE_TYPE)?
        .first()
        .copied()?;

    Some(DhcpRequest {
        xid,
        client_mac,
        message_type,
    })
}

/// Allocate an IP address for a client based on their MAC address
///
/// Derives a consistent host in `.2 - .50` of the access point's /24.
pub(crate) fn allocate_ip(ap_ip_address: Ipv4Address, mac: &[u8; 6]) -> Ipv4Address {
    let [a, b, c, _] = ap_ip_address.octets();
    let offset = (mac[5] % 49) + 2;
    Ipv4Address::new(a, b, c, offset)
}

/// Build a DHCP response (OFFER or ACK)
///
/// Returns the length of the response packet
pub(crate) fn build_dhcp_response(
    ap_ip_address: Ipv4Address,
    buffer: &mut [u8],
    request: &DhcpRequest,
    offered_ip: Ipv4Address,
    response_type: u8,
) -> usize {
    buffer.fill(0);

    // op BOOTREPLY, htype Ethernet, hlen 6, hops 0
    buffer[..4].copy_from_slice(&[2, 1, 6, 0]);
    buffer[4..8].copy_from_slice(&request.xid);
    // Broadcast flag
    buffer[10] = 0x80;
    // yiaddr, siaddr, chaddr
    buffer[16..20].copy_from_slice(&offered_ip.octets());
    buffer[20..24].copy_from_slice(&ap_ip_address.octets());
    buffer[28..34].copy_from_slice(&request.client_mac);
    buffer[236..240].copy_from_slice(&DHCP_MAGIC_COOKIE);

    let server = ap_ip_address.octets();
    let lease = LEASE_TIME_SECS.to_be_bytes();
    let mask = SUBNET_MASK.octets();
    let message_type = [response_type];
    let options: [(u8, &[u8]); 6] = [
        (DHCP_OPTION_MESSAGE_TYPE, &message_type),
        (DHCP_OPTION_SERVER_ID, &server),
        (DHCP_OPTION_LEASE_TIME, &lease),
        (DHCP_OPTION_SUBNET_MASK, &mask),
        (DHCP_OPTION_ROUTER, &server),
        // The stations only talk to the controller itself.
        (DHCP_OPTION_DNS, &server),
    ];

    let mut opt_idx = 240;
    for (code, data) in options {
        opt_idx = put_option(buffer, opt_idx, code, data);
    }
    buffer[opt_idx] = DHCP_OPTION_END;
    opt_idx + 1
}

#[allow(clippy::cast_possible_truncation)]
fn put_option(buffer: &mut [u8], at: usize, code: u8, data: &[u8]) -> usize {
    buffer[at] = code;
    buffer[at + 1] = data.len() as u8;
    buffer[at + 2..at + 2 + data.len()].copy_from_slice(data);
    at + 2 + data.len()
}

/// Find a DHCP option in the options that follow the magic cookie.
fn find_dhcp_option(options: &[u8], option_code: u8) -> Option<&[u8]> {
    let mut rest = options;
    loop {
        match rest {
            [] | [DHCP_OPTION_END, ..] => return None,
            // Padding
            [0, tail @ ..] => rest = tail,
            [code, len, tail @ ..] => {
                let data = tail.get(..usize::from(*len))?;
                if *code == option_code {
                    return Some(data);
                }
                rest = &tail[data.len()..];
            }
            [_] => return None,
        }
    }
}
