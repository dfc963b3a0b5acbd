use etherparse::{SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;

/// UDP datagram lifted out of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    pub dst_port: u16,
    /// Bounded by the UDP length field, not by the IP payload.
    pub payload: &'a [u8],
}

/// Extract the UDP datagram carried by a link-layer frame.
///
/// Returns `Ok(None)` for link types other than Ethernet and raw IP, and for
/// frames that carry something other than UDP.
pub fn parse_udp_datagram(
    linktype: Linktype,
    frame: &[u8],
) -> Result<Option<UdpDatagram<'_>>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(frame).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::RAW => SlicedPacket::from_ip(frame).map_err(|e| UdpError::Slice(e.to_string()))?,
        _ => return Ok(None),
    };

    let Some(TransportSlice::Udp(udp)) = sliced.transport else {
        return Ok(None);
    };

    Ok(Some(UdpDatagram {
        dst_port: udp.destination_port(),
        payload: udp.payload(),
    }))
}

#[cfg(test)]
mod tests {
    use super::parse_udp_datagram;
    use crate::capture::udp::error::UdpError;
    use etherparse::PacketBuilder;
    use pcap_parser::Linktype;

    const ETHERNET_HEADER_LEN: usize = 14;
    const IPV4_HEADER_LEN: usize = 20;

    fn multicast_frame(payload: &[u8]) -> Vec<u8> {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [0x01, 0x00, 0x5e, 0x7f, 0, 1])
            .ipv4([192, 168, 0, 1], [239, 255, 0, 1], 64)
            .udp(54000, 5568);
        let mut frame = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut frame, payload).unwrap();
        frame
    }

    #[test]
    fn extracts_multicast_sacn_datagram() {
        let payload = [1, 2, 3, 4];
        let frame = multicast_frame(&payload);

        let datagram = parse_udp_datagram(Linktype::ETHERNET, &frame)
            .unwrap()
            .unwrap();
        assert_eq!(datagram.dst_port, 5568);
        assert_eq!(datagram.payload, payload);
    }

    #[test]
    fn payload_stops_at_udp_length() {
        let mut frame = multicast_frame(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        // Shrink the UDP length to 12 while the IPv4 total length still
        // covers all 18 bytes of the segment.
        let udp_len = ETHERNET_HEADER_LEN + IPV4_HEADER_LEN + 4;
        frame[udp_len..udp_len + 2].copy_from_slice(&12u16.to_be_bytes());

        let datagram = parse_udp_datagram(Linktype::ETHERNET, &frame)
            .unwrap()
            .unwrap();
        assert_eq!(datagram.payload, &[1, 2, 3, 4]);
    }

    #[test]
    fn raw_ip_frames_are_supported() {
        let builder = PacketBuilder::ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64).udp(5568, 5568);
        let payload = [9u8; 3];
        let mut frame = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut frame, &payload).unwrap();

        let datagram = parse_udp_datagram(Linktype::RAW, &frame).unwrap().unwrap();
        assert_eq!(datagram.payload, payload);
    }

    #[test]
    fn tcp_is_not_a_datagram() {
        let builder = PacketBuilder::ethernet2([1, 1, 1, 1, 1, 1], [2, 2, 2, 2, 2, 2])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .tcp(1000, 5568, 0, 0);
        let payload = [0u8; 4];
        let mut frame = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut frame, &payload).unwrap();

        assert!(parse_udp_datagram(Linktype::ETHERNET, &frame).unwrap().is_none());
    }

    #[test]
    fn other_link_types_are_skipped() {
        let frame = multicast_frame(&[1]);
        assert!(parse_udp_datagram(Linktype::NULL, &frame).unwrap().is_none());
    }

    #[test]
    fn empty_frame_is_a_slice_error() {
        let result = parse_udp_datagram(Linktype::ETHERNET, &[]);
        assert!(matches!(result, Err(UdpError::Slice(_))));
    }
}
