mod tests {
    use myrtio_strip_core::ws::{
        FrameAction, FrameHeader, MAX_CONTROL_PAYLOAD, Opcode, accept_key, encode_control,
        unmask,
    };

    fn header(bytes: &[u8]) -> Option<FrameHeader> {
        let head = [bytes[0], bytes[1]];
        FrameHeader::decode(head, &bytes[2..])
    }

    #[test]
    fn test_accept_key() {
        // Sample handshake from RFC 6455, section 1.3.
        let accept = accept_key("dGhlIHNhbXBsZSBub25jZQ==").unwrap();
        assert_eq!(accept.as_str(), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[test]
    fn test_decode_lengths() {
        let short = header(&[0x81, 0x85, 1, 2, 3, 4]).unwrap();
        assert!(short.fin);
        assert_eq!(short.opcode, Opcode::Text);
        assert_eq!(short.mask, Some([1, 2, 3, 4]));
        assert_eq!(short.payload_len, 5);

        assert_eq!(FrameHeader::extra_len([0x81, 0xFE]), 6);
        let medium = header(&[0x81, 0xFE, 0x01, 0x00, 0, 0, 0, 0]).unwrap();
        assert_eq!(medium.payload_len, 256);

        assert_eq!(FrameHeader::extra_len([0x82, 0x7F]), 8);
        let long = header(&[0x82, 0x7F, 0, 0, 0, 0, 0, 1, 0, 0]).unwrap();
        assert_eq!(long.opcode, Opcode::Binary);
        assert_eq!(long.mask, None);
        assert_eq!(long.payload_len, 65536);

        assert!(FrameHeader::decode([0x81, 0x85], &[1, 2]).is_none());
    }

    #[test]
    fn test_actions() {
        let masked_text = header(&[0x81, 0x85, 1, 2, 3, 4]).unwrap();
        assert_eq!(masked_text.action(512), FrameAction::Deliver);
        assert_eq!(masked_text.action(4), FrameAction::Drop);

        let fragment = header(&[0x01, 0x85, 1, 2, 3, 4]).unwrap();
        assert_eq!(fragment.action(512), FrameAction::Drop);

        let unmasked = header(&[0x81, 0x05]).unwrap();
        assert_eq!(unmasked.action(512), FrameAction::Drop);

        let binary = header(&[0x82, 0x85, 1, 2, 3, 4]).unwrap();
        assert_eq!(binary.action(512), FrameAction::Drop);

        let ping = header(&[0x89, 0x80, 1, 2, 3, 4]).unwrap();
        assert_eq!(ping.action(512), FrameAction::Pong);

        let close = header(&[0x88, 0x80, 1, 2, 3, 4]).unwrap();
        assert_eq!(close.action(512), FrameAction::Close);

        let pong = header(&[0x8A, 0x80, 1, 2, 3, 4]).unwrap();
        assert_eq!(pong.action(512), FrameAction::Drop);
    }

    #[test]
    fn test_unmask() {
        let mask = [0x37, 0xfa, 0x21, 0x3d];
        // Masked "Hello" from RFC 6455, section 5.7.
        let mut payload = [0x7f, 0x9f, 0x4d, 0x51, 0x58];
        unmask(&mut payload, mask);
        assert_eq!(&payload, b"Hello");
    }

    #[test]
    fn test_encode_control() {
        let mut out = [0u8; 16];
        let n = encode_control(Opcode::Pong, b"hi", &mut out).unwrap();
        assert_eq!(&out[..n], &[0x8A, 0x02, b'h', b'i']);

        let n = encode_control(Opcode::Close, &[], &mut out).unwrap();
        assert_eq!(&out[..n], &[0x88, 0x00]);

        let oversized = [0u8; MAX_CONTROL_PAYLOAD + 1];
        let mut big = [0u8; 256];
        assert!(encode_control(Opcode::Ping, &oversized, &mut big).is_none());
        assert!(encode_control(Opcode::Ping, b"abc", &mut out[..3]).is_none());
    }
}
