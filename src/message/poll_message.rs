/// A verbatim message to send which asks the monitor to start sending voltage and temperature notifications
pub(crate) const REQUEST: [u8; 16] = [
    0xd1, 0x55, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[test]
fn test_request_is_one_block() {
    assert_eq!(hex::encode(REQUEST), "d1550700000000000000000000000000");
    assert_eq!(REQUEST.len(), crate::frame_codec::FRAME_LEN);
}
