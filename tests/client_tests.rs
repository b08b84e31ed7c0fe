//! Loopback tests for the UDP client against a real listening socket.

use std::net::UdpSocket;
use std::time::Duration;

use crossbeam::channel;

use rgb_udp_client::device::{self, decode_frame, ColorFrame, DeviceMessage};
use rgb_udp_client::host::{ClientRegistry, ClientType, HostClient, UdpClientType};
use rgb_udp_client::{ChannelMapping, ClientError, Endpoint, UdpClient};

/// A device stand-in on an ephemeral loopback port.
fn listener() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    let port = socket.local_addr().unwrap().port().to_string();
    (socket, port)
}

fn recv(socket: &UdpSocket) -> Option<Vec<u8>> {
    let mut buf = [0u8; 64];
    match socket.recv(&mut buf) {
        Ok(len) => Some(buf[..len].to_vec()),
        Err(_) => None,
    }
}

fn values(address: &str, port: &str) -> Vec<String> {
    vec![address.to_owned(), port.to_owned()]
}

#[test]
fn test_empty_input_creates_no_client() {
    let registry = ClientRegistry::with_defaults(ChannelMapping::Wrapping);
    for (address, port) in &[("", ""), ("127.0.0.1", ""), ("", "41000")] {
        let created = registry.create("UDP", &values(address, port)).unwrap();
        assert!(created.is_none());
    }
}

#[test]
fn test_created_client_is_connected() {
    let (_device, port) = listener();
    let registry = ClientRegistry::with_defaults(ChannelMapping::Wrapping);

    let client = registry.create("UDP", &values("127.0.0.1", &port)).unwrap().unwrap();
    assert!(client.is_connected());

    let client = registry.create("UDP", &values("localhost", &port)).unwrap().unwrap();
    assert!(client.is_connected());

    for edge in &["0", "65535"] {
        let client = registry.create("UDP", &values("127.0.0.1", edge)).unwrap().unwrap();
        assert!(client.is_connected(), "port {} should connect", edge);
        assert!(client.send(0.0, 0.0, 0.0), "port {} should accept a send", edge);
    }
}

#[test]
fn test_non_numeric_port_is_rejected() {
    let factory = UdpClientType::default();
    match factory.create(&values("127.0.0.1", "forty-one")) {
        Err(ClientError::InvalidArgument(_)) => {}
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("created a client with a bad port"),
    }
}

#[test]
fn test_disconnect_is_idempotent() {
    let (_device, port) = listener();
    let factory = UdpClientType::default();
    let mut client = factory.create(&values("127.0.0.1", &port)).unwrap().unwrap();

    client.disconnect();
    assert!(!client.is_connected());
    client.disconnect();
    assert!(!client.is_connected());
}

#[test]
fn test_send_after_disconnect_sends_nothing() {
    let (device, port) = listener();
    let factory = UdpClientType::default();
    let mut client = factory.create(&values("127.0.0.1", &port)).unwrap().unwrap();

    client.disconnect();
    assert!(!client.send(0.0, 0.0, 0.0));
    assert!(!client.send(1.0, 0.5, 0.25));
    assert!(recv(&device).is_none());
}

#[test]
fn test_black_and_white() {
    let (device, port) = listener();
    let factory = UdpClientType::default();
    let client = factory.create(&values("127.0.0.1", &port)).unwrap().unwrap();

    assert!(client.send(0.0, 0.0, 0.0));
    assert_eq!(recv(&device).unwrap(), vec![0, 0, 0]);

    assert!(client.send(1.0, 1.0, 1.0));
    assert_eq!(recv(&device).unwrap(), vec![255, 255, 255]);
}

#[test]
fn test_channels_truncate() {
    let (device, port) = listener();
    let factory = UdpClientType::default();
    let client = factory.create(&values("127.0.0.1", &port)).unwrap().unwrap();

    assert!(client.send(0.5, 0.25, 1.0));
    assert_eq!(recv(&device).unwrap(), vec![127, 63, 255]);
    assert!(recv(&device).is_none());
}

#[test]
fn test_consecutive_sends_are_independent() {
    let (device, port) = listener();
    let factory = UdpClientType::default();
    let client = factory.create(&values("127.0.0.1", &port)).unwrap().unwrap();

    assert!(client.send(1.0, 0.0, 0.0));
    assert!(client.send(0.0, 0.0, 1.0));
    assert_eq!(recv(&device).unwrap(), vec![255, 0, 0]);
    assert_eq!(recv(&device).unwrap(), vec![0, 0, 255]);
}

#[test]
fn test_reconnect_after_disconnect() {
    let (device, port) = listener();
    let factory = UdpClientType::default();
    let mut client = factory.create(&values("127.0.0.1", &port)).unwrap().unwrap();

    client.disconnect();
    assert!(client.connect());
    assert!(client.is_connected());
    assert!(client.send(0.0, 1.0, 0.0));
    assert_eq!(recv(&device).unwrap(), vec![0, 255, 0]);
}

#[test]
fn test_out_of_range_channels() {
    let (device, port) = listener();
    let port: u16 = port.parse().unwrap();

    let wrapping = UdpClient::new(Endpoint::new("127.0.0.1", port), ChannelMapping::Wrapping);
    assert!(wrapping.send(2.0, -1.0, 0.5));
    assert_eq!(recv(&device).unwrap(), vec![254, 1, 127]);

    let clamped = UdpClient::new(Endpoint::new("127.0.0.1", port), ChannelMapping::Clamped);
    assert!(clamped.send(2.0, -1.0, 0.5));
    assert_eq!(recv(&device).unwrap(), vec![255, 0, 127]);
}

#[test]
fn test_unresolvable_address_stays_disconnected() {
    let factory = UdpClientType::default();
    let mut client = factory
        .create(&values("definitely not a host", "41000"))
        .unwrap()
        .unwrap();

    assert!(!client.is_connected());
    assert!(!client.connect());
    assert!(!client.send(1.0, 1.0, 1.0));
    client.disconnect();
    assert!(!client.is_connected());
}

#[test]
fn test_device_listener_decodes_frames() {
    let (device, port) = listener();
    let (sender, receiver) = channel::unbounded::<DeviceMessage>();
    let _listener = device::start_listener_thread(device, sender).unwrap();

    let client = UdpClientType::default()
        .create(&values("127.0.0.1", &port))
        .unwrap()
        .unwrap();
    assert!(client.send(0.5, 0.25, 1.0));

    match receiver.recv_timeout(Duration::from_secs(2)) {
        Ok(DeviceMessage::Frame { frame, .. }) => assert_eq!(
            frame,
            ColorFrame {
                red: 127,
                green: 63,
                blue: 255
            }
        ),
        Err(err) => panic!("no frame: {}", err),
    }
}

#[test]
fn test_decoded_frame_matches_sent_bytes() {
    let (device, port) = listener();
    let client = UdpClientType::new(ChannelMapping::Clamped)
        .create(&values("127.0.0.1", &port))
        .unwrap()
        .unwrap();

    assert!(client.send(0.2, 0.4, 0.6));
    let data = recv(&device).unwrap();
    let frame = decode_frame(&data).unwrap();
    assert_eq!([frame.red, frame.green, frame.blue], [51, 102, 153]);
}
