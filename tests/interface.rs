//! End-to-end tests for `OscInterface` over real loopback UDP sockets.
//!
//! Every test binds its sockets on port 0 so the OS picks a free port and
//! tests can run in parallel.

use std::net::UdpSocket;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cvr_osc::codec::{self, Endpoint};
use cvr_osc::{
    AvatarChangeSend, AvatarParameterChange, OscConfig, OscError, OscEvent, OscInterface,
    ParameterValue, PropCreateReceive, StartOptions, TransportState,
};
use rosc::{encoder, OscMessage, OscPacket, OscType};

const TIMEOUT: Duration = Duration::from_secs(2);

/// A socket standing in for the mod's listening port.
fn fake_mod() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind fake mod");
    socket.set_read_timeout(Some(TIMEOUT)).unwrap();
    socket
}

fn interface_for(mod_socket: &UdpSocket) -> OscInterface {
    OscInterface::new(OscConfig {
        lib_ip: "127.0.0.1".to_string(),
        lib_port: 0,
        cvr_ip: "127.0.0.1".to_string(),
        cvr_port: mod_socket.local_addr().unwrap().port(),
    })
}

fn recv_messages(socket: &UdpSocket) -> Vec<OscMessage> {
    let mut buf = [0u8; rosc::decoder::MTU];
    let (size, _) = socket.recv_from(&mut buf).expect("datagram from interface");
    codec::decode_datagram(&buf[..size]).expect("valid OSC")
}

fn inject(osc: &OscInterface, msg: OscMessage) {
    let bytes = encoder::encode(&OscPacket::Message(msg)).unwrap();
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .send_to(&bytes, osc.receiver_addr().expect("receiver bound"))
        .unwrap();
}

#[test]
fn parameter_change_reaches_handler_once() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    osc.on_avatar_parameter_changed(move |data| {
        let _ = tx.lock().unwrap().send(data.clone());
    });
    osc.start(StartOptions::receiver_only().quiet()).unwrap();

    inject(
        &osc,
        OscMessage {
            addr: "/avatar/parameter".to_string(),
            args: vec![OscType::Float(1.0), OscType::String("MainColor-r".to_string())],
        },
    );

    let change = rx.recv_timeout(TIMEOUT).expect("handler invoked");
    assert_eq!(change.parameter_name, "MainColor-r");
    assert_eq!(change.parameter_value, ParameterValue::Float(1.0));
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    osc.stop();
}

#[test]
fn avatar_change_is_sent_with_guid() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    osc.start(StartOptions::sender_only().quiet()).unwrap();

    osc.send_avatar_change(&AvatarChangeSend {
        avatar_guid: "6b86cced-e17c-4f57-8bdf-812615773ce6".to_string(),
    })
    .unwrap();

    let messages = recv_messages(&mod_socket);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].addr, Endpoint::AvatarChange.prefix());
    assert_eq!(
        messages[0].args,
        vec![OscType::String("6b86cced-e17c-4f57-8bdf-812615773ce6".to_string())]
    );
}

#[test]
fn handlers_for_one_address_run_in_order() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    let order = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = mpsc::channel();
    let done_tx = Mutex::new(done_tx);

    for id in 1..=3 {
        let order = order.clone();
        osc.register(Endpoint::PropCreate, move |_| order.lock().unwrap().push(id));
    }
    osc.on_prop_created(move |data: &PropCreateReceive| {
        let _ = done_tx.lock().unwrap().send(data.prop_instance_id.clone());
    });
    osc.start(StartOptions::receiver_only().quiet()).unwrap();

    inject(
        &osc,
        OscMessage {
            addr: "/prop/create".to_string(),
            args: vec![
                OscType::String("prop-guid".to_string()),
                OscType::String("p+abc~1".to_string()),
                OscType::Int(0),
            ],
        },
    );

    assert_eq!(done_rx.recv_timeout(TIMEOUT).unwrap(), "p+abc~1");
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn malformed_and_unknown_messages_are_skipped() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    osc.register(Endpoint::AvatarChange, move |event| {
        let _ = tx.lock().unwrap().send(event.clone());
    });
    osc.start(StartOptions::receiver_only().quiet()).unwrap();

    // arity mismatch, type mismatch, unknown address, then a valid one
    inject(&osc, OscMessage { addr: "/avatar/change".into(), args: vec![] });
    inject(
        &osc,
        OscMessage {
            addr: "/avatar/change".into(),
            args: vec![OscType::Int(1), OscType::Int(2)],
        },
    );
    inject(&osc, OscMessage { addr: "/chatbox/input".into(), args: vec![] });
    inject(
        &osc,
        OscMessage {
            addr: "/avatar/change".into(),
            args: vec![
                OscType::String("guid".into()),
                OscType::String("C:/avatar.json".into()),
            ],
        },
    );

    match rx.recv_timeout(TIMEOUT).unwrap() {
        OscEvent::AvatarChanged(data) => {
            assert_eq!(data.avatar_guid, "guid");
            assert_eq!(data.avatar_json_config_path, "C:/avatar.json");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(osc.is_receiving());
}

#[test]
fn sender_only_start_opens_no_receiver() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    osc.start(StartOptions::sender_only().quiet()).unwrap();
    assert_eq!(osc.state(), TransportState::Running);
    assert!(osc.is_sending());
    assert!(!osc.is_receiving());
    assert_eq!(osc.receiver_addr(), None);
}

#[test]
fn send_without_start_opens_sender_lazily() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    assert_eq!(osc.state(), TransportState::Stopped);

    osc.send_avatar_parameter(&AvatarParameterChange {
        parameter_name: "MainColor-g".to_string(),
        parameter_value: ParameterValue::Float(0.0),
    })
    .unwrap();

    assert_eq!(osc.state(), TransportState::Running);
    assert!(osc.is_sending());
    assert!(!osc.is_receiving());
    let messages = recv_messages(&mod_socket);
    assert_eq!(messages[0].addr, "/avatar/parameter");
    assert_eq!(
        messages[0].args,
        vec![OscType::Float(0.0), OscType::String("MainColor-g".to_string())]
    );
}

#[test]
fn start_twice_binds_once() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    osc.start(StartOptions::default().quiet()).unwrap();
    let first = osc.receiver_addr().unwrap();
    osc.start(StartOptions::default().quiet()).unwrap();
    assert_eq!(osc.receiver_addr(), Some(first));
}

#[test]
fn stop_then_restart() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    osc.start(StartOptions::default().quiet()).unwrap();
    osc.stop();
    assert_eq!(osc.state(), TransportState::Stopped);
    assert!(!osc.is_sending());
    assert_eq!(osc.receiver_addr(), None);

    osc.start(StartOptions::receiver_only().quiet()).unwrap();
    assert_eq!(osc.state(), TransportState::Running);
    assert!(osc.is_receiving());
}

#[test]
fn bind_failure_leaves_interface_stopped() {
    let taken = UdpSocket::bind("127.0.0.1:0").unwrap();
    let osc = OscInterface::new(OscConfig {
        lib_port: taken.local_addr().unwrap().port(),
        ..OscConfig::default()
    });
    let result = osc.start(StartOptions::receiver_only().quiet());
    assert!(matches!(result, Err(OscError::Bind { .. })));
    assert_eq!(osc.state(), TransportState::Stopped);
    assert!(!osc.is_receiving());
}

#[test]
fn config_reset_round_trip_through_a_bundle() {
    let mod_socket = fake_mod();
    let osc = interface_for(&mod_socket);
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    osc.register(Endpoint::ConfigReset, move |_| {
        let _ = tx.lock().unwrap().send(());
    });
    osc.start(StartOptions::default().quiet()).unwrap();

    // forward what the interface sends straight back to its own receiver
    osc.send_config_reset().unwrap();
    let reset = recv_messages(&mod_socket).remove(0);
    let bundle = OscPacket::Bundle(rosc::OscBundle {
        timetag: rosc::OscTime::from((0, 1)),
        content: vec![OscPacket::Message(reset.clone()), OscPacket::Message(reset)],
    });
    let bytes = encoder::encode(&bundle).unwrap();
    mod_socket
        .send_to(&bytes, osc.receiver_addr().unwrap())
        .unwrap();

    rx.recv_timeout(TIMEOUT).unwrap();
    rx.recv_timeout(TIMEOUT).unwrap();
}

#[test]
fn stop_waits_for_a_handler_that_calls_back_into_the_interface() {
    let mod_socket = fake_mod();
    let osc = Arc::new(interface_for(&mod_socket));
    let (entered_tx, entered_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel();
    let entered_tx = Mutex::new(entered_tx);
    let done_tx = Mutex::new(done_tx);
    let weak = Arc::downgrade(&osc);
    osc.register(Endpoint::ConfigReset, move |_| {
        let _ = entered_tx.lock().unwrap().send(());
        thread::sleep(Duration::from_millis(300));
        if let Some(osc) = weak.upgrade() {
            let _ = done_tx.lock().unwrap().send(osc.is_sending());
        }
    });
    osc.start(StartOptions::receiver_only().quiet()).unwrap();

    inject(
        &osc,
        OscMessage {
            addr: "/config/reset".into(),
            args: vec![],
        },
    );
    entered_rx.recv_timeout(TIMEOUT).unwrap();

    let (finished_tx, finished_rx) = mpsc::channel();
    let stopper = {
        let osc = osc.clone();
        thread::spawn(move || {
            osc.stop();
            let _ = finished_tx.send(());
        })
    };
    finished_rx.recv_timeout(Duration::from_secs(3)).expect("stop returned");
    stopper.join().unwrap();

    assert!(!done_rx.recv_timeout(TIMEOUT).unwrap());
    assert_eq!(osc.state(), TransportState::Stopped);
}
