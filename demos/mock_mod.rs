//! Stand-in for the ChilloutVR OSC mod, for trying the console without the game.
//!
//! Listens on 127.0.0.1:9000 and prints every decoded message. On
//! `/config/reset` it answers the library's receiver on 127.0.0.1:9001 with
//! a sample avatar change and a parameter value.

use std::net::UdpSocket;

use cvr_osc::codec;
use cvr_osc::{AvatarChangeReceive, AvatarParameterChange, OscEvent, ParameterValue};

const MOD_ADDR: &str = "127.0.0.1:9000";
const LIB_ADDR: &str = "127.0.0.1:9001";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Mock CVR OSC mod - listening on {MOD_ADDR}, replying to {LIB_ADDR}");

    let socket = UdpSocket::bind(MOD_ADDR)?;
    let mut buf = [0u8; rosc::decoder::MTU];

    loop {
        let (size, peer) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) => {
                eprintln!("Failed to receive: {}", e);
                continue;
            }
        };
        let messages = match codec::decode_datagram(&buf[..size]) {
            Ok(messages) => messages,
            Err(e) => {
                eprintln!("  Failed to decode OSC from {}: {}", peer, e);
                continue;
            }
        };
        for msg in messages {
            match codec::decode(&msg) {
                Some(OscEvent::ConfigReset) => {
                    println!("  {} -> config reset, resending state", msg.addr);
                    replay_state(&socket)?;
                }
                Some(event) => println!("  {} -> {:?}", msg.addr, event),
                None => println!("  {} ignored ({} args)", msg.addr, msg.args.len()),
            }
        }
    }
}

fn replay_state(socket: &UdpSocket) -> Result<(), Box<dyn std::error::Error>> {
    let state = [
        OscEvent::AvatarChanged(AvatarChangeReceive {
            avatar_guid: "6b86cced-e17c-4f57-8bdf-812615773ce6".to_string(),
            avatar_json_config_path: "OSC/usr_local/avatar_6b86cced.json".to_string(),
        }),
        OscEvent::AvatarParameter(AvatarParameterChange {
            parameter_name: "MainColor-r".to_string(),
            parameter_value: ParameterValue::Float(1.0),
        }),
    ];
    for event in &state {
        socket.send_to(&codec::encode_packet(event)?, LIB_ADDR)?;
    }
    Ok(())
}
