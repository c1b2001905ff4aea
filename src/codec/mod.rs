//! Mapping between OSC messages and [`OscEvent`]s.
//!
//! Decoding is strict: the argument count and every type tag must match one
//! of the shapes the mod uses for that address, otherwise `decode` returns
//! `None`. Nothing is coerced.

mod args;
mod endpoint;

pub use endpoint::Endpoint;

use rosc::{decoder, encoder, OscMessage, OscPacket, OscType};

use crate::error::CodecError;
use crate::messages::*;
use args::{push_vector3, value_arg, Args};

/// The mod ignores the argument of `/config/reset`, but expects one.
const CONFIG_RESET_ARG: &str = "null";

pub fn encode(event: &OscEvent) -> OscMessage {
    let endpoint = event.endpoint();
    let mut args = Vec::new();
    let addr = match event {
        OscEvent::AvatarChanged(data) => {
            args.push(OscType::String(data.avatar_guid.clone()));
            args.push(OscType::String(data.avatar_json_config_path.clone()));
            endpoint.prefix().to_string()
        }
        OscEvent::AvatarChangeRequest(data) => {
            args.push(OscType::String(data.avatar_guid.clone()));
            endpoint.prefix().to_string()
        }
        OscEvent::AvatarParameter(data) => {
            // value first, then the name
            args.push(value_arg(data.parameter_value));
            args.push(OscType::String(data.parameter_name.clone()));
            endpoint.prefix().to_string()
        }
        OscEvent::AvatarParameterLegacy(data) => {
            args.push(value_arg(data.parameter_value));
            endpoint.address_for(&data.parameter_name)
        }
        OscEvent::Input(data) => {
            args.push(value_arg(data.input_value));
            endpoint.address_for(data.input_name.as_str())
        }
        OscEvent::PropCreated(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            args.push(OscType::String(data.prop_instance_id.clone()));
            args.push(OscType::Int(data.prop_sub_sync_transform_count));
            endpoint.prefix().to_string()
        }
        OscEvent::PropCreateRequest(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            if let Some(position) = data.prop_local_position {
                push_vector3(&mut args, position);
            }
            endpoint.prefix().to_string()
        }
        OscEvent::PropDeleted(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            args.push(OscType::String(data.prop_instance_id.clone()));
            endpoint.prefix().to_string()
        }
        OscEvent::PropAvailability(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            args.push(OscType::String(data.prop_instance_id.clone()));
            args.push(OscType::Bool(data.prop_is_available));
            endpoint.prefix().to_string()
        }
        OscEvent::PropParameter(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            args.push(OscType::String(data.prop_instance_id.clone()));
            args.push(OscType::String(data.prop_sync_name.clone()));
            args.push(OscType::Float(data.prop_sync_value));
            endpoint.prefix().to_string()
        }
        OscEvent::PropLocation(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            args.push(OscType::String(data.prop_instance_id.clone()));
            push_vector3(&mut args, data.prop_position);
            push_vector3(&mut args, data.prop_euler_rotation);
            endpoint.prefix().to_string()
        }
        OscEvent::PropLocationSub(data) => {
            args.push(OscType::String(data.prop_guid.clone()));
            args.push(OscType::String(data.prop_instance_id.clone()));
            args.push(OscType::Int(data.prop_sub_sync_index));
            push_vector3(&mut args, data.prop_position);
            push_vector3(&mut args, data.prop_euler_rotation);
            endpoint.prefix().to_string()
        }
        OscEvent::TrackingPlaySpaceData(data) => {
            push_vector3(&mut args, data.play_space_position);
            push_vector3(&mut args, data.play_space_euler_rotation);
            endpoint.prefix().to_string()
        }
        OscEvent::TrackingDeviceStatus(data) => {
            args.push(OscType::Bool(data.device_is_connected));
            args.push(OscType::String(data.device_type.as_str().to_string()));
            args.push(OscType::Int(data.device_steam_vr_index));
            args.push(OscType::String(data.device_steam_vr_name.clone()));
            endpoint.prefix().to_string()
        }
        OscEvent::TrackingDeviceData(data) => {
            args.push(OscType::String(data.device_type.as_str().to_string()));
            args.push(OscType::Int(data.device_steam_vr_index));
            args.push(OscType::String(data.device_steam_vr_name.clone()));
            push_vector3(&mut args, data.device_position);
            push_vector3(&mut args, data.device_euler_rotation);
            args.push(OscType::Float(data.device_battery_percentage));
            endpoint.prefix().to_string()
        }
        OscEvent::ConfigReset => {
            args.push(OscType::String(CONFIG_RESET_ARG.to_string()));
            endpoint.prefix().to_string()
        }
    };
    OscMessage { addr, args }
}

/// Decodes one message, or `None` if the address is unknown or the arguments
/// do not fit any shape for it.
pub fn decode(msg: &OscMessage) -> Option<OscEvent> {
    let (endpoint, name) = Endpoint::resolve(&msg.addr)?;
    let mut args = Args::new(&msg.args);
    match endpoint {
        Endpoint::AvatarChange => {
            let avatar_guid = args.string()?;
            if args.remaining() == 0 {
                return Some(OscEvent::AvatarChangeRequest(AvatarChangeSend { avatar_guid }));
            }
            let avatar_json_config_path = args.string()?;
            args.finish(OscEvent::AvatarChanged(AvatarChangeReceive {
                avatar_guid,
                avatar_json_config_path,
            }))
        }
        Endpoint::AvatarParameter => {
            let parameter_value = args.value()?;
            let parameter_name = args.string()?;
            args.finish(OscEvent::AvatarParameter(AvatarParameterChange {
                parameter_name,
                parameter_value,
            }))
        }
        Endpoint::AvatarParametersLegacy => {
            let parameter_value = args.value()?;
            args.finish(OscEvent::AvatarParameterLegacy(AvatarParameterChange {
                parameter_name: name?.to_string(),
                parameter_value,
            }))
        }
        Endpoint::Input => {
            let input_name = name?.parse::<InputName>().ok()?;
            let input_value = args.value()?;
            args.finish(OscEvent::Input(Input {
                input_name,
                input_value,
            }))
        }
        Endpoint::PropCreate => decode_prop_create(&msg.args),
        Endpoint::PropDelete => {
            let prop_guid = args.string()?;
            let prop_instance_id = args.string()?;
            args.finish(OscEvent::PropDeleted(PropDelete {
                prop_guid,
                prop_instance_id,
            }))
        }
        Endpoint::PropAvailable => {
            let prop_guid = args.string()?;
            let prop_instance_id = args.string()?;
            let prop_is_available = args.boolean()?;
            args.finish(OscEvent::PropAvailability(PropAvailability {
                prop_guid,
                prop_instance_id,
                prop_is_available,
            }))
        }
        Endpoint::PropParameter => {
            let prop_guid = args.string()?;
            let prop_instance_id = args.string()?;
            let prop_sync_name = args.string()?;
            let prop_sync_value = args.float()?;
            args.finish(OscEvent::PropParameter(PropParameter {
                prop_guid,
                prop_instance_id,
                prop_sync_name,
                prop_sync_value,
            }))
        }
        Endpoint::PropLocation => {
            let prop_guid = args.string()?;
            let prop_instance_id = args.string()?;
            let prop_position = args.vector3()?;
            let prop_euler_rotation = args.vector3()?;
            args.finish(OscEvent::PropLocation(PropLocation {
                prop_guid,
                prop_instance_id,
                prop_position,
                prop_euler_rotation,
            }))
        }
        Endpoint::PropLocationSub => {
            let prop_guid = args.string()?;
            let prop_instance_id = args.string()?;
            let prop_sub_sync_index = args.int()?;
            let prop_position = args.vector3()?;
            let prop_euler_rotation = args.vector3()?;
            args.finish(OscEvent::PropLocationSub(PropLocationSub {
                prop_guid,
                prop_instance_id,
                prop_sub_sync_index,
                prop_position,
                prop_euler_rotation,
            }))
        }
        Endpoint::TrackingPlaySpaceData => {
            let play_space_position = args.vector3()?;
            let play_space_euler_rotation = args.vector3()?;
            args.finish(OscEvent::TrackingPlaySpaceData(TrackingPlaySpaceData {
                play_space_position,
                play_space_euler_rotation,
            }))
        }
        Endpoint::TrackingDeviceStatus => {
            let device_is_connected = args.boolean()?;
            let device_type = args.string()?.parse().ok()?;
            let device_steam_vr_index = args.int()?;
            let device_steam_vr_name = args.string()?;
            args.finish(OscEvent::TrackingDeviceStatus(TrackingDeviceStatus {
                device_is_connected,
                device_type,
                device_steam_vr_index,
                device_steam_vr_name,
            }))
        }
        Endpoint::TrackingDeviceData => {
            let device_type = args.string()?.parse().ok()?;
            let device_steam_vr_index = args.int()?;
            let device_steam_vr_name = args.string()?;
            let device_position = args.vector3()?;
            let device_euler_rotation = args.vector3()?;
            let device_battery_percentage = args.float()?;
            args.finish(OscEvent::TrackingDeviceData(TrackingDeviceData {
                device_type,
                device_steam_vr_index,
                device_steam_vr_name,
                device_position,
                device_euler_rotation,
                device_battery_percentage,
            }))
        }
        Endpoint::ConfigReset => match msg.args.as_slice() {
            [] | [OscType::String(_)] => Some(OscEvent::ConfigReset),
            _ => None,
        },
    }
}

/// `/prop/create` is `s s i` from the mod, and `s` or `s f f f` towards it.
fn decode_prop_create(raw: &[OscType]) -> Option<OscEvent> {
    if let [OscType::String(_), OscType::String(_), OscType::Int(_)] = raw {
        let mut args = Args::new(raw);
        let prop_guid = args.string()?;
        let prop_instance_id = args.string()?;
        let prop_sub_sync_transform_count = args.int()?;
        return args.finish(OscEvent::PropCreated(PropCreateReceive {
            prop_guid,
            prop_instance_id,
            prop_sub_sync_transform_count,
        }));
    }
    let mut args = Args::new(raw);
    let prop_guid = args.string()?;
    let prop_local_position = if args.remaining() == 0 {
        None
    } else {
        Some(args.vector3()?)
    };
    args.finish(OscEvent::PropCreateRequest(PropCreateSend {
        prop_guid,
        prop_local_position,
    }))
}

/// Encodes an event as a single-message OSC packet.
pub fn encode_packet(event: &OscEvent) -> Result<Vec<u8>, CodecError> {
    encoder::encode(&OscPacket::Message(encode(event))).map_err(CodecError::Encode)
}

/// Decodes a datagram into its messages, flattening bundles in order.
pub fn decode_datagram(buf: &[u8]) -> Result<Vec<OscMessage>, CodecError> {
    let (_, packet) = decoder::decode_udp(buf).map_err(CodecError::Decode)?;
    let mut messages = Vec::new();
    flatten(packet, &mut messages);
    Ok(messages)
}

pub(crate) fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(msg),
        OscPacket::Bundle(bundle) => {
            for pkt in bundle.content {
                flatten(pkt, out);
            }
        }
    }
}
