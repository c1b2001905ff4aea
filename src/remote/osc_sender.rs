use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use rosc::{encoder, OscMessage, OscPacket};
use tracing::{debug, error, info};

use crate::codec;
use crate::error::{CodecError, OscError};
use crate::messages::OscEvent;

/// Sends OSC datagrams to the mod.
pub struct OscSender {
    socket: UdpSocket,
    target_addr: SocketAddr,
}

impl OscSender {
    /// Binds an ephemeral local socket and connects it to `host:port`.
    pub fn connect(host: &str, port: u16) -> Result<Self, OscError> {
        let target_addr = resolve(host, port)?;
        // Unspecified address of the target's family
        let local: SocketAddr = if target_addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).map_err(|source| OscError::Bind {
            addr: local.to_string(),
            source,
        })?;
        socket
            .connect(target_addr)
            .map_err(|source| OscError::Connect {
                addr: target_addr.to_string(),
                source,
            })?;
        info!(target = %target_addr, local = ?socket.local_addr().ok(), "OSC sender connected");
        Ok(Self {
            socket,
            target_addr,
        })
    }

    pub fn target_addr(&self) -> SocketAddr {
        self.target_addr
    }

    pub fn send_event(&self, event: &OscEvent) -> Result<(), OscError> {
        self.send_message(codec::encode(event))
    }

    /// Encodes `msg` and writes it as one datagram. No acknowledgement, no retry.
    pub fn send_message(&self, msg: OscMessage) -> Result<(), OscError> {
        let addr = msg.addr.clone();
        let msg_buf =
            encoder::encode(&OscPacket::Message(msg)).map_err(CodecError::Encode)?;
        match self.socket.send(&msg_buf) {
            Ok(bytes_sent) => {
                debug!(bytes = bytes_sent, target = %self.target_addr, %addr, "sent OSC message");
                Ok(())
            }
            Err(source) => {
                error!(target = %self.target_addr, %addr, error = %source, "failed to send OSC message");
                Err(OscError::Send {
                    addr: self.target_addr.to_string(),
                    source,
                })
            }
        }
    }
}

/// Resolves `host:port`, preferring a literal IP and falling back to name lookup.
pub(crate) fn resolve(host: &str, port: u16) -> Result<SocketAddr, OscError> {
    let resolve_error = |source| OscError::Resolve {
        host: host.to_string(),
        port,
        source,
    };
    if let Ok(ip) = host.trim().parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }
    (host.trim(), port)
        .to_socket_addrs()
        .map_err(resolve_error)?
        .next()
        .ok_or_else(|| {
            resolve_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no address found",
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{AvatarChangeSend, OscEvent};
    use rosc::OscType;
    use std::time::Duration;

    #[test]
    fn resolves_literal_addresses() {
        assert_eq!(
            resolve("127.0.0.1", 9000).unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            resolve("::1", 9000).unwrap(),
            "[::1]:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn sends_one_datagram_per_event() {
        let mod_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        mod_socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = mod_socket.local_addr().unwrap().port();

        let sender = OscSender::connect("127.0.0.1", port).unwrap();
        assert_eq!(sender.target_addr().port(), port);
        sender
            .send_event(&OscEvent::AvatarChangeRequest(AvatarChangeSend {
                avatar_guid: "abc".into(),
            }))
            .unwrap();

        let mut buf = [0u8; rosc::decoder::MTU];
        let (size, _) = mod_socket.recv_from(&mut buf).unwrap();
        let messages = codec::decode_datagram(&buf[..size]).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].addr, "/avatar/change");
        assert_eq!(messages[0].args, vec![OscType::String("abc".into())]);
    }
}
