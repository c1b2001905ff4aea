//! [`OscInterface`]: the entry point for talking to the ChilloutVR OSC mod.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::codec::Endpoint;
use crate::config::OscConfig;
use crate::error::OscError;
use crate::general::banner::{self, StartupMode};
use crate::messages::*;
use crate::remote::{Dispatcher, Handler, OscListener, OscSender};

/// Lifecycle of the transport.
///
/// `Starting` only lasts while a `start` call holds the transport, so
/// [`OscInterface::state`] reports `Stopped` or `Running`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Starting,
    Running,
}

/// Which halves [`OscInterface::start`] should open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartOptions {
    pub sender: bool,
    pub receiver: bool,
    pub print_starting_messages: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            sender: true,
            receiver: true,
            print_starting_messages: true,
        }
    }
}

impl StartOptions {
    pub fn sender_only() -> Self {
        Self {
            receiver: false,
            ..Self::default()
        }
    }

    pub fn receiver_only() -> Self {
        Self {
            sender: false,
            ..Self::default()
        }
    }

    pub fn quiet(self) -> Self {
        Self {
            print_starting_messages: false,
            ..self
        }
    }
}

struct Transport {
    state: TransportState,
    sender: Option<Arc<OscSender>>,
    listener: Option<OscListener>,
    print_starting_messages: bool,
}

impl Transport {
    fn receiving(&self) -> bool {
        self.listener.as_ref().is_some_and(OscListener::is_running)
    }

    fn settle(&mut self) {
        self.state = if self.sender.is_some() || self.receiving() {
            TransportState::Running
        } else {
            TransportState::Stopped
        };
    }
}

/// Sends typed events to the mod and dispatches the ones it sends back.
///
/// Handlers may be registered at any time; they are invoked on the receive
/// thread, one datagram at a time.
pub struct OscInterface {
    config: OscConfig,
    dispatcher: Arc<Dispatcher>,
    transport: Mutex<Transport>,
}

impl OscInterface {
    pub fn new(config: OscConfig) -> Self {
        Self {
            config,
            dispatcher: Arc::new(Dispatcher::new()),
            transport: Mutex::new(Transport {
                state: TransportState::Stopped,
                sender: None,
                listener: None,
                print_starting_messages: true,
            }),
        }
    }

    pub fn config(&self) -> &OscConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    fn transport(&self) -> MutexGuard<'_, Transport> {
        self.transport.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the requested halves. Halves that are already open are left
    /// alone, so calling this twice never binds twice.
    pub fn start(&self, options: StartOptions) -> Result<(), OscError> {
        let mut transport = self.transport();
        transport.print_starting_messages = options.print_starting_messages;
        if options.receiver && !transport.receiving() {
            // the loop died on a socket error, join it and bind again
            if let Some(mut dead) = transport.listener.take() {
                dead.stop();
            }
        }

        let need_sender = options.sender && transport.sender.is_none();
        let need_receiver = options.receiver && transport.listener.is_none();
        if !need_sender && !need_receiver {
            info!("OSC interface already started");
            return Ok(());
        }

        transport.state = TransportState::Starting;
        let result = self.open(&mut transport, need_sender, need_receiver);
        // a half that did open stays open
        transport.settle();
        if let Err(err) = &result {
            warn!(error = %err, state = ?transport.state, "failed to start OSC interface");
        }
        result
    }

    fn open(
        &self,
        transport: &mut Transport,
        need_sender: bool,
        need_receiver: bool,
    ) -> Result<(), OscError> {
        if need_sender {
            self.open_sender(transport)?;
        }
        if need_receiver {
            let listener = OscListener::start(
                &self.config.lib_ip,
                self.config.lib_port,
                self.dispatcher.clone(),
            )?;
            if transport.print_starting_messages {
                banner::print_starting_message(StartupMode::Receiver, listener.local_addr());
            }
            transport.listener = Some(listener);
        }
        Ok(())
    }

    fn open_sender(&self, transport: &mut Transport) -> Result<Arc<OscSender>, OscError> {
        let sender = Arc::new(OscSender::connect(&self.config.cvr_ip, self.config.cvr_port)?);
        if transport.print_starting_messages {
            banner::print_starting_message(StartupMode::Sender, sender.target_addr());
        }
        transport.sender = Some(sender.clone());
        Ok(sender)
    }

    /// Closes both halves and joins the receive thread. Handlers stay registered.
    ///
    /// The receive thread is joined without holding the transport, so handlers
    /// still running may call back into the interface.
    pub fn stop(&self) {
        let listener = self.transport().listener.take();
        if let Some(mut listener) = listener {
            listener.stop();
        }
        let mut transport = self.transport();
        transport.sender = None;
        transport.settle();
    }

    pub fn state(&self) -> TransportState {
        let mut transport = self.transport();
        transport.settle();
        transport.state
    }

    pub fn is_sending(&self) -> bool {
        self.transport().sender.is_some()
    }

    /// True while the receive loop is alive; false after `stop` or a fatal socket error.
    pub fn is_receiving(&self) -> bool {
        self.transport().receiving()
    }

    pub fn receiver_addr(&self) -> Option<SocketAddr> {
        let transport = self.transport();
        transport
            .listener
            .as_ref()
            .filter(|listener| listener.is_running())
            .map(OscListener::local_addr)
    }

    pub fn target_addr(&self) -> Option<SocketAddr> {
        self.transport().sender.as_ref().map(|s| s.target_addr())
    }

    /// Encodes and sends one event, opening the sender first if needed.
    pub fn send(&self, event: &OscEvent) -> Result<(), OscError> {
        let sender = {
            let mut transport = self.transport();
            match transport.sender.clone() {
                Some(sender) => sender,
                None => {
                    let opened = self.open_sender(&mut transport);
                    transport.settle();
                    opened?
                }
            }
        };
        sender.send_event(event)
    }

    /// Registers `handler` for every event decoded on `endpoint`.
    pub fn register<F>(&self, endpoint: Endpoint, handler: F)
    where
        F: Fn(&OscEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.dispatcher.register(endpoint, handler);
    }

    pub fn send_avatar_change(&self, data: &AvatarChangeSend) -> Result<(), OscError> {
        self.send(&OscEvent::AvatarChangeRequest(data.clone()))
    }

    pub fn send_avatar_parameter(&self, data: &AvatarParameterChange) -> Result<(), OscError> {
        self.send(&OscEvent::AvatarParameter(data.clone()))
    }

    /// Sends to `/avatar/parameters/<name>`.
    pub fn send_avatar_parameter_legacy(&self, data: &AvatarParameterChange) -> Result<(), OscError> {
        self.send(&OscEvent::AvatarParameterLegacy(data.clone()))
    }

    pub fn set_input(&self, data: &Input) -> Result<(), OscError> {
        self.send(&OscEvent::Input(data.clone()))
    }

    pub fn send_prop_create(&self, data: &PropCreateSend) -> Result<(), OscError> {
        self.send(&OscEvent::PropCreateRequest(data.clone()))
    }

    pub fn send_prop_delete(&self, data: &PropDelete) -> Result<(), OscError> {
        self.send(&OscEvent::PropDeleted(data.clone()))
    }

    pub fn send_prop_parameter(&self, data: &PropParameter) -> Result<(), OscError> {
        self.send(&OscEvent::PropParameter(data.clone()))
    }

    pub fn send_prop_location(&self, data: &PropLocation) -> Result<(), OscError> {
        self.send(&OscEvent::PropLocation(data.clone()))
    }

    pub fn send_prop_location_sub_sync(&self, data: &PropLocationSub) -> Result<(), OscError> {
        self.send(&OscEvent::PropLocationSub(data.clone()))
    }

    /// Asks the mod to resend all its cached state to the receiver.
    pub fn send_config_reset(&self) -> Result<(), OscError> {
        self.send(&OscEvent::ConfigReset)
    }

    pub fn on_avatar_changed<F>(&self, callback: F)
    where
        F: Fn(&AvatarChangeReceive) + Send + Sync + 'static,
    {
        self.register(Endpoint::AvatarChange, move |event| {
            if let OscEvent::AvatarChanged(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_avatar_parameter_changed<F>(&self, callback: F)
    where
        F: Fn(&AvatarParameterChange) + Send + Sync + 'static,
    {
        self.register(Endpoint::AvatarParameter, move |event| {
            if let OscEvent::AvatarParameter(data) = event {
                callback(data);
            }
        });
    }

    /// Parameter changes on `/avatar/parameters/<name>`.
    pub fn on_avatar_parameter_changed_legacy<F>(&self, callback: F)
    where
        F: Fn(&AvatarParameterChange) + Send + Sync + 'static,
    {
        self.register(Endpoint::AvatarParametersLegacy, move |event| {
            if let OscEvent::AvatarParameterLegacy(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_prop_created<F>(&self, callback: F)
    where
        F: Fn(&PropCreateReceive) + Send + Sync + 'static,
    {
        self.register(Endpoint::PropCreate, move |event| {
            if let OscEvent::PropCreated(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_prop_deleted<F>(&self, callback: F)
    where
        F: Fn(&PropDelete) + Send + Sync + 'static,
    {
        self.register(Endpoint::PropDelete, move |event| {
            if let OscEvent::PropDeleted(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_prop_availability_changed<F>(&self, callback: F)
    where
        F: Fn(&PropAvailability) + Send + Sync + 'static,
    {
        self.register(Endpoint::PropAvailable, move |event| {
            if let OscEvent::PropAvailability(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_prop_parameter_changed<F>(&self, callback: F)
    where
        F: Fn(&PropParameter) + Send + Sync + 'static,
    {
        self.register(Endpoint::PropParameter, move |event| {
            if let OscEvent::PropParameter(data) = event {
                callback(data);
            }
        });
    }

    /// Fires every frame by default on the mod side.
    pub fn on_prop_location_updated<F>(&self, callback: F)
    where
        F: Fn(&PropLocation) + Send + Sync + 'static,
    {
        self.register(Endpoint::PropLocation, move |event| {
            if let OscEvent::PropLocation(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_prop_location_sub_updated<F>(&self, callback: F)
    where
        F: Fn(&PropLocationSub) + Send + Sync + 'static,
    {
        self.register(Endpoint::PropLocationSub, move |event| {
            if let OscEvent::PropLocationSub(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_tracking_play_space_data_updated<F>(&self, callback: F)
    where
        F: Fn(&TrackingPlaySpaceData) + Send + Sync + 'static,
    {
        self.register(Endpoint::TrackingPlaySpaceData, move |event| {
            if let OscEvent::TrackingPlaySpaceData(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_tracking_device_status_changed<F>(&self, callback: F)
    where
        F: Fn(&TrackingDeviceStatus) + Send + Sync + 'static,
    {
        self.register(Endpoint::TrackingDeviceStatus, move |event| {
            if let OscEvent::TrackingDeviceStatus(data) = event {
                callback(data);
            }
        });
    }

    pub fn on_tracking_device_data_updated<F>(&self, callback: F)
    where
        F: Fn(&TrackingDeviceData) + Send + Sync + 'static,
    {
        self.register(Endpoint::TrackingDeviceData, move |event| {
            if let OscEvent::TrackingDeviceData(data) = event {
                callback(data);
            }
        });
    }
}

impl Default for OscInterface {
    fn default() -> Self {
        Self::new(OscConfig::default())
    }
}

impl Drop for OscInterface {
    fn drop(&mut self) {
        self.stop();
    }
}
