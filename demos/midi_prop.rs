//! Turns MIDI notes into synced prop parameters.
//!
//! Each currently held note occupies one of `Key_1..Key_N` on the prop, with
//! the value `note / 127`, or `-1.0` when the key is free. Settings come from
//! `midi_prop.json`:
//!
//! ```json
//! { "prop_guid": "<prop guid>", "number_of_keys": 10, "debug_mode": false }
//! ```

use std::error::Error;
use std::fs;
use std::io::{stdin, stdout, Write};
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};

use midir::{Ignore, MidiInput};
use serde::Deserialize;
use tracing::{debug, warn};

use cvr_osc::{logging, Config, OscInterface, PropParameter, StartOptions};

const CONFIG_PATH: &str = "midi_prop.json";
const NO_NOTE: i32 = -1;

#[derive(Debug, Deserialize)]
struct MidiPropConfig {
    prop_guid: String,
    #[serde(default = "default_number_of_keys")]
    number_of_keys: usize,
    #[serde(default)]
    debug_mode: bool,
}

fn default_number_of_keys() -> usize {
    10
}

/// Last spawned instance of our prop and whether we may drive it.
#[derive(Debug, Default)]
struct PropState {
    instance_id: Option<String>,
    available: bool,
}

/// Held notes per key slot.
struct Keys {
    values: Vec<i32>,
}

impl Keys {
    fn new(count: usize) -> Self {
        Self {
            values: vec![NO_NOTE; count],
        }
    }

    /// Puts `note` into the first free slot. Returns the slot, if any was free.
    fn press(&mut self, note: i32) -> Option<usize> {
        if self.values.contains(&note) {
            return None;
        }
        let slot = self.values.iter().position(|v| *v == NO_NOTE)?;
        self.values[slot] = note;
        Some(slot)
    }

    /// Frees every slot holding `note` and returns them.
    fn release(&mut self, note: i32) -> Vec<usize> {
        let mut freed = Vec::new();
        for (slot, value) in self.values.iter_mut().enumerate() {
            if *value == note {
                *value = NO_NOTE;
                freed.push(slot);
            }
        }
        freed
    }
}

fn key_name(slot: usize) -> String {
    format!("Key_{}", slot + 1)
}

fn key_value(note: i32) -> f32 {
    if note == NO_NOTE {
        -1.0
    } else {
        note as f32 / 127.0
    }
}

fn main() {
    match run() {
        Ok(_) => (),
        Err(err) => println!("Error: {}", err),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config: MidiPropConfig = serde_json::from_str(&fs::read_to_string(CONFIG_PATH)?)?;
    let app_config = Config::default();
    let log = logging::init(&app_config.log);
    if config.debug_mode {
        log.set_debug(true)?;
    }

    let prop = Arc::new(Mutex::new(PropState::default()));
    let osc = Arc::new(OscInterface::new(app_config.osc));
    {
        let guid = config.prop_guid.clone();
        let prop = prop.clone();
        osc.on_prop_created(move |data| {
            if data.prop_guid == guid {
                prop.lock().unwrap().instance_id = Some(data.prop_instance_id.clone());
            }
            println!(
                "The prop {} has been spawned with the instance id {}",
                data.prop_guid, data.prop_instance_id
            );
        });
    }
    {
        let guid = config.prop_guid.clone();
        let prop = prop.clone();
        osc.on_prop_deleted(move |data| {
            let mut state = prop.lock().unwrap();
            if data.prop_guid == guid && state.instance_id.as_deref() == Some(&data.prop_instance_id) {
                *state = PropState::default();
            }
            println!(
                "The prop {} with the instance id {} has been deleted!",
                data.prop_guid, data.prop_instance_id
            );
        });
    }
    {
        let guid = config.prop_guid.clone();
        let prop = prop.clone();
        osc.on_prop_availability_changed(move |data| {
            let mut state = prop.lock().unwrap();
            if data.prop_guid == guid && state.instance_id.as_deref() == Some(&data.prop_instance_id) {
                state.available = data.prop_is_available;
            }
        });
    }
    osc.start(StartOptions::default())?;
    // Ask the mod to resend props that already exist
    osc.send_config_reset()?;

    let mut midi_in = MidiInput::new("cvr-osc midi prop")?;
    midi_in.ignore(Ignore::None);
    let port_idx = choose_input_port(&midi_in)?;
    let ports = midi_in.ports();
    let port = ports.get(port_idx).ok_or("invalid input port selected")?;
    println!("Listening to input from: {}...", midi_in.port_name(port)?);

    let (tx, rx) = channel::<Vec<u8>>();
    let _conn_in = midi_in.connect(
        port,
        "cvr-osc-midi-prop",
        move |_stamp, message, _| {
            let _ = tx.send(message.to_vec());
        },
        (),
    )?;

    let mut keys = Keys::new(config.number_of_keys);
    for msg in rx {
        if msg.len() < 3 {
            continue;
        }
        let note = msg[1] as i32;
        let changed: Vec<(usize, i32)> = match msg[0] & 0xF0 {
            // Velocity 0 on Note On is Note Off per MIDI spec
            0x90 if msg[2] > 0 => match keys.press(note) {
                Some(slot) => vec![(slot, note)],
                None => {
                    if !keys.values.contains(&note) {
                        warn!("not enough concurrent keys to output all currently pressed notes");
                    }
                    Vec::new()
                }
            },
            0x80 | 0x90 => keys.release(note).into_iter().map(|slot| (slot, NO_NOTE)).collect(),
            _ => Vec::new(),
        };
        for (slot, value) in changed {
            send_key(&osc, &prop, &config.prop_guid, slot, value)?;
        }
    }
    Ok(())
}

fn send_key(
    osc: &OscInterface,
    prop: &Mutex<PropState>,
    prop_guid: &str,
    slot: usize,
    note: i32,
) -> Result<(), Box<dyn Error>> {
    let name = key_name(slot);
    let value = key_value(note);
    debug!(key = %name, value, note, "key changed");

    let instance_id = {
        let state = prop.lock().unwrap();
        match (&state.instance_id, state.available) {
            (Some(id), true) => id.clone(),
            _ => {
                debug!(prop = prop_guid, "ignoring input, no available prop instance");
                return Ok(());
            }
        }
    };
    osc.send_prop_parameter(&PropParameter {
        prop_guid: prop_guid.to_string(),
        prop_instance_id: instance_id,
        prop_sync_name: name,
        prop_sync_value: value,
    })?;
    Ok(())
}

/// Lists the MIDI inputs and asks which one to use; a single port is picked directly.
fn choose_input_port(midi_in: &MidiInput) -> Result<usize, Box<dyn Error>> {
    let ports = midi_in.ports();
    if ports.is_empty() {
        return Err("no midi devices were found".into());
    }
    if ports.len() == 1 {
        println!("Choosing the only available input port: {}", midi_in.port_name(&ports[0])?);
        return Ok(0);
    }

    println!("Found the following midi devices:");
    for (i, p) in ports.iter().enumerate() {
        println!("\t{}.\t{}", i, midi_in.port_name(p)?);
    }
    print!("\nPick a device number, between 0 and {} > ", ports.len() - 1);
    stdout().flush()?;
    let mut choice = String::new();
    stdin().read_line(&mut choice)?;
    let idx = choice.trim().parse::<usize>()?;
    if idx >= ports.len() {
        return Err("the provided device number doesn't exist".into());
    }
    Ok(idx)
}
